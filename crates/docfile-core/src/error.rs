//! Error types for docfile.

use thiserror::Error;

/// Top-level result type for docfile operations.
pub type Result<T> = std::result::Result<T, DocfileError>;

/// Top-level error type for docfile.
#[derive(Debug, Error)]
pub enum DocfileError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("Document (id={0}) does not exist")]
    DocumentNotFound(i64),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors raised while loading [`crate::Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {reason}")]
    Unreadable { path: String, reason: String },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("invalid time zone '{0}': expected an IANA name such as Europe/Berlin or an offset like +01:00")]
    InvalidTimeZone(String),

    #[error("invalid value '{value}' for {variable}")]
    InvalidEnv { variable: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_display_human_readable_messages() {
        let err = DocfileError::DocumentNotFound(99);
        assert!(err.to_string().contains("id=99"));

        let err = ConfigError::InvalidTimeZone("Mars/Olympus".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Mars/Olympus"));
        assert!(msg.contains("Europe/Berlin"));

        let err: DocfileError = ConfigError::Invalid("bad".to_string()).into();
        assert!(err.to_string().starts_with("config error"));
    }
}
