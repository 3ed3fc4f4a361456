//! Errors raised while rendering a filename template.

use thiserror::Error;

/// Why a template could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The template source does not parse.
    #[error("{0}")]
    Syntax(String),

    /// A strict render referenced a variable the mapping does not define.
    #[error("{0}")]
    Undefined(String),

    /// Any other failure during rendering (bad filter call, direct use of
    /// `tags`, ...).
    #[error("{0}")]
    Render(String),
}

impl TemplateError {
    /// One-line message shown to users in validation results.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Syntax(msg) => format!("Syntax error: {msg}"),
            Self::Undefined(msg) | Self::Render(msg) => format!("Exception: {msg}"),
        }
    }
}

impl From<minijinja::Error> for TemplateError {
    fn from(err: minijinja::Error) -> Self {
        let mut msg = err
            .detail()
            .map(str::to_string)
            .unwrap_or_else(|| err.kind().to_string());
        if let Some(line) = err.line() {
            msg.push_str(&format!(" (line {line})"));
        }
        match err.kind() {
            minijinja::ErrorKind::SyntaxError => Self::Syntax(msg),
            minijinja::ErrorKind::UndefinedError => Self::Undefined(msg),
            _ => Self::Render(msg),
        }
    }
}
