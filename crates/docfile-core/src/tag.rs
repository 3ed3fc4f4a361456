//! Tag type - a label attached to documents.

use serde::{Deserialize, Serialize};

/// A document label. Serialized as its bare name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Split a `key_value` or `key-value` name at its first delimiter.
    ///
    /// An underscore anywhere in the name wins over a hyphen.
    #[must_use]
    pub fn key_value(&self) -> Option<(&str, &str)> {
        let pos = self.name.find('_').or_else(|| self.name.find('-'))?;
        Some((&self.name[..pos], &self.name[pos + 1..]))
    }
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
