//! Storage path types.
//!
//! A storage path is a named filename template. Documents assigned to
//! one are stored under the path it renders to instead of the global
//! `filename_format`.

use serde::{Deserialize, Serialize};

/// A named, user-defined filename template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoragePath {
    pub id: i64,
    /// Human-readable name shown in listings
    pub name: String,
    /// The template string, e.g. `{{ correspondent }}/{{ title }}`
    pub path: String,
}

impl StoragePath {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            path: path.into(),
        }
    }
}
