//! # docfile-legacy
//!
//! One-time migration of stored storage path templates between the legacy
//! single-brace placeholder syntax (`{title}`) and the template syntax
//! (`{{ title }}`), in both directions.

pub mod syntax;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use docfile_core::StoragePath;

pub use syntax::{downgrade, upgrade};

/// Which way to rewrite stored templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Legacy placeholders to template expressions.
    Upgrade,
    /// Simple template expressions back to legacy placeholders.
    Downgrade,
}

impl Direction {
    /// Rewrite one template string.
    #[must_use]
    pub fn apply(self, path: &str) -> String {
        match self {
            Self::Upgrade => upgrade(path),
            Self::Downgrade => downgrade(path),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upgrade => write!(f, "upgrade"),
            Self::Downgrade => write!(f, "downgrade"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown migration direction '{0}' (expected upgrade or downgrade)")]
pub struct UnknownDirection(pub String);

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "upgrade" => Ok(Self::Upgrade),
            "downgrade" => Ok(Self::Downgrade),
            _ => Err(UnknownDirection(s.to_string())),
        }
    }
}

/// Rewrite every storage path template in `paths`.
///
/// Returns how many templates changed.
pub fn migrate_storage_paths(paths: &mut [StoragePath], direction: Direction) -> usize {
    let mut changed = 0;
    for storage_path in paths.iter_mut() {
        let rewritten = direction.apply(&storage_path.path);
        if rewritten != storage_path.path {
            tracing::info!(
                id = storage_path.id,
                name = %storage_path.name,
                from = %storage_path.path,
                to = %rewritten,
                "{direction} storage path"
            );
            storage_path.path = rewritten;
            changed += 1;
        }
    }
    changed
}
