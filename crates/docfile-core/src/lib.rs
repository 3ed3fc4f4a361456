//! # docfile-core
//!
//! Core types shared by every docfile crate:
//! - [`Document`]: the record a storage path is generated for
//! - [`Tag`] and [`StoragePath`]
//! - [`Settings`]: process-wide configuration (TOML + environment)
//! - [`LocalZone`]: the zone local calendar dates are taken in
//! - [`Catalog`]: YAML persistence of documents and storage paths
//! - Filename sanitizing ([`sanitize`])
//! - Error hierarchy ([`DocfileError`], [`ConfigError`])

pub mod catalog;
pub mod document;
pub mod error;
pub mod sanitize;
pub mod settings;
pub mod storage_path;
pub mod tag;
pub mod zone;

pub use catalog::Catalog;
pub use document::{Document, StorageType};
pub use error::{ConfigError, DocfileError, Result};
pub use settings::Settings;
pub use storage_path::StoragePath;
pub use tag::Tag;
pub use zone::LocalZone;

/// Placeholder rendered for any document field without a value.
pub const NO_VALUE: &str = "-none-";
