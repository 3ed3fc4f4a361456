//! # docfile-storage
//!
//! Where documents live on disk.
//!
//! - [`FilenameGenerator`] renders a document's storage path template into
//!   a relative filename, falling back to the document id.
//! - [`FilenameGenerator::generate_unique_filename`] avoids collisions
//!   with files that already exist.
//! - [`relocate`] moves files when their generated names change.

pub mod dirs;
pub mod filename;
pub mod relocate;
pub mod unique;

pub use dirs::{create_source_path_directory, delete_empty_directories};
pub use filename::FilenameGenerator;
pub use relocate::{relocate, Relocation};
pub use unique::{FileProbe, LocalFs};
