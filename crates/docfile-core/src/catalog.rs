//! YAML catalog of documents and storage paths.
//!
//! The catalog stands in for the document database. Format:
//! ```yaml
//! storage_paths:
//!   - id: 1
//!     name: Invoices
//!     path: "{{ correspondent }}/{{ title }}"
//! documents:
//!   - id: 1
//!     title: Electricity March
//!     correspondent: Power Co
//!     created: 2024-03-01T09:00:00Z
//!     added: 2024-03-02T10:00:00Z
//!     tags: [bills, type_invoice]
//!     storage_path_id: 1
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::DocfileError;
use crate::storage_path::StoragePath;

/// All documents and storage paths known to the system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub storage_paths: Vec<StoragePath>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl Catalog {
    /// Parse catalog YAML and resolve storage path references.
    ///
    /// # Errors
    ///
    /// Returns [`DocfileError::Serialization`] if the YAML is malformed and
    /// [`DocfileError::Catalog`] if a document references an unknown
    /// storage path.
    pub fn parse(content: &str) -> Result<Self, DocfileError> {
        let mut catalog: Catalog =
            serde_yaml::from_str(content).map_err(|e| DocfileError::Serialization(e.to_string()))?;
        catalog.resolve_storage_paths()?;
        Ok(catalog)
    }

    /// Read and parse a catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`DocfileError::Io`] if the file cannot be read, otherwise
    /// as [`Catalog::parse`].
    pub fn load(path: &Path) -> Result<Self, DocfileError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Serialize the catalog back to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`DocfileError::Serialization`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, DocfileError> {
        serde_yaml::to_string(self).map_err(|e| DocfileError::Serialization(e.to_string()))
    }

    /// Write the catalog to `path`, replacing it.
    ///
    /// # Errors
    ///
    /// Returns [`DocfileError::Io`] or [`DocfileError::Serialization`].
    pub fn save(&self, path: &Path) -> Result<(), DocfileError> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    /// Look up a document by id.
    ///
    /// # Errors
    ///
    /// Returns [`DocfileError::DocumentNotFound`] if no document has that id.
    pub fn document(&self, id: i64) -> Result<&Document, DocfileError> {
        self.documents
            .iter()
            .find(|doc| doc.id == id)
            .ok_or(DocfileError::DocumentNotFound(id))
    }

    /// Mutable variant of [`Catalog::document`].
    ///
    /// # Errors
    ///
    /// Returns [`DocfileError::DocumentNotFound`] if no document has that id.
    pub fn document_mut(&mut self, id: i64) -> Result<&mut Document, DocfileError> {
        self.documents
            .iter_mut()
            .find(|doc| doc.id == id)
            .ok_or(DocfileError::DocumentNotFound(id))
    }

    /// Re-attach every document's storage path from `storage_paths`.
    ///
    /// Call after editing storage path templates so documents see the
    /// new text.
    ///
    /// # Errors
    ///
    /// Returns [`DocfileError::Catalog`] on a dangling `storage_path_id`.
    pub fn resolve_storage_paths(&mut self) -> Result<(), DocfileError> {
        for doc in &mut self.documents {
            doc.storage_path = match doc.storage_path_id {
                Some(id) => Some(
                    self.storage_paths
                        .iter()
                        .find(|sp| sp.id == id)
                        .cloned()
                        .ok_or_else(|| {
                            DocfileError::Catalog(format!(
                                "document {} references unknown storage path {id}",
                                doc.id
                            ))
                        })?,
                ),
                None => None,
            };
        }
        Ok(())
    }
}
