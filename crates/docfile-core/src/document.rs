//! Document type - the record a storage path is generated for.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::storage_path::StoragePath;
use crate::tag::Tag;

/// Known mime types and the extension stored files get for them.
const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("application/pdf", ".pdf"),
    ("image/png", ".png"),
    ("image/jpeg", ".jpg"),
    ("image/tiff", ".tif"),
    ("image/gif", ".gif"),
    ("image/webp", ".webp"),
    ("image/bmp", ".bmp"),
    ("text/plain", ".txt"),
    ("text/csv", ".csv"),
    ("message/rfc822", ".eml"),
    ("application/msword", ".doc"),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ".docx",
    ),
    ("application/vnd.oasis.opendocument.text", ".odt"),
];

/// How the original file is stored on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    #[default]
    Unencrypted,
    /// Legacy GPG-encrypted storage; stored names carry a `.gpg` suffix.
    Gpg,
}

/// A stored document together with the metadata its path is built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    // === Identity ===
    pub id: i64,
    #[serde(default)]
    pub title: String,

    // === Classification ===
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correspondent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_serial_number: Option<u32>,

    // === Timestamps (UTC) ===
    pub created: DateTime<Utc>,
    pub added: DateTime<Utc>,

    // === File ===
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    #[serde(default)]
    pub storage_type: StorageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_filename: Option<String>,

    // === Storage path override ===
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path_id: Option<i64>,
    /// Resolved from `storage_path_id` when the catalog is loaded.
    #[serde(skip)]
    pub storage_path: Option<StoragePath>,
}

fn default_mime_type() -> String {
    "application/pdf".to_string()
}

impl Document {
    /// Create a bare unencrypted PDF document; `added` equals `created`.
    #[must_use]
    pub fn new(id: i64, title: impl Into<String>, created: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            correspondent: None,
            document_type: None,
            tags: Vec::new(),
            owner: None,
            archive_serial_number: None,
            created,
            added: created,
            original_filename: None,
            mime_type: default_mime_type(),
            storage_type: StorageType::Unencrypted,
            filename: None,
            archive_filename: None,
            storage_path_id: None,
            storage_path: None,
        }
    }

    /// Attach a storage path override, keeping the id reference in sync.
    pub fn set_storage_path(&mut self, storage_path: Option<StoragePath>) {
        self.storage_path_id = storage_path.as_ref().map(|sp| sp.id);
        self.storage_path = storage_path;
    }

    /// Extension (with leading dot) of the original file.
    ///
    /// Derived from the mime type; unknown types fall back to the extension
    /// of `original_filename`, else the empty string.
    #[must_use]
    pub fn file_type(&self) -> String {
        let mime = self.mime_type.to_ascii_lowercase();
        if let Some((_, ext)) = MIME_EXTENSIONS.iter().find(|(m, _)| *m == mime) {
            return (*ext).to_string();
        }
        self.original_filename
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_default()
    }

    /// Whether the stored files use the legacy GPG encryption.
    #[must_use]
    pub fn is_encrypted(&self) -> bool {
        self.storage_type == StorageType::Gpg
    }

    /// Absolute location of the original file, if one is stored.
    #[must_use]
    pub fn source_path(&self, settings: &Settings) -> Option<PathBuf> {
        self.filename
            .as_deref()
            .map(|name| settings.originals_dir.join(name))
    }

    /// Absolute location of the archived copy, if one is stored.
    #[must_use]
    pub fn archive_path(&self, settings: &Settings) -> Option<PathBuf> {
        self.archive_filename
            .as_deref()
            .map(|name| settings.archive_dir.join(name))
    }
}
