//! Filename generation from templates.

use docfile_core::{Document, Settings, NO_VALUE};
use docfile_template::Templater;

/// Extension of every archived copy.
pub const ARCHIVE_EXTENSION: &str = ".pdf";

/// Suffix of files stored with the legacy GPG encryption.
pub const GPG_SUFFIX: &str = ".gpg";

/// Turns documents into relative storage filenames.
#[derive(Debug, Clone, Copy)]
pub struct FilenameGenerator<'a> {
    settings: &'a Settings,
    templater: Templater,
}

impl<'a> FilenameGenerator<'a> {
    #[must_use]
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            templater: Templater::from_settings(settings),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &'a Settings {
        self.settings
    }

    /// Filename for `doc`, relative to the originals (or archive) root.
    ///
    /// The document's storage path template wins over the global
    /// `filename_format`. A template that is missing or fails to render
    /// falls back to the zero-padded document id. `counter > 0` adds a
    /// `_NN` suffix before the extension.
    #[must_use]
    pub fn generate_filename(
        &self,
        doc: &Document,
        counter: u32,
        append_gpg: bool,
        archive_filename: bool,
    ) -> String {
        let path = self.render_path(doc);

        let counter_str = if counter > 0 {
            format!("_{counter:02}")
        } else {
            String::new()
        };
        let extension = if archive_filename {
            ARCHIVE_EXTENSION.to_string()
        } else {
            doc.file_type()
        };

        let mut filename = if path.is_empty() {
            format!("{:07}{counter_str}{extension}", doc.id)
        } else {
            format!("{path}{counter_str}{extension}")
        };

        if append_gpg && doc.is_encrypted() {
            filename.push_str(GPG_SUFFIX);
        }
        filename
    }

    fn render_path(&self, doc: &Document) -> String {
        let template = match &doc.storage_path {
            Some(storage_path) => {
                tracing::debug!(
                    doc_id = doc.id,
                    storage_path = storage_path.id,
                    template = %storage_path.path,
                    "document has a storage path"
                );
                Some(storage_path.path.as_str())
            }
            None => self.settings.filename_format.as_deref(),
        };
        let Some(template) = template else {
            return String::new();
        };

        match self.templater.render(template, Some(doc), true) {
            Some(rendered) => clean_rendered_path(&rendered, self.settings.filename_format_remove_none),
            None => {
                tracing::warn!(
                    doc_id = doc.id,
                    "invalid filename format '{template}', falling back to default"
                );
                String::new()
            }
        }
    }
}

/// Collapse `-none-` placeholders and trim separators and whitespace.
fn clean_rendered_path(rendered: &str, remove_none: bool) -> String {
    let mut path = rendered.to_string();
    if remove_none {
        path = path
            .replace(&format!("/{NO_VALUE}/"), "/")
            .replace(&format!(" {NO_VALUE}"), "")
            .replace(NO_VALUE, "");
    }
    path = path.replace(NO_VALUE, "none");
    path.trim_matches(|c: char| c == '/' || c.is_whitespace()).to_string()
}
