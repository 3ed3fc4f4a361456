//! Moving stored files to the names their templates currently produce.

use std::fs;
use std::path::Path;

use serde::Serialize;

use docfile_core::{Document, Result, Settings};

use crate::dirs::{create_source_path_directory, delete_empty_directories};
use crate::filename::FilenameGenerator;
use crate::unique::FileProbe;

/// Outcome of [`relocate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relocation {
    pub doc_id: i64,
    pub filename: Option<String>,
    pub archive_filename: Option<String>,
    /// Whether any file was renamed.
    pub moved: bool,
}

/// Rename `doc`'s original and archived files to fresh unique names and
/// update the stored names on `doc`.
///
/// If moving the archived copy fails the original is moved back, so the
/// document is never left half-relocated.
///
/// # Errors
///
/// Returns [`docfile_core::DocfileError::Io`] if a directory cannot be
/// created or a file cannot be renamed.
pub fn relocate(doc: &mut Document, settings: &Settings, probe: &impl FileProbe) -> Result<Relocation> {
    let generator = FilenameGenerator::new(settings);
    let mut moved = false;

    let old_filename = doc.filename.clone();
    if let Some(old) = &old_filename {
        let new = generator.generate_unique_filename(doc, false, probe);
        if *old != new {
            move_file(&settings.originals_dir, old, &new)?;
            doc.filename = Some(new);
            moved = true;
        }
    }

    if let Some(old) = doc.archive_filename.clone() {
        let new = generator.generate_unique_filename(doc, true, probe);
        if old != new {
            if let Err(err) = move_file(&settings.archive_dir, &old, &new) {
                restore_original(doc, settings, old_filename.as_deref());
                return Err(err);
            }
            doc.archive_filename = Some(new);
            moved = true;
        }
    }

    Ok(Relocation {
        doc_id: doc.id,
        filename: doc.filename.clone(),
        archive_filename: doc.archive_filename.clone(),
        moved,
    })
}

fn move_file(root: &Path, old: &str, new: &str) -> Result<()> {
    let from = root.join(old);
    let to = root.join(new);
    create_source_path_directory(&to)?;
    fs::rename(&from, &to)?;
    tracing::info!(from = %from.display(), to = %to.display(), "moved file");
    if let Some(parent) = from.parent() {
        delete_empty_directories(parent, root);
    }
    Ok(())
}

fn restore_original(doc: &mut Document, settings: &Settings, old_filename: Option<&str>) {
    let (Some(old), Some(current)) = (old_filename, doc.filename.clone()) else {
        return;
    };
    if old == current {
        return;
    }
    match move_file(&settings.originals_dir, &current, old) {
        Ok(()) => doc.filename = Some(old.to_string()),
        Err(err) => tracing::error!(
            doc_id = doc.id,
            "could not move {current} back to {old}: {err}"
        ),
    }
}
