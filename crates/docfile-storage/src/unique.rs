//! Collision-free filenames.
//!
//! Existence checks are advisory: nothing is locked between the check and
//! the caller writing the file.

use std::path::Path;

use docfile_core::Document;

use crate::filename::{FilenameGenerator, ARCHIVE_EXTENSION};

/// Answers whether a file already exists.
pub trait FileProbe {
    fn exists(&self, path: &Path) -> bool;
}

/// Probe backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileProbe for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

impl FilenameGenerator<'_> {
    /// A filename for `doc` that is either its current one or free on disk.
    ///
    /// Archive names first try to mirror the original filename with a
    /// `.pdf` extension. Otherwise counters `0, 1, 2, ...` are tried until
    /// a candidate matches the stored name or does not exist under the
    /// root directory.
    #[must_use]
    pub fn generate_unique_filename(
        &self,
        doc: &Document,
        archive_filename: bool,
        probe: &impl FileProbe,
    ) -> String {
        let settings = self.settings();
        let (current, root) = if archive_filename {
            (doc.archive_filename.as_deref(), settings.archive_dir.as_path())
        } else {
            (doc.filename.as_deref(), settings.originals_dir.as_path())
        };

        if archive_filename {
            if let Some(original) = doc.filename.as_deref() {
                let candidate = format!("{}{ARCHIVE_EXTENSION}", strip_extension(original));
                if current == Some(candidate.as_str()) || !probe.exists(&root.join(&candidate)) {
                    return candidate;
                }
            }
        }

        let mut counter = 0;
        loop {
            let candidate = self.generate_filename(doc, counter, true, archive_filename);
            if current == Some(candidate.as_str()) {
                return candidate;
            }
            if !probe.exists(&root.join(&candidate)) {
                return candidate;
            }
            tracing::debug!(doc_id = doc.id, candidate = %candidate, "filename taken");
            counter += 1;
        }
    }
}

/// `name` without the extension of its final component. A leading dot
/// does not start an extension.
fn strip_extension(name: &str) -> &str {
    let base_start = name.rfind('/').map_or(0, |i| i + 1);
    let base = &name[base_start..];
    let leading_dots = base.len() - base.trim_start_matches('.').len();
    match base[leading_dots..].rfind('.') {
        Some(dot) => &name[..base_start + leading_dots + dot],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    use chrono::{TimeZone, Utc};
    use docfile_core::Settings;
    use proptest::prelude::*;

    /// In-memory set of existing paths.
    #[derive(Default)]
    struct Existing(BTreeSet<PathBuf>);

    impl Existing {
        fn with(paths: &[&str]) -> Self {
            Self(paths.iter().map(PathBuf::from).collect())
        }
    }

    impl FileProbe for Existing {
        fn exists(&self, path: &Path) -> bool {
            self.0.contains(path)
        }
    }

    fn settings() -> Settings {
        Settings {
            filename_format: Some("{{ title }}".to_string()),
            originals_dir: PathBuf::from("/orig"),
            archive_dir: PathBuf::from("/arch"),
            ..Settings::default()
        }
    }

    fn doc() -> Document {
        Document::new(7, "Letter", Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn free_name_is_taken_as_is() {
        let settings = settings();
        let generator = FilenameGenerator::new(&settings);
        let name = generator.generate_unique_filename(&doc(), false, &Existing::default());
        assert_eq!(name, "Letter.pdf");
    }

    #[test]
    fn collisions_increment_counter() {
        let settings = settings();
        let generator = FilenameGenerator::new(&settings);
        let existing = Existing::with(&["/orig/Letter.pdf", "/orig/Letter_01.pdf"]);
        let name = generator.generate_unique_filename(&doc(), false, &existing);
        assert_eq!(name, "Letter_02.pdf");
    }

    #[test]
    fn current_name_is_kept() {
        let settings = settings();
        let generator = FilenameGenerator::new(&settings);
        let mut doc = doc();
        doc.filename = Some("Letter_01.pdf".to_string());
        let existing = Existing::with(&["/orig/Letter.pdf", "/orig/Letter_01.pdf"]);
        assert_eq!(generator.generate_unique_filename(&doc, false, &existing), "Letter_01.pdf");
    }

    #[test]
    fn archive_name_mirrors_original() {
        let settings = settings();
        let generator = FilenameGenerator::new(&settings);
        let mut doc = doc();
        doc.mime_type = "image/png".to_string();
        doc.filename = Some("2024/scan_03.png".to_string());
        let name = generator.generate_unique_filename(&doc, true, &Existing::default());
        assert_eq!(name, "2024/scan_03.pdf");
    }

    #[test]
    fn archive_falls_back_when_mirror_is_taken() {
        let settings = settings();
        let generator = FilenameGenerator::new(&settings);
        let mut doc = doc();
        doc.filename = Some("scan.png".to_string());
        let existing = Existing::with(&["/arch/scan.pdf"]);
        assert_eq!(generator.generate_unique_filename(&doc, true, &existing), "Letter.pdf");
    }

    #[test]
    fn archive_mirror_matching_current_is_kept() {
        let settings = settings();
        let generator = FilenameGenerator::new(&settings);
        let mut doc = doc();
        doc.filename = Some("scan.png".to_string());
        doc.archive_filename = Some("scan.pdf".to_string());
        let existing = Existing::with(&["/arch/scan.pdf"]);
        assert_eq!(generator.generate_unique_filename(&doc, true, &existing), "scan.pdf");
    }

    #[test]
    fn local_fs_sees_real_files() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            originals_dir: dir.path().to_path_buf(),
            ..settings()
        };
        std::fs::write(dir.path().join("Letter.pdf"), b"x").unwrap();

        let generator = FilenameGenerator::new(&settings);
        assert_eq!(generator.generate_unique_filename(&doc(), false, &LocalFs), "Letter_01.pdf");
    }

    #[test]
    fn strip_extension_matches_splitext() {
        assert_eq!(strip_extension("a/b.c.png"), "a/b.c");
        assert_eq!(strip_extension("a.d/b"), "a.d/b");
        assert_eq!(strip_extension(".hidden"), ".hidden");
        assert_eq!(strip_extension("dir/..x.tar"), "dir/..x");
        assert_eq!(strip_extension("plain"), "plain");
    }

    proptest! {
        #[test]
        fn unique_name_is_stable(taken in prop::collection::btree_set(0u32..6, 0..6)) {
            let settings = settings();
            let generator = FilenameGenerator::new(&settings);
            let existing = Existing(
                taken
                    .iter()
                    .map(|n| {
                        let suffix = if *n == 0 { String::new() } else { format!("_{n:02}") };
                        PathBuf::from(format!("/orig/Letter{suffix}.pdf"))
                    })
                    .collect(),
            );

            let mut doc = doc();
            let first = generator.generate_unique_filename(&doc, false, &existing);
            prop_assert!(!existing.exists(&settings.originals_dir.join(&first)));

            doc.filename = Some(first.clone());
            let second = generator.generate_unique_filename(&doc, false, &existing);
            prop_assert_eq!(first, second);
        }
    }
}
