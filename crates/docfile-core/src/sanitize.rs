//! Filename sanitizing and slug helpers.
//!
//! Template variables are interpolated into file paths, so every free-text
//! value has to be made safe for use as a single path component first.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Characters illegal in filenames on at least one mainstream platform.
const INVALID_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Windows device names that cannot be used as a file stem.
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Maximum filename length in bytes.
pub const MAX_FILENAME_BYTES: usize = 255;

static SLUG_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid slug regex"));
static SLUG_COLLAPSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid slug regex"));

/// Make `text` usable as one path component.
///
/// Illegal characters and control characters are replaced by
/// `replacement`, trailing spaces and dots are dropped, reserved device
/// names get a `_` suffix and the result is cut to
/// [`MAX_FILENAME_BYTES`] on a char boundary.
#[must_use]
pub fn sanitize_filename(text: &str, replacement: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());
    for c in text.chars() {
        if INVALID_CHARS.contains(&c) || c.is_control() {
            sanitized.push_str(replacement);
        } else {
            sanitized.push(c);
        }
    }

    let mut sanitized = sanitized.trim_end_matches([' ', '.']).to_string();

    let stem = sanitized.split('.').next().unwrap_or_default();
    if RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(stem.trim_end()))
    {
        sanitized.push('_');
    }

    truncate_bytes(&mut sanitized, MAX_FILENAME_BYTES);
    sanitized
}

/// Reduce `text` to a lowercase ASCII slug.
///
/// Accented letters are decomposed (NFKD) and lose their marks. Only word characters, whitespace and hyphens survive; runs of whitespace
/// and hyphens become one hyphen and leading/trailing `-`/`_` are trimmed.
#[must_use]
pub fn slugify(text: &str) -> String {
    let ascii: String = text
        .nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_lowercase();
    let stripped = SLUG_STRIP.replace_all(&ascii, "");
    let collapsed = SLUG_COLLAPSE.replace_all(&stripped, "-");
    collapsed.trim_matches(['-', '_']).to_string()
}

fn truncate_bytes(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}
