//! Placeholder rewriting between `{name}` and `{{ name }}`.
//!
//! Only the simple placeholder grammar is handled: an identifier with an
//! optional single `[key]` index. Anything else (filters, nested access,
//! control blocks) passes through both directions unchanged.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Variables whose value is a mapping and whose bare-word keys need quotes
/// in the new syntax.
const MAPPING_VARIABLES: &[&str] = &["tags"];

/// An existing double-brace expression (kept verbatim), or a single-brace
/// placeholder with an optional `[key]`.
static LEGACY_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{[^{}]*\}\}|\{\s*(\w+)\s*(?:\[\s*([^\[\]{}|]+?)\s*\])?\s*\}")
        .expect("valid legacy placeholder regex")
});

/// A double-brace expression simple enough to express in the legacy syntax.
static SIMPLE_EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{\s*(\w+)\s*(?:\[\s*(\d+|'\w+'|"\w+"|\w+)\s*\])?\s*\}\}"#)
        .expect("valid simple expression regex")
});

/// Rewrite legacy `{name}` / `{name[key]}` placeholders as
/// `{{ name }}` / `{{ name[key] }}`.
#[must_use]
pub fn upgrade(path: &str) -> String {
    LEGACY_PLACEHOLDER
        .replace_all(path, |caps: &Captures<'_>| {
            let Some(name) = caps.get(1).map(|m| m.as_str()) else {
                return caps[0].to_string();
            };
            match caps.get(2).map(|m| m.as_str()) {
                Some(key) => format!("{{{{ {name}[{}] }}}}", upgrade_key(name, key)),
                None => format!("{{{{ {name} }}}}"),
            }
        })
        .into_owned()
}

/// Rewrite simple `{{ name }}` / `{{ name[key] }}` expressions back to
/// `{name}` / `{name[key]}`.
#[must_use]
pub fn downgrade(path: &str) -> String {
    SIMPLE_EXPRESSION
        .replace_all(path, |caps: &Captures<'_>| {
            let name = &caps[1];
            match caps.get(2).map(|m| m.as_str()) {
                Some(key) => format!("{{{name}[{}]}}", key.trim_matches(['\'', '"'])),
                None => format!("{{{name}}}"),
            }
        })
        .into_owned()
}

fn upgrade_key(name: &str, key: &str) -> String {
    let bare_word = key.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !key.chars().all(|c| c.is_ascii_digit());
    if bare_word && MAPPING_VARIABLES.contains(&name) {
        format!("'{key}'")
    } else {
        key.to_string()
    }
}
