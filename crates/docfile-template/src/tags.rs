//! The `tags` template variable.
//!
//! Tags are exposed as a mapping: `tags[0]`, `tags[1]`, ... give the
//! slugified tag names in name order, and a tag named `key_value` (or
//! `key-value`) additionally answers `tags['key']` / `tags.key` with its
//! value. Unknown keys never fail and yield [`MISSING_TAG`].
//!
//! Printing or iterating the mapping itself is an error: `{{ tags }}` is a
//! common template mistake that would otherwise put garbage in file names.

use std::collections::BTreeMap;
use std::sync::Arc;

use minijinja::value::{Enumerator, Object, ObjectRepr, Value, ValueKind};

use docfile_core::sanitize::slugify;
use docfile_core::Tag;

/// Value of any tag index or key that is not set (the slug of a missing
/// value).
pub const MISSING_TAG: &str = "none";

/// Message of the error raised when the whole mapping is output.
pub const DIRECT_USE_ERROR: &str = "Don't use {tags} directly.";

/// Index- and key-addressable view of a document's tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap {
    by_index: Vec<String>,
    by_key: BTreeMap<String, String>,
}

impl TagMap {
    /// Build the mapping from a document's tags.
    #[must_use]
    pub fn from_tags(tags: &[Tag]) -> Self {
        let mut sorted: Vec<&Tag> = tags.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        let mut map = Self::default();
        for tag in sorted {
            map.by_index.push(slugify(&tag.name));
            if let Some((key, value)) = tag.key_value() {
                map.by_key.insert(slugify(key), slugify(value));
            }
        }
        map
    }

    /// Tag slug at position `index`.
    #[must_use]
    pub fn index(&self, index: i64) -> &str {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.by_index.get(i))
            .map_or(MISSING_TAG, String::as_str)
    }

    /// Value of the `key_value` tag whose slugified key is `key`.
    #[must_use]
    pub fn key(&self, key: &str) -> &str {
        self.by_key.get(key).map_or(MISSING_TAG, String::as_str)
    }

    /// Resolve a template lookup. Integers address positions, strings
    /// address keys, anything else is missing.
    #[must_use]
    pub fn lookup(&self, key: &Value) -> &str {
        match key.kind() {
            ValueKind::Number => key.as_i64().map_or(MISSING_TAG, |i| self.index(i)),
            ValueKind::String => key.as_str().map_or(MISSING_TAG, |k| self.key(k)),
            _ => MISSING_TAG,
        }
    }
}

impl Object for TagMap {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Map
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        Some(Value::from(self.lookup(key)))
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::NonEnumerable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn map(names: &[&str]) -> TagMap {
        let tags: Vec<Tag> = names.iter().map(|n| Tag::new(*n)).collect();
        TagMap::from_tags(&tags)
    }

    #[test]
    fn indexes_slugs_in_name_order() {
        let tags = map(&["Zeta", "alpha beta", "Mid"]);
        assert_eq!(tags.index(0), "mid");
        assert_eq!(tags.index(1), "zeta");
        assert_eq!(tags.index(2), "alpha-beta");
    }

    #[test]
    fn key_value_tags_are_addressable_by_key() {
        let tags = map(&["type_Invoice", "year-2024", "inbox"]);
        assert_eq!(tags.key("type"), "invoice");
        assert_eq!(tags.key("year"), "2024");
        assert_eq!(tags.key("inbox"), MISSING_TAG);
    }

    #[test]
    fn missing_lookups_return_placeholder() {
        let tags = map(&["t"]);
        assert_eq!(tags.index(5), MISSING_TAG);
        assert_eq!(tags.index(-1), MISSING_TAG);
        assert_eq!(tags.lookup(&Value::from("nothing")), MISSING_TAG);
        assert_eq!(tags.lookup(&Value::from(true)), MISSING_TAG);
    }

    #[test]
    fn lookup_distinguishes_numbers_from_strings() {
        let tags = map(&["0_zero", "first"]);
        assert_eq!(tags.lookup(&Value::from(0)), "0_zero");
        assert_eq!(tags.lookup(&Value::from("0")), "zero");
    }

    proptest! {
        #[test]
        fn lookups_never_fail(
            names in prop::collection::vec("[a-z]{1,8}", 0..5),
            index in any::<i64>(),
            key in "\\PC{0,12}",
        ) {
            let tags = map(&names.iter().map(String::as_str).collect::<Vec<_>>());
            let mut sorted = names.clone();
            sorted.sort();
            let expected = usize::try_from(index)
                .ok()
                .and_then(|i| sorted.get(i))
                .map_or(MISSING_TAG, String::as_str);
            prop_assert_eq!(tags.index(index), expected);
            prop_assert_eq!(tags.lookup(&Value::from(key.as_str())), MISSING_TAG);
        }
    }
}
