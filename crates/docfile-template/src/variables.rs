//! Template variables derived from a document.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use minijinja::Value;

use docfile_core::sanitize::sanitize_filename;
use docfile_core::{Document, LocalZone, NO_VALUE};

use crate::tags::TagMap;

/// Every variable a filename template can use.
pub const VARIABLE_NAMES: &[&str] = &[
    "title",
    "correspondent",
    "document_type",
    "created",
    "created_year",
    "created_year_short",
    "created_month",
    "created_month_name",
    "created_month_name_short",
    "created_day",
    "added",
    "added_year",
    "added_year_short",
    "added_month",
    "added_month_name",
    "added_month_name_short",
    "added_day",
    "asn",
    "tags",
    "tag_list",
    "owner_username",
    "original_name",
    "doc_pk",
];

/// Replacement for characters that cannot appear in a filename.
const REPLACEMENT: &str = "-";

/// Name → value mapping a template is rendered against.
#[derive(Debug, Clone)]
pub struct TemplateVariables {
    values: BTreeMap<String, Value>,
}

impl TemplateVariables {
    /// Build the variables for `doc`, taking dates in `zone`.
    #[must_use]
    pub fn for_document(doc: &Document, zone: LocalZone) -> Self {
        let mut values = BTreeMap::new();

        values.insert("title".to_string(), Value::from(sanitize(&doc.title)));
        values.insert(
            "correspondent".to_string(),
            Value::from(sanitized_or_none(doc.correspondent.as_deref())),
        );
        values.insert(
            "document_type".to_string(),
            Value::from(sanitized_or_none(doc.document_type.as_deref())),
        );

        insert_dates(&mut values, "created", zone.local_date(doc.created));
        insert_dates(&mut values, "added", zone.local_date(doc.added));

        let asn = match doc.archive_serial_number {
            Some(asn) if asn > 0 => asn.to_string(),
            _ => NO_VALUE.to_string(),
        };
        values.insert("asn".to_string(), Value::from(asn));

        values.insert(
            "tags".to_string(),
            Value::from_object(TagMap::from_tags(&doc.tags)),
        );
        let mut tag_names: Vec<&str> = doc.tags.iter().map(|t| t.name.as_str()).collect();
        tag_names.sort_unstable();
        values.insert(
            "tag_list".to_string(),
            Value::from(sanitize(&tag_names.join(","))),
        );

        values.insert(
            "owner_username".to_string(),
            Value::from(sanitized_or_none(doc.owner.as_deref())),
        );
        values.insert(
            "original_name".to_string(),
            Value::from(original_name(doc.original_filename.as_deref())),
        );
        values.insert("doc_pk".to_string(), Value::from(format!("{:07}", doc.id)));

        Self { values }
    }

    /// Variables for validating a template without a document: every
    /// variable renders as its own name.
    #[must_use]
    pub fn dummy() -> Self {
        let values = VARIABLE_NAMES
            .iter()
            .map(|name| ((*name).to_string(), Value::from(*name)))
            .collect();
        Self { values }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The variables as a template context.
    #[must_use]
    pub fn to_context(&self) -> Value {
        self.with_extra(std::iter::empty())
    }

    /// The variables plus `extra` entries for names not already defined.
    pub(crate) fn with_extra<I>(&self, extra: I) -> Value
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut values = self.values.clone();
        for (name, value) in extra {
            values.entry(name).or_insert(value);
        }
        Value::from(values)
    }
}

fn sanitize(text: &str) -> String {
    sanitize_filename(text, REPLACEMENT)
}

fn sanitized_or_none(text: Option<&str>) -> String {
    text.map_or_else(|| NO_VALUE.to_string(), sanitize)
}

/// Final component of `name` without its last extension.
fn original_name(name: Option<&str>) -> String {
    name.and_then(|n| std::path::Path::new(n).file_stem())
        .and_then(|stem| stem.to_str())
        .map_or_else(|| NO_VALUE.to_string(), str::to_string)
}

fn insert_dates(values: &mut BTreeMap<String, Value>, prefix: &str, date: NaiveDate) {
    let formats = [
        ("", "%Y-%m-%d"),
        ("_year", "%Y"),
        ("_year_short", "%y"),
        ("_month", "%m"),
        ("_month_name", "%B"),
        ("_month_name_short", "%b"),
        ("_day", "%d"),
    ];
    for (suffix, format) in formats {
        values.insert(
            format!("{prefix}{suffix}"),
            Value::from(date.format(format).to_string()),
        );
    }
}
