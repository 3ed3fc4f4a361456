//! # docfile-template
//!
//! Renders storage path templates against document metadata.
//!
//! Includes:
//! - Variable builder ([`TemplateVariables`]) and the `tags` mapping
//! - Strict rendering for real filenames ([`Templater::render`])
//! - Validation with itemized errors and a preview ([`Templater::validate`])

pub mod engine;
pub mod error;
pub mod tags;
pub mod variables;

use serde::Serialize;

use docfile_core::{Document, LocalZone, Settings};

pub use error::TemplateError;
pub use tags::TagMap;
pub use variables::{TemplateVariables, VARIABLE_NAMES};

use engine::Mode;

/// Text reported for a debug string or preview that was never produced.
pub const NOT_RENDERED: &str = "<NOT RENDERED>";

/// Error reported when a template renders to nothing.
pub const EMPTY_RESULT_ERROR: &str = "Template results in empty string!";

/// Outcome of [`Templater::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Render with unknown variables echoed back as `{{ name }}`.
    pub debug_string: String,
    /// Best-effort render with unknown variables left blank.
    pub preview: String,
    pub errors: Vec<String>,
    /// Currently never populated.
    pub warnings: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self {
            debug_string: NOT_RENDERED.to_string(),
            preview: NOT_RENDERED.to_string(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl ValidationResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Renders and validates templates in one local time zone.
#[derive(Debug, Clone, Copy)]
pub struct Templater {
    zone: LocalZone,
}

impl Templater {
    #[must_use]
    pub fn new(zone: LocalZone) -> Self {
        Self { zone }
    }

    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.time_zone)
    }

    /// Render `template` strictly for `doc`.
    ///
    /// Returns `None` (and logs why) when there is no document or the
    /// template fails to parse or render.
    #[must_use]
    pub fn render(&self, template: &str, doc: Option<&Document>, remove_new_lines: bool) -> Option<String> {
        let Some(doc) = doc else {
            tracing::error!("cannot render template {template:?} without a document");
            return None;
        };

        let variables = TemplateVariables::for_document(doc, self.zone);
        match engine::render(Mode::Strict, template, &variables) {
            Ok(mut rendered) => {
                if remove_new_lines {
                    rendered.retain(|c| c != '\n');
                }
                tracing::debug!(doc_id = doc.id, rendered = %rendered, "rendered template");
                Some(rendered)
            }
            Err(err) => {
                tracing::error!(doc_id = doc.id, template, "template render failed: {}", err.describe());
                None
            }
        }
    }

    /// Check `template` and produce a preview.
    ///
    /// Uses `doc`'s variables when given, otherwise variables that render
    /// as their own names. Never fails; problems end up in
    /// [`ValidationResult::errors`].
    #[must_use]
    pub fn validate(
        &self,
        template: &str,
        allow_empty_output: bool,
        remove_new_lines: bool,
        doc: Option<&Document>,
    ) -> ValidationResult {
        let variables = match doc {
            Some(doc) => TemplateVariables::for_document(doc, self.zone),
            None => TemplateVariables::dummy(),
        };

        let mut result = ValidationResult::default();
        if let Err(err) = run_validation(
            template,
            allow_empty_output,
            remove_new_lines,
            &variables,
            &mut result,
        ) {
            tracing::info!(template, "template validation failed: {err}");
            result.errors.push(err.describe());
        }
        result
    }
}

fn run_validation(
    template: &str,
    allow_empty_output: bool,
    remove_new_lines: bool,
    variables: &TemplateVariables,
    result: &mut ValidationResult,
) -> Result<(), TemplateError> {
    let debug_string = strip_new_lines(engine::render(Mode::Debug, template, variables)?, remove_new_lines);
    result.debug_string = debug_string;

    for name in engine::undeclared_names(&result.debug_string)? {
        result.errors.push(format!("Undefined variable: {name}"));
    }

    let preview = strip_new_lines(engine::render(Mode::Preview, template, variables)?, remove_new_lines);
    if !allow_empty_output && preview.trim().is_empty() {
        result.errors.push(EMPTY_RESULT_ERROR.to_string());
    }
    result.preview = preview;
    Ok(())
}

fn strip_new_lines(mut text: String, remove: bool) -> String {
    if remove {
        text.retain(|c| c != '\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use docfile_core::Tag;

    fn templater() -> Templater {
        Templater::new(LocalZone::default())
    }

    fn foobar() -> Document {
        let mut doc = Document::new(1, "FooBar", Utc.with_ymd_and_hms(2020, 6, 25, 7, 36, 51).unwrap());
        doc.tags = vec![Tag::new("t")];
        doc
    }

    #[test]
    fn render_title_and_first_tag() {
        let out = templater().render("{{title}}/{{tags[0]}}", Some(&foobar()), false);
        assert_eq!(out.as_deref(), Some("FooBar/t"));
    }

    #[test]
    fn render_without_document_is_none() {
        assert_eq!(templater().render("{{ title }}", None, false), None);
    }

    #[test]
    fn render_syntax_error_is_none() {
        assert_eq!(templater().render("{{title", Some(&foobar()), false), None);
    }

    #[test]
    fn render_undefined_variable_is_none() {
        assert_eq!(templater().render("FooBar/{{NotExisting}}", Some(&foobar()), false), None);
    }

    #[test]
    fn render_direct_tags_is_none() {
        assert_eq!(templater().render("{{ tags }}", Some(&foobar()), false), None);
    }

    #[test]
    fn render_removes_new_lines_on_request() {
        let template = "{{ title }}\n/{{ created_year }}\n";
        let doc = foobar();
        assert_eq!(
            templater().render(template, Some(&doc), true).as_deref(),
            Some("FooBar/2020")
        );
        assert_eq!(
            templater().render(template, Some(&doc), false).as_deref(),
            Some("FooBar\n/2020")
        );
    }

    #[test]
    fn render_uses_local_dates() {
        let mut doc = foobar();
        doc.created = Utc.with_ymd_and_hms(2020, 12, 31, 22, 0, 0).unwrap();
        let east = Templater::new("+03:00".parse().unwrap());
        assert_eq!(
            east.render("{{ created_year }}-{{ created_month }}", Some(&doc), false).as_deref(),
            Some("2021-01")
        );
        assert_eq!(
            templater().render("{{ created_year }}-{{ created_month }}", Some(&doc), false).as_deref(),
            Some("2020-12")
        );
    }

    #[test]
    fn render_follows_daylight_saving() {
        let berlin = Templater::new("Europe/Berlin".parse().unwrap());
        let mut doc = foobar();
        doc.created = Utc.with_ymd_and_hms(2024, 7, 1, 22, 30, 0).unwrap();
        assert_eq!(
            berlin.render("{{ created_day }}", Some(&doc), false).as_deref(),
            Some("02")
        );
        doc.created = Utc.with_ymd_and_hms(2024, 1, 1, 22, 30, 0).unwrap();
        assert_eq!(
            berlin.render("{{ created_day }}", Some(&doc), false).as_deref(),
            Some("01")
        );
    }

    #[test]
    fn validate_iterates_unknown_variables_as_empty() {
        let result = templater().validate(
            "{% for x in nope %}{{ x }}{% endfor %}{{ title }}",
            false,
            false,
            None,
        );
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert_eq!(result.preview, "title");
    }

    #[test]
    fn validate_reports_syntax_error_once() {
        let result = templater().validate("{{title", false, false, None);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("Syntax error:"), "{:?}", result.errors);
        assert_eq!(result.debug_string, NOT_RENDERED);
        assert_eq!(result.preview, NOT_RENDERED);
    }

    #[test]
    fn validate_empty_template() {
        let strict = templater().validate("", false, false, None);
        assert_eq!(strict.errors, vec![EMPTY_RESULT_ERROR.to_string()]);

        let lenient = templater().validate("", true, false, None);
        assert!(lenient.is_valid());
        assert_eq!(lenient.preview, "");
    }

    #[test]
    fn validate_whitespace_output_is_empty() {
        let result = templater().validate("  {{ nope }} ", false, false, None);
        assert!(result.errors.contains(&EMPTY_RESULT_ERROR.to_string()));
    }

    #[test]
    fn validate_lists_each_undefined_variable() {
        let result = templater().validate("{{title}}{{UNKNOWN}}{{BAR}}", false, false, None);
        assert_eq!(
            result.errors,
            vec![
                "Undefined variable: BAR".to_string(),
                "Undefined variable: UNKNOWN".to_string()
            ]
        );
        assert_eq!(result.preview, "title");
        assert_eq!(result.debug_string, "title{{ UNKNOWN }}{{ BAR }}");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn validate_with_document_uses_real_values() {
        let result = templater().validate("{{ title }}/{{ tags[0] }}", false, false, Some(&foobar()));
        assert!(result.is_valid(), "{:?}", result.errors);
        assert_eq!(result.preview, "FooBar/t");
        assert_eq!(result.debug_string, "FooBar/t");
    }

    #[test]
    fn validate_direct_tags_is_an_exception() {
        let result = templater().validate("{{ tags }}", false, false, Some(&foobar()));
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("Exception:"), "{:?}", result.errors);
        assert!(result.errors[0].contains(tags::DIRECT_USE_ERROR));
    }

    #[test]
    fn validate_accepts_defaults_for_unknown_variables() {
        let result = templater().validate("{{ nope | d('x') }}/{{ title }}", false, false, None);
        assert!(result.is_valid(), "{:?}", result.errors);
        assert_eq!(result.preview, "x/title");
    }

    #[test]
    fn validation_result_serializes() {
        let json = serde_json::to_value(ValidationResult::default()).unwrap();
        assert_eq!(json["debug_string"], NOT_RENDERED);
        assert_eq!(json["errors"], serde_json::json!([]));
    }
}
