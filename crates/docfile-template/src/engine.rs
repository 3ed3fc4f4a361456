//! The three template environments and the glue around them.
//!
//! - [`Mode::Strict`]: undefined variables are errors. Used for real
//!   filenames.
//! - [`Mode::Debug`]: undefined variables print back as `{{ name }}` so a
//!   later parse of the output can list them.
//! - [`Mode::Preview`]: undefined variables print as nothing and chained
//!   access on them never fails.
//!
//! Environments are built once per process and shared read-only.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, LazyLock};

use minijinja::value::{Enumerator, Object, ObjectRepr, Value};
use minijinja::{Environment, Error, ErrorKind, Output, State, UndefinedBehavior};

use crate::error::TemplateError;
use crate::tags::{TagMap, DIRECT_USE_ERROR};
use crate::variables::TemplateVariables;

/// Names the engine provides itself and that never need a variable.
const BUILTIN_NAMES: &[&str] = &[
    "caller",
    "cycler",
    "debug",
    "dict",
    "joiner",
    "kwargs",
    "loop",
    "namespace",
    "range",
    "self",
    "super",
    "varargs",
];

/// How a template is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Strict,
    Debug,
    Preview,
}

static STRICT: LazyLock<Environment<'static>> =
    LazyLock::new(|| build_environment(UndefinedBehavior::Strict, false));
static DEBUG: LazyLock<Environment<'static>> =
    LazyLock::new(|| build_environment(UndefinedBehavior::Chainable, true));
static PREVIEW: LazyLock<Environment<'static>> =
    LazyLock::new(|| build_environment(UndefinedBehavior::Chainable, false));

impl Mode {
    fn environment(self) -> &'static Environment<'static> {
        match self {
            Self::Strict => &STRICT,
            Self::Debug => &DEBUG,
            Self::Preview => &PREVIEW,
        }
    }
}

fn build_environment(undefined: UndefinedBehavior, debug: bool) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(undefined);
    env.set_formatter(guarded_formatter);
    env.add_filter("default", default_filter);
    env.add_filter("d", default_filter);
    if debug {
        env.add_test("defined", is_defined);
        env.add_test("undefined", is_undefined);
    }
    env
}

/// Render `template` against `variables` in the given mode.
///
/// # Errors
///
/// Returns a [`TemplateError`] if the template does not parse or the
/// render fails.
pub fn render(
    mode: Mode,
    template: &str,
    variables: &TemplateVariables,
) -> Result<String, TemplateError> {
    let context = match mode {
        Mode::Debug => {
            let placeholders = undeclared_names(template)?
                .into_iter()
                .filter(|name| !variables.contains(name))
                .map(|name| {
                    let value = DebugUndefined::value(&name);
                    (name, value)
                })
                .collect::<Vec<_>>();
            variables.with_extra(placeholders)
        }
        Mode::Strict | Mode::Preview => variables.to_context(),
    };
    Ok(mode.environment().render_str(template, context)?)
}

/// Names `template` reads without defining them itself, excluding the
/// engine's own globals.
///
/// # Errors
///
/// Returns [`TemplateError::Syntax`] if the template does not parse.
pub fn undeclared_names(template: &str) -> Result<BTreeSet<String>, TemplateError> {
    let env = Environment::new();
    let parsed = env.template_from_str(template)?;
    Ok(parsed
        .undeclared_variables(false)
        .into_iter()
        .filter(|name| !BUILTIN_NAMES.contains(&name.as_str()))
        .collect())
}

fn guarded_formatter(out: &mut Output<'_>, state: &State<'_, '_>, value: &Value) -> Result<(), Error> {
    if value.downcast_object_ref::<TagMap>().is_some() {
        return Err(Error::new(ErrorKind::InvalidOperation, DIRECT_USE_ERROR));
    }
    minijinja::escape_formatter(out, state, value)
}

/// Placeholder for a variable the debug render does not know. Prints as
/// `{{ name }}` and behaves as undefined everywhere else: falsy, iterates
/// as empty, and every attribute is another placeholder.
#[derive(Debug)]
struct DebugUndefined {
    name: String,
}

impl DebugUndefined {
    fn value(name: &str) -> Value {
        Value::from_object(Self {
            name: name.to_string(),
        })
    }
}

impl Object for DebugUndefined {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Iterable
    }

    fn get_value(self: &Arc<Self>, _key: &Value) -> Option<Value> {
        Some(Self::value(&self.name))
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Empty
    }

    fn is_true(self: &Arc<Self>) -> bool {
        false
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{ {} }}}}", self.name)
    }
}

fn is_missing(value: &Value) -> bool {
    value.is_undefined() || value.downcast_object_ref::<DebugUndefined>().is_some()
}

fn is_defined(value: &Value) -> bool {
    !is_missing(value)
}

fn is_undefined(value: &Value) -> bool {
    is_missing(value)
}

/// `default(other='', lax=false)`: `other` if the value is undefined, or
/// with `lax` also if it is falsy.
fn default_filter(value: Value, other: Option<Value>, lax: Option<bool>) -> Value {
    let replace = is_missing(&value) || (lax.unwrap_or(false) && !value.is_true());
    if replace {
        other.unwrap_or_else(|| Value::from(""))
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docfile_core::LocalZone;

    fn vars() -> TemplateVariables {
        TemplateVariables::dummy()
    }

    #[test]
    fn strict_renders_known_variables() {
        let out = render(Mode::Strict, "{{ title }}/{{ doc_pk }}", &vars()).unwrap();
        assert_eq!(out, "title/doc_pk");
    }

    #[test]
    fn strict_rejects_unknown_variables() {
        let err = render(Mode::Strict, "{{ nope }}", &vars()).unwrap_err();
        assert!(matches!(err, TemplateError::Undefined(_)), "{err:?}");
    }

    #[test]
    fn debug_echoes_unknown_variables() {
        let out = render(Mode::Debug, "{{ title }}-{{ nope }}-{{ other.attr }}", &vars()).unwrap();
        assert_eq!(out, "title-{{ nope }}-{{ other }}");
    }

    #[test]
    fn debug_defaults_apply_to_unknown_variables() {
        let out = render(Mode::Debug, "{{ nope | default('x') }}{{ nope | d('y') }}", &vars())
            .unwrap();
        assert_eq!(out, "xy");

        let out = render(
            Mode::Debug,
            "{% if nope is defined %}yes{% else %}no{% endif %}",
            &vars(),
        )
        .unwrap();
        assert_eq!(out, "no");
    }

    #[test]
    fn debug_iterates_unknown_variables_as_empty() {
        let out = render(
            Mode::Debug,
            "{% for x in nope %}{{ x }}{% endfor %}{{ title }}",
            &vars(),
        )
        .unwrap();
        assert_eq!(out, "title");

        let out = render(Mode::Debug, "{{ nope | length }}-{{ nope.attr }}", &vars()).unwrap();
        assert_eq!(out, "0-{{ nope }}");
    }

    #[test]
    fn preview_blanks_unknown_variables() {
        let out = render(Mode::Preview, "{{ title }}{{ nope }}{{ nope.deeper[0] }}", &vars())
            .unwrap();
        assert_eq!(out, "title");
    }

    #[test]
    fn lax_default_replaces_falsy_values() {
        let out = render(Mode::Preview, "{{ '' | d('fallback', true) }}", &vars()).unwrap();
        assert_eq!(out, "fallback");
        let out = render(Mode::Preview, "{{ '' | d('fallback') }}", &vars()).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn printing_tags_fails_in_every_mode() {
        let doc = docfile_core::Document::new(1, "t", chrono::Utc::now());
        let variables =
            TemplateVariables::for_document(&doc, LocalZone::default());
        for mode in [Mode::Strict, Mode::Debug, Mode::Preview] {
            let err = render(mode, "{{ tags }}", &variables).unwrap_err();
            assert!(err.to_string().contains(DIRECT_USE_ERROR), "{mode:?}: {err}");
        }
    }

    #[test]
    fn tag_lookups_render() {
        let mut doc = docfile_core::Document::new(1, "t", chrono::Utc::now());
        doc.tags = vec!["b".into(), "kind_Bill".into()];
        let variables =
            TemplateVariables::for_document(&doc, LocalZone::default());
        let out = render(
            Mode::Strict,
            "{{ tags[0] }}/{{ tags['kind'] }}/{{ tags.kind }}/{{ tags[9] }}",
            &variables,
        )
        .unwrap();
        assert_eq!(out, "b/bill/bill/none");
    }

    #[test]
    fn tag_lookups_transliterate_accents() {
        let mut doc = docfile_core::Document::new(1, "t", chrono::Utc::now());
        doc.tags = vec!["Büro".into(), "typ_Rechnung für Müller".into()];
        let variables = TemplateVariables::for_document(&doc, LocalZone::default());
        let out = render(Mode::Strict, "{{ tags[0] }}|{{ tags['typ'] }}", &variables).unwrap();
        assert_eq!(out, "buro|rechnung-fur-muller");
    }

    #[test]
    fn undeclared_names_skip_locals_and_builtins() {
        let names = undeclared_names(
            "{% for i in range(3) %}{{ i }}{{ loop.index }}{% endfor %}{% set x = 1 %}{{ x }}{{ a }}{{ b.c }}",
        )
        .unwrap();
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn undeclared_names_report_syntax_errors() {
        let err = undeclared_names("{{ title").unwrap_err();
        assert!(matches!(err, TemplateError::Syntax(_)));
    }
}
