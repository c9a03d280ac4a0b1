//! Rendering of translated models as Ruby source.
//!
//! [`render_migration`] produces the `create_table` migration and
//! [`render_model`] the ActiveRecord class. Both are pure; the orchestrator
//! decides where the text goes.

mod migration;
mod model;

use std::fmt::Write;

use dr_core::config::{DEFAULT_MIGRATION_VERSION, DEFAULT_MODEL_BASE_CLASS};
use dr_core::{Options, RunConfig, Value};

pub use migration::{migration_class_name, render_migration};
pub use model::render_model;

/// Settings that change the generated Ruby text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Version in `ActiveRecord::Migration[...]`; empty for none.
    pub migration_version: String,

    /// Superclass of generated model classes.
    pub model_base_class: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            migration_version: DEFAULT_MIGRATION_VERSION.to_owned(),
            model_base_class: DEFAULT_MODEL_BASE_CLASS.to_owned(),
        }
    }
}

impl RenderSettings {
    /// Takes the render settings from a run configuration.
    #[must_use]
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            migration_version: config.migration_version.trim().to_owned(),
            model_base_class: config.model_base_class.trim().to_owned(),
        }
    }
}

/// Renders a value as a Ruby literal.
///
/// # Examples
///
/// ```
/// use dr_convert::render::ruby_literal;
/// use dr_core::Value;
///
/// assert_eq!(ruby_literal(&Value::Nil), "nil");
/// assert_eq!(ruby_literal(&Value::Float(2.0)), "2.0");
/// assert_eq!(ruby_literal(&Value::Str("Writer".to_owned())), "\"Writer\"");
/// assert_eq!(ruby_literal(&Value::Symbol("memberships".to_owned())), ":memberships");
/// ```
pub fn ruby_literal(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Nil => "nil".to_owned(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => format!("{f:?}"),
        Value::Str(s) => ruby_string(s),
        Value::Symbol(name) => ruby_symbol(name),
        Value::Raw(token) => token.clone(),
    }
}

/// Renders options as `key: value, key: value`.
pub fn ruby_options(options: &Options) -> String {
    let mut out = String::new();
    for (i, (key, value)) in options.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{key}: {}", ruby_literal(value));
    }
    out
}

/// Appends `, key: value…` when there are options.
fn push_options(line: &mut String, options: &Options) {
    if !options.is_empty() {
        line.push_str(", ");
        line.push_str(&ruby_options(options));
    }
}

/// `:name`, or `:"odd name"` when the name is not a plain identifier.
fn ruby_symbol(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if plain {
        format!(":{name}")
    } else {
        format!(":{}", ruby_string(name))
    }
}

/// Double-quoted Ruby string with interpolation disabled.
fn ruby_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '#' if matches!(chars.peek(), Some('{' | '$' | '@')) => out.push_str("\\#"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
