//! `create_table` migration rendering.

use std::fmt::Write;

use dr_core::{Inflector, TargetModel};

use super::{RenderSettings, push_options, ruby_symbol};

/// Returns the migration class name, `Create` plus the pluralized model name.
pub fn migration_class_name(model: &TargetModel, inflector: &impl Inflector) -> String {
    format!("Create{}", inflector.pluralize(&model.name))
}

/// Renders the migration creating the table of `model`.
///
/// Columns and `add_index` statements follow the column order of the model.
/// A unique index is written for indexed columns declared unique.
///
/// # Examples
///
/// ```
/// use dr_convert::render::{RenderSettings, render_migration};
/// use dr_core::{Associations, EnglishInflector, TargetModel};
///
/// let model = TargetModel {
///     name: "Tag".to_owned(),
///     table: "tags".to_owned(),
///     fields: Vec::new(),
///     associations: Associations::default(),
/// };
///
/// let migration = render_migration(&model, &RenderSettings::default(), &EnglishInflector);
/// assert!(migration.starts_with("class CreateTags < ActiveRecord::Migration[7.1]\n"));
/// ```
pub fn render_migration(
    model: &TargetModel,
    settings: &RenderSettings,
    inflector: &impl Inflector,
) -> String {
    let mut out = String::new();

    let superclass = if settings.migration_version.is_empty() {
        "ActiveRecord::Migration".to_owned()
    } else {
        format!("ActiveRecord::Migration[{}]", settings.migration_version)
    };
    let table = ruby_symbol(&model.table);

    let _ = writeln!(
        out,
        "class {} < {superclass}",
        migration_class_name(model, inflector)
    );
    out.push_str("  def change\n");
    let _ = writeln!(out, "    create_table {table} do |t|");

    for field in &model.fields {
        let mut line = format!(
            "      t.{} {}",
            field.target_type,
            ruby_symbol(&field.name)
        );
        push_options(&mut line, &field.arguments);
        out.push_str(&line);
        out.push('\n');
    }
    if !model.fields.is_empty() {
        out.push('\n');
    }
    out.push_str("      t.timestamps\n");
    out.push_str("    end\n");

    let mut indexed = model.indexed_fields().peekable();
    if indexed.peek().is_some() {
        out.push('\n');
    }
    for field in indexed {
        let _ = write!(out, "    add_index {table}, {}", ruby_symbol(&field.name));
        if field.is_unique == Some(true) {
            out.push_str(", unique: true");
        }
        out.push('\n');
    }

    out.push_str("  end\n");
    out.push_str("end\n");
    out
}
