//! Translation of a single Django field into a migration column.

use dr_core::{Advisory, AdvisoryKind, SourceField, TargetField, TargetType, Translated, Value};

use crate::coerce::coerce;
use crate::typemap::SourceFieldType;

/// Fields Rails manages through `t.timestamps`; they are never translated.
pub const OMITTED_FIELDS: &[&str] = &["created_at", "updated_at"];

/// Django flags that fill a field in automatically on save.
const LIFECYCLE_FLAGS: &[&str] = &["auto_now", "auto_now_add"];

/// Translates one field of `model` into a column.
///
/// Returns `None` for omitted fields, for `ManyToManyField` (which only
/// becomes an association) and for unknown types. An unknown type also raises
/// an [`AdvisoryKind::UnknownFieldType`] advisory.
///
/// After the type table, named arguments override the column in this order:
///
/// 1. `db_column` renames the column
/// 2. `db_index` sets the index flag (only `True` indexes)
/// 3. `default` becomes the `default` option
/// 4. `null=False` narrows `null`, but only if the type already declared it
/// 5. `unique` sets the uniqueness flag when it is a boolean
///
/// A unique column without an index raises an
/// [`AdvisoryKind::UnenforcedConstraint`] advisory, since only indexed
/// columns get a unique `add_index`.
///
/// Decimal columns then take `max_digits` as `precision` and
/// `decimal_places` as `scale`; string columns take `max_length` as `limit`.
///
/// # Examples
///
/// ```
/// use dr_convert::translate_field;
/// use dr_core::{SourceField, TargetType, Value};
/// use dr_py_parser::parse_arguments;
///
/// let field = SourceField::new("name", "CharField", parse_arguments("max_length=40"));
/// let column = translate_field("Widget", &field).value.expect("a column");
///
/// assert_eq!(column.target_type, TargetType::String);
/// assert_eq!(column.arguments.get("limit"), Some(&Value::Integer(40)));
/// ```
pub fn translate_field(model: &str, field: &SourceField) -> Translated<Option<TargetField>> {
    if OMITTED_FIELDS.contains(&field.name.as_str()) {
        return Translated::new(None);
    }

    let Ok(source_type) = field.type_name.parse::<SourceFieldType>() else {
        return Translated::new(None)
            .with_advisory(Advisory::unknown_field_type(model, &field.name));
    };

    let Some(mapping) = source_type.mapping() else {
        return Translated::new(None);
    };

    let mut advisories = Vec::new();

    let name = if mapping.id_suffix {
        format!("{}_id", field.name)
    } else {
        field.name.clone()
    };
    let mut column = TargetField::new(name, mapping.target_type);
    column.has_index = mapping.indexed;
    for (key, value) in mapping.defaults {
        column.arguments.insert(*key, value.clone());
    }
    if let Some(template) = mapping.advisory {
        advisories.push(template.render(model, &field.name));
    }

    apply_overrides(&mut column, field, &mut advisories);
    apply_type_overrides(&mut column, field, &mut advisories);

    if column.is_unique == Some(true) && !column.has_index {
        advisories.push(Advisory::new(
            AdvisoryKind::UnenforcedConstraint,
            format!(
                "`{model}#{}` is unique but has no index. Add `db_index=True` or a unique index to enforce it",
                field.name
            ),
        ));
    }

    for flag in LIFECYCLE_FLAGS {
        if field
            .arguments
            .named(flag)
            .is_some_and(|raw| raw.trim() != "False")
        {
            advisories.push(Advisory::new(
                AdvisoryKind::LifecycleHook,
                format!(
                    "`{model}#{}` is `{flag}`. This should be set to `Time.now` in a callback in the model",
                    field.name
                ),
            ));
        }
    }

    Translated {
        value: Some(column),
        advisories,
    }
}

/// Overrides that apply to every column type.
fn apply_overrides(column: &mut TargetField, field: &SourceField, advisories: &mut Vec<Advisory>) {
    let arguments = &field.arguments;

    if let Some(raw) = arguments.named("db_column") {
        column.name = match coerce(raw).collect_into(advisories) {
            Value::Str(name) => name,
            _ => raw.trim().to_owned(),
        };
    }

    if let Some(raw) = arguments.named("db_index") {
        column.has_index = coerce(raw).collect_into(advisories).is_true();
    }

    if let Some(raw) = arguments.named("default") {
        let value = coerce(raw).collect_into(advisories);
        column.arguments.insert("default", value);
    }

    if arguments.named("null").map(str::trim) == Some("False")
        && column.arguments.contains_key("null")
    {
        column.arguments.insert("null", Value::Bool(false));
    }

    if let Some(raw) = arguments.named("unique") {
        if let Some(unique) = coerce(raw).collect_into(advisories).as_bool() {
            column.is_unique = Some(unique);
        }
    }
}

/// Overrides that only make sense for decimal and string columns.
fn apply_type_overrides(
    column: &mut TargetField,
    field: &SourceField,
    advisories: &mut Vec<Advisory>,
) {
    let renames: &[(&str, &str)] = match column.target_type {
        TargetType::Decimal => &[("max_digits", "precision"), ("decimal_places", "scale")],
        TargetType::String => &[("max_length", "limit")],
        _ => &[],
    };

    for (source_key, option) in renames {
        if let Some(raw) = field.arguments.named(source_key) {
            let value = coerce(raw).collect_into(advisories);
            column.arguments.insert(*option, value);
        }
    }
}
