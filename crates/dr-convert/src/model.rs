//! Translation of a whole Django model.

use dr_core::{Inflector, SourceModel, TargetModel, Translated};
use tracing::debug;

use crate::association::derive_associations;
use crate::field::translate_field;

/// Translates a Django model into a Rails model description.
///
/// Columns keep the order of the source fields, minus the fields that produce
/// no column. Column advisories come in field order, followed by association
/// advisories.
///
/// # Examples
///
/// ```
/// use dr_convert::translate_model;
/// use dr_core::{EnglishInflector, SourceField, SourceModel};
/// use dr_py_parser::parse_arguments;
///
/// let mut widget = SourceModel::new("Widget");
/// widget.fields.push(SourceField::new("name", "CharField", parse_arguments("max_length=40")));
/// widget.fields.push(SourceField::new("created_at", "DateTimeField", parse_arguments("")));
///
/// let translated = translate_model(&widget, &EnglishInflector);
/// assert_eq!(translated.value.table, "widgets");
/// assert_eq!(translated.value.fields.len(), 1);
/// assert!(translated.advisories.is_empty());
/// ```
pub fn translate_model(model: &SourceModel, inflector: &impl Inflector) -> Translated<TargetModel> {
    let mut advisories = Vec::new();
    let mut fields = Vec::with_capacity(model.fields.len());

    for source in &model.fields {
        match translate_field(&model.name, source).collect_into(&mut advisories) {
            Some(column) => {
                debug!(
                    model = %model.name,
                    field = %source.name,
                    column = %column.name,
                    kind = %column.target_type,
                    "translated field"
                );
                fields.push(column);
            }
            None => debug!(model = %model.name, field = %source.name, "no column for field"),
        }
    }

    let associations = derive_associations(model, inflector).collect_into(&mut advisories);

    Translated {
        value: TargetModel {
            name: model.name.clone(),
            table: inflector.tableize(&model.name),
            fields,
            associations,
        },
        advisories,
    }
}
