//! Derivation of `belongs_to` / `has_many` declarations from relation fields.

use dr_core::{
    Advisory, AdvisoryKind, Association, AssociationKind, Associations, Inflector, Options,
    SourceModel, Translated, Value,
};

use crate::coerce::unquote;
use crate::field::OMITTED_FIELDS;
use crate::typemap::SourceFieldType;

/// Derives the associations of `model` from its relation fields.
///
/// - `ForeignKey` / `OneToOneField` become `belongs_to :<field>`. When the
///   referenced class tableizes differently from the field name, the entry
///   gets a `class_name` option.
/// - `ManyToManyField` becomes `has_many :<field>`. A `through` model first
///   registers `has_many :<through table>` and the primary entry gets a
///   `through` option pointing at it.
///
/// Entries follow the order of the fields; fields of other types and
/// `created_at` / `updated_at` are ignored.
///
/// A many-to-many field named like its own through table replaces that
/// table's entry with one pointing at itself, and raises an
/// [`AdvisoryKind::AmbiguousAssociation`] advisory.
///
/// # Examples
///
/// ```
/// use dr_convert::derive_associations;
/// use dr_core::{AssociationKind, EnglishInflector, SourceField, SourceModel};
/// use dr_py_parser::parse_arguments;
///
/// let mut model = SourceModel::new("Post");
/// model.fields.push(SourceField::new("author", "ForeignKey", parse_arguments("'Writer'")));
///
/// let associations = derive_associations(&model, &EnglishInflector).value;
/// let author = associations.get(AssociationKind::BelongsTo, "author").expect("author");
/// assert_eq!(author.options.get("class_name").and_then(|v| v.as_str()), Some("Writer"));
/// ```
pub fn derive_associations(
    model: &SourceModel,
    inflector: &impl Inflector,
) -> Translated<Associations> {
    let mut associations = Associations::default();
    let mut advisories = Vec::new();

    for field in &model.fields {
        if OMITTED_FIELDS.contains(&field.name.as_str()) {
            continue;
        }

        let Ok(source_type) = field.type_name.parse::<SourceFieldType>() else {
            continue;
        };

        if source_type.is_reference() {
            let mut options = Options::new();
            let target = field
                .arguments
                .named("to")
                .or_else(|| field.arguments.unnamed().first().map(String::as_str))
                .and_then(|raw| class_reference(raw, &model.name));

            if let Some(class_name) = target {
                if inflector.tableize(&field.name) != inflector.tableize(&class_name) {
                    options.insert("class_name", Value::Str(class_name));
                }
            }

            associations.insert(
                AssociationKind::BelongsTo,
                Association::new(field.name.as_str(), options),
            );
        } else if source_type == SourceFieldType::ManyToManyField {
            let mut options = Options::new();

            if let Some(through) = field
                .arguments
                .named("through")
                .and_then(|raw| class_reference(raw, &model.name))
            {
                let table = inflector.tableize(&through);
                if !associations.contains(AssociationKind::HasMany, &table) {
                    associations.insert(
                        AssociationKind::HasMany,
                        Association::new(table.as_str(), Options::new()),
                    );
                }
                if table == field.name {
                    advisories.push(Advisory::new(
                        AdvisoryKind::AmbiguousAssociation,
                        format!(
                            "`{}#{}` goes through `{table}`, which is its own name; rename the field or the through model",
                            model.name, field.name
                        ),
                    ));
                }
                options.insert("through", Value::Symbol(table));
            }

            associations.insert(
                AssociationKind::HasMany,
                Association::new(field.name.as_str(), options),
            );
        }
    }

    Translated {
        value: associations,
        advisories,
    }
}

/// Resolves a class reference argument to a class name.
///
/// Accepts `Writer`, `'Writer'`, lazy `'blog.Writer'` references and
/// `'self'`, which names the owning model.
fn class_reference(raw: &str, owner: &str) -> Option<String> {
    let raw = raw.trim();
    let reference = unquote(raw).unwrap_or_else(|| raw.to_owned());

    if reference == "self" {
        return Some(owner.to_owned());
    }

    let class_name = reference.rsplit('.').next().unwrap_or_default();
    let is_identifier = class_name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && class_name.chars().all(|c| c.is_alphanumeric() || c == '_');

    is_identifier.then(|| class_name.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dr_core::{EnglishInflector, SourceField};
    use dr_py_parser::parse_arguments;

    fn model(name: &str, fields: &[(&str, &str, &str)]) -> SourceModel {
        let mut model = SourceModel::new(name);
        for (field, type_name, arguments) in fields {
            model
                .fields
                .push(SourceField::new(*field, *type_name, parse_arguments(arguments)));
        }
        model
    }

    fn rendered(associations: &Associations) -> Vec<String> {
        associations
            .iter()
            .map(|(kind, entry)| {
                let options: Vec<String> = entry
                    .options
                    .iter()
                    .map(|(key, value)| format!("{key}={value:?}"))
                    .collect();
                format!("{kind} {} [{}]", entry.name, options.join(", "))
            })
            .collect()
    }

    #[test]
    fn test_belongs_to_with_class_name() {
        let post = model("Post", &[("author", "ForeignKey", "Writer, on_delete=models.CASCADE")]);
        let associations = derive_associations(&post, &EnglishInflector).value;

        assert_eq!(
            rendered(&associations),
            [r#"belongs_to author [class_name=Str("Writer")]"#]
        );
    }

    #[test]
    fn test_belongs_to_without_class_name() {
        let post = model("Post", &[("category", "ForeignKey", "'Category'")]);
        let associations = derive_associations(&post, &EnglishInflector).value;

        assert_eq!(rendered(&associations), ["belongs_to category []"]);
    }

    #[test]
    fn test_reference_forms() {
        let post = model(
            "Post",
            &[
                ("owner", "OneToOneField", "to='auth.User'"),
                ("parent", "ForeignKey", "'self', null=True"),
                ("blog", "ForeignKey", "\"blogs.Blog\""),
                ("thing", "ForeignKey", ""),
            ],
        );
        let associations = derive_associations(&post, &EnglishInflector).value;

        assert_eq!(
            rendered(&associations),
            [
                r#"belongs_to owner [class_name=Str("User")]"#,
                r#"belongs_to parent [class_name=Str("Post")]"#,
                "belongs_to blog []",
                "belongs_to thing []",
            ]
        );
    }

    #[test]
    fn test_has_many_through() {
        let group = model(
            "Group",
            &[("members", "ManyToManyField", "Person, through='Membership'")],
        );
        let associations = derive_associations(&group, &EnglishInflector).value;

        assert_eq!(
            rendered(&associations),
            [
                "has_many memberships []",
                r#"has_many members [through=Symbol("memberships")]"#,
            ]
        );
    }

    #[test]
    fn test_through_registered_once() {
        let group = model(
            "Group",
            &[
                ("members", "ManyToManyField", "Person, through='Membership'"),
                ("admins", "ManyToManyField", "Person, through=Membership"),
            ],
        );
        let associations = derive_associations(&group, &EnglishInflector).value;

        assert_eq!(
            rendered(&associations),
            [
                "has_many memberships []",
                r#"has_many members [through=Symbol("memberships")]"#,
                r#"has_many admins [through=Symbol("memberships")]"#,
            ]
        );
    }

    #[test]
    fn test_lifecycle_names_are_ignored() {
        let stamped = model(
            "Entry",
            &[
                ("created_at", "ForeignKey", "Stamp"),
                ("updated_at", "ManyToManyField", "Stamp"),
                ("owner", "ForeignKey", "Owner"),
            ],
        );
        let associations = derive_associations(&stamped, &EnglishInflector).value;

        assert_eq!(rendered(&associations), ["belongs_to owner []"]);
    }

    #[test]
    fn test_field_named_like_through_table() {
        let group = model(
            "Group",
            &[("memberships", "ManyToManyField", "Person, through='Membership'")],
        );
        let translated = derive_associations(&group, &EnglishInflector);

        assert_eq!(
            rendered(&translated.value),
            [r#"has_many memberships [through=Symbol("memberships")]"#]
        );
        assert_eq!(translated.advisories.len(), 1);
        assert_eq!(translated.advisories[0].kind, AdvisoryKind::AmbiguousAssociation);
        assert_eq!(
            translated.advisories[0].message,
            "`Group#memberships` goes through `memberships`, which is its own name; rename the field or the through model"
        );
    }

    #[test]
    fn test_through_alone_raises_nothing() {
        let group = model(
            "Group",
            &[("members", "ManyToManyField", "Person, through='Membership'")],
        );
        assert!(derive_associations(&group, &EnglishInflector).advisories.is_empty());
    }

    #[test]
    fn test_groups_follow_first_appearance() {
        let post = model(
            "Post",
            &[
                ("tags", "ManyToManyField", "Tag"),
                ("title", "CharField", "max_length=40"),
                ("author", "ForeignKey", "Writer"),
                ("readers", "ManyToManyField", "Reader"),
            ],
        );
        let associations = derive_associations(&post, &EnglishInflector).value;

        let kinds: Vec<_> = associations.groups().iter().map(|g| g.kind).collect();
        assert_eq!(kinds, [AssociationKind::HasMany, AssociationKind::BelongsTo]);
        assert_eq!(
            rendered(&associations),
            [
                "has_many tags []",
                "has_many readers []",
                r#"belongs_to author [class_name=Str("Writer")]"#,
            ]
        );
    }

    #[test]
    fn test_no_relations() {
        let widget = model("Widget", &[("name", "CharField", "max_length=40")]);
        assert!(derive_associations(&widget, &EnglishInflector).value.is_empty());
    }

    #[test]
    fn test_class_reference() {
        assert_eq!(class_reference("Writer", "Post").as_deref(), Some("Writer"));
        assert_eq!(class_reference("'Writer'", "Post").as_deref(), Some("Writer"));
        assert_eq!(class_reference("'app.Writer'", "Post").as_deref(), Some("Writer"));
        assert_eq!(class_reference("'self'", "Post").as_deref(), Some("Post"));
        assert_eq!(class_reference("get_model()", "Post"), None);
        assert_eq!(class_reference("''", "Post"), None);
    }
}
