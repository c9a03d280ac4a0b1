//! ActiveRecord model class rendering.

use std::fmt::Write;

use dr_core::TargetModel;

use super::{RenderSettings, push_options, ruby_symbol};

/// Renders the model class of `model` with its association declarations.
///
/// # Examples
///
/// ```
/// use dr_convert::render::{RenderSettings, render_model};
/// use dr_core::{Associations, TargetModel};
///
/// let model = TargetModel {
///     name: "Widget".to_owned(),
///     table: "widgets".to_owned(),
///     fields: Vec::new(),
///     associations: Associations::default(),
/// };
///
/// let class = render_model(&model, &RenderSettings::default());
/// assert_eq!(class, "class Widget < ApplicationRecord\nend\n");
/// ```
pub fn render_model(model: &TargetModel, settings: &RenderSettings) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "class {} < {}",
        model.name, settings.model_base_class
    );

    for (kind, association) in model.associations.iter() {
        let mut line = format!("  {kind} {}", ruby_symbol(&association.name));
        push_options(&mut line, &association.options);
        out.push_str(&line);
        out.push('\n');
    }

    out.push_str("end\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dr_core::{Association, AssociationKind, Associations, Options, Value};

    fn model(name: &str, associations: Associations) -> TargetModel {
        TargetModel {
            name: name.to_owned(),
            table: String::new(),
            fields: Vec::new(),
            associations,
        }
    }

    #[test]
    fn test_render_associations() {
        let mut associations = Associations::default();
        let mut writer = Options::new();
        writer.insert("class_name", Value::string("Writer"));
        associations.insert(
            AssociationKind::BelongsTo,
            Association::new("author", writer),
        );
        associations.insert(
            AssociationKind::BelongsTo,
            Association::new("category", Options::new()),
        );
        associations.insert(
            AssociationKind::HasMany,
            Association::new("memberships", Options::new()),
        );
        let mut through = Options::new();
        through.insert("through", Value::symbol("memberships"));
        associations.insert(AssociationKind::HasMany, Association::new("groups", through));

        let class = render_model(&model("Post", associations), &RenderSettings::default());
        insta::assert_snapshot!(class, @r#"
class Post < ApplicationRecord
  belongs_to :author, class_name: "Writer"
  belongs_to :category
  has_many :memberships
  has_many :groups, through: :memberships
end
"#);
    }

    #[test]
    fn test_render_custom_base_class() {
        let settings = RenderSettings {
            model_base_class: "ActiveRecord::Base".to_owned(),
            ..RenderSettings::default()
        };

        let class = render_model(&model("Widget", Associations::default()), &settings);
        assert_eq!(class, "class Widget < ActiveRecord::Base\nend\n");
    }
}
