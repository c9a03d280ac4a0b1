//! Target-side types: Rails columns, associations and models.
//!
//! Everything here is ordered. Column order and association order end up in
//! generated source, so insertion order is part of the data, and no type in
//! this module is backed by a hash map.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Value;

/// Column type of a Rails migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    /// `t.integer`
    Integer,
    /// `t.boolean`
    Boolean,
    /// `t.string`
    String,
    /// `t.date`
    Date,
    /// `t.datetime`
    Datetime,
    /// `t.decimal`
    Decimal,
    /// `t.float`
    Float,
    /// `t.text`
    Text,
    /// `t.time`
    Time,
}

impl TargetType {
    /// Returns the migration method name for this type.
    ///
    /// # Examples
    ///
    /// ```
    /// use dr_core::TargetType;
    ///
    /// assert_eq!(TargetType::Datetime.as_str(), "datetime");
    /// ```
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Text => "text",
            Self::Time => "time",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An insertion-ordered map of option names to values.
///
/// Re-inserting an existing key replaces its value without moving it, so the
/// rendered `key: value` list is stable no matter how many overrides apply.
///
/// # Examples
///
/// ```
/// use dr_core::{Options, Value};
///
/// let mut options = Options::new();
/// options.insert("limit", Value::Integer(50));
/// options.insert("default", Value::Nil);
/// options.insert("limit", Value::Integer(80));
///
/// let keys: Vec<_> = options.iter().map(|(k, _)| k).collect();
/// assert_eq!(keys, ["limit", "default"]);
/// assert_eq!(options.get("limit"), Some(&Value::Integer(80)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Options {
    entries: Vec<(String, Value)>,
}

impl Options {
    /// Creates an empty option map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option, keeping the position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Returns the value of an option.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns `true` if the option is set.
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of options.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no option is set.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Options {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        let mut options = Self::new();
        for (key, value) in iter {
            options.insert(key, value);
        }
        options
    }
}

/// A column of the generated migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetField {
    /// Column name.
    pub name: String,

    /// Column type.
    pub target_type: TargetType,

    /// Whether an `add_index` statement is generated for the column.
    pub has_index: bool,

    /// Uniqueness requested by the source field, if stated.
    pub is_unique: Option<bool>,

    /// Column options (`limit`, `precision`, `scale`, `default`, `null`).
    pub arguments: Options,
}

impl TargetField {
    /// Creates an unindexed column without options.
    #[must_use]
    pub fn new(name: impl Into<String>, target_type: TargetType) -> Self {
        Self {
            name: name.into(),
            target_type,
            has_index: false,
            is_unique: None,
            arguments: Options::new(),
        }
    }
}

/// Kind of an ActiveRecord association macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    /// `belongs_to`
    BelongsTo,
    /// `has_many`
    HasMany,
}

impl AssociationKind {
    /// Returns the macro name.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BelongsTo => "belongs_to",
            Self::HasMany => "has_many",
        }
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One association declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Association {
    /// Association name (rendered as a symbol).
    pub name: String,

    /// Macro options such as `class_name` or `through`.
    pub options: Options,
}

impl Association {
    /// Creates an association.
    #[must_use]
    pub fn new(name: impl Into<String>, options: Options) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}

/// All associations of one kind, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationGroup {
    /// The macro kind shared by the entries.
    pub kind: AssociationKind,

    /// Entries in declaration order.
    pub entries: Vec<Association>,
}

/// Associations of a model grouped by kind.
///
/// Groups appear in the order their kind was first used; entries keep their
/// registration order inside a group.
///
/// # Examples
///
/// ```
/// use dr_core::{Association, AssociationKind, Associations, Options};
///
/// let mut associations = Associations::default();
/// associations.insert(AssociationKind::HasMany, Association::new("tags", Options::new()));
/// associations.insert(AssociationKind::BelongsTo, Association::new("author", Options::new()));
///
/// let kinds: Vec<_> = associations.groups().iter().map(|g| g.kind).collect();
/// assert_eq!(kinds, [AssociationKind::HasMany, AssociationKind::BelongsTo]);
/// assert!(associations.contains(AssociationKind::HasMany, "tags"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Associations {
    groups: Vec<AssociationGroup>,
}

impl Associations {
    /// Registers an association.
    ///
    /// An existing entry of the same kind and name keeps its position and
    /// takes the new options.
    pub fn insert(&mut self, kind: AssociationKind, association: Association) {
        let group = self.group_mut(kind);
        match group
            .entries
            .iter_mut()
            .find(|entry| entry.name == association.name)
        {
            Some(entry) => entry.options = association.options,
            None => group.entries.push(association),
        }
    }

    /// Returns `true` if an association of this kind and name exists.
    #[must_use]
    pub fn contains(&self, kind: AssociationKind, name: &str) -> bool {
        self.get(kind, name).is_some()
    }

    /// Looks up an association.
    #[must_use]
    pub fn get(&self, kind: AssociationKind, name: &str) -> Option<&Association> {
        self.groups
            .iter()
            .find(|group| group.kind == kind)
            .and_then(|group| group.entries.iter().find(|entry| entry.name == name))
    }

    /// Groups in first-use order.
    #[inline]
    #[must_use]
    pub fn groups(&self) -> &[AssociationGroup] {
        &self.groups
    }

    /// Iterates over every association with its kind, in render order.
    pub fn iter(&self) -> impl Iterator<Item = (AssociationKind, &Association)> {
        self.groups
            .iter()
            .flat_map(|group| group.entries.iter().map(move |entry| (group.kind, entry)))
    }

    /// Total number of associations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.entries.len()).sum()
    }

    /// Returns `true` if no association is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|group| group.entries.is_empty())
    }

    fn group_mut(&mut self, kind: AssociationKind) -> &mut AssociationGroup {
        let index = match self.groups.iter().position(|group| group.kind == kind) {
            Some(index) => index,
            None => {
                self.groups.push(AssociationGroup {
                    kind,
                    entries: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }
}

/// A translated Rails model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetModel {
    /// Class name, identical to the Django class name.
    pub name: String,

    /// Table name, always `tableize(name)`.
    pub table: String,

    /// Columns in source order, minus dropped fields.
    pub fields: Vec<TargetField>,

    /// Association declarations.
    pub associations: Associations,
}

impl TargetModel {
    /// Columns that get an `add_index` statement, in column order.
    pub fn indexed_fields(&self) -> impl Iterator<Item = &TargetField> {
        self.fields.iter().filter(|field| field.has_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_type_names() {
        let all = [
            (TargetType::Integer, "integer"),
            (TargetType::Boolean, "boolean"),
            (TargetType::String, "string"),
            (TargetType::Date, "date"),
            (TargetType::Datetime, "datetime"),
            (TargetType::Decimal, "decimal"),
            (TargetType::Float, "float"),
            (TargetType::Text, "text"),
            (TargetType::Time, "time"),
        ];
        for (target_type, name) in all {
            assert_eq!(target_type.as_str(), name);
            assert_eq!(target_type.to_string(), name);
        }
    }

    #[test]
    fn test_options_from_iter_keeps_order() {
        let options: Options = [
            ("precision", Value::Integer(10)),
            ("scale", Value::Integer(2)),
        ]
        .into_iter()
        .collect();

        let keys: Vec<_> = options.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["precision", "scale"]);
        assert_eq!(options.len(), 2);
        assert!(options.contains_key("scale"));
    }

    #[test]
    fn test_associations_insert_replaces_in_place() {
        let mut associations = Associations::default();
        associations.insert(
            AssociationKind::HasMany,
            Association::new("memberships", Options::new()),
        );
        associations.insert(
            AssociationKind::HasMany,
            Association::new("groups", Options::new()),
        );

        let mut options = Options::new();
        options.insert("dependent", Value::symbol("destroy"));
        associations.insert(
            AssociationKind::HasMany,
            Association::new("memberships", options),
        );

        let names: Vec<_> = associations.iter().map(|(_, a)| a.name.as_str()).collect();
        assert_eq!(names, vec!["memberships", "groups"]);
        assert_eq!(associations.len(), 2);

        let memberships = associations
            .get(AssociationKind::HasMany, "memberships")
            .unwrap();
        assert!(memberships.options.contains_key("dependent"));
    }

    #[test]
    fn test_associations_empty() {
        let associations = Associations::default();
        assert!(associations.is_empty());
        assert_eq!(associations.len(), 0);
        assert!(!associations.contains(AssociationKind::BelongsTo, "author"));
    }

    #[test]
    fn test_indexed_fields() {
        let mut slug = TargetField::new("slug", TargetType::String);
        slug.has_index = true;
        let model = TargetModel {
            name: "Post".to_owned(),
            table: "posts".to_owned(),
            fields: vec![TargetField::new("title", TargetType::String), slug],
            associations: Associations::default(),
        };

        let indexed: Vec<_> = model.indexed_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(indexed, vec!["slug"]);
    }
}
