//! Source-side types: Django models and fields as extracted from text.
//!
//! Argument values are kept as the raw literal text found in the declaration.
//! They are coerced only where a translation rule consumes them, because the
//! same literal means different things in different places (`'True'` as a
//! default value is a string, `True` as a flag is a boolean).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Arguments passed to a field constructor, split into positional and keyword
/// arguments.
///
/// # Examples
///
/// ```
/// use dr_core::Arguments;
///
/// let mut args = Arguments::default();
/// args.push_unnamed("Author");
/// args.insert_named("related_name", "'posts'");
///
/// assert_eq!(args.unnamed(), ["Author"]);
/// assert_eq!(args.named("related_name"), Some("'posts'"));
/// assert_eq!(args.named("null"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arguments {
    /// Positional arguments in order of appearance.
    unnamed: SmallVec<[String; 2]>,

    /// Keyword arguments in order of appearance, values unparsed.
    named: Vec<(String, String)>,
}

impl Arguments {
    /// Appends a positional argument.
    pub fn push_unnamed(&mut self, value: impl Into<String>) {
        self.unnamed.push(value.into());
    }

    /// Sets a keyword argument.
    ///
    /// A repeated key keeps its first position and takes the new value.
    pub fn insert_named(&mut self, key: impl Into<String>, raw_value: impl Into<String>) {
        let key = key.into();
        let raw_value = raw_value.into();
        match self.named.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = raw_value,
            None => self.named.push((key, raw_value)),
        }
    }

    /// Positional arguments in order.
    #[inline]
    #[must_use]
    pub fn unnamed(&self) -> &[String] {
        &self.unnamed
    }

    /// Returns the raw text of a keyword argument.
    #[must_use]
    pub fn named(&self, key: &str) -> Option<&str> {
        self.named
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over keyword arguments in order.
    pub fn iter_named(&self) -> impl Iterator<Item = (&str, &str)> {
        self.named.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns `true` if there are no arguments at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unnamed.is_empty() && self.named.is_empty()
    }
}

/// A single field declaration of a Django model.
///
/// # Examples
///
/// ```
/// use dr_core::{Arguments, SourceField};
///
/// let field = SourceField::new("title", "CharField", Arguments::default());
/// assert_eq!(field.name, "title");
/// assert_eq!(field.type_name, "CharField");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceField {
    /// Attribute name on the model class.
    pub name: String,

    /// Constructor name without module prefix (`CharField`).
    pub type_name: String,

    /// Constructor arguments.
    pub arguments: Arguments,
}

impl SourceField {
    /// Creates a new source field.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            arguments,
        }
    }
}

/// A Django model class and its fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceModel {
    /// Class name.
    pub name: String,

    /// Fields in textual order.
    pub fields: Vec<SourceField>,
}

impl SourceModel {
    /// Creates a model with no fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }
}
