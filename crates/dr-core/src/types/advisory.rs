//! Advisory notes produced while translating.
//!
//! An advisory never stops a run. Translation functions return their result
//! wrapped in [`Translated`] together with the advisories they raised, and the
//! caller concatenates them in call order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What an advisory is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum AdvisoryKind {
    /// No Rails type is known for the Django field type.
    UnknownFieldType,
    /// A literal could not be converted to a Ruby value.
    UnconvertibleValue,
    /// The field type converts lossily and needs a manual look.
    SpecialHandling,
    /// The field relied on Django filling it in (`auto_now`).
    LifecycleHook,
    /// A constraint that the generated migration does not enforce.
    UnenforcedConstraint,
    /// An association that refers to itself.
    AmbiguousAssociation,
}

/// A non-fatal note about an ambiguous or lossy conversion.
///
/// # Examples
///
/// ```
/// use dr_core::{Advisory, AdvisoryKind};
///
/// let advisory = Advisory::unconvertible_value("timezone.now");
/// assert_eq!(advisory.kind, AdvisoryKind::UnconvertibleValue);
/// assert_eq!(advisory.to_string(), "unable to convert `timezone.now` to a valid value");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Advisory {
    /// Category of the note.
    pub kind: AdvisoryKind,

    /// Human-readable message.
    pub message: String,
}

impl Advisory {
    /// Creates an advisory.
    #[must_use]
    pub fn new(kind: AdvisoryKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// No target type is known for `model#field`.
    #[must_use]
    pub fn unknown_field_type(model: &str, field: &str) -> Self {
        Self::new(
            AdvisoryKind::UnknownFieldType,
            format!("couldn't determine a target type for `{model}#{field}`"),
        )
    }

    /// A literal token could not be coerced.
    #[must_use]
    pub fn unconvertible_value(token: &str) -> Self {
        Self::new(
            AdvisoryKind::UnconvertibleValue,
            format!("unable to convert `{token}` to a valid value"),
        )
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A translation result together with the advisories raised producing it.
///
/// # Examples
///
/// ```
/// use dr_core::{Advisory, Translated};
///
/// let mut all = Vec::new();
/// let translated = Translated::new(42).with_advisory(Advisory::unconvertible_value("x"));
/// let value = translated.collect_into(&mut all);
///
/// assert_eq!(value, 42);
/// assert_eq!(all.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Translated<T> {
    /// The translated value.
    pub value: T,

    /// Advisories in the order they were raised.
    pub advisories: Vec<Advisory>,
}

impl<T> Translated<T> {
    /// Wraps a value with no advisory.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self {
            value,
            advisories: Vec::new(),
        }
    }

    /// Appends an advisory.
    #[must_use]
    pub fn with_advisory(mut self, advisory: Advisory) -> Self {
        self.advisories.push(advisory);
        self
    }

    /// Moves the advisories into `sink` and returns the value.
    pub fn collect_into(self, sink: &mut Vec<Advisory>) -> T {
        sink.extend(self.advisories);
        self.value
    }
}
