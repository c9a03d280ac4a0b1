//! Literal values after coercion into the Ruby literal space.

use serde::{Deserialize, Serialize};

/// A normalised literal value.
///
/// Produced by coercing a raw Django literal, or directly by translation rules
/// (limits, symbols, class names). Rendering turns it back into Ruby source.
///
/// # Examples
///
/// ```
/// use dr_core::Value;
///
/// assert_eq!(Value::Bool(true).as_bool(), Some(true));
/// assert_eq!(Value::Str("abc".to_owned()).as_str(), Some("abc"));
/// assert!(Value::Bool(true).is_true());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// `true` / `false`.
    Bool(bool),
    /// `nil`.
    Nil,
    /// Integral number.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// String literal contents, unquoted.
    Str(String),
    /// Symbol name, without the leading colon.
    Symbol(String),
    /// A token that could not be converted, kept verbatim.
    Raw(String),
}

impl Value {
    /// Returns the boolean if this is a [`Value::Bool`].
    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the string contents if this is a [`Value::Str`].
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` for the boolean `true` and nothing else.
    #[inline]
    #[must_use]
    pub const fn is_true(&self) -> bool {
        matches!(self, Self::Bool(true))
    }

    /// Creates a [`Value::Symbol`].
    #[inline]
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// Creates a [`Value::Str`].
    #[inline]
    pub fn string(text: impl Into<String>) -> Self {
        Self::Str(text.into())
    }
}
