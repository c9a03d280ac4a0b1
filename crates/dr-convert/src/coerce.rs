//! Coercion of raw Python literals into [`Value`]s.
//!
//! Argument values are carried as raw text until a translation rule needs
//! them. Only then is a token coerced, because the same literal means
//! different things in different places (`'True'` as a default is a string,
//! `True` as `db_index` is a flag).

use dr_core::{Advisory, Translated, Value};

/// Coerces a raw Python literal.
///
/// | Token | Value |
/// |-------|-------|
/// | `True` / `False` | [`Value::Bool`] |
/// | `None` | [`Value::Nil`] |
/// | `40`, `-3`, `1_000` | [`Value::Integer`] |
/// | `1.5`, `.5`, `1e3` | [`Value::Float`] |
/// | `'abc'`, `"abc"` | [`Value::Str`] without the outer quotes |
///
/// Anything else is returned verbatim as [`Value::Raw`] together with an
/// [`AdvisoryKind::UnconvertibleValue`](dr_core::AdvisoryKind) advisory.
/// Coercion never fails.
///
/// # Examples
///
/// ```
/// use dr_convert::coerce;
/// use dr_core::Value;
///
/// assert_eq!(coerce("True").value, Value::Bool(true));
/// assert_eq!(coerce("40").value, Value::Integer(40));
/// assert_eq!(coerce("'abc'").value, Value::Str("abc".to_owned()));
///
/// let raw = coerce("timezone.now");
/// assert_eq!(raw.value, Value::Raw("timezone.now".to_owned()));
/// assert_eq!(raw.advisories.len(), 1);
/// ```
pub fn coerce(token: &str) -> Translated<Value> {
    let token = token.trim();

    match token {
        "True" => return Translated::new(Value::Bool(true)),
        "False" => return Translated::new(Value::Bool(false)),
        "None" => return Translated::new(Value::Nil),
        _ => {}
    }

    if let Some(number) = coerce_number(token) {
        return Translated::new(number);
    }

    if let Some(text) = unquote(token) {
        return Translated::new(Value::Str(text));
    }

    Translated::new(Value::Raw(token.to_owned()))
        .with_advisory(Advisory::unconvertible_value(token))
}

/// Returns the contents of a single- or double-quoted string literal.
///
/// The outer quotes must match. `\\`, `\'` and `\"` are unescaped; other
/// escapes are kept as written.
pub fn unquote(token: &str) -> Option<String> {
    let quote = token.chars().next().filter(|c| matches!(c, '\'' | '"'))?;
    let inner = token
        .strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote))?;

    let mut text = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            // An unescaped closing quote inside means this was not one literal.
            if c == quote {
                return None;
            }
            text.push(c);
            continue;
        }
        match chars.next() {
            Some(next @ ('\\' | '\'' | '"')) => text.push(next),
            Some(next) => {
                text.push('\\');
                text.push(next);
            }
            None => return None,
        }
    }
    Some(text)
}

/// Integer when lexically integral, float when it has a point or exponent.
///
/// A float outside the `f64` range has no Ruby literal and is not a number.
fn coerce_number(token: &str) -> Option<Value> {
    if !is_numeric_literal(token) {
        return None;
    }

    let digits = token.replace('_', "");
    let integral = !digits.contains(['.', 'e', 'E']);

    if integral {
        if let Ok(integer) = digits.parse::<i64>() {
            return Some(Value::Integer(integer));
        }
    }
    digits
        .parse::<f64>()
        .ok()
        .filter(|float| float.is_finite())
        .map(Value::Float)
}

/// Sign, digits (with `_` between digits), optional fraction and exponent.
fn is_numeric_literal(token: &str) -> bool {
    let body = token.strip_prefix(['+', '-']).unwrap_or(token);
    if !body.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return false;
    }
    if !body.bytes().any(|b| b.is_ascii_digit()) {
        return false;
    }
    if body.contains("__") || body.starts_with('_') || body.ends_with('_') {
        return false;
    }
    body.chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '_' | '.' | 'e' | 'E' | '+' | '-'))
}
