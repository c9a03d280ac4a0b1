//! Splitting of raw field-constructor argument text.
//!
//! The text between a constructor's parentheses is split into positional and
//! keyword arguments. Keyword values stay unparsed; coercion happens later,
//! where a translation rule knows what the value means.

use dr_core::Arguments;

/// Splits raw argument text into positional and keyword arguments.
///
/// Arguments are separated by commas at the top nesting level; commas inside
/// quotes, parentheses, brackets or braces do not split, and `#` comments are
/// skipped. A token that starts with `identifier=` (but not `==`) is a keyword
/// argument, everything else is positional. Empty text yields no arguments.
///
/// # Examples
///
/// ```
/// use dr_py_parser::parse_arguments;
///
/// let args = parse_arguments("'Writer', on_delete=models.CASCADE, related_name='posts'");
/// assert_eq!(args.unnamed(), ["'Writer'"]);
/// assert_eq!(args.named("on_delete"), Some("models.CASCADE"));
/// assert_eq!(args.named("related_name"), Some("'posts'"));
///
/// assert!(parse_arguments("").is_empty());
/// ```
pub fn parse_arguments(text: &str) -> Arguments {
    let mut arguments = Arguments::default();
    for token in split_top_level(text) {
        match split_keyword(&token) {
            Some((key, value)) => arguments.insert_named(key, value),
            None => arguments.push_unnamed(token),
        }
    }
    arguments
}

/// Splits on top-level commas, dropping comments and empty tokens.
fn split_top_level(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0_usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut in_comment = false;

    for c in text.chars() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
                current.push(c);
            }
            continue;
        }

        if let Some(open) = quote {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == open {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => {
                quote = Some(c);
                current.push(c);
            }
            '(' | '[' | '{' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            '#' => in_comment = true,
            ',' if depth == 0 => push_token(&mut tokens, &mut current),
            _ => current.push(c),
        }
    }
    push_token(&mut tokens, &mut current);

    tokens
}

fn push_token(tokens: &mut Vec<String>, current: &mut String) {
    let token = current.trim();
    if !token.is_empty() {
        tokens.push(token.to_owned());
    }
    current.clear();
}

/// Returns `(key, raw value)` for `key=value` tokens.
fn split_keyword(token: &str) -> Option<(&str, &str)> {
    let key_len = token
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map_or(token.len(), |(i, _)| i);

    let key = &token[..key_len];
    if key.is_empty() || key.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let rest = token[key_len..].trim_start();
    let value = rest.strip_prefix('=')?;
    if value.starts_with('=') {
        return None;
    }

    Some((key, value.trim()))
}
