//! String inflection used to derive Rails names.
//!
//! [`Inflector`] is the seam the converter consumes; [`EnglishInflector`] is a
//! small rule-based implementation of the subset of ActiveSupport behaviour
//! the generated files depend on: `underscore`, `pluralize` and `tableize`.
//!
//! Pluralisation applies to the last word only, so `BlogPost` becomes
//! `BlogPosts` and `blog_category` becomes `blog_categories`.

use heck::ToSnakeCase;

/// Words with identical singular and plural.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
    "news",
];

/// Irregular singular/plural pairs.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("zombie", "zombies"),
    ("ox", "oxen"),
    ("axis", "axes"),
    ("testis", "testes"),
];

/// Inflection capability.
///
/// # Examples
///
/// ```
/// use dr_core::{EnglishInflector, Inflector};
///
/// let inflector = EnglishInflector;
/// assert_eq!(inflector.underscore("BlogPost"), "blog_post");
/// assert_eq!(inflector.pluralize("BlogPost"), "BlogPosts");
/// assert_eq!(inflector.tableize("Category"), "categories");
/// ```
pub trait Inflector {
    /// `BlogPost` → `blog_post`.
    fn underscore(&self, word: &str) -> String;

    /// `Category` → `Categories`.
    fn pluralize(&self, word: &str) -> String;

    /// Table name for a class name: the pluralized underscore form.
    fn tableize(&self, class_name: &str) -> String {
        self.pluralize(&self.underscore(class_name))
    }
}

/// Rule-based English inflector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnglishInflector;

impl Inflector for EnglishInflector {
    fn underscore(&self, word: &str) -> String {
        word.to_snake_case()
    }

    fn pluralize(&self, word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }
        let start = last_word_start(word);
        let (head, last) = word.split_at(start);
        format!("{head}{}", pluralize_word(last))
    }
}

/// Byte offset where the last word starts (after `_`, or at the last
/// uppercase letter of a camel-cased word).
fn last_word_start(word: &str) -> usize {
    if let Some(pos) = word.rfind('_') {
        return pos + 1;
    }
    word.char_indices()
        .filter(|(i, c)| *i > 0 && c.is_uppercase())
        .map(|(i, _)| i)
        .next_back()
        .unwrap_or(0)
}

fn pluralize_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_owned();
    }

    for (singular, plural) in IRREGULAR {
        if lower == *plural {
            return word.to_owned();
        }
        if lower == *singular {
            return match_first_letter_case(word, plural);
        }
    }

    let (strip, suffix) = suffix_rule(&lower);
    let stem_len = word.len() - strip;
    format!("{}{suffix}", &word[..stem_len])
}

/// Returns how many trailing bytes to drop and what to append.
fn suffix_rule(lower: &str) -> (usize, &'static str) {
    const KEEP: (usize, &str) = (0, "");

    if lower.ends_with("quiz") {
        return (0, "zes");
    }
    if lower.ends_with("mice") || lower.ends_with("lice") {
        return KEEP;
    }
    if lower.ends_with("mouse") || lower.ends_with("louse") {
        return (4, "ice");
    }
    if lower.ends_with("matrix") || lower.ends_with("vertex") || lower.ends_with("index") {
        return (2, "ices");
    }
    if lower.ends_with('x')
        || lower.ends_with("ch")
        || lower.ends_with("ss")
        || lower.ends_with("sh")
    {
        return (0, "es");
    }
    if let Some(stem) = lower.strip_suffix('y') {
        let consonant = stem
            .chars()
            .last()
            .is_some_and(|c| !"aeiouy".contains(c));
        if consonant || stem.ends_with("qu") {
            return (1, "ies");
        }
        return (0, "s");
    }
    if lower.ends_with("hive") {
        return (0, "s");
    }
    if lower.ends_with("fe") && !lower.ends_with("ffe") {
        return (2, "ves");
    }
    if lower.ends_with("lf") || lower.ends_with("rf") {
        return (1, "ves");
    }
    if lower.ends_with("sis") {
        return (2, "es");
    }
    if lower.ends_with("ta") || lower.ends_with("ia") {
        return KEEP;
    }
    if lower.ends_with("tum") || lower.ends_with("ium") {
        return (2, "a");
    }
    if lower.ends_with("buffalo") || lower.ends_with("tomato") {
        return (0, "es");
    }
    if lower.ends_with("octopi") || lower.ends_with("viri") {
        return KEEP;
    }
    if lower.ends_with("octopus") || lower.ends_with("virus") {
        return (2, "i");
    }
    if lower.ends_with("bus") || lower.ends_with("alias") || lower.ends_with("status") {
        return (0, "es");
    }
    if lower.ends_with('s') {
        return KEEP;
    }
    (0, "s")
}

/// Gives `replacement` the case of the first letter of `original`.
fn match_first_letter_case(original: &str, replacement: &str) -> String {
    let upper = original.chars().next().is_some_and(char::is_uppercase);
    if !upper {
        return replacement.to_owned();
    }
    let mut chars = replacement.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
