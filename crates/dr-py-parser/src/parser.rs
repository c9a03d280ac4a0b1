//! Django model extraction using tree-sitter.
//!
//! This module provides the [`ModelParser`] struct for parsing Python model
//! files and extracting the classes that extend the configured base type.

use dr_core::SourceModel;
use dr_core::config::DEFAULT_SOURCE_BASE_TYPE;
use streaming_iterator::StreamingIterator;
use tracing::debug;
use tree_sitter::{Node, Parser, Query, QueryCursor, Tree};

use crate::error::ParseError;
use crate::fields::extract_fields;
use crate::queries::{
    CAPTURE_MODEL_BASES, CAPTURE_MODEL_BODY, CAPTURE_MODEL_DEFINITION, CAPTURE_MODEL_NAME,
    get_model_query, python_language,
};

/// Python parser for extracting Django models from source files.
///
/// Wraps a tree-sitter parser configured for Python. The parser can be
/// reused for multiple files to avoid repeated initialization.
///
/// A class is a model when its first superclass is exactly the configured
/// base type (`models.Model` by default). Field constructors are recognised
/// when they are qualified by the base type's module (`models.CharField`) or
/// written bare (`CharField`).
///
/// # Examples
///
/// ```
/// use dr_py_parser::ModelParser;
///
/// let mut parser = ModelParser::new()?;
/// let source = r#"
/// class Widget(models.Model):
///     name = models.CharField(max_length=40)
/// "#;
///
/// let models = parser.parse(source)?;
/// assert_eq!(models.len(), 1);
/// assert_eq!(models[0].name, "Widget");
/// assert_eq!(models[0].fields[0].type_name, "CharField");
/// # Ok::<(), dr_py_parser::ParseError>(())
/// ```
pub struct ModelParser {
    /// The underlying tree-sitter parser.
    parser: Parser,
    /// Fully qualified base type a model must extend.
    base_type: String,
    /// Module prefix accepted on field constructors.
    module: Option<String>,
}

impl ModelParser {
    /// Creates a parser recognising `models.Model` subclasses.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the Python language cannot be
    /// set on the parser.
    pub fn new() -> Result<Self, ParseError> {
        Self::with_base_type(DEFAULT_SOURCE_BASE_TYPE)
    }

    /// Creates a parser recognising subclasses of `base_type`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the Python language cannot be
    /// set on the parser.
    ///
    /// # Examples
    ///
    /// ```
    /// use dr_py_parser::ModelParser;
    ///
    /// let mut parser = ModelParser::with_base_type("db.Base")?;
    /// let models = parser.parse("class Tag(db.Base):\n    label = db.CharField()\n")?;
    /// assert_eq!(models[0].fields[0].name, "label");
    /// # Ok::<(), dr_py_parser::ParseError>(())
    /// ```
    pub fn with_base_type(base_type: &str) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&python_language())
            .map_err(|_| ParseError::LanguageInit)?;

        let module = base_type
            .rsplit_once('.')
            .map(|(module, _)| module.to_owned());

        Ok(Self {
            parser,
            base_type: base_type.to_owned(),
            module,
        })
    }

    /// Parses Python source and extracts models in textual order.
    ///
    /// Syntax errors elsewhere in the file do not fail the parse; only
    /// classes tree-sitter can still recognise are returned.
    ///
    /// # Errors
    ///
    /// - Returns [`ParseError::Parse`] if parsing fails
    /// - Returns [`ParseError::QueryCompile`] if the model query fails to compile
    pub fn parse(&mut self, source: &str) -> Result<Vec<SourceModel>, ParseError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(ParseError::Parse)?;

        let query = get_model_query()?;
        Ok(extract_models(
            &tree,
            source,
            query,
            &self.base_type,
            self.module.as_deref(),
        ))
    }

    /// Returns the base type this parser recognises.
    #[inline]
    pub fn base_type(&self) -> &str {
        &self.base_type
    }
}

impl std::fmt::Debug for ModelParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelParser")
            .field("language", &"Python")
            .field("base_type", &self.base_type)
            .finish_non_exhaustive()
    }
}

/// Extracts every class in `tree` whose first superclass is `base_type`.
///
/// Nested classes are matched too; the query does not restrict depth.
/// Models are sorted by their position in the source.
pub fn extract_models(
    tree: &Tree,
    source: &str,
    query: &Query,
    base_type: &str,
    module: Option<&str>,
) -> Vec<SourceModel> {
    let source_bytes = source.as_bytes();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), source_bytes);

    let mut found: Vec<(usize, SourceModel)> = Vec::new();

    while let Some(match_) = matches.next() {
        let mut name = None;
        let mut bases = None;
        let mut body = None;
        let mut start = 0;

        for capture in match_.captures {
            match capture.index {
                idx if idx == CAPTURE_MODEL_NAME => name = node_text(capture.node, source_bytes),
                idx if idx == CAPTURE_MODEL_BASES => bases = Some(capture.node),
                idx if idx == CAPTURE_MODEL_BODY => body = Some(capture.node),
                idx if idx == CAPTURE_MODEL_DEFINITION => start = capture.node.start_byte(),
                _ => {}
            }
        }

        let (Some(name), Some(bases), Some(body)) = (name, bases, body) else {
            continue;
        };

        if !extends_base(bases, source_bytes, base_type) {
            debug!(class = name, "skipping class without model base");
            continue;
        }

        let fields = extract_fields(body, source_bytes, module);
        debug!(model = name, fields = fields.len(), "extracted model");

        found.push((
            start,
            SourceModel {
                name: name.to_owned(),
                fields,
            },
        ));
    }

    found.sort_by_key(|(start, _)| *start);
    found.into_iter().map(|(_, model)| model).collect()
}

/// Returns `true` if the first superclass, ignoring whitespace, is `base_type`.
fn extends_base(bases: Node<'_>, source: &[u8], base_type: &str) -> bool {
    let mut cursor = bases.walk();
    let first = bases
        .named_children(&mut cursor)
        .find(|node| node.kind() != "comment");

    first
        .and_then(|node| node_text(node, source))
        .is_some_and(|text| text.chars().filter(|c| !c.is_whitespace()).eq(base_type.chars()))
}

/// Extracts text from a node.
pub(crate) fn node_text<'a>(node: Node<'_>, source: &'a [u8]) -> Option<&'a str> {
    let start = node.start_byte();
    let end = node.end_byte();
    std::str::from_utf8(source.get(start..end)?).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_new() {
        let parser = ModelParser::new();
        assert!(parser.is_ok());
    }

    #[test]
    fn test_parse_single_model() {
        let mut parser = ModelParser::new().expect("Parser creation failed");
        let source = r#"
from django.db import models

class Widget(models.Model):
    name = models.CharField(max_length=40)
    size = models.IntegerField(null=True)
"#;

        let models = parser.parse(source).expect("Parse failed");
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name, "Widget");

        let names: Vec<_> = models[0].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "size"]);
    }

    #[test]
    fn test_parse_models_in_textual_order() {
        let mut parser = ModelParser::new().expect("Parser creation failed");
        let source = r#"
class Writer(models.Model):
    name = models.CharField()

class Helper(object):
    value = models.IntegerField()

class Post(models.Model):
    author = models.ForeignKey(Writer)
"#;

        let models = parser.parse(source).expect("Parse failed");
        let names: Vec<_> = models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Writer", "Post"]);
    }

    #[test]
    fn test_base_must_be_first_superclass() {
        let mut parser = ModelParser::new().expect("Parser creation failed");
        let source = r#"
class A(Mixin, models.Model):
    x = models.IntegerField()

class B(models.Model, Mixin):
    y = models.IntegerField()
"#;

        let models = parser.parse(source).expect("Parse failed");
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name, "B");
    }

    #[test]
    fn test_model_without_fields() {
        let mut parser = ModelParser::new().expect("Parser creation failed");
        let source = "class Empty(models.Model):\n    pass\n";

        let models = parser.parse(source).expect("Parse failed");
        assert_eq!(models.len(), 1);
        assert!(models[0].fields.is_empty());
    }

    #[test]
    fn test_parse_empty_source() {
        let mut parser = ModelParser::new().expect("Parser creation failed");
        let models = parser.parse("").expect("Parse failed");
        assert!(models.is_empty());
    }

    #[test]
    fn test_custom_base_type() {
        let mut parser = ModelParser::with_base_type("db.Base").expect("Parser creation failed");
        let source = r#"
class Tag(db.Base):
    label = db.CharField()
    other = models.CharField()

class Ignored(models.Model):
    x = models.IntegerField()
"#;

        let models = parser.parse(source).expect("Parse failed");
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name, "Tag");
        assert_eq!(models[0].fields.len(), 1);
        assert_eq!(parser.base_type(), "db.Base");
    }

    #[test]
    fn test_syntax_error_elsewhere_is_tolerated() {
        let mut parser = ModelParser::new().expect("Parser creation failed");
        let source = r#"
class Widget(models.Model):
    name = models.CharField(max_length=40)

def broken(:
    pass
"#;

        let models = parser.parse(source).expect("Parse failed");
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name, "Widget");
    }

    #[test]
    fn test_parser_debug() {
        let parser = ModelParser::new().expect("Parser creation failed");
        let debug = format!("{parser:?}");
        assert!(debug.contains("ModelParser"));
        assert!(debug.contains("models.Model"));
    }
}
