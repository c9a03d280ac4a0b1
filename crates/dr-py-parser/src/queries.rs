//! Pre-compiled tree-sitter query for Python class definitions.
//!
//! This module provides the [`MODEL_QUERY`] constant matching class
//! definitions that declare superclasses, and [`get_model_query`] for lazily
//! compiling and caching it.

use std::sync::OnceLock;

use tree_sitter::{Language, Query};

use crate::error::ParseError;

/// Tree-sitter query for class definitions with a superclass list.
///
/// Classes without parentheses can never extend the model base type, so they
/// are not matched at all.
///
/// # Capture Names
///
/// - `model.name` - The class name identifier
/// - `model.bases` - The superclass `argument_list`
/// - `model.body` - The class body `block`
/// - `model.definition` - The whole `class_definition` node
pub const MODEL_QUERY: &str = r"
(class_definition
  name: (identifier) @model.name
  superclasses: (argument_list) @model.bases
  body: (block) @model.body) @model.definition
";

/// Capture index for `model.name`.
pub const CAPTURE_MODEL_NAME: u32 = 0;

/// Capture index for `model.bases`.
pub const CAPTURE_MODEL_BASES: u32 = 1;

/// Capture index for `model.body`.
pub const CAPTURE_MODEL_BODY: u32 = 2;

/// Capture index for `model.definition`.
pub const CAPTURE_MODEL_DEFINITION: u32 = 3;

/// Global cache for the compiled model query.
static COMPILED_QUERY: OnceLock<Query> = OnceLock::new();

/// Returns the tree-sitter Python language.
#[inline]
pub fn python_language() -> Language {
    tree_sitter_python::LANGUAGE.into()
}

/// Returns the compiled model query.
///
/// The query is compiled once and cached for all subsequent calls.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the query fails to compile.
pub fn get_model_query() -> Result<&'static Query, ParseError> {
    if let Some(query) = COMPILED_QUERY.get() {
        return Ok(query);
    }

    let query = compile_query(&python_language())?;
    Ok(COMPILED_QUERY.get_or_init(|| query))
}

/// Compiles the model query for the given language.
fn compile_query(language: &Language) -> Result<Query, ParseError> {
    Query::new(language, MODEL_QUERY).map_err(|e| ParseError::QueryCompile {
        offset: e.offset,
        kind: e,
    })
}
