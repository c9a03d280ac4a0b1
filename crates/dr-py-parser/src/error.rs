//! Error types for the dr-py-parser crate.
//!
//! This module provides the [`ParseError`] type for errors that can occur
//! while setting up the Python parser or parsing a model file.

/// Errors that can occur during Python parsing.
///
/// Syntax errors in the parsed file are not reported here: tree-sitter
/// recovers from them and extraction simply skips what it cannot recognise.
///
/// # Examples
///
/// ```
/// use dr_py_parser::ParseError;
///
/// fn describe(err: &ParseError) -> &'static str {
///     match err {
///         ParseError::LanguageInit => "language",
///         ParseError::QueryCompile { .. } => "query",
///         ParseError::Parse => "parse",
///     }
/// }
///
/// assert_eq!(describe(&ParseError::Parse), "parse");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to set the Python language on the parser.
    #[error("failed to set Python language")]
    LanguageInit,

    /// Failed to compile a tree-sitter query.
    #[error("failed to compile query at offset {offset}: {kind:?}")]
    QueryCompile {
        /// The byte offset in the query string where the error occurred.
        offset: usize,
        /// The underlying query error.
        kind: tree_sitter::QueryError,
    },

    /// The parser returned no tree.
    #[error("failed to parse source code")]
    Parse,
}
