//! Python parser using tree-sitter for Django model extraction.
//!
//! This crate turns a Django `models.py` source file into
//! [`SourceModel`](dr_core::SourceModel) values:
//!
//! - Find classes whose first superclass is the configured base type
//! - Extract `name = models.Type(...)` field declarations from class bodies
//! - Split constructor argument text into positional and keyword arguments
//!
//! # Overview
//!
//! The main entry point is [`ModelParser`]:
//!
//! ```
//! use dr_py_parser::ModelParser;
//!
//! let mut parser = ModelParser::new()?;
//! let source = r#"
//! class Post(models.Model):
//!     title = models.CharField(max_length=40)
//!     author = models.ForeignKey('Writer', on_delete=models.CASCADE)
//! "#;
//!
//! let models = parser.parse(source)?;
//! let author = &models[0].fields[1];
//! assert_eq!(author.name, "author");
//! assert_eq!(author.type_name, "ForeignKey");
//! assert_eq!(author.arguments.unnamed(), ["'Writer'"]);
//! # Ok::<(), dr_py_parser::ParseError>(())
//! ```
//!
//! # Recognised Declarations
//!
//! | Source | Recognised |
//! |--------|------------|
//! | `title = models.CharField(max_length=40)` | yes |
//! | `title = CharField()` | yes |
//! | `title = other.CharField()` | no, wrong module |
//! | assignments inside `def` or `class Meta` | no |
//!
//! Declarations may span several lines. Argument values stay as raw text.
//!
//! # Thread Safety
//!
//! [`ModelParser`] is `Send` but not `Sync`. The compiled query is shared
//! globally.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod arguments;
pub mod error;
mod fields;
mod parser;
pub mod queries;

pub use arguments::parse_arguments;
pub use error::ParseError;
pub use fields::extract_fields;
pub use parser::{ModelParser, extract_models};
