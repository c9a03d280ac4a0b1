//! Error types for the dr-convert crate.
//!
//! This module provides the [`ConvertError`] type for errors that stop a
//! conversion run. Lossy or ambiguous conversions are not errors; they are
//! reported as [`Advisory`](dr_core::Advisory) notes instead.

use camino::Utf8PathBuf;
use dr_core::ConfigError;

/// Errors that can occur during a conversion run.
///
/// Every variant is fatal. There is no retry: extraction and translation are
/// deterministic, and file system failures are reported to the caller as-is.
///
/// # Examples
///
/// ```
/// use dr_convert::ConvertError;
///
/// fn describe(err: &ConvertError) -> String {
///     match err.path() {
///         Some(path) => format!("{path}: {err}"),
///         None => err.to_string(),
///     }
/// }
///
/// let err = ConvertError::Config(dr_core::ConfigError::NoInputFiles);
/// assert!(describe(&err).starts_with("invalid configuration: no input file given"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The run configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Failed to read an input file.
    #[error("failed to read file {path}: {source}")]
    Read {
        /// The path of the file that couldn't be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an output file.
    #[error("failed to write file {path}: {source}")]
    Write {
        /// The path of the file that couldn't be written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a Python file.
    #[error("failed to parse file {path}: {source}")]
    Parse {
        /// The path of the file that couldn't be parsed.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: dr_py_parser::ParseError,
    },

    /// The Python parser could not be set up.
    #[error("failed to initialize the Python parser: {0}")]
    ParserInit(#[from] dr_py_parser::ParseError),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// Failed to walk an input directory.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),
}

impl ConvertError {
    /// Creates a new [`ConvertError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ConvertError::Write`] error.
    #[inline]
    pub fn write(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ConvertError::Parse`] error.
    #[inline]
    pub fn parse(path: impl Into<Utf8PathBuf>, source: dr_py_parser::ParseError) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } | Self::Parse { path, .. } => {
                Some(path)
            }
            Self::Config(_) | Self::ParserInit(_) | Self::NonUtf8Path(_) | Self::Walk(_) => {
                None
            }
        }
    }
}
