//! Error types for the dr-core crate.
//!
//! This module provides the [`ConfigError`] type for configuration-related errors.
//! A configuration error is always fatal and is raised before any input is parsed.

/// Errors that can occur during configuration loading and validation.
///
/// # Examples
///
/// ```
/// use dr_core::ConfigError;
///
/// let error = ConfigError::NoInputFiles;
/// assert!(error.to_string().contains("input file"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No input file remained after removing blank entries.
    #[error("no input file given; please specify at least one Django model file")]
    NoInputFiles,

    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// An I/O error occurred while reading configuration.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}
