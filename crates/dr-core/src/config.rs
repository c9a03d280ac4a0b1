//! Configuration for a conversion run.
//!
//! [`RunConfig`] can be built programmatically, deserialized from a JSON file,
//! or assembled by the CLI from its arguments. Every field has a default, so a
//! config file only needs to name what it changes.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default base type a Django model class must extend.
pub const DEFAULT_SOURCE_BASE_TYPE: &str = "models.Model";

/// Default ActiveRecord migration version written in `Migration[...]`.
pub const DEFAULT_MIGRATION_VERSION: &str = "7.1";

/// Default superclass of generated model classes.
pub const DEFAULT_MODEL_BASE_CLASS: &str = "ApplicationRecord";

/// Format of migration timestamps (`20240131235959`).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Configuration of a single conversion run.
///
/// # Examples
///
/// ```
/// use dr_core::RunConfig;
///
/// let config = RunConfig::with_inputs(["blog/models.py"]);
/// assert!(!config.debug);
/// assert_eq!(config.source_base_type, "models.Model");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Print each output path and content instead of writing files.
    pub debug: bool,

    /// Django model files to convert, processed in order.
    pub input_files: Vec<Utf8PathBuf>,

    /// Directory that `db/migrate` and `app/models` are created under.
    pub output_root: Utf8PathBuf,

    /// Base type a class must extend to be treated as a model.
    pub source_base_type: String,

    /// Version written in `ActiveRecord::Migration[...]`.
    ///
    /// An empty string renders a bare `ActiveRecord::Migration`.
    pub migration_version: String,

    /// Superclass of the generated model classes.
    pub model_base_class: String,

    /// Fixed timestamp (`%Y%m%d%H%M%S`) for the first migration.
    ///
    /// `None` uses the current local time.
    pub timestamp: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            debug: false,
            input_files: Vec::new(),
            output_root: Utf8PathBuf::from("."),
            source_base_type: DEFAULT_SOURCE_BASE_TYPE.to_owned(),
            migration_version: DEFAULT_MIGRATION_VERSION.to_owned(),
            model_base_class: DEFAULT_MODEL_BASE_CLASS.to_owned(),
            timestamp: None,
        }
    }
}

impl RunConfig {
    /// Creates a default configuration for the given input files.
    #[must_use]
    pub fn with_inputs<I, P>(inputs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        Self {
            input_files: inputs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Loads a configuration from a JSON file.
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Removes blank input entries, keeping the order of the rest.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.input_files.retain(|path| !path.as_str().trim().is_empty());
        self
    }

    /// Checks the configuration for errors.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoInputFiles`] if no non-blank input file is configured
    /// - [`ConfigError::InvalidOption`] if the base type, model base class or
    ///   timestamp is malformed
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .input_files
            .iter()
            .all(|path| path.as_str().trim().is_empty())
        {
            return Err(ConfigError::NoInputFiles);
        }

        if !is_dotted_identifier(&self.source_base_type) {
            return Err(ConfigError::invalid_option(
                "source_base_type",
                format!("'{}' is not a dotted identifier", self.source_base_type),
            ));
        }

        if !is_dotted_identifier(&self.model_base_class.replace("::", ".")) {
            return Err(ConfigError::invalid_option(
                "model_base_class",
                format!("'{}' is not a constant name", self.model_base_class),
            ));
        }

        if let Some(timestamp) = &self.timestamp {
            if timestamp.len() != 14 || !timestamp.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ConfigError::invalid_option(
                    "timestamp",
                    format!("'{timestamp}' must be 14 digits ({TIMESTAMP_FORMAT})"),
                ));
            }
        }

        Ok(())
    }

    /// Returns the module prefix of the source base type (`models` for `models.Model`).
    #[must_use]
    pub fn source_module(&self) -> Option<&str> {
        self.source_base_type
            .rsplit_once('.')
            .map(|(module, _)| module)
    }
}

/// Returns `true` for `Name`, `models.Model`, `a.b.C`.
fn is_dotted_identifier(text: &str) -> bool {
    !text.is_empty()
        && text.split('.').all(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_run_config_defaults() {
        let config = RunConfig::default();
        assert!(!config.debug);
        assert!(config.input_files.is_empty());
        assert_eq!(config.output_root, ".");
        assert_eq!(config.migration_version, "7.1");
        assert_eq!(config.model_base_class, "ApplicationRecord");
        assert!(config.timestamp.is_none());
    }

    #[test]
    fn test_validate_rejects_empty_inputs() {
        let config = RunConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::NoInputFiles)));
    }

    #[test]
    fn test_validate_rejects_blank_only_inputs() {
        let config = RunConfig::with_inputs(["", "   "]);
        assert!(matches!(config.validate(), Err(ConfigError::NoInputFiles)));
    }

    #[test]
    fn test_normalized_drops_blank_entries() {
        let config = RunConfig::with_inputs(["a.py", "", "b.py"]).normalized();
        assert_eq!(config.input_files, vec!["a.py", "b.py"]);
    }

    #[test]
    fn test_validate_timestamp() {
        let mut config = RunConfig::with_inputs(["models.py"]);
        config.timestamp = Some("20240101120000".to_owned());
        assert!(config.validate().is_ok());

        config.timestamp = Some("2024-01-01".to_owned());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timestamp"));
    }

    #[test]
    fn test_validate_base_types() {
        let mut config = RunConfig::with_inputs(["models.py"]);
        config.source_base_type = "models..Model".to_owned();
        assert!(config.validate().is_err());

        config.source_base_type = "Model".to_owned();
        config.model_base_class = "ActiveRecord::Base".to_owned();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_source_module() {
        let mut config = RunConfig::default();
        assert_eq!(config.source_module(), Some("models"));

        config.source_base_type = "Model".to_owned();
        assert_eq!(config.source_module(), None);
    }

    #[test]
    fn test_config_deserialize_with_missing_fields() {
        let json = r#"{"debug": true, "input_files": ["app/models.py"]}"#;
        let config: RunConfig = serde_json::from_str(json).unwrap();
        assert!(config.debug);
        assert_eq!(config.input_files, vec!["app/models.py"]);
        assert_eq!(config.source_base_type, "models.Model");
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"migration_version": "", "input_files": ["m.py"]}}"#).unwrap();

        let path = Utf8Path::from_path(file.path()).unwrap();
        let config = RunConfig::from_json_file(path).unwrap();
        assert_eq!(config.migration_version, "");
        assert_eq!(config.input_files, vec!["m.py"]);
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = RunConfig::from_json_file(Utf8Path::new("/does/not/exist.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
