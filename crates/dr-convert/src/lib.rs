//! Translation of Django models into ActiveRecord migrations and models.
//!
//! This crate is the conversion engine of django2rails. It reads Django model
//! files, parses them with `dr-py-parser`, translates every model and writes
//! a migration and a model file for each.
//!
//! # Overview
//!
//! The main entry point is [`Converter`], which drives the pipeline:
//!
//! - [`translate_model`]: columns via the type table, plus associations
//! - [`render`]: Ruby source for the migration and the model class
//! - [`fs::FileSystem`]: where input is read and output goes
//!
//! # Example
//!
//! ```
//! use dr_convert::Converter;
//! use dr_convert::fs::MemoryFileSystem;
//! use dr_core::RunConfig;
//!
//! let mut fs = MemoryFileSystem::new().with_file(
//!     "blog/models.py",
//!     "class Widget(models.Model):\n    name = models.CharField(max_length=40)\n",
//! );
//!
//! let mut config = RunConfig::with_inputs(["blog/models.py"]);
//! config.timestamp = Some("20240101120000".to_owned());
//!
//! let report = Converter::new(config)?.run(&mut fs)?;
//!
//! assert_eq!(report.models[0].table, "widgets");
//! assert!(fs.get("db/migrate/20240101120000_create_widgets.rb").is_some());
//! assert!(fs.get("app/models/widget.rb").is_some());
//! # Ok::<(), dr_convert::ConvertError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! Converter (main entry point)
//!     │
//!     ├── ModelParser (dr-py-parser)
//!     │
//!     ├── translate_model
//!     │       ├── translate_field (typemap + coerce)
//!     │       └── derive_associations
//!     │
//!     ├── render_migration / render_model
//!     │
//!     └── FileSystem (local, dry run, in memory)
//! ```
//!
//! Translation and rendering are pure. Advisories travel back to the caller
//! in [`RunReport::advisories`] instead of being printed along the way.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod association;
mod coerce;
mod error;
mod field;
pub mod fs;
pub mod inputs;
mod model;
pub mod render;
pub mod typemap;

pub use association::derive_associations;
pub use coerce::{coerce, unquote};
pub use error::ConvertError;
pub use field::{OMITTED_FIELDS, translate_field};
pub use inputs::{ModelFileWalker, expand_inputs};
pub use model::translate_model;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{Local, NaiveDateTime, TimeDelta};
use dr_core::config::TIMESTAMP_FORMAT;
use dr_core::{Advisory, ConfigError, EnglishInflector, Inflector, RunConfig, TargetModel, Translated};
use dr_py_parser::{ModelParser, ParseError};
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::fs::{DryRun, FileSystem};
use crate::render::{RenderSettings, render_migration, render_model};

/// Which generated file a [`GeneratedFile`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// `db/migrate/<timestamp>_create_<table>.rb`
    Migration,
    /// `app/models/<name>.rb`
    Model,
}

/// A file written (or, in debug mode, printed) by a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    /// Kind of file.
    pub kind: OutputKind,

    /// Class name of the model the file belongs to.
    pub model: String,

    /// Output path.
    pub path: Utf8PathBuf,
}

/// Result of a conversion run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    /// Every translated model, in input order.
    pub models: Vec<TargetModel>,

    /// Every generated file, in write order.
    pub files: Vec<GeneratedFile>,

    /// Advisories raised during the run, in the order they were raised.
    pub advisories: Vec<Advisory>,
}

/// Hands out strictly increasing migration timestamps, one second apart.
#[derive(Debug, Clone)]
struct MigrationClock {
    next: NaiveDateTime,
}

impl MigrationClock {
    fn tick(&mut self) -> String {
        let timestamp = self.next.format(TIMESTAMP_FORMAT).to_string();
        self.next += TimeDelta::seconds(1);
        timestamp
    }
}

/// Converts Django model files into Rails files.
///
/// A converter owns its parser, so it can be reused for several runs.
///
/// # Examples
///
/// ```
/// use dr_convert::{ConvertError, Converter};
/// use dr_core::{ConfigError, RunConfig};
///
/// let err = Converter::new(RunConfig::with_inputs(["  "])).unwrap_err();
/// assert!(matches!(err, ConvertError::Config(ConfigError::NoInputFiles)));
/// ```
pub struct Converter<I = EnglishInflector> {
    config: RunConfig,
    settings: RenderSettings,
    parser: ModelParser,
    inflector: I,
}

impl Converter<EnglishInflector> {
    /// Creates a converter for a run configuration.
    ///
    /// Blank input entries are dropped before validation.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::Config`] if the configuration is invalid, including
    ///   when no input file is left
    /// - [`ConvertError::ParserInit`] if the Python parser cannot be set up
    pub fn new(config: RunConfig) -> Result<Self, ConvertError> {
        let config = config.normalized();
        config.validate()?;

        let parser = ModelParser::with_base_type(config.source_base_type.trim())?;

        Ok(Self {
            settings: RenderSettings::from_config(&config),
            config,
            parser,
            inflector: EnglishInflector,
        })
    }
}

impl<I: Inflector> Converter<I> {
    /// Replaces the inflector used for table, class and file names.
    pub fn with_inflector<J: Inflector>(self, inflector: J) -> Converter<J> {
        Converter {
            config: self.config,
            settings: self.settings,
            parser: self.parser,
            inflector,
        }
    }

    /// Returns the validated configuration.
    #[inline]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Extracts and translates the models of one source text.
    ///
    /// # Errors
    ///
    /// Returns the parser error if the source cannot be parsed at all.
    pub fn translate_source(
        &mut self,
        source: &str,
    ) -> Result<Translated<Vec<TargetModel>>, ParseError> {
        let mut advisories = Vec::new();
        let models = self
            .parser
            .parse(source)?
            .iter()
            .map(|model| {
                info!(model = %model.name, fields = model.fields.len(), "translating model");
                translate_model(model, &self.inflector).collect_into(&mut advisories)
            })
            .collect();

        Ok(Translated {
            value: models,
            advisories,
        })
    }

    /// Reads one input file and translates its models.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Read`] or [`ConvertError::Parse`] with the
    /// path attached.
    pub fn translate_file<F: FileSystem + ?Sized>(
        &mut self,
        fs: &mut F,
        path: &Utf8Path,
    ) -> Result<Translated<Vec<TargetModel>>, ConvertError> {
        let source = fs
            .read_text(path)
            .map_err(|e| ConvertError::read(path, e))?;
        self.translate_source(&source)
            .map_err(|e| ConvertError::parse(path, e))
    }

    /// Runs the conversion over every configured input file.
    ///
    /// Files are processed in order. For each file, all models are translated
    /// and rendered before anything is written; then the migration and the
    /// model file of each model are written in turn. In debug mode writes are
    /// printed to standard output instead.
    ///
    /// # Errors
    ///
    /// Stops at the first read, parse or write failure.
    pub fn run<F: FileSystem + ?Sized>(&mut self, fs: &mut F) -> Result<RunReport, ConvertError> {
        if self.config.debug {
            let mut dry_run = DryRun::stdout(fs);
            self.run_with(&mut dry_run)
        } else {
            self.run_with(fs)
        }
    }

    fn run_with<F: FileSystem + ?Sized>(&mut self, fs: &mut F) -> Result<RunReport, ConvertError> {
        let mut clock = MigrationClock {
            next: self.base_timestamp()?,
        };
        let mut report = RunReport::default();
        let mut defined_in: FxHashMap<String, Utf8PathBuf> = FxHashMap::default();

        info!(
            files = self.config.input_files.len(),
            debug = self.config.debug,
            "Starting conversion"
        );

        let inputs = self.config.input_files.clone();
        for path in &inputs {
            info!(path = %path, "Converting file");

            let models = self
                .translate_file(fs, path)?
                .collect_into(&mut report.advisories);

            if models.is_empty() {
                warn!(path = %path, "No models found");
            }

            let mut outputs = Vec::with_capacity(models.len() * 2);
            for model in &models {
                if let Some(previous) = defined_in.insert(model.name.clone(), path.clone()) {
                    warn!(
                        model = %model.name,
                        first = %previous,
                        again = %path,
                        "Model defined more than once, later files overwrite earlier ones"
                    );
                }
                outputs.extend(self.render_files(model, &clock.tick()));
            }

            for (file, content) in outputs {
                fs.write_text(&file.path, &content)
                    .map_err(|e| ConvertError::write(&file.path, e))?;
                debug!(path = %file.path, kind = ?file.kind, "Generated file");
                report.files.push(file);
            }

            report.models.extend(models);
        }

        info!(
            models = report.models.len(),
            files = report.files.len(),
            advisories = report.advisories.len(),
            "Conversion completed"
        );

        Ok(report)
    }

    /// Renders the migration and the model file of `model`.
    fn render_files(&self, model: &TargetModel, timestamp: &str) -> [(GeneratedFile, String); 2] {
        let migration = GeneratedFile {
            kind: OutputKind::Migration,
            model: model.name.clone(),
            path: self.output_path(
                Utf8Path::new("db")
                    .join("migrate")
                    .join(format!("{timestamp}_create_{}.rb", model.table)),
            ),
        };
        let class = GeneratedFile {
            kind: OutputKind::Model,
            model: model.name.clone(),
            path: self.output_path(
                Utf8Path::new("app")
                    .join("models")
                    .join(format!("{}.rb", self.inflector.underscore(&model.name))),
            ),
        };

        [
            (
                migration,
                render_migration(model, &self.settings, &self.inflector),
            ),
            (class, render_model(model, &self.settings)),
        ]
    }

    /// Places a relative output path under the configured output root.
    fn output_path(&self, relative: Utf8PathBuf) -> Utf8PathBuf {
        let root = self.config.output_root.as_str().trim();
        if root.is_empty() || root == "." {
            relative
        } else {
            Utf8Path::new(root).join(relative)
        }
    }

    /// The configured timestamp, or the current local time.
    fn base_timestamp(&self) -> Result<NaiveDateTime, ConvertError> {
        match &self.config.timestamp {
            Some(timestamp) => NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
                .map_err(|e| {
                    ConvertError::from(ConfigError::invalid_option(
                        "timestamp",
                        format!("'{timestamp}' is not a valid time: {e}"),
                    ))
                }),
            None => Ok(Local::now().naive_local()),
        }
    }
}

impl<I> std::fmt::Debug for Converter<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("config", &self.config)
            .field("parser", &self.parser)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;

    fn config(inputs: &[&str]) -> RunConfig {
        let mut config = RunConfig::with_inputs(inputs.iter().copied());
        config.timestamp = Some("20240131235959".to_owned());
        config
    }

    const BLOG: &str = r#"from django.db import models


class Category(models.Model):
    name = models.CharField(max_length=40)
    created_at = models.DateTimeField()


class Post(models.Model):
    title = models.CharField(max_length=200)
    author = models.ForeignKey('Writer', on_delete=models.CASCADE)
    category = models.ForeignKey(Category, on_delete=models.CASCADE)
    groups = models.ManyToManyField('Group', through='Membership')
"#;

    fn blog() -> MemoryFileSystem {
        MemoryFileSystem::new().with_file("blog/models.py", BLOG)
    }

    fn run(config: RunConfig, fs: &mut MemoryFileSystem) -> RunReport {
        Converter::new(config)
            .expect("valid config")
            .run(fs)
            .expect("run succeeds")
    }

    #[test]
    fn test_run_writes_migration_then_model() {
        let mut fs = blog();
        let report = run(config(&["blog/models.py"]), &mut fs);

        let written: Vec<_> = report
            .files
            .iter()
            .map(|f| (f.kind, f.model.as_str(), f.path.as_str()))
            .collect();
        assert_eq!(
            written,
            [
                (
                    OutputKind::Migration,
                    "Category",
                    "db/migrate/20240131235959_create_categories.rb"
                ),
                (OutputKind::Model, "Category", "app/models/category.rb"),
                (
                    OutputKind::Migration,
                    "Post",
                    "db/migrate/20240201000000_create_posts.rb"
                ),
                (OutputKind::Model, "Post", "app/models/post.rb"),
            ]
        );
        assert_eq!(fs.len(), 5);
        assert!(report.advisories.is_empty());
    }

    #[test]
    fn test_single_column_model() {
        let mut fs = blog();
        run(config(&["blog/models.py"]), &mut fs);

        let migration = fs
            .get("db/migrate/20240131235959_create_categories.rb")
            .expect("migration written");
        insta::assert_snapshot!(migration, @r"
class CreateCategories < ActiveRecord::Migration[7.1]
  def change
    create_table :categories do |t|
      t.string :name, limit: 40

      t.timestamps
    end
  end
end
");
        assert_eq!(
            fs.get("app/models/category.rb"),
            Some("class Category < ApplicationRecord\nend\n")
        );
    }

    #[test]
    fn test_references_and_associations() {
        let mut fs = blog();
        run(config(&["blog/models.py"]), &mut fs);

        let migration = fs
            .get("db/migrate/20240201000000_create_posts.rb")
            .expect("migration written");
        insta::assert_snapshot!(migration, @r"
class CreatePosts < ActiveRecord::Migration[7.1]
  def change
    create_table :posts do |t|
      t.string :title, limit: 200
      t.integer :author_id
      t.integer :category_id

      t.timestamps
    end

    add_index :posts, :author_id
    add_index :posts, :category_id
  end
end
");

        let class = fs.get("app/models/post.rb").expect("model written");
        insta::assert_snapshot!(class, @r#"
class Post < ApplicationRecord
  belongs_to :author, class_name: "Writer"
  belongs_to :category
  has_many :memberships
  has_many :groups, through: :memberships
end
"#);
    }

    #[test]
    fn test_runs_are_deterministic() {
        let mut first = blog();
        let mut second = blog();

        let first_report = run(config(&["blog/models.py"]), &mut first);
        let second_report = run(config(&["blog/models.py"]), &mut second);

        assert_eq!(first, second);
        assert_eq!(first_report, second_report);
    }

    #[test]
    fn test_files_processed_in_input_order() {
        let mut fs = MemoryFileSystem::new()
            .with_file(
                "b/models.py",
                "class Badge(models.Model):\n    email = models.EmailField()\n",
            )
            .with_file(
                "a/models.py",
                "class Alpha(models.Model):\n    count = models.PositiveIntegerField()\n",
            );
        let report = run(config(&["b/models.py", "a/models.py"]), &mut fs);

        let names: Vec<_> = report.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Badge", "Alpha"]);

        let messages: Vec<_> = report.advisories.iter().map(|a| a.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "`Badge#email` is an EmailField, which may need to be accounted for in the model",
                "`Alpha#count` is unsigned",
            ]
        );
        assert!(fs.get("db/migrate/20240131235959_create_badges.rb").is_some());
        assert!(fs.get("db/migrate/20240201000000_create_alphas.rb").is_some());
    }

    #[test]
    fn test_debug_mode_writes_nothing() {
        let mut debug = config(&["blog/models.py"]);
        debug.debug = true;

        let mut fs = blog();
        let report = run(debug, &mut fs);

        assert_eq!(report.files.len(), 4);
        assert_eq!(fs, blog());
    }

    #[test]
    fn test_blank_inputs_are_rejected() {
        let err = Converter::new(config(&["", "   "])).expect_err("no input left");
        assert!(matches!(err, ConvertError::Config(ConfigError::NoInputFiles)));
    }

    #[test]
    fn test_file_without_models() {
        let mut fs = MemoryFileSystem::new().with_file("util.py", "def helper():\n    pass\n");
        let report = run(config(&["util.py"]), &mut fs);

        assert!(report.models.is_empty());
        assert!(report.files.is_empty());
        assert_eq!(fs.len(), 1);
    }

    #[test]
    fn test_report_serializes() {
        let mut fs = blog();
        let report = run(config(&["blog/models.py"]), &mut fs);

        let json = serde_json::to_value(&report).expect("serializable");
        assert_eq!(json["files"][0]["kind"], "migration");
        assert_eq!(json["models"][1]["table"], "posts");
    }

    #[test]
    fn test_clock_is_strictly_increasing() {
        let mut clock = MigrationClock {
            next: NaiveDateTime::parse_from_str("20240131235959", TIMESTAMP_FORMAT)
                .expect("valid timestamp"),
        };

        assert_eq!(clock.tick(), "20240131235959");
        assert_eq!(clock.tick(), "20240201000000");
        assert_eq!(clock.tick(), "20240201000001");
    }

    #[test]
    fn test_invalid_timestamp_is_config_error() {
        let mut bad = config(&["models.py"]);
        bad.timestamp = Some("20241399000000".to_owned());
        let mut converter = Converter::new(bad).expect("shape is valid");

        let mut fs = MemoryFileSystem::new().with_file("models.py", "");
        let err = converter.run(&mut fs).expect_err("month 13 is invalid");
        assert!(matches!(err, ConvertError::Config(ConfigError::InvalidOption { .. })));
    }

    #[test]
    fn test_output_root() {
        let mut rooted = config(&["models.py"]);
        rooted.output_root = Utf8PathBuf::from("rails");
        let mut converter = Converter::new(rooted).expect("valid config");

        let mut fs = MemoryFileSystem::new()
            .with_file("models.py", "class Tag(models.Model):\n    label = models.CharField()\n");
        let report = converter.run(&mut fs).expect("run");

        let paths: Vec<_> = report.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "rails/db/migrate/20240131235959_create_tags.rb",
                "rails/app/models/tag.rb",
            ]
        );
    }

    #[test]
    fn test_missing_input_is_read_error() {
        let mut converter = Converter::new(config(&["missing.py"])).expect("valid config");
        let mut fs = MemoryFileSystem::new();

        let err = converter.run(&mut fs).expect_err("missing input");
        assert!(matches!(err, ConvertError::Read { .. }));
        assert_eq!(err.path().map(|p| p.as_str()), Some("missing.py"));
        assert!(fs.is_empty());
    }

    #[test]
    fn test_translate_source() {
        let mut converter = Converter::new(config(&["models.py"])).expect("valid config");
        let translated = converter
            .translate_source("class Item(models.Model):\n    data = models.JSONField()\n")
            .expect("parse");

        assert_eq!(translated.value.len(), 1);
        assert!(translated.value[0].fields.is_empty());
        assert_eq!(translated.advisories.len(), 1);
    }

    #[test]
    fn test_custom_base_type() {
        let mut custom = config(&["models.py"]);
        custom.source_base_type = "db.Base".to_owned();
        let mut converter = Converter::new(custom).expect("valid config");

        let translated = converter
            .translate_source("class A(db.Base):\n    x = db.IntegerField()\n\nclass B(models.Model):\n    y = models.IntegerField()\n")
            .expect("parse");

        let names: Vec<_> = translated.value.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["A"]);
    }

    #[test]
    fn test_converter_debug() {
        let converter = Converter::new(config(&["models.py"])).expect("valid config");
        let debug = format!("{converter:?}");
        assert!(debug.contains("Converter"));
        assert!(debug.contains("models.py"));
    }
}
