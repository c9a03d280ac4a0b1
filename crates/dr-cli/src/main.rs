//! CLI entry point for the django2rails converter.
//!
//! This binary converts Django model files into ActiveRecord migrations and
//! model classes.
//!
//! # Usage
//!
//! ```bash
//! django2rails [OPTIONS] <COMMAND>
//!
//! # Convert one app, writing under the current directory
//! django2rails convert blog/models.py
//!
//! # Print what would be written instead of writing it
//! django2rails convert --debug blog/models.py
//!
//! # Walk a project for every models.py
//! django2rails convert --output-root ../rails-app ./src
//!
//! # Show the translated models as JSON
//! django2rails inspect blog/models.py
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use dr_convert::fs::LocalFileSystem;
use dr_convert::{Converter, RunReport, expand_inputs};
use dr_core::{Advisory, RunConfig, TargetModel};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Converts Django models into Rails migrations and ActiveRecord models.
#[derive(Parser)]
#[command(name = "django2rails", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Generate migration and model files.
    Convert {
        /// Input selection.
        #[command(flatten)]
        inputs: InputArgs,

        /// Print each output path and content instead of writing files.
        #[arg(short, long)]
        debug: bool,

        /// JSON run configuration; flags override its values.
        #[arg(short, long, env = "DJANGO2RAILS_CONFIG")]
        config: Option<Utf8PathBuf>,

        /// Directory that `db/migrate` and `app/models` are created under.
        #[arg(short, long, env = "DJANGO2RAILS_OUTPUT_ROOT")]
        output_root: Option<Utf8PathBuf>,

        /// Timestamp of the first migration (`YYYYMMDDHHMMSS`).
        ///
        /// Defaults to the current local time.
        #[arg(long, env = "DJANGO2RAILS_TIMESTAMP")]
        timestamp: Option<String>,

        /// Version written in `ActiveRecord::Migration[...]`.
        #[arg(long, env = "DJANGO2RAILS_MIGRATION_VERSION")]
        migration_version: Option<String>,

        /// Superclass of the generated model classes.
        #[arg(long, env = "DJANGO2RAILS_MODEL_BASE_CLASS")]
        model_base_class: Option<String>,
    },

    /// Print the translated models as JSON without writing anything.
    Inspect {
        /// Input selection.
        #[command(flatten)]
        inputs: InputArgs,
    },
}

/// Arguments shared by every command that reads model files.
#[derive(Args)]
struct InputArgs {
    /// Django model files, or directories to search for them.
    paths: Vec<Utf8PathBuf>,

    /// Base type a class must extend to be treated as a model.
    #[arg(long, env = "DJANGO2RAILS_BASE_TYPE")]
    base_type: Option<String>,

    /// In directories, read every `*.py` file instead of only `models.py`.
    #[arg(long)]
    all_python: bool,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `warn` level by default so that
/// only the generated paths and advisories reach the terminal.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "warn" };
        EnvFilter::new(format!("{level},ignore=warn"))
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Builds a [`RunConfig`] from the config file (if any) and the flags.
///
/// Directory inputs are expanded into the model files they contain.
fn build_config(
    base: RunConfig,
    inputs: &InputArgs,
    overrides: Overrides,
) -> color_eyre::Result<RunConfig> {
    let mut config = base;

    if !inputs.paths.is_empty() {
        config.input_files.clone_from(&inputs.paths);
    }
    if let Some(base_type) = &inputs.base_type {
        config.source_base_type.clone_from(base_type);
    }
    config.debug |= overrides.debug;
    if let Some(root) = overrides.output_root {
        config.output_root = root;
    }
    if let Some(timestamp) = overrides.timestamp {
        config.timestamp = Some(timestamp);
    }
    if let Some(version) = overrides.migration_version {
        config.migration_version = version;
    }
    if let Some(class) = overrides.model_base_class {
        config.model_base_class = class;
    }

    config.input_files = expand_inputs(&config.input_files, inputs.all_python)
        .wrap_err("Failed to collect input files")?;

    Ok(config)
}

/// Flags of `convert` that override the configuration.
#[derive(Default)]
struct Overrides {
    debug: bool,
    output_root: Option<Utf8PathBuf>,
    timestamp: Option<String>,
    migration_version: Option<String>,
    model_base_class: Option<String>,
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Runs a conversion and reports written files and advisories.
fn run_convert(config: RunConfig) -> color_eyre::Result<()> {
    let debug = config.debug;
    let report = Converter::new(config)?.run(&mut LocalFileSystem)?;

    if !debug {
        print_written_files(&report)?;
    }
    print_advisories(&report.advisories)?;

    Ok(())
}

/// Translates the inputs and prints them as JSON.
fn run_inspect(config: RunConfig) -> color_eyre::Result<()> {
    #[derive(serde::Serialize)]
    struct Inspection<'a> {
        models: &'a [TargetModel],
        advisories: &'a [Advisory],
    }

    let mut converter = Converter::new(config)?;
    info!(files = converter.config().input_files.len(), "Inspecting models");

    let mut models = Vec::new();
    let mut advisories = Vec::new();

    let inputs = converter.config().input_files.clone();
    for path in &inputs {
        let translated = converter.translate_file(&mut LocalFileSystem, path)?;
        models.extend(translated.collect_into(&mut advisories));
    }

    let json = serde_json::to_string_pretty(&Inspection {
        models: &models,
        advisories: &advisories,
    })
    .wrap_err("Failed to serialize JSON")?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{json}")?;

    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Prints one `Wrote <path>` line per generated file.
fn print_written_files(report: &RunReport) -> std::io::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    for file in &report.files {
        writeln!(handle, "Wrote {}", file.path)?;
    }

    Ok(())
}

/// Prints advisories to stderr, in the order they were raised.
fn print_advisories(advisories: &[Advisory]) -> std::io::Result<()> {
    if advisories.is_empty() {
        return Ok(());
    }

    let stderr = std::io::stderr();
    let mut handle = stderr.lock();

    writeln!(handle)?;
    for advisory in advisories {
        writeln!(handle, "{advisory}")?;
    }

    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Route to appropriate command
    match cli.command {
        Commands::Convert {
            inputs,
            debug,
            config,
            output_root,
            timestamp,
            migration_version,
            model_base_class,
        } => {
            let base = match &config {
                Some(path) => RunConfig::from_json_file(path)
                    .wrap_err_with(|| format!("Failed to load configuration from {path}"))?,
                None => RunConfig::default(),
            };
            let overrides = Overrides {
                debug,
                output_root,
                timestamp,
                migration_version,
                model_base_class,
            };
            run_convert(build_config(base, &inputs, overrides)?)
        }
        Commands::Inspect { inputs } => {
            run_inspect(build_config(RunConfig::default(), &inputs, Overrides::default())?)
        }
    }
}
