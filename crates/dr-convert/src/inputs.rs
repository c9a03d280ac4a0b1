//! Expansion of input paths into Django model files.
//!
//! Input files are used as given. Input directories are walked with the
//! `ignore` crate, so `.gitignore` rules, hidden files and the usual virtual
//! environment directories are skipped.

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use tracing::debug;

use crate::error::ConvertError;

/// Directories never searched for model files.
const SKIP_DIRECTORIES: &[&str] = &[
    "__pycache__",
    ".git",
    ".tox",
    ".venv",
    "venv",
    "env",
    "node_modules",
    "site-packages",
    "migrations",
];

/// Name of the file Django keeps an app's models in.
const MODELS_FILE_NAME: &str = "models.py";

/// Finds Django model files below a directory.
///
/// By default only files named `models.py` are collected. With
/// [`all_python`](Self::all_python) every `*.py` file is, which suits apps
/// that split their models into a `models/` package.
#[derive(Debug)]
pub struct ModelFileWalker {
    /// The root directory to walk.
    root: Utf8PathBuf,
    /// Collect every Python file, not just `models.py`.
    all_python: bool,
}

impl ModelFileWalker {
    /// Creates a walker for `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Read`] if `root` is not a readable directory.
    pub fn new(root: &Utf8Path) -> Result<Self, ConvertError> {
        if !root.is_dir() {
            return Err(ConvertError::read(
                root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }

        Ok(Self {
            root: root.to_owned(),
            all_python: false,
        })
    }

    /// Collects every `*.py` file instead of only `models.py`.
    #[must_use]
    pub const fn all_python(mut self, all_python: bool) -> Self {
        self.all_python = all_python;
        self
    }

    /// Collects matching files, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Walk`] if traversal fails and
    /// [`ConvertError::NonUtf8Path`] for a path that is not UTF-8.
    pub fn collect_paths(&self) -> Result<Vec<Utf8PathBuf>, ConvertError> {
        let mut paths = Vec::new();

        let walker = WalkBuilder::new(&self.root)
            .standard_filters(true)
            .require_git(false)
            .sort_by_file_name(std::ffi::OsStr::cmp)
            .build();

        for result in walker {
            let entry = result?;

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let utf8_path =
                Utf8Path::from_path(path).ok_or_else(|| ConvertError::NonUtf8Path(path.to_owned()))?;

            let relative = utf8_path.strip_prefix(&self.root).unwrap_or(utf8_path);
            if !self.is_model_file(utf8_path) || is_skipped(relative) {
                continue;
            }

            paths.push(utf8_path.to_owned());
        }

        debug!(root = %self.root, count = paths.len(), "collected model files");
        Ok(paths)
    }

    fn is_model_file(&self, path: &Utf8Path) -> bool {
        if self.all_python {
            path.extension() == Some("py")
        } else {
            path.file_name() == Some(MODELS_FILE_NAME)
        }
    }
}

/// Checks if any directory component is in the skip list.
fn is_skipped(path: &Utf8Path) -> bool {
    path.components()
        .any(|component| SKIP_DIRECTORIES.contains(&component.as_str()))
}

/// Expands input paths: files pass through, directories are walked.
///
/// The result keeps the order of `inputs`; files found in one directory are
/// sorted by path. A path that does not exist is kept, so reading it reports
/// the error later with the path attached.
///
/// # Errors
///
/// Returns the first error of walking a directory.
pub fn expand_inputs(
    inputs: &[Utf8PathBuf],
    all_python: bool,
) -> Result<Vec<Utf8PathBuf>, ConvertError> {
    let mut expanded = Vec::with_capacity(inputs.len());

    for input in inputs {
        if input.is_dir() {
            let found = ModelFileWalker::new(input)?
                .all_python(all_python)
                .collect_paths()?;
            expanded.extend(found);
        } else {
            expanded.push(input.clone());
        }
    }

    Ok(expanded)
}
