//! File system access used by the converter.
//!
//! The converter only ever reads whole input files and writes whole output
//! files, so [`FileSystem`] is two methods wide. Three implementations ship
//! with the crate:
//!
//! - [`LocalFileSystem`] reads and writes the real disk
//! - [`DryRun`] reads through another file system and prints writes instead
//! - [`MemoryFileSystem`] keeps everything in memory

use std::collections::BTreeMap;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};

/// Separator printed before each dry-run file.
const DRY_RUN_SEPARATOR: &str = "---------------------------------------------";

/// Whole-file text access.
pub trait FileSystem {
    /// Reads a UTF-8 text file.
    fn read_text(&mut self, path: &Utf8Path) -> io::Result<String>;

    /// Writes a text file, replacing any existing content.
    fn write_text(&mut self, path: &Utf8Path, content: &str) -> io::Result<()>;
}

impl<F: FileSystem + ?Sized> FileSystem for &mut F {
    fn read_text(&mut self, path: &Utf8Path) -> io::Result<String> {
        (**self).read_text(path)
    }

    fn write_text(&mut self, path: &Utf8Path, content: &str) -> io::Result<()> {
        (**self).write_text(path, content)
    }
}

/// The real file system.
///
/// Parent directories of written files are created as needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn read_text(&mut self, path: &Utf8Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write_text(&mut self, path: &Utf8Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
    }
}

/// Prints writes instead of performing them.
///
/// Reads go to the wrapped file system. Each write prints a separator line,
/// `<path> will contain:` and the content.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use dr_convert::fs::{DryRun, FileSystem, MemoryFileSystem};
///
/// let mut dry = DryRun::new(MemoryFileSystem::new(), Vec::new());
/// dry.write_text(Utf8Path::new("app/models/tag.rb"), "class Tag < ApplicationRecord\nend\n")?;
///
/// let (inner, printed) = dry.into_parts();
/// assert!(inner.is_empty());
/// assert!(String::from_utf8_lossy(&printed).contains("app/models/tag.rb will contain:"));
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct DryRun<F, W = io::Stdout> {
    inner: F,
    out: W,
}

impl<F> DryRun<F> {
    /// Wraps `inner`, printing writes to standard output.
    pub fn stdout(inner: F) -> Self {
        Self::new(inner, io::stdout())
    }
}

impl<F, W> DryRun<F, W> {
    /// Wraps `inner`, printing writes to `out`.
    pub const fn new(inner: F, out: W) -> Self {
        Self { inner, out }
    }

    /// Returns the wrapped file system and the output sink.
    pub fn into_parts(self) -> (F, W) {
        (self.inner, self.out)
    }
}

impl<F: FileSystem, W: io::Write> FileSystem for DryRun<F, W> {
    fn read_text(&mut self, path: &Utf8Path) -> io::Result<String> {
        self.inner.read_text(path)
    }

    fn write_text(&mut self, path: &Utf8Path, content: &str) -> io::Result<()> {
        writeln!(self.out, "{DRY_RUN_SEPARATOR}")?;
        writeln!(self.out, "{path} will contain:")?;
        self.out.write_all(content.as_bytes())?;
        if !content.ends_with('\n') {
            writeln!(self.out)?;
        }
        self.out.flush()
    }
}

/// An in-memory file system.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use dr_convert::fs::{FileSystem, MemoryFileSystem};
///
/// let mut fs = MemoryFileSystem::new().with_file("models.py", "class A: pass\n");
/// assert_eq!(fs.read_text(Utf8Path::new("models.py"))?, "class A: pass\n");
/// assert!(fs.read_text(Utf8Path::new("missing.py")).is_err());
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryFileSystem {
    files: BTreeMap<Utf8PathBuf, String>,
}

impl MemoryFileSystem {
    /// Creates an empty file system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<Utf8PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Returns the content of a file.
    pub fn get(&self, path: impl AsRef<Utf8Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    /// Iterates over all files in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&Utf8Path, &str)> {
        self.files
            .iter()
            .map(|(path, content)| (path.as_path(), content.as_str()))
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if there is no file.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_text(&mut self, path: &Utf8Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{path} does not exist"))
        })
    }

    fn write_text(&mut self, path: &Utf8Path, content: &str) -> io::Result<()> {
        self.files.insert(path.to_owned(), content.to_owned());
        Ok(())
    }
}
