//! Source loading abstraction.
//!
//! The graph never touches `std::fs` directly. Everything goes through a
//! [`SourceLoader`], so graphs can be built from disk or from in-memory
//! fixtures.

use std::fmt::Debug;
use std::io;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use rustc_hash::FxHashMap;

/// Reads module sources for the graph
pub trait SourceLoader: Send + Sync + Debug {
    /// Read a module's source text.
    fn read(&self, path: &Path) -> io::Result<String>;

    /// Whether `path` is a readable file.
    fn is_file(&self, path: &Path) -> bool;
}

/// Loader backed by the real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Loader serving a fixed set of files from memory
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    files: FxHashMap<PathBuf, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, replacing any previous content at the same path.
    pub fn insert(&mut self, path: impl AsRef<Path>, source: impl Into<String>) {
        self.files.insert(path.as_ref().to_path_buf().clean(), source.into());
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl SourceLoader for MemoryLoader {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(&path.to_path_buf().clean())
            .cloned()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no in-memory file at {}", path.display()),
                )
            })
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(&path.to_path_buf().clean())
    }
}
