use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use thiserror::Error;

const EXTERNAL_PREFIX: &str = "external:";

/// Identity of a module in the graph.
///
/// Local modules are identified by their cleaned path (`.` and `..` segments
/// removed), so two import paths reaching the same file share one identity.
/// External modules keep their bare name behind an `external:` prefix and are
/// never touched on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(PathBuf);

impl ModuleId {
    /// Create an identifier for a local module path.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ModuleIdError> {
        let path = path.as_ref();

        if path.as_os_str().is_empty() {
            return Err(ModuleIdError::EmptyPath);
        }
        if path.to_string_lossy().starts_with(EXTERNAL_PREFIX) {
            return Err(ModuleIdError::ReservedPrefix {
                path: path.to_path_buf(),
            });
        }

        Ok(Self(path.to_path_buf().clean()))
    }

    /// Create an identifier for an external module name (e.g. `ember`).
    pub fn external(name: &str) -> Self {
        Self(PathBuf::from(format!("{EXTERNAL_PREFIX}{name}")))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn is_external(&self) -> bool {
        self.path_string().starts_with(EXTERNAL_PREFIX)
    }

    /// The bare name of an external module.
    pub fn external_name(&self) -> Option<String> {
        self.path_string()
            .strip_prefix(EXTERNAL_PREFIX)
            .map(str::to_string)
    }

    /// Borrow the identifier as a string for logging.
    pub fn path_string(&self) -> Cow<'_, str> {
        self.0.to_string_lossy()
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_string())
    }
}

/// Errors that can occur while constructing a [`ModuleId`].
#[derive(Debug, Error)]
pub enum ModuleIdError {
    #[error("module path cannot be empty")]
    EmptyPath,

    #[error("module path '{}' uses the reserved external prefix", path.display())]
    ReservedPrefix { path: PathBuf },
}
