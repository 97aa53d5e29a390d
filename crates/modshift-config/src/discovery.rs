use std::path::{Path, PathBuf};

use tracing::trace;

/// Config file names, in order of preference.
pub const CONFIG_FILES: &[&str] = &["modshift.toml", "modshift.config.json"];

/// Finds the project config file in a directory.
#[derive(Debug, Clone)]
pub struct ConfigDiscovery {
    dir: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// First existing config file, if any.
    pub fn find(&self) -> Option<PathBuf> {
        CONFIG_FILES.iter().find_map(|name| {
            let candidate = self.dir.join(name);
            trace!(path = %candidate.display(), "checking for config file");
            candidate.is_file().then_some(candidate)
        })
    }
}
