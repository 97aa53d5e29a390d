//! Per-module transpile configuration

use std::path::Path;

use path_clean::PathClean;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TranspileError};
use crate::format::FormatOptions;

/// Options for rewriting a single module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranspileOptions {
    /// Name the module registers itself under in the shared registry (required)
    pub registry_name: Option<String>,
    /// Explicit module id for wrappers that accept one (AMD `define`)
    pub module_name: Option<String>,
    /// Base directory joined with relative import paths to form registry keys
    pub dir_path: Option<String>,
    /// Formatting of generated code
    pub format: FormatOptions,
}

impl TranspileOptions {
    /// Options registering the module as `registry_name`
    pub fn new(registry_name: impl Into<String>) -> Self {
        Self {
            registry_name: Some(registry_name.into()),
            ..Self::default()
        }
    }

    pub fn with_dir_path(mut self, dir_path: impl Into<String>) -> Self {
        self.dir_path = Some(dir_path.into());
        self
    }

    pub fn with_module_name(mut self, module_name: impl Into<String>) -> Self {
        self.module_name = Some(module_name.into());
        self
    }

    pub fn with_format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    /// The registration name, or a configuration error when absent.
    pub fn registry_name(&self) -> Result<&str> {
        match self.registry_name.as_deref() {
            Some(name) if !name.trim().is_empty() => Ok(name),
            Some(_) => Err(TranspileError::missing_configuration(
                "registryName",
                "registry name must not be empty",
            )),
            None => Err(TranspileError::missing_configuration(
                "registryName",
                "a registry name is required to register the module",
            )),
        }
    }

    /// Registry key for an imported module path.
    ///
    /// Relative paths are joined onto `dir_path`; bare names are used verbatim.
    pub fn registry_key(&self, source: &str) -> Result<String> {
        if !is_relative(source) {
            return Ok(source.to_string());
        }

        let dir_path = self.dir_path.as_deref().ok_or_else(|| {
            TranspileError::missing_configuration(
                "dirPath",
                format!("can't resolve relative path '{source}' without being passed a dirPath"),
            )
        })?;

        Ok(join_registry_path(dir_path, source))
    }
}

/// Whether an import path is relative to the importing module.
pub fn is_relative(source: &str) -> bool {
    source == "."
        || source == ".."
        || source.starts_with("./")
        || source.starts_with("../")
}

/// Join a relative import onto a base directory, normalizing `.`/`..` segments
/// and always using `/` separators.
pub fn join_registry_path(dir_path: &str, source: &str) -> String {
    let joined = Path::new(dir_path).join(source).clean();
    let key = joined.to_string_lossy().replace('\\', "/");
    key.strip_prefix("./").map(str::to_string).unwrap_or(key)
}
