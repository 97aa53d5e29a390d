//! Project configuration for modshift.
//!
//! Settings are merged from several sources, later ones winning:
//! defaults, `modshift.toml` or `modshift.config.json`, `MODSHIFT_*`
//! environment variables, then command-line overrides.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized, Toml},
};
use modshift_rewrite::{FormatOptions, IndentStyle, QuoteStyle, TranspileOptions};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::discovery::ConfigDiscovery;
use crate::error::{ConfigError, Result};
use crate::types::{OutputFormat, SourceMapMode};

/// Environment variable prefix (`MODSHIFT_OUT_DIR`, `MODSHIFT_FORMAT`, ...)
pub const ENV_PREFIX: &str = "MODSHIFT_";

/// Resolved project configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Registration name for a single transpiled file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_name: Option<String>,

    /// AMD module id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,

    /// Base directory relative imports are joined onto
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir_path: Option<String>,

    /// Directory registration names are relative to
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Entry modules for graph builds
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<PathBuf>,

    /// Bare module names provided at runtime. Empty means every bare name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external: Vec<String>,

    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    #[serde(default)]
    pub sourcemap: SourceMapMode,

    /// Indentation of generated code
    #[serde(default)]
    pub indent: IndentStyle,

    /// Quote style of generated code
    #[serde(default)]
    pub quote: QuoteStyle,

    /// Also write the `System` loader for graph builds
    #[serde(default)]
    pub runtime: bool,
}

/// Values given on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<PathBuf>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourcemap: Option<SourceMapMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<bool>,
}

pub fn default_root() -> PathBuf {
    PathBuf::from(".")
}

pub fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            registry_name: None,
            module_name: None,
            dir_path: None,
            root: default_root(),
            entries: Vec::new(),
            external: Vec::new(),
            out_dir: default_out_dir(),
            sourcemap: SourceMapMode::default(),
            indent: IndentStyle::default(),
            quote: QuoteStyle::default(),
            runtime: false,
        }
    }
}

impl ProjectConfig {
    /// Load configuration from every source.
    ///
    /// `config_path` must exist when given. Otherwise the config file is
    /// discovered in `cwd`, and having none is fine.
    pub fn load(
        config_path: Option<&Path>,
        cwd: &Path,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let file = match config_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => ConfigDiscovery::new(cwd).find(),
        };

        if let Some(path) = file {
            debug!(path = %path.display(), "loading config file");
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file(&path)),
                Some("json") => figment.merge(Json::file(&path)),
                _ => {
                    return Err(ConfigError::UnsupportedFormat(
                        path.display().to_string(),
                    ));
                }
            };
        }

        figment = figment
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .map(|key| env_key_to_field(key.as_str()).into())
                    .lowercase(false),
            )
            .merge(Serialized::defaults(overrides));

        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for logical consistency.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.registry_name {
            if name.trim().is_empty() {
                return Err(ConfigError::invalid_value(
                    "registryName",
                    name.as_str(),
                    "Registration names cannot be empty",
                ));
            }
        }

        if self.module_name.is_some()
            && !matches!(self.format, OutputFormat::Amd | OutputFormat::AmdCjs)
        {
            return Err(ConfigError::invalid_value(
                "moduleName",
                self.format.as_str(),
                "moduleName only applies to the amd and amd-cjs formats",
            ));
        }

        if let Some(dir) = &self.dir_path {
            if dir.starts_with('/') {
                return Err(ConfigError::invalid_value(
                    "dirPath",
                    dir.as_str(),
                    "dirPath is a registry path like 'app', not a filesystem path",
                ));
            }
        }

        for name in &self.external {
            if name.trim().is_empty() {
                return Err(ConfigError::invalid_value(
                    "external",
                    "\"\"",
                    "Remove empty strings from the 'external' list",
                ));
            }
        }

        if let IndentStyle::Spaces(width) = self.indent {
            if width == 0 || width > 8 {
                return Err(ConfigError::invalid_value(
                    "indent",
                    width.to_string(),
                    "Use between 1 and 8 spaces, or \"tabs\"",
                ));
            }
        }

        Ok(())
    }

    /// Formatting of generated code.
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            quote_style: self.quote,
            indent: self.indent,
            ..FormatOptions::default()
        }
    }

    /// Options for transpiling one module registered as `registry_name`.
    ///
    /// Without a configured `dirPath`, relative imports are joined onto the
    /// directory part of the registration name.
    pub fn transpile_options(&self, registry_name: &str) -> TranspileOptions {
        let dir_path = self.dir_path.clone().unwrap_or_else(|| {
            registry_name
                .rsplit_once('/')
                .map(|(dir, _)| dir.to_string())
                .unwrap_or_else(|| ".".to_string())
        });

        let mut options = TranspileOptions::new(registry_name)
            .with_dir_path(dir_path)
            .with_format(self.format_options());
        if let Some(module_name) = &self.module_name {
            options = options.with_module_name(module_name.clone());
        }
        options
    }

    /// Example `modshift.toml` content.
    pub fn example() -> String {
        let example = Self {
            format: OutputFormat::System,
            root: PathBuf::from("src"),
            entries: vec![PathBuf::from("app/main.js")],
            external: vec!["ember".to_string(), "rsvp".to_string()],
            runtime: true,
            ..Self::default()
        };
        toml::to_string_pretty(&example).unwrap_or_default()
    }
}

/// `out_dir` -> `outDir`
fn env_key_to_field(key: &str) -> String {
    let mut field = String::with_capacity(key.len());
    let mut upper = false;
    for ch in key.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            field.extend(ch.to_uppercase());
            upper = false;
        } else {
            field.extend(ch.to_lowercase());
        }
    }
    field
}
