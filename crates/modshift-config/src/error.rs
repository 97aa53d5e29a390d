//! Error types for configuration loading and validation.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An explicitly requested config file doesn't exist
    #[error("Config file not found: {}", .0.display())]
    #[diagnostic(
        code(modshift::config::not_found),
        help("Create a modshift.toml file or pass an existing file to --config")
    )]
    NotFound(PathBuf),

    #[error("Unsupported configuration format: {0}")]
    #[diagnostic(
        code(modshift::config::unsupported_format),
        help("Use a .toml or .json config file")
    )]
    UnsupportedFormat(String),

    /// Missing required configuration field
    #[error("Missing required field: {field}")]
    #[diagnostic(code(modshift::config::missing_field), help("{hint}"))]
    MissingField { field: String, hint: String },

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}")]
    #[diagnostic(code(modshift::config::invalid_value), help("{hint}"))]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },

    #[error("Failed to read config file: {0}")]
    #[diagnostic(code(modshift::config::io))]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            hint: hint.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            hint: hint.into(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        let field = if err.path.is_empty() {
            "configuration".to_string()
        } else {
            err.path.join(".")
        };
        Self::InvalidValue {
            field,
            value: err.kind.to_string(),
            hint: "Check modshift.toml, modshift.config.json and MODSHIFT_* variables".to_string(),
        }
    }
}
