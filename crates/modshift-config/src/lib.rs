//! Configuration for the modshift transpiler.
//!
//! ```
//! use modshift_config::{OutputFormat, ProjectConfig};
//!
//! let config = ProjectConfig::default();
//! assert_eq!(config.format, OutputFormat::Cjs);
//! assert!(config.validate().is_ok());
//! ```

mod config;
mod discovery;
pub mod error;
mod types;

pub use config::{ConfigOverrides, ENV_PREFIX, ProjectConfig, default_out_dir, default_root};
pub use discovery::{CONFIG_FILES, ConfigDiscovery};
pub use error::{ConfigError, Result};
pub use types::{OutputFormat, SourceMapMode};
