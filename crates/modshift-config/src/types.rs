use std::fmt;
use std::str::FromStr;

use modshift_rewrite::TargetKind;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Output format for transpiled modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Cjs,
    Amd,
    AmdCjs,
    Yui,
    /// Whole-graph `System.register` output
    System,
    /// Whole-graph CommonJS output with `require` paths between output files
    Commonjs,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Cjs => "cjs",
            OutputFormat::Amd => "amd",
            OutputFormat::AmdCjs => "amd-cjs",
            OutputFormat::Yui => "yui",
            OutputFormat::System => "system",
            OutputFormat::Commonjs => "commonjs",
        }
    }

    /// The per-file target, `None` for graph formats.
    pub fn target_kind(self) -> Option<TargetKind> {
        match self {
            OutputFormat::Cjs => Some(TargetKind::Cjs),
            OutputFormat::Amd => Some(TargetKind::Amd),
            OutputFormat::AmdCjs => Some(TargetKind::AmdCjs),
            OutputFormat::Yui => Some(TargetKind::Yui),
            OutputFormat::System | OutputFormat::Commonjs => None,
        }
    }

    pub fn is_graph(self) -> bool {
        self.target_kind().is_none()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "cjs" => Ok(OutputFormat::Cjs),
            "amd" => Ok(OutputFormat::Amd),
            "amd-cjs" | "amdWrappedCjs" => Ok(OutputFormat::AmdCjs),
            "yui" => Ok(OutputFormat::Yui),
            "system" => Ok(OutputFormat::System),
            "commonjs" => Ok(OutputFormat::Commonjs),
            other => Err(ConfigError::invalid_value(
                "format",
                other,
                "Use cjs, amd, amd-cjs, yui, system or commonjs",
            )),
        }
    }
}

/// Source map output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMapMode {
    /// `<file>.map` next to the output, linked by a comment
    #[default]
    External,
    /// Data URL comment at the end of the output
    Inline,
    None,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names() {
        for format in [
            OutputFormat::Cjs,
            OutputFormat::Amd,
            OutputFormat::AmdCjs,
            OutputFormat::Yui,
            OutputFormat::System,
            OutputFormat::Commonjs,
        ] {
            assert_eq!(format.as_str().parse::<OutputFormat>().unwrap(), format);
            assert_eq!(
                serde_json::to_string(&format).unwrap(),
                format!("\"{}\"", format.as_str())
            );
        }
        assert!("umd".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_graph_formats() {
        assert!(OutputFormat::System.is_graph());
        assert!(OutputFormat::Commonjs.is_graph());
        assert_eq!(OutputFormat::Amd.target_kind(), Some(TargetKind::Amd));
        assert_eq!(OutputFormat::Yui.target_kind(), Some(TargetKind::Yui));
    }
}
