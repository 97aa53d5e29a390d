use clap::ValueEnum;
use modshift_config::{OutputFormat, SourceMapMode};

/// Per-file output format
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum Format {
    /// CommonJS registered in the shared module registry
    #[value(name = "cjs")]
    Cjs,

    /// An AMD `define` receiving dependencies as arguments
    #[value(name = "amd")]
    Amd,

    /// The CommonJS output wrapped in an AMD `define`
    #[value(name = "amd-cjs")]
    AmdCjs,

    /// A `YUI.add` module
    #[value(name = "yui")]
    Yui,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Cjs => OutputFormat::Cjs,
            Format::Amd => OutputFormat::Amd,
            Format::AmdCjs => OutputFormat::AmdCjs,
            Format::Yui => OutputFormat::Yui,
        }
    }
}

/// Whole-graph output format
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum GraphFormat {
    /// `System.register` modules for the bundled loader
    #[value(name = "system")]
    System,

    /// CommonJS files requiring each other by relative path
    #[value(name = "commonjs")]
    Commonjs,
}

impl From<GraphFormat> for OutputFormat {
    fn from(format: GraphFormat) -> Self {
        match format {
            GraphFormat::System => OutputFormat::System,
            GraphFormat::Commonjs => OutputFormat::Commonjs,
        }
    }
}

/// Source map output
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum SourceMap {
    /// `<file>.js.map` next to each output, linked by a comment
    #[value(name = "external")]
    External,

    /// Base64 data URL appended to each output
    #[value(name = "inline")]
    Inline,

    /// No source maps
    #[value(name = "none")]
    None,
}

impl From<SourceMap> for SourceMapMode {
    fn from(mode: SourceMap) -> Self {
        match mode {
            SourceMap::External => SourceMapMode::External,
            SourceMap::Inline => SourceMapMode::Inline,
            SourceMap::None => SourceMapMode::None,
        }
    }
}
