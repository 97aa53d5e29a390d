//! Multi-module output formats.
//!
//! A [`Formatter`] turns every local module of a resolved graph into one
//! output program. External modules produce no output; they are referenced
//! by name and provided by the host at runtime.

mod commonjs;
mod system;

pub use commonjs::{CommonJsFormatter, CommonJsTarget};
pub use system::{SystemFormatter, SystemTarget};

use std::path::Path;

use modshift_rewrite::{FormatOptions, TranspileOptions, TranspileOutput};

use crate::error::Result;
use crate::graph::ModuleGraph;
use crate::module::Module;
use crate::module_id::ModuleId;

/// One formatted module
#[derive(Debug)]
pub struct OutputProgram {
    pub id: ModuleId,
    /// Registration name the module registers under
    pub name: String,
    pub output: TranspileOutput,
}

impl OutputProgram {
    pub fn code(&self) -> &str {
        &self.output.code
    }
}

/// A whole-graph output format
pub trait Formatter {
    /// Format name used in configuration and diagnostics
    fn name(&self) -> &'static str;

    /// Format every local module, dependencies before dependents.
    fn build(&self, graph: &ModuleGraph) -> Result<Vec<OutputProgram>>;
}

/// Rewrite options for one module of `graph`: relative imports resolve from
/// the module's own directory and the source map points at its file.
pub(crate) fn module_options(
    graph: &ModuleGraph,
    module: &Module,
    format: &FormatOptions,
) -> TranspileOptions {
    let dir_path = module
        .name
        .rsplit_once('/')
        .map(|(dir, _)| dir.to_string())
        .unwrap_or_else(|| ".".to_string());
    let format = FormatOptions {
        source_file_name: Some(source_file_name(graph.root(), module)),
        source_map_name: Some(format!("{}.js", module.name)),
        ..format.clone()
    };
    TranspileOptions::new(module.name.clone())
        .with_dir_path(dir_path)
        .with_format(format)
}

fn source_file_name(root: &Path, module: &Module) -> String {
    let Some(path) = module.path() else {
        return module.name.clone();
    };
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.to_string_lossy().replace('\\', "/")
}
