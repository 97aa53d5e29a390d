//! Build command implementation.
//!
//! Resolves the module graph from the entries, formats every local module as
//! a `System.register` or CommonJS program and writes one file per
//! registration name.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use modshift_config::{ConfigError, ConfigOverrides, OutputFormat};
use modshift_graph::resolver::default_resolvers;
use modshift_graph::{
    CommonJsFormatter, Formatter, FsLoader, ModuleGraph, SYSTEM_RUNTIME, SystemFormatter,
};
use modshift_rewrite::FormatOptions;
use tracing::{debug, info};

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::error::{Result, ResultExt};
use crate::ui::{self, OutputSummary};

/// File the System loader is written to, next to the modules
pub const RUNTIME_FILE: &str = "modshift-runtime.js";

pub fn execute(args: BuildArgs, config_path: Option<&Path>) -> Result<()> {
    let start = Instant::now();
    let cwd = utils::get_cwd(args.cwd.as_deref())?;

    let overrides = ConfigOverrides {
        format: args.format.map(Into::into),
        root: args.root.clone(),
        entries: (!args.entries.is_empty()).then(|| args.entries.clone()),
        external: (!args.external.is_empty()).then(|| args.external.clone()),
        out_dir: args.out_dir.clone(),
        sourcemap: args.sourcemap.map(Into::into),
        runtime: args.runtime.then_some(true),
        ..ConfigOverrides::default()
    };
    let config = utils::load_config(config_path, &cwd, &overrides)?;
    let format = graph_format(config.format);

    if config.runtime && format != OutputFormat::System {
        return Err(ConfigError::invalid_value(
            "runtime",
            "true",
            "The System loader is only written for the system format",
        )
        .into());
    }

    if config.entries.is_empty() {
        return Err(ConfigError::missing_field(
            "entries",
            "Pass entry modules to `modshift build` or set 'entries' in modshift.toml",
        )
        .into());
    }

    let root = utils::resolve_path(&config.root, &cwd);
    let out_dir = utils::resolve_path(&config.out_dir, &cwd);

    let mut graph = ModuleGraph::new(&root, Arc::new(FsLoader))
        .with_resolvers(default_resolvers(config.external.clone()));
    for entry in &config.entries {
        graph.add_entry(entry)?;
    }
    info!(modules = graph.len(), root = %root.display(), "module graph resolved");

    for cycle in graph.cycles() {
        let names: Vec<String> = cycle
            .iter()
            .filter_map(|id| graph.module(id))
            .map(|module| module.name.clone())
            .collect();
        debug!(cycle = %names.join(" -> "), "circular import");
    }

    let formatter = graph_formatter(format, config.format_options());
    debug!(format = formatter.name(), "formatting graph");
    let programs = formatter.build(&graph)?;

    let mut outputs = Vec::with_capacity(programs.len() + 1);
    for program in &programs {
        let path = utils::output_path(&out_dir, &program.name);
        let bytes = utils::write_output(&path, &program.output, config.sourcemap)?;
        debug!(module = %program.name, path = %path.display(), bytes, "wrote module");
        outputs.push(OutputSummary {
            name: program.name.clone(),
            path,
            bytes,
        });
    }

    if config.runtime {
        let path = out_dir.join(RUNTIME_FILE);
        fs::create_dir_all(&out_dir).with_path(&out_dir)?;
        fs::write(&path, SYSTEM_RUNTIME).with_path(&path)?;
        outputs.push(OutputSummary {
            name: "(runtime)".to_string(),
            path,
            bytes: SYSTEM_RUNTIME.len() as u64,
        });
    }

    ui::print_summary(&outputs, start.elapsed());
    ui::success(&format!(
        "Built {} modules into {}",
        programs.len(),
        out_dir.display()
    ));
    Ok(())
}

/// Per-file formats in the config fall back to `system`.
fn graph_format(format: OutputFormat) -> OutputFormat {
    if format.is_graph() {
        format
    } else {
        OutputFormat::System
    }
}

fn graph_formatter(format: OutputFormat, options: FormatOptions) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Commonjs => Box::new(CommonJsFormatter::new(options)),
        _ => Box::new(SystemFormatter::new(options)),
    }
}
