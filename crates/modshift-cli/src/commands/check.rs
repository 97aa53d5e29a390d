//! Check command implementation.
//!
//! Loads the layered configuration, validates it, and prints the resolved
//! settings as TOML on stdout. For system builds the module graph is
//! resolved too, so missing modules show up without writing anything.

use std::path::Path;
use std::sync::Arc;

use modshift_config::{ConfigDiscovery, ConfigOverrides, ProjectConfig};
use modshift_graph::resolver::default_resolvers;
use modshift_graph::{FsLoader, ModuleGraph};

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::error::{CliError, Result};
use crate::ui;

pub fn execute(args: CheckArgs, config_path: Option<&Path>) -> Result<()> {
    if args.example {
        print!("{}", ProjectConfig::example());
        return Ok(());
    }

    let cwd = utils::get_cwd(args.cwd.as_deref())?;
    match config_path {
        Some(path) => ui::info(&format!("Checking {}", path.display())),
        None => match ConfigDiscovery::new(&cwd).find() {
            Some(path) => ui::info(&format!("Checking {}", path.display())),
            None => ui::warning("No modshift.toml or modshift.config.json found, using defaults"),
        },
    }

    let config = utils::load_config(config_path, &cwd, &ConfigOverrides::default())?;
    ui::success("Configuration is valid");

    if config.format.is_graph() && !config.entries.is_empty() {
        let root = utils::resolve_path(&config.root, &cwd);
        let mut graph = ModuleGraph::new(&root, Arc::new(FsLoader))
            .with_resolvers(default_resolvers(config.external.clone()));
        for entry in &config.entries {
            graph.add_entry(entry)?;
        }

        let externals = graph.modules().filter(|module| module.external).count();
        ui::success(&format!(
            "Resolved {} modules ({} external)",
            graph.len() - externals,
            externals
        ));
        let cycles = graph.cycles().len();
        if cycles > 0 {
            ui::info(&format!("{cycles} circular import chains"));
        }
    }

    let resolved = toml::to_string_pretty(&config)
        .map_err(|err| CliError::Custom(format!("Failed to print configuration: {err}")))?;
    print!("{resolved}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use modshift_graph::GraphError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_check_without_config() {
        let dir = TempDir::new().unwrap();
        let args = CheckArgs {
            cwd: Some(dir.path().to_path_buf()),
            ..CheckArgs::default()
        };
        assert!(execute(args, None).is_ok());
    }

    #[test]
    fn test_check_resolves_graph() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("modshift.toml"),
            "format = \"system\"\nentries = [\"main.js\"]\n",
        )
        .unwrap();
        fs::write(dir.path().join("main.js"), "import './missing';\n").unwrap();

        let args = CheckArgs {
            cwd: Some(dir.path().to_path_buf()),
            ..CheckArgs::default()
        };
        let err = execute(args, None).unwrap_err();
        assert!(matches!(err, CliError::Graph(GraphError::UnresolvedImport { .. })));
    }

    #[test]
    fn test_check_invalid_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("modshift.toml"), "indent = { spaces = 0 }\n").unwrap();
        let args = CheckArgs {
            cwd: Some(dir.path().to_path_buf()),
            ..CheckArgs::default()
        };
        assert!(matches!(execute(args, None), Err(CliError::Config(_))));
    }
}
