//! Transpile command implementation.
//!
//! Input files are independent jobs and run in parallel. A failure in any
//! file aborts the command before the summary is printed; files that
//! finished are left in place.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use modshift_config::{ConfigOverrides, ProjectConfig};
use modshift_graph::{GraphError, registration_name};
use modshift_rewrite::{TargetKind, transpile};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::cli::TranspileArgs;
use crate::commands::utils;
use crate::error::{CliError, Result, ResultExt};
use crate::ui::{self, OutputSummary};

pub fn execute(args: TranspileArgs, config_path: Option<&Path>) -> Result<()> {
    let start = Instant::now();
    let cwd = utils::get_cwd(args.cwd.as_deref())?;

    if args.registry_name.is_some() && args.files.len() > 1 {
        return Err(CliError::InvalidArgument(
            "--registry-name only applies to a single input file".to_string(),
        ))
        .with_hint("Omit it to derive each name from the file path relative to --root");
    }

    let overrides = ConfigOverrides {
        format: args.format.map(Into::into),
        registry_name: args.registry_name.clone(),
        module_name: args.module_name.clone(),
        dir_path: args.dir_path.clone(),
        root: args.root.clone(),
        out_dir: args.out_dir.clone(),
        sourcemap: args.sourcemap.map(Into::into),
        ..ConfigOverrides::default()
    };
    let config = utils::load_config(config_path, &cwd, &overrides)?;

    let Some(kind) = config.format.target_kind() else {
        return Err(CliError::InvalidArgument(format!(
            "the '{}' format needs the whole module graph",
            config.format
        )))
        .with_hint("Use `modshift build` for system or commonjs output");
    };
    if config.registry_name.is_some() && args.files.len() > 1 {
        return Err(CliError::InvalidArgument(
            "registryName from the config file only applies to a single input file".to_string(),
        ));
    }

    let job = Job {
        config: &config,
        kind,
        cwd: &cwd,
        root: utils::resolve_path(&config.root, &cwd),
        out_dir: utils::resolve_path(&config.out_dir, &cwd),
    };

    info!(files = args.files.len(), format = %config.format, "transpiling");
    let outputs = args
        .files
        .par_iter()
        .map(|file| job.run(file))
        .collect::<Result<Vec<_>>>()?;

    ui::print_summary(&outputs, start.elapsed());
    ui::success(&format!(
        "Transpiled {} {} to {}",
        outputs.len(),
        if outputs.len() == 1 { "file" } else { "files" },
        job.out_dir.display()
    ));
    Ok(())
}

/// Settings shared by every file of one invocation.
struct Job<'a> {
    config: &'a ProjectConfig,
    kind: TargetKind,
    cwd: &'a Path,
    root: PathBuf,
    out_dir: PathBuf,
}

impl Job<'_> {
    fn run(&self, file: &Path) -> Result<OutputSummary> {
        let path = utils::resolve_path(file, self.cwd);
        let source = fs::read_to_string(&path).with_path(&path)?;

        let name = match &self.config.registry_name {
            Some(name) => name.clone(),
            None => registration_name(&self.root, &path).ok_or_else(|| GraphError::OutsideRoot {
                path: path.clone(),
                root: self.root.clone(),
            })?,
        };
        let out_path = utils::output_path(&self.out_dir, &name);

        let mut options = self.config.transpile_options(&name);
        options.format.source_file_name = Some(source_file_name(&self.root, &path));
        options.format.source_map_name = out_path
            .file_name()
            .map(|file_name| file_name.to_string_lossy().into_owned());

        let output = transpile(&source, self.kind.as_str(), options).map_err(|source| {
            CliError::Module {
                path: path.clone(),
                source,
            }
        })?;

        let bytes = utils::write_output(&out_path, &output, self.config.sourcemap)?;
        debug!(module = %name, path = %out_path.display(), bytes, "wrote module");

        Ok(OutputSummary {
            name,
            path: out_path,
            bytes,
        })
    }
}

/// The source path as recorded in the map: relative to the root, `/`-separated.
fn source_file_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Format, SourceMap};
    use tempfile::TempDir;

    const EVEN: &str = "import odd from './odd';\nexport default function even(n) {\n  return n === 0 || odd(n - 1);\n}\n";
    const ODD: &str = "import even from './even';\nexport default function odd(n) {\n  return n === 0 ? false : even(n - 1);\n}\n";

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/app")).unwrap();
        fs::write(dir.path().join("src/app/even.js"), EVEN).unwrap();
        fs::write(dir.path().join("src/app/odd.js"), ODD).unwrap();
        dir
    }

    #[test]
    fn test_names_derive_from_root() {
        let dir = project();
        let args = TranspileArgs {
            files: vec!["src/app/even.js".into(), "src/app/odd.js".into()],
            root: Some("src".into()),
            sourcemap: Some(SourceMap::None),
            cwd: Some(dir.path().to_path_buf()),
            ..TranspileArgs::default()
        };
        execute(args, None).unwrap();

        let even = fs::read_to_string(dir.path().join("dist/app/even.js")).unwrap();
        assert!(even.contains("__es6_module_registry__[\"app/even\"] = module.exports"));
        assert!(even.contains("__es6_module_registry__[\"app/odd\"] || require(\"./odd\")"));
        assert!(dir.path().join("dist/app/odd.js").is_file());
        assert!(!dir.path().join("dist/app/odd.js.map").exists());
    }

    #[test]
    fn test_explicit_names_and_amd() {
        let dir = project();
        let args = TranspileArgs {
            files: vec!["src/app/even.js".into()],
            format: Some(Format::AmdCjs),
            registry_name: Some("lib/even".into()),
            module_name: Some("even".into()),
            out_dir: Some("out".into()),
            cwd: Some(dir.path().to_path_buf()),
            ..TranspileArgs::default()
        };
        execute(args, None).unwrap();

        let code = fs::read_to_string(dir.path().join("out/lib/even.js")).unwrap();
        assert!(code.starts_with("define(\"even\", function (require, exports, module) {"));
        assert!(code.contains("__es6_module_registry__[\"lib/odd\"]"));
        assert!(code.ends_with("//# sourceMappingURL=even.js.map\n"));

        let map: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("out/lib/even.js.map")).unwrap())
                .unwrap();
        assert_eq!(map["sources"][0], "src/app/even.js");
        assert_eq!(map["file"], "even.js");
    }

    #[test]
    fn test_registry_name_needs_single_file() {
        let dir = project();
        let args = TranspileArgs {
            files: vec!["src/app/even.js".into(), "src/app/odd.js".into()],
            registry_name: Some("even".into()),
            cwd: Some(dir.path().to_path_buf()),
            ..TranspileArgs::default()
        };
        let err = execute(args, None).unwrap_err();
        assert!(err.to_string().contains("--registry-name"));
    }

    #[test]
    fn test_file_outside_root() {
        let dir = project();
        let args = TranspileArgs {
            files: vec!["src/app/even.js".into()],
            root: Some("lib".into()),
            cwd: Some(dir.path().to_path_buf()),
            ..TranspileArgs::default()
        };
        let err = execute(args, None).unwrap_err();
        assert!(matches!(err, CliError::Graph(GraphError::OutsideRoot { .. })));
    }

    #[test]
    fn test_missing_file() {
        let dir = project();
        let args = TranspileArgs {
            files: vec!["src/app/missing.js".into()],
            cwd: Some(dir.path().to_path_buf()),
            ..TranspileArgs::default()
        };
        let err = execute(args, None).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_syntax_error_names_file() {
        let dir = project();
        fs::write(dir.path().join("src/broken.js"), "import {").unwrap();
        let args = TranspileArgs {
            files: vec!["src/broken.js".into()],
            cwd: Some(dir.path().to_path_buf()),
            ..TranspileArgs::default()
        };
        let err = execute(args, None).unwrap_err();
        assert!(matches!(err, CliError::Module { ref path, .. } if path.ends_with("src/broken.js")));
    }
}
