//! Helpers shared by the commands.

use std::fs;
use std::path::{Path, PathBuf};

use modshift_config::{ConfigOverrides, ProjectConfig, SourceMapMode};
use modshift_rewrite::TranspileOutput;
use path_clean::PathClean;

use crate::error::{CliError, Result, ResultExt};

/// The working directory, or `cwd` when given.
pub fn get_cwd(cwd: Option<&Path>) -> Result<PathBuf> {
    match cwd {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir().map_err(CliError::from),
    }
}

/// `path` joined onto `cwd` unless absolute, then cleaned.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf().clean()
    } else {
        cwd.join(path).clean()
    }
}

pub fn load_config(
    config_path: Option<&Path>,
    cwd: &Path,
    overrides: &ConfigOverrides,
) -> Result<ProjectConfig> {
    let config_path = config_path.map(|path| resolve_path(path, cwd));
    Ok(ProjectConfig::load(config_path.as_deref(), cwd, overrides)?)
}

/// Output path for a registration name: `<out_dir>/<name>.js`.
pub fn output_path(out_dir: &Path, name: &str) -> PathBuf {
    let mut path = out_dir.to_path_buf();
    for segment in name.split('/') {
        path.push(segment);
    }
    let mut file = path.into_os_string();
    file.push(".js");
    PathBuf::from(file)
}

/// Write one module's code and source map. Returns the bytes written.
pub fn write_output(path: &Path, output: &TranspileOutput, mode: SourceMapMode) -> Result<u64> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }

    let code = match mode {
        SourceMapMode::External => {
            let map_path = map_path(path);
            fs::write(&map_path, output.map_json()).with_path(&map_path)?;
            let map_file = map_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!(
                "{}\n//# sourceMappingURL={}\n",
                output.code.trim_end_matches('\n'),
                map_file
            )
        }
        SourceMapMode::Inline => output.code_with_inline_map(),
        SourceMapMode::None => output.code.clone(),
    };

    fs::write(path, &code).with_path(path)?;
    Ok(code.len() as u64)
}

/// `even.js` -> `even.js.map`
pub fn map_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".map");
    PathBuf::from(name)
}
