use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use modshift_rewrite::ModuleCatalog;

use crate::module_id::ModuleId;

/// Resolution progress of a cached module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    /// Cached, with dependencies still being resolved. Importers reaching a
    /// module in this state are part of a cycle.
    Resolving,
    Resolved,
}

/// A module in the graph.
///
/// Local modules keep their source text and catalog. The syntax tree itself is
/// re-parsed from the source whenever a phase needs it, since it lives in a
/// per-phase arena. External modules are name-only stand-ins.
#[derive(Debug, Clone)]
pub struct Module {
    pub id: ModuleId,
    /// Registration name: path relative to the graph root without extension,
    /// or the bare name of an external module
    pub name: String,
    pub path: Option<PathBuf>,
    pub source: String,
    pub catalog: ModuleCatalog,
    pub external: bool,
    pub state: ModuleState,
    /// Resolved module per imported path, in handle order
    pub dependencies: IndexMap<String, ModuleId>,
}

impl Module {
    /// A local module whose imports are not resolved yet.
    pub fn local(
        id: ModuleId,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        source: impl Into<String>,
        catalog: ModuleCatalog,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            path: Some(path.into()),
            source: source.into(),
            catalog,
            external: false,
            state: ModuleState::Resolving,
            dependencies: IndexMap::new(),
        }
    }

    pub fn external(name: &str) -> Self {
        Self {
            id: ModuleId::external(name),
            name: name.to_string(),
            path: None,
            source: String::new(),
            catalog: ModuleCatalog::default(),
            external: true,
            state: ModuleState::Resolved,
            dependencies: IndexMap::new(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_resolved(&self) -> bool {
        self.state == ModuleState::Resolved
    }

    /// Module an imported path resolved to.
    pub fn dependency(&self, specifier: &str) -> Option<&ModuleId> {
        self.dependencies.get(specifier)
    }
}

/// Registration name of `path`: relative to `root`, extension dropped,
/// `/`-separated. `None` when `path` is not under `root`.
pub fn registration_name(root: &Path, path: &Path) -> Option<String> {
    let relative = if root.as_os_str().is_empty() || root == Path::new(".") {
        path
    } else {
        path.strip_prefix(root).ok()?
    };
    if relative.starts_with("..") || relative.is_absolute() {
        return None;
    }
    let parent = relative.parent().unwrap_or_else(|| Path::new(""));
    let stem = relative.file_stem()?.to_string_lossy();

    let mut segments: Vec<String> = parent
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    segments.push(stem.into_owned());
    Some(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_name() {
        let root = Path::new("/project");
        assert_eq!(
            registration_name(root, Path::new("/project/app/even.js")).as_deref(),
            Some("app/even")
        );
        assert_eq!(
            registration_name(root, Path::new("/project/main.mjs")).as_deref(),
            Some("main")
        );
        assert_eq!(
            registration_name(root, Path::new("/project/lib/util/index.js")).as_deref(),
            Some("lib/util/index")
        );
        assert_eq!(registration_name(root, Path::new("/elsewhere/a.js")), None);
        assert_eq!(
            registration_name(Path::new("."), Path::new("app/odd.js")).as_deref(),
            Some("app/odd")
        );
        assert_eq!(registration_name(Path::new("."), Path::new("../a.js")), None);
    }

    #[test]
    fn test_external_module() {
        let module = Module::external("ember");
        assert!(module.external);
        assert!(module.is_resolved());
        assert_eq!(module.name, "ember");
        assert!(module.path().is_none());
    }
}
