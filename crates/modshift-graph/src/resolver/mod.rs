//! Resolution of import paths to modules.
//!
//! The graph asks each configured [`Resolver`] in order; the first one that
//! returns `Some` decides where an import points. A path no resolver claims is
//! an unresolved import.

mod external;
mod extensions;
mod relative;

pub use external::ExternalResolver;
pub use extensions::{EXTENSIONS, resolve_with_extensions, try_extensions, try_index_files};
pub use relative::RelativeResolver;

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::loader::SourceLoader;
use crate::module_id::ModuleId;

/// Where an import path points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A source file that becomes part of the graph
    Local(PathBuf),
    /// A module provided by the host at runtime, referenced by name only
    External(String),
}

/// What a resolver can see about the import being resolved
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Graph root registration names are relative to
    pub root: &'a Path,
    /// Module containing the import
    pub importer: &'a ModuleId,
    pub loader: &'a dyn SourceLoader,
}

impl ResolveContext<'_> {
    /// Directory relative imports are joined onto.
    pub fn base_dir(&self) -> &Path {
        if self.importer.is_external() {
            return self.root;
        }
        self.importer.as_path().parent().unwrap_or(self.root)
    }
}

/// One resolution strategy
pub trait Resolver: Send + Sync + Debug {
    /// Strategy name used in logs
    fn name(&self) -> &'static str;

    /// Resolve `specifier`, or return `None` to let the next resolver try.
    fn resolve_module(&self, specifier: &str, ctx: &ResolveContext<'_>)
    -> Result<Option<Resolution>>;
}

/// The default chain: relative paths first, then bare names as externals.
pub fn default_resolvers(external: Vec<String>) -> Vec<Box<dyn Resolver>> {
    vec![
        Box::new(RelativeResolver),
        Box::new(ExternalResolver::new(external)),
    ]
}
