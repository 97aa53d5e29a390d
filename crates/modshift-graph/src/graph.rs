//! The module graph: a cache of resolved modules and their import edges.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use path_clean::PathClean;
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::error::{GraphError, Result};
use crate::loader::SourceLoader;
use crate::module::{Module, ModuleState, registration_name};
use crate::module_id::ModuleId;
use crate::resolver::{Resolution, ResolveContext, Resolver, default_resolvers, resolve_with_extensions};

/// Modules reachable from a set of entries.
///
/// Each resolved identity is loaded once and cached; every importer of a path
/// shares the cached [`Module`]. A module is cached *before* its own imports
/// are resolved, so an import cycle reaching back to it finds the in-progress
/// entry instead of recursing.
#[derive(Debug)]
pub struct ModuleGraph {
    root: PathBuf,
    loader: Arc<dyn SourceLoader>,
    resolvers: Vec<Box<dyn Resolver>>,
    modules: IndexMap<ModuleId, Module>,
    entries: Vec<ModuleId>,
}

impl ModuleGraph {
    /// Create an empty graph with the default resolver chain.
    pub fn new(root: impl AsRef<Path>, loader: Arc<dyn SourceLoader>) -> Self {
        Self {
            root: root.as_ref().to_path_buf().clean(),
            loader,
            resolvers: default_resolvers(Vec::new()),
            modules: IndexMap::new(),
            entries: Vec::new(),
        }
    }

    /// Replace the resolver chain. Resolvers are tried in order.
    pub fn with_resolvers(mut self, resolvers: Vec<Box<dyn Resolver>>) -> Self {
        self.resolvers = resolvers;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load an entry module and everything it reaches.
    ///
    /// Relative entry paths are taken relative to the graph root.
    pub fn add_entry(&mut self, path: impl AsRef<Path>) -> Result<ModuleId> {
        let path = path.as_ref();
        let candidate = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
        .clean();

        let resolved = resolve_with_extensions(&candidate, self.loader.as_ref()).ok_or_else(|| {
            GraphError::unresolved(path.to_string_lossy(), "<entry>")
        })?;
        let id = self.load_local(resolved)?;
        if !self.entries.contains(&id) {
            self.entries.push(id.clone());
        }
        Ok(id)
    }

    /// Resolve `specifier` as imported from `from`, loading the target on first use.
    pub fn resolve_module(&mut self, specifier: &str, from: &ModuleId) -> Result<ModuleId> {
        let ctx = ResolveContext {
            root: &self.root,
            importer: from,
            loader: self.loader.as_ref(),
        };

        let mut resolution = None;
        for resolver in &self.resolvers {
            if let Some(found) = resolver.resolve_module(specifier, &ctx)? {
                trace!(specifier, resolver = resolver.name(), "resolved import");
                resolution = Some(found);
                break;
            }
        }

        match resolution {
            None => Err(GraphError::unresolved(specifier, self.display_name(from))),
            Some(Resolution::External(name)) => {
                let id = ModuleId::external(&name);
                self.modules
                    .entry(id.clone())
                    .or_insert_with(|| Module::external(&name));
                Ok(id)
            }
            Some(Resolution::Local(path)) => self.load_local(path),
        }
    }

    fn load_local(&mut self, path: PathBuf) -> Result<ModuleId> {
        let id = ModuleId::new(&path)?;
        if let Some(cached) = self.modules.get(&id) {
            if cached.state == ModuleState::Resolving {
                trace!(module = %cached.name, "import cycle reached module being resolved");
            }
            return Ok(id);
        }

        let name = registration_name(&self.root, &path).ok_or_else(|| GraphError::OutsideRoot {
            path: path.clone(),
            root: self.root.clone(),
        })?;
        let source = self
            .loader
            .read(&path)
            .map_err(|err| GraphError::io(&path, err))?;
        let catalog = modshift_rewrite::analyze(&source, &path.to_string_lossy())?;
        let specifiers: Vec<String> = catalog.sources().map(str::to_string).collect();

        debug!(module = %name, path = %path.display(), imports = specifiers.len(), "loaded module");
        self.modules.insert(
            id.clone(),
            Module::local(id.clone(), name, path, source, catalog),
        );

        for specifier in specifiers {
            let dependency = self.resolve_module(&specifier, &id)?;
            self.module_mut(&id)?
                .dependencies
                .insert(specifier, dependency);
        }

        self.module_mut(&id)?.state = ModuleState::Resolved;
        Ok(id)
    }

    fn module_mut(&mut self, id: &ModuleId) -> Result<&mut Module> {
        self.modules
            .get_mut(id)
            .ok_or_else(|| GraphError::missing_module(id))
    }

    fn display_name(&self, id: &ModuleId) -> String {
        self.modules
            .get(id)
            .map(|module| module.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn module(&self, id: &ModuleId) -> Option<&Module> {
        self.modules.get(id)
    }

    /// All cached modules in load order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn entries(&self) -> &[ModuleId] {
        &self.entries
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Module> {
        self.modules.values().find(|module| module.name == name)
    }

    /// Distinct modules `id` imports, in handle order.
    pub fn dependencies(&self, id: &ModuleId) -> Vec<&ModuleId> {
        let mut seen = FxHashSet::default();
        self.modules
            .get(id)
            .into_iter()
            .flat_map(|module| module.dependencies.values())
            .filter(|dep| seen.insert(*dep))
            .collect()
    }

    /// Modules importing `id`, in load order.
    pub fn dependents(&self, id: &ModuleId) -> Vec<&ModuleId> {
        self.modules
            .values()
            .filter(|module| module.dependencies.values().any(|dep| dep == id))
            .map(|module| &module.id)
            .collect()
    }

    /// Every module with its dependencies before it (depth-first post-order
    /// from the entries). Inside a cycle the module entered first comes last.
    pub fn execution_order(&self) -> Vec<&ModuleId> {
        let mut visited = FxHashSet::default();
        let mut order = Vec::with_capacity(self.modules.len());
        for entry in &self.entries {
            self.visit_post_order(entry, &mut visited, &mut order);
        }
        order
    }

    fn visit_post_order<'g>(
        &'g self,
        id: &'g ModuleId,
        visited: &mut FxHashSet<&'g ModuleId>,
        order: &mut Vec<&'g ModuleId>,
    ) {
        if !visited.insert(id) {
            return;
        }
        for dep in self.dependencies(id) {
            self.visit_post_order(dep, visited, order);
        }
        order.push(id);
    }

    /// Import cycles reachable from the entries, one per back edge. Each cycle
    /// starts at the module the back edge points to.
    pub fn cycles(&self) -> Vec<Vec<ModuleId>> {
        let mut visited = FxHashSet::default();
        let mut stack = Vec::new();
        let mut cycles = Vec::new();
        for entry in &self.entries {
            self.collect_cycles(entry, &mut visited, &mut stack, &mut cycles);
        }
        cycles
    }

    fn collect_cycles<'g>(
        &'g self,
        id: &'g ModuleId,
        visited: &mut FxHashSet<&'g ModuleId>,
        stack: &mut Vec<&'g ModuleId>,
        cycles: &mut Vec<Vec<ModuleId>>,
    ) {
        if let Some(position) = stack.iter().position(|on_stack| *on_stack == id) {
            cycles.push(stack[position..].iter().map(|id| (*id).clone()).collect());
            return;
        }
        if !visited.insert(id) {
            return;
        }

        stack.push(id);
        for dep in self.dependencies(id) {
            self.collect_cycles(dep, visited, stack, cycles);
        }
        stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryLoader;

    const EVEN: &str = "import odd from './odd';\nexport default function even(n) {\n  return n === 0 || odd(n - 1);\n}\n";
    const ODD: &str = "import even from './even';\nexport default function odd(n) {\n  return n === 0 ? false : even(n - 1);\n}\n";

    fn graph(loader: MemoryLoader) -> ModuleGraph {
        ModuleGraph::new("/p", Arc::new(loader))
    }

    fn names<'g>(graph: &'g ModuleGraph, ids: &[&ModuleId]) -> Vec<&'g str> {
        ids.iter()
            .map(|id| graph.module(id).unwrap().name.as_str())
            .collect()
    }

    #[test]
    fn test_cycle_shares_cached_modules() {
        let loader = MemoryLoader::new()
            .with_file("/p/app/even.js", EVEN)
            .with_file("/p/app/odd.js", ODD);
        let mut graph = graph(loader);

        let even = graph.add_entry("app/even").unwrap();
        assert_eq!(graph.len(), 2);

        let odd = graph.get_by_name("app/odd").unwrap().id.clone();
        assert_eq!(graph.module(&odd).unwrap().dependency("./even"), Some(&even));
        assert_eq!(graph.module(&even).unwrap().dependency("./odd"), Some(&odd));
        assert!(graph.modules().all(Module::is_resolved));

        assert_eq!(names(&graph, &graph.execution_order()), ["app/odd", "app/even"]);
        assert_eq!(graph.cycles(), vec![vec![even.clone(), odd.clone()]]);
        assert_eq!(graph.dependents(&odd), vec![&even]);
    }

    #[test]
    fn test_execution_order_puts_dependencies_first() {
        let loader = MemoryLoader::new()
            .with_file("/p/main.js", "import a from './a';\nimport b from './b';\na(b);\n")
            .with_file("/p/a.js", "import c from './c';\nexport default c;\n")
            .with_file("/p/b.js", "import c from './c';\nexport default c;\n")
            .with_file("/p/c.js", "export default 1;\n");
        let mut graph = graph(loader);
        graph.add_entry("main.js").unwrap();

        assert_eq!(names(&graph, &graph.execution_order()), ["c", "a", "b", "main"]);
        assert!(graph.cycles().is_empty());

        let c = graph.get_by_name("c").unwrap().id.clone();
        assert_eq!(names(&graph, &graph.dependents(&c)), ["a", "b"]);
    }

    #[test]
    fn test_externals_are_name_only() {
        let loader = MemoryLoader::new()
            .with_file("/p/main.js", "import Ember from 'ember';\nimport { map } from 'lodash/map';\nEmber.run(map);\n");
        let mut graph = graph(loader);
        let main = graph.add_entry("main").unwrap();

        let deps = graph.dependencies(&main);
        assert_eq!(names(&graph, &deps), ["ember", "lodash/map"]);
        assert!(deps.iter().all(|id| id.is_external()));
        assert!(graph.module(deps[0]).unwrap().source.is_empty());
    }

    #[test]
    fn test_repeated_imports_share_one_module() {
        let loader = MemoryLoader::new()
            .with_file("/p/main.js", "import a from './lib/a';\nimport b from './lib/b';\n")
            .with_file("/p/lib/a.js", "export { default } from './shared';\n")
            .with_file("/p/lib/b.js", "import s from '../lib/./shared.js';\nexport default s;\n")
            .with_file("/p/lib/shared.js", "export default 1;\n");
        let mut graph = graph(loader);
        graph.add_entry("main").unwrap();

        assert_eq!(graph.len(), 4);
        let shared = graph.get_by_name("lib/shared").unwrap().id.clone();
        assert_eq!(graph.dependents(&shared).len(), 2);
    }

    #[test]
    fn test_unresolved_import_names_importer() {
        let loader = MemoryLoader::new().with_file("/p/app/even.js", EVEN);
        let mut graph = graph(loader);

        let err = graph.add_entry("app/even.js").unwrap_err();
        match err {
            GraphError::UnresolvedImport { specifier, importer } => {
                assert_eq!(specifier, "./odd");
                assert_eq!(importer, "app/even");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_entry() {
        let mut graph = graph(MemoryLoader::new());
        assert!(matches!(
            graph.add_entry("nope"),
            Err(GraphError::UnresolvedImport { .. })
        ));
    }

    #[test]
    fn test_parse_errors_surface_as_transpile_errors() {
        let loader = MemoryLoader::new().with_file("/p/bad.js", "import {");
        let mut graph = graph(loader);
        assert!(matches!(
            graph.add_entry("bad"),
            Err(GraphError::Transpile(_))
        ));
    }
}
