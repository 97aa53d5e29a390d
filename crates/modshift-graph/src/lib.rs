//! Module graph resolution and multi-module formatting.
//!
//! [`ModuleGraph`] loads an entry module and everything it imports through an
//! ordered chain of [`Resolver`]s, caching each module by identity so cycles
//! terminate. [`SystemFormatter`] then wraps every local module in a
//! `System.register` call whose export object reads bindings through getters,
//! which keeps circular imports correct once the relevant code has run.
//! [`CommonJsFormatter`] emits the same graph as plain `require` modules.
//!
//! ```rust
//! use std::sync::Arc;
//! use modshift_graph::{Formatter, MemoryLoader, ModuleGraph, SystemFormatter};
//!
//! let loader = MemoryLoader::new()
//!     .with_file("/app/even.js", "import odd from './odd';\nexport default function even(n) {\n  return n === 0 || odd(n - 1);\n}\n")
//!     .with_file("/app/odd.js", "import even from './even';\nexport default function odd(n) {\n  return n === 0 ? false : even(n - 1);\n}\n");
//!
//! let mut graph = ModuleGraph::new("/app", Arc::new(loader));
//! graph.add_entry("even")?;
//!
//! let programs = SystemFormatter::default().build(&graph)?;
//! assert_eq!(programs.len(), 2);
//! assert!(programs[1].code().starts_with("System.register(\"even\", [\"odd\"], function () {"));
//! # Ok::<(), modshift_graph::GraphError>(())
//! ```

pub mod error;
pub mod formatter;
pub mod graph;
pub mod loader;
pub mod module;
pub mod module_id;
pub mod resolver;
pub mod runtime;

pub use error::{GraphError, Result};
pub use formatter::{
    CommonJsFormatter, CommonJsTarget, Formatter, OutputProgram, SystemFormatter, SystemTarget,
};
pub use graph::ModuleGraph;
pub use loader::{FsLoader, MemoryLoader, SourceLoader};
pub use module::{Module, ModuleState, registration_name};
pub use module_id::{ModuleId, ModuleIdError};
pub use resolver::{ExternalResolver, RelativeResolver, Resolution, ResolveContext, Resolver};
pub use runtime::SYSTEM_RUNTIME;
