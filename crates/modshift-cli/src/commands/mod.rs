//! Command implementations.
//!
//! Each command loads the layered [`ProjectConfig`](modshift_config::ProjectConfig)
//! with its arguments as the top layer, then runs.

pub mod build;
pub mod check;
pub mod transpile;
pub(crate) mod utils;

pub use build::execute as build_execute;
pub use check::execute as check_execute;
pub use transpile::execute as transpile_execute;
