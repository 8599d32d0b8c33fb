//! Shared library for `malla`
//! Contains the curriculum model, progress store, state resolution and
//! rendering used by the CLI.

pub mod config;
pub mod core;
pub mod error;
pub mod logger;

pub use error::{MallaError, Result};

/// Returns the current version of the `malla` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
