//! REST API server for the rootfind scalar root-finding engine
//!
//! This crate exposes the solvers, bracket scan and fixed-point diagnostics
//! of [`rootfind_core`] over HTTP under `/api/v1/root`.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

pub use rootfind_core;

/// Server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
