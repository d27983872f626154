//! Shared error types.
//!
//! This module provides:
//! - `error`: Structured error types for expression compilation, evaluation and solver operations
//!
//! # Re-exports
//!
//! [`ParseError`], [`DomainError`] and [`SolverError`] are re-exported at this module level.

pub mod error;

pub use error::{DomainError, ParseError, SolverError};
