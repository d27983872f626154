//! Error types for structured error handling.
//!
//! This module provides:
//! - `ParseError`: Malformed expression text, raised at compile time
//! - `DomainError`: Expression undefined at an evaluated point
//! - `SolverError`: Errors from solvers, scanners and diagnostics

use thiserror::Error;

/// Expression compilation error.
///
/// Raised by [`Expression::compile`](crate::expr::Expression::compile) before
/// any evaluation takes place. Never raised during iteration.
///
/// # Examples
/// ```
/// use rootfind_core::types::ParseError;
///
/// let err = ParseError::at(4, "unexpected '*'");
/// assert_eq!(format!("{}", err), "Parse error at position 4: unexpected '*'");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Parse error{}: {message}", .position.map(|p| format!(" at position {}", p)).unwrap_or_default())]
pub struct ParseError {
    /// Human-readable description of the problem
    pub message: String,
    /// Byte offset of the offending token, when known
    pub position: Option<usize>,
}

impl ParseError {
    /// Create a parse error anchored at a byte offset.
    pub fn at(position: usize, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: Some(position),
        }
    }

    /// Create a parse error without position information.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }
}

/// Evaluation domain error.
///
/// Distinguishes "the expression is undefined here" from an ordinary numeric
/// result, so solvers classify it as divergence instead of converging to NaN.
///
/// # Examples
/// ```
/// use rootfind_core::types::DomainError;
///
/// let err = DomainError::DivisionByZero { x: 0.0 };
/// assert!(format!("{}", err).contains("Division by zero"));
/// ```
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DomainError {
    /// Denominator evaluated to exactly zero.
    #[error("Division by zero at x = {x}")]
    DivisionByZero {
        /// Point of evaluation
        x: f64,
    },

    /// Logarithm of a non-positive argument.
    #[error("log of non-positive argument {arg} at x = {x}")]
    LogNonPositive {
        /// Point of evaluation
        x: f64,
        /// Offending argument
        arg: f64,
    },

    /// Square root of a negative argument.
    #[error("sqrt of negative argument {arg} at x = {x}")]
    SqrtNegative {
        /// Point of evaluation
        x: f64,
        /// Offending argument
        arg: f64,
    },

    /// An intermediate or final value was NaN or infinite.
    #[error("Non-finite value at x = {x}")]
    NonFinite {
        /// Point of evaluation
        x: f64,
    },
}

impl DomainError {
    /// The point at which evaluation failed.
    pub fn x(&self) -> f64 {
        match *self {
            DomainError::DivisionByZero { x }
            | DomainError::LogNonPositive { x, .. }
            | DomainError::SqrtNegative { x, .. }
            | DomainError::NonFinite { x } => x,
        }
    }
}

/// Solver, scanner and diagnostic errors.
///
/// Non-convergence is not represented here: running out of iterations is a
/// normal terminal state reported through
/// [`SolveResult`](crate::math::solvers::SolveResult) with `converged = false`.
///
/// # Variants
/// - `InvalidRange`: Bad interval, tolerance, step or sample count
/// - `NoStableRegion`: Suggester found no contractive neighbourhood
/// - `Parse`: Expression failed to compile
/// - `Domain`: Expression undefined where a value was required
///
/// # Examples
/// ```
/// use rootfind_core::types::SolverError;
///
/// let err = SolverError::InvalidRange("steps must be >= 1".to_string());
/// assert_eq!(format!("{}", err), "Invalid range: steps must be >= 1");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Rejected input range or count; never retried.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// No contractive region was found near the seed point.
    #[error("No stable region found near x0 = {x0}")]
    NoStableRegion {
        /// Seed point of the search
        x0: f64,
    },

    /// Expression compilation failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Expression undefined at a required point.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl SolverError {
    /// Shorthand for [`SolverError::InvalidRange`].
    pub fn invalid_range(msg: impl Into<String>) -> Self {
        SolverError::InvalidRange(msg.into())
    }
}
