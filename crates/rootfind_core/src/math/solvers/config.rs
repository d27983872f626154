//! Solver configuration types.

use crate::types::SolverError;

/// Hard ceiling on `max_iterations`, independent of caller input.
pub const MAX_ITERATIONS_CEILING: usize = 10_000;

/// Configuration for iterative solvers.
///
/// Provides common settings shared across all solver implementations,
/// including convergence tolerance and iteration limits.
///
/// # Example
///
/// ```
/// use rootfind_core::math::solvers::SolverConfig;
///
/// // Use default configuration
/// let config = SolverConfig::default();
/// assert!(config.tolerance < 1e-8);
/// assert!(config.max_iterations >= 50);
///
/// // Validated construction
/// let custom = SolverConfig::new(1e-12, 200).unwrap();
/// assert_eq!(custom.max_iterations, 200);
///
/// assert!(SolverConfig::new(1e-8, 50_000).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Convergence tolerance.
    ///
    /// Applied to both the residual `|f(x)|` and the step `|x_{k+1} - x_k|`
    /// where a method checks both.
    pub tolerance: f64,

    /// Maximum number of iterations before reporting non-convergence.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    /// Default values:
    /// - `tolerance`: 1e-10
    /// - `max_iterations`: 100
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 100,
        }
    }
}

impl SolverConfig {
    /// Create a validated configuration.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidRange`] unless `tolerance` is finite and positive
    /// and `1 <= max_iterations <= MAX_ITERATIONS_CEILING`.
    pub fn new(tolerance: f64, max_iterations: usize) -> Result<Self, SolverError> {
        let config = Self {
            tolerance,
            max_iterations,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants [`SolverConfig::new`] enforces.
    pub fn validate(&self) -> Result<(), SolverError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SolverError::invalid_range(format!(
                "tolerance must be finite and positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(SolverError::invalid_range("maxIter must be >= 1"));
        }
        if self.max_iterations > MAX_ITERATIONS_CEILING {
            return Err(SolverError::invalid_range(format!(
                "maxIter {} exceeds the limit of {}",
                self.max_iterations, MAX_ITERATIONS_CEILING
            )));
        }
        Ok(())
    }
}
