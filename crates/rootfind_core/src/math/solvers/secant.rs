//! Secant root-finding solver.

use super::result::{Iterates, SolveResult};
use super::SolverConfig;
use crate::expr::Expression;
use crate::types::{DomainError, SolverError};

/// Secant root finder.
///
/// Replaces Newton's derivative with the slope through the last two
/// iterates: `x_{n+1} = x_n - f(x_n) (x_n - x_{n-1}) / (f(x_n) - f(x_{n-1}))`.
/// Superlinear convergence without derivatives.
///
/// The second seed `x1` is recorded as the first iteration.
///
/// # Example
///
/// ```
/// use rootfind_core::expr::Expression;
/// use rootfind_core::math::solvers::{SecantSolver, SolverConfig};
///
/// let f = Expression::compile("x^2 - 2").unwrap();
/// let solver = SecantSolver::new(SolverConfig::new(1e-10, 100).unwrap());
///
/// let result = solver.solve(&f, 1.0, 2.0).unwrap();
/// assert!(result.converged);
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct SecantSolver {
    config: SolverConfig,
}

impl SecantSolver {
    /// Create a new secant solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Find a root of `f` from seeds `x0`, `x1`.
    pub fn solve(&self, f: &Expression, x0: f64, x1: f64) -> Result<SolveResult, SolverError> {
        self.find_root(|x| f.eval(x), x0, x1)
    }

    /// Find a root of an arbitrary function from seeds `x0`, `x1`.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidRange`] for an invalid configuration or a
    /// non-finite seed.
    pub fn find_root<F>(&self, f: F, x0: f64, x1: f64) -> Result<SolveResult, SolverError>
    where
        F: Fn(f64) -> Result<f64, DomainError>,
    {
        self.config.validate()?;
        if !(x0.is_finite() && x1.is_finite()) {
            return Err(SolverError::invalid_range(format!(
                "secant seeds must be finite, got x0 = {}, x1 = {}",
                x0, x1
            )));
        }

        let tol = self.config.tolerance;
        let mut iterates = Iterates::start(x0, self.config.max_iterations);

        let mut f_prev = match f(x0) {
            Ok(v) => v,
            Err(e) => return Ok(iterates.undefined(e)),
        };
        if f_prev.abs() <= tol {
            return Ok(iterates.converged(f_prev));
        }

        iterates.accept(x1);
        let mut f_curr = match f(x1) {
            Ok(v) => v,
            Err(e) => return Ok(iterates.undefined(e)),
        };
        if f_curr.abs() <= tol {
            return Ok(iterates.converged(f_curr));
        }

        let mut prev = x0;
        while iterates.iterations() < self.config.max_iterations {
            let curr = iterates.last();
            let denom = f_curr - f_prev;
            if denom == 0.0 {
                return Ok(iterates.diverged(
                    format!("flat secant between x = {} and x = {}", prev, curr),
                    f_curr,
                ));
            }

            let next = curr - f_curr * (curr - prev) / denom;
            if !next.is_finite() {
                return Ok(iterates.diverged(
                    "secant iteration produced non-finite value",
                    f_curr,
                ));
            }

            let step = iterates.accept(next);
            prev = curr;
            f_prev = f_curr;
            f_curr = match f(next) {
                Ok(v) => v,
                Err(e) => return Ok(iterates.undefined(e)),
            };

            if f_curr.abs() <= tol || step <= tol {
                return Ok(iterates.converged(f_curr));
            }
        }

        Ok(iterates.exhausted(self.config.max_iterations, f_curr))
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}
