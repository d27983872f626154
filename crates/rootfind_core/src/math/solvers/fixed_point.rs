//! Relaxed fixed-point iteration.

use super::result::{Iterates, SolveResult};
use super::SolverConfig;
use crate::expr::Expression;
use crate::types::{DomainError, SolverError};

/// Iterates whose magnitude exceeds this are treated as divergent.
pub const DIVERGENCE_BOUND: f64 = 1e100;

/// Fixed-point solver for `x = g(x)`.
///
/// Iterates `x_{n+1} = (1 - λ) x_n + λ g(x_n)` with relaxation `λ ∈ (0, 1]`.
/// Converged when the accepted step is within tolerance.
///
/// # Example
///
/// ```
/// use rootfind_core::expr::Expression;
/// use rootfind_core::math::solvers::{FixedPointSolver, SolverConfig};
///
/// let g = Expression::compile("cos(x)").unwrap();
/// let solver = FixedPointSolver::new(SolverConfig::new(1e-8, 200).unwrap());
///
/// let result = solver.solve(&g, None, 0.5).unwrap();
/// assert!(result.converged);
/// assert!((result.root - 0.739085).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct FixedPointSolver {
    config: SolverConfig,
    relax: f64,
}

impl FixedPointSolver {
    /// Create a solver with the given configuration and no relaxation (`λ = 1`).
    pub fn new(config: SolverConfig) -> Self {
        Self { config, relax: 1.0 }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Set the relaxation factor `λ`; validated when solving.
    pub fn with_relaxation(mut self, relax: f64) -> Self {
        self.relax = relax;
        self
    }

    /// Iterate `g` from `x0`.
    ///
    /// When `f` is supplied the reported residual is `f(root)`; otherwise
    /// it is `g(root) - root`.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidRange`] for an invalid configuration, a
    /// relaxation outside `(0, 1]` or a non-finite `x0`.
    pub fn solve(
        &self,
        g: &Expression,
        f: Option<&Expression>,
        x0: f64,
    ) -> Result<SolveResult, SolverError> {
        match f {
            Some(f) => self.iterate(|x| g.eval(x), |x| f.eval(x), x0),
            None => self.find_fixed_point(|x| g.eval(x), x0),
        }
    }

    /// Iterate an arbitrary map `g` from `x0`; the residual is `g(root) - root`.
    pub fn find_fixed_point<G>(&self, g: G, x0: f64) -> Result<SolveResult, SolverError>
    where
        G: Fn(f64) -> Result<f64, DomainError>,
    {
        self.iterate(&g, |x| g(x).map(|gx| gx - x), x0)
    }

    /// Iterate `g` from `x0`, reporting `residual` at the final iterate.
    ///
    /// A step within tolerance only counts as convergence when both `g` and
    /// `residual` are defined at the new iterate.
    fn iterate<G, R>(&self, g: G, residual: R, x0: f64) -> Result<SolveResult, SolverError>
    where
        G: Fn(f64) -> Result<f64, DomainError>,
        R: Fn(f64) -> Result<f64, DomainError>,
    {
        self.config.validate()?;
        if !(self.relax > 0.0 && self.relax <= 1.0) {
            return Err(SolverError::invalid_range(format!(
                "relax must be in (0, 1], got {}",
                self.relax
            )));
        }
        if !x0.is_finite() {
            return Err(SolverError::invalid_range(format!(
                "x0 must be finite, got {}",
                x0
            )));
        }

        let lambda = self.relax;
        let mut iterates = Iterates::start(x0, self.config.max_iterations);

        for _iteration in 0..self.config.max_iterations {
            let x = iterates.last();
            let gx = match g(x) {
                Ok(v) => v,
                Err(e) => return Ok(iterates.undefined(e)),
            };

            let next = (1.0 - lambda) * x + lambda * gx;
            if !next.is_finite() || next.abs() > DIVERGENCE_BOUND {
                return Ok(iterates.diverged("fixed-point iterates diverged", gx - x));
            }

            if iterates.accept(next) <= self.config.tolerance {
                return Ok(match g(next).and_then(|_| residual(next)) {
                    Ok(r) => iterates.converged(r),
                    Err(e) => iterates.undefined(e),
                });
            }
        }

        let last = residual(iterates.last()).unwrap_or(f64::NAN);
        Ok(iterates.exhausted(self.config.max_iterations, last))
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The relaxation factor `λ`.
    pub fn relaxation(&self) -> f64 {
        self.relax
    }
}
