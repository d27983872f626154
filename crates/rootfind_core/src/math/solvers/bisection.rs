//! Bisection root-finding solver.

use super::result::{undefined_message, Iterates, SolveResult};
use super::SolverConfig;
use crate::expr::Expression;
use crate::types::{DomainError, SolverError};

/// Bisection root finder.
///
/// Halves a sign-changing interval until `|f(mid)| <= tolerance` or the
/// half-width is within tolerance. Derivative-free and guaranteed to
/// converge for continuous `f` on a valid bracket.
///
/// The endpoints may be given in either order. If neither endpoint is a
/// root and `f` has the same sign at both, the run ends as diverged.
///
/// # Example
///
/// ```
/// use rootfind_core::expr::Expression;
/// use rootfind_core::math::solvers::{BisectionSolver, SolverConfig};
///
/// let f = Expression::compile("x^3 - x - 2").unwrap();
/// let solver = BisectionSolver::new(SolverConfig::new(1e-10, 200).unwrap());
///
/// let result = solver.solve(&f, 1.0, 2.0).unwrap();
/// assert!(result.converged);
/// assert!((result.root - 1.5213797).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct BisectionSolver {
    config: SolverConfig,
}

impl BisectionSolver {
    /// Create a new bisection solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Find a root of `f` between `a` and `b`.
    pub fn solve(&self, f: &Expression, a: f64, b: f64) -> Result<SolveResult, SolverError> {
        self.find_root(|x| f.eval(x), a, b)
    }

    /// Find a root of an arbitrary function between `a` and `b`.
    ///
    /// The trace starts at `a`; each midpoint counts as one iteration.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidRange`] for an invalid configuration or a
    /// non-finite endpoint.
    pub fn find_root<F>(&self, f: F, a: f64, b: f64) -> Result<SolveResult, SolverError>
    where
        F: Fn(f64) -> Result<f64, DomainError>,
    {
        self.config.validate()?;
        if !(a.is_finite() && b.is_finite()) {
            return Err(SolverError::invalid_range(format!(
                "bisection endpoints must be finite, got [{}, {}]",
                a, b
            )));
        }

        let tol = self.config.tolerance;
        let mut iterates = Iterates::start(a, self.config.max_iterations);

        let fa0 = match f(a) {
            Ok(v) => v,
            Err(e) => return Ok(iterates.undefined(e)),
        };
        if fa0 == 0.0 {
            return Ok(iterates.converged(fa0));
        }
        let fb0 = match f(b) {
            Ok(v) => v,
            Err(e) => return Ok(iterates.diverged(undefined_message(&e), fa0)),
        };
        if fb0 == 0.0 {
            iterates.accept(b);
            return Ok(iterates.converged(fb0));
        }
        if fa0.signum() == fb0.signum() {
            return Ok(iterates.diverged(
                format!("no sign change on [{}, {}]", a.min(b), a.max(b)),
                fa0,
            ));
        }

        let (mut lo, mut hi, mut f_lo) = if a < b { (a, b, fa0) } else { (b, a, fb0) };

        for _iteration in 0..self.config.max_iterations {
            let half = 0.5 * (hi - lo);
            let mid = lo + half;
            let f_mid = match f(mid) {
                Ok(v) => v,
                Err(e) => return Ok(iterates.undefined(e)),
            };
            iterates.accept(mid);

            if f_mid.abs() <= tol || half <= tol {
                return Ok(iterates.converged(f_mid));
            }

            if f_lo.signum() == f_mid.signum() {
                lo = mid;
                f_lo = f_mid;
            } else {
                hi = mid;
            }
        }

        let residual = f(iterates.last()).unwrap_or(f64::NAN);
        Ok(iterates.exhausted(self.config.max_iterations, residual))
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}
