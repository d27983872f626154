//! Newton-Raphson root-finding solver.

use super::result::{Iterates, SolveResult};
use super::SolverConfig;
use crate::expr::Expression;
use crate::math::differentiate::{central_difference, default_step};
use crate::types::{DomainError, SolverError};

/// How the Newton solver obtains `f'(x)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DerivativeMode {
    /// Exact derivative via dual-number evaluation of the same bytecode.
    #[default]
    Analytic,
    /// Central difference; `step` of `None` uses [`default_step`].
    Numeric {
        /// Fixed step `h`.
        step: Option<f64>,
    },
}

/// Newton-Raphson root finder.
///
/// Uses Newton's method: `x_{n+1} = x_n - f(x_n) / f'(x_n)` for fast
/// quadratic convergence on smooth functions.
///
/// # Convergence
///
/// Converged when `|f(x)| <= tolerance` or the accepted step
/// `|x_{n+1} - x_n| <= tolerance`. The run ends as diverged if:
/// - `f` is undefined at an iterate
/// - The derivative is zero or undefined
/// - An iterate is non-finite
///
/// # Example
///
/// ```
/// use rootfind_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
///
/// // Solve x² - 2 = 0 (find √2)
/// let solver = NewtonRaphsonSolver::new(SolverConfig::default());
///
/// let f = |x: f64| Ok(x * x - 2.0);
/// let f_prime = |x: f64| Ok(2.0 * x);
///
/// let result = solver.find_root(f, f_prime, 1.0).unwrap();
/// assert!(result.converged);
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct NewtonRaphsonSolver {
    /// Solver configuration
    config: SolverConfig,
    derivative: DerivativeMode,
}

impl NewtonRaphsonSolver {
    /// Create a new Newton-Raphson solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            derivative: DerivativeMode::default(),
        }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Select how `f'` is computed by [`NewtonRaphsonSolver::solve`].
    pub fn with_derivative(mut self, mode: DerivativeMode) -> Self {
        self.derivative = mode;
        self
    }

    /// Find a root of a compiled expression starting from `x0`.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidRange`] for an invalid configuration, a
    /// non-finite `x0` or an invalid numeric step. Numerical breakdown is
    /// reported in the returned [`SolveResult`], not as an error.
    ///
    /// # Example
    ///
    /// ```
    /// use rootfind_core::expr::Expression;
    /// use rootfind_core::math::solvers::{DerivativeMode, NewtonRaphsonSolver, SolverConfig};
    ///
    /// let f = Expression::compile("cos(x) - x").unwrap();
    /// let solver = NewtonRaphsonSolver::new(SolverConfig::new(1e-8, 100).unwrap())
    ///     .with_derivative(DerivativeMode::Numeric { step: None });
    ///
    /// let result = solver.solve(&f, 0.5).unwrap();
    /// assert!(result.converged);
    /// assert!((result.root - 0.7390851332).abs() < 1e-8);
    /// ```
    pub fn solve(&self, f: &Expression, x0: f64) -> Result<SolveResult, SolverError> {
        match self.derivative {
            DerivativeMode::Analytic => self.find_root(|x| f.eval(x), |x| f.derivative(x), x0),
            DerivativeMode::Numeric { step } => {
                if let Some(h) = step {
                    if !(h.is_finite() && h > 0.0) {
                        return Err(SolverError::invalid_range(format!(
                            "derivative step must be finite and positive, got {}",
                            h
                        )));
                    }
                }
                self.find_root(
                    |x| f.eval(x),
                    |x| central_difference(f, x, step.unwrap_or_else(|| default_step(x))),
                    x0,
                )
            }
        }
    }

    /// Find a root of `f` using explicit derivative `f_prime`.
    ///
    /// Both closures report undefined points as [`DomainError`].
    pub fn find_root<F, G>(&self, f: F, f_prime: G, x0: f64) -> Result<SolveResult, SolverError>
    where
        F: Fn(f64) -> Result<f64, DomainError>,
        G: Fn(f64) -> Result<f64, DomainError>,
    {
        self.config.validate()?;
        if !x0.is_finite() {
            return Err(SolverError::invalid_range(format!(
                "x0 must be finite, got {}",
                x0
            )));
        }

        let tol = self.config.tolerance;
        let mut iterates = Iterates::start(x0, self.config.max_iterations);

        for _iteration in 0..self.config.max_iterations {
            let x = iterates.last();
            let f_val = match f(x) {
                Ok(v) => v,
                Err(e) => return Ok(iterates.undefined(e)),
            };

            if f_val.abs() <= tol {
                return Ok(iterates.converged(f_val));
            }

            let f_prime_val = match f_prime(x) {
                Ok(d) if d != 0.0 => d,
                _ => {
                    return Ok(iterates.diverged(
                        format!("zero or undefined derivative at x = {}", x),
                        f_val,
                    ))
                }
            };

            let next = x - f_val / f_prime_val;
            if !next.is_finite() {
                return Ok(iterates.diverged(
                    "Newton iteration produced non-finite value",
                    f_val,
                ));
            }

            if iterates.accept(next) <= tol {
                return Ok(match f(next) {
                    Ok(v) => iterates.converged(v),
                    Err(e) => iterates.undefined(e),
                });
            }
        }

        let residual = f(iterates.last()).unwrap_or(f64::NAN);
        Ok(iterates.exhausted(self.config.max_iterations, residual))
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The configured derivative mode.
    pub fn derivative_mode(&self) -> DerivativeMode {
        self.derivative
    }
}
