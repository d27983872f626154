//! Root-finding solvers for scalar expressions.
//!
//! ## Available Solvers
//!
//! ### Open Methods
//!
//! - [`NewtonRaphsonSolver`]: Quadratic convergence using analytic (dual-number)
//!   or central-difference derivatives
//! - [`SecantSolver`]: Derivative-free, superlinear convergence from two seeds
//! - [`FixedPointSolver`]: Relaxed iteration of `x = g(x)`
//!
//! ### Bracketing
//!
//! - [`BisectionSolver`]: Robust halving of a sign-changing interval
//!
//! ## Configuration
//!
//! All solvers use [`SolverConfig`] for configuring:
//! - `tolerance`: Convergence tolerance (default: 1e-10)
//! - `max_iterations`: Maximum iteration count (default: 100, ceiling
//!   [`MAX_ITERATIONS_CEILING`])
//!
//! ## Outcomes
//!
//! Every run returns a [`SolveResult`]. Non-convergence and numerical
//! breakdown are reported through [`Termination`] and a message, so the
//! trace up to the failure is never lost. Only invalid input produces an
//! `Err`.
//!
//! ## Examples
//!
//! ```
//! use rootfind_core::expr::Expression;
//! use rootfind_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
//!
//! // Solve x² - 2 = 0 (find √2)
//! let f = Expression::compile("x^2 - 2").unwrap();
//! let solver = NewtonRaphsonSolver::new(SolverConfig::default());
//!
//! let result = solver.solve(&f, 1.0).unwrap();
//! assert!(result.converged);
//! assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
//! assert_eq!(result.trace.len(), result.iterations + 1);
//! ```

mod bisection;
mod config;
mod fixed_point;
mod newton_raphson;
mod result;
mod secant;

// Re-export public types at module level
pub use bisection::BisectionSolver;
pub use config::{SolverConfig, MAX_ITERATIONS_CEILING};
pub use fixed_point::{FixedPointSolver, DIVERGENCE_BOUND};
pub use newton_raphson::{DerivativeMode, NewtonRaphsonSolver};
pub use result::{SolveResult, Termination};
pub use secant::SecantSolver;
