//! Side-by-side solver comparison on one problem.
//!
//! Each requested [`Method`] runs independently on the rayon pool against
//! the same [`SolveConfig`]; rows come back in request order.
//!
//! # Example
//!
//! ```
//! use rootfind_core::compare::{compare, Method, SolveConfig};
//! use rootfind_core::expr::Expression;
//!
//! let mut cfg = SolveConfig::new(1.0);
//! cfg.f = Some(Expression::compile("x^2 - 2").unwrap());
//! cfg.x1 = 2.0;
//!
//! let rows = compare(&[Method::Newton, Method::Secant], &cfg).unwrap();
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[0].method, Method::Newton);
//! assert!(rows.iter().all(|r| r.converged));
//! ```

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::expr::Expression;
use crate::math::solvers::{
    BisectionSolver, DerivativeMode, FixedPointSolver, NewtonRaphsonSolver, SecantSolver,
    SolveResult, SolverConfig,
};
use crate::types::SolverError;

/// Solver selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// [`NewtonRaphsonSolver`] on `f` from `x0`
    Newton,
    /// [`FixedPointSolver`] on `g` from `x0`
    Fixed,
    /// [`BisectionSolver`] on `f` over `[x0, x1]`
    Bisection,
    /// [`SecantSolver`] on `f` from `x0`, `x1`
    Secant,
}

impl Method {
    /// All methods, in display order.
    pub const ALL: [Method; 4] = [
        Method::Newton,
        Method::Fixed,
        Method::Bisection,
        Method::Secant,
    ];

    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Newton => "newton",
            Method::Fixed => "fixed",
            Method::Bisection => "bisection",
            Method::Secant => "secant",
        }
    }

    /// Name of the expression field this method iterates on.
    pub fn required_expression(&self) -> &'static str {
        match self {
            Method::Fixed => "g",
            Method::Newton | Method::Bisection | Method::Secant => "f",
        }
    }

    /// Run this method on `cfg`.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidRange`] when the required expression is missing
    /// or the configuration is invalid.
    pub fn run(&self, cfg: &SolveConfig) -> Result<SolveResult, SolverError> {
        match self {
            Method::Newton => NewtonRaphsonSolver::new(cfg.solver)
                .with_derivative(cfg.derivative)
                .solve(cfg.require_f(*self)?, cfg.x0),
            Method::Fixed => FixedPointSolver::new(cfg.solver)
                .with_relaxation(cfg.relax)
                .solve(cfg.require_g()?, cfg.f.as_ref(), cfg.x0),
            Method::Bisection => {
                BisectionSolver::new(cfg.solver).solve(cfg.require_f(*self)?, cfg.x0, cfg.x1)
            }
            Method::Secant => {
                SecantSolver::new(cfg.solver).solve(cfg.require_f(*self)?, cfg.x0, cfg.x1)
            }
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| SolverError::invalid_range(format!("unknown method '{}'", s)))
    }
}

/// Everything one solver run needs.
///
/// `f` and `g` are optional because each method needs only one of them;
/// [`Method::run`] checks the one it needs.
#[derive(Debug, Clone)]
pub struct SolveConfig {
    /// Target function for `f(x) = 0`
    pub f: Option<Expression>,
    /// Fixed-point map for `x = g(x)`
    pub g: Option<Expression>,
    /// Initial point
    pub x0: f64,
    /// Second seed (secant) or bracket end (bisection)
    pub x1: f64,
    /// Tolerance and iteration limit
    pub solver: SolverConfig,
    /// Fixed-point relaxation factor
    pub relax: f64,
    /// Newton derivative source
    pub derivative: DerivativeMode,
}

impl SolveConfig {
    /// Configuration with no expressions, `x1 = 0`, `relax = 1` and
    /// default solver settings.
    pub fn new(x0: f64) -> Self {
        Self {
            f: None,
            g: None,
            x0,
            x1: 0.0,
            solver: SolverConfig::default(),
            relax: 1.0,
            derivative: DerivativeMode::Analytic,
        }
    }

    fn require_f(&self, method: Method) -> Result<&Expression, SolverError> {
        self.f.as_ref().ok_or_else(|| missing(method))
    }

    fn require_g(&self) -> Result<&Expression, SolverError> {
        self.g.as_ref().ok_or_else(|| missing(Method::Fixed))
    }

    /// Check that every method in `methods` has its expression.
    pub fn check_methods(&self, methods: &[Method]) -> Result<(), SolverError> {
        for &m in methods {
            let present = match m {
                Method::Fixed => self.g.is_some(),
                _ => self.f.is_some(),
            };
            if !present {
                return Err(missing(m));
            }
        }
        Ok(())
    }
}

fn missing(method: Method) -> SolverError {
    SolverError::invalid_range(format!(
        "method '{}' requires expression '{}'",
        method,
        method.required_expression()
    ))
}

/// One row of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareRow {
    /// Method that produced this row
    pub method: Method,
    /// Iterations taken
    pub iters: usize,
    /// Convergence flag
    pub converged: bool,
    /// Final iterate
    pub root: f64,
}

impl CompareRow {
    fn from_result(method: Method, result: &SolveResult) -> Self {
        Self {
            method,
            iters: result.iterations,
            converged: result.converged,
            root: result.root,
        }
    }
}

/// Run every distinct method in `methods` on `cfg`.
///
/// Duplicates collapse to their first occurrence. All inputs are validated
/// before any run starts, so a failure never leaves partial output.
///
/// # Errors
///
/// [`SolverError::InvalidRange`] for an empty method list, a missing
/// expression or an invalid configuration.
pub fn compare(methods: &[Method], cfg: &SolveConfig) -> Result<Vec<CompareRow>, SolverError> {
    let mut unique: Vec<Method> = Vec::with_capacity(methods.len());
    for &m in methods {
        if !unique.contains(&m) {
            unique.push(m);
        }
    }
    if unique.is_empty() {
        return Err(SolverError::invalid_range("no methods requested"));
    }
    cfg.solver.validate()?;
    cfg.check_methods(&unique)?;

    unique
        .par_iter()
        .map(|&m| m.run(cfg).map(|r| CompareRow::from_result(m, &r)))
        .collect()
}
