//! # rootfind_core: Scalar Root-Finding Engine
//!
//! Solves `f(x) = 0` and `x = g(x)` for user-supplied formula text.
//!
//! ## Layout
//!
//! - Expression engine: compile once, evaluate over `f64` or dual numbers (`expr`)
//! - Numeric differentiation and the four solvers (`math`)
//! - Bracket scan, contraction check, start-point suggester (`analysis`)
//! - Parallel side-by-side comparison (`compare`)
//! - Error types: `ParseError`, `DomainError`, `SolverError` (`types::error`)
//!
//! ## Dependencies
//!
//! No I/O, logging or async. External crates are limited to:
//! - num-dual: Forward-mode dual numbers for exact Newton derivatives
//! - num-traits: Numeric traits for the generic evaluator
//! - rayon: Parallel comparison runs
//! - serde: Serialisation of results and reports
//! - thiserror: Error derivation
//!
//! ## Usage Examples
//!
//! ```rust
//! use rootfind_core::analysis::{bracket, check};
//! use rootfind_core::expr::Expression;
//! use rootfind_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
//!
//! let f = Expression::compile("cos(x) - x").unwrap();
//!
//! // Locate a sign change, then polish it
//! let scan = bracket(&f, 0.0, 1.0, 10).unwrap();
//! let start = scan.intervals[0].a;
//!
//! let solver = NewtonRaphsonSolver::new(SolverConfig::new(1e-8, 100).unwrap());
//! let result = solver.solve(&f, start).unwrap();
//! assert!(result.converged);
//!
//! // cos is a contraction on [0, 1]
//! let g = Expression::compile("cos(x)").unwrap();
//! assert_eq!(check(&g, 0.0, 1.0, 300).unwrap().contractive, Some(true));
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analysis;
pub mod compare;
pub mod expr;
pub mod math;
pub mod types;
