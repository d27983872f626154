//! Numerical routines.
//!
//! - [`differentiate`]: central-difference derivative of an [`Expression`](crate::expr::Expression)
//! - [`solvers`]: Newton-Raphson, fixed-point, bisection and secant iterations

pub mod differentiate;
pub mod solvers;

pub use differentiate::{default_step, derivative};
