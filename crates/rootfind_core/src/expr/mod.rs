//! Expression engine: compile formula text over `x` once, evaluate many times.
//!
//! Formula text is tokenised, parsed into an AST, constant-folded and
//! compiled into stack bytecode. The resulting [`Expression`] is immutable,
//! `Send + Sync`, and evaluates without allocating, so solver loops and
//! parallel comparison runs can share one compiled instance.
//!
//! ## Grammar
//!
//! - Binary operators `+ - * /`, power `^` (or `**`, right-associative)
//! - Unary `-` / `+`, binding tighter than `^` (`-x^2` is `(-x)^2`)
//! - Numeric literals: `2`, `2.5`, `.5`, `1e-3`
//! - The variable `x`, constants `pi` and `e`
//! - Functions `sin cos tan exp log sqrt abs` (`ln` is an alias for `log`)
//!
//! ## Derivatives
//!
//! The same bytecode also runs over dual numbers, giving the exact first
//! derivative via [`Expression::derivative`].
//!
//! ## Example
//!
//! ```
//! use rootfind_core::expr::Expression;
//!
//! let f = Expression::compile("x^2 - 2").unwrap();
//! assert_eq!(f.eval(3.0).unwrap(), 7.0);
//! assert!((f.derivative(3.0).unwrap() - 6.0).abs() < 1e-12);
//! ```

mod bytecode;
mod lexer;
mod parser;
mod scalar;

pub use scalar::Scalar;

use std::fmt;
use std::str::FromStr;

use bytecode::Program;
use num_dual::Dual64;

use crate::types::{DomainError, ParseError};

/// A compiled formula over the single free variable `x`.
///
/// Evaluation is a pure function of `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    program: Program,
}

impl Expression {
    /// Compile formula text.
    ///
    /// # Errors
    ///
    /// [`ParseError`] on malformed syntax, unknown identifiers, mismatched
    /// parentheses, excessive nesting or excessive length.
    pub fn compile(text: &str) -> Result<Self, ParseError> {
        let ast = parser::parse(text)?;
        let program = Program::compile(&ast)?;
        Ok(Self {
            source: text.trim().to_string(),
            program,
        })
    }

    /// Compile equation text `A = B` as `(A) - (B)`.
    ///
    /// Text without `=` compiles as-is. Only the first `=` splits; an empty
    /// side leaves the text unchanged, so it fails as ordinary bad syntax.
    ///
    /// ```
    /// use rootfind_core::expr::Expression;
    ///
    /// let f = Expression::compile_equation("x^2 = 2").unwrap();
    /// assert_eq!(f.source(), "(x^2)-(2)");
    /// assert_eq!(f.eval(2.0).unwrap(), 2.0);
    /// ```
    pub fn compile_equation(text: &str) -> Result<Self, ParseError> {
        let text = text.trim();
        match text.split_once('=') {
            Some((lhs, rhs)) if !lhs.trim().is_empty() && !rhs.trim().is_empty() => {
                Self::compile(&format!("({})-({})", lhs.trim(), rhs.trim()))
            }
            _ => Self::compile(text),
        }
    }

    /// Evaluate at `x`.
    ///
    /// # Errors
    ///
    /// [`DomainError`] when the expression is undefined at `x` or produces a
    /// non-finite value.
    #[inline]
    pub fn eval(&self, x: f64) -> Result<f64, DomainError> {
        self.program.execute(x)
    }

    /// Evaluate value and exact first derivative at `x` in one pass.
    pub fn eval_with_derivative(&self, x: f64) -> Result<(f64, f64), DomainError> {
        let y = self.program.execute(Dual64::new(x, 1.0))?;
        Ok((y.re, y.eps))
    }

    /// Exact first derivative at `x` via forward-mode dual numbers.
    pub fn derivative(&self, x: f64) -> Result<f64, DomainError> {
        self.eval_with_derivative(x).map(|(_, d)| d)
    }

    /// Evaluate over any [`Scalar`] type.
    pub fn eval_scalar<T: Scalar>(&self, x: T) -> Result<T, DomainError> {
        self.program.execute(x)
    }

    /// Build the fixed-point map `g(x) = x - alpha * f(x)` from this `f`.
    ///
    /// Any root of `f` is a fixed point of `g` for non-zero `alpha`.
    pub fn fixed_point_map(&self, alpha: f64) -> Expression {
        Expression {
            source: format!("x - ({}) * ({})", alpha, self.source),
            program: self.program.fixed_point_map(alpha),
        }
    }

    /// The (trimmed) formula text this expression was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of bytecode instructions.
    pub fn op_count(&self) -> usize {
        self.program.len()
    }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expression::compile(s)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
