//! Central-difference numeric differentiation.

use crate::expr::Expression;
use crate::types::{DomainError, SolverError};

/// Default relative step: `ε^(1/3)` balances truncation against rounding
/// error for the central difference.
pub fn default_step(x: f64) -> f64 {
    x.abs().max(1.0) * f64::EPSILON.cbrt()
}

/// Central-difference derivative `(e(x+h) - e(x-h)) / (2h)`.
///
/// Uses [`default_step`] when `h` is `None`.
///
/// # Errors
///
/// - [`SolverError::InvalidRange`] if an explicit `h` is not finite and positive
/// - [`SolverError::Domain`] if either evaluation fails, or the quotient is
///   not finite
///
/// # Example
///
/// ```
/// use rootfind_core::expr::Expression;
/// use rootfind_core::math::derivative;
///
/// let g = Expression::compile("sin(x)").unwrap();
/// let d = derivative(&g, 0.0, None).unwrap();
/// assert!((d - 1.0).abs() < 1e-9);
/// ```
pub fn derivative(e: &Expression, x: f64, h: Option<f64>) -> Result<f64, SolverError> {
    let h = match h {
        Some(h) if h.is_finite() && h > 0.0 => h,
        Some(h) => {
            return Err(SolverError::invalid_range(format!(
                "derivative step must be finite and positive, got {}",
                h
            )))
        }
        None => default_step(x),
    };

    Ok(central_difference(e, x, h)?)
}

/// Central difference with a step already known to be valid.
pub(crate) fn central_difference(e: &Expression, x: f64, h: f64) -> Result<f64, DomainError> {
    let forward = e.eval(x + h)?;
    let backward = e.eval(x - h)?;
    let d = (forward - backward) / (2.0 * h);
    if d.is_finite() {
        Ok(d)
    } else {
        Err(DomainError::NonFinite { x })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_step_scales_with_x() {
        let small = default_step(0.5);
        let unit = default_step(1.0);
        let large = default_step(1000.0);
        assert_eq!(small, unit);
        assert_relative_eq!(large, 1000.0 * unit);
        assert!(unit > 1e-6 && unit < 1e-5);
    }

    #[test]
    fn test_polynomial_derivative() {
        let f = Expression::compile("x^3 - 2*x").unwrap();
        let d = derivative(&f, 2.0, None).unwrap();
        assert_relative_eq!(d, 10.0, epsilon = 1e-8);
    }

    #[test]
    fn test_matches_dual_derivative() {
        let f = Expression::compile("exp(-x) * cos(3*x)").unwrap();
        for &x in &[-1.0, 0.0, 0.4, 2.5] {
            let numeric = derivative(&f, x, None).unwrap();
            let exact = f.derivative(x).unwrap();
            assert_relative_eq!(numeric, exact, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_explicit_step() {
        let f = Expression::compile("x^2").unwrap();
        // Central difference is exact for quadratics
        let d = derivative(&f, 3.0, Some(0.5)).unwrap();
        assert_relative_eq!(d, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_step_rejected() {
        let f = Expression::compile("x").unwrap();
        for h in [0.0, -1e-3, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                derivative(&f, 1.0, Some(h)),
                Err(SolverError::InvalidRange(_))
            ));
        }
    }

    #[test]
    fn test_domain_error_propagates() {
        let f = Expression::compile("log(x)").unwrap();
        // x - h is negative
        assert!(matches!(
            derivative(&f, 1e-9, None),
            Err(SolverError::Domain(DomainError::LogNonPositive { .. }))
        ));
    }
}
