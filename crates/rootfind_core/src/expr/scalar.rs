//! Scalar types the bytecode VM can evaluate over.
//!
//! `f64` yields plain values; [`Dual64`] carries the first derivative with
//! respect to `x` alongside the value (forward-mode AD).

use num_dual::{Dual64, DualNum};
use num_traits::{NumOps, Zero};
use std::ops::Neg;

/// A number type supporting every operation the expression grammar needs.
pub trait Scalar: Copy + NumOps + Neg<Output = Self> + Zero + Send + Sync + 'static {
    /// Lift a constant (zero derivative).
    fn constant(value: f64) -> Self;

    /// Real part.
    fn value(self) -> f64;

    /// True when every component is finite.
    fn is_finite(self) -> bool;

    /// Sine (radians).
    fn sin(self) -> Self;

    /// Cosine (radians).
    fn cos(self) -> Self;

    /// Tangent (radians).
    fn tan(self) -> Self;

    /// Natural exponential.
    fn exp(self) -> Self;

    /// Natural logarithm.
    fn ln(self) -> Self;

    /// Square root.
    fn sqrt(self) -> Self;

    /// Absolute value.
    fn abs(self) -> Self;

    /// Power with a constant exponent.
    fn powf(self, n: f64) -> Self;

    /// Power with a variable exponent.
    fn powd(self, n: Self) -> Self;
}

impl Scalar for f64 {
    #[inline]
    fn constant(value: f64) -> Self {
        value
    }

    #[inline]
    fn value(self) -> f64 {
        self
    }

    #[inline]
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }

    #[inline]
    fn sin(self) -> Self {
        f64::sin(self)
    }

    #[inline]
    fn cos(self) -> Self {
        f64::cos(self)
    }

    #[inline]
    fn tan(self) -> Self {
        f64::tan(self)
    }

    #[inline]
    fn exp(self) -> Self {
        f64::exp(self)
    }

    #[inline]
    fn ln(self) -> Self {
        f64::ln(self)
    }

    #[inline]
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }

    #[inline]
    fn abs(self) -> Self {
        f64::abs(self)
    }

    #[inline]
    fn powf(self, n: f64) -> Self {
        f64::powf(self, n)
    }

    #[inline]
    fn powd(self, n: Self) -> Self {
        f64::powf(self, n)
    }
}

impl Scalar for Dual64 {
    #[inline]
    fn constant(value: f64) -> Self {
        Dual64::new(value, 0.0)
    }

    #[inline]
    fn value(self) -> f64 {
        self.re
    }

    #[inline]
    fn is_finite(self) -> bool {
        self.re.is_finite() && self.eps.is_finite()
    }

    #[inline]
    fn sin(self) -> Self {
        DualNum::sin(&self)
    }

    #[inline]
    fn cos(self) -> Self {
        DualNum::cos(&self)
    }

    #[inline]
    fn tan(self) -> Self {
        DualNum::tan(&self)
    }

    #[inline]
    fn exp(self) -> Self {
        DualNum::exp(&self)
    }

    #[inline]
    fn ln(self) -> Self {
        DualNum::ln(&self)
    }

    #[inline]
    fn sqrt(self) -> Self {
        DualNum::sqrt(&self)
    }

    #[inline]
    fn abs(self) -> Self {
        // d|u| = sign(u) du; the kink at zero takes the right-hand slope
        Dual64::new(self.re.abs(), self.eps * self.re.signum())
    }

    #[inline]
    fn powf(self, n: f64) -> Self {
        // Power rule directly, so x^2 stays differentiable at x = 0
        if n == 0.0 {
            return Dual64::new(1.0, 0.0);
        }
        Dual64::new(self.re.powf(n), n * self.re.powf(n - 1.0) * self.eps)
    }

    #[inline]
    fn powd(self, n: Self) -> Self {
        DualNum::powd(&self, n)
    }
}
