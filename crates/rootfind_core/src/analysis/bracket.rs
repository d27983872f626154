//! Uniform-grid sign-change scan.

use serde::Serialize;

use crate::expr::Expression;
use crate::types::SolverError;

/// Upper bound on the number of sub-intervals a scan may request.
pub const MAX_BRACKET_STEPS: usize = 100_000;

/// A sampled `(x, f(x))` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// Abscissa
    pub x: f64,
    /// Function value
    pub y: f64,
}

/// A sub-interval on which `f` changes sign (or touches zero).
///
/// Always `a < b` and `fa * fb <= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    /// Left endpoint
    pub a: f64,
    /// Right endpoint
    pub b: f64,
    /// `f(a)`
    pub fa: f64,
    /// `f(b)`
    pub fb: f64,
}

impl Interval {
    /// Width `b - a`.
    pub fn width(&self) -> f64 {
        self.b - self.a
    }

    /// Whether `x` lies in the closed interval.
    pub fn contains(&self, x: f64) -> bool {
        self.a <= x && x <= self.b
    }
}

/// Output of [`bracket`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketScan {
    /// Sign-changing sub-intervals in ascending order.
    pub intervals: Vec<Interval>,
    /// Every successfully evaluated grid point in ascending order.
    pub samples: Vec<Point>,
    /// Grid points where `f` was undefined.
    #[serde(skip)]
    pub gaps: usize,
}

/// Scan `[a, b]` on `steps` equal sub-intervals for sign changes of `f`.
///
/// Points where `f` is undefined are recorded as gaps and break adjacency:
/// an interval is only reported when both of its endpoints evaluated.
///
/// # Errors
///
/// [`SolverError::InvalidRange`] unless `a < b` (both finite) and
/// `1 <= steps <= MAX_BRACKET_STEPS`.
///
/// # Example
///
/// ```
/// use rootfind_core::analysis::bracket;
/// use rootfind_core::expr::Expression;
///
/// let f = Expression::compile("x^2 - 2").unwrap();
/// let scan = bracket(&f, 0.0, 2.0, 4).unwrap();
///
/// assert_eq!(scan.samples.len(), 5);
/// assert_eq!(scan.intervals.len(), 1);
/// assert_eq!((scan.intervals[0].a, scan.intervals[0].b), (1.0, 1.5));
/// ```
pub fn bracket(f: &Expression, a: f64, b: f64, steps: usize) -> Result<BracketScan, SolverError> {
    if !(a.is_finite() && b.is_finite()) {
        return Err(SolverError::invalid_range(format!(
            "bracket bounds must be finite, got [{}, {}]",
            a, b
        )));
    }
    if a >= b {
        return Err(SolverError::invalid_range(format!(
            "bracket requires a < b, got [{}, {}]",
            a, b
        )));
    }
    if steps == 0 || steps > MAX_BRACKET_STEPS {
        return Err(SolverError::invalid_range(format!(
            "steps must be in 1..={}, got {}",
            MAX_BRACKET_STEPS, steps
        )));
    }

    let width = b - a;
    let grid = (0..=steps).map(|i| {
        if i == steps {
            b
        } else {
            a + width * (i as f64) / (steps as f64)
        }
    });

    let mut samples = Vec::with_capacity(steps + 1);
    let mut intervals = Vec::new();
    let mut gaps = 0;
    let mut previous: Option<Point> = None;

    for x in grid {
        let current = match f.eval(x) {
            Ok(y) => Point { x, y },
            Err(_) => {
                gaps += 1;
                previous = None;
                continue;
            }
        };

        if let Some(p) = previous {
            if sign_change(p.y, current.y) {
                intervals.push(Interval {
                    a: p.x,
                    b: current.x,
                    fa: p.y,
                    fb: current.y,
                });
            }
        }

        samples.push(current);
        previous = Some(current);
    }

    Ok(BracketScan {
        intervals,
        samples,
        gaps,
    })
}

/// Opposite signs or an exact zero, without forming the product.
fn sign_change(fa: f64, fb: f64) -> bool {
    fa == 0.0 || fb == 0.0 || (fa < 0.0) != (fb < 0.0)
}
