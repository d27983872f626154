//! Sampled contraction diagnostic for fixed-point maps.

use serde::Serialize;

use crate::expr::Expression;
use crate::math::differentiate::{central_difference, default_step};
use crate::types::SolverError;

/// Upper bound on the number of sample points per check.
pub const MAX_CONTRACTION_SAMPLES: usize = 100_000;

/// Result of a contraction check.
///
/// `None` in both fields means no sample evaluated, so the check is
/// indeterminate; that is distinct from `contractive = Some(false)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractionReport {
    /// Largest sampled `|g'(x)|`
    pub max_abs_g_prime: Option<f64>,
    /// `max_abs_g_prime < 1`
    pub contractive: Option<bool>,
    /// Points where `g'` evaluated
    #[serde(skip)]
    pub evaluated: usize,
    /// Points where `g'` was undefined
    #[serde(skip)]
    pub skipped: usize,
}

impl ContractionReport {
    /// True only for a determinate, contractive result.
    pub fn is_contractive(&self) -> bool {
        self.contractive == Some(true)
    }

    /// True when every sample failed.
    pub fn is_indeterminate(&self) -> bool {
        self.contractive.is_none()
    }
}

/// Sample `|g'|` at `samples` evenly spaced points of `[a, b]`, endpoints
/// included, and report whether the maximum is below 1.
///
/// The endpoints may be given in either order.
///
/// # Errors
///
/// [`SolverError::InvalidRange`] for non-finite or equal endpoints, or
/// `samples` outside `2..=MAX_CONTRACTION_SAMPLES`.
///
/// # Example
///
/// ```
/// use rootfind_core::analysis::check;
/// use rootfind_core::expr::Expression;
///
/// let g = Expression::compile("cos(x)").unwrap();
/// let report = check(&g, 0.0, 1.0, 300).unwrap();
///
/// assert_eq!(report.contractive, Some(true));
/// assert!((report.max_abs_g_prime.unwrap() - 1f64.sin()).abs() < 1e-6);
/// ```
pub fn check(g: &Expression, a: f64, b: f64, samples: usize) -> Result<ContractionReport, SolverError> {
    if !(a.is_finite() && b.is_finite()) || a == b {
        return Err(SolverError::invalid_range(format!(
            "contraction check needs distinct finite bounds, got [{}, {}]",
            a, b
        )));
    }
    if !(2..=MAX_CONTRACTION_SAMPLES).contains(&samples) {
        return Err(SolverError::invalid_range(format!(
            "samples must be in 2..={}, got {}",
            MAX_CONTRACTION_SAMPLES, samples
        )));
    }

    Ok(sample(g, a.min(b), a.max(b), samples))
}

/// Unvalidated sampling over `lo <= hi`.
pub(crate) fn sample(g: &Expression, lo: f64, hi: f64, samples: usize) -> ContractionReport {
    let last = samples - 1;
    let mut max_abs: Option<f64> = None;
    let mut skipped = 0;

    for i in 0..samples {
        let x = if i == last {
            hi
        } else {
            lo + (hi - lo) * (i as f64) / (last as f64)
        };
        match central_difference(g, x, default_step(x)) {
            Ok(d) => {
                let d = d.abs();
                max_abs = Some(max_abs.map_or(d, |m| m.max(d)));
            }
            Err(_) => skipped += 1,
        }
    }

    ContractionReport {
        max_abs_g_prime: max_abs,
        contractive: max_abs.map(|m| m < 1.0),
        evaluated: samples - skipped,
        skipped,
    }
}
