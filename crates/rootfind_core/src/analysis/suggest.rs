//! Start-point and relaxation suggestion for `g(x) = x - alpha * f(x)`.

use serde::Serialize;

use super::contraction::sample;
use crate::expr::Expression;
use crate::math::differentiate::{central_difference, default_step};
use crate::types::SolverError;

/// A contractive neighbourhood of the seed and a start point inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SuggestionReport {
    /// Recommended start point, `lo <= suggest <= hi`
    pub suggest: f64,
    /// Lower edge of the contractive region
    pub lo: f64,
    /// Upper edge of the contractive region
    pub hi: f64,
    /// Selected `alpha`
    pub alpha: f64,
}

/// Search budget for [`suggest_with`].
///
/// Every field is a hard bound, so a search performs a bounded number of
/// evaluations regardless of `f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuggestConfig {
    /// `r0 = initial_radius * max(1, |x0|)`
    pub initial_radius: f64,
    /// Slopes are taken at `x0 ± r0 * 2^k` for `k < slope_offsets`
    pub slope_offsets: u32,
    /// Doublings of the radius per side
    pub max_expansions: usize,
    /// Bisection steps locating the edge inside the first failing shell
    pub refine_steps: usize,
    /// Samples per probed shell
    pub probe_samples: usize,
    /// Interior grid points considered for `suggest`
    pub suggest_samples: usize,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            initial_radius: 1e-3,
            slope_offsets: 8,
            max_expansions: 40,
            refine_steps: 30,
            probe_samples: 16,
            suggest_samples: 64,
        }
    }
}

/// Suggest `alpha` and a start point for fixed-point iteration on `f`.
///
/// See [`suggest_with`].
///
/// # Example
///
/// ```
/// use rootfind_core::analysis::suggest;
/// use rootfind_core::expr::Expression;
///
/// let f = Expression::compile("x^2 - 2").unwrap();
/// let report = suggest(&f, 1.0).unwrap();
///
/// assert_eq!(report.alpha, 0.5);
/// assert!(report.lo < 1.0 && 1.0 < report.hi);
/// ```
pub fn suggest(f: &Expression, x0: f64) -> Result<SuggestionReport, SolverError> {
    suggest_with(f, x0, &SuggestConfig::default())
}

/// Suggest `alpha` and a start point under an explicit search budget.
///
/// For each candidate slope `s` of `f` near `x0`, `alpha` is tried as `1/s`
/// then `0.5/s`. The first `alpha` whose map is contractive around `x0` is
/// kept; the region is grown outward on each side by doubling, and the
/// first failing shell is narrowed by bisection. `suggest` is the sampled
/// point of the region with the smallest `|g'|`, preferring `x0` on ties.
///
/// # Errors
///
/// - [`SolverError::InvalidRange`] for a non-finite `x0`
/// - [`SolverError::NoStableRegion`] when no candidate `alpha` is
///   contractive near `x0`
pub fn suggest_with(
    f: &Expression,
    x0: f64,
    config: &SuggestConfig,
) -> Result<SuggestionReport, SolverError> {
    if !x0.is_finite() {
        return Err(SolverError::invalid_range(format!(
            "x0 must be finite, got {}",
            x0
        )));
    }

    let r0 = config.initial_radius * x0.abs().max(1.0);

    for slope in candidate_slopes(f, x0, r0, config) {
        for scale in [1.0, 0.5] {
            let alpha = scale / slope;
            if !alpha.is_finite() {
                continue;
            }
            let g = f.fixed_point_map(alpha);
            if let Some((lo, hi)) = stable_region(&g, x0, r0, config) {
                return Ok(SuggestionReport {
                    suggest: best_start(&g, x0, lo, hi, config.suggest_samples),
                    lo,
                    hi,
                    alpha,
                });
            }
        }
    }

    Err(SolverError::NoStableRegion { x0 })
}

/// Non-zero slopes of `f` at `x0`, then at `x0 ± r0 * 2^k`.
fn candidate_slopes(f: &Expression, x0: f64, r0: f64, config: &SuggestConfig) -> Vec<f64> {
    let mut points = vec![x0];
    for k in 0..config.slope_offsets {
        let offset = r0 * 2f64.powi(k as i32);
        points.push(x0 + offset);
        points.push(x0 - offset);
    }

    points
        .into_iter()
        .filter_map(|x| {
            f.derivative(x)
                .or_else(|_| central_difference(f, x, default_step(x)))
                .ok()
        })
        .filter(|s| *s != 0.0)
        .collect()
}

fn stable_region(g: &Expression, x0: f64, r0: f64, config: &SuggestConfig) -> Option<(f64, f64)> {
    if !stable(g, x0 - r0, x0 + r0, config.probe_samples) {
        return None;
    }
    let below = expand(g, x0, r0, -1.0, config);
    let above = expand(g, x0, r0, 1.0, config);
    Some((x0 - below, x0 + above))
}

/// Contractive at every sample, with no undefined points.
fn stable(g: &Expression, lo: f64, hi: f64, samples: usize) -> bool {
    let report = sample(g, lo, hi, samples);
    report.skipped == 0 && report.is_contractive()
}

/// Largest radius on one side of `x0` over which `g` stays contractive.
fn expand(g: &Expression, x0: f64, r0: f64, direction: f64, config: &SuggestConfig) -> f64 {
    let shell_ok = |from: f64, to: f64| {
        let p = x0 + direction * from;
        let q = x0 + direction * to;
        if !q.is_finite() {
            return false;
        }
        stable(g, p.min(q), p.max(q), config.probe_samples)
    };

    let mut good = r0;
    for _ in 0..config.max_expansions {
        let next = good * 2.0;
        if shell_ok(good, next) {
            good = next;
            continue;
        }

        let mut bad = next;
        for _ in 0..config.refine_steps {
            let mid = 0.5 * (good + bad);
            if shell_ok(good, mid) {
                good = mid;
            } else {
                bad = mid;
            }
        }
        break;
    }
    good
}

fn best_start(g: &Expression, x0: f64, lo: f64, hi: f64, interior: usize) -> f64 {
    let abs_slope = |x: f64| {
        central_difference(g, x, default_step(x))
            .map(f64::abs)
            .unwrap_or(f64::INFINITY)
    };

    let n = interior as f64 + 1.0;
    let grid = (1..=interior).map(|i| lo + (hi - lo) * (i as f64) / n);

    let mut best = (x0, abs_slope(x0));
    for x in grid {
        let s = abs_slope(x);
        if s < best.1 {
            best = (x, s);
        }
    }
    best.0
}
