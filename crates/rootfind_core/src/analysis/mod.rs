//! Diagnostics that run ahead of, or alongside, the solvers.
//!
//! - [`bracket()`]: sign-change scan on a uniform grid
//! - [`check()`]: sampled `|g'| < 1` test for a fixed-point map
//! - [`suggest()`]: `alpha` and start point for `g(x) = x - alpha * f(x)`

mod bracket;
mod contraction;
mod suggest;

pub use bracket::{bracket, BracketScan, Interval, Point, MAX_BRACKET_STEPS};
pub use contraction::{check, ContractionReport, MAX_CONTRACTION_SAMPLES};
pub use suggest::{suggest, suggest_with, SuggestConfig, SuggestionReport};
