//! Terminal snapshot of a solver run.

use serde::Serialize;

use crate::types::DomainError;

/// Terminal state of a solver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Termination {
    /// Residual or step criterion met.
    Converged,
    /// Iteration budget exhausted.
    MaxIterExceeded,
    /// Iteration broke down: undefined value, zero derivative, runaway iterates.
    Diverged,
}

/// Outcome of a single solver run.
///
/// `residual_f` is `f(root)` (NaN when undefined there, serialised as `null`);
/// `delta` is the last accepted step `|x_k - x_{k-1}|`, or 0 if no step was
/// taken. `trace` holds `x_0..x_k`, so `trace.len() == iterations + 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveResult {
    /// Final iterate
    pub root: f64,
    /// `f(root)`
    pub residual_f: f64,
    /// Last accepted step
    pub delta: f64,
    /// True only for [`Termination::Converged`]
    pub converged: bool,
    /// Steps taken
    pub iterations: usize,
    /// Every iterate from `x0` on
    pub trace: Vec<f64>,
    /// Why the run stopped short of convergence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// How the run ended
    #[serde(skip)]
    pub termination: Termination,
}

/// Append-only iterate log shared by every solver.
#[derive(Debug)]
pub(crate) struct Iterates {
    trace: Vec<f64>,
    delta: f64,
}

impl Iterates {
    pub fn start(x0: f64, max_iterations: usize) -> Self {
        let mut trace = Vec::with_capacity(max_iterations.saturating_add(1).min(1024));
        trace.push(x0);
        Self { trace, delta: 0.0 }
    }

    pub fn last(&self) -> f64 {
        self.trace[self.trace.len() - 1]
    }

    pub fn iterations(&self) -> usize {
        self.trace.len() - 1
    }

    /// Record the next iterate; returns the step size.
    pub fn accept(&mut self, x: f64) -> f64 {
        let step = (x - self.last()).abs();
        self.trace.push(x);
        self.delta = step;
        step
    }

    pub fn finish(self, termination: Termination, message: Option<String>, residual_f: f64) -> SolveResult {
        let root = self.last();
        SolveResult {
            root,
            residual_f,
            delta: self.delta,
            converged: termination == Termination::Converged,
            iterations: self.trace.len() - 1,
            trace: self.trace,
            message,
            termination,
        }
    }

    pub fn converged(self, residual_f: f64) -> SolveResult {
        self.finish(Termination::Converged, None, residual_f)
    }

    pub fn diverged(self, reason: impl Into<String>, residual_f: f64) -> SolveResult {
        self.finish(Termination::Diverged, Some(reason.into()), residual_f)
    }

    /// Diverged because the function is undefined at the current iterate.
    pub fn undefined(self, e: DomainError) -> SolveResult {
        self.diverged(undefined_message(&e), f64::NAN)
    }

    pub fn exhausted(self, max_iterations: usize, residual_f: f64) -> SolveResult {
        self.finish(
            Termination::MaxIterExceeded,
            Some(format!(
                "maximum iterations ({}) reached without convergence",
                max_iterations
            )),
            residual_f,
        )
    }
}

pub(crate) fn undefined_message(e: &DomainError) -> String {
    format!("function undefined at x = {}: {}", e.x(), e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iterates_track_last_step() {
        let mut it = Iterates::start(1.0, 10);
        assert_eq!(it.iterations(), 0);
        assert_eq!(it.accept(1.5), 0.5);
        assert_eq!(it.accept(1.25), 0.25);
        assert_eq!(it.iterations(), 2);

        let result = it.converged(0.0);
        assert_eq!(result.root, 1.25);
        assert_eq!(result.delta, 0.25);
        assert_eq!(result.trace, vec![1.0, 1.5, 1.25]);
        assert!(result.converged);
        assert!(result.message.is_none());
    }

    #[test]
    fn test_no_step_has_zero_delta() {
        let result = Iterates::start(2.0, 10).converged(0.0);
        assert_eq!(result.delta, 0.0);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_exhausted_message() {
        let result = Iterates::start(0.0, 3).exhausted(3, 1.0);
        assert!(!result.converged);
        assert_eq!(result.termination, Termination::MaxIterExceeded);
        assert!(result.message.unwrap().contains("maximum iterations (3)"));
    }

    #[test]
    fn test_serialises_wire_names() {
        let result = Iterates::start(0.5, 1).diverged("zero or undefined derivative", f64::NAN);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["residualF"], serde_json::Value::Null);
        assert_eq!(json["message"], "zero or undefined derivative");
        assert_eq!(json["converged"], false);
        assert!(json.get("termination").is_none());
    }

    #[test]
    fn test_undefined_message() {
        let result = Iterates::start(0.0, 1).undefined(DomainError::DivisionByZero { x: 0.0 });
        assert!(result.residual_f.is_nan());
        assert!(result
            .message
            .unwrap()
            .starts_with("function undefined at x = 0"));
    }

    #[test]
    fn test_message_omitted_when_converged() {
        let json = serde_json::to_value(Iterates::start(0.5, 1).converged(0.0)).unwrap();
        assert!(json.get("message").is_none());
    }
}
