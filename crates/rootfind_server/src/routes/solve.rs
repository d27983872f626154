//! Single solver run endpoint
//!
//! `POST /api/v1/root/solve` runs one method and returns its full result,
//! including the iterate trace.

use axum::{extract::State, response::Json, routing::post, Router};
use rootfind_core::compare::Method;
use rootfind_core::math::solvers::{DerivativeMode, SolveResult};
use serde::Deserialize;

use super::{problem, run_blocking, AppState, DEFAULT_MAX_ITER, DEFAULT_TOL};
use crate::error::{ApiError, ApiJson};

/// Solve request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolveRequest {
    /// `newton`, `fixed`, `bisection` or `secant`
    pub method: String,
    /// Target function; `A=B` is read as `(A)-(B)`
    pub f: String,
    /// Fixed-point map
    pub g: String,
    /// Initial point
    pub x0: f64,
    /// Second seed or bracket end
    pub x1: f64,
    /// Convergence tolerance
    pub tol: f64,
    /// Iteration budget
    pub max_iter: usize,
    /// Use the central difference instead of the exact derivative
    pub use_num_der: bool,
    /// Fixed-point relaxation factor
    pub relax: f64,
}

impl Default for SolveRequest {
    fn default() -> Self {
        Self {
            method: "newton".to_string(),
            f: String::new(),
            g: String::new(),
            x0: 0.0,
            x1: 0.0,
            tol: DEFAULT_TOL,
            max_iter: DEFAULT_MAX_ITER,
            use_num_der: false,
            relax: 1.0,
        }
    }
}

/// Build the solve routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/solve", post(solve_handler))
}

/// POST /solve
async fn solve_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SolveRequest>,
) -> Result<Json<SolveResult>, ApiError> {
    let method: Method = req.method.trim().parse()?;

    let mut cfg = problem(&state, &req.f, &req.g, req.x0, req.tol, req.max_iter)?;
    cfg.x1 = req.x1;
    cfg.relax = req.relax;
    if req.use_num_der {
        cfg.derivative = DerivativeMode::Numeric { step: None };
    }
    cfg.check_methods(&[method])?;

    let result = run_blocking(move || method.run(&cfg)).await?;

    tracing::info!(
        method = %method,
        iterations = result.iterations,
        converged = result.converged,
        root = result.root,
        "solve finished"
    );

    Ok(Json(result))
}
