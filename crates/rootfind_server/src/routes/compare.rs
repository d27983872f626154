//! Method comparison endpoint
//!
//! `POST /api/v1/root/compare` runs several methods on one problem and
//! returns one summary row per distinct method, in request order.

use axum::{extract::State, response::Json, routing::post, Router};
use rootfind_core::compare::{compare, CompareRow, Method};
use serde::Deserialize;

use super::{problem, run_blocking, AppState, DEFAULT_MAX_ITER, DEFAULT_TOL};
use crate::error::{ApiError, ApiJson};

/// Compare request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompareRequest {
    /// Method names, in output order
    pub methods: Vec<String>,
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
    /// Iteration budget per method
    pub max_iter: usize,
}

impl Default for CompareRequest {
    fn default() -> Self {
        Self {
            methods: Vec::new(),
            f: String::new(),
            g: String::new(),
            x0: 0.0,
            x1: 0.0,
            tol: DEFAULT_TOL,
            max_iter: DEFAULT_MAX_ITER,
        }
    }
}

/// Build the compare routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/compare", post(compare_handler))
}

/// POST /compare
async fn compare_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CompareRequest>,
) -> Result<Json<Vec<CompareRow>>, ApiError> {
    let methods = req
        .methods
        .iter()
        .map(|m| m.trim().parse::<Method>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut cfg = problem(&state, &req.f, &req.g, req.x0, req.tol, req.max_iter)?;
    cfg.x1 = req.x1;

    let rows = run_blocking(move || compare(&methods, &cfg)).await?;

    tracing::info!(
        methods = rows.len(),
        converged = rows.iter().filter(|r| r.converged).count(),
        "compare finished"
    );

    Ok(Json(rows))
}
