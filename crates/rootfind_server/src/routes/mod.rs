//! Route modules for the rootfind server
//!
//! This module contains endpoint group-specific routers:
//! - solve: Single solver run
//! - compare: Several solvers on one problem
//! - bracket: Sign-change scan
//! - fixed: Contraction check and alpha suggestion
//! - health: Health check and monitoring endpoints

pub mod bracket;
pub mod compare;
pub mod fixed;
pub mod health;
pub mod solve;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use rootfind_core::compare::SolveConfig;
use rootfind_core::expr::Expression;
use rootfind_core::math::solvers::SolverConfig;
use rootfind_core::types::SolverError;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::ApiError;

/// Prefix shared by every solver endpoint
pub const API_PREFIX: &str = "/api/v1/root";

/// Tolerance when a request omits `tol`
pub const DEFAULT_TOL: f64 = 1e-8;

/// Iteration budget when a request omits `maxIter`
pub const DEFAULT_MAX_ITER: usize = 100;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create a new AppState
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self {
            config,
            start_time: std::time::Instant::now(),
        }
    }

    /// Solver settings for a request, capped by the configured limit.
    pub fn solver_config(&self, tol: f64, max_iter: usize) -> Result<SolverConfig, ApiError> {
        let limit = self.config.max_iterations_limit;
        if max_iter > limit {
            return Err(ApiError::BadRequest(format!(
                "maxIter {} exceeds the server limit of {}",
                max_iter, limit
            )));
        }
        Ok(SolverConfig::new(tol, max_iter)?)
    }
}

/// Build the main application router by merging all route modules
pub fn build_router(config: Arc<ServerConfig>) -> Router {
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let cors = if config.environment.is_development() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };
    let state = AppState::new(config);

    let api = Router::new()
        .merge(solve::routes())
        .merge(compare::routes())
        .merge(bracket::routes())
        .merge(fixed::routes());

    Router::new()
        .merge(health::routes())
        .nest(API_PREFIX, api)
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run CPU-bound engine work off the async runtime.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, SolverError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

/// Compile a function `f`; accepts the `A = B` equation form.
pub(crate) fn compile_f(text: &str) -> Result<Option<Expression>, ApiError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(Expression::compile_equation(text).map_err(SolverError::from)?))
}

/// Compile a fixed-point map `g`.
pub(crate) fn compile_g(text: &str) -> Result<Option<Expression>, ApiError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(Expression::compile(text).map_err(SolverError::from)?))
}

/// Reject a missing expression field.
pub(crate) fn required(expr: Option<Expression>, field: &str) -> Result<Expression, ApiError> {
    expr.ok_or_else(|| ApiError::BadRequest(format!("expression '{}' is required", field)))
}

/// Assemble the shared part of a solve or compare request.
pub(crate) fn problem(
    state: &AppState,
    f: &str,
    g: &str,
    x0: f64,
    tol: f64,
    max_iter: usize,
) -> Result<SolveConfig, ApiError> {
    let mut cfg = SolveConfig::new(x0);
    cfg.f = compile_f(f)?;
    cfg.g = compile_g(g)?;
    cfg.solver = state.solver_config(tol, max_iter)?;
    Ok(cfg)
}
