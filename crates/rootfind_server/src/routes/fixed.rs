//! Fixed-point diagnostics endpoints
//!
//! - `POST /api/v1/root/fixed/check`: sampled `max |g'|` over an interval
//! - `POST /api/v1/root/fixed/suggest-alpha`: relaxation `alpha` for
//!   `g(x) = x - alpha * f(x)` with a contractive region and start point

use axum::{response::Json, routing::post, Router};
use rootfind_core::analysis::{check, suggest, ContractionReport, SuggestionReport};
use serde::Deserialize;

use super::{compile_f, compile_g, required, run_blocking, AppState};
use crate::error::{ApiError, ApiJson};

/// Contraction check request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckRequest {
    /// Fixed-point map
    pub g: String,
    /// One end of the interval
    pub a: f64,
    /// Other end of the interval
    pub b: f64,
    /// Number of sample points
    pub samples: usize,
}

impl Default for CheckRequest {
    fn default() -> Self {
        Self {
            g: String::new(),
            a: 0.0,
            b: 0.0,
            samples: 300,
        }
    }
}

/// Alpha suggestion request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SuggestRequest {
    /// Target function; `A=B` is read as `(A)-(B)`
    pub f: String,
    /// Seed point
    pub x0: f64,
}

/// Build the fixed-point routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fixed/check", post(check_handler))
        .route("/fixed/suggest-alpha", post(suggest_handler))
}

/// POST /fixed/check
async fn check_handler(
    ApiJson(req): ApiJson<CheckRequest>,
) -> Result<Json<ContractionReport>, ApiError> {
    let g = required(compile_g(&req.g)?, "g")?;
    let (a, b, samples) = (req.a, req.b, req.samples);

    let report = run_blocking(move || check(&g, a, b, samples)).await?;

    tracing::info!(
        samples,
        skipped = report.skipped,
        max_abs_g_prime = ?report.max_abs_g_prime,
        contractive = ?report.contractive,
        "contraction check finished"
    );

    Ok(Json(report))
}

/// POST /fixed/suggest-alpha
async fn suggest_handler(
    ApiJson(req): ApiJson<SuggestRequest>,
) -> Result<Json<SuggestionReport>, ApiError> {
    let f = required(compile_f(&req.f)?, "f")?;
    let x0 = req.x0;

    let report = run_blocking(move || suggest(&f, x0)).await?;

    tracing::info!(
        x0,
        alpha = report.alpha,
        suggest = report.suggest,
        lo = report.lo,
        hi = report.hi,
        "alpha suggestion finished"
    );

    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{post_json, router};
    use approx::assert_relative_eq;
    use axum::http::StatusCode;
    use serde_json::json;

    const CHECK: &str = "/api/v1/root/fixed/check";
    const SUGGEST: &str = "/api/v1/root/fixed/suggest-alpha";

    #[tokio::test]
    async fn test_check_cos_is_contractive() {
        let (status, body) = post_json(
            router(),
            CHECK,
            json!({"g": "cos(x)", "a": 0.0, "b": 1.0, "samples": 300}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["contractive"], true);
        assert_relative_eq!(
            body["maxAbsGPrime"].as_f64().unwrap(),
            1f64.sin(),
            epsilon = 1e-6
        );
    }

    #[tokio::test]
    async fn test_check_doubling_is_not_contractive() {
        let (status, body) = post_json(
            router(),
            CHECK,
            json!({"g": "2*x", "a": -3.0, "b": 7.0}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["contractive"], false);
        assert_relative_eq!(body["maxAbsGPrime"].as_f64().unwrap(), 2.0, epsilon = 1e-8);
    }

    #[tokio::test]
    async fn test_check_fully_undefined_is_null() {
        let (status, body) = post_json(
            router(),
            CHECK,
            json!({"g": "log(x)", "a": -2.0, "b": -1.0, "samples": 10}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["maxAbsGPrime"].is_null());
        assert!(body["contractive"].is_null());
    }

    #[tokio::test]
    async fn test_check_equal_bounds_returns_400() {
        let (status, _) = post_json(router(), CHECK, json!({"g": "cos(x)", "a": 1.0, "b": 1.0})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_suggest_sqrt2() {
        let (status, body) = post_json(router(), SUGGEST, json!({"f": "x^2 - 2", "x0": 1.0})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["alpha"], 0.5);
        assert_eq!(body["suggest"], 1.0);
        let lo = body["lo"].as_f64().unwrap();
        let hi = body["hi"].as_f64().unwrap();
        assert!(lo < 1.0 && 1.0 < hi);
    }

    #[tokio::test]
    async fn test_suggest_equation_form() {
        let (status, body) = post_json(router(), SUGGEST, json!({"f": "exp(x) = 2", "x0": 0.0})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["alpha"], 1.0);
    }

    #[tokio::test]
    async fn test_suggest_no_stable_region_returns_422() {
        let (status, body) = post_json(router(), SUGGEST, json!({"f": "x^2 + 1", "x0": 0.0})).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("No stable region"));
    }
}
