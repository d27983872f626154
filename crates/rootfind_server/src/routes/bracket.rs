//! Bracket scan endpoint

use axum::{response::Json, routing::post, Router};
use rootfind_core::analysis::{bracket, BracketScan};
use serde::Deserialize;

use super::{compile_f, required, run_blocking, AppState};
use crate::error::{ApiError, ApiJson};

/// Bracket request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BracketRequest {
    /// Function to scan; `A=B` is read as `(A)-(B)`
    pub f: String,
    /// Left end
    pub a: f64,
    /// Right end
    pub b: f64,
    /// Number of grid cells
    pub steps: usize,
}

impl Default for BracketRequest {
    fn default() -> Self {
        Self {
            f: String::new(),
            a: 0.0,
            b: 0.0,
            steps: 500,
        }
    }
}

/// Build the bracket routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/bracket", post(bracket_handler))
}

/// POST /bracket
///
/// Samples `f` on `steps + 1` evenly spaced points of `[a, b]` and reports
/// every adjacent pair with a sign change.
async fn bracket_handler(ApiJson(req): ApiJson<BracketRequest>) -> Result<Json<BracketScan>, ApiError> {
    let f = required(compile_f(&req.f)?, "f")?;
    let (a, b, steps) = (req.a, req.b, req.steps);

    let scan = run_blocking(move || bracket(&f, a, b, steps)).await?;

    tracing::info!(
        steps,
        intervals = scan.intervals.len(),
        gaps = scan.gaps,
        "bracket scan finished"
    );

    Ok(Json(scan))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{post_json, router};
    use axum::http::StatusCode;
    use serde_json::json;

    const URI: &str = "/api/v1/root/bracket";

    #[tokio::test]
    async fn test_sqrt2_bracket() {
        let (status, body) = post_json(
            router(),
            URI,
            json!({"f": "x^2 - 2", "a": 0.0, "b": 2.0, "steps": 4}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["samples"].as_array().unwrap().len(), 5);
        assert_eq!(
            body["intervals"],
            json!([{"a": 1.0, "b": 1.5, "fa": -1.0, "fb": 0.25}])
        );
        assert!(body.get("gaps").is_none());
    }

    #[tokio::test]
    async fn test_intervals_sorted_and_signed() {
        let (status, body) = post_json(
            router(),
            URI,
            json!({"f": "sin(x)", "a": -6.9, "b": 7.1}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let intervals = body["intervals"].as_array().unwrap();
        assert_eq!(intervals.len(), 5);
        assert_eq!(body["samples"].as_array().unwrap().len(), 501);

        let mut previous = f64::NEG_INFINITY;
        for iv in intervals {
            let fa = iv["fa"].as_f64().unwrap();
            let fb = iv["fb"].as_f64().unwrap();
            assert!(fa * fb <= 0.0);
            let a = iv["a"].as_f64().unwrap();
            assert!(a > previous);
            previous = a;
        }
    }

    #[tokio::test]
    async fn test_reversed_interval_returns_400() {
        let (status, body) = post_json(
            router(),
            URI,
            json!({"f": "x", "a": 1.0, "b": -1.0, "steps": 10}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid range"));
    }

    #[tokio::test]
    async fn test_zero_steps_returns_400() {
        let (status, _) = post_json(
            router(),
            URI,
            json!({"f": "x", "a": -1.0, "b": 1.0, "steps": 0}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_f_returns_400() {
        let (status, body) = post_json(router(), URI, json!({"a": -1.0, "b": 1.0})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "expression 'f' is required");
    }

    #[tokio::test]
    async fn test_overlong_f_returns_400() {
        let f = format!("{}x", "x+".repeat(500_000));
        let (status, body) = post_json(router(), URI, json!({"f": f, "a": -1.0, "b": 1.0})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("expression too long"));
    }
}
