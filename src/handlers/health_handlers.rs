//! Health & readiness handlers.
//!
//! - GET /healthz  -> simple liveness ("ok")
//! - GET /readyz   -> readiness that checks bucket connectivity

use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::warn;

/// `GET /healthz`
///
/// Very small liveness probe — always returns 200 OK with a plain JSON body.
/// This endpoint should be cheap and never perform I/O.
pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".into(),
        }),
    )
}

/// `GET /readyz`
///
/// Readiness probe that requests a single-object listing from the bucket.
/// HTTP 200 when the bucket answers, HTTP 503 otherwise, with the failure
/// reason in the JSON body.
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let bucket_check = match state.store.list(None, None, 1).await {
        Ok(_) => CheckStatus {
            ok: true,
            error: None,
        },
        Err(err) => {
            warn!("readiness probe failed: {}", err);
            CheckStatus {
                ok: false,
                error: Some(err.to_string()),
            }
        }
    };

    let overall_ok = bucket_check.ok;
    let body = ReadyResponse {
        status: if overall_ok {
            "ok".into()
        } else {
            "error".into()
        },
        bucket: bucket_check,
    };

    let status = if overall_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
struct ReadyResponse {
    status: String,
    bucket: CheckStatus,
}

#[derive(Serialize)]
struct CheckStatus {
    ok: bool,
    error: Option<String>,
}
