//! Health check handler.

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

/// Health check payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub env: HealthEnv,
}

/// Configuration summary, without echoing any secret.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthEnv {
    pub completion_configured: bool,
    pub delegate_configured: bool,
    pub services_registered: usize,
}

/// Liveness plus a summary of what is configured.
///
/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        env: HealthEnv {
            completion_configured: state.config.completion.api_key.is_some(),
            delegate_configured: state.config.delegate.is_some(),
            services_registered: state.config.services.len(),
        },
    })
}
