//! Backend analysis service client.
//!
//! Sends the query to a registered service endpoint and returns its payload
//! opaque, as JSON. The dispatcher supplies the per-call time bound; the
//! client only guards against an unbounded hang.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use gantry_core::domain::service::ServiceEndpoint;
use gantry_core::ports::analysis::{AnalysisBackend, AnalysisError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How much of an upstream error body to keep in the outcome reason.
const ERROR_BODY_LIMIT: usize = 200;

/// Production client for backend analysis services.
pub struct HttpAnalysisClient {
    client: reqwest::Client,
}

impl HttpAnalysisClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to create HTTP client");

        Self { client }
    }
}

impl Default for HttpAnalysisClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest<'a> {
    query: &'a str,
    context: AnalyzeContext<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeContext<'a> {
    source: &'static str,
    request_id: &'a str,
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisClient {
    async fn analyze(
        &self,
        endpoint: &ServiceEndpoint,
        query: &str,
        request_id: &str,
    ) -> Result<serde_json::Value, AnalysisError> {
        let url = format!("{}/analyze", endpoint.base_url);
        let request = AnalyzeRequest {
            query,
            context: AnalyzeContext {
                source: "gantry",
                request_id,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                message: truncate_reason(&body),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AnalysisError::Transport(e.to_string()))
    }
}

/// Keep upstream error bodies short enough for logs and outcome reasons.
fn truncate_reason(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "service rejected the call".to_string();
    }
    match trimmed.char_indices().nth(ERROR_BODY_LIMIT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
