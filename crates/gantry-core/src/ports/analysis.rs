//! Backend analysis service port definition.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::service::ServiceEndpoint;

/// Errors from one backend analysis call.
///
/// The dispatcher converts these (and its own timeout) into
/// [`ServiceCallOutcome`](crate::domain::service::ServiceCallOutcome)
/// variants; they never propagate further.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The service answered with a non-success status.
    #[error("service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Network-level failure: unreachable host or undecodable body.
    #[error("service transport error: {0}")]
    Transport(String),
}

/// Port for querying one backend analysis service.
///
/// The payload schema is opaque to the gateway beyond being serializable
/// for inclusion in synthesized text.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze(
        &self,
        endpoint: &ServiceEndpoint,
        query: &str,
        request_id: &str,
    ) -> Result<serde_json::Value, AnalysisError>;
}
