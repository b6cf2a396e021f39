//! External orchestrator (delegated fallback tier) port definition.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::chat::Transcript;
use crate::domain::completion::Usage;
use crate::domain::service::ServiceKind;

/// Errors from the delegated orchestrator boundary.
#[derive(Debug, Error)]
pub enum DelegateError {
    /// The orchestrator was reachable but rejected the call.
    #[error("delegate orchestrator returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Network-level failure: unreachable host or undecodable body.
    #[error("delegate transport error: {0}")]
    Transport(String),
}

/// Reply from the external orchestrator, already adapted to a shape the
/// pipeline can finalize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateReply {
    pub text: String,
    pub finish_reason: Option<String>,
    pub usage: Option<Usage>,
}

/// Port for delegating a whole transcript to an external orchestrator.
#[async_trait]
pub trait DelegateBackend: Send + Sync {
    /// Run the transcript through the external orchestrator.
    ///
    /// `capabilities` carries the classifier's candidate services as
    /// requested capability tags; `request_id` identifies the session for
    /// the orchestrator's own correlation.
    async fn delegate(
        &self,
        transcript: &Transcript,
        capabilities: &[ServiceKind],
        request_id: &str,
    ) -> Result<DelegateReply, DelegateError>;
}
