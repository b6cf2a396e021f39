//! Completion provider port definition.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::chat::Transcript;
use crate::domain::completion::{Completion, ModelTier};

/// Errors from the completion provider boundary.
///
/// No retry happens behind this port; retry and fallback are the pipeline's
/// responsibility, at tier granularity.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// No API credential is configured. Checked synchronously before any
    /// network attempt.
    #[error("completion provider is not configured (no API credential)")]
    Unconfigured,

    /// The provider was reachable but rejected the call.
    #[error("completion provider returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Network-level failure: unreachable host or malformed response.
    #[error("completion transport error: {0}")]
    Transport(String),
}

/// Port for a single text-completion call.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Complete the transcript under the given system directive, using the
    /// model configured for `tier`.
    async fn complete(
        &self,
        transcript: &Transcript,
        system_prompt: &str,
        tier: ModelTier,
    ) -> Result<Completion, CompletionError>;
}
