//! Orchestration response types.
//!
//! The [`OrchestrationResponse`] is the single shape every request resolves
//! to, whichever pipeline tier produced it. Field names serialize in
//! camelCase to match the gateway's wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::chat::ChatMessage;
use crate::domain::completion::Usage;
use crate::domain::service::{ServiceCallResult, ServiceKind};

/// A structured service-call instruction embedded in completion text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub service: ServiceKind,
    pub query: String,
    /// Narrative text shown ahead of the service payload in the reply.
    pub narrative_prefix: String,
}

/// A directive together with the result of dispatching it.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveResolution {
    pub directive: Directive,
    pub result: ServiceCallResult,
}

/// How the reply was produced, recorded in response metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessingMode {
    /// Primary pipeline, services consulted before the completion call.
    PreDispatch,
    /// Primary pipeline, completion-emitted directive drove dispatch.
    PostDispatch,
    /// Delegated wholesale to the external orchestrator.
    Delegated,
    /// Completion provider alone, no service dispatch.
    DirectModel,
    /// Static degraded-capability reply.
    StaticFallback,
}

/// Machine-readable metadata accompanying every reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Services named by the classifier or mentioned in the exchange.
    pub services_referenced: Vec<ServiceKind>,
    /// Services that contributed a successful payload to this reply.
    pub services_consulted: Vec<ServiceKind>,
    pub processing_mode: ProcessingMode,
    pub backend_data_included: bool,
}

/// The gateway's reply to one chat request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationResponse {
    pub id: String,
    pub message: ChatMessage,
    pub finish_reason: String,
    pub usage: Usage,
    pub metadata: ResponseMetadata,
    /// Assigned once, when the response is finalized.
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::MessageRole;

    #[test]
    fn response_serializes_camel_case() {
        let response = OrchestrationResponse {
            id: "chat_test".into(),
            message: ChatMessage {
                role: MessageRole::Assistant,
                content: "hello".into(),
            },
            finish_reason: "stop".into(),
            usage: Usage::new(3, 5),
            metadata: ResponseMetadata {
                services_referenced: vec![ServiceKind::Risk],
                services_consulted: vec![],
                processing_mode: ProcessingMode::DirectModel,
                backend_data_included: false,
            },
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["finishReason"], "stop");
        assert_eq!(json["usage"]["totalTokens"], 8);
        assert_eq!(json["metadata"]["processingMode"], "direct-model");
        assert_eq!(json["metadata"]["servicesReferenced"][0], "risk");
        assert_eq!(json["metadata"]["backendDataIncluded"], false);
    }
}
