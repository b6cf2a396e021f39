//! The orchestration pipeline and its fallback ladder.
//!
//! One request flows through classify/dispatch/complete/synthesize in the
//! configured order, then down an explicit ladder of strategies when a tier
//! fails: primary pipeline, delegated orchestrator, direct model call, and
//! finally a static degraded reply. Dependency failures are converted to
//! typed outcomes at their own boundary; the only error a caller can see is
//! a [`ClientError`] for a malformed request, raised before the ladder.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::classifier;
use crate::config::{DispatchMode, GatewayConfig};
use crate::directive;
use crate::domain::chat::{ChatMessage, MessageRole, Transcript};
use crate::domain::completion::{ModelTier, Usage};
use crate::domain::orchestration::{
    DirectiveResolution, OrchestrationResponse, ProcessingMode, ResponseMetadata,
};
use crate::domain::service::{ServiceCallOutcome, ServiceCallResult, ServiceKind};
use crate::ports::completion::{CompletionBackend, CompletionError};
use crate::ports::delegate::{DelegateBackend, DelegateError};
use crate::services::dispatch::ServiceDispatcher;
use crate::services::synthesize::{Synthesis, synthesize};

const SYSTEM_PROMPT_BASE: &str = "You are the assistant for a construction project team. \
Answer precisely and keep to what the project data supports.";

const PRE_DISPATCH_GUIDANCE: &str = "Reference data retrieved from the project analysis \
services is included below. Ground your answer in it, and say so when the data you need \
is not present.";

const POST_DISPATCH_GUIDANCE: &str = "When the answer needs live project data, reply with \
a single JSON object on its own line: {\"action\":\"call_service\",\"service\":\
\"<compliance|risk|hse|qaqc|schedule|budget>\",\"query\":\"<what to ask the service>\",\
\"response_prefix\":\"<one sentence to show before the data>\"}. Otherwise answer directly.";

const DEGRADED_NOTICE: &str = "I'm currently running with reduced capability and can't \
reach the project analysis services. I can still help in general terms; please try again \
shortly for live project data.";

/// Bad request shape, rejected before the fallback ladder.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("request must include a non-empty transcript")]
    EmptyTranscript,

    #[error("transcript contains no user message")]
    NoActiveQuery,
}

/// Why a fallback tier failed. Logged between tiers, never surfaced.
#[derive(Debug, Error)]
enum TierError {
    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Delegate(#[from] DelegateError),
}

/// Top-level coordinator for one chat request.
pub struct OrchestrationPipeline {
    config: Arc<GatewayConfig>,
    dispatcher: ServiceDispatcher,
    completion: Arc<dyn CompletionBackend>,
    delegate: Option<Arc<dyn DelegateBackend>>,
}

impl OrchestrationPipeline {
    pub fn new(
        config: Arc<GatewayConfig>,
        dispatcher: ServiceDispatcher,
        completion: Arc<dyn CompletionBackend>,
        delegate: Option<Arc<dyn DelegateBackend>>,
    ) -> Self {
        Self {
            config,
            dispatcher,
            completion,
            delegate,
        }
    }

    /// Handle one chat request.
    ///
    /// Always resolves to a well-formed response once the transcript passes
    /// validation; every tier failure falls through to the next strategy and
    /// the last strategy cannot fail.
    pub async fn handle_chat(
        &self,
        transcript: &Transcript,
    ) -> Result<OrchestrationResponse, ClientError> {
        if transcript.is_empty() {
            return Err(ClientError::EmptyTranscript);
        }
        let query = transcript
            .active_query()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or(ClientError::NoActiveQuery)?;

        let request_id = format!("chat_{}", Uuid::new_v4());

        match self.attempt_primary(transcript, query, &request_id).await {
            Ok(response) => return Ok(response),
            Err(err) => tracing::warn!(
                target: "gantry.pipeline",
                request_id = %request_id,
                tier = "primary",
                error = %err,
                "tier failed, falling back"
            ),
        }

        if let Some(delegate) = &self.delegate {
            match self
                .attempt_delegate(delegate.as_ref(), transcript, query, &request_id)
                .await
            {
                Ok(response) => return Ok(response),
                Err(err) => tracing::warn!(
                    target: "gantry.pipeline",
                    request_id = %request_id,
                    tier = "delegate",
                    error = %err,
                    "tier failed, falling back"
                ),
            }
        }

        match self.attempt_direct(transcript, query, &request_id).await {
            Ok(response) => return Ok(response),
            Err(err) => tracing::warn!(
                target: "gantry.pipeline",
                request_id = %request_id,
                tier = "direct",
                error = %err,
                "tier failed, using static reply"
            ),
        }

        Ok(self.static_reply(&request_id, query))
    }

    /// Tier 1: the full pipeline in the configured dispatch mode.
    async fn attempt_primary(
        &self,
        transcript: &Transcript,
        query: &str,
        request_id: &str,
    ) -> Result<OrchestrationResponse, TierError> {
        match self.config.dispatch_mode {
            DispatchMode::PreDispatch => self.run_pre_dispatch(transcript, query, request_id).await,
            DispatchMode::PostDispatch => {
                self.run_post_dispatch(transcript, query, request_id).await
            }
        }
    }

    /// Classify, fetch service data, then have the model narrate it.
    async fn run_pre_dispatch(
        &self,
        transcript: &Transcript,
        query: &str,
        request_id: &str,
    ) -> Result<OrchestrationResponse, TierError> {
        let classified = classifier::classify(query);
        let results = self
            .dispatcher
            .dispatch(&classified, query, request_id)
            .await;

        let has_data = results.iter().any(ServiceCallResult::is_success);
        let tier = if has_data {
            ModelTier::Reasoning
        } else {
            ModelTier::Fast
        };
        let system_prompt = pre_dispatch_prompt(&results);

        let completion = self
            .completion
            .complete(transcript, &system_prompt, tier)
            .await?;

        let synthesis = synthesize(&completion.text, None, &results, &classified, query);
        Ok(self.finalize(
            request_id,
            synthesis,
            completion.finish_reason,
            completion.usage,
            ProcessingMode::PreDispatch,
        ))
    }

    /// Call the model first; dispatch only if it emits a directive.
    async fn run_post_dispatch(
        &self,
        transcript: &Transcript,
        query: &str,
        request_id: &str,
    ) -> Result<OrchestrationResponse, TierError> {
        let classified = classifier::classify(query);
        let system_prompt = format!("{SYSTEM_PROMPT_BASE}\n\n{POST_DISPATCH_GUIDANCE}");

        let completion = self
            .completion
            .complete(transcript, &system_prompt, ModelTier::Fast)
            .await?;

        let synthesis = match directive::parse(&completion.text) {
            Some(parsed) => {
                let service = parsed.service;
                let mut batch = self
                    .dispatcher
                    .dispatch(&[service], &parsed.query, request_id)
                    .await;
                let result = batch.pop().unwrap_or(ServiceCallResult {
                    service,
                    outcome: ServiceCallOutcome::Unavailable,
                });

                let narrative = directive::strip(&completion.text);
                let resolution = DirectiveResolution {
                    directive: parsed,
                    result,
                };
                synthesize(&narrative, Some(&resolution), &[], &classified, query)
            }
            None => synthesize(&completion.text, None, &[], &classified, query),
        };

        Ok(self.finalize(
            request_id,
            synthesis,
            completion.finish_reason,
            completion.usage,
            ProcessingMode::PostDispatch,
        ))
    }

    /// Tier 2: hand the whole transcript to the external orchestrator.
    async fn attempt_delegate(
        &self,
        delegate: &dyn DelegateBackend,
        transcript: &Transcript,
        query: &str,
        request_id: &str,
    ) -> Result<OrchestrationResponse, TierError> {
        let classified = classifier::classify(query);
        let reply = delegate
            .delegate(transcript, &classified, request_id)
            .await?;

        let synthesis = synthesize(&reply.text, None, &[], &classified, query);
        Ok(self.finalize(
            request_id,
            synthesis,
            reply.finish_reason.unwrap_or_else(|| "stop".to_string()),
            reply.usage.unwrap_or_default(),
            ProcessingMode::Delegated,
        ))
    }

    /// Tier 3: completion provider alone, no service dispatch.
    async fn attempt_direct(
        &self,
        transcript: &Transcript,
        query: &str,
        request_id: &str,
    ) -> Result<OrchestrationResponse, TierError> {
        let completion = self
            .completion
            .complete(transcript, SYSTEM_PROMPT_BASE, ModelTier::Fast)
            .await?;

        let classified = classifier::classify(query);
        let synthesis = synthesize(&completion.text, None, &[], &classified, query);
        Ok(self.finalize(
            request_id,
            synthesis,
            completion.finish_reason,
            completion.usage,
            ProcessingMode::DirectModel,
        ))
    }

    /// Tier 4: static degraded reply. Cannot fail.
    fn static_reply(&self, request_id: &str, query: &str) -> OrchestrationResponse {
        let classified = classifier::classify(query);
        let synthesis = synthesize(DEGRADED_NOTICE, None, &[], &classified, query);
        self.finalize(
            request_id,
            synthesis,
            "stop".to_string(),
            Usage::default(),
            ProcessingMode::StaticFallback,
        )
    }

    /// Wrap synthesized content into the response, stamping id and time.
    fn finalize(
        &self,
        request_id: &str,
        synthesis: Synthesis,
        finish_reason: String,
        usage: Usage,
        mode: ProcessingMode,
    ) -> OrchestrationResponse {
        OrchestrationResponse {
            id: request_id.to_string(),
            message: ChatMessage {
                role: MessageRole::Assistant,
                content: synthesis.content,
            },
            finish_reason,
            usage,
            metadata: ResponseMetadata {
                services_referenced: synthesis.services_referenced,
                services_consulted: synthesis.services_consulted,
                processing_mode: mode,
                backend_data_included: synthesis.backend_data_included,
            },
            timestamp: Utc::now(),
        }
    }
}

/// System directive for pre-dispatch runs, with fetched payloads inlined.
fn pre_dispatch_prompt(results: &[ServiceCallResult]) -> String {
    let successes: Vec<(ServiceKind, &serde_json::Value)> = results
        .iter()
        .filter_map(|r| r.payload().map(|p| (r.service, p)))
        .collect();

    if successes.is_empty() {
        return SYSTEM_PROMPT_BASE.to_string();
    }

    let mut prompt = format!("{SYSTEM_PROMPT_BASE}\n\n{PRE_DISPATCH_GUIDANCE}");
    for (service, payload) in successes {
        prompt.push_str(&format!("\n\n{}:\n{payload}", service.display_name()));
    }
    prompt
}
