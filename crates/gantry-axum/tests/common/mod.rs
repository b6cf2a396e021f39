//! Shared fakes and context builders for integration tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use gantry_axum::bootstrap::AxumContext;
use gantry_core::config::{DispatchMode, GatewayConfig};
use gantry_core::domain::chat::Transcript;
use gantry_core::domain::completion::{Completion, ModelTier, Usage};
use gantry_core::domain::service::{ServiceEndpoint, ServiceKind};
use gantry_core::ports::analysis::{AnalysisBackend, AnalysisError};
use gantry_core::ports::completion::{CompletionBackend, CompletionError};
use gantry_core::registry::ServiceRegistry;
use gantry_core::services::{OrchestrationPipeline, ServiceDispatcher};

/// Completion fake with a canned reply; `None` behaves unconfigured.
pub struct FakeCompletion {
    reply: Option<String>,
}

#[async_trait]
impl CompletionBackend for FakeCompletion {
    async fn complete(
        &self,
        _transcript: &Transcript,
        _system_prompt: &str,
        _tier: ModelTier,
    ) -> Result<Completion, CompletionError> {
        match &self.reply {
            Some(text) => Ok(Completion {
                text: text.clone(),
                finish_reason: "stop".into(),
                usage: Usage::new(12, 6),
            }),
            None => Err(CompletionError::Unconfigured),
        }
    }
}

/// Analysis fake answering immediately for every registered service.
pub struct FakeAnalysis;

#[async_trait]
impl AnalysisBackend for FakeAnalysis {
    async fn analyze(
        &self,
        endpoint: &ServiceEndpoint,
        query: &str,
        _request_id: &str,
    ) -> Result<serde_json::Value, AnalysisError> {
        Ok(serde_json::json!({
            "service": endpoint.kind.as_str(),
            "query": query,
            "findings": ["stub finding"]
        }))
    }
}

/// Build a context over fakes: the given services are registered and answer
/// immediately; `reply` is the canned completion (None = unconfigured).
pub fn test_context(registered: &[ServiceKind], reply: Option<&str>) -> AxumContext {
    let mut gateway = GatewayConfig::with_defaults();
    gateway.dispatch_mode = DispatchMode::PreDispatch;
    gateway.completion.api_key = reply.map(|_| "test-key".to_string());
    gateway.services = registered
        .iter()
        .map(|&k| ServiceEndpoint::new(k, format!("http://{k}.test")))
        .collect();
    let config = Arc::new(gateway);

    let registry = Arc::new(ServiceRegistry::from_config(&config));
    let dispatcher =
        ServiceDispatcher::new(registry, Arc::new(FakeAnalysis), Duration::from_secs(5));
    let completion = Arc::new(FakeCompletion {
        reply: reply.map(str::to_string),
    });
    let pipeline = Arc::new(OrchestrationPipeline::new(
        Arc::clone(&config),
        dispatcher,
        completion,
        None,
    ));

    AxumContext::new(pipeline, config)
}
