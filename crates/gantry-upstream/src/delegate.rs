//! External orchestrator (delegated tier) client.
//!
//! Ships the whole transcript to the configured orchestrator and adapts
//! whatever response shape it returns. Different deployments answer with
//! different envelopes, so adaptation is tolerant rather than strict.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use gantry_core::config::DelegateConfig;
use gantry_core::domain::chat::Transcript;
use gantry_core::domain::completion::Usage;
use gantry_core::domain::service::ServiceKind;
use gantry_core::ports::delegate::{DelegateBackend, DelegateError, DelegateReply};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Production client for the delegated orchestrator tier.
pub struct HttpDelegateClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDelegateClient {
    pub fn new(config: &DelegateConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DelegateRequest<'a> {
    messages: Vec<WireMessage<'a>>,
    capabilities: Vec<&'static str>,
    session_id: &'a str,
    source: &'static str,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[async_trait]
impl DelegateBackend for HttpDelegateClient {
    async fn delegate(
        &self,
        transcript: &Transcript,
        capabilities: &[ServiceKind],
        request_id: &str,
    ) -> Result<DelegateReply, DelegateError> {
        let url = format!("{}/v1/orchestrate", self.base_url);
        let request = DelegateRequest {
            messages: transcript
                .messages()
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            capabilities: capabilities.iter().map(ServiceKind::as_str).collect(),
            session_id: request_id,
            source: "gantry",
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| DelegateError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DelegateError::Api {
                status: status.as_u16(),
                message: if body.trim().is_empty() {
                    "delegate rejected the call".to_string()
                } else {
                    body.trim().to_string()
                },
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| DelegateError::Transport(e.to_string()))?;

        adapt_reply(&body).ok_or_else(|| {
            tracing::warn!(
                target: "gantry.delegate",
                "delegate response shape not recognized"
            );
            DelegateError::Transport("unrecognized delegate response shape".into())
        })
    }
}

/// Adapt the orchestrator's reply envelope to a [`DelegateReply`].
///
/// Accepted shapes for the reply text, tried in order:
/// `message.content`, `message` (bare string), `content`, and the
/// completions-style `choices[0].message.content`.
fn adapt_reply(body: &Value) -> Option<DelegateReply> {
    let text = body
        .pointer("/message/content")
        .and_then(Value::as_str)
        .or_else(|| body.get("message").and_then(Value::as_str))
        .or_else(|| body.get("content").and_then(Value::as_str))
        .or_else(|| {
            body.pointer("/choices/0/message/content")
                .and_then(Value::as_str)
        })?;

    let finish_reason = body
        .get("finishReason")
        .or_else(|| body.get("finish_reason"))
        .or_else(|| body.pointer("/choices/0/finish_reason"))
        .and_then(Value::as_str)
        .map(ToString::to_string);

    let usage = body.get("usage").and_then(adapt_usage);

    Some(DelegateReply {
        text: text.to_string(),
        finish_reason,
        usage,
    })
}

fn adapt_usage(usage: &Value) -> Option<Usage> {
    let token_field = |camel: &str, snake: &str| {
        usage
            .get(camel)
            .or_else(|| usage.get(snake))
            .and_then(Value::as_u64)
    };

    let prompt = token_field("promptTokens", "prompt_tokens")?;
    let completion = token_field("completionTokens", "completion_tokens")?;
    Some(Usage::new(
        u32::try_from(prompt).ok()?,
        u32::try_from(completion).ok()?,
    ))
}
