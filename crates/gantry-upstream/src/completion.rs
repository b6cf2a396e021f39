//! OpenAI-compatible completion provider client.
//!
//! One call per request, no internal retry: the pipeline owns fallback.
//! The credential check happens synchronously, before any network attempt.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use gantry_core::config::CompletionConfig;
use gantry_core::domain::chat::Transcript;
use gantry_core::domain::completion::{Completion, ModelTier, Usage};
use gantry_core::ports::completion::{CompletionBackend, CompletionError};

/// Outer transport timeout. The pipeline treats a slow provider as a tier
/// failure; this only prevents an unbounded hang.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Production completion client speaking the `/chat/completions` protocol.
pub struct HttpCompletionClient {
    client: reqwest::Client,
    config: CompletionConfig,
}

impl HttpCompletionClient {
    /// Create a client from completion configuration.
    pub fn new(config: CompletionConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to create HTTP client");

        Self { client, config }
    }
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[async_trait]
impl CompletionBackend for HttpCompletionClient {
    async fn complete(
        &self,
        transcript: &Transcript,
        system_prompt: &str,
        tier: ModelTier,
    ) -> Result<Completion, CompletionError> {
        let Some(api_key) = &self.config.api_key else {
            return Err(CompletionError::Unconfigured);
        };

        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(WireMessage {
            role: "system",
            content: system_prompt,
        });
        for message in transcript.messages() {
            messages.push(WireMessage {
                role: message.role.as_str(),
                content: &message.content,
            });
        }

        let request = CompletionRequest {
            model: self.config.model_for(tier),
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        tracing::debug!(
            target: "gantry.completion",
            model = request.model,
            %tier,
            "requesting completion"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message: provider_error_message(status.as_u16(), &body),
            });
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;
        parse_completion(body)
    }
}

/// Pull a readable message out of the provider's structured error body,
/// falling back to a generic one.
fn provider_error_message(status: u16, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| format!("completion request failed with status {status}"))
}

fn parse_completion(body: CompletionResponse) -> Result<Completion, CompletionError> {
    let choice = body.choices.into_iter().next().ok_or_else(|| {
        CompletionError::Transport("completion response contained no choices".into())
    })?;

    let usage = body
        .usage
        .map(|u| Usage::new(u.prompt_tokens, u.completion_tokens))
        .unwrap_or_default();

    Ok(Completion {
        text: choice.message.content,
        finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
        usage,
    })
}
