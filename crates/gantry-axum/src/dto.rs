//! Request DTOs (adapter-local) and transcript normalization.

use serde::Deserialize;

use gantry_core::domain::chat::{ChatMessage, MessageRole, Transcript};

use crate::error::HttpError;

/// Request body for the chat endpoint.
///
/// Accepts either a full `messages` transcript or a single `message`
/// string; both normalize to a [`Transcript`] before entering the pipeline.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Option<Vec<ChatMessageDto>>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One wire message in the request transcript.
#[derive(Debug, Deserialize)]
pub struct ChatMessageDto {
    pub role: String,
    pub content: String,
}

impl ChatRequest {
    /// Normalize the request into a transcript.
    ///
    /// `messages` wins when both fields are present. A request with
    /// neither is a client error, distinguishable from every
    /// pipeline-internal failure.
    pub fn into_transcript(self) -> Result<Transcript, HttpError> {
        if let Some(messages) = self.messages {
            let mut normalized = Vec::with_capacity(messages.len());
            for message in messages {
                let role = MessageRole::parse(&message.role).ok_or_else(|| {
                    HttpError::BadRequest(format!("Invalid message role: {}", message.role))
                })?;
                normalized.push(ChatMessage {
                    role,
                    content: message.content,
                });
            }
            return Ok(Transcript::new(normalized));
        }

        if let Some(message) = self.message {
            return Ok(Transcript::from_user_message(message));
        }

        Err(HttpError::BadRequest(
            "request must include either 'messages' or 'message'".into(),
        ))
    }
}
