//! Chat orchestration handler.

use axum::Json;
use axum::extract::State;

use gantry_core::domain::orchestration::OrchestrationResponse;

use crate::dto::ChatRequest;
use crate::error::HttpError;
use crate::state::AppState;

/// Run one chat request through the orchestration pipeline.
///
/// POST /api/v1/chat
///
/// Malformed input yields a 400; everything else resolves to a well-formed
/// response, degraded if dependencies are down.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<OrchestrationResponse>, HttpError> {
    let transcript = request.into_transcript()?;
    let response = state.pipeline.handle_chat(&transcript).await?;

    tracing::info!(
        target: "gantry.http",
        id = %response.id,
        mode = ?response.metadata.processing_mode,
        consulted = response.metadata.services_consulted.len(),
        "chat request completed"
    );
    Ok(Json(response))
}
