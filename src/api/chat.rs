//! Chat endpoint handler

use axum::extract::State;
use tracing::{debug, error};

use crate::api::state::AppState;
use crate::api::types::{ApiError, ChatRequest, ChatResponse, Json};
use crate::domain::Message;

/// POST /chat
///
/// Wraps the utterance as a single user turn and runs it through the chain.
/// Any other method is answered with 405 by the router before this runs.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    debug!(chars = request.message.chars().count(), "Processing chat message");

    let input = vec![Message::user(request.message)];
    let reply = state.chain.invoke(&input).await.map_err(|e| {
        error!(error = %e, "Chain invocation failed");
        ApiError::from(e)
    })?;

    Ok(Json(ChatResponse {
        response: reply.content().to_string(),
        framework: state.info.framework.clone(),
        version: state.info.version.clone(),
    }))
}
