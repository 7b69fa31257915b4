use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::DialogueState;
use crate::services::agent::{self, TurnContext};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Prior conversation state, round-tripped from the previous
    /// response. Omit to start a fresh conversation.
    #[serde(default)]
    pub state: Option<DialogueState>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub responses: Vec<String>,
    pub state: DialogueState,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("message must not be empty".to_string()));
    }

    tracing::info!(message = %message, "incoming chat turn");

    let ctx = TurnContext {
        calendar: state.calendar.as_ref(),
        slot_duration_minutes: state.config.slot_duration_minutes,
        booking_title: &state.config.booking_title,
    };
    let now = chrono::Local::now().naive_local();

    let (responses, new_state) = agent::process_turn(&ctx, message, req.state, now).await;

    Ok(Json(ChatResponse {
        responses,
        state: new_state,
    }))
}
