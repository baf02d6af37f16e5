use axum::{Json, extract::State};

use crate::genie::models::{ChatRequest, ChatResponse};
use crate::infrastructure::AppState;

pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let text = state.assistant.ask(payload.message.trim()).await;
    Json(ChatResponse { text })
}
