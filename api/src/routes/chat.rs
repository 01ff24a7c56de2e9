use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use perra_core::random::ThreadRandom;
use perra_core::stats::CounterField;
use serde::{Deserialize, Serialize};

use perra_core::error::ApiError;

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/chat", post(chat))
}

/// Request body for POST /v1/chat
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct ChatRequest {
    /// Message text; missing or null is treated as empty
    #[serde(default)]
    pub message: Option<String>,
    /// Display name used in greetings; defaults to the configured placeholder
    #[serde(default)]
    pub name: Option<String>,
}

/// Response for POST /v1/chat
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChatResponse {
    pub response: String,
}

/// Send a message to the bot
///
/// Every message bumps `chat_messages`; replies the bot counts as refusals
/// also bump `refusals`.
#[utoipa::path(
    post,
    path = "/v1/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Bot reply", body = ChatResponse),
        (status = 400, description = "Body is not a JSON object", body = ApiError),
        (status = 500, description = "Counter store failed", body = ApiError)
    ),
    tag = "chat"
)]
pub async fn chat(
    State(state): State<AppState>,
    AppJson(req): AppJson<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = req.message.unwrap_or_default();
    let name = req.name.unwrap_or_default();

    let result = state
        .responder
        .classify(&message, &name, state.clock.now(), &mut ThreadRandom);

    tracing::debug!(
        category = result.matched_category.map(|c| c.as_str()).unwrap_or("fallback"),
        refusal = result.is_refusal,
        "classified chat message"
    );

    state.counters.increment(CounterField::ChatMessages).await?;
    if result.is_refusal {
        state.counters.increment(CounterField::Refusals).await?;
    }

    Ok(Json(ChatResponse {
        response: result.reply,
    }))
}
