use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use perra_core::error::ApiError;
use perra_core::stats::{CounterField, Counters};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/stats", get(get_stats))
        .route("/refusal", get(record_refusal))
}

/// Response for GET /refusal
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RefusalResponse {
    pub status: String,
    pub refusals: u64,
}

/// Current site counters
#[utoipa::path(
    get,
    path = "/v1/stats",
    responses(
        (status = 200, description = "Counters", body = Counters),
        (status = 500, description = "Counter store failed", body = ApiError)
    ),
    tag = "stats"
)]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Counters>, AppError> {
    Ok(Json(state.counters.snapshot().await?))
}

/// Count one refusal reported by an external bot front-end
#[utoipa::path(
    get,
    path = "/refusal",
    responses(
        (status = 200, description = "Refusal recorded", body = RefusalResponse),
        (status = 500, description = "Counter store failed", body = ApiError)
    ),
    tag = "stats"
)]
pub async fn record_refusal(
    State(state): State<AppState>,
) -> Result<Json<RefusalResponse>, AppError> {
    let counters = state.counters.increment(CounterField::Refusals).await?;
    Ok(Json(RefusalResponse {
        status: "ok".to_string(),
        refusals: counters.refusals,
    }))
}
