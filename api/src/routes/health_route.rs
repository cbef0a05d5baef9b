//! GET /health — liveness probe over the configured LLM profiles.

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::core::app_state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.llm_profiles.health_all().await)
}
