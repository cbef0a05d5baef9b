//! POST /sql_chain — batch natural-language-to-SQL answering.

use std::sync::Arc;

use answer_chain::{BatchEnvelope, RecordData, process};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::info;

use crate::core::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct SqlParams {
    #[serde(rename = "topK")]
    pub top_k: Option<usize>,
    pub question: Option<String>,
}

/// Handler: POST /sql_chain
///
/// The question and row limit travel in the query string; the body is the
/// batch envelope whose records gate processing (same validation protocol
/// as question answering).
pub async fn sql_chain(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SqlParams>,
    body: String,
) -> Response {
    let envelope: BatchEnvelope = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(_) => return (StatusCode::BAD_REQUEST, "Invalid body").into_response(),
    };

    let question = params.question.unwrap_or_default();
    let top_k = params.top_k.unwrap_or(5);
    info!(top_k, records = envelope.values.len(), "sql_chain request");

    let out = process(envelope, |_data: RecordData| {
        let state = &state;
        let question = question.as_str();
        async move { Ok(state.sql_chain.answer(question, top_k).await) }
    })
    .await;

    Json(out).into_response()
}
