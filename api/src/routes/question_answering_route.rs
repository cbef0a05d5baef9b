//! POST /question_answering — batch retrieve-then-read answering.

use std::sync::Arc;

use answer_chain::{BatchEnvelope, RecordData, process};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use index_store::IndexKind;
use prompt_store::Strategy;
use serde::Deserialize;
use tracing::info;

use crate::core::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct QaParams {
    #[serde(rename = "chainType")]
    pub chain_type: Option<Strategy>,
    pub question: Option<String>,
    #[serde(rename = "indexType")]
    pub index_type: Option<String>,
    #[serde(rename = "indexNs")]
    pub index_ns: Option<String>,
}

/// Handler: POST /question_answering
///
/// The body is a batch envelope. The question comes from the `question`
/// query parameter, falling back to each record's `data.text` (which the
/// batch protocol requires to be present either way). Backend and
/// namespace come from the query string, the strategy from the record's
/// overrides with the `chainType` parameter as fallback.
///
/// # Example
/// ```bash
/// curl -X POST 'http://127.0.0.1:8080/question_answering?indexType=pinecone&indexNs=docs&question=What%20is%20the%20refund%20policy%3F' \
///   -H 'content-type: application/json' \
///   -d '{"values":[{"recordId":"1","data":{"text":"What is the refund policy?","approach":"rtr"}}]}'
/// ```
pub async fn question_answering(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QaParams>,
    body: String,
) -> Response {
    let envelope: BatchEnvelope = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(_) => return (StatusCode::BAD_REQUEST, "Invalid body").into_response(),
    };

    let kind = IndexKind::parse(params.index_type.as_deref().unwrap_or(""));
    let namespace = params.index_ns.unwrap_or_default();
    info!(kind = %kind, namespace, records = envelope.values.len(), "question_answering request");

    let out = process(envelope, |data: RecordData| {
        let state = &state;
        let kind = &kind;
        let namespace = namespace.as_str();
        let query_question = params.question.as_deref();
        let fallback_strategy = params.chain_type;
        async move {
            let question = resolve_question(query_question, data.text.as_deref());
            let approach = data.approach.unwrap_or_else(|| "rtr".to_string());
            let mut overrides = data.overrides.unwrap_or_default();
            if overrides.chain_type.is_none() {
                overrides.chain_type = fallback_strategy;
            }
            Ok(state
                .answer_chain
                .answer(&question, kind, namespace, &approach, &overrides)
                .await)
        }
    })
    .await;

    Json(out).into_response()
}

/// Picks the question for one record: the `question` query parameter wins,
/// a blank or absent parameter falls back to the record's `data.text`.
fn resolve_question(query_question: Option<&str>, record_text: Option<&str>) -> String {
    query_question
        .filter(|q| !q.trim().is_empty())
        .or(record_text)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_parameter_takes_precedence_over_record_text() {
        let got = resolve_question(Some("What is the refund policy?"), Some("ignored text"));
        assert_eq!(got, "What is the refund policy?");
    }

    #[test]
    fn blank_or_absent_parameter_falls_back_to_record_text() {
        assert_eq!(
            resolve_question(None, Some("What is the refund policy?")),
            "What is the refund policy?"
        );
        assert_eq!(
            resolve_question(Some("   "), Some("What is the refund policy?")),
            "What is the refund policy?"
        );
    }

    #[test]
    fn both_missing_yields_an_empty_question() {
        assert_eq!(resolve_question(None, None), "");
    }

    #[test]
    fn question_parameter_deserializes_from_the_query_string() {
        let params: QaParams = serde_json::from_str(
            r#"{"question":"What is the refund policy?","indexType":"pinecone"}"#,
        )
        .unwrap();
        assert_eq!(params.question.as_deref(), Some("What is the refund policy?"));
    }
}
