//! Batch record protocol.
//!
//! The entry point accepts an envelope of records and answers with an
//! envelope of per-record outcomes in the same order. A record failure is
//! reported inside its own slot; it never aborts the batch.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::answer::ComposedAnswer;
use crate::errors::ChainError;
use crate::overrides::Overrides;

/* === wire shapes === */

/// Inbound batch envelope.
#[derive(Debug, Deserialize)]
pub struct BatchEnvelope {
    #[serde(default)]
    pub values: Vec<BatchRecord>,
}

/// One inbound record. Everything is optional on the wire; validation
/// happens record by record in [`process`].
#[derive(Debug, Deserialize)]
pub struct BatchRecord {
    #[serde(rename = "recordId")]
    pub record_id: Option<String>,
    pub data: Option<RecordData>,
}

/// The payload of one record.
#[derive(Debug, Deserialize)]
pub struct RecordData {
    pub text: Option<String>,
    pub approach: Option<String>,
    pub overrides: Option<Overrides>,
}

/// Outbound batch envelope.
#[derive(Debug, Serialize)]
pub struct ResponseEnvelope {
    pub values: Vec<OutputRecord>,
}

/// One outbound record: either a composed answer or a list of errors,
/// never both.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum OutputRecord {
    Data {
        #[serde(rename = "recordId")]
        record_id: String,
        data: ComposedAnswer,
    },
    Errors {
        #[serde(rename = "recordId")]
        record_id: String,
        errors: Vec<RecordError>,
    },
}

#[derive(Debug, Serialize)]
pub struct RecordError {
    pub message: String,
}

/* === processing === */

const ERR_MISSING_DATA: &str = "'data' field is required.";
const ERR_MISSING_TEXT: &str = "'text' field is required in 'data' object.";
const ERR_RECORD_FAILED: &str = "Could not complete operation for record.";

/// Runs `handler` over every well-formed record, preserving input order.
///
/// Records without a `recordId` are dropped (there is no slot to answer
/// into). Structural problems and handler failures become error records.
pub async fn process<F, Fut>(envelope: BatchEnvelope, handler: F) -> ResponseEnvelope
where
    F: Fn(RecordData) -> Fut,
    Fut: Future<Output = Result<ComposedAnswer, ChainError>>,
{
    let mut values = Vec::with_capacity(envelope.values.len());

    for record in envelope.values {
        let Some(record_id) = record.record_id else {
            warn!("dropping record without recordId");
            continue;
        };

        let Some(data) = record.data else {
            values.push(error_record(record_id, ERR_MISSING_DATA));
            continue;
        };
        if data.text.is_none() {
            values.push(error_record(record_id, ERR_MISSING_TEXT));
            continue;
        }

        match handler(data).await {
            Ok(answer) => values.push(OutputRecord::Data {
                record_id,
                data: answer,
            }),
            Err(e) => {
                warn!(record_id, error = %e, "record handler failed");
                values.push(error_record(record_id, ERR_RECORD_FAILED));
            }
        }
    }

    ResponseEnvelope { values }
}

fn error_record(record_id: String, message: &str) -> OutputRecord {
    OutputRecord::Errors {
        record_id,
        errors: vec![RecordError {
            message: message.to_string(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(body: serde_json::Value) -> BatchEnvelope {
        serde_json::from_value(body).unwrap()
    }

    async fn ok_handler(_data: RecordData) -> Result<ComposedAnswer, ChainError> {
        Ok(ComposedAnswer {
            answer: "fine".to_string(),
            ..ComposedAnswer::default()
        })
    }

    #[tokio::test]
    async fn every_identified_record_gets_a_slot_in_order() {
        let input = envelope(json!({
            "values": [
                { "recordId": "a", "data": { "text": "q1" } },
                { "recordId": "b" },
                { "recordId": "c", "data": { "text": "q3" } }
            ]
        }));

        let out = process(input, ok_handler).await;

        assert_eq!(out.values.len(), 3);
        let ids: Vec<&str> = out
            .values
            .iter()
            .map(|v| match v {
                OutputRecord::Data { record_id, .. } => record_id.as_str(),
                OutputRecord::Errors { record_id, .. } => record_id.as_str(),
            })
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn record_without_id_is_dropped() {
        let input = envelope(json!({
            "values": [
                { "data": { "text": "orphan" } },
                { "recordId": "a", "data": { "text": "q" } }
            ]
        }));

        let out = process(input, ok_handler).await;
        assert_eq!(out.values.len(), 1);
    }

    #[tokio::test]
    async fn missing_data_and_missing_text_produce_distinct_messages() {
        let input = envelope(json!({
            "values": [
                { "recordId": "a" },
                { "recordId": "b", "data": { "approach": "rtr" } }
            ]
        }));

        let out = process(input, ok_handler).await;
        let messages: Vec<&str> = out
            .values
            .iter()
            .map(|v| match v {
                OutputRecord::Errors { errors, .. } => errors[0].message.as_str(),
                OutputRecord::Data { .. } => panic!("expected error records"),
            })
            .collect();
        assert_eq!(messages[0], "'data' field is required.");
        assert_eq!(messages[1], "'text' field is required in 'data' object.");
        assert!(messages[1].contains("text"));
    }

    #[tokio::test]
    async fn handler_failure_becomes_an_error_record() {
        let input = envelope(json!({
            "values": [{ "recordId": "a", "data": { "text": "q" } }]
        }));

        let out = process(input, |_data| async {
            Err(ChainError::Prompt(
                prompt_store::PromptError::MissingVariable("question".to_string()),
            ))
        })
        .await;

        match &out.values[0] {
            OutputRecord::Errors { errors, .. } => {
                assert_eq!(errors[0].message, "Could not complete operation for record.");
            }
            OutputRecord::Data { .. } => panic!("expected an error record"),
        }
    }

    #[test]
    fn output_record_serializes_without_a_tag() {
        let data = OutputRecord::Data {
            record_id: "a".to_string(),
            data: ComposedAnswer::default(),
        };
        let v = serde_json::to_value(&data).unwrap();
        assert_eq!(v["recordId"], "a");
        assert!(v["data"].is_object());
        assert!(v.get("Data").is_none());

        let err = OutputRecord::Errors {
            record_id: "b".to_string(),
            errors: vec![RecordError {
                message: "boom".to_string(),
            }],
        };
        let v = serde_json::to_value(&err).unwrap();
        assert_eq!(v["errors"][0]["message"], "boom");
    }
}
