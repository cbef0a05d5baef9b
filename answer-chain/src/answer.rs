//! Terminal output of the composition chains.

use serde::{Deserialize, Serialize};

/// The composed answer returned for one record.
///
/// Immutable once constructed. `error` is empty on success; on a degraded
/// (fail-soft) record every other field is empty and `error` carries a
/// backend-labeled message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComposedAnswer {
    /// Raw contents of the retrieved fragments, in rank order.
    pub data_points: Vec<String>,
    /// Normalized primary answer text.
    pub answer: String,
    /// Human-readable rendering of the exact prompt sent to the model.
    pub thoughts: String,
    /// Citation: newline plus the top-ranked fragment's source identifier.
    pub sources: String,
    /// Up to three follow-up questions in double angle brackets.
    #[serde(rename = "nextQuestions")]
    pub next_questions: String,
    /// Empty on success; backend-labeled message on a soft failure.
    pub error: String,
}

impl ComposedAnswer {
    /// Degraded answer for a failed record: empty fields, labeled error.
    pub fn failed(backend_label: &str, message: impl std::fmt::Display) -> Self {
        Self {
            error: format!("{backend_label} backend: {message}"),
            ..Self::default()
        }
    }

    /// Placeholder for recognized-but-unshipped backends and approaches.
    pub fn not_implemented() -> Self {
        Self {
            answer: "Not yet implemented".to_string(),
            ..Self::default()
        }
    }
}
