//! Label normalization and refusal detection.
//!
//! Downstream consumers pattern-match on `SOURCES:`/`NEXT QUESTIONS:`, so
//! both completion outputs get their labels rewritten to the canonical
//! uppercase forms and the `Answer: ` prefix stripped.

/// The literal refusal phrase the prompts instruct the model to use.
pub(crate) const REFUSAL_PHRASE: &str = "I don't know";

/// Normalizes the primary answer text.
pub(crate) fn normalize_answer(raw: &str) -> String {
    raw.replace("Answer: ", "")
        .replace("Sources:", "SOURCES:")
        .replace("Next Questions:", "NEXT QUESTIONS:")
}

/// Normalizes the follow-up output and strips its own heading; the caller
/// reconstructs the field explicitly.
pub(crate) fn normalize_followup(raw: &str) -> String {
    normalize_answer(raw).replace("NEXT QUESTIONS:", "")
}

/// Whether the normalized answer is a refusal.
pub(crate) fn is_refusal(answer: &str) -> bool {
    answer.contains(REFUSAL_PHRASE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_answer_prefix_and_uppercases_labels() {
        let got = normalize_answer("Answer: Within 30 days.\nSources: policy.pdf");
        assert_eq!(got, "Within 30 days.\nSOURCES: policy.pdf");
    }

    #[test]
    fn followup_loses_its_heading() {
        let got = normalize_followup("Next Questions:\n<<A?>>\n<<B?>>\n<<C?>>");
        assert_eq!(got, "\n<<A?>>\n<<B?>>\n<<C?>>");
    }

    #[test]
    fn refusal_detection_is_substring_based() {
        assert!(is_refusal("I don't know based on the provided text."));
        assert!(!is_refusal("Refunds are honored within 30 days."));
    }
}
