//! Output parser for the map-rerank strategy.

use tracing::trace;

use crate::errors::PromptError;

/// One scored candidate answer extracted from a map-rerank completion.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedAnswer {
    /// Answer text preceding the score line.
    pub answer: String,
    /// Confidence in `0..=100` as emitted by the model.
    pub score: u32,
}

/// Parses a map-rerank completion into `(answer, score)`.
///
/// Expected shape is the two-line pattern the template asks for: answer text
/// first, then a final line matching `Score: <number>`. Leading/trailing
/// whitespace is tolerated, as is a `Question: ...` echo before the answer.
///
/// # Errors
/// Returns [`PromptError::UnparsableRankedAnswer`] when no `Score:` line is
/// present or its value is not a number in `0..=100`.
pub fn parse_ranked_answer(raw: &str) -> Result<RankedAnswer, PromptError> {
    let trimmed = raw.trim();

    let (head, score_line) = trimmed
        .rsplit_once('\n')
        .filter(|(_, last)| last.trim_start().starts_with("Score:"))
        .ok_or_else(|| PromptError::UnparsableRankedAnswer(snippet(trimmed)))?;

    let score: u32 = score_line
        .trim_start()
        .trim_start_matches("Score:")
        .trim()
        .parse()
        .map_err(|_| PromptError::UnparsableRankedAnswer(snippet(trimmed)))?;
    if score > 100 {
        return Err(PromptError::UnparsableRankedAnswer(snippet(trimmed)));
    }

    // Drop a leading "Question: ..." echo if the model repeated the frame.
    let answer = head
        .trim()
        .lines()
        .skip_while(|l| l.trim_start().starts_with("Question:"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    trace!(score, answer_len = answer.len(), "parsed ranked answer");
    Ok(RankedAnswer { answer, score })
}

fn snippet(s: &str) -> String {
    const MAX: usize = 120;
    if s.len() <= MAX {
        s.to_string()
    } else {
        let mut end = MAX;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_line_pattern() {
        let got = parse_ranked_answer("Refunds are honored within 30 days.\nScore: 85").unwrap();
        assert_eq!(got.answer, "Refunds are honored within 30 days.");
        assert_eq!(got.score, 85);
    }

    #[test]
    fn tolerates_question_echo_and_whitespace() {
        let raw = "\nQuestion: What is the refund policy?\nWithin 30 days.\nScore: 60\n";
        let got = parse_ranked_answer(raw).unwrap();
        assert_eq!(got.answer, "Within 30 days.");
        assert_eq!(got.score, 60);
    }

    #[test]
    fn rejects_missing_score_line() {
        assert!(parse_ranked_answer("Just an answer with no score").is_err());
    }

    #[test]
    fn rejects_out_of_range_score() {
        assert!(parse_ranked_answer("Answer.\nScore: 250").is_err());
        assert!(parse_ranked_answer("Answer.\nScore: eighty").is_err());
    }
}
