//! Parsing of loosely-structured model output into validated records.
//!
//! Backends wrap their JSON in markdown fences, prefix it with prose, or
//! both. Extraction tries a ```json fence first, then any fenced block,
//! then a greedy first-`{`-to-last-`}` scan.

use serde::Deserialize;

use crate::infrastructure::ports::{
    AiError, AnswerFeedback, GeneratedOption, GeneratedQuestion,
};

/// Extract JSON from a response that might have markdown code blocks or extra text.
pub fn extract_json(response: &str) -> String {
    // Try to find JSON in a ```json code block
    if let Some(start) = response.find("```json") {
        if let Some(end) = response[start + 7..].find("```") {
            return response[start + 7..start + 7 + end].trim().to_string();
        }
    }

    // Try to find JSON in a plain code block
    if let Some(start) = response.find("```") {
        if let Some(end) = response[start + 3..].find("```") {
            let content = response[start + 3..start + 3 + end].trim();
            // Skip language identifier if present
            if let Some(newline_pos) = content.find('\n') {
                let first_line = &content[..newline_pos];
                if !first_line.starts_with('{') {
                    return content[newline_pos + 1..].trim().to_string();
                }
            }
            return content.to_string();
        }
    }

    // Greedy scan for a raw JSON object
    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end > start {
                return response[start..=end].to_string();
            }
        }
    }

    // Return as-is if no JSON found
    response.to_string()
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    statement: String,
    options: Vec<RawOption>,
    correct_explanation: String,
    incorrect_explanation: String,
    #[serde(default)]
    source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOption {
    text: String,
    is_correct: bool,
}

/// Parse and structurally validate a generated question.
pub fn parse_generated_question(response: &str) -> Result<GeneratedQuestion, AiError> {
    let json = extract_json(response);

    let raw: RawQuestion = serde_json::from_str(&json).map_err(|e| {
        tracing::warn!(error = %e, "Failed to parse AI question response as JSON");
        AiError::MalformedResponse(format!("Invalid JSON in response: {e}"))
    })?;

    let question = GeneratedQuestion {
        statement: raw.statement,
        options: raw
            .options
            .into_iter()
            .map(|o| GeneratedOption {
                text: o.text,
                is_correct: o.is_correct,
            })
            .collect(),
        correct_explanation: raw.correct_explanation,
        incorrect_explanation: raw.incorrect_explanation,
        source_ref: raw.source.filter(|s| !s.trim().is_empty()),
    };

    question.validate()?;
    Ok(question)
}

#[derive(Debug, Deserialize)]
struct RawFeedback {
    is_correct: bool,
    explanation: String,
}

/// Parse an answer-validation verdict.
pub fn parse_answer_feedback(response: &str) -> Result<AnswerFeedback, AiError> {
    let json = extract_json(response);

    let raw: RawFeedback = serde_json::from_str(&json)
        .map_err(|e| AiError::MalformedResponse(format!("Invalid JSON in response: {e}")))?;

    if raw.explanation.trim().is_empty() {
        return Err(AiError::MalformedResponse(
            "Missing explanation in verdict".into(),
        ));
    }

    Ok(AnswerFeedback {
        is_correct: raw.is_correct,
        explanation: raw.explanation,
    })
}

/// Whether an HTTP failure should count as backend throttling.
///
/// Transport-level 429s are caught before this; some backends bury the
/// signal in the error body instead.
pub fn is_rate_limit_message(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("rate limit")
        || lower.contains("rate_limit")
        || lower.contains("too many requests")
        || lower.contains("resource_exhausted")
        || lower.contains("quota")
        || lower.contains("429")
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_BODY: &str = r#"{
        "statement": "Which element has the symbol Fe?",
        "options": [
            {"text": "Iron", "is_correct": true},
            {"text": "Fluorine", "is_correct": false},
            {"text": "Francium", "is_correct": false},
            {"text": "Iridium", "is_correct": false}
        ],
        "correct_explanation": "Fe comes from the Latin ferrum.",
        "incorrect_explanation": "Fe stands for iron, from the Latin ferrum.",
        "source": null
    }"#;

    #[test]
    fn extracts_from_json_fence() {
        let response = format!("Here you go:\n```json\n{VALID_BODY}\n```\nEnjoy!");
        let question = parse_generated_question(&response).unwrap();
        assert_eq!(question.statement, "Which element has the symbol Fe?");
        assert!(question.options[0].is_correct);
    }

    #[test]
    fn extracts_from_plain_fence() {
        let response = format!("```\n{VALID_BODY}\n```");
        assert!(parse_generated_question(&response).is_ok());
    }

    #[test]
    fn extracts_raw_object_mixed_with_prose() {
        let response = format!("Sure! The question is {VALID_BODY} -- hope that helps.");
        assert!(parse_generated_question(&response).is_ok());
    }

    #[test]
    fn rejects_two_correct_options() {
        let body = VALID_BODY.replace(
            r#"{"text": "Fluorine", "is_correct": false}"#,
            r#"{"text": "Fluorine", "is_correct": true}"#,
        );
        let err = parse_generated_question(&body).unwrap_err();
        assert!(matches!(err, AiError::MalformedResponse(_)));
    }

    #[test]
    fn rejects_duplicate_option_texts() {
        let body = VALID_BODY.replace("Fluorine", "Iron");
        let err = parse_generated_question(&body).unwrap_err();
        assert!(matches!(err, AiError::MalformedResponse(_)));
    }

    #[test]
    fn rejects_non_json_reply() {
        let err = parse_generated_question("I cannot help with that.").unwrap_err();
        assert!(matches!(err, AiError::MalformedResponse(_)));
    }

    #[test]
    fn parses_answer_feedback() {
        let feedback = parse_answer_feedback(
            r#"```json
{"is_correct": false, "explanation": "The capital is Canberra, not Sydney."}
```"#,
        )
        .unwrap();
        assert!(!feedback.is_correct);
        assert!(feedback.explanation.contains("Canberra"));
    }

    #[test]
    fn classifies_rate_limit_bodies() {
        assert!(is_rate_limit_message("Error 429: Too Many Requests"));
        assert!(is_rate_limit_message(r#"{"status":"RESOURCE_EXHAUSTED"}"#));
        assert!(is_rate_limit_message("You exceeded your current quota"));
        assert!(!is_rate_limit_message("model not found"));
    }
}
