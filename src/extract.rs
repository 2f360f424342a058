//! Pulls the explanation object out of free-form model output.
//!
//! The explainer is told to emit bare JSON but sometimes wraps it in a
//! ```` ```json ```` fence anyway. A fenced block wins when present; otherwise
//! the whole text must parse. No repair is attempted.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::warn;

use crate::error::PromptError;
use crate::util::log_preview;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\s+([\s\S]*?)```").expect("valid fence regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginalPromptReview {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationFeedback {
    pub original_prompt: OriginalPromptReview,
    pub llm_understanding_improvements: Vec<String>,
    pub tips_for_future_prompts: Vec<String>,
}

/// Interior of the first ```` ```json ```` fence, if any.
pub fn fenced_json(text: &str) -> Option<&str> {
    JSON_FENCE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub fn parse_feedback(text: &str) -> Result<ExplanationFeedback, PromptError> {
    match fenced_json(text) {
        Some(inner) => serde_json::from_str(inner)
            .map_err(|e| PromptError::Parse(format!("fenced JSON block: {e}"))),
        None => serde_json::from_str(text)
            .map_err(|e| PromptError::Parse(format!("no JSON block found, raw parse failed: {e}"))),
    }
}

/// Like [`parse_feedback`] but logs the failure and returns `None`.
pub fn extract_json(text: &str) -> Option<ExplanationFeedback> {
    match parse_feedback(text) {
        Ok(fb) => Some(fb),
        Err(e) => {
            warn!(preview = %log_preview(text, 200), "{e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"original_prompt":{"strengths":["short"],"weaknesses":["vague"]},"llm_understanding_improvements":["role"],"tips_for_future_prompts":["add context"]}"#;

    fn sample() -> ExplanationFeedback {
        ExplanationFeedback {
            original_prompt: OriginalPromptReview {
                strengths: vec!["short".into()],
                weaknesses: vec!["vague".into()],
            },
            llm_understanding_improvements: vec!["role".into()],
            tips_for_future_prompts: vec!["add context".into()],
        }
    }

    #[test]
    fn bare_json() {
        assert_eq!(extract_json(BODY), Some(sample()));
    }

    #[test]
    fn fenced_json_with_prose_around() {
        let raw = format!("Here you go:\n```json\n{BODY}\n```\nSome trailing note");
        assert_eq!(extract_json(&raw), Some(sample()));
    }

    #[test]
    fn fence_needs_whitespace_after_tag() {
        assert!(fenced_json("```json{}```").is_none());
        assert_eq!(fenced_json("```json\n{}\n```"), Some("{}\n"));
    }

    #[test]
    fn malformed_fence_does_not_fall_back() {
        // fence found but broken: raw text is not tried
        let raw = format!("```json\n{{broken\n```\n{BODY}");
        assert!(matches!(parse_feedback(&raw), Err(PromptError::Parse(_))));
    }

    #[test]
    fn garbage_is_none() {
        assert!(extract_json("not json at all").is_none());
        assert!(extract_json("").is_none());
    }

    #[test]
    fn missing_field_is_parse_failure() {
        let raw = r#"{"original_prompt":{"strengths":[],"weaknesses":[]},"llm_understanding_improvements":[]}"#;
        assert!(matches!(parse_feedback(raw), Err(PromptError::Parse(_))));
    }
}
