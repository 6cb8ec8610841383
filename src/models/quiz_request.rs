// src/models/quiz_request.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Form fields submitted to `POST /api/generate-questions`.
///
/// Only `exam` and `topic` are required; the rest shape the prompt when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuizRequest {
    #[serde(default)]
    #[validate(custom(function = not_blank))]
    pub exam: String,

    #[serde(default)]
    #[validate(custom(function = not_blank))]
    pub topic: String,

    /// Free text, the web form offers "Easy", "Medium" and "Hard".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,

    /// Older clients send this as `branch`.
    #[serde(default, alias = "branch", skip_serializing_if = "Option::is_none")]
    pub subjects: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl QuizRequest {
    pub fn new(exam: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            exam: exam.into(),
            topic: topic.into(),
            ..Default::default()
        }
    }

    /// Builds a request from raw form input. Blank optional fields are
    /// treated as not given.
    pub fn from_form(
        exam: String,
        topic: String,
        difficulty: String,
        subjects: String,
        language: String,
        additional_info: String,
    ) -> Self {
        let optional = |value: String| (!value.trim().is_empty()).then_some(value);
        Self {
            exam,
            topic,
            difficulty: optional(difficulty),
            subjects: optional(subjects),
            language: optional(language),
            additional_info: optional(additional_info),
        }
    }

    /// The language the quiz was requested in, empty when unspecified.
    pub fn language_or_empty(&self) -> &str {
        self.language.as_deref().map(str::trim).unwrap_or_default()
    }
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exam_and_topic_required() {
        assert!(QuizRequest::new("GMAT", "Algebra").validate().is_ok());
        assert!(QuizRequest::new("", "Algebra").validate().is_err());
        assert!(QuizRequest::new("GMAT", "   ").validate().is_err());
    }

    #[test]
    fn test_branch_is_accepted_for_subjects() {
        let req: QuizRequest = serde_json::from_str(
            r#"{"exam":"JEE","topic":"Physics","branch":"Optics","additionalInfo":"focus on lenses"}"#,
        )
        .unwrap();
        assert_eq!(req.subjects.as_deref(), Some("Optics"));
        assert_eq!(req.additional_info.as_deref(), Some("focus on lenses"));
    }

    #[test]
    fn test_blank_form_fields_are_not_given() {
        let req = QuizRequest::from_form(
            "CET".to_string(),
            "Organic chemistry".to_string(),
            "Hard".to_string(),
            String::new(),
            "  ".to_string(),
            "no diagrams".to_string(),
        );
        assert_eq!(req.exam, "CET");
        assert_eq!(req.topic, "Organic chemistry");
        assert_eq!(req.difficulty.as_deref(), Some("Hard"));
        assert_eq!(req.subjects, None);
        assert_eq!(req.language, None);
        assert_eq!(req.additional_info.as_deref(), Some("no diagrams"));
    }

    #[test]
    fn test_missing_required_field_still_decodes() {
        // Presence is checked by `validate`, not by the decoder, so the
        // handler can answer 400 instead of a decoder rejection.
        let req: QuizRequest = serde_json::from_str(r#"{"topic":"Rome"}"#).unwrap();
        assert_eq!(req.exam, "");
        assert!(req.validate().is_err());
    }
}
