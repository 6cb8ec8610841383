// src/extract.rs

//! Recovers the question array from the model's free-text reply.
//!
//! The model is told to answer with bare JSON but often wraps it in prose or
//! code fences. We take everything from the first `[` to the last `]` and
//! parse that. A `]` inside question text after the real array end, or a `[`
//! in leading prose, breaks the heuristic.

use std::collections::HashSet;

use serde_json::Value;

use crate::{error::AppError, models::question::Question};

/// Slices `text` from its first `[` to its last `]` (inclusive) and parses
/// the slice as a JSON array.
pub fn extract_json_array(text: &str) -> Result<Vec<Value>, AppError> {
    let start = text
        .find('[')
        .ok_or_else(|| AppError::MalformedResponse("no '[' in model reply".to_string()))?;
    let end = text
        .rfind(']')
        .ok_or_else(|| AppError::MalformedResponse("no ']' in model reply".to_string()))?;

    if end < start {
        return Err(AppError::MalformedResponse(
            "last ']' comes before first '[' in model reply".to_string(),
        ));
    }

    let slice = &text[start..=end];
    match serde_json::from_str::<Value>(slice)? {
        Value::Array(items) => Ok(items),
        other => Err(AppError::MalformedResponse(format!(
            "expected a JSON array, found {}",
            other
        ))),
    }
}

/// Extracts and decodes the question list.
///
/// Question objects are not validated beyond being objects: missing keys
/// become empty values and scalar fields are read as text. A question whose
/// id is missing, unusable or already taken gets its 1-based position.
pub fn extract_questions(text: &str) -> Result<Vec<Question>, AppError> {
    let mut seen = HashSet::new();
    extract_json_array(text)?
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let mut question = serde_json::from_value::<Question>(item).map_err(|e| {
                AppError::MalformedResponse(format!("question #{} could not be decoded: {}", index + 1, e))
            })?;
            if question.id <= 0 || seen.contains(&question.id) {
                question.id = index as i64 + 1;
            }
            seen.insert(question.id);
            Ok(question)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_is_cut_out_of_surrounding_noise() {
        let items = extract_json_array("noise[{\"a\":1}]trailing").unwrap();
        assert_eq!(Value::Array(items), json!([{"a": 1}]));
    }

    #[test]
    fn test_missing_open_bracket_is_malformed() {
        let err = extract_json_array("no array here]").unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_missing_close_bracket_is_malformed() {
        let err = extract_json_array("[{\"a\":1}").unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_inverted_brackets_are_malformed() {
        let err = extract_json_array("] then [").unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_invalid_json_between_brackets_is_malformed() {
        let err = extract_json_array("[not json]").unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_code_fenced_questions() {
        let reply = r#"Sure! Here are your questions:
```json
[
  {"id": 1, "question": "2 + 2 = ?", "options": ["3", "4"], "correct_answer": "4", "explanation": "Basic sum."},
  {"id": 2, "question": "Capital of France?", "options": ["Paris", "Rome"], "correct_answer": "Paris"}
]
```
Good luck!"#;
        let questions = extract_questions(reply).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].correct_answer, "4");
        assert_eq!(questions[1].explanation, None);
    }

    #[test]
    fn test_non_object_element_is_malformed() {
        let err = extract_questions("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_loosely_typed_math_question_is_kept() {
        let reply = r#"[{"id":"1","question":"2 + 2 = ?","options":[3,4,5],"correct_answer":4}]"#;
        let questions = extract_questions(reply).unwrap();
        assert_eq!(questions[0].id, 1);
        assert_eq!(questions[0].options, vec!["3", "4", "5"]);
        assert_eq!(questions[0].correct_answer, "4");
    }

    #[test]
    fn test_missing_ids_fall_back_to_position() {
        let reply = r#"[{"question":"a"},{"question":"b","id":"x"},{"question":"c","id":1}]"#;
        let ids: Vec<i64> = extract_questions(reply).unwrap().iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_error_names_the_question() {
        match extract_questions(r#"[{"id":1}, "text"]"#) {
            Err(AppError::MalformedResponse(msg)) => assert!(msg.starts_with("question #2 could not be decoded")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unbalanced_bracket_in_trailing_prose_breaks_extraction() {
        let err = extract_questions(r#"[{"id":1}] see note [1]"#).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }
}
