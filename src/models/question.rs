// src/models/question.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One multiple-choice question as produced by the model.
///
/// Every field is optional on input and loosely typed: model output is not
/// validated, so numbers and booleans are read as text, a missing key falls
/// back to an empty value and display code simply renders nothing for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Position in the quiz, `1..=N`. Zero when missing or not a number;
    /// extraction replaces that with the question's position.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: i64,

    #[serde(default, deserialize_with = "lenient_text")]
    pub question: String,

    /// Answer choices in display order. No fixed length.
    #[serde(default, deserialize_with = "lenient_options")]
    pub options: Vec<String>,

    /// Expected to equal one of `options`; not enforced.
    #[serde(default, deserialize_with = "lenient_text")]
    pub correct_answer: String,

    #[serde(default, deserialize_with = "lenient_optional_text", skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Text form of a scalar JSON value. `None` for null, arrays and objects.
fn value_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(id.unwrap_or_default())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(Value::deserialize(deserializer)?))
}

fn lenient_options<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let options = match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(value_text).collect(),
        other => value_text(other).into_iter().collect(),
    };
    Ok(options)
}

impl Question {
    /// Whether `answer` is the correct one. An unanswered question is never correct.
    pub fn is_answered_correctly(&self, answer: Option<&str>) -> bool {
        answer == Some(self.correct_answer.as_str())
    }
}

/// Body of a successful `POST /api/generate-questions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateQuestionsResponse {
    pub questions: Vec<Question>,
}
