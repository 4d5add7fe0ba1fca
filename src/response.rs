//! Parsing of the classifier's JSON answer

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Structured classification returned by the LLM
///
/// Fields other than the well-known ones are kept in `extra`. Well-known
/// fields accept any JSON type: `null` reads as absent, other scalars are
/// rendered as text, and a numeric string is accepted as a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default, deserialize_with = "lenient_string")]
    pub request_type: String,

    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub sub_request_type: Option<String>,

    /// Certainty between 0 and 1
    #[serde(
        default,
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub confidence_score: Option<f64>,

    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub summary: Option<String>,

    /// e.g. High, Medium, Low
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<String>,

    /// Any additional extracted fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Classification {
    /// Look up an additional extracted field
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

fn text_of(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    Ok(text_of(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(text_of(Value::deserialize(deserializer)?))
}

fn lenient_score<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Remove surrounding code-fence markers and whitespace
#[must_use]
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```JSON"))
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.trim();
    text.strip_suffix("```").unwrap_or(text).trim()
}

/// Parse a raw LLM response into a [`Classification`]
pub fn parse_response(raw: &str) -> Result<Classification> {
    let cleaned = strip_code_fence(raw);
    let value: Value = serde_json::from_str(cleaned).map_err(|e| Error::Response(e.to_string()))?;

    if !value.is_object() {
        return Err(Error::Response(format!(
            "expected a JSON object, got: {cleaned}"
        )));
    }

    serde_json::from_value(value).map_err(|e| Error::Response(e.to_string()))
}
