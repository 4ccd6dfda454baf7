//! Defensive JSON extraction from model output.
//!
//! Model JSON is an untrusted external format: providers wrap payloads in
//! code fences, prepend prose, or return junk. Every helper here is total
//! from the caller's perspective: parse what can be parsed, drop the rest.

use crate::error::LlmError;

/// Extract the first JSON object from raw model output.
///
/// Strips Markdown code fences and any leading/trailing prose, then parses
/// the span from the first `{` to the last `}`.
pub fn extract_json(raw: &str) -> Result<serde_json::Value, LlmError> {
    let stripped = strip_code_fences(raw);
    let start = stripped
        .find('{')
        .ok_or_else(|| LlmError::MalformedOutput("no JSON object found".to_string()))?;
    let end = stripped
        .rfind('}')
        .ok_or_else(|| LlmError::MalformedOutput("unterminated JSON object".to_string()))?;
    if end < start {
        return Err(LlmError::MalformedOutput(
            "unterminated JSON object".to_string(),
        ));
    }
    serde_json::from_str(&stripped[start..=end])
        .map_err(|e| LlmError::MalformedOutput(e.to_string()))
}

/// Read a string field, returning `None` for missing or wrong-typed values.
pub fn string_field(value: &serde_json::Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Read an array-of-strings field, dropping non-string elements.
/// Missing or wrong-typed fields yield an empty vector.
pub fn string_array(value: &serde_json::Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open.strip_suffix("```").unwrap_or(without_open)
}
