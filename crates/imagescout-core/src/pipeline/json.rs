//! Lenient JSON extraction from model output.

use serde_json::Value;

/// Parse the JSON object a model was asked to return.
///
/// Accepts the bare object, an object inside a markdown code fence, or an
/// object surrounded by prose. Returns `None` if no object parses.
pub(crate) fn extract_json_object(raw: &str) -> Option<Value> {
    let trimmed = strip_code_fence(raw.trim());
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&trimmed[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening fence line.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
