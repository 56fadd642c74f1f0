//! Parsing of structured JSON from model responses.
//!
//! Models wrap JSON in code fences, prose, or slightly malformed syntax.
//! Extraction strips the wrapping; parsing tries serde first and falls
//! back to `llm_json` repair before giving up.

use serde::de::DeserializeOwned;

/// Extract the JSON payload from a model response.
///
/// Prefers a ```json fence, then the outermost brace span, then the raw
/// response.
pub fn extract_json(response: &str) -> &str {
    if let Some(start) = response.find("```json") {
        let start = start + 7;
        if let Some(end) = response[start..].find("```") {
            return &response[start..start + end];
        }
        return response;
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end > start {
                return &response[start..=end];
            }
        }
    }

    response
}

/// Parse a model response into `T`, repairing malformed JSON if needed.
///
/// Returns `None` when neither standard parsing nor repair produces the
/// expected shape; callers record that as a parse error.
pub fn parse_structured<T: DeserializeOwned>(response: &str) -> Option<T> {
    let json_str = extract_json(response).trim();

    // Fast path: standard parsing.
    if let Ok(value) = serde_json::from_str::<T>(json_str) {
        return Some(value);
    }

    // Slow path: attempt repair.
    tracing::debug!("Structured parse failed, attempting JSON repair");
    match llm_json::loads(json_str, &Default::default()) {
        Ok(value) => match serde_json::from_value::<T>(value) {
            Ok(parsed) => {
                tracing::debug!("JSON repair succeeded");
                Some(parsed)
            }
            Err(e) => {
                tracing::debug!("Repaired JSON did not match the expected shape: {}", e);
                None
            }
        },
        Err(e) => {
            tracing::debug!("JSON repair failed: {}", e);
            None
        }
    }
}
