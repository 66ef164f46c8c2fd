//! Best-effort normalization of model output into JSON.
//!
//! Models asked for "ONLY valid JSON" still routinely wrap the payload in a
//! fenced code block or an envelope object. This module strips the noise and
//! hands downstream decoders a plain array or object. Unparseable text is
//! logged and becomes an empty array — "no usable signal this round", never
//! a hard failure.

use serde_json::Value;

/// Envelope keys models use when they wrap a requested array in an object.
const WRAPPER_KEYS: [&str; 5] = ["queries", "results", "threads", "signals", "data"];

/// How much of an unparseable response to keep in the log.
const LOG_EXCERPT_CHARS: usize = 500;

/// Parse raw model text into a JSON value, tolerating formatting noise.
///
/// - Strips a surrounding fenced code block (` ``` ` or ` ```json `).
/// - If the parsed value is an object with exactly one known wrapper key
///   holding an array, returns that inner array instead.
/// - On parse failure, logs a bounded excerpt and returns an empty array.
#[must_use]
pub fn normalize_response(raw: &str) -> Value {
    let text = strip_fences(raw.trim());

    match serde_json::from_str::<Value>(text) {
        Ok(parsed) => unwrap_envelope(parsed),
        Err(e) => {
            let excerpt: String = text.chars().take(LOG_EXCERPT_CHARS).collect();
            tracing::error!(error = %e, excerpt = %excerpt, "model output is not valid JSON");
            Value::Array(Vec::new())
        }
    }
}

/// Drop the first line and trailing marker of a fenced block, if present.
fn strip_fences(text: &str) -> &str {
    if !text.starts_with("```") {
        return text;
    }
    let body = match text.split_once('\n') {
        Some((_fence_line, rest)) => rest,
        None => return text,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Unwrap `{"queries": [...]}`-style envelopes around a requested array.
fn unwrap_envelope(parsed: Value) -> Value {
    if let Value::Object(ref map) = parsed {
        for key in WRAPPER_KEYS {
            if let Some(Value::Array(_)) = map.get(key) {
                // Clone is bounded by prompt-sized payloads.
                return map[key].clone();
            }
        }
    }
    parsed
}
