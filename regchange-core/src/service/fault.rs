//! Best-effort message extraction from backend fault payloads.

use serde_json::Value;

/// Shown when a fault carries nothing readable at all.
pub const UNKNOWN_FAULT_MESSAGE: &str = "An unknown error occurred";

/// Pulls the most useful human-readable text out of a fault payload.
///
/// Resolution order:
/// 1. the payload itself, if it is a string;
/// 2. `body.message` (structured server fault);
/// 3. `message` (generic error object);
/// 4. the raw payload rendered as JSON.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use regchange_core::service::extract_fault_message;
///
/// assert_eq!(extract_fault_message(&json!("boom")), "boom");
/// assert_eq!(extract_fault_message(&json!({"body": {"message": "X"}})), "X");
/// assert_eq!(extract_fault_message(&json!({"message": "Y"})), "Y");
/// ```
pub fn extract_fault_message(payload: &Value) -> String {
    if let Some(text) = non_empty_str(payload) {
        return text.to_string();
    }

    if let Some(text) = payload
        .get("body")
        .and_then(|body| body.get("message"))
        .and_then(non_empty_str)
    {
        return text.to_string();
    }

    if let Some(text) = payload.get("message").and_then(non_empty_str) {
        return text.to_string();
    }

    match payload {
        Value::Null => UNKNOWN_FAULT_MESSAGE.to_string(),
        Value::String(_) => UNKNOWN_FAULT_MESSAGE.to_string(),
        other => other.to_string(),
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}
