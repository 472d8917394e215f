//! Best-effort repair of malformed JSON from LLM replies.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static FENCE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)```json\s*").unwrap());
static FENCE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```\s*$").unwrap());
static OBJECT_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[\s\S]*\}").unwrap());

static BARE_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+):").unwrap());
static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",(\s*[}\]])").unwrap());
static MISSING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r#""\s*\n\s*""#).unwrap());
static EMPTY_ARRAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\s*\]").unwrap());
static BOOL_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r":\s*(true|false)\s*([,}])").unwrap());
static NULL_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r":\s*null\s*([,}])").unwrap());

fn parses(text: &str) -> bool {
    serde_json::from_str::<Value>(text).is_ok()
}

/// Attempt to turn `text` into parseable JSON.
///
/// Returns the cleaned text if it already parses, the repaired text if the
/// fixes worked, and the original input otherwise.
pub fn try_repair_json(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let unfenced = FENCE_OPEN.replace_all(text, "");
    let unfenced = FENCE_CLOSE.replace_all(&unfenced, "");
    let mut cleaned = unfenced.trim().to_string();

    if parses(&cleaned) {
        return cleaned;
    }

    if let Some(m) = OBJECT_SPAN.find(&cleaned) {
        cleaned = m.as_str().to_string();
    }

    let repaired = BARE_KEY.replace_all(&cleaned, "\"${1}\":");
    let repaired = repaired.replace('\'', "\"");
    let repaired = TRAILING_COMMA.replace_all(&repaired, "${1}");
    let repaired = MISSING_COMMA.replace_all(&repaired, "\",\n\"");
    let repaired = EMPTY_ARRAY.replace_all(&repaired, "[]");
    let repaired = BOOL_VALUE.replace_all(&repaired, ": ${1}${2}");
    let repaired = NULL_VALUE.replace_all(&repaired, ": null${1}");

    if parses(&repaired) {
        repaired.into_owned()
    } else {
        tracing::debug!(len = text.len(), "JSON repair failed, returning input");
        text.to_string()
    }
}

/// Parse `text`, falling back to [`try_repair_json`]. `None` if both fail.
pub fn parse_json_safe(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }
    serde_json::from_str(text)
        .ok()
        .or_else(|| serde_json::from_str(&try_repair_json(text)).ok())
}
