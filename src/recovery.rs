//! Recovery of structured data from free-text model output
//!
//! Models asked for "only JSON" still wrap it in markdown fences, prepend
//! chatter, or trail explanations. Recovery runs three increasingly lenient
//! stages and the first success wins:
//!
//! 1. **Direct**: strict parse of the whole text.
//! 2. **Cleaned**: strip code fences, trim, then parse the outermost `{...}`
//!    span, or the outermost `[...]` span when there is no object span.
//! 3. **Scan**: walk the *original* text for the first position where an
//!    object or array literal parses, ignoring whatever follows it.
//!
//! Failure of all three stages is not an error: callers get `None` and fall
//! back to synthesized data.

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::LazyLock;

/// Which recovery stage produced a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStage {
    Direct,
    Cleaned,
    Scan,
}

impl RecoveryStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Cleaned => "cleaned",
            Self::Scan => "scan",
        }
    }
}

/// A value recovered from model output together with the stage that found it
#[derive(Debug, Clone, PartialEq)]
pub struct Recovered {
    pub value: Value,
    pub stage: RecoveryStage,
}

static LITERAL_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\{\[]").expect("literal start pattern is valid"));

/// Parse raw model output, returning `None` when nothing can be recovered
pub fn parse(raw: &str) -> Option<Value> {
    parse_with_stage(raw).map(|recovered| recovered.value)
}

/// Parse raw model output and report which stage succeeded
pub fn parse_with_stage(raw: &str) -> Option<Recovered> {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return Some(Recovered {
            value,
            stage: RecoveryStage::Direct,
        });
    }

    if let Some(value) = parse_cleaned(raw) {
        tracing::debug!(raw_length = raw.len(), "Recovered model output after cleaning");
        return Some(Recovered {
            value,
            stage: RecoveryStage::Cleaned,
        });
    }

    if let Some(value) = scan_for_literal(raw) {
        tracing::debug!(raw_length = raw.len(), "Recovered model output by scanning");
        return Some(Recovered {
            value,
            stage: RecoveryStage::Scan,
        });
    }

    let preview: String = raw.chars().take(200).collect();
    tracing::debug!(
        raw_length = raw.len(),
        preview = %preview,
        "All recovery stages failed for model output"
    );
    None
}

/// Recover and deserialize into a concrete type
///
/// A value that is recovered but does not match `T` counts as unrecoverable.
pub fn parse_as<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let recovered = parse_with_stage(raw)?;
    match serde_json::from_value(recovered.value) {
        Ok(typed) => Some(typed),
        Err(e) => {
            tracing::debug!(
                stage = recovered.stage.as_str(),
                error = %e,
                "Recovered value does not match the expected shape"
            );
            None
        }
    }
}

/// Remove a leading ```` ```json ```` or bare ```` ``` ```` fence and a trailing fence
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```JSON") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

fn outer_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

fn parse_cleaned(raw: &str) -> Option<Value> {
    let cleaned = strip_code_fences(raw);

    // Object spans win over array spans even when the array appears first.
    let span = outer_span(cleaned, '{', '}').or_else(|| outer_span(cleaned, '[', ']'))?;
    serde_json::from_str(span).ok()
}

fn scan_for_literal(raw: &str) -> Option<Value> {
    LITERAL_START.find_iter(raw).find_map(|m| {
        let mut values = serde_json::Deserializer::from_str(&raw[m.start()..]).into_iter::<Value>();
        match values.next() {
            Some(Ok(value)) if value.is_object() || value.is_array() => Some(value),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_json_uses_direct_stage() {
        let recovered = parse_with_stage(r#"{"category": "Books"}"#).unwrap();
        assert_eq!(recovered.stage, RecoveryStage::Direct);
        assert_eq!(recovered.value, json!({"category": "Books"}));
    }

    #[test]
    fn test_language_tagged_fence_is_stripped() {
        let raw = "```json\n{\"a\": 1}\n```";
        let recovered = parse_with_stage(raw).unwrap();
        assert_eq!(recovered.stage, RecoveryStage::Cleaned);
        assert_eq!(recovered.value, json!({"a": 1}));
    }

    #[test]
    fn test_bare_fence_is_stripped() {
        let raw = "```\n[1, 2, 3]\n```";
        let recovered = parse_with_stage(raw).unwrap();
        assert_eq!(recovered.stage, RecoveryStage::Cleaned);
        assert_eq!(recovered.value, json!([1, 2, 3]));
    }

    #[test]
    fn test_fenced_block_with_surrounding_prose() {
        let raw = "Sure! Here is the analysis:\n```json\n{\"trend\": \"stable\"}\n```\nLet me know.";
        assert_eq!(parse(raw), Some(json!({"trend": "stable"})));
    }

    #[test]
    fn test_object_span_preferred_over_array_span() {
        let raw = "Lists like [1] aside, the answer is {\"items\": [2, 3]}";
        let recovered = parse_with_stage(raw).unwrap();
        assert_eq!(recovered.stage, RecoveryStage::Cleaned);
        assert_eq!(recovered.value, json!({"items": [2, 3]}));
    }

    #[test]
    fn test_array_span_used_when_no_object() {
        let raw = "Categories: [\"Books\", \"Education\"] hope that helps";
        assert_eq!(parse(raw), Some(json!(["Books", "Education"])));
    }

    #[test]
    fn test_scan_recovers_when_trailing_brace_breaks_outer_span() {
        // The outermost {...} span runs into the trailing "{notes}" and fails
        // to parse, so only the scan stage can recover the first literal.
        let raw = "Result: {\"priceRange\": \"₹200 - ₹2,000\"} (see {notes})";
        let recovered = parse_with_stage(raw).unwrap();
        assert_eq!(recovered.stage, RecoveryStage::Scan);
        assert_eq!(recovered.value, json!({"priceRange": "₹200 - ₹2,000"}));
    }

    #[test]
    fn test_scan_skips_unparseable_candidates() {
        let raw = "{oops} then [\"ok\"] and {\"also\": true";
        let recovered = parse_with_stage(raw).unwrap();
        assert_eq!(recovered.stage, RecoveryStage::Scan);
        assert_eq!(recovered.value, json!(["ok"]));
    }

    #[test]
    fn test_unrecoverable_text_returns_none() {
        assert_eq!(parse("I cannot help with that request."), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("{ not json at all }"), None);
    }

    #[test]
    fn test_scalar_json_is_accepted_by_direct_stage_only() {
        // A bare string is valid JSON; only the scan stage insists on containers.
        assert_eq!(parse(r#""hello""#), Some(json!("hello")));
    }

    #[test]
    fn test_parse_as_rejects_wrong_shape() {
        #[derive(serde::Deserialize, Debug)]
        struct Needs {
            #[allow(dead_code)]
            required: String,
        }
        assert!(parse_as::<Needs>(r#"{"other": 1}"#).is_none());
        assert!(parse_as::<Needs>(r#"```json {"required": "x"} ```"#).is_some());
    }

    #[test]
    fn test_strip_code_fences_leaves_plain_text() {
        assert_eq!(strip_code_fences("  plain  "), "plain");
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
    }

    #[test]
    fn test_utf8_prefix_before_literal_is_handled() {
        let raw = "₹₹₹ → {\"price\": \"₹1,499\"}";
        assert_eq!(parse(raw), Some(json!({"price": "₹1,499"})));
    }
}
