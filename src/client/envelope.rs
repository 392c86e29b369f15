//! Wire format of the generateContent API
//!
//! Request: `{"contents":[{"parts":[{"text":"<prompt>"}]}]}`.
//! Response: model text at `candidates[0].content.parts[0].text`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

impl GenerateRequest {
    pub fn new(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

/// Pull the first candidate's text out of a success body
///
/// The error string describes which part of the expected path was missing.
pub fn extract_text(body: &str) -> Result<String, String> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| format!("body is not a JSON envelope: {}", e))?;

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| "response has no candidates".to_string())?;
    let content = candidate
        .content
        .ok_or_else(|| "first candidate has no content".to_string())?;
    content
        .parts
        .into_iter()
        .next()
        .and_then(|part| part.text)
        .ok_or_else(|| "first candidate has no text part".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GenerateRequest::new("hello")).expect("serializes");
        assert_eq!(body, json!({"contents": [{"parts": [{"text": "hello"}]}]}));
    }

    #[test]
    fn test_extract_text_from_success_body() {
        let body = json!({
            "candidates": [{
                "content": {"parts": [{"text": "first"}, {"text": "second"}], "role": "model"},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"totalTokenCount": 12}
        })
        .to_string();
        assert_eq!(extract_text(&body), Ok("first".to_string()));
    }

    #[test]
    fn test_extract_text_reports_missing_path() {
        assert_eq!(
            extract_text(r#"{"candidates": []}"#),
            Err("response has no candidates".to_string())
        );
        assert_eq!(
            extract_text(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#),
            Err("first candidate has no content".to_string())
        );
        assert_eq!(
            extract_text(r#"{"candidates": [{"content": {"parts": []}}]}"#),
            Err("first candidate has no text part".to_string())
        );
        assert!(extract_text("<html>").is_err());
    }
}
