//! Request/result values and the `/generate` wire envelope.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::category::ContentCategory;

/// One user submission. Built per request and dropped after dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub category: ContentCategory,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, category: ContentCategory) -> Self {
        Self {
            prompt: prompt.into(),
            category,
        }
    }

    /// True when the prompt has visible characters.
    pub fn has_prompt(&self) -> bool {
        !self.prompt.trim().is_empty()
    }
}

/// Text produced by the provider for one request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    content: String,
    category: ContentCategory,
    timestamp: DateTime<Utc>,
}

impl GenerationResult {
    pub fn new(content: String, category: ContentCategory, timestamp: DateTime<Utc>) -> Self {
        Self {
            content,
            category,
            timestamp,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn category(&self) -> ContentCategory {
        self.category
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// `POST /generate` request body. Both fields are optional on the wire so a missing prompt
/// reaches validation instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateBody {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl GenerateBody {
    pub fn into_request(self) -> GenerationRequest {
        GenerationRequest {
            prompt: self.prompt.unwrap_or_default(),
            category: ContentCategory::from_tag(self.kind.as_deref()),
        }
    }
}

/// `POST /generate` success envelope: content plus echoed `type` and ISO-8601 `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: String,
}

impl From<&GenerationResult> for GenerateResponse {
    fn from(r: &GenerationResult) -> Self {
        Self {
            content: r.content.clone(),
            kind: r.category.tag().to_string(),
            timestamp: r.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn body_without_type_defaults_to_general() {
        let body: GenerateBody = serde_json::from_str(r#"{"prompt":"hi"}"#).unwrap();
        let req = body.into_request();
        assert_eq!(req.category, ContentCategory::General);
        assert_eq!(req.prompt, "hi");
    }

    #[test]
    fn body_without_prompt_is_still_parsed() {
        let body: GenerateBody = serde_json::from_str(r#"{"type":"social"}"#).unwrap();
        let req = body.into_request();
        assert!(!req.has_prompt());
        assert_eq!(req.category, ContentCategory::Social);
    }

    #[test]
    fn response_echoes_type_and_iso_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 21, 8, 30, 0).unwrap();
        let result = GenerationResult::new("春天".into(), ContentCategory::Article, ts);
        let json = serde_json::to_value(GenerateResponse::from(&result)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "content": "春天",
                "type": "article",
                "timestamp": "2024-03-21T08:30:00.000Z"
            })
        );
    }
}
