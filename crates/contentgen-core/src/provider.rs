//! Chat-completion provider client (OpenAI-compatible wire format).
//!
//! `CompletionBackend` is the seam between the dispatcher and the network. The reqwest
//! implementation posts one non-streamed request and reports non-2xx statuses as
//! `GenerateError::Upstream`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{GenerateError, GenerateResult};

/// Chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

/// Request body for `/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

/// Non-streamed response. Every level is optional so a thin reply degrades to "no content"
/// instead of a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Option<Vec<ChatChoice>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if it has any visible characters.
    pub fn first_content(self) -> Option<String> {
        self.choices
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|s| !s.trim().is_empty())
    }

    /// Single-choice response; handy for backends that synthesize replies.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            choices: Some(vec![ChatChoice {
                message: Some(ChoiceMessage {
                    content: Some(content.into()),
                }),
            }]),
        }
    }
}

/// Something that can answer a chat-completion request.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> GenerateResult<ChatCompletionResponse>;
}

/// reqwest-backed provider client. Cheap to clone; share one per process.
#[derive(Clone)]
pub struct HttpCompletionBackend {
    client: reqwest::Client,
    url: String,
}

impl HttpCompletionBackend {
    /// Client with the given completions URL and request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "client builder failed, falling back to default client without timeout");
                reqwest::Client::new()
            });
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CompletionBackend for HttpCompletionBackend {
    async fn complete(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> GenerateResult<ChatCompletionResponse> {
        let res = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| GenerateError::Upstream {
                status: None,
                detail: e.to_string(),
            })?;

        let status = res.status();
        if !status.is_success() {
            return Err(GenerateError::Upstream {
                status: Some(status.as_u16()),
                detail: res.text().await.unwrap_or_default(),
            });
        }

        let text = res.text().await.map_err(|e| GenerateError::Upstream {
            status: None,
            detail: e.to_string(),
        })?;

        // A 2xx body we cannot read has no usable content.
        match serde_json::from_str::<ChatCompletionResponse>(&text) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                tracing::warn!(error = %e, "unparseable completion body");
                Ok(ChatCompletionResponse::default())
            }
        }
    }
}
