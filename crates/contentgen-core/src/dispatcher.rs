//! Prompt Dispatcher: validates a request, frames it with the category prefix, and makes one
//! chat-completion call. Stateless; share it behind an `Arc`.

use chrono::Utc;
use std::sync::Arc;

use crate::config::GeneratorConfig;
use crate::error::{GenerateError, GenerateResult};
use crate::provider::{
    ChatCompletionRequest, ChatMessage, CompletionBackend, HttpCompletionBackend, ResponseFormat,
};
use crate::types::{GenerationRequest, GenerationResult};

/// Turns a `GenerationRequest` into a `GenerationResult` via the provider. Single attempt,
/// no retry.
pub struct PromptDispatcher {
    config: Arc<GeneratorConfig>,
    backend: Arc<dyn CompletionBackend>,
}

impl PromptDispatcher {
    pub fn new(config: Arc<GeneratorConfig>, backend: Arc<dyn CompletionBackend>) -> Self {
        Self { config, backend }
    }

    /// Dispatcher talking to the configured provider over HTTP.
    pub fn from_config(config: Arc<GeneratorConfig>) -> Self {
        let backend = HttpCompletionBackend::new(config.completions_url(), config.request_timeout());
        Self::new(config, Arc::new(backend))
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Two-message exchange with the fixed sampling parameters.
    pub fn build_completion_request(&self, request: &GenerationRequest) -> ChatCompletionRequest {
        let cfg = &self.config;
        ChatCompletionRequest {
            model: cfg.model.clone(),
            messages: vec![
                ChatMessage::system(request.category.instruction_prefix()),
                ChatMessage::user(request.prompt.clone()),
            ],
            stream: false,
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
            top_p: Some(cfg.top_p),
            frequency_penalty: Some(cfg.frequency_penalty),
            presence_penalty: Some(cfg.presence_penalty),
            response_format: Some(ResponseFormat {
                kind: "text".to_string(),
            }),
        }
    }

    pub async fn generate(&self, request: GenerationRequest) -> GenerateResult<GenerationResult> {
        if !request.has_prompt() {
            tracing::warn!(category = %request.category, "rejected generation request with empty prompt");
            return Err(GenerateError::Validation);
        }

        let Some(api_key) = self.config.api_key.as_deref() else {
            tracing::warn!("generation requested but no provider API key is configured");
            return Err(GenerateError::Configuration);
        };

        tracing::info!(
            category = %request.category,
            prompt_chars = request.prompt.chars().count(),
            model = %self.config.model,
            "dispatching generation request"
        );

        let body = self.build_completion_request(&request);
        let response = match self.backend.complete(api_key, &body).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "provider call failed");
                return Err(e);
            }
        };

        let Some(content) = response.first_content() else {
            tracing::error!(category = %request.category, "provider returned no content");
            return Err(GenerateError::EmptyResponse);
        };

        Ok(GenerationResult::new(content, request.category, Utc::now()))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory backend shared by dispatcher and surface tests.

    use super::*;
    use crate::provider::ChatCompletionResponse;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted outcomes in order and records every request it receives.
    #[derive(Default)]
    pub struct ScriptedBackend {
        script: Mutex<VecDeque<GenerateResult<ChatCompletionResponse>>>,
        pub calls: Mutex<Vec<ChatCompletionRequest>>,
    }

    impl ScriptedBackend {
        pub fn reply(self, content: &str) -> Self {
            self.script
                .lock()
                .unwrap()
                .push_back(Ok(ChatCompletionResponse::with_content(content)));
            self
        }

        pub fn empty(self) -> Self {
            self.script
                .lock()
                .unwrap()
                .push_back(Ok(ChatCompletionResponse::default()));
            self
        }

        pub fn status(self, code: u16) -> Self {
            self.script.lock().unwrap().push_back(Err(GenerateError::Upstream {
                status: Some(code),
                detail: String::new(),
            }));
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn complete(
            &self,
            _api_key: &str,
            request: &ChatCompletionRequest,
        ) -> GenerateResult<ChatCompletionResponse> {
            self.calls.lock().unwrap().push(request.clone());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ChatCompletionResponse::with_content("default reply")))
        }
    }

    pub fn dispatcher_with(backend: Arc<ScriptedBackend>) -> PromptDispatcher {
        let config = GeneratorConfig::default().with_api_key("sk-test");
        PromptDispatcher::new(Arc::new(config), backend)
    }
}
