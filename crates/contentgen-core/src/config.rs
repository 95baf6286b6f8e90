//! Generator configuration: server address, provider endpoint, sampling, limits.
//!
//! Loaded once at startup. Precedence: environment (`CONTENTGEN__*`) > config file
//! (`CONTENTGEN_CONFIG`, default `config/contentgen.toml`, only if present) > defaults.
//! The provider credential is read from `SILICONFLOW_API_KEY` (or `CONTENTGEN_API_KEY`) and is
//! allowed to be absent: requests then fail with a configuration error instead of startup.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.siliconflow.cn/v1";
pub const DEFAULT_MODEL: &str = "deepseek-ai/DeepSeek-V2.5";
pub const DEFAULT_CONFIG_PATH: &str = "config/contentgen.toml";

/// Env vars consulted for the provider credential, in order.
pub const API_KEY_VARS: &[&str] = &["SILICONFLOW_API_KEY", "CONTENTGEN_API_KEY"];

/// Runtime configuration for the dispatcher and the gateway.
///
/// | Key | Default |
/// |-----|---------|
/// | host | 127.0.0.1 |
/// | port | 3000 |
/// | environment | development ("production" hides error details) |
/// | api_base_url | https://api.siliconflow.cn/v1 |
/// | model | deepseek-ai/DeepSeek-V2.5 |
/// | temperature / top_p | 0.7 / 0.9 |
/// | max_tokens | 2000 |
/// | frequency_penalty / presence_penalty | 0.5 / 0.5 |
/// | request_timeout_secs | 60 |
/// | max_sessions | 1024 |
/// | history_limit | 5 |
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub api_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub request_timeout_secs: u64,
    pub max_sessions: usize,
    pub history_limit: usize,
    /// Never read from the config file; see [`API_KEY_VARS`].
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            environment: "development".to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            top_p: 0.9,
            frequency_penalty: 0.5,
            presence_penalty: 0.5,
            request_timeout_secs: 60,
            max_sessions: 1024,
            history_limit: crate::history::DEFAULT_HISTORY_LIMIT,
            api_key: None,
        }
    }
}

impl GeneratorConfig {
    /// Load from `CONTENTGEN_CONFIG` (or the default path), then the environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var("CONTENTGEN_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut cfg = Self::load_from(Path::new(&path))?;
        cfg.api_key = api_key_from_env();
        Ok(cfg)
    }

    /// Load from an explicit file path (skipped when missing) layered over defaults and env.
    /// Does not read the credential.
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        let d = Self::default();
        let builder = config::Config::builder()
            .set_default("host", d.host)?
            .set_default("port", i64::from(d.port))?
            .set_default("environment", d.environment)?
            .set_default("api_base_url", d.api_base_url)?
            .set_default("model", d.model)?
            .set_default("temperature", f64::from(d.temperature))?
            .set_default("max_tokens", i64::from(d.max_tokens))?
            .set_default("top_p", f64::from(d.top_p))?
            .set_default("frequency_penalty", f64::from(d.frequency_penalty))?
            .set_default("presence_penalty", f64::from(d.presence_penalty))?
            .set_default("request_timeout_secs", d.request_timeout_secs as i64)?
            .set_default("max_sessions", d.max_sessions as i64)?
            .set_default("history_limit", d.history_limit as i64)?;

        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        builder
            .add_source(config::Environment::with_prefix("CONTENTGEN").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Sets the credential explicitly (blank keys count as absent).
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into().trim().to_string();
        self.api_key = if key.is_empty() { None } else { Some(key) };
        self
    }

    pub fn is_production(&self) -> bool {
        self.environment.trim().eq_ignore_ascii_case("production")
    }

    /// Whether error reports may carry diagnostic `details`.
    pub fn expose_details(&self) -> bool {
        !self.is_production()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base_url.trim_end_matches('/'))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn api_key_from_env() -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}
