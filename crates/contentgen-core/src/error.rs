//! Error taxonomy for a generation request and its user-facing report.

use serde::Serialize;
use thiserror::Error;

/// Message returned when the prompt is missing or blank.
pub const MSG_PROMPT_REQUIRED: &str = "请提供提示词";
/// Message returned when no provider credential is configured.
pub const MSG_MISSING_API_KEY: &str = "未配置 API 密钥";
/// Message returned when the provider answered without usable content.
pub const MSG_EMPTY_RESPONSE: &str = "API 返回内容为空";

/// Result alias for dispatcher operations.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Errors that can end a generation request. None of them are retried.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// Prompt missing or whitespace-only. Raised before any outbound call.
    #[error("{}", MSG_PROMPT_REQUIRED)]
    Validation,

    /// Provider credential not configured.
    #[error("{}", MSG_MISSING_API_KEY)]
    Configuration,

    /// Provider answered with a non-success status, or the transport failed (`status: None`).
    #[error("API请求失败: {}", upstream_reason(.status, .detail))]
    Upstream { status: Option<u16>, detail: String },

    /// Provider answered 2xx but the first choice had no text.
    #[error("{}", MSG_EMPTY_RESPONSE)]
    EmptyResponse,
}

impl GenerateError {
    /// HTTP status the gateway answers with.
    pub fn http_status(&self) -> u16 {
        match self {
            GenerateError::Validation => 400,
            _ => 500,
        }
    }

    /// Diagnostic text suitable for non-production `details`.
    fn diagnostic(&self) -> Option<String> {
        match self {
            GenerateError::Upstream { detail, .. } if !detail.is_empty() => Some(detail.clone()),
            GenerateError::Configuration => {
                Some("set SILICONFLOW_API_KEY in the environment or .env".to_string())
            }
            _ => None,
        }
    }

    /// Normalizes the error into the `{error, details?}` shape.
    pub fn report(&self, expose_details: bool) -> ErrorReport {
        ErrorReport {
            message: self.to_string(),
            details: if expose_details { self.diagnostic() } else { None },
        }
    }
}

fn upstream_reason(status: &Option<u16>, detail: &str) -> String {
    match status {
        Some(code) => code.to_string(),
        None => detail.to_string(),
    }
}

/// Uniform failure shape seen by HTTP clients and the surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    #[serde(rename = "error")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_is_in_message() {
        let err = GenerateError::Upstream {
            status: Some(503),
            detail: "service unavailable".into(),
        };
        assert_eq!(err.to_string(), "API请求失败: 503");
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn transport_failure_without_status_uses_detail() {
        let err = GenerateError::Upstream {
            status: None,
            detail: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "API请求失败: connection refused");
    }

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(GenerateError::Validation.http_status(), 400);
        assert_eq!(GenerateError::Validation.to_string(), MSG_PROMPT_REQUIRED);
    }

    #[test]
    fn details_hidden_in_production() {
        let err = GenerateError::Upstream {
            status: Some(502),
            detail: "bad gateway".into(),
        };
        assert_eq!(err.report(true).details.as_deref(), Some("bad gateway"));
        assert_eq!(err.report(false).details, None);
    }

    #[test]
    fn report_serializes_as_error_field() {
        let json = serde_json::to_value(ErrorReport::new("x")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "x" }));
    }
}
