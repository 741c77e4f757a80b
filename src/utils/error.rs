use crate::utils::validation::ValidationError;
use thiserror::Error;

/// 前端看到的通用錯誤訊息，避免洩漏模型回應內容
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate budget plan. Please try again.";

pub const MISSING_API_KEY_MESSAGE: &str = "Google Gemini API key is not configured";

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Invalid request data: {0}")]
    InvalidRequest(ValidationError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("No response from Gemini API")]
    UpstreamEmptyResponse,

    #[error("Gemini API returned malformed JSON: {0}")]
    UpstreamMalformedJson(#[source] serde_json::Error),

    #[error("Gemini API response failed schema validation: {0}")]
    UpstreamSchemaViolation(ValidationError),

    #[error("Gemini API returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 使用者輸入錯誤，修正後重送即可
    Client,
    /// 部署設定問題，使用者無法自行修復
    Configuration,
    /// 外部 AI 服務造成的錯誤
    Upstream,
    Internal,
}

impl PlannerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PlannerError::InvalidRequest(_) => ErrorCategory::Client,
            PlannerError::ConfigError { .. } | PlannerError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            PlannerError::UpstreamEmptyResponse
            | PlannerError::UpstreamMalformedJson(_)
            | PlannerError::UpstreamSchemaViolation(_)
            | PlannerError::UpstreamStatus { .. }
            | PlannerError::ApiError(_) => ErrorCategory::Upstream,
            PlannerError::IoError(_) => ErrorCategory::Internal,
        }
    }

    /// HTTP 狀態碼：只有請求驗證失敗是 400，其餘皆為 500
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Client => 400,
            _ => 500,
        }
    }

    /// 回傳給呼叫端的訊息。上游錯誤細節只寫進日誌。
    pub fn user_friendly_message(&self) -> String {
        match self {
            PlannerError::InvalidRequest(_) => "Invalid request data".to_string(),
            PlannerError::ConfigError { message } => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// 驗證錯誤的欄位細節，只有用戶端錯誤才會帶出
    pub fn details(&self) -> Option<String> {
        match self {
            PlannerError::InvalidRequest(err) => Some(err.to_string()),
            _ => None,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Client => "Correct the highlighted fields and submit again",
            ErrorCategory::Configuration => "Set GEMINI_API_KEY or the [gemini] api_key entry",
            ErrorCategory::Upstream => "Retry the request; the model response was unusable",
            ErrorCategory::Internal => "Check the server logs",
        }
    }

    /// 轉成 `{ error, details? }` 回應主體
    pub fn to_response_body(&self) -> serde_json::Value {
        match self.details() {
            Some(details) => serde_json::json!({
                "error": self.user_friendly_message(),
                "details": details,
            }),
            None => serde_json::json!({ "error": self.user_friendly_message() }),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
