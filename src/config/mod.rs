#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::{PlannerError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use std::env;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// 服務設定。明確傳入 handler，不在請求處理時讀取環境變數。
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub gemini_api_key: Option<String>,
    pub host: String,
    pub port: u16,
    pub model: String,
    pub api_base_url: String,
    /// 交給 HTTP 傳輸層的逾時；預設不設定
    pub timeout_seconds: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE.to_string(),
            timeout_seconds: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 以任意的變數查詢函式建立設定，方便測試時不動到行程環境
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let port = match lookup("PORT") {
            Some(raw) => parse_var("PORT", &raw)?,
            None => defaults.port,
        };
        let timeout_seconds = match lookup("GEMINI_TIMEOUT_SECONDS") {
            Some(raw) => Some(parse_var("GEMINI_TIMEOUT_SECONDS", &raw)?),
            None => None,
        };

        Ok(Self {
            gemini_api_key: lookup("GEMINI_API_KEY").and_then(normalize_api_key),
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            model: lookup("GEMINI_MODEL").unwrap_or(defaults.model),
            api_base_url: lookup("GEMINI_API_BASE").unwrap_or(defaults.api_base_url),
            timeout_seconds,
        })
    }

    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini_api_key.as_deref()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 空字串或未替換的 `${VAR}` 一律視為沒有設定
pub(crate) fn normalize_api_key(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with("${") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| PlannerError::InvalidConfigValueError {
            field: name.to_string(),
            value: raw.to_string(),
            reason: "Value is not a valid number".to_string(),
        })
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.host)?;
        validate_range("server.port", self.port, 1, u16::MAX)?;
        validate_non_empty_string("gemini.model", &self.model)?;
        validate_url("gemini.base_url", &self.api_base_url)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_range("gemini.timeout_seconds", timeout, 1, 600)?;
        }

        // 缺少金鑰不阻止啟動，請求時才回報設定錯誤
        if self.gemini_api_key.is_none() {
            tracing::warn!("⚠️ GEMINI_API_KEY is not set; plan requests will fail until it is configured");
        }

        tracing::info!("✅ Configuration validation passed");
        Ok(())
    }
}
