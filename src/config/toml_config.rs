use crate::config::{normalize_api_key, AppConfig};
use crate::utils::error::{PlannerError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// `planner.toml` 的結構；所有欄位皆可省略，省略時沿用環境變數或預設值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerSection>,
    pub gemini: Option<GeminiSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiSection {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlannerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PlannerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})；找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").expect("env placeholder pattern is valid");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 將檔案中有填的欄位覆蓋到 `base` 上
    pub fn apply_to(self, mut base: AppConfig) -> AppConfig {
        if let Some(server) = self.server {
            if let Some(host) = server.host {
                base.host = host;
            }
            if let Some(port) = server.port {
                base.port = port;
            }
        }

        if let Some(gemini) = self.gemini {
            if let Some(key) = gemini.api_key {
                base.gemini_api_key = normalize_api_key(key);
            }
            if let Some(model) = gemini.model {
                base.model = model;
            }
            if let Some(base_url) = gemini.base_url {
                base.api_base_url = base_url;
            }
            if gemini.timeout_seconds.is_some() {
                base.timeout_seconds = gemini.timeout_seconds;
            }
        }

        base
    }
}
