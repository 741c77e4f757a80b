use crate::config::toml_config::TomlConfig;
use crate::config::AppConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "weekend-planner")]
#[command(about = "Weekend budget planner API backed by Google Gemini")]
pub struct CliArgs {
    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the listening host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the listening port (defaults to $PORT or 5000)
    #[arg(short, long)]
    pub port: Option<u16>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliArgs {
    /// 設定優先順序：預設值 < 環境變數 < 設定檔 < 命令列參數
    pub fn resolve(&self) -> Result<AppConfig> {
        self.resolve_over(AppConfig::from_env()?)
    }

    /// 在給定的基礎設定上套用設定檔與命令列參數
    pub fn resolve_over(&self, base: AppConfig) -> Result<AppConfig> {
        let mut config = base;

        if let Some(path) = &self.config {
            tracing::info!("📁 Loading configuration from: {}", path);
            config = TomlConfig::from_file(path)?.apply_to(config);
        }

        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "weekend-planner",
            "--config",
            "planner.toml",
            "--port",
            "8081",
            "-v",
        ]);
        assert_eq!(args.config.as_deref(), Some("planner.toml"));
        assert_eq!(args.port, Some(8081));
        assert!(args.host.is_none());
        assert!(args.verbose);
    }

    fn env_config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| {
            vars.iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        })
        .unwrap()
    }

    #[test]
    fn test_flags_override_resolved_config() {
        let base = env_config(&[("PORT", "7000"), ("HOST", "10.0.0.1")]);
        let args = CliArgs::parse_from(["weekend-planner", "--host", "127.0.0.1", "--port", "9001"]);
        let config = args.resolve_over(base).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9001);
    }

    #[test]
    fn test_file_overrides_env_and_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"[server]\nhost = \"192.168.1.5\"\nport = 8000\n\n[gemini]\nmodel = \"gemini-2.0-flash\"\n",
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let base = env_config(&[("PORT", "7000"), ("GEMINI_API_KEY", "env-key")]);
        let args = CliArgs::parse_from(["weekend-planner", "-c", path.as_str(), "-p", "9002"]);
        let config = args.resolve_over(base).unwrap();

        assert_eq!(config.host, "192.168.1.5");
        assert_eq!(config.port, 9002);
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.gemini_api_key(), Some("env-key"));
    }
}
