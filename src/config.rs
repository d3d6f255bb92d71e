use std::env;
use std::time::Duration;

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// Bearer credential for the completion service. Absence is reported per
    /// request, not at startup.
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    #[serde(default = "default_site_url")]
    pub url: String,
    #[serde(default = "default_site_name")]
    pub name: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: default_site_url(),
            name: default_site_name(),
        }
    }
}

fn default_site_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_site_name() -> String {
    "NutriPlan".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy environment variables (OPENROUTER_API_KEY, NEXT_PUBLIC_APP_URL)
    /// 2. Prefixed environment variables (NUTRIPLAN__LLM__API_KEY, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("llm.base_url", nutriplan_llm::DEFAULT_BASE_URL)?
            .set_default("llm.model", nutriplan_mealplan::DEFAULT_MODEL)?
            .set_default(
                "llm.temperature",
                f64::from(nutriplan_mealplan::DEFAULT_TEMPERATURE),
            )?
            .set_default(
                "llm.max_tokens",
                i64::from(nutriplan_mealplan::DEFAULT_MAX_TOKENS),
            )?
            .set_default(
                "llm.timeout_secs",
                nutriplan_llm::DEFAULT_TIMEOUT.as_secs() as i64,
            )?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional: a missing file just means defaults + environment
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("NUTRIPLAN")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(api_key) = env::var("OPENROUTER_API_KEY") {
            builder = builder.set_override("llm.api_key", api_key)?;
        }
        if let Ok(site_url) = env::var("NEXT_PUBLIC_APP_URL") {
            builder = builder.set_override("site.url", site_url)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err("LLM temperature must be between 0.0 and 2.0".to_string());
        }
        if self.llm.max_tokens == 0 {
            return Err("LLM max_tokens must be greater than 0".to_string());
        }
        if self.llm.timeout_secs == 0 {
            return Err("LLM timeout_secs must be greater than 0".to_string());
        }
        if self.llm.base_url.trim().is_empty() {
            return Err("LLM base_url must not be empty".to_string());
        }
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.llm
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            llm: LlmConfig {
                api_key: Some("sk-or-test".to_string()),
                base_url: "https://openrouter.ai/api/v1".to_string(),
                model: "microsoft/phi-3-medium-128k-instruct:free".to_string(),
                temperature: 0.7,
                max_tokens: 1000,
                timeout_secs: 60,
            },
            site: SiteConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validation_zero_port() {
        let mut config = valid_config();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_temperature_out_of_range() {
        let mut config = valid_config();
        config.llm.temperature = 2.5;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_max_tokens() {
        let mut config = valid_config();
        config.llm.max_tokens = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_api_key_is_still_valid() {
        let mut config = valid_config();
        config.llm.api_key = None;

        assert!(config.validate().is_ok());
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_blank_api_key_is_not_a_key() {
        let mut config = valid_config();
        config.llm.api_key = Some("  ".to_string());

        assert!(!config.has_api_key());
    }

    #[test]
    fn test_load_defaults_from_missing_file() {
        let config = Config::load(Some("does/not/exist.toml".to_string())).unwrap();

        assert_eq!(config.llm.model, "microsoft/phi-3-medium-128k-instruct:free");
        assert_eq!(config.llm.max_tokens, 1000);
        assert_eq!(config.llm.timeout(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }
}
