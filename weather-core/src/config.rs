use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{insight::chat, provider::tomorrow};

pub const ENV_WEATHER_API_KEY: &str = "TOMORROW_API_KEY";
pub const ENV_WEATHER_BASE_URL: &str = "TOMORROW_BASE_URL";
pub const ENV_CACHE_URL: &str = "UPSTASH_REDIS_URL";
pub const ENV_CACHE_TOKEN: &str = "UPSTASH_REDIS_TOKEN";
pub const ENV_LLM_API_KEY: &str = "GROK_API_KEY";
pub const ENV_LLM_BASE_URL: &str = "GROK_BASE_URL";
pub const ENV_LLM_MODEL: &str = "WEATHERX_MODEL";
pub const ENV_FRONTEND_URL: &str = "FRONTEND_URL";
pub const ENV_BIND: &str = "WEATHERX_BIND";

/// Upstream weather API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: tomorrow::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Remote cache service. Leaving both unset selects the in-process cache.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CacheConfig {
    pub url: Option<String>,
    pub token: Option<String>,
}

/// Report-generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: chat::DEFAULT_BASE_URL.to_string(),
            model: chat::DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Allowed CORS origin; `*` allows any.
    pub frontend_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            frontend_url: "*".to_string(),
        }
    }
}

/// Top-level configuration.
///
/// Example TOML:
/// [weather]
/// api_key = "..."
///
/// [cache]
/// url = "https://<db>.upstash.io"
/// token = "..."
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub weather: WeatherConfig,
    pub cache: CacheConfig,
    pub llm: LlmConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Load the config file (if any), then apply environment overrides.
    /// A `.env` file in the working directory is honored.
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }

        let mut cfg = Self::load_file()?;
        cfg.apply_env_from(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Override fields from variables returned by `lookup`. Empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get(ENV_WEATHER_API_KEY) {
            self.weather.api_key = Some(v);
        }
        if let Some(v) = get(ENV_WEATHER_BASE_URL) {
            self.weather.base_url = v;
        }
        if let Some(v) = get(ENV_CACHE_URL) {
            self.cache.url = Some(v);
        }
        if let Some(v) = get(ENV_CACHE_TOKEN) {
            self.cache.token = Some(v);
        }
        if let Some(v) = get(ENV_LLM_API_KEY) {
            self.llm.api_key = Some(v);
        }
        if let Some(v) = get(ENV_LLM_BASE_URL) {
            self.llm.base_url = v;
        }
        if let Some(v) = get(ENV_LLM_MODEL) {
            self.llm.model = v;
        }
        if let Some(v) = get(ENV_FRONTEND_URL) {
            self.server.frontend_url = v;
        }
        if let Some(v) = get(ENV_BIND) {
            self.server.bind = v;
        }
    }

    /// Check that the service can start with this config.
    pub fn validate(&self) -> Result<()> {
        let mut issues = Vec::new();

        if self.weather_api_key().is_none() {
            issues.push(format!("{ENV_WEATHER_API_KEY} (weather.api_key) is required"));
        }
        if self.cache.url.is_some() != self.cache.token.is_some() {
            issues.push(format!("{ENV_CACHE_URL} and {ENV_CACHE_TOKEN} must be set together"));
        }
        if self.llm.api_key.is_none() {
            issues.push(format!("{ENV_LLM_API_KEY} (llm.api_key) is required"));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(anyhow!(
                "Invalid configuration:\n  - {}\n\
                 Hint: run `weatherx configure` or set the environment variables.",
                issues.join("\n  - ")
            ))
        }
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherx", "weatherx")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn weather_api_key(&self) -> Option<&str> {
        self.weather.api_key.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_point_at_public_endpoints() {
        let cfg = Config::default();

        assert_eq!(cfg.weather.base_url, "https://api.tomorrow.io/v4");
        assert_eq!(cfg.llm.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(cfg.server.frontend_url, "*");
        assert!(cfg.cache.url.is_none());
        assert!(cfg.cache.token.is_none());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config::from_toml(
            r#"
            [weather]
            api_key = "FILE_KEY"

            [server]
            frontend_url = "https://file.example"
            "#,
        )
        .unwrap();

        cfg.apply_env_from(env(&[
            ("TOMORROW_API_KEY", "ENV_KEY"),
            ("UPSTASH_REDIS_URL", "https://db.upstash.io"),
            ("UPSTASH_REDIS_TOKEN", "TOKEN"),
            ("GROK_API_KEY", "LLM"),
        ]));

        assert_eq!(cfg.weather_api_key(), Some("ENV_KEY"));
        assert_eq!(cfg.server.frontend_url, "https://file.example");
        assert_eq!(cfg.cache.url.as_deref(), Some("https://db.upstash.io"));
        assert_eq!(cfg.cache.token.as_deref(), Some("TOKEN"));
        assert_eq!(cfg.llm.api_key.as_deref(), Some("LLM"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut cfg = Config::default();
        cfg.weather.api_key = Some("KEEP".into());

        cfg.apply_env_from(env(&[("TOMORROW_API_KEY", "   ")]));

        assert_eq!(cfg.weather_api_key(), Some("KEEP"));
    }

    #[test]
    fn validate_reports_every_missing_key() {
        let err = Config::default().validate().unwrap_err().to_string();

        assert!(err.contains("TOMORROW_API_KEY"));
        assert!(err.contains("GROK_API_KEY"));
        assert!(err.contains("Hint: run `weatherx configure`"));
    }

    #[test]
    fn validate_rejects_half_configured_cache() {
        let mut cfg = Config::default();
        cfg.weather.api_key = Some("K".into());
        cfg.llm.api_key = Some("L".into());
        cfg.cache.token = Some("T".into());

        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("must be set together"));
    }

    #[test]
    fn validate_accepts_minimal_config() {
        let mut cfg = Config::default();
        cfg.weather.api_key = Some("K".into());
        cfg.llm.api_key = Some("L".into());

        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn toml_roundtrip_keeps_sections() {
        let mut cfg = Config::default();
        cfg.cache.url = Some("https://db.upstash.io".into());
        cfg.llm.model = "m".into();

        let text = toml::to_string_pretty(&cfg).unwrap();
        let back = Config::from_toml(&text).unwrap();

        assert_eq!(back.cache.url, cfg.cache.url);
        assert_eq!(back.llm.model, "m");
        assert_eq!(back.server.bind, "0.0.0.0:8000");
    }
}
