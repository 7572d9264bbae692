use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const API_KEY_ENV: &str = "CITYWEATHER_API_KEY";
pub const API_HOST_ENV: &str = "CITYWEATHER_API_HOST";
pub const BASE_URL_ENV: &str = "CITYWEATHER_BASE_URL";

/// Connection settings for the weather provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,

    /// Sent as `X-RapidAPI-Host`.
    pub host: String,

    /// Language code appended to the request path.
    pub language: String,

    /// Usually left out of the file and supplied via `CITYWEATHER_API_KEY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout; `None` keeps the HTTP client default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://open-weather13.p.rapidapi.com".to_string(),
            host: "open-weather13.p.rapidapi.com".to_string(),
            language: "EN".to_string(),
            api_key: None,
            timeout_secs: None,
        }
    }
}

/// Unit labels shown next to provider values.
///
/// Values are never converted. These labels record what the configured
/// provider endpoint is assumed to return.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub temperature_unit: String,
    pub wind_unit: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            temperature_unit: "°C".to_string(),
            wind_unit: "km/h".to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_city = "London"
///
/// [provider]
/// host = "open-weather13.p.rapidapi.com"
///
/// [display]
/// wind_unit = "m/s"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_city: String,
    pub provider: ProviderConfig,
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_city: crate::app::DEFAULT_QUERY.to_string(),
            provider: ProviderConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// Load from the platform config file, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_resolved(&path)
    }

    /// Load from `path`, then apply environment overrides.
    pub fn load_resolved(path: &Path) -> Result<Self> {
        let mut cfg = Self::load_from(path)?;
        cfg.apply_env_from(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    /// Load config from `path`, or return defaults if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config file.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "cityweather", "cityweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Override provider settings from environment-style lookups.
    /// Empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(API_KEY_ENV) {
            self.provider.api_key = Some(key);
        }
        if let Some(host) = get(API_HOST_ENV) {
            self.provider.host = host;
        }
        if let Some(url) = get(BASE_URL_ENV) {
            self.provider.base_url = url;
        }
    }

    /// Returns the API key, if one is configured.
    pub fn api_key(&self) -> Option<&str> {
        self.provider.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Like [`Config::api_key`], but with a hint for the user when absent.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key().ok_or_else(|| {
            anyhow!(
                "No API key configured for the weather provider.\n\
                 Hint: export {API_KEY_ENV}=<key> or run `cityweather configure`."
            )
        })
    }

    /// Set or replace the API key; a blank key clears it.
    pub fn set_api_key(&mut self, api_key: String) {
        self.provider.api_key = if api_key.trim().is_empty() { None } else { Some(api_key) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_point_at_open_weather13() {
        let cfg = Config::default();

        assert_eq!(cfg.default_city, "London");
        assert_eq!(cfg.provider.host, "open-weather13.p.rapidapi.com");
        assert_eq!(cfg.provider.language, "EN");
        assert_eq!(cfg.display.wind_unit, "km/h");
        assert!(cfg.api_key().is_none());
    }

    #[test]
    fn require_api_key_errors_with_hint() {
        let cfg = Config::default();
        let err = cfg.require_api_key().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains(API_KEY_ENV));
        assert!(msg.contains("cityweather configure"));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        cfg.apply_env_from(env(&[
            (API_KEY_ENV, "ENV_KEY"),
            (API_HOST_ENV, "example.test"),
            (BASE_URL_ENV, "http://localhost:9000"),
        ]));

        assert_eq!(cfg.api_key(), Some("ENV_KEY"));
        assert_eq!(cfg.provider.host, "example.test");
        assert_eq!(cfg.provider.base_url, "http://localhost:9000");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        cfg.apply_env_from(env(&[(API_KEY_ENV, "  "), (API_HOST_ENV, "")]));

        assert_eq!(cfg.api_key(), Some("FILE_KEY"));
        assert_eq!(cfg.provider.host, "open-weather13.p.rapidapi.com");
    }

    #[test]
    fn blank_key_clears_it() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.set_api_key(String::new());

        assert!(cfg.api_key().is_none());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("defaults");

        assert_eq!(cfg.default_city, "London");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_city = \"Oslo\"\n[display]\nwind_unit = \"m/s\"\n")
            .expect("write");

        let cfg = Config::load_from(&path).expect("parse");

        assert_eq!(cfg.default_city, "Oslo");
        assert_eq!(cfg.display.wind_unit, "m/s");
        assert_eq!(cfg.display.temperature_unit, "°C");
        assert_eq!(cfg.provider.language, "EN");
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.default_city = "Paris".into();
        cfg.provider.timeout_secs = Some(5);
        cfg.set_api_key("KEY".into());
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.default_city, "Paris");
        assert_eq!(loaded.provider.timeout_secs, Some(5));
        assert_eq!(loaded.api_key(), Some("KEY"));
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_city = [").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
