use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::model::Coordinates;

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// request_timeout_secs = 10
///
/// [default_location]
/// latitude = 40.0379
/// longitude = -75.3433
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,

    /// When false the location source behaves as if permission was denied.
    #[serde(default = "default_true")]
    pub allow_location: bool,

    /// Requests wait indefinitely when unset.
    pub request_timeout_secs: Option<u64>,

    /// Override for the provider base URL, e.g. a caching proxy.
    pub base_url: Option<String>,

    /// Used in place of a device position when no coordinates are given.
    pub default_location: Option<Coordinates>,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            default_location: None,
            allow_location: true,
            request_timeout_secs: None,
            base_url: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
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
        let dirs = ProjectDirs::from("dev", "skycheck", "skycheck")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key from the environment, falling back to the stored one.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_with_env(std::env::var(API_KEY_ENV).ok())
    }

    fn api_key_with_env(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_key_wins_over_file() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        assert_eq!(cfg.api_key_with_env(Some("ENV_KEY".into())).as_deref(), Some("ENV_KEY"));
        assert_eq!(cfg.api_key_with_env(None).as_deref(), Some("FILE_KEY"));
    }

    #[test]
    fn blank_keys_count_as_missing() {
        let mut cfg = Config::default();
        assert_eq!(cfg.api_key_with_env(Some("   ".into())), None);

        cfg.api_key = Some(String::new());
        assert_eq!(cfg.api_key_with_env(None), None);
    }

    #[test]
    fn set_api_key_trims_input() {
        let mut cfg = Config::default();
        cfg.set_api_key("  abc123 \n".into());
        assert_eq!(cfg.api_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn parses_full_file() {
        let cfg = Config::from_toml(
            r#"
            api_key = "KEY"
            request_timeout_secs = 10

            [default_location]
            latitude = 51.5074
            longitude = -0.1278
            "#,
        )
        .expect("valid config");

        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
        assert_eq!(cfg.default_location, Some(Coordinates::new(51.5074, -0.1278)));
        assert!(cfg.allow_location);
        assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(cfg.base_url, None);
    }

    #[test]
    fn empty_file_allows_location_and_has_no_timeout() {
        let cfg = Config::from_toml("").expect("empty config is valid");
        assert!(cfg.allow_location);
        assert_eq!(cfg.request_timeout(), None);
    }

    #[test]
    fn roundtrips_through_toml() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            default_location: Some(Coordinates::new(35.6762, 139.6503)),
            allow_location: false,
            request_timeout_secs: None,
            base_url: Some("http://localhost:8080".into()),
        };

        let text = toml::to_string_pretty(&cfg).expect("serializes");
        assert_eq!(Config::from_toml(&text).expect("parses"), cfg);
    }
}
