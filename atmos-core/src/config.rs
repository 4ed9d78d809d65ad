use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}, time::Duration};

pub const OPENWEATHER_KEY_ENV: &str = "ATMOS_OPENWEATHER_API_KEY";
pub const WAQI_TOKEN_ENV: &str = "ATMOS_WAQI_TOKEN";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// OpenWeather current-conditions endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenWeatherConfig {
    pub api_key: Option<String>,
    #[serde(default = "OpenWeatherConfig::default_base_url")]
    pub base_url: String,
}

impl OpenWeatherConfig {
    fn default_base_url() -> String {
        "https://api.openweathermap.org/data/2.5".to_string()
    }
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self { api_key: None, base_url: Self::default_base_url() }
    }
}

/// World Air Quality Index feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaqiConfig {
    pub token: Option<String>,
    #[serde(default = "WaqiConfig::default_base_url")]
    pub base_url: String,
}

impl WaqiConfig {
    fn default_base_url() -> String {
        "https://api.waqi.info".to_string()
    }
}

impl Default for WaqiConfig {
    fn default() -> Self {
        Self { token: None, base_url: Self::default_base_url() }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// timeout_secs = 10
///
/// [openweather]
/// api_key = "..."
///
/// [waqi]
/// token = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Per-request timeout applied to every upstream call.
    #[serde(default = "Config::default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub openweather: OpenWeatherConfig,

    #[serde(default)]
    pub waqi: WaqiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            openweather: OpenWeatherConfig::default(),
            waqi: WaqiConfig::default(),
        }
    }
}

impl Config {
    fn default_timeout_secs() -> u64 {
        DEFAULT_TIMEOUT_SECS
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Load config from `path` (or the platform location) and apply
    /// environment overrides. A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_file_path()?,
        };

        let mut cfg = Self::from_file(&path)?;
        cfg.apply_overrides(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Replace credentials with non-empty values from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = present(OPENWEATHER_KEY_ENV) {
            self.openweather.api_key = Some(key);
        }
        if let Some(token) = present(WAQI_TOKEN_ENV) {
            self.waqi.token = Some(token);
        }
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "atmos", "atmos")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn openweather_api_key(&self) -> Result<&str> {
        self.openweather
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: set `api_key` under [openweather] in the config file or export {OPENWEATHER_KEY_ENV}."
                )
            })
    }

    pub fn waqi_token(&self) -> Option<&str> {
        self.waqi.token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_endpoints() {
        let cfg = Config::default();

        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert!(cfg.openweather.base_url.contains("openweathermap.org"));
        assert!(cfg.waqi.base_url.contains("waqi.info"));
        assert!(cfg.waqi_token().is_none());
    }

    #[test]
    fn missing_api_key_error_has_hint() {
        let err = Config::default().openweather_api_key().unwrap_err();
        let msg = err.to_string();

        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains(OPENWEATHER_KEY_ENV));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [openweather]
            api_key = "OPEN_KEY"
            "#,
        )
        .expect("valid toml");

        assert_eq!(cfg.openweather_api_key().unwrap(), "OPEN_KEY");
        assert_eq!(cfg.timeout_secs, 10);
        assert_eq!(cfg.waqi.base_url, "https://api.waqi.info");
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut cfg: Config = toml::from_str(
            r#"
            timeout_secs = 3
            [openweather]
            api_key = "FROM_FILE"
            "#,
        )
        .expect("valid toml");

        cfg.apply_overrides(|name| match name {
            OPENWEATHER_KEY_ENV => Some("FROM_ENV".to_string()),
            WAQI_TOKEN_ENV => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(cfg.openweather_api_key().unwrap(), "FROM_ENV");
        assert!(cfg.waqi_token().is_none());
        assert_eq!(cfg.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let cfg = Config { timeout_secs: 0, ..Config::default() };
        assert_eq!(cfg.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let cfg = Config::from_file(Path::new("/nonexistent/atmos/config.toml")).unwrap();
        assert!(cfg.openweather.api_key.is_none());
    }
}
