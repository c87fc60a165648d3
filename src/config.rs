//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,

    #[serde(default)]
    pub downloads: DownloadConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API connection
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Sent as `X-API-Key` when set
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            api_key: None,
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Dashboard timing and form defaults
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Delay before switching to the tasks tab after a task is created
    #[serde(default = "default_tab_switch_delay")]
    pub tab_switch_delay_ms: u64,

    /// Value the max-items field is reset to
    #[serde(default = "default_max_items")]
    pub default_max_items: u32,

    /// Delay before confirming that an export download started
    #[serde(default = "default_export_notice_delay")]
    pub export_notice_delay_ms: u64,
}

fn default_poll_interval() -> u64 {
    10_000 // 10 seconds
}

fn default_tab_switch_delay() -> u64 {
    1000
}

fn default_max_items() -> u32 {
    crate::validate::DEFAULT_MAX_ITEMS
}

fn default_export_notice_delay() -> u64 {
    500
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            tab_switch_delay_ms: default_tab_switch_delay(),
            default_max_items: default_max_items(),
            export_notice_delay_ms: default_export_notice_delay(),
        }
    }
}

impl DashboardConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn tab_switch_delay(&self) -> Duration {
        Duration::from_millis(self.tab_switch_delay_ms)
    }

    pub fn export_notice_delay(&self) -> Duration {
        Duration::from_millis(self.export_notice_delay_ms)
    }
}

/// Notification auto-dismiss timers
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_info_timeout")]
    pub info_timeout_ms: u64,

    /// Success, warning and error notifications
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_info_timeout() -> u64 {
    2000
}

fn default_timeout() -> u64 {
    4000
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            info_timeout_ms: default_info_timeout(),
            timeout_ms: default_timeout(),
        }
    }
}

/// Where exported files land
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    #[serde(default = "default_download_dir")]
    pub dir: String,
}

fn default_download_dir() -> String {
    dirs::download_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "./downloads".to_string())
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            dir: default_download_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config = Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })?;

        config.validate().map_err(|error| ConfigError::Invalid {
            path: path.to_path_buf(),
            error,
        })?;

        Ok(config)
    }

    /// Check values that parse but cannot be used
    pub fn validate(&self) -> Result<(), String> {
        if self.dashboard.poll_interval_ms == 0 {
            return Err("dashboard.poll_interval_ms must be greater than 0".to_string());
        }
        Ok(())
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load an explicit file, or fall back to the default locations
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::load_default()),
        }
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("scrape-dash").join("config.toml")),
            Some(PathBuf::from("./scrape-dash.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("SCRAPE_DASH_BACKEND_URL") {
            self.backend.base_url = url;
        }
        if let Some(key) = var("SCRAPE_DASH_API_KEY") {
            self.backend.api_key = Some(key);
        }
        if let Some(interval) = var("SCRAPE_DASH_POLL_INTERVAL_MS") {
            match interval.parse::<u64>() {
                Ok(ms) if ms > 0 => self.dashboard.poll_interval_ms = ms,
                _ => tracing::warn!(
                    value = %interval,
                    "Ignoring SCRAPE_DASH_POLL_INTERVAL_MS: expected a positive number of milliseconds"
                ),
            }
        }
        if let Some(dir) = var("SCRAPE_DASH_DOWNLOAD_DIR") {
            self.downloads.dir = dir;
        }
        if let Some(level) = var("SCRAPE_DASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("SCRAPE_DASH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid config file {path:?}: {error}")]
    Invalid { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Scrape Dash Configuration
#
# Environment variables override these settings:
# - SCRAPE_DASH_BACKEND_URL
# - SCRAPE_DASH_API_KEY
# - SCRAPE_DASH_POLL_INTERVAL_MS
# - SCRAPE_DASH_DOWNLOAD_DIR
# - SCRAPE_DASH_LOG_LEVEL
# - SCRAPE_DASH_LOG_FORMAT

[backend]
# Scraper backend URL
base_url = "http://localhost:5000"

# Request timeout in seconds
request_timeout_secs = 30

# Optional API key, sent as X-API-Key
# api_key = "dev-key-change-in-production"

[dashboard]
# How often stats (and the task list, when visible) refresh (ms)
poll_interval_ms = 10000

# Delay before jumping to the tasks tab after creating a task (ms)
tab_switch_delay_ms = 1000

# Max items the task form resets to
default_max_items = 50

# Delay before confirming an export download started (ms)
export_notice_delay_ms = 500

[notifications]
# Display time for informational messages (ms)
info_timeout_ms = 2000

# Display time for success, warning and error messages (ms)
timeout_ms = 4000

[downloads]
# Directory for exported CSV/JSON files
dir = "./downloads"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://localhost:5000");
        assert_eq!(config.dashboard.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.dashboard.tab_switch_delay(), Duration::from_secs(1));
        assert_eq!(config.dashboard.default_max_items, 50);
        assert_eq!(config.notifications.info_timeout_ms, 2000);
        assert_eq!(config.notifications.timeout_ms, 4000);
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.backend.request_timeout_secs, 30);
        assert_eq!(config.downloads.dir, "./downloads");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[backend]\nbase_url = \"http://scraper:8000\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.backend.base_url, "http://scraper:8000");
        assert_eq!(config.dashboard.poll_interval_ms, 10_000);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[backend\n").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SCRAPE_DASH_BACKEND_URL", "http://other:9000"),
            ("SCRAPE_DASH_POLL_INTERVAL_MS", "2500"),
            ("SCRAPE_DASH_API_KEY", "secret"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.backend.base_url, "http://other:9000");
        assert_eq!(config.dashboard.poll_interval_ms, 2500);
        assert_eq!(config.backend.api_key.as_deref(), Some("secret"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[dashboard]\npoll_interval_ms = 0\n").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_zero_poll_interval_override_ignored() {
        for value in ["0", "soon"] {
            let mut config = Config::default();
            config.apply_overrides(|key| {
                (key == "SCRAPE_DASH_POLL_INTERVAL_MS").then(|| value.to_string())
            });
            assert_eq!(config.dashboard.poll_interval_ms, 10_000, "{}", value);
        }
    }
}
