//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ClientConfig;
use crate::views::DepartmentChartOptions;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Payroll backend connection
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_employee_limit")]
    pub employee_limit: u32,

    /// Unset means requests wait indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_employee_limit() -> u32 {
    5000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            employee_limit: default_employee_limit(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            employee_limit: self.employee_limit,
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Dashboard behavior
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_year")]
    pub default_year: i32,

    #[serde(default = "default_search_debounce")]
    pub search_debounce_ms: u64,

    #[serde(default = "default_top_departments")]
    pub top_departments: usize,

    #[serde(default = "default_label_max_chars")]
    pub label_max_chars: usize,

    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_year() -> i32 {
    2024
}

fn default_search_debounce() -> u64 {
    300
}

fn default_top_departments() -> usize {
    10
}

fn default_label_max_chars() -> usize {
    25
}

fn default_page_size() -> usize {
    50
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_year: default_year(),
            search_debounce_ms: default_search_debounce(),
            top_departments: default_top_departments(),
            label_max_chars: default_label_max_chars(),
            page_size: default_page_size(),
        }
    }
}

impl DashboardConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn chart_options(&self) -> DepartmentChartOptions {
        DepartmentChartOptions {
            top_n: self.top_departments,
            label_max_chars: self.label_max_chars,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
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

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
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

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("payroll-dash").join("config.toml")),
            Some(PathBuf::from("./payroll-dash.toml")),
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

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PAYROLL_DASH_API_URL") {
            self.api.base_url = url;
        }
        if let Some(year) = lookup("PAYROLL_DASH_YEAR") {
            match year.parse() {
                Ok(y) => self.dashboard.default_year = y,
                Err(_) => tracing::warn!("Ignoring invalid PAYROLL_DASH_YEAR: {}", year),
            }
        }
        if let Some(level) = lookup("PAYROLL_DASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("PAYROLL_DASH_LOG_FORMAT") {
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
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# payroll-dash Configuration
#
# Environment variables override these settings:
# - PAYROLL_DASH_API_URL
# - PAYROLL_DASH_YEAR
# - PAYROLL_DASH_LOG_LEVEL
# - PAYROLL_DASH_LOG_FORMAT

[api]
# Payroll backend URL
base_url = "http://localhost:8001"

# Maximum employee rows fetched per load
employee_limit = 5000

# Per-request timeout in seconds (unset: wait indefinitely)
# request_timeout_secs = 30

[dashboard]
# Year selected on startup
default_year = 2024

# Quiet period before search text filters the table (ms)
search_debounce_ms = 300

# Departments shown in the department chart
top_departments = 10

# Department chart labels longer than this are truncated
label_max_chars = 25

# Table rows per page
page_size = 50

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
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8001");
        assert_eq!(config.api.employee_limit, 5000);
        assert!(config.api.request_timeout_secs.is_none());
        assert_eq!(config.dashboard.default_year, 2024);
        assert_eq!(config.dashboard.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.dashboard.chart_options(), DepartmentChartOptions::default());
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, Config::default().api.base_url);
        assert_eq!(config.dashboard.page_size, 50);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"https://payroll.example.org/\"\nrequest_timeout_secs = 10\n\n[dashboard]\ndefault_year = 2022"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.dashboard.default_year, 2022);
        assert_eq!(config.dashboard.top_departments, 10);

        let client = config.api.client_config();
        assert_eq!(client.base_url, "https://payroll.example.org");
        assert_eq!(client.request_timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dashboard]\ndefault_year = \"next year\"").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/payroll-dash.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("PAYROLL_DASH_API_URL", "http://10.0.0.5:8001"),
            ("PAYROLL_DASH_YEAR", "2021"),
            ("PAYROLL_DASH_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://10.0.0.5:8001");
        assert_eq!(config.dashboard.default_year, 2021);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_year_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "PAYROLL_DASH_YEAR").then(|| "soon".to_string()));
        assert_eq!(config.dashboard.default_year, 2024);
    }
}
