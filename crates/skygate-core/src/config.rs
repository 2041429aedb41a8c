use anyhow::{Context, Result};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Deployed weather/auth backend used when nothing else is configured
pub const DEFAULT_API_URL: &str = "https://weather-app-backend-ashen-gamma.vercel.app";

/// Environment variable that overrides the configured API base URL
pub const API_URL_ENV: &str = "SKYGATE_API_URL";

const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding config.toml and the persisted session
    pub config_dir: PathBuf,

    /// Remote API settings
    pub api: ApiConfig,

    /// Display formatting
    #[serde(default)]
    pub display: DisplayConfig,

    /// Session persistence
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the weather/auth backend
    pub base_url: String,

    /// Optional request timeout in seconds. Unset means the transport default
    /// applies and a hung call stays pending until the transport gives up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Runtime override from `SKYGATE_API_URL`; never written back to disk
    #[serde(skip)]
    pub base_url_override: Option<String>,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// URL requests go to: the runtime override if set, else `base_url`
    pub fn effective_base_url(&self) -> &str {
        self.base_url_override.as_deref().unwrap_or(&self.base_url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: None,
            base_url_override: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// strftime pattern for calendar dates (default mirrors en-US short dates)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_date_format() -> String {
    "%-m/%-d/%Y".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File name (inside config_dir) of the persisted session record
    #[serde(default = "default_session_file")]
    pub file_name: String,
}

fn default_session_file() -> String {
    "session.json".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file_name: default_session_file(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            api: ApiConfig::default(),
            display: DisplayConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skygate")
}

impl Config {
    /// Load configuration from the platform config directory, creating a
    /// default file if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skygate");
        Self::load_from(&config_dir)
    }

    /// Load configuration from `config_dir/config.toml`
    pub fn load_from(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            toml::from_str::<Config>(&contents).context("Failed to parse config file")?
        } else {
            let config = Self {
                config_dir: config_dir.to_path_buf(),
                ..Self::default()
            };
            config.save()?;
            config
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            tracing::debug!("Using API URL from {}", API_URL_ENV);
            config.api.base_url_override = Some(url);
        }

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails with critical errors; warnings
    /// are logged.
    pub fn load_validated(config_dir: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match config_dir {
            Some(dir) => Self::load_from(dir)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        let base_url = self.api.effective_base_url();
        Self::validate_url(base_url, "api.base_url", &mut result);

        if let Some(url) = Url::parse(base_url).ok().filter(|u| u.scheme() == "http") {
            if url.host_str().is_some_and(|h| h != "localhost" && h != "127.0.0.1") {
                result.add_warning(
                    "api.base_url",
                    "Credentials will be sent over plain http",
                );
            }
        }

        if self.api.request_timeout_secs == Some(0) {
            result.add_error("api.request_timeout_secs", "Timeout must be greater than 0");
        }

        if self.display.date_format.trim().is_empty() {
            result.add_error("display.date_format", "Date format cannot be empty");
        } else if StrftimeItems::new(&self.display.date_format).any(|item| item == Item::Error) {
            result.add_error(
                "display.date_format",
                format!("Invalid date format: {}", self.display.date_format),
            );
        }

        let file_name = self.session.file_name.trim();
        if file_name.is_empty() {
            result.add_error("session.file_name", "Session file name cannot be empty");
        } else if file_name.contains('/') || file_name.contains('\\') {
            result.add_error(
                "session.file_name",
                "Session file name must not contain path separators",
            );
        }

        result
    }

    fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to `config_dir/config.toml`
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)
            .context("Failed to create config directory")?;

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(self.config_path(), contents).context("Failed to write config file")?;

        Ok(())
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Full path of the persisted session record
    pub fn session_path(&self) -> PathBuf {
        self.config_dir.join(&self.session.file_name)
    }
}
