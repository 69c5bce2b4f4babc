//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.
//! Execution components receive the sub-structs they need at construction time.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_EXECUTION_SERVICE_URL, DEFAULT_MAX_IN_FLIGHT, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_POLL_MAX_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT,
};
use crate::models::ResourceLimits;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub execution_service: ExecutionServiceConfig,
    pub polling: PollingConfig,
    pub suite: SuiteConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Connection settings for the external execution service
#[derive(Debug, Clone)]
pub struct ExecutionServiceConfig {
    /// Submissions endpoint; tokens are appended as a path segment
    pub base_url: String,
    pub auth_token: Option<String>,
    pub rapidapi_key: Option<String>,
    pub rapidapi_host: Option<String>,
    pub request_timeout: Duration,
    /// Executions (dispatch + poll) allowed in flight at once, across all callers
    pub max_in_flight: usize,
    /// Limits applied when a request leaves them unset
    pub default_limits: ResourceLimits,
}

/// Result polling budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

/// Test-suite settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteConfig {
    pub deadline: Option<Duration>,
    pub comparison: ComparisonMode,
}

/// Where expected-output comparison happens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ComparisonMode {
    /// Forward the expected output and trust the service's verdict
    #[default]
    Backend,
    /// Withhold the expected output and compare stdout locally
    Local,
}

impl FromStr for ComparisonMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "backend" => Ok(Self::Backend),
            "local" => Ok(Self::Local),
            _ => Err(ConfigError::InvalidValue("COMPARISON_MODE".to_string())),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl ExecutionServiceConfig {
    /// Configuration pointing at `base_url` with no credentials
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: None,
            rapidapi_key: None,
            rapidapi_host: None,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            default_limits: ResourceLimits::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            execution_service: ExecutionServiceConfig::from_env()?,
            polling: PollingConfig::from_env()?,
            suite: SuiteConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_or("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl ExecutionServiceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("EXECUTION_SERVICE_URL")
            .unwrap_or_else(|_| DEFAULT_EXECUTION_SERVICE_URL.to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue("EXECUTION_SERVICE_URL".to_string()));
        }

        let max_in_flight = parse_or("SUITE_MAX_CONCURRENCY", DEFAULT_MAX_IN_FLIGHT)?;
        if max_in_flight == 0 {
            return Err(ConfigError::InvalidValue("SUITE_MAX_CONCURRENCY".to_string()));
        }

        Ok(Self {
            base_url,
            auth_token: non_empty_var("EXECUTION_SERVICE_AUTH_TOKEN"),
            rapidapi_key: non_empty_var("EXECUTION_SERVICE_RAPIDAPI_KEY"),
            rapidapi_host: non_empty_var("EXECUTION_SERVICE_RAPIDAPI_HOST"),
            request_timeout: Duration::from_millis(parse_or(
                "EXECUTION_REQUEST_TIMEOUT_MS",
                DEFAULT_REQUEST_TIMEOUT_MS,
            )?),
            max_in_flight,
            default_limits: ResourceLimits {
                cpu_time_limit: parse_optional("DEFAULT_CPU_TIME_LIMIT_SECONDS")?,
                memory_limit: parse_optional("DEFAULT_MEMORY_LIMIT_KB")?,
                ..ResourceLimits::default()
            },
        })
    }
}

impl PollingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            max_attempts: parse_or("POLL_MAX_ATTEMPTS", DEFAULT_POLL_MAX_ATTEMPTS)?,
            interval: Duration::from_millis(parse_or(
                "POLL_INTERVAL_MS",
                DEFAULT_POLL_INTERVAL_MS,
            )?),
        })
    }
}

impl SuiteConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            deadline: parse_optional::<u64>("SUITE_DEADLINE_MS")?.map(Duration::from_millis),
            comparison: match non_empty_var("COMPARISON_MODE") {
                Some(mode) => mode.parse()?,
                None => ComparisonMode::default(),
            },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match non_empty_var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

fn parse_optional<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    non_empty_var(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
