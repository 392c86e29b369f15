//! Configuration management for Searchlight
//!
//! Parses TOML configuration files and provides typed access to settings.
//! Every section has defaults, so an empty file is a valid development
//! configuration that runs entirely on synthesized data.

use crate::client::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable consulted when `assistant.api_key` is absent
pub const API_KEY_ENV: &str = "SEARCHLIGHT_API_KEY";

/// Hard upper bound on the overall request timeout
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Hard upper bound on rate-limit retries per endpoint
pub const MAX_RETRIES_LIMIT: u32 = 10;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Socket address to bind, failing on a host that is not an IP address
    pub fn socket_addr(&self) -> crate::error::AppResult<SocketAddr> {
        let ip: IpAddr = self.host.trim().parse().map_err(|_| {
            crate::error::AppError::Config(format!(
                "server.host '{}' is not a valid IP address",
                self.host
            ))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Deployment environment
///
/// `Production` is the locked-down mode: the backend is never contacted and
/// every result is synthesized.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// Generative backend settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssistantConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Informational only; requests go to the fully-qualified `endpoints`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model-version endpoints, tried in order
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,
    /// Log swallowed failures at warn level instead of debug
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub environment: Environment,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            endpoints: default_endpoints(),
            debug: false,
            environment: Environment::default(),
        }
    }
}

impl AssistantConfig {
    pub fn is_locked_down(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_endpoints() -> Vec<String> {
    [
        "v1beta/models/gemini-1.5-flash",
        "v1beta/models/gemini-1.5-flash-latest",
        "v1/models/gemini-pro",
    ]
    .iter()
    .map(|model| format!("{}/{}:generateContent", default_base_url(), model))
    .collect()
}

/// Retry and backoff settings, in milliseconds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_rate_limit_base_delay_ms")]
    pub rate_limit_base_delay_ms: u64,
    #[serde(default = "default_rate_limit_jitter_ms")]
    pub rate_limit_jitter_ms: u64,
    #[serde(default = "default_transport_retry_min_delay_ms")]
    pub transport_retry_min_delay_ms: u64,
    #[serde(default = "default_transport_retry_max_delay_ms")]
    pub transport_retry_max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            rate_limit_base_delay_ms: default_rate_limit_base_delay_ms(),
            rate_limit_jitter_ms: default_rate_limit_jitter_ms(),
            transport_retry_min_delay_ms: default_transport_retry_min_delay_ms(),
            transport_retry_max_delay_ms: default_transport_retry_max_delay_ms(),
        }
    }
}

fn default_max_retries() -> u32 {
    2
}

fn default_rate_limit_base_delay_ms() -> u64 {
    2000
}

fn default_rate_limit_jitter_ms() -> u64 {
    1000
}

fn default_transport_retry_min_delay_ms() -> u64 {
    1000
}

fn default_transport_retry_max_delay_ms() -> u64 {
    2000
}

/// Overall request deadline
///
/// # Custom Deserialization
///
/// The timeout is checked against (0, 300] seconds while parsing, so a
/// `TimeoutsConfig` holding an out-of-range value can never exist.
#[derive(Debug, Clone, Serialize)]
pub struct TimeoutsConfig {
    request_timeout_seconds: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 30,
        }
    }
}

impl TimeoutsConfig {
    /// Create a validated timeout configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is zero or exceeds 300 seconds.
    pub fn new(request_timeout_seconds: u64) -> crate::error::AppResult<Self> {
        if request_timeout_seconds == 0 {
            return Err(crate::error::AppError::Config(
                "timeouts.request_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if request_timeout_seconds > MAX_TIMEOUT_SECONDS {
            return Err(crate::error::AppError::Config(format!(
                "timeouts.request_timeout_seconds cannot exceed {} seconds, got {}",
                MAX_TIMEOUT_SECONDS, request_timeout_seconds
            )));
        }
        Ok(Self {
            request_timeout_seconds,
        })
    }

    pub fn request_timeout_seconds(&self) -> u64 {
        self.request_timeout_seconds
    }
}

impl<'de> Deserialize<'de> for TimeoutsConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct RawTimeouts {
            request_timeout_seconds: Option<u64>,
        }

        let raw = RawTimeouts::deserialize(deserializer)?;
        match raw.request_timeout_seconds {
            Some(seconds) => TimeoutsConfig::new(seconds).map_err(|e| {
                serde::de::Error::custom(format!("Invalid timeout configuration: {}", e))
            }),
            None => Ok(TimeoutsConfig::default()),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
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
    /// Load configuration from a TOML file
    ///
    /// A missing `assistant.api_key` is filled from `SEARCHLIGHT_API_KEY`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            crate::error::AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|source| {
            crate::error::AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            }
        })?;

        config.apply_api_key_override(std::env::var(API_KEY_ENV).ok());

        config
            .validate()
            .map_err(|e| crate::error::AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Use `value` as the API key when the file did not set one
    pub fn apply_api_key_override(&mut self, value: Option<String>) {
        if self.assistant.api_key.is_some() {
            return;
        }
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            tracing::debug!(env_var = API_KEY_ENV, "Using API key from environment");
            self.assistant.api_key = Some(key);
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.request_timeout_seconds())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.retry.max_retries,
            rate_limit_base_delay: Duration::from_millis(self.retry.rate_limit_base_delay_ms),
            rate_limit_jitter: Duration::from_millis(self.retry.rate_limit_jitter_ms),
            transport_retry_min_delay: Duration::from_millis(
                self.retry.transport_retry_min_delay_ms,
            ),
            transport_retry_max_delay: Duration::from_millis(
                self.retry.transport_retry_max_delay_ms,
            ),
        }
    }

    /// Validate configuration after parsing
    ///
    /// This is called automatically by `from_file()`, but can also be called
    /// explicitly when constructing Config via other means (e.g., in tests).
    /// An invalid API key is not a configuration error; it only disables the
    /// live backend.
    pub fn validate(&self) -> crate::error::AppResult<()> {
        self.server.socket_addr()?;

        let endpoints = &self.assistant.endpoints;
        if endpoints.len() < 2 {
            return Err(crate::error::AppError::Config(format!(
                "assistant.endpoints must list at least 2 fallback endpoints, got {}",
                endpoints.len()
            )));
        }
        for endpoint in endpoints {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(crate::error::AppError::Config(format!(
                    "endpoint '{}' must start with 'http://' or 'https://'",
                    endpoint
                )));
            }
        }

        if self.retry.max_retries > MAX_RETRIES_LIMIT {
            return Err(crate::error::AppError::Config(format!(
                "retry.max_retries cannot exceed {}, got {}",
                MAX_RETRIES_LIMIT, self.retry.max_retries
            )));
        }
        if self.retry.rate_limit_base_delay_ms == 0 {
            return Err(crate::error::AppError::Config(
                "retry.rate_limit_base_delay_ms must be greater than 0"
                    .to_string(),
            ));
        }
        if self.retry.transport_retry_min_delay_ms > self.retry.transport_retry_max_delay_ms {
            return Err(crate::error::AppError::Config(format!(
                "retry.transport_retry_min_delay_ms ({}) must not exceed \
                retry.transport_retry_max_delay_ms ({})",
                self.retry.transport_retry_min_delay_ms, self.retry.transport_retry_max_delay_ms
            )));
        }

        let level = self.observability.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(crate::error::AppError::Config(format!(
                "observability.log_level '{}' is not one of {:?}",
                self.observability.log_level, LOG_LEVELS
            )));
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = crate::error::AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(toml_str).map_err(|source| {
            crate::error::AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            }
        })?;

        config.validate()?;
        Ok(config)
    }
}
