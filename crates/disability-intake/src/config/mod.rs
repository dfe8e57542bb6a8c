use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MIN_PHONE_LENGTH: usize = 7;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the intake service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub notifications: NotificationConfig,
    pub intake: IntakeConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let format = LogFormat::from_str(&env::var("APP_LOG_FORMAT").unwrap_or_default());

        let notifications = NotificationConfig::from_env()?;
        let intake = IntakeConfig::from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, format },
            notifications,
            intake,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Output shape for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

/// Where captured leads are delivered for human follow-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    pub webhook_url: Option<String>,
    pub timeout: Duration,
}

impl NotificationConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let webhook_url = match env::var("LEAD_WEBHOOK_URL") {
            Ok(raw) if !raw.trim().is_empty() => Some(validate_webhook_url(raw.trim())?),
            _ => None,
        };

        let timeout_secs = match env::var("LEAD_WEBHOOK_TIMEOUT_SECS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidWebhookTimeout { value: raw }),
            },
            Err(_) => DEFAULT_WEBHOOK_TIMEOUT_SECS,
        };

        Ok(Self {
            webhook_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout: Duration::from_secs(DEFAULT_WEBHOOK_TIMEOUT_SECS),
        }
    }
}

/// Lead intake rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeConfig {
    pub min_phone_length: usize,
}

impl IntakeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let min_phone_length = match env::var("LEAD_MIN_PHONE_LENGTH") {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(length) if length > 0 => length,
                _ => return Err(ConfigError::InvalidPhoneLength { value: raw }),
            },
            Err(_) => DEFAULT_MIN_PHONE_LENGTH,
        };

        Ok(Self { min_phone_length })
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            min_phone_length: DEFAULT_MIN_PHONE_LENGTH,
        }
    }
}

fn validate_webhook_url(raw: &str) -> Result<String, ConfigError> {
    let parsed = reqwest::Url::parse(raw).map_err(|_| ConfigError::InvalidWebhookUrl {
        value: raw.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(raw.to_string()),
        _ => Err(ConfigError::InvalidWebhookUrl {
            value: raw.to_string(),
        }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWebhookUrl { value: String },
    InvalidWebhookTimeout { value: String },
    InvalidPhoneLength { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWebhookUrl { value } => {
                write!(f, "LEAD_WEBHOOK_URL must be an http(s) URL, found '{value}'")
            }
            ConfigError::InvalidWebhookTimeout { value } => write!(
                f,
                "LEAD_WEBHOOK_TIMEOUT_SECS must be a positive integer, found '{value}'"
            ),
            ConfigError::InvalidPhoneLength { value } => write!(
                f,
                "LEAD_MIN_PHONE_LENGTH must be a positive integer, found '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidWebhookUrl { .. }
            | ConfigError::InvalidWebhookTimeout { .. }
            | ConfigError::InvalidPhoneLength { .. } => None,
        }
    }
}
