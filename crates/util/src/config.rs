use std::{fmt, net::SocketAddr};

use super::{env_or, server_bind_address};

pub const DEFAULT_RATING_EVENTS_CAPACITY: usize = 128;
pub const DEFAULT_SSE_HEARTBEAT_SECS: u64 = 20;

/// Runtime environment the front-end runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            _ => Err(ConfigError::InvalidEnvironment(value.to_string())),
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Canonical name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

/// Configuration resolved from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub environment: Environment,
    /// Buffer size of the ratings-changed broadcast channel.
    pub rating_events_capacity: usize,
    pub sse_heartbeat_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::parse(&env_or("APP_ENV", "development"))?;
        let bind_addr = server_bind_address().map_err(ConfigError::BindAddress)?;
        let rating_events_capacity = positive(
            "APP_RATING_EVENTS_CAPACITY",
            DEFAULT_RATING_EVENTS_CAPACITY as u64,
        )? as usize;
        let sse_heartbeat_secs = positive("APP_SSE_HEARTBEAT_SECS", DEFAULT_SSE_HEARTBEAT_SECS)?;

        Ok(Self {
            bind_addr,
            environment,
            rating_events_capacity,
            sse_heartbeat_secs,
        })
    }
}

fn positive(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    let raw = env_or(name, &default.to_string());
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::NotPositive { name, value: raw }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidEnvironment(String),
    BindAddress(std::net::AddrParseError),
    NotPositive { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnvironment(value) => write!(
                f,
                "APP_ENV must be one of 'development', 'production', or 'test' (got {value})"
            ),
            Self::BindAddress(err) => write!(f, "invalid APP_BIND_ADDR value: {err}"),
            Self::NotPositive { name, value } => {
                write!(f, "{name} must be a positive integer (got {value})")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BindAddress(err) => Some(err),
            _ => None,
        }
    }
}
