use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::gauge::engine::EngineConfig;
use crate::gauge::schedule::RecomputeSchedule;

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

/// Top-level configuration for the gauge service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub gauge: GaugeConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            gauge: GaugeConfig::from_env()?,
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Catalog location plus the scoring and scheduling knobs exposed to operators.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeConfig {
    /// JSON or CSV catalog; the built-in seed catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
    pub window_years: u32,
    pub lookback_years: u32,
    pub tick_secs: u64,
    pub recalculation_secs: u64,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            catalog_path: None,
            window_years: engine.window_years,
            lookback_years: engine.lookback_years,
            tick_secs: 60,
            recalculation_secs: 4 * 60 * 60,
        }
    }
}

impl GaugeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let catalog_path = env::var("GAUGE_CATALOG_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            catalog_path,
            window_years: bounded_var(
                "GAUGE_WINDOW_YEARS",
                defaults.window_years,
                EngineConfig::MAX_WINDOW_YEARS,
            )?,
            lookback_years: bounded_var(
                "GAUGE_LOOKBACK_YEARS",
                defaults.lookback_years,
                EngineConfig::MAX_LOOKBACK_YEARS,
            )?,
            tick_secs: bounded_var("GAUGE_TICK_SECS", defaults.tick_secs, MAX_INTERVAL_SECS)?,
            recalculation_secs: bounded_var(
                "GAUGE_RECALC_SECS",
                defaults.recalculation_secs,
                MAX_INTERVAL_SECS,
            )?,
        })
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            window_years: self.window_years,
            lookback_years: self.lookback_years,
            ..EngineConfig::default()
        }
    }

    pub fn schedule(&self) -> RecomputeSchedule {
        let defaults = RecomputeSchedule::default();
        RecomputeSchedule::new(
            Duration::from_secs(self.tick_secs),
            Duration::from_secs(self.recalculation_secs),
            defaults.alert_check,
        )
    }
}

/// One year; longer scheduler periods are treated as operator error.
const MAX_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;

/// Reads a number that must fall in `(0, max]`.
fn bounded_var<T>(name: &'static str, default: T, max: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) if value > T::default() && value <= max => Ok(value),
            _ => Err(ConfigError::InvalidNumber { name, value: raw }),
        },
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{name} must be a positive integer within range, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
