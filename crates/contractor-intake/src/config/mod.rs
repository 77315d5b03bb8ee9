use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::applicants::{Currency, ShortlistCriteria};

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub screening: ScreeningConfig,
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
            screening: ScreeningConfig::from_env()?,
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

/// Shortlist rubric overrides and the enrichment seed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreeningConfig {
    pub criteria: ShortlistCriteria,
    /// Fixed seed for the mock enricher; random per process when unset.
    pub enrichment_seed: Option<u64>,
}

impl ScreeningConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut criteria = ShortlistCriteria::default();

        if let Some(employers) = list_var("INTAKE_TIER_ONE_EMPLOYERS") {
            criteria.tier_one_employers = employers;
        }
        if let Some(locations) = list_var("INTAKE_ALLOWED_LOCATIONS") {
            criteria.allowed_locations = locations;
        }
        if let Some(years) = number_var("INTAKE_MIN_EXPERIENCE_YEARS")? {
            criteria.min_experience_years = years;
        }
        if let Some(rate) = number_var("INTAKE_MAX_HOURLY_RATE")? {
            criteria.max_hourly_rate = rate;
        }
        if let Some(hours) = number_var("INTAKE_MIN_AVAILABILITY_HOURS")? {
            criteria.min_availability_hours = hours;
        }
        if let Ok(raw) = env::var("INTAKE_REQUIRED_CURRENCY") {
            criteria.required_currency =
                Currency::from_code(&raw).ok_or(ConfigError::InvalidCurrency { value: raw })?;
        }

        let enrichment_seed = match env::var("INTAKE_ENRICHMENT_SEED") {
            Ok(raw) => Some(raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                key: "INTAKE_ENRICHMENT_SEED",
                value: raw,
            })?),
            Err(_) => None,
        };

        Ok(Self {
            criteria,
            enrichment_seed,
        })
    }
}

fn list_var(key: &str) -> Option<Vec<String>> {
    let raw = env::var(key).ok()?;
    let values: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    (!values.is_empty()).then_some(values)
}

fn number_var(key: &'static str) -> Result<Option<f64>, ConfigError> {
    let Ok(raw) = env::var(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(Some(value)),
        _ => Err(ConfigError::InvalidNumber { key, value: raw }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    InvalidCurrency { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a non-negative number (found '{value}')")
            }
            ConfigError::InvalidCurrency { value } => write!(
                f,
                "INTAKE_REQUIRED_CURRENCY must be one of USD, EUR, GBP, CAD, INR (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidCurrency { .. } => None,
        }
    }
}
