use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jiff::SignedDuration;
use jiff::tz::TimeZone;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Plain,
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub token_ttl: Duration,
    pub temp_passcode_ttl: SignedDuration,
    /// Zone used to render calendar dates for clinic staff.
    pub display_time_zone: TimeZone,
    pub run_migrations: bool,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Every missing required
    /// key is reported in one error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = get("DATABASE_URL");
        let jwt_secret = get("JWT_SECRET");
        let (database_url, jwt_secret) = match (database_url, jwt_secret) {
            (Some(url), Some(secret)) => (url, secret),
            (url, secret) => {
                let mut missing = Vec::new();
                if url.is_none() {
                    missing.push("DATABASE_URL");
                }
                if secret.is_none() {
                    missing.push("JWT_SECRET");
                }
                return Err(ConfigError::Missing(missing));
            }
        };

        let token_ttl_hours: u64 = parse_or(get("TOKEN_TTL_HOURS"), "TOKEN_TTL_HOURS", 24)?;
        let temp_passcode_ttl = parse_temp_passcode_ttl(get("TEMP_PASSCODE_TTL_MINUTES"))?;
        let display_time_zone = match get("DISPLAY_TIME_ZONE") {
            None => TimeZone::UTC,
            Some(name) => TimeZone::get(name.trim()).map_err(|_| ConfigError::Invalid {
                key: "DISPLAY_TIME_ZONE",
                value: name,
            })?,
        };
        let acquire_secs: u64 =
            parse_or(get("DB_ACQUIRE_TIMEOUT_SECS"), "DB_ACQUIRE_TIMEOUT_SECS", 5)?;

        let log_format = match get("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Plain,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: parse_or(
                get("BIND_ADDR"),
                "BIND_ADDR",
                SocketAddr::from(([0, 0, 0, 0], 3000)),
            )?,
            db_max_connections: parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 10)?,
            db_acquire_timeout: Duration::from_secs(acquire_secs),
            token_ttl: Duration::from_secs(token_ttl_hours.saturating_mul(60 * 60)),
            temp_passcode_ttl,
            display_time_zone,
            run_migrations: parse_or(get("RUN_MIGRATIONS"), "RUN_MIGRATIONS", true)?,
            log_format,
        })
    }
}

fn parse_or<T: FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

/// Temporary passcode lifetime in whole minutes, non-negative and small
/// enough to be represented in seconds.
fn parse_temp_passcode_ttl(value: Option<String>) -> Result<SignedDuration, ConfigError> {
    const KEY: &str = "TEMP_PASSCODE_TTL_MINUTES";
    let minutes: i64 = parse_or(value.clone(), KEY, 30)?;
    minutes
        .checked_mul(60)
        .filter(|_| minutes >= 0)
        .map(SignedDuration::from_secs)
        .ok_or_else(|| ConfigError::Invalid {
            key: KEY,
            value: value.unwrap_or_default(),
        })
}
