use crate::errors::ServerError;
use chrono::{FixedOffset, Offset, Utc};
use std::net::SocketAddr;
use std::str::FromStr;

/// Dashboard configuration loaded from environment variables.
///
/// | Env Var                  | Default                     |
/// |--------------------------|-----------------------------|
/// | `BIND_ADDR`              | `127.0.0.1:3000`            |
/// | `MAX_WORKERS`            | `8`                         |
/// | `API_BASE_URL`           | `http://localhost:8080/api` |
/// | `API_TOKEN`              | unset                       |
/// | `API_TIMEOUT_SECS`       | `30`                        |
/// | `DEFAULT_PAGE_SIZE`      | `10`                        |
/// | `DISPLAY_UTC_OFFSET_MIN` | `0`                         |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    pub api_base_url: String,
    /// Sent as a bearer token on every API call when present.
    pub api_token: Option<String>,
    pub api_timeout_secs: u64,
    pub default_page_size: usize,
    /// Offset used to interpret date-only values and to display times.
    pub display_offset: FixedOffset,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_workers: 8,
            api_base_url: "http://localhost:8080/api".to_string(),
            api_token: None,
            api_timeout_secs: 30,
            default_page_size: 10,
            display_offset: utc(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let offset_min: i32 = parse_or(&lookup, "DISPLAY_UTC_OFFSET_MIN", 0)?;
        let display_offset = FixedOffset::east_opt(offset_min * 60).ok_or_else(|| {
            ServerError::Config(format!("DISPLAY_UTC_OFFSET_MIN out of range: {offset_min}"))
        })?;

        let default_page_size: usize =
            parse_or(&lookup, "DEFAULT_PAGE_SIZE", defaults.default_page_size)?;
        if default_page_size == 0 {
            return Err(ServerError::Config("DEFAULT_PAGE_SIZE must be positive".into()));
        }

        Ok(Self {
            bind_addr: parse_or(&lookup, "BIND_ADDR", defaults.bind_addr)?,
            max_workers: parse_or(&lookup, "MAX_WORKERS", defaults.max_workers)?,
            api_base_url: lookup("API_BASE_URL").unwrap_or(defaults.api_base_url),
            api_token: lookup("API_TOKEN").filter(|t| !t.trim().is_empty()),
            api_timeout_secs: parse_or(&lookup, "API_TIMEOUT_SECS", defaults.api_timeout_secs)?,
            default_page_size,
            display_offset,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ServerError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ServerError::Config(format!("{key}={raw:?}: {e}"))),
        None => Ok(default),
    }
}

pub fn utc() -> FixedOffset {
    Utc.fix()
}
