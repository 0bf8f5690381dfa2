use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_FPL_BASE_URL: &str = "https://fantasy.premierleague.com/api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Upstream fantasy API client configuration
#[derive(Debug, Clone)]
pub struct FplConfig {
    pub base_url: String,
    pub max_retries: u32,
    pub retry_base_delay: Duration,
    pub request_timeout: Duration,
    pub static_cache_ttl: Duration,
    pub live_cache_ttl: Duration,
}

impl Default for FplConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FPL_BASE_URL.to_string(),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(1000),
            request_timeout: Duration::from_secs(30),
            static_cache_ttl: Duration::from_secs(3600), // 1 hour
            live_cache_ttl: Duration::from_secs(30),
        }
    }
}

/// Windows used by the league views
#[derive(Debug, Clone, Copy)]
pub struct DashboardSettings {
    pub transfer_trend_gameweeks: i32,
    pub team_value_trend_gameweeks: i32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            transfer_trend_gameweeks: 3,
            team_value_trend_gameweeks: 5,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub fpl: FplConfig,
    pub dashboard: DashboardSettings,
}

impl AppConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let defaults = FplConfig::default();
        let max_retries = parse_var("FPL_MAX_RETRIES", defaults.max_retries)?;
        if max_retries == 0 {
            return Err(ConfigError::Invalid {
                name: "FPL_MAX_RETRIES",
                value: "0".to_string(),
            });
        }

        let fpl = FplConfig {
            base_url: env::var("FPL_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            max_retries,
            retry_base_delay: Duration::from_millis(parse_var(
                "FPL_RETRY_BASE_DELAY_MS",
                defaults.retry_base_delay.as_millis() as u64,
            )?),
            request_timeout: Duration::from_secs(parse_var(
                "FPL_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            static_cache_ttl: Duration::from_secs(parse_var(
                "FPL_STATIC_CACHE_TTL_SECS",
                defaults.static_cache_ttl.as_secs(),
            )?),
            live_cache_ttl: Duration::from_secs(parse_var(
                "FPL_LIVE_CACHE_TTL_SECS",
                defaults.live_cache_ttl.as_secs(),
            )?),
        };

        let dashboard_defaults = DashboardSettings::default();
        let dashboard = DashboardSettings {
            transfer_trend_gameweeks: parse_var(
                "TRANSFER_TREND_GAMEWEEKS",
                dashboard_defaults.transfer_trend_gameweeks,
            )?
            .max(1),
            team_value_trend_gameweeks: parse_var(
                "TEAM_VALUE_TREND_GAMEWEEKS",
                dashboard_defaults.team_value_trend_gameweeks,
            )?
            .max(1),
        };

        Ok(Self {
            database_url,
            bind_addr,
            fpl,
            dashboard,
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let fpl = FplConfig::default();
        assert_eq!(fpl.base_url, "https://fantasy.premierleague.com/api");
        assert_eq!(fpl.max_retries, 3);
        assert_eq!(fpl.live_cache_ttl, Duration::from_secs(30));

        let dashboard = DashboardSettings::default();
        assert_eq!(dashboard.transfer_trend_gameweeks, 3);
        assert_eq!(dashboard.team_value_trend_gameweeks, 5);
    }

    #[test]
    fn test_parse_var_falls_back_to_default() {
        let value: u32 = parse_var("FPL_TEST_UNSET_VARIABLE_FOR_CONFIG", 7).unwrap();
        assert_eq!(value, 7);
    }
}
