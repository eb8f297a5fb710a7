//! Runtime configuration
//!
//! Everything defaults to the values in [`crate::constants`]. A few settings can
//! be overridden through environment variables:
//!
//! - `COIN_DASHBOARD_API_URL`
//! - `COIN_DASHBOARD_REFRESH_SECS`
//! - `COIN_DASHBOARD_DEBOUNCE_MS`
//! - `COIN_DASHBOARD_TIMEOUT_SECS` (unset means no request timeout)

use crate::constants::{
    COINGECKO_API_URL, PREFERENCES_DIR, PREFERENCES_FILE, REFRESH_INTERVAL_SECS,
    SEARCH_DEBOUNCE_MS,
};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_URL: &str = "COIN_DASHBOARD_API_URL";
pub const ENV_REFRESH_SECS: &str = "COIN_DASHBOARD_REFRESH_SECS";
pub const ENV_DEBOUNCE_MS: &str = "COIN_DASHBOARD_DEBOUNCE_MS";
pub const ENV_TIMEOUT_SECS: &str = "COIN_DASHBOARD_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Market data API base URL, without trailing slash
    pub api_url: String,
    /// Auto-refresh period
    pub refresh_interval: Duration,
    /// Search quiet window
    pub debounce_window: Duration,
    /// Per-request timeout; `None` leaves requests unbounded
    pub request_timeout: Option<Duration>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: COINGECKO_API_URL.to_string(),
            refresh_interval: Duration::from_secs(REFRESH_INTERVAL_SECS),
            debounce_window: Duration::from_millis(SEARCH_DEBOUNCE_MS),
            request_timeout: None,
        }
    }
}

impl DashboardConfig {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = parse_u64(&lookup, ENV_REFRESH_SECS) {
            config.refresh_interval = Duration::from_secs(secs.max(1));
        }
        if let Some(ms) = parse_u64(&lookup, ENV_DEBOUNCE_MS) {
            config.debounce_window = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_u64(&lookup, ENV_TIMEOUT_SECS) {
            config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        config
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring invalid numeric setting");
            None
        }
    }
}

/// Default location of the preferences file
pub fn default_preferences_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(PREFERENCES_DIR).join(PREFERENCES_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::from_lookup(|_| None);
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.refresh_interval, Duration::from_secs(30));
        assert_eq!(config.debounce_window, Duration::from_millis(300));
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_overrides() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            (ENV_API_URL, "http://localhost:9000/api/v3/"),
            (ENV_REFRESH_SECS, "60"),
            (ENV_DEBOUNCE_MS, "150"),
            (ENV_TIMEOUT_SECS, "5"),
        ]));

        assert_eq!(config.api_url, "http://localhost:9000/api/v3");
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.debounce_window, Duration::from_millis(150));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            (ENV_REFRESH_SECS, "soon"),
            (ENV_TIMEOUT_SECS, "0"),
        ]));

        assert_eq!(config.refresh_interval, Duration::from_secs(30));
        assert_eq!(config.request_timeout, None);
    }
}
