use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_SEDE, ENV_API_URL, ENV_HTTP_TIMEOUT_SECONDS, ENV_LOG_LEVEL,
    ENV_REFRESH_SECONDS, ENV_SEDE, HTTP_TIMEOUT_SECONDS, REFRESH_INTERVAL_SECONDS,
};
use crate::logger::LogLevel;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// URL base del API Gateway, sin `/` final.
    pub api_base_url: String,
    /// Sede usada cuando el usuario no tiene una fija.
    pub default_sede: String,
    /// Cada cuánto se vuelven a pedir los pedidos.
    pub refresh_interval: Duration,
    pub http_timeout: Duration,
    pub log_level: LogLevel,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleConfig {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            default_sede: DEFAULT_SEDE.to_string(),
            refresh_interval: Duration::from_secs(REFRESH_INTERVAL_SECONDS),
            http_timeout: Duration::from_secs(HTTP_TIMEOUT_SECONDS),
            log_level: LogLevel::Info,
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from `lookup`; missing or invalid values keep the
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConsoleConfig::default();
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let seconds = |key: &str| {
            value(key)
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
        };

        if let Some(url) = value(ENV_API_URL) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(sede) = value(ENV_SEDE) {
            config.default_sede = sede;
        }
        if let Some(interval) = seconds(ENV_REFRESH_SECONDS) {
            config.refresh_interval = interval;
        }
        if let Some(timeout) = seconds(ENV_HTTP_TIMEOUT_SECONDS) {
            config.http_timeout = timeout;
        }
        if let Some(level) = value(ENV_LOG_LEVEL).and_then(|v| LogLevel::parse(&v)) {
            config.log_level = level;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        assert_eq!(ConsoleConfig::from_lookup(|_| None), ConsoleConfig::default());
    }

    #[test]
    fn test_environment_overrides() {
        let config = ConsoleConfig::from_lookup(lookup(&[
            (ENV_API_URL, "http://localhost:3000/dev/"),
            (ENV_SEDE, "pardo_surco"),
            (ENV_REFRESH_SECONDS, "15"),
            (ENV_HTTP_TIMEOUT_SECONDS, "3"),
            (ENV_LOG_LEVEL, "debug"),
        ]));
        assert_eq!(config.api_base_url, "http://localhost:3000/dev");
        assert_eq!(config.default_sede, "pardo_surco");
        assert_eq!(config.refresh_interval, Duration::from_secs(15));
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = ConsoleConfig::from_lookup(lookup(&[
            (ENV_REFRESH_SECONDS, "soon"),
            (ENV_HTTP_TIMEOUT_SECONDS, "0"),
            (ENV_LOG_LEVEL, "loud"),
            (ENV_SEDE, "  "),
        ]));
        assert_eq!(config, ConsoleConfig::default());
    }
}
