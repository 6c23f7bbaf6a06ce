//! Runtime configuration, read from the environment (and `.env`, when present).

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "https://api.steampowered.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} has an invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Steam Web API key, sent as `key` with every request.
    pub api_key: String,
    /// Account used by the CLI when no identifier is given.
    pub default_steam_id: Option<String>,
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub include_played_free_games: bool,
    pub host: String,
    pub port: u16,
    pub log_dir: Option<String>,
}

impl Config {
    /// A config with defaults for everything except the API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            default_steam_id: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            include_played_free_games: false,
            host: "127.0.0.1".to_string(),
            port: 5158,
            log_dir: None,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = var("STEAM_API_KEY").ok_or(ConfigError::Missing("STEAM_API_KEY"))?;
        let mut config = Self::new(api_key);

        config.default_steam_id = var("STEAM_DEFAULT_ID");
        config.log_dir = var("LOG_DIR");

        if let Some(base_url) = var("STEAM_API_BASE_URL") {
            config.api_base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = var("STEAM_REQUEST_TIMEOUT") {
            let secs = timeout.parse::<u64>().map_err(|_| ConfigError::Invalid {
                name: "STEAM_REQUEST_TIMEOUT",
                value: timeout.clone(),
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(flag) = var("STEAM_INCLUDE_FREE_GAMES") {
            config.include_played_free_games = parse_flag(&flag).ok_or(ConfigError::Invalid {
                name: "STEAM_INCLUDE_FREE_GAMES",
                value: flag.clone(),
            })?;
        }
        if let Some(host) = var("HOST") {
            config.host = host;
        }
        if let Some(port) = var("PORT") {
            config.port = port.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: port.clone(),
            })?;
        }

        Ok(config)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_api_key() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::Missing("STEAM_API_KEY"))));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("STEAM_API_KEY", "abc")])).unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(!config.include_played_free_games);
        assert_eq!(config.listen_addr(), "127.0.0.1:5158");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("STEAM_API_KEY", "abc"),
            ("STEAM_API_BASE_URL", "http://localhost:9000/"),
            ("STEAM_REQUEST_TIMEOUT", "3"),
            ("STEAM_INCLUDE_FREE_GAMES", "yes"),
            ("STEAM_DEFAULT_ID", "76561198839172366"),
            ("PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "http://localhost:9000");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert!(config.include_played_free_games);
        assert_eq!(config.default_steam_id.as_deref(), Some("76561198839172366"));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_lookup(lookup_from(&[("STEAM_API_KEY", "abc"), ("PORT", "http")]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: "PORT", .. })));
    }
}
