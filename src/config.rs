use crate::persistence::DatabaseConfig;
use std::net::SocketAddr;
use tracing::warn;

/// Which news source implementation to run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsMode {
    /// Offline canned articles; no network needed.
    Scripted,
    /// Remote text-generation API.
    Http,
}

/// News source configuration
#[derive(Debug, Clone)]
pub struct NewsConfig {
    pub mode: NewsMode,
    pub api_base: String,
    pub model: String,
    pub api_key: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            mode: NewsMode::Scripted,
            api_base: "http://localhost:8080".to_string(),
            model: "newsroom-small".to_string(),
            api_key: String::new(),
        }
    }
}

/// Top-level runtime configuration, loaded from environment variables
/// (a `.env` file is honored).
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub bind_addr: SocketAddr,
    /// Account key under which the session snapshot is persisted.
    pub account: String,
    pub database: DatabaseConfig,
    pub news: NewsConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            account: "classroom".to_string(),
            database: DatabaseConfig::default(),
            news: NewsConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load from environment variables, falling back to defaults for
    /// anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = SimulationConfig::default();

        let bind_addr = match std::env::var("MOJU_BIND_ADDR") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Invalid MOJU_BIND_ADDR '{}', using default", raw);
                defaults.bind_addr
            }),
            Err(_) => defaults.bind_addr,
        };

        let account = std::env::var("MOJU_ACCOUNT").unwrap_or(defaults.account);

        let mode = match std::env::var("MOJU_NEWS_MODE").as_deref() {
            Ok("http") => NewsMode::Http,
            Ok("scripted") | Err(_) => NewsMode::Scripted,
            Ok(other) => {
                warn!("Unknown MOJU_NEWS_MODE '{}', using scripted source", other);
                NewsMode::Scripted
            }
        };

        let news = NewsConfig {
            mode,
            api_base: std::env::var("NEWS_API_BASE").unwrap_or(defaults.news.api_base),
            model: std::env::var("NEWS_MODEL").unwrap_or(defaults.news.model),
            api_key: std::env::var("NEWS_API_KEY").unwrap_or_default(),
        };

        SimulationConfig {
            bind_addr,
            account,
            database: DatabaseConfig::from_env(),
            news,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.account, "classroom");
        assert_eq!(config.news.mode, NewsMode::Scripted);
    }
}
