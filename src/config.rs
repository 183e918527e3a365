use std::env;

use log::LevelFilter;

pub struct Config {
    pub api_host: String,
    pub api_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub log_level: LevelFilter,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Missing or unparseable values take defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            api_host: lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            api_port: lookup("API_PORT")
                .and_then(|port| port.parse().ok())
                .unwrap_or(8001),
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://music-library.db?mode=rwc".to_string()),
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|max| max.parse().ok())
                .filter(|max| *max > 0)
                .unwrap_or(10),
            log_level: lookup("LOG_LEVEL")
                .and_then(|level| level.parse().ok())
                .unwrap_or(LevelFilter::Info),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}
