//! Server configuration from environment variables.
//!
//! - `CAA_DB_PATH`: SQLite database file path (default: "caa.db")
//! - `CAA_PORT`: listen port (default: 3000)
//! - `CAA_LABELS`: repeat-unit label table, `en` or `fa` (default: "en")
//! - `CAA_SESSION_TIMEOUT_SECS`: idle edit sessions are dropped after this
//!   many seconds (default: 1800)
//!
//! A `.env` file in the working directory is loaded first when present.

use std::time::Duration;

use caa_core::labels::StaticLabels;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a number, got '{value}'")]
    NotANumber { var: &'static str, value: String },

    #[error("CAA_LABELS must be 'en' or 'fa', got '{0}'")]
    UnknownLabels(String),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db_path: String,
    pub port: u16,
    pub labels: StaticLabels,
    pub session_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            db_path: "caa.db".to_string(),
            port: 3000,
            labels: StaticLabels::english(),
            session_timeout: Duration::from_secs(1800),
        }
    }
}

impl ServerConfig {
    /// Reads the process environment (after loading `.env`, if any).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = ServerConfig::default();

        if let Some(path) = lookup("CAA_DB_PATH") {
            config.db_path = path;
        }
        if let Some(port) = lookup("CAA_PORT") {
            config.port = parse_number("CAA_PORT", &port)?;
        }
        if let Some(tag) = lookup("CAA_LABELS") {
            config.labels = StaticLabels::for_locale(&tag).ok_or(ConfigError::UnknownLabels(tag))?;
        }
        if let Some(secs) = lookup("CAA_SESSION_TIMEOUT_SECS") {
            config.session_timeout = Duration::from_secs(parse_number("CAA_SESSION_TIMEOUT_SECS", &secs)?);
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::NotANumber {
        var,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.db_path, "caa.db");
        assert_eq!(config.port, 3000);
        assert_eq!(config.labels, StaticLabels::english());
        assert_eq!(config.session_timeout, Duration::from_secs(1800));
    }

    #[test]
    fn reads_every_variable() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("CAA_DB_PATH", "/tmp/studio.db"),
            ("CAA_PORT", "8080"),
            ("CAA_LABELS", "fa"),
            ("CAA_SESSION_TIMEOUT_SECS", "60"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, "/tmp/studio.db");
        assert_eq!(config.port, 8080);
        assert_eq!(config.labels, StaticLabels::persian());
        assert_eq!(config.session_timeout, Duration::from_secs(60));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("CAA_PORT", "http")])),
            Err(ConfigError::NotANumber { var: "CAA_PORT", .. })
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("CAA_LABELS", "de")])),
            Err(ConfigError::UnknownLabels(_))
        ));
    }
}
