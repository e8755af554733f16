//! Configuration module for the NeonSki backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Error raised when an environment variable holds an unusable value.
#[derive(Debug, thiserror::Error)]
#[error("invalid value {value:?} for {name}: {reason}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
    pub reason: String,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (optional in development)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Insert the demo resorts when a listing finds none
    pub seed_demo_data: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_psk = env::var("NEONSKI_API_PSK")
            .ok()
            .filter(|psk| !psk.trim().is_empty());

        let db_path = env::var("NEONSKI_DB_PATH")
            .unwrap_or_else(|_| "./data/neonski.sqlite".to_string())
            .into();

        let raw_addr =
            env::var("NEONSKI_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind_addr = raw_addr.parse().map_err(|e: std::net::AddrParseError| ConfigError {
            name: "NEONSKI_BIND_ADDR",
            value: raw_addr.clone(),
            reason: e.to_string(),
        })?;

        let log_level = env::var("NEONSKI_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let seed_demo_data = match env::var("NEONSKI_SEED_DEMO_DATA") {
            Ok(raw) => parse_flag("NEONSKI_SEED_DEMO_DATA", &raw)?,
            Err(_) => true,
        };

        Ok(Self {
            api_psk,
            db_path,
            bind_addr,
            log_level,
            seed_demo_data,
        })
    }
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            name,
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env mutations never interleave with each other.
    #[test]
    fn test_config_from_env() {
        env::remove_var("NEONSKI_API_PSK");
        env::remove_var("NEONSKI_DB_PATH");
        env::remove_var("NEONSKI_BIND_ADDR");
        env::remove_var("NEONSKI_LOG_LEVEL");
        env::remove_var("NEONSKI_SEED_DEMO_DATA");

        let config = Config::from_env().unwrap();

        assert!(config.api_psk.is_none());
        assert_eq!(config.db_path, PathBuf::from("./data/neonski.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert!(config.seed_demo_data);

        env::set_var("NEONSKI_SEED_DEMO_DATA", "off");
        env::set_var("NEONSKI_API_PSK", "  ");
        let config = Config::from_env().unwrap();
        assert!(!config.seed_demo_data);
        assert!(config.api_psk.is_none());

        env::set_var("NEONSKI_BIND_ADDR", "not-an-address");
        let err = Config::from_env().unwrap_err();
        assert_eq!(err.name, "NEONSKI_BIND_ADDR");

        env::remove_var("NEONSKI_BIND_ADDR");
        env::remove_var("NEONSKI_SEED_DEMO_DATA");
        env::remove_var("NEONSKI_API_PSK");
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("X", "TRUE").unwrap());
        assert!(parse_flag("X", " 1 ").unwrap());
        assert!(!parse_flag("X", "no").unwrap());
        assert!(parse_flag("X", "maybe").is_err());
    }
}
