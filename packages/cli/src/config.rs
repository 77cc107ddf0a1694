// ABOUTME: Server configuration from environment variables
// ABOUTME: PORT, CORS_ORIGIN, and CURBSIDE_DB with sensible defaults

use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
}

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub cors_origin: String,
    pub database_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_str = env::var("PORT").unwrap_or_else(|_| "4010".to_string());
        let port = port_str.parse::<u16>()?;
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());

        let database_path = env::var("CURBSIDE_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| curbside_core::database_file());

        Ok(Config {
            port,
            cors_origin,
            database_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env mutations in parallel tests race, so all cases share one test.
    #[test]
    fn test_from_env() {
        std::env::remove_var("PORT");
        std::env::remove_var("CORS_ORIGIN");
        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 4010);
        assert!(config.cors_origin.starts_with("http://localhost"));

        std::env::set_var("PORT", "0");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::PortOutOfRange(0)));
        std::env::remove_var("PORT");
    }
}
