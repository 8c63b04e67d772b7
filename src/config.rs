// src/config.rs

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;
use thiserror::Error;

use crate::storage::{RepositoryConfig, RetryPolicy};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub listen_addr: SocketAddr,
    pub max_connections: u32,
    pub repository: RepositoryConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let listen_addr = parse_var("LISTEN_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?;
        let max_connections = parse_var("DB_MAX_CONNECTIONS", 5u32)?;

        let page_size = parse_var("PAGE_SIZE", 10i64)?;
        if page_size <= 0 {
            return Err(invalid("PAGE_SIZE", page_size, "must be positive"));
        }

        let attempts = parse_var("RETRY_ATTEMPTS", 3u32)?;
        if attempts == 0 {
            return Err(invalid("RETRY_ATTEMPTS", attempts, "must be at least 1"));
        }
        let delay_ms = parse_var("RETRY_DELAY_MS", 200u64)?;
        let backoff = parse_var("RETRY_BACKOFF", 2u32)?;

        Ok(Self {
            database_url,
            rust_log,
            listen_addr,
            max_connections,
            repository: RepositoryConfig {
                page_size,
                retry: RetryPolicy {
                    attempts,
                    delay: Duration::from_millis(delay_ms),
                    backoff,
                },
            },
        })
    }
}

fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn invalid(name: &'static str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
