use std::env;

use derive_more::Display;
use dotenv::dotenv;
use log::warn;

use crate::service::auth::jwt::JwtSecrets;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const FALLBACK_ACCESS_SECRET: &str = "fallback-access-secret";
const FALLBACK_REFRESH_SECRET: &str = "fallback-refresh-secret";

#[derive(Debug, Display, PartialEq, Eq)]
pub enum ConfigError {
    #[display(fmt = "environment variable '{}' must be set", _0)]
    Missing(String),

    #[display(fmt = "environment variable '{}' has invalid value '{}'", _0, _1)]
    Invalid(String, String),
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub jwt: JwtSecrets,
}

impl Config {
    /// Reads `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::Missing("DATABASE_URL".to_string()))?;
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let db_max_connections = parse_or(
            "DB_MAX_CONNECTIONS",
            lookup("DB_MAX_CONNECTIONS"),
            DEFAULT_MAX_CONNECTIONS,
        )?;
        let access = secret_or_fallback(
            "JWT_ACCESS_SECRET",
            lookup("JWT_ACCESS_SECRET"),
            FALLBACK_ACCESS_SECRET,
        );
        let refresh = secret_or_fallback(
            "JWT_REFRESH_SECRET",
            lookup("JWT_REFRESH_SECRET"),
            FALLBACK_REFRESH_SECRET,
        );

        Ok(Self {
            database_url,
            host,
            port,
            db_max_connections,
            jwt: JwtSecrets::new(access, refresh),
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid(key.to_string(), raw)),
        None => Ok(default),
    }
}

fn secret_or_fallback(key: &str, value: Option<String>, fallback: &str) -> String {
    match value {
        Some(secret) if !secret.is_empty() => secret,
        _ => {
            warn!("{} is not set, using the fallback secret", key);
            fallback.to_string()
        }
    }
}
