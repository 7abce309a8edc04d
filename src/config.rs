use std::env;
use std::fmt;
use std::time::Duration;

use crate::auth::password::{MAX_COST, MIN_COST};

const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE: &str = "todoforge";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 5;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { var: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "{} must be set", var),
            ConfigError::Invalid { var, reason } => write!(f, "{} is invalid: {}", var, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_name: String,
    pub db_timeout: Duration,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
}

impl Config {
    /// Reads configuration from the environment. `JWT_SECRET` has no default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let bcrypt_cost = parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(MIN_COST..=MAX_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                var: "BCRYPT_COST",
                reason: format!("must be between {} and {}", MIN_COST, MAX_COST),
            });
        }

        Ok(Self {
            database_url: env::var("MONGODB_URI").unwrap_or_else(|_| DEFAULT_MONGODB_URI.to_string()),
            database_name: env::var("MONGODB_DATABASE").unwrap_or_else(|_| DEFAULT_DATABASE.to_string()),
            db_timeout: Duration::from_secs(parse_var("DB_TIMEOUT_SECS", DEFAULT_DB_TIMEOUT_SECS)?),
            server_port: parse_var("PORT", DEFAULT_PORT)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            jwt_secret,
            bcrypt_cost,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match env::var(var) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
