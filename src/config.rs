use std::env;
use std::num::ParseIntError;
use std::str::FromStr;

use actix_web::cookie::Key;
use log::warn;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a number: {source}")]
    InvalidNumber {
        var: &'static str,
        source: ParseIntError,
    },

    #[error("SESSION_SECRET must be at least 64 bytes long")]
    ShortSessionSecret,
}

/// Runtime settings, read from the environment (and `.env`).
pub struct Config {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    pub session_key: Key,
    pub cookie_secure: bool,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match env::var("PORT") {
            Ok(v) => parse_number("PORT", &v)?,
            Err(_) => 8080,
        };
        let mongodb_uri =
            env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://127.0.0.1:27017".to_string());
        let database_name = env::var("DATABASE_NAME").unwrap_or_else(|_| "stayfinder".to_string());

        let session_key = session_key(env::var("SESSION_SECRET").ok())?;

        let cookie_secure = env::var("COOKIE_SECURE")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(v) => parse_number("BCRYPT_COST", &v)?,
            Err(_) => bcrypt::DEFAULT_COST,
        };

        Ok(Config {
            host,
            port,
            mongodb_uri,
            database_name,
            session_key,
            cookie_secure,
            bcrypt_cost,
        })
    }
}

fn parse_number<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr<Err = ParseIntError>,
{
    raw.trim()
        .parse()
        .map_err(|source| ConfigError::InvalidNumber { var, source })
}

/// Signing key for the session cookie.
///
/// Without a secret a random key is used, so sessions end when the
/// process restarts.
fn session_key(secret: Option<String>) -> Result<Key, ConfigError> {
    match secret {
        Some(secret) => {
            Key::try_from(secret.as_bytes()).map_err(|_| ConfigError::ShortSessionSecret)
        }
        None => {
            warn!("SESSION_SECRET is not set; using a random session key");
            Ok(Key::generate())
        }
    }
}
