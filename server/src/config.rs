use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;
use todo_core::{auth, Credentials};
use tracing::{info, warn};

pub const DEFAULT_SESSION_TTL_SECS: i64 = 60;

/// Browsers cap cookie lifetimes at 400 days.
pub const MAX_SESSION_TTL_SECS: i64 = 400 * 24 * 60 * 60;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value `{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Where todos are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Json(PathBuf),
    Sqlite(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend: Backend,
    /// Raw signing secret; a random key is generated when absent.
    pub session_secret: Option<String>,
    pub session_ttl_secs: i64,
    /// Mark the session cookie `Secure` (production deployments).
    pub secure_cookies: bool,
    pub credentials: Credentials,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            backend: Backend::Json(PathBuf::from("todos.json")),
            session_secret: None,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            secure_cookies: false,
            credentials: Credentials::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let backend = match or_default(&lookup, "TODO_BACKEND", "json").as_str() {
            "memory" => Backend::Memory,
            "json" => Backend::Json(or_default(&lookup, "TODO_PATH", "todos.json").into()),
            "sqlite" => Backend::Sqlite(or_default(&lookup, "TODO_PATH", "todos.db").into()),
            other => {
                return Err(ConfigError::Invalid {
                    key: "TODO_BACKEND",
                    value: other.to_string(),
                    reason: "expected one of memory, json, sqlite".to_string(),
                })
            }
        };

        let session_ttl_secs: i64 = try_load(&lookup, "SESSION_TTL_SECS", "60")?;
        if !(1..=MAX_SESSION_TTL_SECS).contains(&session_ttl_secs) {
            return Err(ConfigError::Invalid {
                key: "SESSION_TTL_SECS",
                value: session_ttl_secs.to_string(),
                reason: format!("must be between 1 and {MAX_SESSION_TTL_SECS}"),
            });
        }

        let username = or_default(&lookup, "LOGIN_USERNAME", &defaults.credentials.username);
        if let Some(reason) = auth::validate_username(&username) {
            return Err(ConfigError::Invalid {
                key: "LOGIN_USERNAME",
                value: username,
                reason,
            });
        }
        let password = lookup("LOGIN_PASSWORD").unwrap_or(defaults.credentials.password);
        if let Some(reason) = auth::validate_password(&password) {
            return Err(ConfigError::Invalid {
                key: "LOGIN_PASSWORD",
                value: "<hidden>".to_string(),
                reason,
            });
        }

        let session_secret = lookup("SESSION_SECRET").filter(|s| !s.is_empty());
        if session_secret.is_none() {
            warn!("SESSION_SECRET not set, sessions will not survive a restart");
        }

        Ok(Self {
            host: or_default(&lookup, "HOST", &defaults.host),
            port: try_load(&lookup, "PORT", "3000")?,
            backend,
            session_secret,
            session_ttl_secs,
            secure_cookies: lookup("APP_ENV").as_deref() == Some("production"),
            credentials: Credentials { username, password },
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = or_default(lookup, key, default);
    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value: value.clone(),
            reason: e.to_string(),
        }
    })
}
