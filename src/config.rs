use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("Invalid {key} value: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Settings read from the environment (and `.env`) at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub upload_dir: PathBuf,
    pub mail_api_url: Option<String>,
    pub mail_api_key: Option<String>,
    pub mail_from: String,
    pub public_base_url: String,
    /// Super admin created on startup when the admins table is empty.
    pub bootstrap_admin_email: Option<String>,
    pub bootstrap_admin_password: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: var_or("HOST", "127.0.0.1"),
            port: parse_or("PORT", 8080)?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiration_hours: parse_or("JWT_EXPIRATION_HOURS", 168)?,
            upload_dir: PathBuf::from(var_or("UPLOAD_DIR", "./uploads")),
            mail_api_url: optional("MAIL_API_URL"),
            mail_api_key: optional("MAIL_API_KEY"),
            mail_from: var_or("MAIL_FROM", "no-reply@localhost"),
            public_base_url: var_or("PUBLIC_BASE_URL", "http://localhost:5173"),
            bootstrap_admin_email: optional("ADMIN_EMAIL"),
            bootstrap_admin_password: optional("ADMIN_PASSWORD"),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

fn var_or(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| {
        log::info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn parse_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match optional(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}
