use std::{env, str::FromStr, time::Duration};

use anyhow::Context;

use crate::roster::Departments;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
    pub roster_cache_ttl: Duration,
    pub departments: Departments,
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn or_default<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Reads the environment; call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            access_token_ttl: or_default("ACCESS_TOKEN_TTL", 30 * 24 * 60 * 60)?, // 30 days

            rate_login_per_min: or_default("RATE_LOGIN_PER_MIN", 60)?,
            rate_register_per_min: or_default("RATE_REGISTER_PER_MIN", 30)?,
            rate_protected_per_min: or_default("RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            roster_cache_ttl: Duration::from_secs(or_default("ROSTER_CACHE_TTL_SECS", 60)?),
            departments: env::var("DEPARTMENTS")
                .map(|list| Departments::parse(&list))
                .unwrap_or_default(),
        })
    }
}
