//! Runtime configuration, read once from the environment at startup.

use anyhow::{Context, Result};
use std::time::Duration;

const DEFAULT_CARTODB_USER: &str = "wri-01";
const DEFAULT_GEOSTORE_URL: &str = "https://api.resourcewatch.org";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3600";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint the SQL is sent to.
    pub cartodb_sql_url: String,
    /// Public endpoint used in download links.
    pub cartodb_api_url: String,
    pub cartodb_api_key: Option<String>,
    pub geostore_url: String,
    pub bind_addr: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to
    /// pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let user = get("CARTODB_USER").unwrap_or_else(|| DEFAULT_CARTODB_USER.to_string());
        let user_url = format!("https://{user}.carto.com/api/v2/sql");

        Ok(Self {
            cartodb_sql_url: get("CARTODB_SQL_URL").unwrap_or_else(|| user_url.clone()),
            cartodb_api_url: get("CARTODB_API_URL").unwrap_or(user_url),
            cartodb_api_key: get("CARTODB_API_KEY"),
            geostore_url: get("GEOSTORE_URL").unwrap_or_else(|| DEFAULT_GEOSTORE_URL.to_string()),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            request_timeout: secs(&get, "REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_timeout: secs(&get, "CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        })
    }
}

fn secs(get: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<Duration> {
    match get(key) {
        None => Ok(Duration::from_secs(default)),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Duration::from_secs)
            .with_context(|| format!("{key} must be a whole number of seconds, got '{raw}'")),
    }
}
