use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use tracing::warn;
use url::Url;

pub const DEFAULT_UPSTREAM_URL: &str = "https://oi-server.onrender.com/chat/completions";
pub const DEFAULT_MODEL: &str = "replicate/black-forest-labs/flux-1.1-pro";
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:3000/generate-image";

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub url: String,
    pub api_key: String,
    pub customer_id: String,
    pub default_model: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_dir: PathBuf,
    pub bind_address: SocketAddr,
    pub upstream: UpstreamConfig,
    pub proxy_url: String,
    pub database_url: String,
    pub download_dir: PathBuf,
    pub progress_interval: Duration,
}

pub static CONFIG: Lazy<Config> =
    Lazy::new(|| Config::load().expect("Failed to load configuration"));

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_url(name: &str, default: &str) -> Result<String> {
    let value = env_string(name, default);
    let trimmed = value.trim();
    Url::parse(trimmed).map_err(|err| anyhow!("Invalid {name} value '{trimmed}': {err}"))?;
    Ok(trimmed.to_string())
}

fn normalize_database_url(value: String) -> String {
    if value.starts_with("sqlite+aiosqlite://") {
        return value.replacen("sqlite+aiosqlite://", "sqlite://", 1);
    }
    value
}

impl Config {
    pub fn load() -> Result<Self> {
        let bind_raw = env_string("BIND_ADDRESS", "127.0.0.1:3000");
        let bind_address = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|err| anyhow!("Invalid BIND_ADDRESS value '{bind_raw}': {err}"))?;

        let upstream = UpstreamConfig {
            url: env_url("UPSTREAM_URL", DEFAULT_UPSTREAM_URL)?,
            api_key: env_string("UPSTREAM_API_KEY", ""),
            customer_id: env_string("UPSTREAM_CUSTOMER_ID", ""),
            default_model: env_string("DEFAULT_MODEL", DEFAULT_MODEL),
        };
        if upstream.default_model.trim().is_empty() {
            return Err(anyhow!("DEFAULT_MODEL must not be empty"));
        }

        Ok(Config {
            log_level: env_string("LOG_LEVEL", "info").to_lowercase(),
            log_dir: PathBuf::from(env_string("LOG_DIR", "logs")),
            bind_address,
            upstream,
            proxy_url: env_url("PROXY_URL", DEFAULT_PROXY_URL)?,
            database_url: normalize_database_url(env_string(
                "DATABASE_URL",
                "sqlite://studio.db?mode=rwc",
            )),
            download_dir: PathBuf::from(env_string("DOWNLOAD_DIR", "downloads")),
            progress_interval: Duration::from_millis(env_u64("PROGRESS_INTERVAL_MS", 2000).max(50)),
        })
    }

    pub fn warn_on_missing_credentials(&self) {
        if self.upstream.api_key.trim().is_empty() {
            warn!("UPSTREAM_API_KEY is empty; the image service will likely reject requests.");
        }
        if self.upstream.customer_id.trim().is_empty() {
            warn!("UPSTREAM_CUSTOMER_ID is empty; requests are sent without a customer id.");
        }
    }
}
