use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_STATIC_DIR: &str = "public";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

/// Application configuration loaded from environment variables.
/// Fails at startup if `PORT` is missing. `GOOGLE_KEY` is only checked when
/// a contract analysis is requested.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub google_key: Option<String>,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub llm_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: require_env("PORT")?
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            google_key: std::env::var("GOOGLE_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR)),
            max_upload_bytes: optional_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            llm_timeout: Duration::from_secs(optional_env(
                "LLM_TIMEOUT_SECS",
                DEFAULT_LLM_TIMEOUT_SECS,
            )?),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Everything defaulted except the static root.
    #[cfg(test)]
    pub fn with_static_dir(static_dir: impl Into<PathBuf>) -> Self {
        Config {
            port: 0,
            google_key: None,
            static_dir: static_dir.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            llm_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            rust_log: "info".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_static_dir_uses_defaults() {
        let config = Config::with_static_dir("/srv/site");
        assert_eq!(config.static_dir, PathBuf::from("/srv/site"));
        assert_eq!(config.max_upload_bytes, 25 * 1024 * 1024);
        assert_eq!(config.llm_timeout, Duration::from_secs(120));
        assert!(config.google_key.is_none());
    }

    #[test]
    fn test_optional_env_falls_back_when_unset() {
        let value: u64 = optional_env("CLAUSELENS_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
