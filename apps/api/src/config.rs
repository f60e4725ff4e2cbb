use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; a value that is present but malformed is a startup error.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// External AI collaborator. `None` degrades every AI call to its placeholder.
    pub ai_endpoint: Option<String>,
    pub ai_timeout: Duration,
    pub docx_acquire_timeout: Duration,
    pub docx_acquire_attempts: u32,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let ai_endpoint = lookup("AI_ENDPOINT")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080u16).context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            ai_endpoint,
            ai_timeout: Duration::from_secs(
                parse_or(&lookup, "AI_TIMEOUT_SECS", 60u64)
                    .context("AI_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            docx_acquire_timeout: Duration::from_millis(
                parse_or(&lookup, "DOCX_ACQUIRE_TIMEOUT_MS", 5000u64)
                    .context("DOCX_ACQUIRE_TIMEOUT_MS must be a whole number of milliseconds")?,
            ),
            docx_acquire_attempts: parse_or(&lookup, "DOCX_ACQUIRE_ATTEMPTS", 3u32)
                .context("DOCX_ACQUIRE_ATTEMPTS must be a positive integer")?,
            max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", 1_048_576usize)
                .context("MAX_BODY_BYTES must be a byte count")?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value {raw:?} for '{key}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert!(config.ai_endpoint.is_none());
        assert_eq!(config.ai_timeout, Duration::from_secs(60));
        assert_eq!(config.docx_acquire_timeout, Duration::from_millis(5000));
        assert_eq!(config.docx_acquire_attempts, 3);
        assert_eq!(config.max_body_bytes, 1_048_576);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "3000"),
            ("AI_ENDPOINT", " http://localhost:9000/ai "),
            ("DOCX_ACQUIRE_ATTEMPTS", "5"),
        ])
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.ai_endpoint.as_deref(), Some("http://localhost:9000/ai"));
        assert_eq!(config.docx_acquire_attempts, 5);
    }

    #[test]
    fn test_blank_endpoint_is_unset() {
        assert!(config(&[("AI_ENDPOINT", "  ")]).unwrap().ai_endpoint.is_none());
    }

    #[test]
    fn test_malformed_numbers_are_errors() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        assert!(format!("{err:#}").contains("PORT must be a valid port number"));
        assert!(config(&[("MAX_BODY_BYTES", "-1")]).is_err());
        assert!(config(&[("AI_TIMEOUT_SECS", "1.5")]).is_err());
    }
}
