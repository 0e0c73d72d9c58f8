use std::env;

use anyhow::{Context, Result};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_EVENT_COUNT: usize = 100;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Demo data
    pub event_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web_host: DEFAULT_HOST.to_string(),
            web_port: DEFAULT_PORT,
            event_count: DEFAULT_EVENT_COUNT,
        }
    }
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Missing keys fall back to defaults;
    /// present but malformed values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let web_port = match lookup("API_PORT") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("API_PORT must be a port number, got {v:?}"))?,
            None => defaults.web_port,
        };

        let event_count = match lookup("EVENT_COUNT") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("EVENT_COUNT must be a non-negative integer, got {v:?}"))?,
            None => defaults.event_count,
        };

        Ok(Self {
            web_host: lookup("API_HOST").unwrap_or(defaults.web_host),
            web_port,
            event_count,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.web_host, self.web_port)
    }
}
