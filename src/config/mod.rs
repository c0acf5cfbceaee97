//! Configuration module for the FARMLAND site backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default third-party endpoint that receives contact form submissions.
pub const DEFAULT_CONTACT_ENDPOINT: &str = "https://formspree.io/f/xlgglpgr";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file holding the content documents
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Plain text or JSON log lines
    pub log_format: LogFormat,
    /// Built front-end directory served as the router fallback
    pub static_dir: Option<PathBuf>,
    /// Where contact form submissions are forwarded
    pub contact_endpoint: String,
    /// Timeout for the outbound contact call
    pub contact_timeout: Duration,
    /// Idle lifetime of an admin session
    pub session_ttl: Duration,
    /// Maximum gap between secret knocks; `None` keeps counting indefinitely
    pub knock_window: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let db_path = env::var("FARMLAND_DB_PATH")
            .unwrap_or_else(|_| "./data/farmland.sqlite".to_string())
            .into();

        let bind_addr = env::var("FARMLAND_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| format!("Invalid FARMLAND_BIND_ADDR format: {}", e))?;

        let log_level = env::var("FARMLAND_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = match env::var("FARMLAND_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let static_dir = env::var("FARMLAND_STATIC_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let contact_endpoint = env::var("FARMLAND_CONTACT_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_CONTACT_ENDPOINT.to_string());

        let contact_timeout = Duration::from_secs(parse_u64("FARMLAND_CONTACT_TIMEOUT_SECS", 10)?);
        let session_ttl = Duration::from_secs(parse_u64("FARMLAND_SESSION_TTL_SECS", 8 * 60 * 60)?);

        let knock_window = match parse_u64("FARMLAND_KNOCK_WINDOW_MS", 0)? {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            log_format,
            static_dir,
            contact_endpoint,
            contact_timeout,
            session_ttl,
            knock_window,
        })
    }
}

fn parse_u64(key: &str, default: u64) -> Result<u64, String> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("Invalid {} value {:?}: {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: &[&str] = &[
        "FARMLAND_DB_PATH",
        "FARMLAND_BIND_ADDR",
        "FARMLAND_LOG_LEVEL",
        "FARMLAND_LOG_FORMAT",
        "FARMLAND_STATIC_DIR",
        "FARMLAND_CONTACT_ENDPOINT",
        "FARMLAND_CONTACT_TIMEOUT_SECS",
        "FARMLAND_SESSION_TTL_SECS",
        "FARMLAND_KNOCK_WINDOW_MS",
    ];

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        for key in KEYS {
            env::remove_var(key);
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/farmland.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.static_dir.is_none());
        assert_eq!(config.contact_endpoint, DEFAULT_CONTACT_ENDPOINT);
        assert_eq!(config.contact_timeout, Duration::from_secs(10));
        assert_eq!(config.session_ttl, Duration::from_secs(28800));
        assert!(config.knock_window.is_none());
    }

    #[test]
    fn test_parse_u64_rejects_garbage() {
        env::set_var("FARMLAND_TEST_GARBAGE", "ten");
        assert!(parse_u64("FARMLAND_TEST_GARBAGE", 1).is_err());
        env::set_var("FARMLAND_TEST_GARBAGE", " 250 ");
        assert_eq!(parse_u64("FARMLAND_TEST_GARBAGE", 1).unwrap(), 250);
        env::remove_var("FARMLAND_TEST_GARBAGE");
        assert_eq!(parse_u64("FARMLAND_TEST_GARBAGE", 1).unwrap(), 1);
    }
}
