//! Configuration module for the task manager backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::{FixedOffset, NaiveDateTime, Utc};

use crate::errors::AppError;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,https://localhost:3000";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Origins allowed by CORS; a single "*" allows any origin
    pub cors_origins: Vec<String>,
    /// Offset of the calendar used to decide what "today" is
    pub utc_offset: FixedOffset,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("TASKMGR_DB_PATH")
            .unwrap_or_else(|_| "./data/taskmanager.sqlite".to_string())
            .into();

        let bind_addr = env::var("TASKMGR_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid TASKMGR_BIND_ADDR format: {}", e)))?;

        let log_level = env::var("TASKMGR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let cors_origins = parse_origins(
            &env::var("TASKMGR_CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
        );

        let offset_minutes: i32 = env::var("TASKMGR_UTC_OFFSET_MINUTES")
            .unwrap_or_else(|_| "0".to_string())
            .trim()
            .parse()
            .map_err(|e| {
                AppError::Internal(format!("Invalid TASKMGR_UTC_OFFSET_MINUTES: {}", e))
            })?;
        let utc_offset = offset_from_minutes(offset_minutes)?;

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            cors_origins,
            utc_offset,
        })
    }

    /// Current wall-clock time on the configured calendar.
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.utc_offset).naive_local()
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn offset_from_minutes(minutes: i32) -> Result<FixedOffset, AppError> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| AppError::Internal(format!("UTC offset out of range: {} minutes", minutes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("TASKMGR_DB_PATH");
        env::remove_var("TASKMGR_BIND_ADDR");
        env::remove_var("TASKMGR_LOG_LEVEL");
        env::remove_var("TASKMGR_CORS_ORIGINS");
        env::remove_var("TASKMGR_UTC_OFFSET_MINUTES");

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/taskmanager.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:3000", "https://localhost:3000"]
        );
        assert_eq!(config.utc_offset.local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_origins_skips_blanks() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test,"),
            vec!["http://a.test", "http://b.test"]
        );
    }

    #[test]
    fn test_offset_bounds() {
        assert_eq!(offset_from_minutes(-300).unwrap().local_minus_utc(), -18_000);
        assert!(offset_from_minutes(24 * 60).is_err());
    }
}
