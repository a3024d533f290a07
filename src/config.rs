//! Configuration Module
//!
//! Handles loading server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::DEFAULT_CAPACITY;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults. They are read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub cache_capacity: usize,
    /// SQLite database file backing the store
    pub database_path: PathBuf,
    /// Seconds a verified connection is trusted before it is probed again
    pub ping_interval_secs: u64,
    /// Milliseconds a statement waits on a locked database
    pub busy_timeout_ms: u64,
    /// Maximum concurrent store workers
    pub workers: usize,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 100)
    /// - `DATABASE_PATH` - SQLite database file (default: kvdb.sqlite3)
    /// - `PING_INTERVAL_SECS` - Connection liveness interval (default: 5)
    /// - `DB_BUSY_TIMEOUT_MS` - SQLite busy timeout (default: 5000)
    /// - `WORKERS` - Concurrent store workers (default: 8)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    ///
    /// Zero is rejected for the capacity and worker count, falling back to
    /// the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_capacity: env_parse::<usize>("CACHE_CAPACITY")
                .filter(|v| *v > 0)
                .unwrap_or(defaults.cache_capacity),
            database_path: env::var("DATABASE_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            ping_interval_secs: env_parse("PING_INTERVAL_SECS")
                .unwrap_or(defaults.ping_interval_secs),
            busy_timeout_ms: env_parse("DB_BUSY_TIMEOUT_MS").unwrap_or(defaults.busy_timeout_ms),
            workers: env_parse::<usize>("WORKERS")
                .filter(|v| *v > 0)
                .unwrap_or(defaults.workers),
            server_port: env_parse("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CAPACITY,
            database_path: PathBuf::from("kvdb.sqlite3"),
            ping_interval_secs: 5,
            busy_timeout_ms: 5000,
            workers: 8,
            server_port: 8080,
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.database_path, PathBuf::from("kvdb.sqlite3"));
        assert_eq!(config.ping_interval(), Duration::from_secs(5));
        assert_eq!(config.busy_timeout(), Duration::from_millis(5000));
        assert_eq!(config.workers, 8);
        assert_eq!(config.server_port, 8080);
    }

    #[test]
    fn test_config_from_env() {
        // Single test touching the environment so tests cannot race on it
        env::remove_var("DATABASE_PATH");
        env::remove_var("PING_INTERVAL_SECS");
        env::remove_var("DB_BUSY_TIMEOUT_MS");
        env::remove_var("SERVER_PORT");
        env::set_var("CACHE_CAPACITY", "0");
        env::set_var("WORKERS", "3");

        let config = Config::from_env();
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.workers, 3);
        assert_eq!(config.database_path, PathBuf::from("kvdb.sqlite3"));
        assert_eq!(config.ping_interval_secs, 5);
        assert_eq!(config.server_port, 8080);

        env::set_var("CACHE_CAPACITY", "not a number");
        assert_eq!(Config::from_env().cache_capacity, 100);

        env::remove_var("CACHE_CAPACITY");
        env::remove_var("WORKERS");
    }
}
