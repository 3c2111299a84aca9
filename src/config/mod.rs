//! Application configuration management.

use std::env;

use anyhow::{Context, Result};

/// Configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database URL (e.g. `sqlite://./data/cinetrack.db`).
    pub database_url: String,

    /// Maximum connection pool size.
    pub max_connections: u32,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// development defaults.
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/cinetrack.db".to_string());

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .map(|s| s.parse())
            .transpose()
            .context("Invalid DATABASE_MAX_CONNECTIONS")?
            .unwrap_or(5);

        Ok(Self { database_url, max_connections })
    }
}
