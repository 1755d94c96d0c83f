//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use std::time::Duration;

use serde::Deserialize;

/// How the transaction workflow keeps the credit limit and the transaction
/// history consistent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionMode {
    /// Update the limit, persist the row, restore the limit if the insert fails.
    #[default]
    Compensating,
    /// Lock the account and do every write in a single storage transaction.
    Atomic,
}

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (optional): PostgreSQL connection string; the in-memory store is used when unset
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `DATABASE_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `STORE_TIMEOUT_MS` (optional): deadline for each store call, defaults to 5000
/// - `TRANSACTION_MODE` (optional): `compensating` or `atomic`, defaults to `compensating`
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: Option<String>,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    #[serde(default)]
    pub transaction_mode: TransactionMode,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    5
}

fn default_store_timeout_ms() -> u64 {
    5000
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config: Config = envy::from_iter(vars(&[])).unwrap();

        assert!(config.database_url.is_none());
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.store_timeout(), Duration::from_secs(5));
        assert_eq!(config.transaction_mode, TransactionMode::Compensating);
    }

    #[test]
    fn test_reads_all_fields() {
        let config: Config = envy::from_iter(vars(&[
            ("DATABASE_URL", "postgres://localhost/accounts"),
            ("SERVER_PORT", "8080"),
            ("DATABASE_MAX_CONNECTIONS", "20"),
            ("STORE_TIMEOUT_MS", "250"),
            ("TRANSACTION_MODE", "atomic"),
        ]))
        .unwrap();

        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/accounts")
        );
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.database_max_connections, 20);
        assert_eq!(config.store_timeout(), Duration::from_millis(250));
        assert_eq!(config.transaction_mode, TransactionMode::Atomic);
    }

    #[test]
    fn test_rejects_unknown_transaction_mode() {
        let result = envy::from_iter::<_, Config>(vars(&[("TRANSACTION_MODE", "eventual")]));
        assert!(result.is_err());
    }
}
