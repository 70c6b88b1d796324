// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and injected
//! into the services that need it. Nothing reads environment variables after
//! `AppConfig::from_env` returns.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `TOKEN_SECRET` | HMAC secret for signing session tokens | Required, no fallback |
//! | `DATA_DIR` | Root directory for the embedded database | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `ENVIRONMENT` | `production` enables the `Secure` cookie attribute | `development` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::env;
use std::path::PathBuf;

/// Environment variable name for the session token signing secret.
///
/// There is deliberately no default: a process without a configured secret
/// must fail at startup, never sign with a well-known value.
pub const TOKEN_SECRET_ENV: &str = "TOKEN_SECRET";

/// Environment variable name for the data directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the deployment environment.
pub const ENVIRONMENT_ENV: &str = "ENVIRONMENT";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Name of the database file inside the data directory.
const DATABASE_FILE: &str = "emc.redb";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{TOKEN_SECRET_ENV} must be set to a non-empty value")]
    MissingTokenSecret,

    #[error("invalid {PORT_ENV} value {0:?}: expected a port number")]
    InvalidPort(String),
}

/// Process-wide configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Secret used to sign and verify session tokens.
    pub token_secret: String,
    /// Root directory for persisted data.
    pub data_dir: PathBuf,
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Whether the process runs in production mode (affects cookie flags).
    pub production: bool,
    /// Emit JSON-formatted logs instead of the human-readable format.
    pub json_logs: bool,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// Fails when `TOKEN_SECRET` is unset or empty, or when `PORT` is not a
    /// valid port number. Everything else falls back to documented defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token_secret = env::var(TOKEN_SECRET_ENV)
            .ok()
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(ConfigError::MissingTokenSecret)?;

        let data_dir = env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match env::var(PORT_ENV) {
            Ok(raw) => parse_port(&raw)?,
            Err(_) => 8080,
        };

        let production = env::var(ENVIRONMENT_ENV)
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let json_logs = env::var(LOG_FORMAT_ENV)
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            token_secret,
            data_dir,
            host,
            port,
            production,
            json_logs,
        })
    }

    /// Path of the embedded database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPort(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_port_accepts_valid_values() {
        assert_eq!(parse_port("8080").unwrap(), 8080);
        assert_eq!(parse_port(" 3000 ").unwrap(), 3000);
    }

    #[test]
    fn parse_port_rejects_garbage() {
        assert!(matches!(parse_port("http"), Err(ConfigError::InvalidPort(_))));
        assert!(matches!(parse_port("70000"), Err(ConfigError::InvalidPort(_))));
    }

    #[test]
    fn database_path_is_under_data_dir() {
        let config = AppConfig {
            token_secret: "secret".to_string(),
            data_dir: PathBuf::from("/tmp/emc-test"),
            host: "0.0.0.0".to_string(),
            port: 8080,
            production: false,
            json_logs: false,
        };
        assert_eq!(config.database_path(), PathBuf::from("/tmp/emc-test/emc.redb"));
    }

    // Environment access is process-global, so the set and unset cases share
    // one test to avoid races under the parallel test runner.
    #[test]
    fn from_env_requires_a_token_secret() {
        env::remove_var(TOKEN_SECRET_ENV);
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::MissingTokenSecret)
        ));

        env::set_var(TOKEN_SECRET_ENV, "   ");
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::MissingTokenSecret)
        ));

        env::set_var(TOKEN_SECRET_ENV, "unit-test-secret");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.token_secret, "unit-test-secret");
        assert!(!config.production);
        env::remove_var(TOKEN_SECRET_ENV);
    }
}
