//! TOML configuration.
//!
//! ```toml
//! dialect = "postgres"
//!
//! [connection]
//! url = ":memory:"
//! timeout_ms = 5000
//! ```
//!
//! `dialect` accepts the usual aliases (`mssql`, `pg`, `sqlite`, ...) and
//! defaults to Postgres. The `[connection]` table is opaque to the compiler
//! and handed to whichever [`Connection`](crate::connection::Connection)
//! the application opens.

use std::path::{Path, PathBuf};
use std::time::Duration;

use joinery_types::{Dialect, DialectParseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    InvalidDialect(#[from] DialectParseError),
}

/// Connection settings; the core never interprets them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dialect: Dialect,
    #[serde(default)]
    pub connection: ConnectionConfig,
}

/// On-disk shape: the dialect is kept as text so unknown names surface as
/// [`ConfigError::InvalidDialect`] instead of a generic parse error.
#[derive(Deserialize)]
struct RawConfig {
    dialect: Option<String>,
    #[serde(default)]
    connection: ConnectionConfig,
}

impl Config {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            connection: ConnectionConfig::default(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.connection.url = url.into();
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        let dialect = match raw.dialect {
            Some(name) => name.parse()?,
            None => Dialect::default(),
        };
        Ok(Self {
            dialect,
            connection: raw.connection,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.connection.timeout_ms.map(Duration::from_millis)
    }
}
