//! Server configuration read from the environment at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;

/// Settings the binary needs before it can serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Root of the quest library (`QUEST_DIR`).
    pub quest_dir: PathBuf,
    /// Locale used to resolve rich text when scanning for branch markers.
    pub locale: String,
    /// PostgreSQL event store; the in-memory store is used when absent.
    pub database_url: Option<String>,
}

impl AppConfig {
    /// Reads `HOST`, `PORT`, `QUEST_DIR`, `QUEST_LOCALE` and `DATABASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid port number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => 3000,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port,
            quest_dir: lookup("QUEST_DIR").map_or_else(|| PathBuf::from("quests"), PathBuf::from),
            locale: lookup("QUEST_LOCALE").unwrap_or_else(|| "en".to_owned()),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
        })
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
