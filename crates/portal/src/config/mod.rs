//! Server configuration module

use clap::Parser;
use countersign_app::{config::ApiArgs, logging::LoggingArgs};

use crate::config::server::ServerRuntimeConfig;

pub(crate) mod server;

/// Countersign signing portal configuration
#[derive(Debug, Parser)]
#[command(name = "countersign-portal", about = "Countersign public signing portal", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingArgs,

    /// Backend API settings.
    #[command(flatten)]
    pub api: ApiArgs,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}
