//! Configuration for mpdlink
//!
//! Centralized configuration with sensible defaults.

use crate::error::{MpdError, Result};

/// Default MPD host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default MPD port
pub const DEFAULT_PORT: u16 = 6600;

/// Connection configuration for a single MPD session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Endpoint
    // -------------------------------------------------------------------------
    /// Daemon host name or IP address
    pub host: String,

    /// Daemon TCP port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Timeouts (0 disables the timeout)
    // -------------------------------------------------------------------------
    /// TCP connect timeout (milliseconds)
    pub connect_timeout_ms: u64,

    /// Socket read timeout (milliseconds)
    pub read_timeout_ms: u64,

    /// Socket write timeout (milliseconds)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Framing
    // -------------------------------------------------------------------------
    /// Size of each chunked read from the socket (bytes)
    pub read_chunk_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout_ms: 5000,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            read_chunk_size: 16 * 1024, // 16 KB
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Defaults overridden by the conventional `MPD_HOST` / `MPD_PORT` variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::var("MPD_HOST").ok(),
            std::env::var("MPD_PORT").ok(),
        )
    }

    fn from_vars(host: Option<String>, port: Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
            config.host = host.trim().to_string();
        }

        if let Some(port) = port {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| MpdError::Config(format!("invalid MPD_PORT: {:?}", port)))?;
        }

        Ok(config)
    }

    /// `host:port` string used for address resolution
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the daemon host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the daemon port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the size of each socket read (in bytes, at least 1)
    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.config.read_chunk_size = size.max(1);
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
