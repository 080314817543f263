//! Configuration for resplink
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{RespError, Result};

/// Default server address
pub const DEFAULT_ADDR: &str = "127.0.0.1:6379";

/// Default number of pooled connections
pub const DEFAULT_MAX_CONNECTIONS: usize = 10;

/// Default dial timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Main configuration for a client or pool
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Server address (host:port)
    pub addr: String,

    /// Bound on the initial dial
    pub connect_timeout: Duration,

    /// Socket read deadline per round trip (None blocks indefinitely)
    pub read_timeout: Option<Duration>,

    /// Socket write deadline per round trip (None blocks indefinitely)
    pub write_timeout: Option<Duration>,

    // -------------------------------------------------------------------------
    // Pool Configuration
    // -------------------------------------------------------------------------
    /// Number of connections a pool dials up front
    pub max_connections: usize,

    /// How long `Pool::get` waits for an idle connection
    pub pool_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: None,
            write_timeout: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            pool_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Fill in zero/empty fields with defaults
    ///
    /// - empty address → `127.0.0.1:6379`
    /// - `:port` → `127.0.0.1:port`
    /// - zero connections → 10
    /// - zero connect timeout → 5s
    /// - zero read/write timeout → none
    pub fn normalized(mut self) -> Self {
        let addr = self.addr.trim();
        if addr.is_empty() {
            self.addr = DEFAULT_ADDR.to_string();
        } else if let Some(port) = addr.strip_prefix(':') {
            self.addr = format!("127.0.0.1:{port}");
        }
        if self.max_connections == 0 {
            self.max_connections = DEFAULT_MAX_CONNECTIONS;
        }
        if self.connect_timeout.is_zero() {
            self.connect_timeout = DEFAULT_CONNECT_TIMEOUT;
        }
        self.read_timeout = self.read_timeout.filter(|t| !t.is_zero());
        self.write_timeout = self.write_timeout.filter(|t| !t.is_zero());
        self
    }

    /// Check the address has a host and a numeric port
    pub fn validate(&self) -> Result<()> {
        let (host, port) = self
            .addr
            .rsplit_once(':')
            .ok_or_else(|| RespError::Config(format!("address '{}' has no port", self.addr)))?;
        if host.is_empty() {
            return Err(RespError::Config(format!("address '{}' has no host", self.addr)));
        }
        port.parse::<u16>()
            .map_err(|_| RespError::Config(format!("invalid port in address '{}'", self.addr)))?;
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server address
    pub fn addr(mut self, addr: impl Into<String>) -> Self {
        self.config.addr = addr.into();
        self
    }

    /// Set the dial timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the read deadline (in milliseconds, 0 = none)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout = Some(Duration::from_millis(ms));
        self
    }

    /// Set the write deadline (in milliseconds, 0 = none)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout = Some(Duration::from_millis(ms));
        self
    }

    /// Set the pool size
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the pool checkout timeout
    pub fn pool_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_timeout = timeout;
        self
    }

    pub fn build(self) -> Config {
        self.config.normalized()
    }
}
