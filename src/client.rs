//! Client Module
//!
//! The logical client handle: one connection plus typed reply extraction.
//! Command families live in [`crate::commands`] as further `impl Client`
//! blocks built on the helpers below.

use crate::config::Config;
use crate::error::{RespError, Result};
use crate::network::Connection;
use crate::protocol::{Bulk, Command, Response};

/// A client bound to one server connection
///
/// Safe to share across threads behind an `Arc`; calls serialize on the
/// connection lock.
#[derive(Debug)]
pub struct Client {
    config: Config,
    connection: Connection,
}

impl Client {
    /// Connect to `addr` with default settings
    ///
    /// An empty address or a bare `:port` falls back to localhost.
    pub fn connect(addr: &str) -> Result<Self> {
        Self::from_config(Config::builder().addr(addr).build())
    }

    /// Connect using an explicit config
    pub fn from_config(config: Config) -> Result<Self> {
        let config = config.normalized();
        config.validate()?;

        let connection = Connection::open(&config)?;
        tracing::debug!("Client connected to {}", connection.peer_addr());

        Ok(Self { config, connection })
    }

    /// Config in effect after defaulting
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Underlying connection
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    // =========================================================================
    // Execution Helpers
    // =========================================================================

    /// Run a command; a server error reply becomes `RespError::Server`
    pub fn execute(&self, command: &Command) -> Result<Response> {
        self.connection.request(command)?.into_result()
    }

    /// Run a command that must answer `+OK`
    pub fn execute_ok(&self, command: &Command) -> Result<()> {
        match self.execute(command)? {
            Response::SimpleLine(line) if line == "OK" => Ok(()),
            Response::SimpleLine(line) => Err(RespError::NotOk(line)),
            other => Err(unexpected("status line", &other)),
        }
    }

    /// Run a command answering a status line and return its text
    pub fn execute_line(&self, command: &Command) -> Result<String> {
        match self.execute(command)? {
            Response::SimpleLine(line) => Ok(line),
            other => Err(unexpected("status line", &other)),
        }
    }

    /// Run a command answering an integer; `None` for a nil bulk
    pub fn execute_integer(&self, command: &Command) -> Result<Option<i64>> {
        match self.execute(command)? {
            Response::Integer(value) => Ok(Some(value)),
            Response::BulkString(None) => Ok(None),
            other => Err(unexpected("integer", &other)),
        }
    }

    /// Run a command answering a bulk string; `None` for nil
    pub fn execute_bulk(&self, command: &Command) -> Result<Option<Bulk>> {
        match self.execute(command)? {
            Response::BulkString(bulk) => Ok(bulk),
            other => Err(unexpected("bulk string", &other)),
        }
    }

    /// Run a command answering an array; a nil array is empty
    pub fn execute_array(&self, command: &Command) -> Result<Vec<Option<Bulk>>> {
        match self.execute(command)? {
            Response::Array(items) => Ok(items.unwrap_or_default()),
            other => Err(unexpected("array", &other)),
        }
    }
}

pub(crate) fn unexpected(expected: &'static str, got: &Response) -> RespError {
    RespError::UnexpectedResponse {
        expected,
        got: got.kind(),
    }
}
