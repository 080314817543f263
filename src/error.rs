//! Error types for resplink
//!
//! Provides a unified error type for all operations.
//!
//! Errors fall into two families that callers usually want to tell apart:
//! - **transport** failures (`Io`, `Dial`, `Protocol`) leave the connection in
//!   an undefined buffering state; it should not be reused
//! - **command** failures (`Server`, `NotOk`, `UnexpectedResponse`) are
//!   ordinary replies; the connection stays usable

use std::fmt;

use thiserror::Error;

/// Result type alias using RespError
pub type Result<T> = std::result::Result<T, RespError>;

/// Which part of a frame the decoder was reading when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePart {
    /// Type marker or line body
    Header,
    /// Integer line of a length, count or integer reply
    Length,
    /// Bulk string body
    Payload,
    /// Trailing CRLF
    Terminator,
}

impl fmt::Display for FramePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FramePart::Header => "header",
            FramePart::Length => "length",
            FramePart::Payload => "payload",
            FramePart::Terminator => "terminator",
        };
        f.write_str(name)
    }
}

/// Unified error type for resplink operations
#[derive(Debug, Error)]
pub enum RespError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to connect to {addr}: {source}")]
    Dial {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Protocol error in {part}: {detail}")]
    Protocol { part: FramePart, detail: String },

    // -------------------------------------------------------------------------
    // Command Errors
    // -------------------------------------------------------------------------
    #[error("Server error: {0}")]
    Server(String),

    #[error("Response not OK: {0}")]
    NotOk(String),

    #[error("Unexpected response: expected {expected}, got {got}")]
    UnexpectedResponse {
        expected: &'static str,
        got: &'static str,
    },

    // -------------------------------------------------------------------------
    // Pool Errors
    // -------------------------------------------------------------------------
    #[error("Timed out waiting for an idle connection")]
    PoolTimeout,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RespError {
    /// Shorthand for building a protocol error
    pub fn protocol(part: FramePart, detail: impl Into<String>) -> Self {
        RespError::Protocol {
            part,
            detail: detail.into(),
        }
    }

    /// True if the failure broke the connection's framing
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            RespError::Io(_) | RespError::Dial { .. } | RespError::Protocol { .. }
        )
    }

    /// True if the server rejected the command with a `-` reply
    pub fn is_server_error(&self) -> bool {
        matches!(self, RespError::Server(_))
    }

    /// The frame part a protocol error occurred in, if any
    pub fn frame_part(&self) -> Option<FramePart> {
        match self {
            RespError::Protocol { part, .. } => Some(*part),
            _ => None,
        }
    }
}
