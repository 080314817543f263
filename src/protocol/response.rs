//! Response definitions
//!
//! One decoded reply from the server.

use std::str::FromStr;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{FramePart, RespError, Result};

/// A decoded reply
///
/// The variant is fixed by the leading type marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `+<text>`
    SimpleLine(String),

    /// `:<n>`
    Integer(i64),

    /// `-<message>`
    Error(String),

    /// `$<len>` body; `None` for `$-1`
    BulkString(Option<Bulk>),

    /// `*<count>` bulk elements; `None` for `*-1`
    Array(Option<Vec<Option<Bulk>>>),
}

impl Response {
    /// True for a `+OK` status line
    pub fn is_ok(&self) -> bool {
        matches!(self, Response::SimpleLine(line) if line == "OK")
    }

    /// True for a nil bulk string
    pub fn is_nil(&self) -> bool {
        matches!(self, Response::BulkString(None))
    }

    /// The server error carried by an `Error` reply, if any
    pub fn as_error(&self) -> Option<RespError> {
        match self {
            Response::Error(message) => Some(RespError::Server(message.clone())),
            _ => None,
        }
    }

    /// Turn an `Error` reply into `Err`, pass everything else through
    pub fn into_result(self) -> Result<Response> {
        match self {
            Response::Error(message) => Err(RespError::Server(message)),
            other => Ok(other),
        }
    }

    /// Short name of the active variant, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Response::SimpleLine(_) => "simple line",
            Response::Integer(_) => "integer",
            Response::Error(_) => "error",
            Response::BulkString(_) => "bulk string",
            Response::Array(_) => "array",
        }
    }
}

/// Body of a bulk string reply
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bulk(Bytes);

impl Bulk {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Bulk(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lossy UTF-8 view
    pub fn to_str(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }

    /// Parse the body as a number, bool, or anything else `FromStr`
    pub fn parse<T: FromStr>(&self) -> Result<T> {
        std::str::from_utf8(&self.0)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                RespError::protocol(
                    FramePart::Payload,
                    format!(
                        "cannot parse bulk '{}' as {}",
                        self.to_str(),
                        std::any::type_name::<T>()
                    ),
                )
            })
    }

    /// Decode a bincode-encoded value stored in the body
    pub fn decode_bincode<T: DeserializeOwned>(&self) -> Result<T> {
        bincode::deserialize(&self.0).map_err(|e| {
            RespError::protocol(FramePart::Payload, format!("bincode decode failed: {e}"))
        })
    }

    /// Decode a JSON document stored in the body
    pub fn decode_json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.0).map_err(|e| {
            RespError::protocol(FramePart::Payload, format!("json decode failed: {e}"))
        })
    }
}

impl AsRef<[u8]> for Bulk {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bulk {
    fn from(bytes: Vec<u8>) -> Self {
        Bulk(Bytes::from(bytes))
    }
}

impl From<&str> for Bulk {
    fn from(s: &str) -> Self {
        Bulk(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl PartialEq<[u8]> for Bulk {
    fn eq(&self, other: &[u8]) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Bulk {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}
