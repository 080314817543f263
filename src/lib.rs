//! # resplink
//!
//! A blocking client for RESP (the Redis serialization protocol) with:
//! - A strict, length-accounted wire codec
//! - One-request-in-flight transport per connection, serialized by a lock
//! - A bounded connection pool with explicit checkout and return
//! - Typed command sets for keys, strings and sorted sets
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Command Sets (keys, strings, zset)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Command / Response
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Client  /  Pool (checkout)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                Connection (Mutex, round trip)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Encoder   │          │   Decoder   │
//!   │ (BufWriter) │          │ (BufReader) │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use resplink::Client;
//!
//! let client = Client::connect("127.0.0.1:6379")?;
//! client.set("greeting", "hello")?;
//! let value = client.get("greeting")?;
//! assert_eq!(value.map(|v| v.to_str()), Some("hello".to_string()));
//! # Ok::<(), resplink::RespError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;
pub mod commands;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FramePart, RespError, Result};
pub use config::Config;
pub use client::Client;
pub use network::{Connection, Pool, PooledConnection};
pub use protocol::{Bulk, Command, Response};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of resplink
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
