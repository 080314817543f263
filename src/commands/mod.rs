//! Command Sets
//!
//! Typed wrappers over [`Client`](crate::Client), grouped by data type.
//! Each one builds a [`Command`](crate::protocol::Command), runs one round
//! trip and extracts the reply variant the server documents for it.
//!
//! - `server`: PING, SELECT, FLUSHDB
//! - `keys`: generic key space operations
//! - `strings`: string values
//! - `sorted_set`: sorted sets with floating point scores

mod server;
mod keys;
mod strings;
mod sorted_set;

pub use keys::{KeyType, ObjectInfo};
pub use sorted_set::Limit;
