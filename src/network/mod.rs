//! Network Module
//!
//! TCP transport to the server.
//!
//! ## Architecture
//! - One `Connection` per socket, one request in flight at a time
//! - `Pool` hands out connections for exclusive use and takes them back

mod connection;
mod pool;

pub use connection::Connection;
pub use pool::{Pool, PooledConnection};
