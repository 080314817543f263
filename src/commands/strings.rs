//! String commands

use crate::client::Client;
use crate::error::Result;
use crate::protocol::{Bulk, Command};

impl Client {
    /// SET a key to a value
    pub fn set(&self, key: &str, value: impl AsRef<[u8]>) -> Result<()> {
        self.execute_ok(&Command::new("SET").with_arg(key).with_arg(value))
    }

    /// GET; `None` if the key does not exist
    pub fn get(&self, key: &str) -> Result<Option<Bulk>> {
        self.execute_bulk(&Command::new("GET").with_arg(key))
    }

    /// INCR; returns the new value
    pub fn incr(&self, key: &str) -> Result<i64> {
        self.count(&Command::new("INCR").with_arg(key))
    }

    /// INCRBY; returns the new value
    pub fn incr_by(&self, key: &str, delta: i64) -> Result<i64> {
        self.count(&Command::new("INCRBY").with_arg(key).with_int(delta))
    }

    /// APPEND; returns the new length
    pub fn append(&self, key: &str, value: impl AsRef<[u8]>) -> Result<i64> {
        self.count(&Command::new("APPEND").with_arg(key).with_arg(value))
    }

    /// STRLEN; 0 for a missing key
    pub fn strlen(&self, key: &str) -> Result<i64> {
        self.count(&Command::new("STRLEN").with_arg(key))
    }
}
