//! Connection-level commands

use crate::client::Client;
use crate::error::Result;
use crate::protocol::Command;

impl Client {
    /// PING; returns the server's status line (normally `PONG`)
    pub fn ping(&self) -> Result<String> {
        self.execute_line(&Command::new("PING"))
    }

    /// SELECT a logical database on this connection
    pub fn select(&self, db: i64) -> Result<()> {
        self.execute_ok(&Command::new("SELECT").with_int(db))
    }

    /// FLUSHDB the selected database
    pub fn flushdb(&self) -> Result<()> {
        self.execute_ok(&Command::new("FLUSHDB"))
    }
}
