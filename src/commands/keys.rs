//! Key space commands

use std::fmt;

use crate::client::{unexpected, Client};
use crate::error::Result;
use crate::protocol::{Bulk, Command, Response};

/// Value type stored at a key, as reported by TYPE
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyType {
    String,
    List,
    Set,
    ZSet,
    Hash,
    /// Key does not exist
    None,
    /// Any type this client does not know (e.g. `stream`)
    Other(String),
}

impl From<&str> for KeyType {
    fn from(name: &str) -> Self {
        match name {
            "string" => KeyType::String,
            "list" => KeyType::List,
            "set" => KeyType::Set,
            "zset" => KeyType::ZSet,
            "hash" => KeyType::Hash,
            "none" => KeyType::None,
            other => KeyType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyType::String => "string",
            KeyType::List => "list",
            KeyType::Set => "set",
            KeyType::ZSet => "zset",
            KeyType::Hash => "hash",
            KeyType::None => "none",
            KeyType::Other(name) => name,
        };
        f.write_str(name)
    }
}

/// Reply to OBJECT, whose shape depends on the subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectInfo {
    /// REFCOUNT, IDLETIME, FREQ
    Integer(i64),
    /// ENCODING; `None` if the key does not exist
    Text(Option<Bulk>),
}

impl Client {
    /// DEL one or more keys; returns how many existed
    pub fn del(&self, keys: &[&str]) -> Result<i64> {
        let mut command = Command::new("DEL");
        for key in keys {
            command.arg_str(key);
        }
        self.count(&command)
    }

    /// EXISTS
    pub fn exists(&self, key: &str) -> Result<bool> {
        self.flag(&Command::new("EXISTS").with_arg(key))
    }

    /// EXPIRE in seconds; false if the key does not exist
    pub fn expire(&self, key: &str, seconds: i64) -> Result<bool> {
        self.flag(&Command::new("EXPIRE").with_arg(key).with_int(seconds))
    }

    /// EXPIREAT a UNIX timestamp in seconds
    pub fn expire_at(&self, key: &str, timestamp: i64) -> Result<bool> {
        self.flag(&Command::new("EXPIREAT").with_arg(key).with_int(timestamp))
    }

    /// PEXPIRE in milliseconds
    pub fn pexpire(&self, key: &str, milliseconds: i64) -> Result<bool> {
        self.flag(&Command::new("PEXPIRE").with_arg(key).with_int(milliseconds))
    }

    /// PEXPIREAT a UNIX timestamp in milliseconds
    pub fn pexpire_at(&self, key: &str, timestamp: i64) -> Result<bool> {
        self.flag(&Command::new("PEXPIREAT").with_arg(key).with_int(timestamp))
    }

    /// TTL in seconds (`-1` no expiry, `-2` missing key)
    pub fn ttl(&self, key: &str) -> Result<i64> {
        self.count(&Command::new("TTL").with_arg(key))
    }

    /// PTTL in milliseconds
    pub fn pttl(&self, key: &str) -> Result<i64> {
        self.count(&Command::new("PTTL").with_arg(key))
    }

    /// KEYS matching a glob pattern
    pub fn keys(&self, pattern: &str) -> Result<Vec<Bulk>> {
        let items = self.execute_array(&Command::new("KEYS").with_arg(pattern))?;
        Ok(items.into_iter().flatten().collect())
    }

    /// DUMP a key's serialized value
    pub fn dump(&self, key: &str) -> Result<Option<Bulk>> {
        self.execute_bulk(&Command::new("DUMP").with_arg(key))
    }

    /// MOVE a key to another database
    pub fn move_key(&self, key: &str, db: i64) -> Result<bool> {
        self.flag(&Command::new("MOVE").with_arg(key).with_int(db))
    }

    /// OBJECT <subcommand> [args...]
    pub fn object(&self, subcommand: &str, args: &[&str]) -> Result<ObjectInfo> {
        let mut command = Command::new("OBJECT");
        command.arg_str(subcommand);
        for arg in args {
            command.arg_str(arg);
        }

        match self.execute(&command)? {
            Response::Integer(value) => Ok(ObjectInfo::Integer(value)),
            Response::BulkString(bulk) => Ok(ObjectInfo::Text(bulk)),
            other => Err(unexpected("integer or bulk string", &other)),
        }
    }

    /// PERSIST; true if a timeout was removed
    pub fn persist(&self, key: &str) -> Result<bool> {
        self.flag(&Command::new("PERSIST").with_arg(key))
    }

    /// RANDOMKEY; `None` on an empty database
    pub fn random_key(&self) -> Result<Option<Bulk>> {
        self.execute_bulk(&Command::new("RANDOMKEY"))
    }

    /// RENAME
    pub fn rename(&self, key: &str, new_key: &str) -> Result<()> {
        self.execute_ok(&Command::new("RENAME").with_arg(key).with_arg(new_key))
    }

    /// RENAMENX; false if `new_key` already exists
    pub fn rename_nx(&self, key: &str, new_key: &str) -> Result<bool> {
        self.flag(&Command::new("RENAMENX").with_arg(key).with_arg(new_key))
    }

    /// RESTORE a value produced by DUMP; `ttl` in milliseconds, 0 for none
    pub fn restore(&self, key: &str, ttl: i64, value: &[u8]) -> Result<()> {
        let command = Command::new("RESTORE")
            .with_arg(key)
            .with_int(ttl)
            .with_arg(value);
        self.execute_ok(&command)
    }

    /// TYPE
    pub fn key_type(&self, key: &str) -> Result<KeyType> {
        let line = self.execute_line(&Command::new("TYPE").with_arg(key))?;
        Ok(KeyType::from(line.as_str()))
    }

    // =========================================================================
    // Integer reply helpers
    // =========================================================================

    pub(crate) fn count(&self, command: &Command) -> Result<i64> {
        Ok(self.execute_integer(command)?.unwrap_or(0))
    }

    pub(crate) fn flag(&self, command: &Command) -> Result<bool> {
        Ok(self.count(command)? > 0)
    }
}
