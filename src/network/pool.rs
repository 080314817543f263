//! Connection Pool
//!
//! A bounded set of connections with explicit checkout and return.
//!
//! ## Protocol
//! - `get()` takes an idle connection, or dials a new one while the pool is
//!   below `max_connections`, or blocks up to `pool_timeout` for a return
//! - dropping the [`PooledConnection`] returns it to the idle queue
//! - a connection that failed at the transport level is discarded on return
//!   and a replacement is dialed into the idle queue; if that dial fails the
//!   slot is released and a later checkout dials into it
//! - a blocked `get()` keeps retrying free slots while it waits, so it never
//!   sleeps through a released slot

use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};

use crate::config::Config;
use crate::error::{RespError, Result};
use crate::protocol::{Command, Response};
use super::Connection;

/// Longest single wait on the idle queue before re-checking for a free slot
const RETRY_SLICE: Duration = Duration::from_millis(50);

struct Shared {
    config: Config,

    /// Idle queue; capacity equals max_connections so returns never block
    idle_tx: Sender<Connection>,
    idle_rx: Receiver<Connection>,

    /// Connections alive (idle + checked out)
    size: AtomicUsize,
}

impl Shared {
    /// Dial a connection to take the place of a discarded one
    ///
    /// The discarded connection's slot is handed to the replacement, or
    /// released if the dial fails.
    fn replace(&self) {
        match Connection::open(&self.config) {
            Ok(connection) => {
                tracing::debug!("Dialed replacement connection to {}", self.config.addr);
                if self.idle_tx.try_send(connection).is_err() {
                    self.size.fetch_sub(1, Ordering::AcqRel);
                }
            }
            Err(e) => {
                tracing::warn!("Replacement dial to {} failed: {}", self.config.addr, e);
                self.size.fetch_sub(1, Ordering::AcqRel);
            }
        }
    }
}

/// Bounded pool of connections to one server
#[derive(Clone)]
pub struct Pool {
    shared: Arc<Shared>,
}

impl Pool {
    /// Create a pool and dial every connection up front
    ///
    /// Any dial failure aborts construction.
    pub fn new(config: Config) -> Result<Self> {
        let config = config.normalized();
        config.validate()?;

        let (idle_tx, idle_rx) = channel::bounded(config.max_connections);
        let shared = Arc::new(Shared {
            config,
            idle_tx,
            idle_rx,
            size: AtomicUsize::new(0),
        });

        for _ in 0..shared.config.max_connections {
            let connection = Connection::open(&shared.config)?;
            shared.size.fetch_add(1, Ordering::AcqRel);
            // Capacity is max_connections, so this cannot be full
            let _ = shared.idle_tx.try_send(connection);
        }

        tracing::info!(
            "Pool ready: {} connections to {}",
            shared.config.max_connections,
            shared.config.addr
        );

        Ok(Self { shared })
    }

    /// Check out a connection, blocking up to the configured pool timeout
    pub fn get(&self) -> Result<PooledConnection> {
        if let Some(pooled) = self.try_get()? {
            return Ok(pooled);
        }

        let timeout = self.shared.config.pool_timeout;
        let deadline = Instant::now() + timeout;
        tracing::debug!("Pool exhausted, waiting up to {:?}", timeout);

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(RespError::PoolTimeout);
            }

            match self.shared.idle_rx.recv_timeout(remaining.min(RETRY_SLICE)) {
                Ok(connection) => return Ok(self.wrap(connection)),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Err(RespError::PoolTimeout),
            }

            if let Some(pooled) = self.try_get()? {
                return Ok(pooled);
            }
        }
    }

    /// Check out a connection without waiting
    ///
    /// Returns `Ok(None)` when every connection is busy.
    pub fn try_get(&self) -> Result<Option<PooledConnection>> {
        if let Ok(connection) = self.shared.idle_rx.try_recv() {
            return Ok(Some(self.wrap(connection)));
        }

        if !self.reserve_slot() {
            return Ok(None);
        }
        match Connection::open(&self.shared.config) {
            Ok(connection) => Ok(Some(self.wrap(connection))),
            Err(e) => {
                self.shared.size.fetch_sub(1, Ordering::AcqRel);
                Err(e)
            }
        }
    }

    /// Run one round trip on a checked-out connection
    pub fn request(&self, command: &Command) -> Result<Response> {
        self.get()?.request(command)
    }

    /// Connections currently idle
    pub fn idle_count(&self) -> usize {
        self.shared.idle_rx.len()
    }

    /// Connections currently alive
    pub fn size(&self) -> usize {
        self.shared.size.load(Ordering::Acquire)
    }

    /// Upper bound on `size()`
    pub fn capacity(&self) -> usize {
        self.shared.config.max_connections
    }

    fn reserve_slot(&self) -> bool {
        let max = self.shared.config.max_connections;
        self.shared
            .size
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < max).then_some(n + 1))
            .is_ok()
    }

    fn wrap(&self, connection: Connection) -> PooledConnection {
        PooledConnection {
            connection: Some(connection),
            shared: Arc::clone(&self.shared),
        }
    }
}

/// A checked-out connection; returned to the pool on drop
pub struct PooledConnection {
    connection: Option<Connection>,
    shared: Arc<Shared>,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        // Only taken in drop
        self.connection.as_ref().expect("pooled connection already returned")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        let Some(connection) = self.connection.take() else {
            return;
        };

        if connection.is_broken() {
            tracing::warn!("Discarding broken connection to {}", connection.peer_addr());
            drop(connection);
            self.shared.replace();
            return;
        }

        if self.shared.idle_tx.try_send(connection).is_err() {
            self.shared.size.fetch_sub(1, Ordering::AcqRel);
        }
    }
}
