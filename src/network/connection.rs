//! Connection
//!
//! One TCP connection to the server and its request/response transport.
//!
//! Every round trip (write, flush, read one reply) runs under the
//! connection's lock, so concurrent callers never interleave frames and
//! replies are read back in the order the lock was acquired.
//!
//! There is no per-request cancellation. Without read/write deadlines
//! (see [`Connection::set_timeouts`]) a stalled server blocks the caller and
//! everyone queued behind it indefinitely.

use std::io::{self, BufReader, BufWriter, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{RespError, Result};
use crate::protocol::{encode_command, read_response, Command, Response};

/// Buffered halves of the socket
struct Stream {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,
}

impl Stream {
    fn round_trip(&mut self, command: &Command) -> Result<Response> {
        let frame = encode_command(command);
        self.writer.write_all(&frame)?;
        self.writer.flush()?;
        read_response(&mut self.reader)
    }
}

/// A single client connection
pub struct Connection {
    stream: Mutex<Stream>,

    /// Set once a round trip fails below the command level
    broken: AtomicBool,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Dial `addr` (host:port), bounding each attempt by `timeout`
    ///
    /// Every resolved address is tried in order; the last failure is reported.
    pub fn connect(addr: &str, timeout: Duration) -> Result<Self> {
        let dial_error = |source: io::Error| RespError::Dial {
            addr: addr.to_string(),
            source,
        };

        let candidates: Vec<SocketAddr> = addr.to_socket_addrs().map_err(dial_error)?.collect();

        let mut last_error =
            io::Error::new(io::ErrorKind::InvalidInput, "address resolved to nothing");
        for candidate in candidates {
            match TcpStream::connect_timeout(&candidate, timeout) {
                Ok(stream) => {
                    tracing::debug!("Connected to {} ({})", addr, candidate);
                    return Self::from_stream(stream);
                }
                Err(e) => {
                    tracing::debug!("Dial {} ({}) failed: {}", addr, candidate, e);
                    last_error = e;
                }
            }
        }

        Err(dial_error(last_error))
    }

    /// Dial using a config's address, connect timeout and deadlines
    pub fn open(config: &Config) -> Result<Self> {
        let connection = Self::connect(&config.addr, config.connect_timeout)?;
        connection.set_timeouts(config.read_timeout, config.write_timeout)?;
        Ok(connection)
    }

    /// Wrap an already connected stream
    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm: one small frame per round trip
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            stream: Mutex::new(Stream {
                reader: BufReader::new(read_stream),
                writer: BufWriter::new(write_stream),
            }),
            broken: AtomicBool::new(false),
            peer_addr,
        })
    }

    /// Configure socket deadlines for reads and writes
    ///
    /// `None` (or a zero duration) means block indefinitely. A deadline that
    /// fires mid round trip surfaces as an I/O error and breaks the connection.
    pub fn set_timeouts(&self, read: Option<Duration>, write: Option<Duration>) -> Result<()> {
        let read = read.filter(|d| !d.is_zero());
        let write = write.filter(|d| !d.is_zero());

        let stream = self.stream.lock();
        stream.reader.get_ref().set_read_timeout(read)?;
        stream.writer.get_ref().set_write_timeout(write)?;
        Ok(())
    }

    /// Send one command and read its reply
    ///
    /// A server `-ERR` reply is returned as `Ok(Response::Error(..))`. Any
    /// transport or framing failure is returned as `Err` and marks the
    /// connection broken; it is never retried.
    pub fn request(&self, command: &Command) -> Result<Response> {
        let mut stream = self.stream.lock();

        tracing::trace!("Sending to {}: {}", self.peer_addr, command);

        match stream.round_trip(command) {
            Ok(response) => {
                tracing::trace!("Received {} from {}", response.kind(), self.peer_addr);
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(
                    "Round trip with {} failed for {}: {}",
                    self.peer_addr,
                    String::from_utf8_lossy(command.name()),
                    e
                );
                self.broken.store(true, Ordering::Release);
                Err(e)
            }
        }
    }

    /// True once a round trip has failed at the transport level
    pub fn is_broken(&self) -> bool {
        self.broken.load(Ordering::Acquire)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        tracing::debug!("Closing connection to {}", self.peer_addr);
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("peer_addr", &self.peer_addr)
            .field("broken", &self.is_broken())
            .finish()
    }
}
