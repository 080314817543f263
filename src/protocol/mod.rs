//! Protocol Module
//!
//! Defines the RESP wire protocol spoken between client and server.
//!
//! ## Request Format
//! ```text
//! *3\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n
//! ```
//!
//! ## Reply Type Markers
//! - `+`: simple line
//! - `-`: error
//! - `:`: integer
//! - `$`: bulk string
//! - `*`: array of bulk strings

mod command;
mod response;
mod codec;

pub use command::Command;
pub use response::{Bulk, Response};
pub use codec::{
    decode_response, encode_command, read_response, write_command, CRLF, MAX_ARRAY_LEN,
    MAX_BULK_LEN, MAX_LINE_LEN,
};
