//! Protocol codec
//!
//! Encoding of commands and decoding of replies.
//!
//! ## Wire Format
//!
//! ### Request
//! ```text
//! *<argc>\r\n
//! $<len>\r\n<bytes>\r\n      (repeated argc times)
//! ```
//!
//! ### Reply (first byte selects the shape)
//! ```text
//! +<text>\r\n                simple line
//! -<text>\r\n                error
//! :<signed int>\r\n          integer
//! $<len>\r\n<bytes>\r\n      bulk string   ($-1\r\n is nil)
//! *<count>\r\n<bulk>...      array of bulk strings   (*-1\r\n is nil)
//! ```
//!
//! Lengths bound every argument, so bytes are never escaped.

use std::io::{self, BufRead, Cursor, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FramePart, RespError, Result};
use super::{Bulk, Command, Response};

/// Line terminator
pub const CRLF: &[u8] = b"\r\n";

/// Largest bulk body the decoder will allocate (512 MB)
pub const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;

/// Largest array count the decoder will accept
pub const MAX_ARRAY_LEN: i64 = 1 << 24;

/// Longest status/error/integer line the decoder will buffer (64 KB)
pub const MAX_LINE_LEN: u64 = 64 * 1024;

// =============================================================================
// Type Markers
// =============================================================================

pub const MARKER_LINE: u8 = b'+';
pub const MARKER_ERROR: u8 = b'-';
pub const MARKER_INTEGER: u8 = b':';
pub const MARKER_BULK: u8 = b'$';
pub const MARKER_ARRAY: u8 = b'*';

// =============================================================================
// Encoding
// =============================================================================

/// Encode a command into one contiguous request frame
pub fn encode_command(command: &Command) -> Bytes {
    let args = command.args();
    let body_len: usize = args.iter().map(|a| a.len() + 16).sum();

    let mut frame = BytesMut::with_capacity(16 + body_len);
    put_header(&mut frame, MARKER_ARRAY, args.len());
    for arg in args {
        put_header(&mut frame, MARKER_BULK, arg.len());
        frame.put_slice(arg);
        frame.put_slice(CRLF);
    }

    frame.freeze()
}

fn put_header(frame: &mut BytesMut, marker: u8, len: usize) {
    frame.put_u8(marker);
    frame.put_slice(len.to_string().as_bytes());
    frame.put_slice(CRLF);
}

/// Write a command to a stream and flush it
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let frame = encode_command(command);
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Decoding
// =============================================================================

/// Read exactly one reply from a buffered stream
///
/// Consumes one complete value or fails; never returns a partial reply.
pub fn read_response<R: BufRead>(reader: &mut R) -> Result<Response> {
    let marker = read_marker(reader)?;

    match marker {
        MARKER_LINE => Ok(Response::SimpleLine(read_text_line(reader)?)),
        MARKER_ERROR => Ok(Response::Error(read_text_line(reader)?)),
        MARKER_INTEGER => Ok(Response::Integer(read_integer_line(reader)?)),
        MARKER_BULK => Ok(Response::BulkString(read_bulk_body(reader)?)),
        MARKER_ARRAY => Ok(Response::Array(read_array_body(reader)?)),
        other => Err(RespError::protocol(
            FramePart::Header,
            format!("unknown type marker '{}'", other.escape_ascii()),
        )),
    }
}

/// Decode one reply from a byte slice
///
/// Returns the reply and the number of bytes it occupied.
pub fn decode_response(bytes: &[u8]) -> Result<(Response, usize)> {
    let mut cursor = Cursor::new(bytes);
    let response = read_response(&mut cursor)?;
    Ok((response, cursor.position() as usize))
}

fn read_marker<R: BufRead>(reader: &mut R) -> Result<u8> {
    let mut marker = [0u8; 1];
    reader.read_exact(&mut marker).map_err(|e| {
        eof_as_protocol(e, FramePart::Header, "stream ended before type marker")
    })?;
    Ok(marker[0])
}

/// Read up to and including CRLF, return the bytes before it
fn read_line<R: BufRead>(reader: &mut R, part: FramePart) -> Result<Vec<u8>> {
    let mut line = Vec::new();
    reader
        .by_ref()
        .take(MAX_LINE_LEN)
        .read_until(b'\n', &mut line)?;

    if line.last() != Some(&b'\n') {
        let detail = if line.len() as u64 >= MAX_LINE_LEN {
            format!("line exceeds {MAX_LINE_LEN} bytes")
        } else {
            format!("stream ended inside line after {} bytes", line.len())
        };
        return Err(RespError::protocol(part, detail));
    }
    if !line.ends_with(CRLF) {
        return Err(RespError::protocol(
            FramePart::Terminator,
            "line terminated by bare LF",
        ));
    }

    line.truncate(line.len() - CRLF.len());
    Ok(line)
}

fn read_text_line<R: BufRead>(reader: &mut R) -> Result<String> {
    let line = read_line(reader, FramePart::Header)?;
    Ok(String::from_utf8_lossy(&line).into_owned())
}

/// Integer line rule, shared by `:`, `$` and `*`
///
/// A stray leading `$` is tolerated and stripped.
fn read_integer_line<R: BufRead>(reader: &mut R) -> Result<i64> {
    let line = read_line(reader, FramePart::Length)?;
    let digits = line.strip_prefix(b"$").unwrap_or(&line[..]);

    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| {
            RespError::protocol(
                FramePart::Length,
                format!("invalid integer '{}'", digits.escape_ascii()),
            )
        })
}

/// Body of a bulk string, after its `$` marker
fn read_bulk_body<R: BufRead>(reader: &mut R) -> Result<Option<Bulk>> {
    let len = read_integer_line(reader)?;
    if len == -1 {
        return Ok(None);
    }
    if !(0..=MAX_BULK_LEN).contains(&len) {
        return Err(RespError::protocol(
            FramePart::Length,
            format!("bulk length {len} out of range"),
        ));
    }

    let len = len as usize;
    let mut body = vec![0u8; len];
    let mut filled = 0;
    while filled < len {
        match reader.read(&mut body[filled..]) {
            Ok(0) => {
                return Err(RespError::protocol(
                    FramePart::Payload,
                    format!("stream ended after {filled} of {len} bulk bytes"),
                ))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    let mut terminator = [0u8; 2];
    reader.read_exact(&mut terminator).map_err(|e| {
        eof_as_protocol(e, FramePart::Terminator, "stream ended before bulk CRLF")
    })?;
    if terminator != CRLF {
        return Err(RespError::protocol(
            FramePart::Terminator,
            format!("expected CRLF after bulk, got '{}'", terminator.escape_ascii()),
        ));
    }

    Ok(Some(Bulk::from(body)))
}

/// Body of an array, after its `*` marker
///
/// Only bulk-string elements are supported.
fn read_array_body<R: BufRead>(reader: &mut R) -> Result<Option<Vec<Option<Bulk>>>> {
    let count = read_integer_line(reader)?;
    if count == -1 {
        return Ok(None);
    }
    if !(0..=MAX_ARRAY_LEN).contains(&count) {
        return Err(RespError::protocol(
            FramePart::Length,
            format!("array count {count} out of range"),
        ));
    }

    let count = count as usize;
    let mut elements = Vec::with_capacity(count.min(1024));
    for index in 0..count {
        let marker = read_marker(reader)?;
        if marker != MARKER_BULK {
            return Err(RespError::protocol(
                FramePart::Header,
                format!(
                    "array element {index} has marker '{}', only bulk strings are supported",
                    marker.escape_ascii()
                ),
            ));
        }
        elements.push(read_bulk_body(reader)?);
    }

    Ok(Some(elements))
}

fn eof_as_protocol(err: io::Error, part: FramePart, detail: &str) -> RespError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        RespError::protocol(part, detail)
    } else {
        RespError::Io(err)
    }
}
