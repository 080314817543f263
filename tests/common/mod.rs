//! Test servers
//!
//! Minimal RESP servers on 127.0.0.1:0, each running in its own thread.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

/// Read one request frame (`*N` of `$len` args); `None` on clean EOF
pub fn read_request<R: BufRead>(reader: &mut R) -> Option<Vec<Vec<u8>>> {
    let count = read_prefixed(reader, b'*')?;
    let mut args = Vec::with_capacity(count);
    for _ in 0..count {
        let len = read_prefixed(reader, b'$')?;
        let mut arg = vec![0u8; len + 2];
        reader.read_exact(&mut arg).ok()?;
        assert_eq!(&arg[len..], b"\r\n", "argument not followed by CRLF");
        arg.truncate(len);
        args.push(arg);
    }
    Some(args)
}

fn read_prefixed<R: BufRead>(reader: &mut R, marker: u8) -> Option<usize> {
    let mut line = String::new();
    if reader.read_line(&mut line).ok()? == 0 {
        return None;
    }
    let line = line.strip_suffix("\r\n").expect("request line without CRLF");
    let digits = line
        .strip_prefix(marker as char)
        .unwrap_or_else(|| panic!("expected '{}' header, got {line:?}", marker as char));
    Some(digits.parse().expect("bad length in request"))
}

/// Server that answers one connection with canned replies, in order
pub struct Scripted {
    pub addr: String,
    handle: JoinHandle<Vec<Vec<String>>>,
}

impl Scripted {
    /// Wait for the script to finish and return every request received
    pub fn received(self) -> Vec<Vec<String>> {
        self.handle.join().expect("scripted server panicked")
    }
}

pub fn scripted(replies: &[&[u8]]) -> Scripted {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let replies: Vec<Vec<u8>> = replies.iter().map(|r| r.to_vec()).collect();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut writer = stream;
        let mut received = Vec::new();

        for reply in replies {
            let Some(args) = read_request(&mut reader) else {
                break;
            };
            received.push(
                args.iter()
                    .map(|a| String::from_utf8_lossy(a).into_owned())
                    .collect(),
            );
            writer.write_all(&reply).unwrap();
            writer.flush().unwrap();
        }
        received
    });

    Scripted { addr, handle }
}

/// Server that answers every request on every connection with its last
/// argument as a bulk string. Runs until the test process exits.
pub fn echo_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else {
                break;
            };
            thread::spawn(move || serve_echo(stream));
        }
    });

    addr
}

fn serve_echo(stream: TcpStream) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut writer = stream;
    while let Some(args) = read_request(&mut reader) {
        let last = args.last().cloned().unwrap_or_default();
        let mut reply = format!("${}\r\n", last.len()).into_bytes();
        reply.extend_from_slice(&last);
        reply.extend_from_slice(b"\r\n");
        if writer.write_all(&reply).is_err() {
            break;
        }
    }
}

/// Server whose first connection gets a truncated bulk reply to its first
/// request and is then closed. Later connections are echoed as by
/// [`echo_server`].
pub fn truncating_then_echo_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    thread::spawn(move || {
        let mut first = true;
        for stream in listener.incoming() {
            let Ok(stream) = stream else {
                break;
            };
            if std::mem::take(&mut first) {
                thread::spawn(move || serve_truncated(stream));
            } else {
                thread::spawn(move || serve_echo(stream));
            }
        }
    });

    addr
}

fn serve_truncated(stream: TcpStream) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut writer = stream;
    if read_request(&mut reader).is_some() {
        let _ = writer.write_all(b"$9\r\ntrunc");
    }
}

/// Address nothing is listening on
pub fn closed_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);
    addr
}
