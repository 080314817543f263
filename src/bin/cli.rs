//! resplink CLI
//!
//! Sends one raw command to a server and prints the reply.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use resplink::{Client, Command, Config, Response};
use tracing_subscriber::{fmt, EnvFilter};

/// resplink CLI
#[derive(Parser, Debug)]
#[command(name = "resplink-cli")]
#[command(about = "Send a command to a RESP server")]
#[command(version)]
struct Args {
    /// Server address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:6379")]
    server: String,

    /// Dial timeout in milliseconds
    #[arg(long, default_value = "5000")]
    connect_timeout_ms: u64,

    /// Read/write deadline in milliseconds (0 = none)
    #[arg(short, long, default_value = "0")]
    timeout_ms: u64,

    /// Command name and arguments, e.g. `SET key value`
    #[arg(required = true, num_args = 1..)]
    command: Vec<String>,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,resplink=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .addr(&args.server)
        .connect_timeout(Duration::from_millis(args.connect_timeout_ms))
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .build();

    let client = match Client::from_config(config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to connect: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // clap guarantees at least one argument
    let Some(command) = Command::from_args(&args.command) else {
        return ExitCode::FAILURE;
    };

    match client.connection().request(&command) {
        Ok(response) => {
            print!("{}", render(&response));
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Request failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Render a reply the way redis-cli does
fn render(response: &Response) -> String {
    match response {
        Response::SimpleLine(line) => format!("{line}\n"),
        Response::Integer(value) => format!("(integer) {value}\n"),
        Response::Error(message) => format!("(error) {message}\n"),
        Response::BulkString(None) | Response::Array(None) => "(nil)\n".to_string(),
        Response::BulkString(Some(bulk)) => format!("{:?}\n", bulk.to_str()),
        Response::Array(Some(items)) if items.is_empty() => "(empty array)\n".to_string(),
        Response::Array(Some(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Some(bulk) => format!("{}) {:?}\n", i + 1, bulk.to_str()),
                None => format!("{}) (nil)\n", i + 1),
            })
            .collect(),
    }
}
