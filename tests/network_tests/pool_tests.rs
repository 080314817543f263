//! Pool Tests
//!
//! Checkout, return, exhaustion and discard of broken connections.

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use resplink::protocol::{Bulk, Command, Response};
use resplink::{Config, Pool, RespError};

fn pool_config(addr: &str, size: usize) -> Config {
    Config::builder()
        .addr(addr)
        .max_connections(size)
        .pool_timeout(Duration::from_millis(100))
        .build()
}

#[test]
fn test_new_dials_every_connection() {
    let addr = common::echo_server();
    let pool = Pool::new(pool_config(&addr, 3)).unwrap();

    assert_eq!(pool.size(), 3);
    assert_eq!(pool.idle_count(), 3);
    assert_eq!(pool.capacity(), 3);
}

#[test]
fn test_new_fails_when_server_is_down() {
    let addr = common::closed_addr();
    let err = Pool::new(pool_config(&addr, 2)).err().unwrap();
    assert!(matches!(err, RespError::Dial { .. }));
}

#[test]
fn test_checkout_and_return_on_drop() {
    let addr = common::echo_server();
    let pool = Pool::new(pool_config(&addr, 2)).unwrap();

    let first = pool.get().unwrap();
    assert_eq!(pool.idle_count(), 1);

    let reply = first.request(&Command::new("ECHO").with_arg("hi")).unwrap();
    assert_eq!(reply, Response::BulkString(Some(Bulk::from("hi"))));

    drop(first);
    assert_eq!(pool.idle_count(), 2);
    assert_eq!(pool.size(), 2);
}

#[test]
fn test_exhausted_pool_times_out() {
    let addr = common::echo_server();
    let pool = Pool::new(pool_config(&addr, 1)).unwrap();

    let _held = pool.get().unwrap();
    assert!(pool.try_get().unwrap().is_none());

    let started = Instant::now();
    let err = pool.get().err().unwrap();
    assert!(matches!(err, RespError::PoolTimeout));
    assert!(started.elapsed() >= Duration::from_millis(100));
}

#[test]
fn test_blocked_checkout_wakes_on_return() {
    let addr = common::echo_server();
    let config = Config::builder()
        .addr(&addr)
        .max_connections(1)
        .pool_timeout(Duration::from_secs(5))
        .build();
    let pool = Pool::new(config).unwrap();

    let held = pool.get().unwrap();
    let waiter = {
        let pool = pool.clone();
        thread::spawn(move || pool.request(&Command::new("ECHO").with_arg("after")))
    };

    thread::sleep(Duration::from_millis(50));
    drop(held);

    let reply = waiter.join().unwrap().unwrap();
    assert_eq!(reply, Response::BulkString(Some(Bulk::from("after"))));
}

#[test]
fn test_broken_connection_is_replaced_for_waiter() {
    let addr = common::truncating_then_echo_server();
    let config = Config::builder()
        .addr(&addr)
        .max_connections(1)
        .pool_timeout(Duration::from_secs(2))
        .build();
    let pool = Pool::new(config).unwrap();

    let held = pool.get().unwrap();
    let waiter = {
        let pool = pool.clone();
        thread::spawn(move || {
            let started = Instant::now();
            let reply = pool.request(&Command::new("ECHO").with_arg("after"));
            (reply, started.elapsed())
        })
    };

    thread::sleep(Duration::from_millis(50));
    assert!(held.request(&Command::new("GET").with_arg("k")).is_err());
    assert!(held.is_broken());
    drop(held);

    let (reply, waited) = waiter.join().unwrap();
    assert_eq!(reply.unwrap(), Response::BulkString(Some(Bulk::from("after"))));
    assert!(waited < Duration::from_secs(2), "waiter slept until timeout: {waited:?}");

    assert_eq!(pool.size(), 1);
    assert_eq!(pool.idle_count(), 1);
}

#[test]
fn test_failed_replacement_releases_slot() {
    let server = common::scripted(&[b"$9\r\ntrunc"]);
    let pool = Pool::new(pool_config(&server.addr, 1)).unwrap();

    let conn = pool.get().unwrap();
    assert!(conn.request(&Command::new("GET").with_arg("k")).is_err());
    assert!(conn.is_broken());

    // Script finished, so the listener is closed and the replacement dial fails
    server.received();
    drop(conn);

    assert_eq!(pool.size(), 0);
    assert_eq!(pool.idle_count(), 0);

    // The free slot is dialed again on checkout, which still fails
    assert!(matches!(pool.try_get(), Err(RespError::Dial { .. })));
    assert_eq!(pool.size(), 0);
}

#[test]
fn test_parallel_requests_share_pool() {
    let addr = common::echo_server();
    let pool = Arc::new(Pool::new(pool_config(&addr, 3)).unwrap());

    let workers: Vec<_> = (0..6)
        .map(|worker| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                for round in 0..20 {
                    let payload = format!("w{worker}-r{round}");
                    let conn = loop {
                        match pool.get() {
                            Ok(conn) => break conn,
                            Err(RespError::PoolTimeout) => continue,
                            Err(e) => panic!("checkout failed: {e}"),
                        }
                    };
                    let reply = conn.request(&Command::new("ECHO").with_arg(&payload)).unwrap();
                    assert_eq!(reply, Response::BulkString(Some(Bulk::from(payload.as_str()))));
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }
    assert_eq!(pool.size(), 3);
    assert_eq!(pool.idle_count(), 3);
}
