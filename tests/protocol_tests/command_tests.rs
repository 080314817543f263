//! Command Builder Tests

use resplink::protocol::{encode_command, Command};

fn args(cmd: &Command) -> Vec<String> {
    cmd.args()
        .iter()
        .map(|a| String::from_utf8_lossy(a).into_owned())
        .collect()
}

#[test]
fn test_new_holds_name() {
    let cmd = Command::new("PING");
    assert_eq!(cmd.name(), b"PING");
    assert_eq!(cmd.len(), 1);
    assert!(!cmd.is_empty());
}

#[test]
fn test_chained_appends_keep_order() {
    let mut cmd = Command::new("ZRANGEBYSCORE");
    cmd.arg_str("z")
        .arg_int(-5)
        .arg_int(10)
        .arg_str("LIMIT")
        .arg_int(0)
        .arg_int(3);

    assert_eq!(args(&cmd), ["ZRANGEBYSCORE", "z", "-5", "10", "LIMIT", "0", "3"]);
}

#[test]
fn test_owned_appends_keep_order() {
    let cmd = Command::new("RESTORE")
        .with_arg("k")
        .with_int(0)
        .with_arg(b"\x00\xff".as_slice());

    assert_eq!(cmd.len(), 4);
    assert_eq!(&cmd.args()[3][..], b"\x00\xff");
}

#[test]
fn test_int_in_other_bases() {
    let mut cmd = Command::new("X");
    cmd.arg_int_radix(255, 16).arg_int_radix(5, 2).arg_int_radix(-8, 8);
    assert_eq!(args(&cmd), ["X", "ff", "101", "-10"]);
}

#[test]
fn test_owned_str_and_radix() {
    let cmd = Command::new("X")
        .with_str("key")
        .with_radix(255, 16)
        .with_radix(-5, 2);
    assert_eq!(args(&cmd), ["X", "key", "ff", "-101"]);
}

#[test]
#[should_panic(expected = "radix")]
fn test_unsupported_base_panics() {
    Command::new("X").arg_int_radix(1, 37);
}

#[test]
#[should_panic(expected = "radix")]
fn test_owned_unsupported_base_panics() {
    let _ = Command::new("X").with_radix(1, 1);
}

#[test]
fn test_bool_literals() {
    let cmd = Command::new("X").with_bool(true).with_bool(false);
    assert_eq!(args(&cmd), ["X", "true", "false"]);
}

#[test]
fn test_raw_bytes_are_opaque() {
    let mut cmd = Command::new("SET");
    cmd.arg("key").arg([0u8, 13, 10, 255]);
    assert_eq!(&cmd.args()[2][..], &[0u8, 13, 10, 255]);
}

#[test]
fn test_from_args() {
    let cmd = Command::from_args(["GET", "k"]).unwrap();
    assert_eq!(cmd, Command::new("GET").with_arg("k"));
    assert!(Command::from_args(Vec::<&str>::new()).is_none());
}

#[test]
fn test_display_joins_with_spaces() {
    let cmd = Command::new("SET").with_arg("k").with_int(42);
    assert_eq!(cmd.to_string(), "SET k 42");
}

#[test]
fn test_encoding_does_not_consume_command() {
    let cmd = Command::new("GET").with_arg("k");
    let first = encode_command(&cmd);
    let second = encode_command(&cmd);
    assert_eq!(first, second);
    assert_eq!(cmd.len(), 2);
}
