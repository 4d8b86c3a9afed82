//! Session Tests
//!
//! Raw packets against the server, bypassing the client's own checks.

use std::fs;
use std::io::{Read, Write};
use std::net::TcpStream;

use crate::end_to_end_tests::Harness;
use crate::support::{frame, L};

fn connect(h: &Harness) -> TcpStream {
    TcpStream::connect(h.addr).unwrap()
}

fn read_text(stream: &mut TcpStream) -> String {
    let mut packet = vec![0u8; L];
    stream.read_exact(&mut packet).unwrap();
    cftp::protocol::message_text(&packet)
}

#[test]
fn test_invalid_command_gets_error() {
    let h = Harness::start();
    let mut stream = connect(&h);

    stream.write_all(&frame(b"dance")).unwrap();

    assert_eq!(read_text(&mut stream), "err:Invalid Command");
}

#[test]
fn test_case_sensitive_verbs() {
    let h = Harness::start();
    let mut stream = connect(&h);

    stream.write_all(&frame(b"PING")).unwrap();

    assert_eq!(read_text(&mut stream), "err:Invalid Command");
}

#[test]
fn test_one_command_per_connection() {
    let h = Harness::start();
    let mut stream = connect(&h);

    stream.write_all(&frame(b"ping")).unwrap();
    assert!(read_text(&mut stream).starts_with("pong:"));

    // Server closed its end after the first command
    let _ = stream.write_all(&frame(b"ping"));
    let mut rest = Vec::new();
    let read = stream.read_to_end(&mut rest).unwrap_or(0);
    assert_eq!(read, 0);
}

#[test]
fn test_server_survives_bad_sessions() {
    let h = Harness::start();

    // Disconnect without sending anything
    drop(connect(&h));

    let mut stream = connect(&h);
    stream.write_all(&frame(b"bogus")).unwrap();
    assert_eq!(read_text(&mut stream), "err:Invalid Command");

    assert!(h.client.ping().is_ok());
}

#[test]
fn test_put_with_traversal_lands_in_staging() {
    let h = Harness::start();
    let mut stream = connect(&h);

    stream.write_all(&frame(b"put:../../escape.txt")).unwrap();
    assert_eq!(read_text(&mut stream), "cts");

    stream.write_all(&frame(b"1:5")).unwrap();
    stream.write_all(&frame(b"hello")).unwrap();
    stream.write_all(&[0u8; L]).unwrap();
    drop(stream);

    // The next exchange only starts once the transfer was fully serviced
    h.client.ping().unwrap();

    assert_eq!(fs::read(h.server_staging.join("escape.txt")).unwrap(), b"hello");
}
