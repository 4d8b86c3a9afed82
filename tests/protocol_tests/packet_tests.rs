//! Packet Tests
//!
//! Tests for fixed-length packet framing over in-memory streams.

use std::io::Cursor;

use cftp::protocol::{receive_message, receive_packet, send_message, send_packet, send_then_receive};
use cftp::CftpError;

use crate::support::{frame, MockConn, L};

#[test]
fn test_send_packet_pads_to_packet_len() {
    let mut out = Vec::new();
    send_packet(&mut out, b"cts", L).unwrap();

    assert_eq!(out.len(), L);
    assert_eq!(&out[..3], b"cts");
    assert!(out[3..].iter().all(|&b| b == 0));
}

#[test]
fn test_send_packet_rejects_oversized_payload() {
    let mut out = Vec::new();
    let result = send_packet(&mut out, &[1u8; L + 1], L);

    assert!(matches!(result, Err(CftpError::Protocol(_))));
    assert!(out.is_empty());
}

#[test]
fn test_receive_packet_reads_exactly_one_frame() {
    // Two frames back to back, as TCP may deliver them
    let mut bytes = frame(b"3:300");
    bytes.extend_from_slice(&[7u8; L]);
    let mut input = Cursor::new(bytes);

    let first = receive_packet(&mut input, L).unwrap();
    let second = receive_packet(&mut input, L).unwrap();

    assert_eq!(first.len(), L);
    assert_eq!(&first[..5], b"3:300");
    assert_eq!(&second[..], &[7u8; L][..]);
}

#[test]
fn test_binary_segment_survives_nul_bytes() {
    let payload: Vec<u8> = (0..L).map(|i| if i % 2 == 0 { 0 } else { 0xFF }).collect();
    let mut out = Vec::new();
    send_packet(&mut out, &payload, L).unwrap();

    let received = receive_packet(&mut Cursor::new(out), L).unwrap();
    assert_eq!(&received[..], &payload[..]);
}

#[test]
fn test_receive_on_closed_stream_is_transport_error() {
    let mut input = Cursor::new(vec![1u8; L / 2]);
    let result = receive_packet(&mut input, L);

    match result {
        Err(CftpError::Transport(msg)) => assert!(msg.contains("closed")),
        other => panic!("Expected transport error, got {:?}", other),
    }
}

#[test]
fn test_message_round_trip() {
    let mut out = Vec::new();
    send_message(&mut out, "get:report.txt", L).unwrap();

    let text = receive_message(&mut Cursor::new(out), L).unwrap();
    assert_eq!(text, "get:report.txt");
}

#[test]
fn test_send_then_receive() {
    let mut conn = MockConn::with_messages(&["pong:17"]);
    let reply = send_then_receive(&mut conn, "ping", L).unwrap();

    assert_eq!(reply, "pong:17");
    assert_eq!(conn.messages(), vec!["ping".to_string()]);
}
