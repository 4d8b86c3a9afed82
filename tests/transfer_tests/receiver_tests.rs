//! Receiver Tests
//!
//! Drives the receiving side with scripted descriptor and segment packets.

use std::fs;

use cftp::transfer::{Initiative, TransferEngine, TransferLimits};
use cftp::CftpError;
use tempfile::TempDir;

use crate::support::{frame, sample_bytes, MockConn, L};

fn setup_engine() -> (TempDir, TransferEngine) {
    let temp_dir = TempDir::new().unwrap();
    let engine = TransferEngine::new(TransferLimits::new(L, 9999 * L as u64), temp_dir.path());
    (temp_dir, engine)
}

/// Descriptor packet followed by the segment frames a sender would emit
fn stream_for(content: &[u8]) -> Vec<u8> {
    let segments = content.len().div_ceil(L);
    let mut bytes = frame(format!("{}:{}", segments, content.len()).as_bytes());
    for chunk in content.chunks(L) {
        bytes.extend_from_slice(&frame(chunk));
    }
    bytes.extend_from_slice(&[0u8; L]);
    bytes
}

#[test]
fn test_responder_writes_exact_bytes() {
    let (temp, engine) = setup_engine();
    let content = sample_bytes(300);

    let mut conn = MockConn::new(stream_for(&content));
    let report = engine
        .receive_file(&mut conn, "report.txt", Initiative::Responder)
        .unwrap();

    assert_eq!(report.bytes, 300);
    assert_eq!(conn.messages(), vec!["cts".to_string()]);
    assert_eq!(fs::read(temp.path().join("report.txt")).unwrap(), content);
}

#[test]
fn test_exact_multiple_has_no_tail() {
    let (temp, engine) = setup_engine();
    let content = sample_bytes(2 * L);

    let mut conn = MockConn::new(stream_for(&content));
    engine
        .receive_file(&mut conn, "even.bin", Initiative::Responder)
        .unwrap();

    assert_eq!(fs::read(temp.path().join("even.bin")).unwrap(), content);
}

#[test]
fn test_single_byte_file() {
    let (temp, engine) = setup_engine();

    let mut conn = MockConn::new(stream_for(b"z"));
    engine
        .receive_file(&mut conn, "one.txt", Initiative::Responder)
        .unwrap();

    assert_eq!(fs::read(temp.path().join("one.txt")).unwrap(), b"z");
}

#[test]
fn test_existing_destination_is_not_overwritten() {
    let (temp, engine) = setup_engine();
    let existing = temp.path().join("dup.txt");
    fs::write(&existing, b"original").unwrap();

    let mut conn = MockConn::new(stream_for(b"replacement"));
    let result = engine.receive_file(&mut conn, "dup.txt", Initiative::Responder);

    assert!(matches!(result, Err(CftpError::FileExists)));
    assert_eq!(conn.messages(), vec!["err:File already exists".to_string()]);
    assert_eq!(fs::read(&existing).unwrap(), b"original");
}

#[test]
fn test_destination_is_reduced_to_base_name() {
    let (temp, engine) = setup_engine();

    for (remote, expected) in [("/etc/passwd", "passwd"), ("../../x", "x")] {
        let mut conn = MockConn::new(stream_for(b"safe"));
        let report = engine
            .receive_file(&mut conn, remote, Initiative::Responder)
            .unwrap();

        assert_eq!(report.name, expected);
        assert_eq!(fs::read(temp.path().join(expected)).unwrap(), b"safe");
    }
}

#[test]
fn test_unusable_name_is_refused() {
    let (_temp, engine) = setup_engine();
    let mut conn = MockConn::new(Vec::new());

    let result = engine.receive_file(&mut conn, "..", Initiative::Responder);

    assert!(result.is_err());
    assert!(conn.messages()[0].starts_with("err:"));
}

#[test]
fn test_missing_staging_dir_is_resource_error() {
    let temp = TempDir::new().unwrap();
    let engine = TransferEngine::new(
        TransferLimits::new(L, 9999 * L as u64),
        temp.path().join("does-not-exist"),
    );

    let mut conn = MockConn::new(stream_for(b"data"));
    let result = engine.receive_file(&mut conn, "a.txt", Initiative::Responder);

    assert!(matches!(result, Err(CftpError::Resource(_))));
    assert!(conn.messages()[0].starts_with("err:File could not be opened"));
    assert!(!temp.path().join("does-not-exist").exists());
}

#[test]
fn test_inconsistent_descriptor_is_rejected() {
    let (_temp, engine) = setup_engine();
    let mut input = frame(b"7:300");
    input.extend_from_slice(&[0u8; 8 * L]);

    let mut conn = MockConn::new(input);
    let result = engine.receive_file(&mut conn, "bad.txt", Initiative::Responder);

    assert!(matches!(result, Err(CftpError::Protocol(_))));
}

#[test]
fn test_truncated_stream_leaves_partial_file() {
    let (temp, engine) = setup_engine();
    let content = sample_bytes(300);
    let mut input = stream_for(&content);
    // Descriptor plus one segment only
    input.truncate(2 * L);

    let mut conn = MockConn::new(input);
    let result = engine.receive_file(&mut conn, "partial.bin", Initiative::Responder);

    assert!(matches!(result, Err(CftpError::Transport(_))));
    let written = fs::read(temp.path().join("partial.bin")).unwrap();
    assert_eq!(written, &content[..L]);
}

#[test]
fn test_initiator_requests_then_receives() {
    let (temp, engine) = setup_engine();
    let content = sample_bytes(200);

    let mut input = frame(b"cts");
    input.extend_from_slice(&stream_for(&content));
    let mut conn = MockConn::new(input);

    let destination = engine.prepare_receive("remote/report.txt").unwrap();
    let report = engine
        .receive(&mut conn, "remote/report.txt", destination, Initiative::Initiator)
        .unwrap();

    assert_eq!(report.name, "report.txt");
    assert_eq!(conn.messages(), vec!["get:remote/report.txt".to_string()]);
    assert_eq!(fs::read(temp.path().join("report.txt")).unwrap(), content);
}

#[test]
fn test_initiator_refused_creates_no_file() {
    let (temp, engine) = setup_engine();

    let mut conn = MockConn::with_messages(&["err:The file does not exist"]);
    let result = engine.receive_file(&mut conn, "missing.txt", Initiative::Initiator);

    match result {
        Err(CftpError::Remote(reason)) => assert_eq!(reason, "The file does not exist"),
        other => panic!("Expected remote error, got {:?}", other),
    }
    assert!(!temp.path().join("missing.txt").exists());
}

#[test]
fn test_sender_output_feeds_receiver() {
    let temp = TempDir::new().unwrap();
    let staging = temp.path().join("staging");
    fs::create_dir(&staging).unwrap();
    let engine = TransferEngine::new(TransferLimits::new(L, 9999 * L as u64), &staging);

    let content = sample_bytes(1000);
    let source = temp.path().join("source.bin");
    fs::write(&source, &content).unwrap();

    let mut sender_conn = MockConn::with_messages(&["cts"]);
    engine
        .send_file(&mut sender_conn, &source, Initiative::Initiator)
        .unwrap();

    // Drop the `put:` command; the rest is what the receiver sees after cts
    let stream = sender_conn.output[L..].to_vec();
    let mut receiver_conn = MockConn::new(stream);
    engine
        .receive_file(&mut receiver_conn, "source.bin", Initiative::Responder)
        .unwrap();

    assert_eq!(fs::read(staging.join("source.bin")).unwrap(), content);
}
