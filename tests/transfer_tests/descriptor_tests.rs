//! Descriptor Tests

use cftp::transfer::{TransferDescriptor, TransferLimits};
use cftp::CftpError;

fn limits() -> TransferLimits {
    TransferLimits::new(128, 9999 * 128)
}

#[test]
fn test_segment_count_is_ceiling() {
    assert_eq!(TransferDescriptor::for_size(1, 128).segment_count, 1);
    assert_eq!(TransferDescriptor::for_size(128, 128).segment_count, 1);
    assert_eq!(TransferDescriptor::for_size(129, 128).segment_count, 2);
    assert_eq!(TransferDescriptor::for_size(300, 128).segment_count, 3);
}

#[test]
fn test_frame_count_has_trailing_frame() {
    let d = TransferDescriptor::for_size(300, 128);
    assert_eq!(d.frame_count(), 4);
}

#[test]
fn test_payload_lengths_for_300_bytes() {
    let d = TransferDescriptor::for_size(300, 128);
    let lens: Vec<usize> = (0..d.frame_count()).map(|i| d.payload_len(i, 128)).collect();
    assert_eq!(lens, vec![128, 128, 44, 0]);
}

#[test]
fn test_payload_lengths_for_exact_multiple() {
    let d = TransferDescriptor::for_size(256, 128);
    let lens: Vec<usize> = (0..d.frame_count()).map(|i| d.payload_len(i, 128)).collect();
    assert_eq!(lens, vec![128, 128, 0]);
}

#[test]
fn test_encode() {
    assert_eq!(TransferDescriptor::for_size(300, 128).encode(), "3:300");
}

#[test]
fn test_parse_valid() {
    let d = TransferDescriptor::parse("3:300", &limits()).unwrap();
    assert_eq!(d, TransferDescriptor { segment_count: 3, total_bytes: 300 });
}

#[test]
fn test_parse_rejects_inconsistent_segment_count() {
    let result = TransferDescriptor::parse("2:300", &limits());
    assert!(matches!(result, Err(CftpError::Protocol(_))));
}

#[test]
fn test_parse_rejects_out_of_range_sizes() {
    assert!(TransferDescriptor::parse("0:0", &limits()).is_err());
    assert!(TransferDescriptor::parse("9999:1279872", &limits()).is_err());
}

#[test]
fn test_parse_rejects_garbage() {
    for text in ["", "cts", "err:nope", "3:", ":300", "-1:300", "3:abc"] {
        assert!(TransferDescriptor::parse(text, &limits()).is_err(), "{:?} accepted", text);
    }
}
