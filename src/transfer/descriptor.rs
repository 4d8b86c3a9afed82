//! Transfer descriptor
//!
//! `<segment_count>:<total_bytes>`, sent by the sender as a lone packet
//! right after the handshake.
//!
//! ## Frame Mapping
//! The stream carries `segment_count + 1` frames of `L` bytes. Frame `i`
//! holds `min(L, total - i × L)` file bytes and zero padding after them.
//! Since `segment_count` is a ceiling, the trailing frame holds no file
//! bytes at all:
//!
//! ```text
//! 300 bytes, L = 128  →  "3:300"
//! ┌──────────┬──────────┬────────────┬────────────┐
//! │ 128 data │ 128 data │ 44 data+0s │ 128 zeros  │
//! └──────────┴──────────┴────────────┴────────────┘
//! ```

use std::fmt;

use crate::error::{CftpError, Result};
use crate::protocol;
use super::TransferLimits;

/// Bounds of one transfer stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferDescriptor {
    /// `ceil(total_bytes / L)`
    pub segment_count: u64,

    /// File size in bytes
    pub total_bytes: u64,
}

impl TransferDescriptor {
    /// Compute the descriptor for a file of `total_bytes`
    pub fn for_size(total_bytes: u64, packet_len: usize) -> Self {
        Self {
            segment_count: total_bytes.div_ceil(packet_len as u64),
            total_bytes,
        }
    }

    /// Number of frames on the wire, one more than the segment count
    pub fn frame_count(&self) -> u64 {
        self.segment_count + 1
    }

    /// File bytes carried by frame `index`
    pub fn payload_len(&self, index: u64, packet_len: usize) -> usize {
        let offset = index.saturating_mul(packet_len as u64);
        let remaining = self.total_bytes.saturating_sub(offset);
        remaining.min(packet_len as u64) as usize
    }

    /// Encode as descriptor message text
    pub fn encode(&self) -> String {
        protocol::encode(&self.segment_count.to_string(), &self.total_bytes.to_string())
    }

    /// Parse and cross-check a received descriptor
    ///
    /// Rejected unless the size is within limits and the segment count is
    /// exactly the ceiling the size implies.
    pub fn parse(text: &str, limits: &TransferLimits) -> Result<Self> {
        let command = protocol::split(text, limits.packet_len);
        let malformed = || CftpError::Protocol(format!("Malformed transfer descriptor: {:?}", text));

        let segment_count = command.verb.parse::<u64>().map_err(|_| malformed())?;
        let total_bytes = command.argument.parse::<u64>().map_err(|_| malformed())?;

        if limits.check_size(total_bytes).is_err() {
            return Err(malformed());
        }

        let descriptor = Self::for_size(total_bytes, limits.packet_len);
        if descriptor.segment_count != segment_count {
            return Err(CftpError::Protocol(format!(
                "Descriptor announces {} segments for {} bytes, expected {}",
                segment_count, total_bytes, descriptor.segment_count
            )));
        }

        Ok(descriptor)
    }
}

impl fmt::Display for TransferDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} segments, {} bytes", self.segment_count, self.total_bytes)
    }
}
