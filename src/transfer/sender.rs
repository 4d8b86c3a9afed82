//! Sender side
//!
//! Preflight checks and the outgoing segment loop.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::{CftpError, Result};
use crate::protocol;
use super::{base_name, Progress, Role, TransferDescriptor, TransferLimits};

/// A local file that passed preflight and is open for reading
#[derive(Debug)]
pub struct OutgoingFile {
    /// Base name announced to the peer
    pub name: String,

    /// Size at preflight time
    pub size: u64,

    file: File,
}

impl OutgoingFile {
    /// Preflight: the file must exist, be sized within limits, and open
    pub fn open(path: &Path, limits: &TransferLimits) -> Result<Self> {
        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied) => {
                return Err(CftpError::FileNotFound)
            }
            Err(e) => return Err(CftpError::Resource(e.to_string())),
        };
        if !metadata.is_file() {
            return Err(CftpError::FileNotFound);
        }

        limits.check_size(metadata.len())?;

        let name = base_name(&path.to_string_lossy())?;
        let file = File::open(path).map_err(|e| CftpError::Resource(e.to_string()))?;

        Ok(Self {
            name,
            size: metadata.len(),
            file,
        })
    }

    /// Descriptor for this file
    pub fn descriptor(&self, packet_len: usize) -> TransferDescriptor {
        TransferDescriptor::for_size(self.size, packet_len)
    }
}

/// Stream every frame of the descriptor, returning file bytes sent
///
/// Consumes the file; the handle is closed when the loop ends either way.
pub(crate) fn stream_segments<W: Write>(
    conn: &mut W,
    outgoing: OutgoingFile,
    descriptor: &TransferDescriptor,
    packet_len: usize,
) -> Result<u64> {
    let OutgoingFile { name, mut file, .. } = outgoing;
    let mut progress = Progress::new(Role::Sender, &name, descriptor.frame_count());
    let mut sent = 0u64;

    for index in 0..descriptor.frame_count() {
        let want = descriptor.payload_len(index, packet_len);
        let segment = read_segment(&mut file, want)?;
        if segment.len() < want {
            tracing::warn!(
                "File ({}) shrank during transfer, padding segment {} with zeros",
                name, index
            );
        }

        protocol::send_packet(conn, &segment, packet_len)?;
        sent += want as u64;
        progress.advance(index + 1);
    }

    Ok(sent)
}

/// Read up to `len` bytes into a fresh buffer; short reads stop at EOF
fn read_segment<R: Read>(source: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut segment = Vec::with_capacity(len);
    source.take(len as u64).read_to_end(&mut segment)?;
    Ok(segment)
}
