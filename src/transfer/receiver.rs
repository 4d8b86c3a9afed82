//! Receiver side
//!
//! Destination checks and the incoming segment loop.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{CftpError, Result};
use crate::protocol;
use super::{base_name, Progress, Role, TransferDescriptor};

/// Where an incoming file will be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Base name of the remote file
    pub name: String,

    /// `staging_dir/name`
    pub path: PathBuf,
}

impl Destination {
    /// Destination check: reduce to the base name and refuse existing files
    pub fn check(staging_dir: &Path, remote_name: &str) -> Result<Self> {
        let name = base_name(remote_name)?;
        let path = staging_dir.join(&name);
        if path.exists() {
            return Err(CftpError::FileExists);
        }
        Ok(Self { name, path })
    }

    /// Create the destination; never truncates an existing file
    pub fn open(&self) -> Result<File> {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => CftpError::FileExists,
                _ => CftpError::Resource(e.to_string()),
            })
    }
}

/// Receive every frame of the descriptor into `file`, returning bytes written
///
/// Each frame's padding is dropped; only the file bytes it carries are
/// written.
pub(crate) fn stream_segments<R: Read>(
    conn: &mut R,
    file: File,
    name: &str,
    descriptor: &TransferDescriptor,
    packet_len: usize,
) -> Result<u64> {
    let mut out = BufWriter::new(file);
    let mut progress = Progress::new(Role::Receiver, name, descriptor.frame_count());
    let mut written = 0u64;

    for index in 0..descriptor.frame_count() {
        let frame = protocol::receive_packet(conn, packet_len)?;
        let take = descriptor.payload_len(index, packet_len);
        out.write_all(&frame[..take])?;
        written += take as u64;
        progress.advance(index + 1);
    }

    out.flush()?;
    Ok(written)
}
