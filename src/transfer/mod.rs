//! Transfer Module
//!
//! The segmented file transfer state machine.
//!
//! ## Roles
//! - **Sender** has the bytes, **Receiver** wants them.
//! - In a `get` the server sends; in a `put` the client sends.
//! - The side that issued the command is the **Initiator**; the side that
//!   answers it is the **Responder**.
//!
//! ## Exchange
//! ```text
//!   Initiator                    Responder
//!      │ ── put:name / get:name ──▶ │
//!      │ ◀──── cts | err:reason ─── │
//!   Sender                        Receiver
//!      │ ── <segments>:<size> ────▶ │
//!      │ ── segment 0 (L bytes) ──▶ │
//!      │            ...             │
//!      │ ── segment N (padding) ──▶ │
//! ```
//!
//! Failures before the handshake are reported to the peer as `err:<reason>`
//! when acting as Responder. Failures mid-stream abort the transfer; a
//! partially written destination is left on disk.

mod descriptor;
mod engine;
mod receiver;
mod sender;

use std::fmt;
use std::path::Path;

use crate::error::{CftpError, Result};
use crate::protocol::Verb;

pub use descriptor::TransferDescriptor;
pub use engine::TransferEngine;
pub use receiver::Destination;
pub use sender::OutgoingFile;

/// Which end of the byte stream this side is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Sender,
    Receiver,
}

impl Role {
    /// Verb an initiator in this role sends to start the transfer
    pub fn initiating_verb(&self) -> Verb {
        match self {
            Role::Sender => Verb::Put,
            Role::Receiver => Verb::Get,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Sender => f.write_str("Sending"),
            Role::Receiver => f.write_str("Receiving"),
        }
    }
}

/// Whether this side issued the command or is answering it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initiative {
    Initiator,
    Responder,
}

/// Size limits shared by both ends of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferLimits {
    /// Packet length L
    pub packet_len: usize,

    /// Exclusive upper bound on file size (MAXFILE)
    pub max_file_size: u64,
}

impl TransferLimits {
    pub fn new(packet_len: usize, max_file_size: u64) -> Self {
        Self {
            packet_len,
            max_file_size,
        }
    }

    /// Check `0 < size < max_file_size`
    pub fn check_size(&self, size: u64) -> Result<()> {
        if size == 0 || size >= self.max_file_size {
            return Err(CftpError::FileSize {
                size,
                max: self.max_file_size,
            });
        }
        Ok(())
    }
}

/// Outcome of a completed transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    /// Base name of the transferred file
    pub name: String,

    /// Descriptor that bounded the stream
    pub descriptor: TransferDescriptor,

    /// File bytes carried by the stream
    pub bytes: u64,
}

/// Reduce a wire file name to its final path component
///
/// `/etc/passwd` becomes `passwd` and `../../x` becomes `x`. Names with no
/// usable final component (`..`, `/`, empty) are refused.
pub fn base_name(name: &str) -> Result<String> {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| CftpError::Protocol(format!("Invalid file name: {:?}", name)))
}

/// Logs transfer progress at every tenth of the stream
struct Progress<'a> {
    role: Role,
    name: &'a str,
    frames: u64,
    reported: u64,
}

impl<'a> Progress<'a> {
    fn new(role: Role, name: &'a str, frames: u64) -> Self {
        Self {
            role,
            name,
            frames,
            reported: 0,
        }
    }

    fn advance(&mut self, done: u64) {
        let tenth = done * 10 / self.frames.max(1);
        if tenth > self.reported {
            self.reported = tenth;
            tracing::debug!("{} file ({}) {}%", self.role, self.name, tenth * 10);
        }
    }
}
