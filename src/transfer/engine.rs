//! Transfer Engine
//!
//! Drives both roles through the same steps:
//!
//! 1. Local check (preflight on the sender, destination check on the receiver)
//! 2. Handshake (`cts` from the responder, or the command round for the initiator)
//! 3. Descriptor exchange
//! 4. Segment loop, `segment_count + 1` frames
//! 5. Close

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{CftpError, Result};
use crate::protocol::{self, Response};
use super::receiver::{self, Destination};
use super::sender::{self, OutgoingFile};
use super::{Initiative, Role, TransferDescriptor, TransferLimits, TransferReport};

/// Runs segmented transfers over an established connection
#[derive(Debug, Clone)]
pub struct TransferEngine {
    limits: TransferLimits,

    /// Every received file lands here
    staging_dir: PathBuf,
}

impl TransferEngine {
    pub fn new(limits: TransferLimits, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            limits,
            staging_dir: staging_dir.into(),
        }
    }

    pub fn limits(&self) -> &TransferLimits {
        &self.limits
    }

    // =========================================================================
    // Sender
    // =========================================================================

    /// Preflight a local file for sending
    pub fn prepare_send(&self, path: &Path) -> Result<OutgoingFile> {
        OutgoingFile::open(path, &self.limits)
    }

    /// Preflight and send `path`
    ///
    /// As responder, a failed preflight is answered with `err:<reason>`.
    pub fn send_file<S: Read + Write>(
        &self,
        conn: &mut S,
        path: &Path,
        initiative: Initiative,
    ) -> Result<TransferReport> {
        let outgoing = match self.prepare_send(path) {
            Ok(outgoing) => outgoing,
            Err(e) => {
                tracing::error!("Not sending {}: {}", path.display(), e);
                return Err(self.refuse(conn, initiative, e));
            }
        };
        self.send(conn, outgoing, initiative)
    }

    /// Handshake, send the descriptor, and stream a preflighted file
    pub fn send<S: Read + Write>(
        &self,
        conn: &mut S,
        outgoing: OutgoingFile,
        initiative: Initiative,
    ) -> Result<TransferReport> {
        let packet_len = self.limits.packet_len;
        let descriptor = outgoing.descriptor(packet_len);
        let name = outgoing.name.clone();

        tracing::debug!("Sending file ({}) in {}", name, descriptor);

        self.handshake(conn, Role::Sender, initiative, &name)?;

        // No reply is expected from here on
        protocol::send_message(conn, &descriptor.encode(), packet_len)?;

        let bytes = sender::stream_segments(conn, outgoing, &descriptor, packet_len)?;

        tracing::info!("File ({}) sent successfully, {} bytes", name, bytes);
        Ok(TransferReport {
            name,
            descriptor,
            bytes,
        })
    }

    // =========================================================================
    // Receiver
    // =========================================================================

    /// Destination check for an incoming file
    pub fn prepare_receive(&self, remote_name: &str) -> Result<Destination> {
        Destination::check(&self.staging_dir, remote_name)
    }

    /// Destination check and receive `remote_name` into the staging directory
    ///
    /// As responder, a failed check is answered with `err:<reason>`.
    pub fn receive_file<S: Read + Write>(
        &self,
        conn: &mut S,
        remote_name: &str,
        initiative: Initiative,
    ) -> Result<TransferReport> {
        let destination = match self.prepare_receive(remote_name) {
            Ok(destination) => destination,
            Err(e) => {
                tracing::error!("Not receiving {}: {}", remote_name, e);
                return Err(self.refuse(conn, initiative, e));
            }
        };
        self.receive(conn, remote_name, destination, initiative)
    }

    /// Open the destination, handshake, and stream the file in
    ///
    /// A responder opens before answering `cts` so open failures can be
    /// reported; an initiator opens only after `cts` so a refused request
    /// leaves no local file.
    pub fn receive<S: Read + Write>(
        &self,
        conn: &mut S,
        remote_name: &str,
        destination: Destination,
        initiative: Initiative,
    ) -> Result<TransferReport> {
        let packet_len = self.limits.packet_len;

        let file = match initiative {
            Initiative::Responder => {
                let file = match destination.open() {
                    Ok(file) => file,
                    Err(e) => {
                        tracing::error!("Not receiving {}: {}", destination.name, e);
                        return Err(self.refuse(conn, initiative, e));
                    }
                };
                self.handshake(conn, Role::Receiver, initiative, remote_name)?;
                file
            }
            Initiative::Initiator => {
                self.handshake(conn, Role::Receiver, initiative, remote_name)?;
                destination.open()?
            }
        };

        let text = protocol::receive_message(conn, packet_len)?;
        let descriptor = TransferDescriptor::parse(&text, &self.limits)?;

        tracing::debug!(
            "Receiving file ({}) in {} into {}",
            destination.name,
            descriptor,
            destination.path.display()
        );

        let bytes = receiver::stream_segments(conn, file, &destination.name, &descriptor, packet_len)?;

        tracing::info!("File ({}) received successfully, {} bytes", destination.name, bytes);
        Ok(TransferReport {
            name: destination.name,
            descriptor,
            bytes,
        })
    }

    // =========================================================================
    // Shared Steps
    // =========================================================================

    /// Responder: send `cts`. Initiator: issue the command and expect `cts`.
    fn handshake<S: Read + Write>(
        &self,
        conn: &mut S,
        role: Role,
        initiative: Initiative,
        name: &str,
    ) -> Result<()> {
        let packet_len = self.limits.packet_len;

        match initiative {
            Initiative::Responder => {
                protocol::send_message(conn, &Response::Cts.encode(packet_len), packet_len)
            }
            Initiative::Initiator => {
                let request = protocol::encode(role.initiating_verb().as_str(), name);
                let reply = protocol::send_then_receive(conn, &request, packet_len)?;
                match Response::parse(&reply, packet_len)? {
                    Response::Cts => Ok(()),
                    Response::Err(reason) => {
                        tracing::error!("ERROR Not {} the file: {}", role.to_string().to_lowercase(), reason);
                        Err(CftpError::Remote(reason))
                    }
                    Response::Pong(_) => Err(CftpError::Protocol(format!(
                        "Invalid response from remote: {}",
                        reply
                    ))),
                }
            }
        }
    }

    /// Report a failure to the peer when answering a request
    ///
    /// Returns the original error so callers can propagate it.
    fn refuse<S: Write>(&self, conn: &mut S, initiative: Initiative, err: CftpError) -> CftpError {
        if initiative == Initiative::Responder {
            let packet_len = self.limits.packet_len;
            let response = Response::error(err.reason()).encode(packet_len);
            if let Err(e) = protocol::send_message(conn, &response, packet_len) {
                tracing::warn!("Could not report failure to peer: {}", e);
            }
        }
        err
    }
}
