//! Packet I/O
//!
//! Sends and receives single fixed-length packets. A packet is always `L`
//! bytes on the wire so that packet boundaries survive TCP coalescing.
//!
//! Failures are logged with the system error text and returned as
//! `CftpError::Transport`; nothing here retries.

use std::io::{self, Read, Write};

use bytes::{Bytes, BytesMut};

use crate::error::{CftpError, Result};

/// Send one packet, zero-padding the payload to `packet_len`
pub fn send_packet<W: Write>(conn: &mut W, payload: &[u8], packet_len: usize) -> Result<()> {
    if payload.len() > packet_len {
        return Err(CftpError::Protocol(format!(
            "Packet too large: {} bytes (max {})",
            payload.len(),
            packet_len
        )));
    }

    let mut frame = BytesMut::zeroed(packet_len);
    frame[..payload.len()].copy_from_slice(payload);

    conn.write_all(&frame)
        .and_then(|_| conn.flush())
        .map_err(|e| transport_error("Send", e))
}

/// Receive one packet into a fresh zero-filled buffer
///
/// Blocks until `packet_len` bytes arrive or the transport fails.
pub fn receive_packet<R: Read>(conn: &mut R, packet_len: usize) -> Result<Bytes> {
    let mut frame = BytesMut::zeroed(packet_len);
    conn.read_exact(&mut frame)
        .map_err(|e| transport_error("Receive", e))?;
    Ok(frame.freeze())
}

/// Send a text message as one packet
pub fn send_message<W: Write>(conn: &mut W, text: &str, packet_len: usize) -> Result<()> {
    tracing::trace!("-> {}", text);
    send_packet(conn, text.as_bytes(), packet_len)
}

/// Receive one packet and decode it as a text message
pub fn receive_message<R: Read>(conn: &mut R, packet_len: usize) -> Result<String> {
    let packet = receive_packet(conn, packet_len)?;
    let text = message_text(&packet);
    tracing::trace!("<- {}", text);
    Ok(text)
}

/// Send a message and block for the reply (no retry)
pub fn send_then_receive<S: Read + Write>(
    conn: &mut S,
    text: &str,
    packet_len: usize,
) -> Result<String> {
    send_message(conn, text, packet_len)?;
    receive_message(conn, packet_len)
}

/// Text carried by a packet: everything up to the first NUL byte
pub fn message_text(packet: &[u8]) -> String {
    let end = packet.iter().position(|&b| b == 0).unwrap_or(packet.len());
    String::from_utf8_lossy(&packet[..end]).into_owned()
}

fn transport_error(op: &str, e: io::Error) -> CftpError {
    let text = if e.kind() == io::ErrorKind::UnexpectedEof {
        "Connection closed by peer".to_string()
    } else {
        e.to_string()
    };
    tracing::error!("{} Error: {}", op, text);
    CftpError::Transport(text)
}
