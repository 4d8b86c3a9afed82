//! Response definitions
//!
//! Represents responses to clients.

use crate::error::{CftpError, Result};
use super::codec;

const PONG: &str = "pong";
const CTS: &str = "cts";
const ERR: &str = "err";

/// A response sent back for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Answer to `ping`, carrying the server's unix time
    Pong(u64),

    /// Clear to send: the transfer stream follows
    Cts,

    /// The request failed
    Err(String),
}

impl Response {
    /// Create an ERR response
    pub fn error(reason: impl Into<String>) -> Self {
        Response::Err(reason.into())
    }

    /// Encode into message text that fits in `packet_len` bytes
    ///
    /// Over-long error reasons are cut at a character boundary.
    pub fn encode(&self, packet_len: usize) -> String {
        match self {
            Response::Pong(timestamp) => codec::encode(PONG, &timestamp.to_string()),
            Response::Cts => CTS.to_string(),
            Response::Err(reason) => {
                let budget = packet_len.saturating_sub(ERR.len() + 1);
                let mut end = reason.len().min(budget);
                while !reason.is_char_boundary(end) {
                    end -= 1;
                }
                codec::encode(ERR, &reason[..end])
            }
        }
    }

    /// Decode a response message received in a `packet_len` packet
    pub fn parse(text: &str, packet_len: usize) -> Result<Self> {
        let command = codec::split(text, packet_len);
        match command.verb.as_str() {
            PONG => command
                .argument
                .parse::<u64>()
                .map(Response::Pong)
                .map_err(|_| CftpError::Protocol(format!("Malformed pong: {}", text))),
            CTS => Ok(Response::Cts),
            ERR => Ok(Response::Err(command.argument)),
            _ => Err(CftpError::Protocol(format!(
                "Invalid response from remote: {}",
                text
            ))),
        }
    }
}
