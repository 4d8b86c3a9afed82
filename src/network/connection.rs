//! Session Handler
//!
//! Services exactly one command on a client connection, then closes it.

use std::net::TcpStream;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::Result;
use crate::protocol::{self, parse_request, Response, Verb};
use crate::transfer::{base_name, Initiative, TransferEngine};

/// Handles a single client connection
pub struct Session<'a> {
    /// TCP stream, used directly by the transfer engine
    stream: TcpStream,

    /// Transfer engine (limits and staging directory)
    engine: &'a TransferEngine,

    /// Directory `get` requests are served from
    serve_dir: &'a Path,

    /// Peer address for logging
    peer_addr: String,
}

impl<'a> Session<'a> {
    /// Create a new session for an accepted stream
    pub fn new(stream: TcpStream, engine: &'a TransferEngine, serve_dir: &'a Path) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.ip().to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm, every packet is a full round trip unit
        stream.set_nodelay(true)?;

        Ok(Self {
            stream,
            engine,
            serve_dir,
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 leaves the socket blocking forever)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.stream
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.stream
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Read one command, dispatch it, and close the connection
    pub fn handle(mut self) -> Result<()> {
        let packet_len = self.engine.limits().packet_len;

        let text = match protocol::receive_message(&mut self.stream, packet_len) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                // Best effort, the peer may already be gone
                let _ = self.respond(Response::error(e.reason()));
                return Err(e);
            }
        };

        tracing::debug!("{}: {}", self.peer_addr, text);

        let (verb, argument) = match parse_request(&text, packet_len) {
            Ok(request) => request,
            Err(e) => {
                self.respond(Response::error(e.reason()))?;
                return Err(e);
            }
        };

        match verb {
            Verb::Ping => self.respond(Response::Pong(unix_time())),
            Verb::Get => self.serve_get(&argument),
            Verb::Put => self.serve_put(&argument),
        }
    }

    fn serve_get(&mut self, name: &str) -> Result<()> {
        let path = match base_name(name) {
            Ok(base) => self.serve_dir.join(base),
            Err(e) => {
                self.respond(Response::error(e.reason()))?;
                return Err(e);
            }
        };

        let report = self
            .engine
            .send_file(&mut self.stream, &path, Initiative::Responder)?;
        tracing::info!("{}: sent {} ({} bytes)", self.peer_addr, report.name, report.bytes);
        Ok(())
    }

    fn serve_put(&mut self, name: &str) -> Result<()> {
        let report = self
            .engine
            .receive_file(&mut self.stream, name, Initiative::Responder)?;
        tracing::info!("{}: received {} ({} bytes)", self.peer_addr, report.name, report.bytes);
        Ok(())
    }

    /// Send a response to the client
    fn respond(&mut self, response: Response) -> Result<()> {
        let packet_len = self.engine.limits().packet_len;
        let text = response.encode(packet_len);
        tracing::debug!("{}: {}", self.peer_addr, text);
        protocol::send_message(&mut self.stream, &text, packet_len)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// Seconds since the unix epoch
fn unix_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
