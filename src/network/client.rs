//! TCP Client
//!
//! Opens a fresh connection for every command; one command per connection.

use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::error::{CftpError, Result};
use crate::protocol::{self, parse_request, Response, Verb};
use crate::transfer::{Initiative, TransferEngine, TransferReport};

/// Outcome of one client command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Server time from `ping`
    Pong(u64),

    /// File fetched with `get`
    Received(TransferReport),

    /// File uploaded with `put`
    Sent(TransferReport),
}

/// CFTP client bound to one server address
pub struct Client {
    config: Config,
    engine: TransferEngine,
}

impl Client {
    pub fn new(config: Config) -> Self {
        let engine = TransferEngine::new(config.limits(), config.staging_dir.clone());
        Self { config, engine }
    }

    /// Ask the server for its unix time
    pub fn ping(&self) -> Result<u64> {
        let packet_len = self.config.packet_len;
        let mut stream = self.connect()?;

        let reply = protocol::send_then_receive(&mut stream, Verb::Ping.as_str(), packet_len)?;
        match Response::parse(&reply, packet_len)? {
            Response::Pong(timestamp) => Ok(timestamp),
            Response::Err(reason) => Err(CftpError::Remote(reason)),
            Response::Cts => Err(CftpError::Protocol(format!(
                "Invalid response from remote: {}",
                reply
            ))),
        }
    }

    /// Fetch `name` from the server into the staging directory
    ///
    /// The destination is checked before connecting; nothing is created
    /// locally unless the server answers `cts`.
    pub fn get(&self, name: &str) -> Result<TransferReport> {
        let destination = self.engine.prepare_receive(name)?;
        let mut stream = self.connect()?;
        self.engine
            .receive(&mut stream, name, destination, Initiative::Initiator)
    }

    /// Upload the local file at `path`
    ///
    /// Preflight runs before connecting, so a refused file never reaches the
    /// server.
    pub fn put(&self, path: impl AsRef<Path>) -> Result<TransferReport> {
        let outgoing = self.engine.prepare_send(path.as_ref())?;
        let mut stream = self.connect()?;
        self.engine.send(&mut stream, outgoing, Initiative::Initiator)
    }

    /// Validate and run one command line (`ping`, `get:<name>`, `put:<path>`)
    pub fn execute(&self, line: &str) -> Result<Reply> {
        let (verb, argument) = parse_request(line, self.config.packet_len)?;
        match verb {
            Verb::Ping => self.ping().map(Reply::Pong),
            Verb::Get => self.get(&argument).map(Reply::Received),
            Verb::Put => self.put(&argument).map(Reply::Sent),
        }
    }

    fn connect(&self) -> Result<TcpStream> {
        let addr = format!("{}:{}", self.config.address, self.config.port);
        let resolved = addr
            .to_socket_addrs()
            .map_err(|e| CftpError::Transport(format!("Could not look up hostname {}: {}", addr, e)))?
            .next()
            .ok_or_else(|| CftpError::Transport(format!("Could not look up hostname: {}", addr)))?;

        let stream = TcpStream::connect(resolved).map_err(|e| {
            tracing::error!("Could not connect to the server: {}", e);
            CftpError::Transport(e.to_string())
        })?;
        stream.set_nodelay(true)?;

        if self.config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(self.config.read_timeout_ms)))?;
        }
        if self.config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(self.config.write_timeout_ms)))?;
        }

        Ok(stream)
    }
}
