//! Configuration for CFTP
//!
//! Centralized configuration with sensible defaults.

use std::net::IpAddr;
use std::path::PathBuf;

use crate::error::{CftpError, Result};
use crate::protocol::{DEFAULT_MAX_SEGMENTS, DEFAULT_PACKET_LEN, VERB_MAX_LEN};
use crate::transfer::TransferLimits;

/// Lowest port accepted (exclusive); privileged ports are refused
pub const MIN_PORT: u16 = 1024;

/// Highest port accepted (exclusive)
pub const MAX_PORT: u16 = 65535;

/// Default listen/connect port
pub const DEFAULT_PORT: u16 = 9000;

/// Smallest packet that can still carry a descriptor and short responses
const MIN_PACKET_LEN: usize = 16;

/// Largest packet length accepted
pub const MAX_PACKET_LEN: usize = 64 * 1024;

/// Main configuration shared by the server and the client
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Address to bind (server) or connect to (client).
    /// An empty server address binds every interface.
    pub address: String,

    /// TCP port
    pub port: u16,

    /// Connection read timeout (milliseconds, 0 = block forever)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = block forever)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Packet length L; every message and segment is exactly this long on the wire
    pub packet_len: usize,

    /// Largest segment count a descriptor may announce
    pub max_segments: u64,

    // -------------------------------------------------------------------------
    // Filesystem Configuration
    // -------------------------------------------------------------------------
    /// Directory every received file is written into. Never created by CFTP.
    pub staging_dir: PathBuf,

    /// Directory the server serves `get` requests from
    pub serve_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: String::new(),
            port: DEFAULT_PORT,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            packet_len: DEFAULT_PACKET_LEN,
            max_segments: DEFAULT_MAX_SEGMENTS,
            staging_dir: std::env::temp_dir(),
            serve_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Largest file size accepted (exclusive): `max_segments × packet_len`
    pub fn max_file_size(&self) -> u64 {
        self.max_segments.saturating_mul(self.packet_len as u64)
    }

    /// Limits handed to the transfer engine
    pub fn limits(&self) -> TransferLimits {
        TransferLimits::new(self.packet_len, self.max_file_size())
    }

    /// `address:port` string, binding every interface when no address is set
    pub fn socket_addr(&self) -> String {
        if self.address.is_empty() {
            format!("0.0.0.0:{}", self.port)
        } else {
            format!("{}:{}", self.address, self.port)
        }
    }

    /// Validate settings for the server role
    pub fn validate_server(&self) -> Result<()> {
        self.validate_common()?;
        if !self.address.is_empty() && self.address.parse::<IpAddr>().is_err() {
            return Err(CftpError::Config(format!(
                "Malformed address: {}",
                self.address
            )));
        }
        Ok(())
    }

    /// Validate settings for the client role
    pub fn validate_client(&self) -> Result<()> {
        self.validate_common()?;
        if self.address.is_empty() {
            return Err(CftpError::Config(
                "A server address is required".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_common(&self) -> Result<()> {
        if self.port <= MIN_PORT || self.port >= MAX_PORT {
            return Err(CftpError::Config(format!(
                "Port {} out of range, must be between {} and {} (exclusive)",
                self.port, MIN_PORT, MAX_PORT
            )));
        }

        if !(MIN_PACKET_LEN..=MAX_PACKET_LEN).contains(&self.packet_len) {
            return Err(CftpError::Config(format!(
                "Packet length {} out of range ({}..={})",
                self.packet_len, MIN_PACKET_LEN, MAX_PACKET_LEN
            )));
        }

        // The segment count travels in the verb slot of the descriptor
        if self.max_segments == 0 || self.max_segments.to_string().len() > VERB_MAX_LEN {
            return Err(CftpError::Config(format!(
                "Max segments {} must be between 1 and {} digits",
                self.max_segments, VERB_MAX_LEN
            )));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the bind/connect address
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.config.address = address.into();
        self
    }

    /// Set the TCP port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the packet length L
    pub fn packet_len(mut self, len: usize) -> Self {
        self.config.packet_len = len;
        self
    }

    /// Set the maximum number of segments per transfer
    pub fn max_segments(mut self, count: u64) -> Self {
        self.config.max_segments = count;
        self
    }

    /// Set the staging directory for received files
    pub fn staging_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.staging_dir = path.into();
        self
    }

    /// Set the directory `get` requests are served from
    pub fn serve_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.serve_dir = path.into();
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
