//! Error types for CFTP
//!
//! Provides a unified error type for all operations.
//!
//! The variants follow the protocol's failure taxonomy. Policy and resource
//! errors render a reason that is sent verbatim as `err:<reason>` when the
//! local side is answering a request.

use thiserror::Error;

/// Result type alias using CftpError
pub type Result<T> = std::result::Result<T, CftpError>;

/// Unified error type for CFTP operations
#[derive(Debug, Error)]
pub enum CftpError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    /// A packet could not be sent or received
    #[error("Transport error: {0}")]
    Transport(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Unknown or unparseable verb
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// The peer answered with `err:<reason>`
    #[error("Remote error: {0}")]
    Remote(String),

    // -------------------------------------------------------------------------
    // Policy Errors
    // -------------------------------------------------------------------------
    #[error("The file does not exist")]
    FileNotFound,

    #[error("File is inappropriately sized: {size} bytes (allowed 1..{max})")]
    FileSize { size: u64, max: u64 },

    #[error("File already exists")]
    FileExists,

    // -------------------------------------------------------------------------
    // Resource Errors
    // -------------------------------------------------------------------------
    #[error("File could not be opened: {0}")]
    Resource(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CftpError {
    /// Reason text carried in an `err:<reason>` response
    ///
    /// Transport failures are reported with the bare system error text.
    pub fn reason(&self) -> String {
        match self {
            CftpError::Io(e) => e.to_string(),
            CftpError::Transport(msg) => msg.clone(),
            CftpError::InvalidCommand(_) => "Invalid Command".to_string(),
            other => other.to_string(),
        }
    }
}
