//! # CFTP
//!
//! A minimal single-port file transfer protocol with:
//! - Line commands: `ping`, `get:<name>`, `put:<name>`
//! - Fixed-length packets (128 bytes by default)
//! - Segmented file streaming behind a `cts` handshake
//! - No overwrites; received files always land in one staging directory
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Server (sequential accept loop)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ one connection at a time
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Session Handler                         │
//! │          (read one command, validate, dispatch)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌───────────────┐
//!   │    ping     │          │   get / put   │
//!   │  pong:<t>   │          │   Transfer    │
//!   └─────────────┘          │    Engine     │
//!                            └──────┬────────┘
//!                                   │
//!                                   ▼
//!                           ┌───────────────┐
//!                           │  Packet I/O   │
//!                           │ (L-byte frames)│
//!                           └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod transfer;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CftpError, Result};
pub use config::Config;
pub use network::{Client, Server};
pub use transfer::TransferEngine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of CFTP
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
