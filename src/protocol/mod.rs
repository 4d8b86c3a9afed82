//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Framing
//! Every packet is exactly `L` bytes on the wire (128 by default). Text
//! messages are zero-padded; the text ends at the first NUL byte.
//!
//! ```text
//! ┌──────────────────────────────┬───────────────────┐
//! │  verb[:argument]  (≤ L)      │  0x00 padding     │
//! └──────────────────────────────┴───────────────────┘
//! ```
//!
//! ### Requests
//! - `ping`
//! - `get:<filename>`
//! - `put:<filename>`
//!
//! ### Responses
//! - `pong:<unix-timestamp>`
//! - `cts` - clear to send, the transfer follows
//! - `err:<reason>`
//!
//! ### Transfer stream
//! After `cts` the sender emits one descriptor packet `<segment_count>:<size>`
//! followed by `segment_count + 1` raw segment packets, with no
//! acknowledgements.

mod codec;
mod command;
mod packet;
mod response;

pub use codec::{encode, split};
pub use command::{is_valid, parse_request, Command, Verb};
pub use packet::{
    message_text, receive_message, receive_packet, send_message, send_packet, send_then_receive,
};
pub use response::Response;

/// Separates a verb from its argument
pub const DELIMITER: char = ':';

/// Default packet length L in bytes
pub const DEFAULT_PACKET_LEN: usize = 128;

/// Maximum verb length K in characters
pub const VERB_MAX_LEN: usize = 4;

/// Default maximum segments per transfer (largest K-digit number)
pub const DEFAULT_MAX_SEGMENTS: u64 = 9999;
