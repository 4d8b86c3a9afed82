//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single accept loop, one connection serviced at a time
//! - One command per connection, then the connection is closed
//! - `get`/`put` are handed to the transfer engine

mod client;
mod connection;
mod server;

pub use client::{Client, Reply};
pub use connection::Session;
pub use server::{Server, ShutdownHandle};
