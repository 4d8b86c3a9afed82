//! Network Tests
//!
//! End-to-end client/server exchanges over loopback TCP.

#[path = "../support/mod.rs"]
mod support;

mod session_tests;
