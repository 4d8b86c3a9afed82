//! Command definitions
//!
//! Represents commands from clients and the verb validator.

use std::fmt;

use crate::error::{CftpError, Result};
use super::{codec, DELIMITER, VERB_MAX_LEN};

/// Known request verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Put,
    Ping,
}

impl Verb {
    /// Parse a verb (case-sensitive, exact match)
    pub fn parse(verb: &str) -> Option<Self> {
        match verb {
            "get" => Some(Verb::Get),
            "put" => Some(Verb::Put),
            "ping" => Some(Verb::Ping),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Put => "put",
            Verb::Ping => "ping",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message split into verb and argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: String,
    pub argument: String,
}

impl Command {
    pub fn new(verb: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            argument: argument.into(),
        }
    }

    /// Encode back into message text
    pub fn encode(&self) -> String {
        codec::encode(&self.verb, &self.argument)
    }
}

/// Check a verb against the known set, logging rejections
pub fn is_valid(verb: &str) -> bool {
    if Verb::parse(verb).is_some() {
        return true;
    }
    tracing::error!("Invalid command: {}", verb);
    false
}

/// Parse and validate a request message
///
/// A verb longer than the verb limit is rejected instead of being truncated
/// into a known one.
pub fn parse_request(raw: &str, packet_len: usize) -> Result<(Verb, String)> {
    let raw_verb = raw.split(DELIMITER).next().unwrap_or_default();
    if raw_verb.chars().count() > VERB_MAX_LEN {
        tracing::error!("Invalid command: {}", raw_verb);
        return Err(CftpError::InvalidCommand(raw_verb.to_string()));
    }

    let command = codec::split(raw, packet_len);
    if !is_valid(&command.verb) {
        return Err(CftpError::InvalidCommand(command.verb));
    }

    let verb = Verb::parse(&command.verb)
        .ok_or_else(|| CftpError::InvalidCommand(command.verb.clone()))?;
    Ok((verb, command.argument))
}
