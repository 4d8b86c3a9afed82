//! Command codec
//!
//! Splits a raw message into verb and argument on the first delimiter, and
//! joins them back.
//!
//! ## Message Format
//! ```text
//! verb              (argument empty)
//! verb:argument
//! ```

use super::{Command, DELIMITER, VERB_MAX_LEN};

/// Split a raw message into a command
///
/// The verb is everything before the first delimiter (the whole message when
/// there is none) and the argument everything after it. The verb is
/// truncated to `VERB_MAX_LEN` characters and the argument to
/// `max_argument_len`, normally the packet length in use.
pub fn split(raw: &str, max_argument_len: usize) -> Command {
    let (verb, argument) = match raw.split_once(DELIMITER) {
        Some((verb, argument)) => (verb, argument),
        None => (raw, ""),
    };

    Command::new(
        truncate(verb, VERB_MAX_LEN),
        truncate(argument, max_argument_len),
    )
}

/// Encode a verb and argument into a message
///
/// Produces `verb` when the argument is empty, `verb:argument` otherwise.
pub fn encode(verb: &str, argument: &str) -> String {
    if argument.is_empty() {
        verb.to_string()
    } else {
        format!("{}{}{}", verb, DELIMITER, argument)
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
