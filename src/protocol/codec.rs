//! Protocol codec
//!
//! Line framing and classification for the RCP wire protocol.
//!
//! ## Wire Format
//!
//! ```text
//! client: ListServers\n
//! server: ListServers: ListResultSize 2\r\n
//! server: ListServers: iMac iTunes\r\n
//! server: ListServers: Living Room\r\n
//! server: ListServers: ListResultEnd\r\n
//! ```
//!
//! Every reply line is keyed by the command that produced it. Markers and
//! status tokens are also accepted without the key.

use super::{Invocation, Status};

/// Greeting the appliance sends immediately after accept
pub const GREETING: &str = "roku: ready";

/// Terminator appended to every command line
pub const LINE_TERMINATOR: &str = "\n";

pub const LIST_START: &str = "ListResultSize";
pub const LIST_END: &str = "ListResultEnd";
pub const TRANSACTION_START: &str = "TransactionInitiated";
pub const TRANSACTION_COMPLETE: &str = "TransactionComplete";

/// One classified response line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `ListResultSize <N>`: N scalars follow, then `ListResultEnd`
    ListStart(usize),
    ListEnd,
    TransactionStart,
    TransactionComplete,
    Status(Status),
    /// Value after `<command>: `
    Scalar(&'a str),
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode one line of text to bytes, terminator included
pub fn encode_line(text: &str) -> Vec<u8> {
    let mut frame = Vec::with_capacity(text.len() + LINE_TERMINATOR.len());
    frame.extend_from_slice(text.as_bytes());
    frame.extend_from_slice(LINE_TERMINATOR.as_bytes());
    frame
}

/// Encode a command to bytes, terminator included
pub fn encode_command(invocation: &Invocation) -> Vec<u8> {
    encode_line(&invocation.to_line())
}

/// Strip a trailing `\n` or `\r\n`
pub fn strip_line_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

// =============================================================================
// Classification
// =============================================================================

/// Classify a raw line for the given command.
///
/// Precedence: list markers, transaction markers, status tokens, scalar.
/// Returns `None` when the line matches none of them, i.e. it is neither a
/// bare marker/status nor keyed by `command`.
pub fn classify<'a>(command: &str, line: &'a str) -> Option<Line<'a>> {
    let keyed = scalar_value(command, line);
    let payload = keyed.unwrap_or(line);

    if let Some(count) = parse_list_start(payload) {
        return Some(Line::ListStart(count));
    }

    match payload {
        LIST_END => return Some(Line::ListEnd),
        TRANSACTION_START => return Some(Line::TransactionStart),
        TRANSACTION_COMPLETE => return Some(Line::TransactionComplete),
        _ => {}
    }

    if let Ok(status) = payload.parse::<Status>() {
        return Some(Line::Status(status));
    }

    keyed.map(Line::Scalar)
}

/// Extract `<value>` from `<key>: <value>`; the value must be non-empty
pub fn scalar_value<'a>(key: &str, line: &'a str) -> Option<&'a str> {
    line.strip_prefix(key)
        .and_then(|rest| rest.strip_prefix(": "))
        .filter(|value| !value.is_empty())
}

fn parse_list_start(payload: &str) -> Option<usize> {
    let count = payload.strip_prefix(LIST_START)?.strip_prefix(' ')?;
    if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    count.parse().ok()
}
