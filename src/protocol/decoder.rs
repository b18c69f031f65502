//! Reply decoders
//!
//! Pure state machines that consume response lines one at a time and report
//! when the reply is complete. They perform no I/O: the engine reads lines
//! from the transport and feeds them in.

use std::mem;

use crate::error::{Result, SoundBridgeError};
use super::codec::{classify, scalar_value, Line};
use super::{Invocation, Reply, Status};

/// Outcome of feeding one line into a decoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress<T> {
    /// More lines are required
    Pending,
    /// The reply is fully decoded
    Complete(T),
}

// =============================================================================
// Single reply (scalar / list / transaction)
// =============================================================================

#[derive(Debug)]
enum ReplyState {
    Start,
    TransactionPayload,
    List {
        expected: usize,
        items: Vec<String>,
        in_transaction: bool,
    },
    TransactionEnd(Reply),
    Done,
}

/// Decoder for `execute`: one scalar, one list, or one transaction
/// wrapping either.
#[derive(Debug)]
pub struct ReplyDecoder {
    command: String,
    args: Vec<String>,
    state: ReplyState,
}

impl ReplyDecoder {
    pub fn new(invocation: &Invocation) -> Self {
        Self {
            command: invocation.name().to_string(),
            args: invocation.args().to_vec(),
            state: ReplyState::Start,
        }
    }

    /// Feed the next newline-stripped response line
    pub fn feed(&mut self, raw: &str) -> Result<Progress<Reply>> {
        let line = classify(&self.command, raw)
            .ok_or_else(|| self.error(raw, "Bad response"))?;

        let state = mem::replace(&mut self.state, ReplyState::Done);
        let (next, progress) = match (state, line) {
            // -----------------------------------------------------------------
            // First line: pick the reply shape
            // -----------------------------------------------------------------
            (ReplyState::Start, Line::TransactionStart) => {
                (ReplyState::TransactionPayload, Progress::Pending)
            }
            (ReplyState::Start, Line::ListStart(expected)) => (
                ReplyState::List {
                    expected,
                    items: Vec::with_capacity(expected),
                    in_transaction: false,
                },
                Progress::Pending,
            ),
            (ReplyState::Start, Line::Scalar(value)) => {
                (ReplyState::Done, Progress::Complete(Reply::Scalar(value.to_string())))
            }
            (ReplyState::Start, Line::Status(status)) => (
                ReplyState::Done,
                Progress::Complete(Reply::Scalar(status.as_str().to_string())),
            ),
            (ReplyState::Start, _) => {
                return Err(self.error(raw, "Unexpected marker at start of response"))
            }

            // -----------------------------------------------------------------
            // Transaction body: exactly one scalar or list
            // -----------------------------------------------------------------
            (ReplyState::TransactionPayload, Line::ListStart(expected)) => (
                ReplyState::List {
                    expected,
                    items: Vec::with_capacity(expected),
                    in_transaction: true,
                },
                Progress::Pending,
            ),
            (ReplyState::TransactionPayload, Line::Scalar(value)) => (
                ReplyState::TransactionEnd(Reply::Scalar(value.to_string())),
                Progress::Pending,
            ),
            (ReplyState::TransactionPayload, Line::Status(status)) => (
                ReplyState::TransactionEnd(Reply::Scalar(status.as_str().to_string())),
                Progress::Pending,
            ),
            (ReplyState::TransactionPayload, _) => {
                return Err(self.error(raw, "Expected transaction payload"))
            }

            // -----------------------------------------------------------------
            // List items, then ListResultEnd
            // -----------------------------------------------------------------
            (ReplyState::List { expected, mut items, in_transaction }, line)
                if items.len() < expected =>
            {
                match line {
                    Line::Scalar(value) => items.push(value.to_string()),
                    // A title such as "Complete" is still an item here
                    Line::Status(status) => items.push(status.as_str().to_string()),
                    Line::ListEnd => {
                        return Err(self.error(
                            raw,
                            format!(
                                "Expected {} list items, got {} before ListResultEnd",
                                expected,
                                items.len()
                            ),
                        ))
                    }
                    _ => return Err(self.error(raw, "Unexpected marker inside list response")),
                }
                (
                    ReplyState::List { expected, items, in_transaction },
                    Progress::Pending,
                )
            }
            (ReplyState::List { items, in_transaction, .. }, Line::ListEnd) => {
                if in_transaction {
                    (ReplyState::TransactionEnd(Reply::List(items)), Progress::Pending)
                } else {
                    (ReplyState::Done, Progress::Complete(Reply::List(items)))
                }
            }
            (ReplyState::List { .. }, _) => {
                return Err(self.error(raw, "Expected ListResultEnd at end of list response"))
            }

            // -----------------------------------------------------------------
            // Transaction close
            // -----------------------------------------------------------------
            (ReplyState::TransactionEnd(reply), Line::TransactionComplete) => {
                (ReplyState::Done, Progress::Complete(reply))
            }
            (ReplyState::TransactionEnd(_), _) => {
                return Err(self.error(raw, "Expected TransactionComplete"))
            }

            (ReplyState::Done, _) => {
                return Err(self.error(raw, "Unexpected line after complete response"))
            }
        };

        self.state = next;
        Ok(progress)
    }

    fn error(&self, raw: &str, reason: impl Into<String>) -> SoundBridgeError {
        SoundBridgeError::protocol(&self.command, &self.args, raw, reason)
    }
}

// =============================================================================
// Multi-line reply terminated by a status
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum MultiState {
    Start,
    Open,
    Transaction { status: Option<Status> },
    Done,
}

/// Decoder for `execute_multi`: informational scalars closed by a status.
///
/// When the reply opens with `TransactionInitiated`, it runs until
/// `TransactionComplete` and the status may come before the informational
/// lines; the first status inside the bracket is the result. List and
/// transaction markers anywhere else are informational text.
#[derive(Debug)]
pub struct MultiReplyDecoder {
    command: String,
    args: Vec<String>,
    lines: Vec<String>,
    state: MultiState,
}

impl MultiReplyDecoder {
    pub fn new(invocation: &Invocation) -> Self {
        Self {
            command: invocation.name().to_string(),
            args: invocation.args().to_vec(),
            lines: Vec::new(),
            state: MultiState::Start,
        }
    }

    /// Feed the next newline-stripped response line
    pub fn feed(&mut self, raw: &str) -> Result<Progress<(Status, Vec<String>)>> {
        let line = classify(&self.command, raw)
            .ok_or_else(|| self.error(raw, "Bad response"))?;

        match (self.state, line) {
            (MultiState::Start, Line::TransactionStart) => {
                self.state = MultiState::Transaction { status: None };
            }
            (MultiState::Start | MultiState::Open, Line::Status(status)) => {
                self.state = MultiState::Done;
                return Ok(Progress::Complete((status, mem::take(&mut self.lines))));
            }
            (MultiState::Start | MultiState::Open, Line::Scalar(value)) => {
                self.lines.push(value.to_string());
                self.state = MultiState::Open;
            }
            (MultiState::Transaction { status: None }, Line::Status(status)) => {
                self.state = MultiState::Transaction { status: Some(status) };
            }
            (MultiState::Transaction { status: Some(_) }, Line::Status(status)) => {
                self.lines.push(status.as_str().to_string());
            }
            (MultiState::Transaction { .. }, Line::Scalar(value)) => {
                self.lines.push(value.to_string());
            }
            (MultiState::Transaction { status }, Line::TransactionComplete) => {
                let status = status
                    .ok_or_else(|| self.error(raw, "Transaction completed without a status"))?;
                self.state = MultiState::Done;
                return Ok(Progress::Complete((status, mem::take(&mut self.lines))));
            }
            (MultiState::Done, _) => {
                return Err(self.error(raw, "Unexpected line after complete response"))
            }
            (MultiState::Transaction { .. }, _) => {
                let text = self.payload(raw).to_string();
                self.lines.push(text);
            }
            (MultiState::Start | MultiState::Open, _) => {
                let text = self.payload(raw).to_string();
                self.lines.push(text);
                self.state = MultiState::Open;
            }
        }

        Ok(Progress::Pending)
    }

    /// Marker text with the `<command>: ` key removed
    fn payload<'a>(&self, raw: &'a str) -> &'a str {
        scalar_value(&self.command, raw).unwrap_or(raw)
    }

    fn error(&self, raw: &str, reason: impl Into<String>) -> SoundBridgeError {
        SoundBridgeError::protocol(&self.command, &self.args, raw, reason)
    }
}
