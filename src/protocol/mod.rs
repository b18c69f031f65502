//! Protocol Module
//!
//! Defines the RCP text protocol spoken by the appliance.
//!
//! ## Protocol Format
//!
//! Requests are single lines: `<CommandName> <arg1> <arg2> ...`.
//!
//! ### Reply Shapes
//! - Scalar:      `<CommandName>: <value>`
//! - List:        `ListResultSize <N>`, N scalars, `ListResultEnd`
//! - Transaction: `TransactionInitiated`, one scalar or list,
//!   `TransactionComplete`
//! - Status:      one bare token, e.g. `OK`, `ErrorDisconnected`
//!
//! The shape is selected by the first line of the reply, never by the
//! command name.

mod command;
mod response;
mod codec;
mod decoder;

pub use command::Invocation;
pub use response::{Reply, Status};
pub use codec::{
    classify, encode_command, encode_line, scalar_value, strip_line_terminator, Line, GREETING,
    LINE_TERMINATOR, LIST_END, LIST_START, TRANSACTION_COMPLETE, TRANSACTION_START,
};
pub use decoder::{MultiReplyDecoder, Progress, ReplyDecoder};
