//! Error types for the SoundBridge client
//!
//! Provides a unified error type for all operations. The engine's own
//! taxonomy (transport, timeout, handshake, protocol) is kept apart from the
//! domain conditions raised by [`crate::client::SoundBridge`].

use thiserror::Error;

/// Result type alias using SoundBridgeError
pub type Result<T> = std::result::Result<T, SoundBridgeError>;

/// Unified error type for SoundBridge operations
#[derive(Debug, Error)]
pub enum SoundBridgeError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("Connection closed by peer")]
    ConnectionClosed,

    #[error("Timed out waiting for {during}")]
    Timeout { during: &'static str },

    #[error("Session is closed")]
    SessionClosed,

    // -------------------------------------------------------------------------
    // Handshake Errors
    // -------------------------------------------------------------------------
    #[error("Unexpected greeting on connect: {received:?}")]
    Handshake { received: String },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("{reason} for {command}{}: {response:?}", fmt_args(.args))]
    Protocol {
        command: String,
        args: Vec<String>,
        response: String,
        reason: String,
    },

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Server {name:?} not found in available servers ({})", .available.join(", "))]
    ServerNotFound { name: String, available: Vec<String> },

    #[error("Song {song:?} not found")]
    SongNotFound { song: String },

    #[error("Got status {status} from {command}")]
    UnexpectedStatus { command: String, status: String },

    /// A well-framed reply of the wrong shape for the operation
    #[error("{reason} for {command}{}: {reply:?}", fmt_args(.args))]
    UnexpectedReply {
        command: String,
        args: Vec<String>,
        reply: String,
        reason: String,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SoundBridgeError {
    /// Whether the error leaves the stream in an unknown framing position.
    ///
    /// A session that hit one of these must not be reused.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SoundBridgeError::Transport(_)
                | SoundBridgeError::ConnectionClosed
                | SoundBridgeError::Timeout { .. }
                | SoundBridgeError::Handshake { .. }
                | SoundBridgeError::Protocol { .. }
                | SoundBridgeError::SessionClosed
        )
    }

    pub(crate) fn unexpected_reply(
        command: &str,
        args: &[String],
        reply: &str,
        reason: impl Into<String>,
    ) -> Self {
        SoundBridgeError::UnexpectedReply {
            command: command.to_string(),
            args: args.to_vec(),
            reply: reply.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn protocol(
        command: &str,
        args: &[String],
        response: &str,
        reason: impl Into<String>,
    ) -> Self {
        SoundBridgeError::Protocol {
            command: command.to_string(),
            args: args.to_vec(),
            response: response.to_string(),
            reason: reason.into(),
        }
    }
}

fn fmt_args(args: &[String]) -> String {
    if args.is_empty() {
        String::new()
    } else {
        format!(" {}", args.join(" "))
    }
}
