//! Engine Module
//!
//! The command engine that drives one request/response round trip at a time.
//!
//! ## Responsibilities
//! - Send a command line over the transport
//! - Feed reply lines into the matching decoder until it completes
//! - Tear the session down when framing can no longer be trusted

use crate::config::Config;
use crate::error::{Result, SoundBridgeError};
use crate::network::LineTransport;
use crate::protocol::{Invocation, MultiReplyDecoder, Progress, Reply, ReplyDecoder, Status};

/// The protocol engine for one live session
///
/// ## Concurrency Model
///
/// Strictly one command in flight: every call takes `&mut self` and owns the
/// stream from the moment the command is written until its reply is fully
/// consumed. Sharing an engine across threads requires an external lock
/// (see [`crate::client::SharedSoundBridge`]).
///
/// ## Failure Model
///
/// Timeout, transport and protocol failures leave the stream at an unknown
/// framing position. The engine closes the transport and every later call
/// fails with [`SoundBridgeError::SessionClosed`].
pub struct Engine {
    transport: LineTransport,
    poisoned: bool,
}

impl Engine {
    /// Connect, handshake, and wrap the transport
    pub fn connect(config: &Config) -> Result<Self> {
        Ok(Self::new(LineTransport::connect(config)?))
    }

    /// Wrap a transport that has already completed the handshake
    pub fn new(transport: LineTransport) -> Self {
        Self {
            transport,
            poisoned: false,
        }
    }

    /// Execute a command whose reply is a scalar, a list, or a transaction
    pub fn execute<I, A>(&mut self, command: &str, args: I) -> Result<Reply>
    where
        I: IntoIterator<Item = A>,
        A: ToString,
    {
        self.execute_invocation(&Invocation::new(command, args))
    }

    /// Execute a command whose reply is informational lines closed by a status
    pub fn execute_multi<I, A>(&mut self, command: &str, args: I) -> Result<(Status, Vec<String>)>
    where
        I: IntoIterator<Item = A>,
        A: ToString,
    {
        self.execute_multi_invocation(&Invocation::new(command, args))
    }

    pub fn execute_invocation(&mut self, invocation: &Invocation) -> Result<Reply> {
        let mut decoder = ReplyDecoder::new(invocation);
        self.round_trip(invocation, |line| decoder.feed(line))
    }

    pub fn execute_multi_invocation(
        &mut self,
        invocation: &Invocation,
    ) -> Result<(Status, Vec<String>)> {
        let mut decoder = MultiReplyDecoder::new(invocation);
        self.round_trip(invocation, |line| decoder.feed(line))
    }

    /// Whether the session can still carry commands
    pub fn is_usable(&self) -> bool {
        !self.poisoned && !self.transport.is_closed()
    }

    /// Close the session; idempotent
    pub fn close(&mut self) {
        self.transport.close();
    }

    pub fn peer_addr(&self) -> &str {
        self.transport.peer_addr()
    }

    fn round_trip<T>(
        &mut self,
        invocation: &Invocation,
        mut feed: impl FnMut(&str) -> Result<Progress<T>>,
    ) -> Result<T> {
        if !self.is_usable() {
            return Err(SoundBridgeError::SessionClosed);
        }

        let line = invocation.to_line();
        // An embedded line break would smuggle a second command onto the wire
        if line.contains(['\r', '\n']) {
            return Err(SoundBridgeError::protocol(
                invocation.name(),
                invocation.args(),
                "",
                "Command line contains a line break",
            ));
        }

        let result = self.transport.send_command(invocation).and_then(|_| loop {
            let response = self.transport.read_line()?;
            if let Progress::Complete(value) = feed(response.as_str())? {
                break Ok(value);
            }
        });

        if let Err(ref e) = result {
            if e.is_fatal() {
                self.poison(invocation, e);
            }
        }
        result
    }

    fn poison(&mut self, invocation: &Invocation, error: &SoundBridgeError) {
        if self.poisoned {
            return;
        }
        tracing::warn!(
            command = invocation.name(),
            "Closing session to {} after error: {}",
            self.transport.peer_addr(),
            error
        );
        self.poisoned = true;
        self.transport.close();
    }
}
