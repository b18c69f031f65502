//! Line Transport
//!
//! Owns the TCP stream to the appliance and moves whole lines across it.

use std::borrow::Cow;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;
use crate::error::{Result, SoundBridgeError};
use crate::protocol::{encode_command, encode_line, strip_line_terminator, Invocation, GREETING};

/// A line-oriented connection to one appliance
pub struct LineTransport {
    /// TCP stream reader (buffered for line assembly)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (flushed after every line)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,

    /// Emit every line as a debug event
    trace_lines: bool,

    /// Longest accepted response line, terminator included
    max_line_len: usize,

    closed: bool,
}

impl LineTransport {
    /// Connect to the appliance named by `config` and perform the handshake
    pub fn connect(config: &Config) -> Result<Self> {
        config.validate()?;

        tracing::debug!("Connecting to {}", config.addr());
        let stream = Self::open_stream(config)?;
        let mut transport = Self::from_stream(stream, config)?;
        transport.handshake()?;

        tracing::info!("Connected to SoundBridge at {}", transport.peer_addr);
        Ok(transport)
    }

    /// Wrap an already-connected stream; no handshake is performed
    ///
    /// Sets up buffered I/O and configures timeouts
    pub fn from_stream(stream: TcpStream, config: &Config) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Commands are tiny and latency-bound
        stream.set_nodelay(true)?;

        let mut transport = Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: BufWriter::new(stream),
            peer_addr,
            trace_lines: config.trace_lines,
            max_line_len: config.max_line_len,
            closed: false,
        };
        transport.set_timeouts(config.read_timeout(), config.write_timeout())?;
        Ok(transport)
    }

    fn open_stream(config: &Config) -> Result<TcpStream> {
        let mut last_err = None;
        for addr in (config.host.as_str(), config.port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, config.connect_timeout()) {
                Ok(stream) => return Ok(stream),
                Err(e) if is_timeout(&e) => {
                    tracing::debug!("Connect to {} timed out", addr);
                    last_err = Some(SoundBridgeError::Timeout { during: "connect" });
                }
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", addr, e);
                    last_err = Some(SoundBridgeError::Transport(e));
                }
            }
        }
        Err(last_err.unwrap_or_else(|| {
            SoundBridgeError::Transport(std::io::Error::new(
                ErrorKind::NotFound,
                format!("no addresses resolved for {}", config.addr()),
            ))
        }))
    }

    /// Configure stream timeouts
    pub fn set_timeouts(&mut self, read: Duration, write: Duration) -> Result<()> {
        self.reader.get_ref().set_read_timeout(Some(read))?;
        self.writer.get_ref().set_write_timeout(Some(write))?;
        Ok(())
    }

    /// Read the greeting and check it is `roku: ready`
    pub fn handshake(&mut self) -> Result<()> {
        let hello = self.read_line_during("greeting")?;
        if hello != GREETING {
            tracing::warn!("Unexpected greeting from {}: {:?}", self.peer_addr, hello);
            self.close();
            return Err(SoundBridgeError::Handshake { received: hello });
        }
        Ok(())
    }

    /// Write one line and flush it to the peer
    pub fn send_line(&mut self, text: &str) -> Result<()> {
        self.write_frame(text, &encode_line(text))
    }

    /// Write one encoded command line and flush it to the peer
    pub fn send_command(&mut self, invocation: &Invocation) -> Result<()> {
        self.write_frame(&invocation.to_line(), &encode_command(invocation))
    }

    fn write_frame(&mut self, text: &str, frame: &[u8]) -> Result<()> {
        if self.closed {
            return Err(SoundBridgeError::SessionClosed);
        }
        if self.trace_lines {
            tracing::debug!(peer = %self.peer_addr, ">> {}", text);
        }

        let written = self
            .writer
            .write_all(frame)
            .and_then(|_| self.writer.flush());

        match written {
            Ok(()) => Ok(()),
            Err(e) if is_timeout(&e) => Err(SoundBridgeError::Timeout { during: "command write" }),
            Err(e) => Err(SoundBridgeError::Transport(e)),
        }
    }

    /// Block until one full line arrives; the terminator is stripped
    pub fn read_line(&mut self) -> Result<String> {
        self.read_line_during("response line")
    }

    fn read_line_during(&mut self, during: &'static str) -> Result<String> {
        if self.closed {
            return Err(SoundBridgeError::SessionClosed);
        }

        let limit = self.max_line_len as u64;
        let mut buf = Vec::new();
        match (&mut self.reader).take(limit).read_until(b'\n', &mut buf) {
            Ok(0) => {
                tracing::debug!("Peer {} closed the connection", self.peer_addr);
                return Err(SoundBridgeError::ConnectionClosed);
            }
            Ok(_) => {}
            Err(e) if is_timeout(&e) => return Err(SoundBridgeError::Timeout { during }),
            Err(e) => return Err(SoundBridgeError::Transport(e)),
        }

        if buf.last() != Some(&b'\n') {
            if buf.len() as u64 >= limit {
                tracing::warn!(
                    "Response line from {} exceeds {} bytes",
                    self.peer_addr,
                    self.max_line_len
                );
                return Err(SoundBridgeError::Transport(std::io::Error::new(
                    ErrorKind::InvalidData,
                    format!("response line exceeds {} bytes", self.max_line_len),
                )));
            }
            // A line cut off by EOF is not a complete line
            return Err(SoundBridgeError::ConnectionClosed);
        }

        let text = String::from_utf8_lossy(&buf);
        if matches!(text, Cow::Owned(_)) {
            tracing::warn!(
                "Response line from {} is not valid UTF-8; invalid bytes replaced",
                self.peer_addr
            );
        }
        let line = strip_line_terminator(&text).to_string();
        if self.trace_lines {
            tracing::debug!(peer = %self.peer_addr, "<< {}", line);
        }
        Ok(line)
    }

    /// Shut the stream down; calling it again is a no-op
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let _ = self.writer.flush();
        let _ = self.writer.get_ref().shutdown(Shutdown::Both);
        tracing::debug!("Closed connection to {}", self.peer_addr);
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// Read timeouts surface as `WouldBlock` on Unix and `TimedOut` on Windows
fn is_timeout(e: &std::io::Error) -> bool {
    matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}
