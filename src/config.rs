//! Configuration for a SoundBridge session
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{Result, SoundBridgeError};

/// Default RCP port on the appliance
pub const DEFAULT_PORT: u16 = 5555;

/// Default timeout for connect, read and write (milliseconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default cap on one response line, terminator included
pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

/// Main configuration for a session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Appliance host name or IP address
    pub host: String,

    /// Appliance RCP port
    pub port: u16,

    /// TCP connect timeout (milliseconds)
    pub connect_timeout_ms: u64,

    /// Read timeout per response line (milliseconds)
    pub read_timeout_ms: u64,

    /// Write timeout per command line (milliseconds)
    pub write_timeout_ms: u64,

    /// Longest response line accepted before the session is dropped (bytes)
    pub max_line_len: usize,

    // -------------------------------------------------------------------------
    // Diagnostics
    // -------------------------------------------------------------------------
    /// Emit every sent and received line as a `debug` trace event
    pub trace_lines: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            connect_timeout_ms: DEFAULT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_TIMEOUT_MS,
            write_timeout_ms: DEFAULT_TIMEOUT_MS,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            trace_lines: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` form of the appliance address
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    /// Reject configurations that cannot produce a working session.
    ///
    /// A zero timeout would mean "block forever" to the socket layer, which
    /// leaves a dead appliance hanging the caller.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(SoundBridgeError::Config("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(SoundBridgeError::Config("port must not be zero".to_string()));
        }
        if self.max_line_len < 2 {
            return Err(SoundBridgeError::Config(
                "max_line_len must allow at least one byte plus terminator".to_string(),
            ));
        }
        for (name, ms) in [
            ("connect_timeout_ms", self.connect_timeout_ms),
            ("read_timeout_ms", self.read_timeout_ms),
            ("write_timeout_ms", self.write_timeout_ms),
        ] {
            if ms == 0 {
                return Err(SoundBridgeError::Config(format!("{} must be positive", name)));
            }
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the appliance host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the appliance port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set connect, read and write timeouts at once (in milliseconds)
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self.config.read_timeout_ms = ms;
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the longest accepted response line (in bytes)
    pub fn max_line_len(mut self, bytes: usize) -> Self {
        self.config.max_line_len = bytes;
        self
    }

    /// Trace every protocol line
    pub fn trace_lines(mut self, enabled: bool) -> Self {
        self.config.trace_lines = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
