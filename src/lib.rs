//! # SoundBridge
//!
//! A client for the Roku SoundBridge remote control protocol (RCP):
//! - Line transport over a single blocking TCP session
//! - Reply classification into scalar, list, transaction and status shapes
//! - Command engine with one command in flight at a time
//! - Domain operations for servers, browsing, playback and presets
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SoundBridge (client)                       │
//! │      servers · browse filters · songs · presets · play       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ command name + args
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Engine                                 │
//! │           send line → feed decoder → Reply / Status          │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐               ┌──────────────────┐
//!   │  LineTransport  │               │     Protocol     │
//!   │  (TcpStream)    │               │ classify/decode  │
//!   └─────────────────┘               └──────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use soundbridge::{Config, SoundBridge};
//!
//! let config = Config::builder().host("192.168.1.40").build();
//! let mut bridge = SoundBridge::connect(&config)?;
//! for server in bridge.list_servers()? {
//!     println!("{}", server);
//! }
//! # Ok::<(), soundbridge::SoundBridgeError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod network;
pub mod protocol;
pub mod engine;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, SoundBridgeError};
pub use config::Config;
pub use engine::Engine;
pub use client::{ActiveServer, SharedSoundBridge, SoundBridge, TrackQuery};
pub use protocol::{Reply, Status};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
