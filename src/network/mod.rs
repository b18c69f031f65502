//! Network Module
//!
//! TCP line transport to the appliance.
//!
//! ## Model
//! - One blocking stream per session
//! - One command in flight at a time
//! - Read/write timeouts bound every line

mod connection;

pub use connection::LineTransport;
