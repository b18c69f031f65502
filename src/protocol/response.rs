//! Response definitions
//!
//! Status tokens and decoded reply shapes.

use std::fmt;
use std::str::FromStr;

/// Terminal status tokens reported by the appliance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    GenericError,
    ErrorDisconnected,
    ResourceAllocationError,
    Disconnected,
    ParameterError,
    ErrorInitialSetupRequired,
    ErrorAlreadySubscribed,
    ErrorNotSubscribed,
    ErrorUnsupported,
    Complete,
    NotComplete,
}

impl Status {
    /// Every status token, in protocol documentation order
    pub const ALL: [Status; 12] = [
        Status::Ok,
        Status::GenericError,
        Status::ErrorDisconnected,
        Status::ResourceAllocationError,
        Status::Disconnected,
        Status::ParameterError,
        Status::ErrorInitialSetupRequired,
        Status::ErrorAlreadySubscribed,
        Status::ErrorNotSubscribed,
        Status::ErrorUnsupported,
        Status::Complete,
        Status::NotComplete,
    ];

    /// Wire token
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::GenericError => "GenericError",
            Status::ErrorDisconnected => "ErrorDisconnected",
            Status::ResourceAllocationError => "ResourceAllocationError",
            Status::Disconnected => "Disconnected",
            Status::ParameterError => "ParameterError",
            Status::ErrorInitialSetupRequired => "ErrorInitialSetupRequired",
            Status::ErrorAlreadySubscribed => "ErrorAlreadySubscribed",
            Status::ErrorNotSubscribed => "ErrorNotSubscribed",
            Status::ErrorUnsupported => "ErrorUnsupported",
            Status::Complete => "Complete",
            Status::NotComplete => "NotComplete",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }
}

impl FromStr for Status {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully decoded reply to [`crate::Engine::execute`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Single value keyed by the command name
    Scalar(String),

    /// Pre-counted list of values
    List(Vec<String>),
}

impl Reply {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Reply::Scalar(value) => Some(value),
            Reply::List(_) => None,
        }
    }

    /// Consume into a list; a scalar becomes a one-element list
    pub fn into_list(self) -> Vec<String> {
        match self {
            Reply::Scalar(value) => vec![value],
            Reply::List(items) => items,
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Scalar(value) => f.write_str(value),
            Reply::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}: {}", i, item)?;
                }
                Ok(())
            }
        }
    }
}
