//! Command definitions
//!
//! Represents one command line sent to the appliance.

use std::fmt;

/// A command name plus its string-coerced arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    name: String,
    args: Vec<String>,
}

impl Invocation {
    /// Build an invocation, coercing every argument to its string form
    pub fn new<I, A>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: ToString,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Command without arguments
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Wire form without the line terminator: `<name> <arg1> <arg2> ...`
    pub fn to_line(&self) -> String {
        let mut line = self.name.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}
