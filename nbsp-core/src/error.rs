//! Error types for the NBSP core protocol engine

use std::fmt;

/// Result type for NBSP core operations
pub type NbspCoreResult<T> = std::result::Result<T, NbspCoreError>;

/// Error types produced by the NBSP protocol engine.
///
/// This is intentionally minimal — only the 2 variants the engine actually
/// produces. A full buffer is not an error: `send` signals it through its
/// return value.
#[derive(Debug)]
pub enum NbspCoreError {
    /// Construction-time errors (invalid buffer size)
    Config { message: String },
    /// Malformed frames on the wire
    Protocol { message: String },
}

impl NbspCoreError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        NbspCoreError::Config {
            message: message.into(),
        }
    }

    /// Create a protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        NbspCoreError::Protocol {
            message: message.into(),
        }
    }
}

impl fmt::Display for NbspCoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NbspCoreError::Config { message } => write!(f, "Config error: {message}"),
            NbspCoreError::Protocol { message } => write!(f, "Protocol error: {message}"),
        }
    }
}

impl std::error::Error for NbspCoreError {}
