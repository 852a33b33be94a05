//! Error types for the async NBSP layer

use thiserror::Error;

/// Result type for NBSP operations
pub type Result<T> = std::result::Result<T, NbspError>;

/// Error types for async NBSP operations.
///
/// A full send buffer is not represented here — `send` reports it through
/// its boolean return value, matching the protocol's non-blocking contract.
#[derive(Error, Debug)]
pub enum NbspError {
    /// I/O related errors from custom link implementations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration (buffer size rules)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Malformed or out-of-place frames on the wire
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// The peer end of the link has gone away
    #[error("link closed by peer")]
    LinkClosed,
}

impl NbspError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        NbspError::Config {
            message: message.into(),
        }
    }

    /// Create a protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        NbspError::Protocol {
            message: message.into(),
        }
    }

    /// Check if this error means the channel is unusable from now on
    pub fn is_closed(&self) -> bool {
        match self {
            NbspError::LinkClosed => true,
            NbspError::Io(e) => {
                matches!(
                    e.kind(),
                    std::io::ErrorKind::BrokenPipe
                        | std::io::ErrorKind::ConnectionAborted
                        | std::io::ErrorKind::ConnectionReset
                        | std::io::ErrorKind::UnexpectedEof
                )
            }
            _ => false,
        }
    }
}

impl From<nbsp_core::NbspCoreError> for NbspError {
    fn from(err: nbsp_core::NbspCoreError) -> Self {
        match err {
            nbsp_core::NbspCoreError::Config { message } => NbspError::Config { message },
            nbsp_core::NbspCoreError::Protocol { message } => NbspError::Protocol { message },
        }
    }
}
