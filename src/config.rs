//! Configuration for NBSP endpoints

use crate::error::{NbspError, Result};

/// Endpoint configuration builder.
///
/// The protocol has a single tunable: the send-buffer size. Everything else
/// — the single-outstanding-word discipline, the ack tokens — is fixed by
/// the wire contract.
#[derive(Debug, Clone)]
pub struct NbspConfig {
    /// Send-buffer size in words. 0 declares a receive-only endpoint;
    /// otherwise a power of two ≥ 2, of which one slot stays reserved.
    pub buffer_words: u32,
}

impl Default for NbspConfig {
    fn default() -> Self {
        Self { buffer_words: 8 }
    }
}

impl NbspConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the send-buffer size in words
    pub fn buffer_words(mut self, words: u32) -> Self {
        self.buffer_words = words;
        self
    }

    /// Configuration for a pure receiver: no send buffer at all
    pub fn receive_only() -> Self {
        Self { buffer_words: 0 }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.buffer_words != 0
            && (self.buffer_words < 2 || !self.buffer_words.is_power_of_two())
        {
            return Err(NbspError::config(format!(
                "buffer size must be 0 or a power of two >= 2, got {}",
                self.buffer_words
            )));
        }
        Ok(())
    }
}
