//! Async wrappers for the double-word streaming variant
//!
//! Fixed roles, higher throughput: [`StreamSender`] ships token-free pairs
//! of words, [`StreamReceiver`] answers each pair with a bare
//! end-of-transfer token. The two types exist precisely so a channel
//! committed to streaming cannot be driven with the normal symmetric
//! operations, or the other way round.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use nbsp_core::wire::{decode_message, decode_pair, Frame, Message, Word};
use nbsp_core::{EndpointStats, StreamState};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::error::{NbspError, Result};
use crate::link::Link;
use crate::metrics;

/// Sending half of a streaming channel.
pub struct StreamSender {
    state: StreamState,
    link: Arc<dyn Link>,
}

impl StreamSender {
    /// Create a streaming sender with the given buffer size in words
    /// (a power of two ≥ 4; the ring is indexed in pairs).
    pub fn new(link: Arc<dyn Link>, buffer_words: u32) -> Result<Self> {
        let state = StreamState::new(buffer_words)?;

        metrics::global_metrics().player_created();
        info!(buffer_words, "streaming sender ready");

        Ok(Self { state, link })
    }

    /// Submit a pair of words for delivery.
    ///
    /// Straight to the wire when idle, buffered while the previous pair is
    /// unacknowledged, `Ok(false)` when no pair-slot is free.
    pub async fn send_pair(&mut self, first: Word, second: Word) -> Result<bool> {
        let accepted = self.state.send_pair(first, second);
        if accepted {
            metrics::global_metrics().record_word_sent();
            metrics::global_metrics().record_word_sent();
        } else {
            metrics::global_metrics().record_send_rejected();
        }
        self.pump().await?;
        Ok(accepted)
    }

    /// Wait for the receiver's acknowledgement and handle it: the next
    /// buffered pair, if any, goes to the wire.
    pub async fn handle_ack(&mut self) -> Result<()> {
        let frame = self.link.recv_frame().await?;
        self.process_ack(frame).await
    }

    /// Handle an acknowledgement if one is already queued, without
    /// suspending. Returns whether one was handled.
    pub async fn try_handle_ack(&mut self) -> Result<bool> {
        match self.link.try_recv_frame()? {
            Some(frame) => {
                self.process_ack(frame).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Wait until every pair has been acknowledged.
    pub async fn flush(&mut self) -> Result<()> {
        while self.state.pending_words_to_send() > 0 {
            self.handle_ack().await?;
        }
        debug!("stream flush complete");
        Ok(())
    }

    /// Like [`StreamSender::flush`], but gives up after `available` has
    /// elapsed. Returns the pending count at return time; always even.
    pub async fn drain_for(&mut self, available: Duration) -> Result<u32> {
        let deadline = Instant::now() + available;

        while self.state.pending_words_to_send() > 0 {
            let link = Arc::clone(&self.link);
            let frame = tokio::select! {
                _ = sleep_until(deadline) => break,
                frame = link.recv_frame() => frame?,
            };
            self.process_ack(frame).await?;
        }

        Ok(self.state.pending_words_to_send())
    }

    /// Words not yet acknowledged, counting the in-flight pair.
    pub fn pending_words_to_send(&self) -> u32 {
        self.state.pending_words_to_send()
    }

    /// Words guaranteed to be accepted by `send_pair` right now.
    pub fn sending_capacity(&self) -> u32 {
        self.state.sending_capacity()
    }

    pub fn stats(&self) -> &EndpointStats {
        self.state.stats()
    }

    async fn process_ack(&mut self, frame: Bytes) -> Result<()> {
        match decode_message(frame)? {
            Message::Ack => {}
            Message::Data(_) => {
                return Err(NbspError::protocol(
                    "data frame on a streaming channel",
                ));
            }
        }
        self.state.handle_ack();
        self.pump().await
    }

    async fn pump(&mut self) -> Result<()> {
        while let Some(frame) = self.state.pop_frame() {
            self.link.send_frame(frame.encode()).await?;
        }
        Ok(())
    }
}

impl Drop for StreamSender {
    fn drop(&mut self) {
        metrics::global_metrics().player_closed();
    }
}

/// Receiving half of a streaming channel. Stateless: every received pair is
/// acknowledged before it is returned.
pub struct StreamReceiver {
    link: Arc<dyn Link>,
}

impl StreamReceiver {
    pub fn new(link: Arc<dyn Link>) -> Self {
        metrics::global_metrics().player_created();
        Self { link }
    }

    /// Wait for the next pair of words.
    pub async fn recv_pair(&mut self) -> Result<(Word, Word)> {
        let frame = self.link.recv_frame().await?;
        self.finish_pair(frame).await
    }

    /// Return the next pair if one is already queued, without suspending.
    pub async fn try_recv_pair(&mut self) -> Result<Option<(Word, Word)>> {
        match self.link.try_recv_frame()? {
            Some(frame) => Ok(Some(self.finish_pair(frame).await?)),
            None => Ok(None),
        }
    }

    async fn finish_pair(&mut self, frame: Bytes) -> Result<(Word, Word)> {
        let pair = decode_pair(frame)?;
        self.link.send_frame(Frame::Ack.encode()).await?;
        metrics::global_metrics().record_word_received();
        metrics::global_metrics().record_word_received();
        Ok(pair)
    }
}

impl Drop for StreamReceiver {
    fn drop(&mut self) {
        metrics::global_metrics().player_closed();
    }
}
