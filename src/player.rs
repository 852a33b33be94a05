//! Symmetric async NBSP endpoint
//!
//! A [`Player`] is one end of an NBSP channel. It is not a sender or a
//! receiver by construction — either role is taken per operation, and a
//! bidirectional conversation is just both families of calls interleaved
//! on one player.
//!
//! The protocol's receive path is two steps (parse the message, then emit
//! the response); here they collapse into a single [`Player::recv`], with
//! [`Player::try_recv`] as the non-suspending variant for select-default
//! loops.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use nbsp_core::{decode_message, Endpoint, EndpointStats, Word};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::config::NbspConfig;
use crate::error::Result;
use crate::link::Link;
use crate::metrics;

/// Outcome of handling one incoming message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The peer sent a data word; an acknowledgement has already gone back.
    Data(Word),
    /// The peer acknowledged our outstanding word; if the send buffer held
    /// data, its oldest word is now on the wire.
    AckHandled,
}

/// One end of an NBSP channel: protocol engine plus link.
pub struct Player {
    endpoint: Endpoint,
    link: Arc<dyn Link>,
}

impl Player {
    /// Create a player over the given link.
    pub fn new(link: Arc<dyn Link>, config: NbspConfig) -> Result<Self> {
        config.validate()?;
        let endpoint = Endpoint::new(config.buffer_words)?;

        metrics::global_metrics().player_created();
        info!(buffer_words = config.buffer_words, "NBSP player ready");

        Ok(Self { endpoint, link })
    }

    /// Submit one word for delivery to the peer.
    ///
    /// Never waits for the peer: the word goes to the wire when the channel
    /// is idle, into the buffer while an ack is outstanding. Returns
    /// `Ok(false)` — word dropped — when the buffer is full; retry after the
    /// next [`Event::AckHandled`].
    pub async fn send(&mut self, word: Word) -> Result<bool> {
        let accepted = self.endpoint.send(word);
        if accepted {
            metrics::global_metrics().record_word_sent();
        } else {
            metrics::global_metrics().record_send_rejected();
        }
        self.pump().await?;
        Ok(accepted)
    }

    /// Wait for the next message from the peer and handle it.
    ///
    /// Data is acknowledged before this returns; an ack releases the
    /// outstanding slot and pushes the next buffered word out.
    pub async fn recv(&mut self) -> Result<Event> {
        let frame = self.link.recv_frame().await?;
        self.process(frame).await
    }

    /// Handle one message if the link already has one queued.
    ///
    /// The select-default arm: returns `Ok(None)` instead of suspending when
    /// the channel is quiet.
    pub async fn try_recv(&mut self) -> Result<Option<Event>> {
        match self.link.try_recv_frame()? {
            Some(frame) => Ok(Some(self.process(frame).await?)),
            None => Ok(None),
        }
    }

    /// Wait until every buffered and in-flight word has been acknowledged.
    ///
    /// Intended for teardown and quiescence points. Data arriving meanwhile
    /// is still acknowledged, but each word overwrites the last received
    /// datum — callers must not rely on inbound payloads during a flush.
    /// A flush with nothing pending returns immediately.
    pub async fn flush(&mut self) -> Result<()> {
        while self.endpoint.pending_words_to_send() > 0 {
            self.recv().await?;
        }
        debug!("flush complete");
        Ok(())
    }

    /// Like [`Player::flush`], but gives up after `available` has elapsed.
    ///
    /// Handles incoming traffic until the pending count reaches zero or the
    /// deadline passes, whichever comes first. Returns the pending count at
    /// return time.
    pub async fn drain_for(&mut self, available: Duration) -> Result<u32> {
        let deadline = Instant::now() + available;

        while self.endpoint.pending_words_to_send() > 0 {
            let link = Arc::clone(&self.link);
            let frame = tokio::select! {
                _ = sleep_until(deadline) => break,
                frame = link.recv_frame() => frame?,
            };
            self.process(frame).await?;
        }

        Ok(self.endpoint.pending_words_to_send())
    }

    /// The last word received. Meaningful only after a [`Event::Data`].
    pub fn received_data(&self) -> Word {
        self.endpoint.received_data()
    }

    /// Words not yet acknowledged by the peer, counting the in-flight one.
    pub fn pending_words_to_send(&self) -> u32 {
        self.endpoint.pending_words_to_send()
    }

    /// Words guaranteed to be accepted by `send` right now.
    pub fn sending_capacity(&self) -> u32 {
        self.endpoint.sending_capacity()
    }

    /// Cumulative counters for this endpoint.
    pub fn stats(&self) -> &EndpointStats {
        self.endpoint.stats()
    }

    async fn process(&mut self, frame: Bytes) -> Result<Event> {
        let msg = decode_message(frame)?;
        let is_data = self.endpoint.handle(msg);
        self.pump().await?;

        if is_data {
            metrics::global_metrics().record_word_received();
            Ok(Event::Data(self.endpoint.received_data()))
        } else {
            Ok(Event::AckHandled)
        }
    }

    /// Ship every frame the engine has queued, in order.
    async fn pump(&mut self) -> Result<()> {
        while let Some(frame) = self.endpoint.pop_frame() {
            self.link.send_frame(frame.encode()).await?;
        }
        Ok(())
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        metrics::global_metrics().player_closed();
    }
}
