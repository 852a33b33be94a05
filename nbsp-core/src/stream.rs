//! Double-word streaming variant of the protocol.
//!
//! Trades the normal variant's symmetry for throughput: the sender ships two
//! payload words per frame with no leading token, and the receiver answers
//! with a bare end-of-transfer token. Roles are fixed for the life of the
//! channel and the variants must never share one — which is why this state
//! machine is a distinct type rather than a mode flag on [`Endpoint`].
//!
//! Only the sender carries state; the receive side is a stateless
//! decode-and-ack handled entirely by the I/O layer with
//! [`crate::wire::decode_pair`].
//!
//! [`Endpoint`]: crate::endpoint::Endpoint

use std::collections::VecDeque;

use tracing::{trace, warn};

use crate::endpoint::EndpointStats;
use crate::error::{NbspCoreError, NbspCoreResult};
use crate::ring::WordRing;
use crate::wire::{Frame, Word};

/// Send-side state machine for the streaming variant. Granularity is a pair:
/// either zero or two words are outstanding at any quiescent point.
#[derive(Debug)]
pub struct StreamState {
    /// Words on the wire awaiting the ack. Always 0 or 2.
    in_flight: u32,
    ring: WordRing,
    outgoing: VecDeque<Frame>,
    stats: EndpointStats,
}

impl StreamState {
    /// Create a streaming sender with the given buffer size in words.
    ///
    /// The ring is indexed in pairs and reserves one pair-slot, so the size
    /// must be a power of two ≥ 4: a streaming sender without room for at
    /// least one buffered pair cannot honour its contract.
    pub fn new(buffer_words: u32) -> NbspCoreResult<Self> {
        if buffer_words < 4 {
            return Err(NbspCoreError::config(format!(
                "streaming sender needs a buffer of at least 4 words, got {buffer_words}"
            )));
        }

        Ok(Self {
            in_flight: 0,
            ring: WordRing::new(buffer_words)?,
            outgoing: VecDeque::new(),
            stats: EndpointStats::default(),
        })
    }

    /// Submit a pair of words for delivery.
    ///
    /// Same discipline as the normal `send`, at pair granularity: straight to
    /// the wire when idle, buffered while the previous pair awaits its ack,
    /// rejected (false) when no pair-slot is free.
    pub fn send_pair(&mut self, first: Word, second: Word) -> bool {
        if self.in_flight == 0 {
            self.outgoing.push_back(Frame::Pair(first, second));
            self.in_flight = 2;
            self.stats.words_sent += 2;
            trace!(first, second, "pair sent directly");
            return true;
        }

        if self.ring.push_pair(first, second) {
            self.stats.words_sent += 2;
            self.stats.buffered_high_water = self.stats.buffered_high_water.max(self.ring.len());
            trace!(first, second, buffered = self.ring.len(), "pair buffered");
            true
        } else {
            self.stats.sends_rejected += 1;
            trace!(first, second, "pair rejected, buffer full");
            false
        }
    }

    /// Handle the receiver's acknowledgement token.
    ///
    /// The I/O layer calls this once per end-of-transfer token it reads.
    /// When the ring holds a pair, it goes to the wire immediately and the
    /// outstanding count stays at 2; otherwise the channel falls idle.
    pub fn handle_ack(&mut self) {
        if self.in_flight == 0 {
            warn!("ack received with no pair outstanding");
        }
        self.stats.acks_received += 1;

        if let Some((first, second)) = self.ring.pop_pair() {
            self.outgoing.push_back(Frame::Pair(first, second));
            self.in_flight = 2;
            trace!(first, second, remaining = self.ring.len(), "pair drained from buffer");
        } else {
            self.in_flight = 0;
        }
    }

    /// Words not yet acknowledged, counting the in-flight pair. Always even.
    pub fn pending_words_to_send(&self) -> u32 {
        self.in_flight + self.ring.len()
    }

    /// Words guaranteed to be accepted by consecutive `send_pair` calls.
    pub fn sending_capacity(&self) -> u32 {
        if self.in_flight == 0 {
            self.ring.size()
        } else {
            self.ring.free_pair_slots()
        }
    }

    /// Take the next queued outgoing frame, in order.
    pub fn pop_frame(&mut self) -> Option<Frame> {
        self.outgoing.pop_front()
    }

    pub fn stats(&self) -> &EndpointStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_room_for_one_pair() {
        assert!(StreamState::new(0).is_err());
        assert!(StreamState::new(2).is_err());
        assert!(StreamState::new(4).is_ok());
    }

    #[test]
    fn pending_count_is_even() {
        let mut state = StreamState::new(8).unwrap();
        state.send_pair(1, 2);
        state.send_pair(3, 4);
        assert_eq!(state.pending_words_to_send(), 4);
        state.handle_ack();
        assert_eq!(state.pending_words_to_send(), 2);
        state.handle_ack();
        assert_eq!(state.pending_words_to_send(), 0);
    }

    #[test]
    fn ack_pushes_next_pair_to_wire() {
        let mut state = StreamState::new(4).unwrap();
        assert!(state.send_pair(1, 2));
        assert_eq!(state.pop_frame(), Some(Frame::Pair(1, 2)));
        assert!(state.send_pair(3, 4));
        assert_eq!(state.pop_frame(), None);

        state.handle_ack();
        assert_eq!(state.pop_frame(), Some(Frame::Pair(3, 4)));
        assert_eq!(state.pending_words_to_send(), 2);
    }
}
