//! Normal-variant NBSP endpoint state machine.
//!
//! An [`Endpoint`] is symmetric: it becomes a sender or a receiver per
//! operation, never by construction. The send side keeps at most one data
//! word outstanding on the wire; further words go into the ring until the
//! peer's acknowledgement drains them one per ack. The receive side is
//! memoryless — every incoming data word immediately queues an ack and
//! overwrites the stored datum.
//!
//! The engine performs no I/O. Incoming messages are fed to
//! [`Endpoint::handle`] after the I/O layer decoded them; outgoing frames
//! accumulate in an internal queue and are shipped via
//! [`Endpoint::pop_frame`] / [`Endpoint::drain_output`].

use std::collections::VecDeque;

use tracing::{trace, warn};

use crate::error::NbspCoreResult;
use crate::ring::WordRing;
use crate::wire::{Frame, Message, Word};

/// Cumulative per-endpoint counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct EndpointStats {
    /// Words accepted by `send` (wire or ring)
    pub words_sent: u64,
    /// Words rejected by `send` because the ring was full
    pub sends_rejected: u64,
    /// Data words received from the peer
    pub words_received: u64,
    /// Acknowledgements sent to the peer
    pub acks_sent: u64,
    /// Acknowledgements received from the peer
    pub acks_received: u64,
    /// Highest ring occupancy observed, in words
    pub buffered_high_water: u32,
}

/// Protocol state for one end of an NBSP channel.
#[derive(Debug)]
pub struct Endpoint {
    /// Last data word received; overwritten by each data message.
    last_data: Word,
    /// Words on the wire awaiting the peer's ack. Always 0 or 1.
    in_flight: u32,
    ring: WordRing,
    outgoing: VecDeque<Frame>,
    stats: EndpointStats,
}

impl Endpoint {
    /// Create an endpoint with the given send-buffer size in words.
    ///
    /// A size of 0 declares a receive-only endpoint; otherwise the size must
    /// be a power of two ≥ 2 and one slot of it stays reserved, so up to
    /// `buffer_words - 1` words can be buffered behind the outstanding one.
    pub fn new(buffer_words: u32) -> NbspCoreResult<Self> {
        Ok(Self {
            last_data: 0,
            in_flight: 0,
            ring: WordRing::new(buffer_words)?,
            outgoing: VecDeque::new(),
            stats: EndpointStats::default(),
        })
    }

    /// Submit one word for delivery to the peer.
    ///
    /// When the channel is idle the word goes straight to the wire; while an
    /// ack is outstanding it is buffered instead. Returns false — and drops
    /// the word — when the ring is full; the caller may retry after the next
    /// ack has been handled.
    pub fn send(&mut self, word: Word) -> bool {
        if self.in_flight == 0 {
            self.outgoing.push_back(Frame::Data(word));
            self.in_flight = 1;
            self.stats.words_sent += 1;
            trace!(word, "sent directly");
            return true;
        }

        if self.ring.push(word) {
            self.stats.words_sent += 1;
            self.stats.buffered_high_water = self.stats.buffered_high_water.max(self.ring.len());
            trace!(word, buffered = self.ring.len(), "buffered");
            true
        } else {
            self.stats.sends_rejected += 1;
            trace!(word, "rejected, buffer full");
            false
        }
    }

    /// Dispatch one decoded incoming message.
    ///
    /// Returns true when the message carried data (now readable through
    /// [`Endpoint::received_data`]; an ack has been queued for the peer).
    /// Returns false for an acknowledgement, after releasing the outstanding
    /// slot and queueing the next buffered word, if any.
    pub fn handle(&mut self, msg: Message) -> bool {
        match msg {
            Message::Ack => {
                if self.in_flight == 0 {
                    // peer error; release builds carry on with the count at 0
                    warn!("ack received with no word outstanding");
                } else {
                    self.in_flight -= 1;
                }
                self.stats.acks_received += 1;

                if let Some(word) = self.ring.pop() {
                    self.outgoing.push_back(Frame::Data(word));
                    self.in_flight = 1;
                    trace!(word, remaining = self.ring.len(), "drained from buffer");
                }
                false
            }
            Message::Data(word) => {
                self.last_data = word;
                self.outgoing.push_back(Frame::Ack);
                self.stats.words_received += 1;
                self.stats.acks_sent += 1;
                trace!(word, "data received, ack queued");
                true
            }
        }
    }

    /// The last word received. Meaningful only after [`Endpoint::handle`]
    /// returned true.
    pub fn received_data(&self) -> Word {
        self.last_data
    }

    /// Words not yet acknowledged by the peer, counting the in-flight one.
    pub fn pending_words_to_send(&self) -> u32 {
        self.in_flight + self.ring.len()
    }

    /// Number of words guaranteed to be accepted by consecutive `send`s.
    ///
    /// Idle endpoints fit one word on the wire plus a full ring; while an
    /// ack is outstanding only the free ring slots count.
    pub fn sending_capacity(&self) -> u32 {
        if self.in_flight == 0 {
            if self.ring.size() == 0 {
                1
            } else {
                self.ring.size()
            }
        } else {
            self.ring.free_slots()
        }
    }

    /// Take the next queued outgoing frame, in order.
    pub fn pop_frame(&mut self) -> Option<Frame> {
        self.outgoing.pop_front()
    }

    /// Drain all queued outgoing frames, in order.
    pub fn drain_output(&mut self) -> impl Iterator<Item = Frame> + '_ {
        self.outgoing.drain(..)
    }

    pub fn stats(&self) -> &EndpointStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_send_goes_to_wire() {
        let mut ep = Endpoint::new(4).unwrap();
        assert!(ep.send(42));
        assert_eq!(ep.pop_frame(), Some(Frame::Data(42)));
        assert_eq!(ep.pop_frame(), None);
        assert_eq!(ep.pending_words_to_send(), 1);
    }

    #[test]
    fn busy_send_is_buffered_without_frame() {
        let mut ep = Endpoint::new(4).unwrap();
        ep.send(1);
        ep.drain_output().count();

        assert!(ep.send(2));
        assert_eq!(ep.pop_frame(), None);
        assert_eq!(ep.pending_words_to_send(), 2);
    }

    #[test]
    fn ack_with_nothing_outstanding_is_survivable() {
        let mut ep = Endpoint::new(4).unwrap();
        assert!(!ep.handle(Message::Ack));
        assert_eq!(ep.pending_words_to_send(), 0);
        assert_eq!(ep.sending_capacity(), 4);
    }

    #[test]
    fn data_overwrites_previous_datum() {
        let mut ep = Endpoint::new(0).unwrap();
        assert!(ep.handle(Message::Data(7)));
        assert!(ep.handle(Message::Data(8)));
        assert_eq!(ep.received_data(), 8);
        // one ack per data message
        assert_eq!(ep.drain_output().filter(|f| *f == Frame::Ack).count(), 2);
    }
}
