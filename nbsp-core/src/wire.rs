//! NBSP wire protocol: tokens, frames, and the frame codec.
//!
//! The channel is a reliable in-order frame transport. Three frame shapes
//! exist:
//!
//! | frame | wire form |
//! |-------|-----------|
//! | data  | `CT_DATA` byte, then one `u32` payload word (LE) |
//! | ack   | a single control token byte (the end-of-transfer token) |
//! | pair  | two raw `u32` words (LE), no token — streaming variant only |
//!
//! On the normal variant every token other than [`tokens::CT_DATA`] parses
//! as an acknowledgement; the library itself always acknowledges with
//! [`tokens::CT_END`]. Pair frames carry no token at all, which is why the
//! streaming variant cannot share a channel with the normal one.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{NbspCoreError, NbspCoreResult};

/// Payload word moved by the protocol.
pub type Word = u32;

/// Control tokens used on the wire.
pub mod tokens {
    /// Marks a data message. Smallest token value not reserved by the
    /// transport's application range.
    pub const CT_DATA: u8 = 0x5;
    /// The transport's end-of-transfer token, reused as acknowledgement.
    pub const CT_END: u8 = 0x1;
}

/// Longest encoded frame (a pair of words).
pub const MAX_FRAME_SIZE: usize = 8;

/// A message parsed from the normal variant of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// A payload word from the peer. Must be acknowledged.
    Data(Word),
    /// The peer acknowledged our outstanding word.
    Ack,
}

/// An outgoing frame queued by an endpoint for the I/O layer to ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Data(Word),
    Ack,
    /// Token-free double word, streaming variant only.
    Pair(Word, Word),
}

impl Frame {
    /// Encode this frame into a freshly allocated buffer.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(MAX_FRAME_SIZE);
        match *self {
            Frame::Data(word) => {
                buf.put_u8(tokens::CT_DATA);
                buf.put_u32_le(word);
            }
            Frame::Ack => {
                buf.put_u8(tokens::CT_END);
            }
            Frame::Pair(first, second) => {
                buf.put_u32_le(first);
                buf.put_u32_le(second);
            }
        }
        buf.freeze()
    }
}

/// Decode a normal-variant frame: a data message or an acknowledgement.
pub fn decode_message(mut frame: Bytes) -> NbspCoreResult<Message> {
    if frame.is_empty() {
        return Err(NbspCoreError::protocol("empty frame"));
    }

    let token = frame.get_u8();
    if token == tokens::CT_DATA {
        if frame.len() != 4 {
            return Err(NbspCoreError::protocol(format!(
                "data frame with {} payload bytes, expected 4",
                frame.len()
            )));
        }
        Ok(Message::Data(frame.get_u32_le()))
    } else if frame.is_empty() {
        // any non-data token acknowledges the outstanding word
        Ok(Message::Ack)
    } else {
        Err(NbspCoreError::protocol(format!(
            "unexpected payload after control token {token:#04x}"
        )))
    }
}

/// Decode a streaming-variant frame: exactly two raw words.
pub fn decode_pair(mut frame: Bytes) -> NbspCoreResult<(Word, Word)> {
    if frame.len() != 8 {
        return Err(NbspCoreError::protocol(format!(
            "pair frame of {} bytes, expected 8",
            frame.len()
        )));
    }
    Ok((frame.get_u32_le(), frame.get_u32_le()))
}
