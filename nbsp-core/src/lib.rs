//! Pure synchronous NBSP protocol engine.
//!
//! NBSP is a non-blocking bidirectional small-package protocol: it moves
//! single 32-bit words between two symmetric endpoints over a reliable
//! in-order frame channel, with automatic acknowledgement and per-endpoint
//! send buffering. At most one data word is outstanding per direction, which
//! is the flow-control discipline that keeps many channels from congesting a
//! shared fabric.
//!
//! This crate implements the protocol state machine with zero runtime
//! dependencies — no tokio, no async, no I/O. It only depends on `bytes`
//! and `tracing`.
//!
//! ```text
//! ┌────────────────────────────┐
//! │  nbsp-core                 │
//! │                            │
//! │  wire      ← frame codec   │
//! │  ring      ← send buffer   │
//! │  endpoint  ← state machine │
//! │  stream    ← pair variant  │
//! │  error     ← 2 variants    │
//! └────────────────────────────┘
//! ```
//!
//! I/O layers drive an [`Endpoint`] by feeding decoded incoming messages to
//! [`Endpoint::handle`] and shipping the frames it queues via
//! [`Endpoint::pop_frame`]. See the `nbsp-tokio` crate for an async layer.

pub mod endpoint;
pub mod error;
pub mod ring;
pub mod stream;
pub mod wire;

pub use endpoint::{Endpoint, EndpointStats};
pub use error::{NbspCoreError, NbspCoreResult};
pub use ring::WordRing;
pub use stream::StreamState;
pub use wire::{decode_message, decode_pair, Frame, Message, Word};
