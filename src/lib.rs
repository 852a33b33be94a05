//! # NBSP Tokio - Async Non-Blocking Small-Package Protocol
//!
//! An async implementation of NBSP, a bidirectional small-package protocol
//! that moves 32-bit words between two symmetric endpoints with automatic
//! acknowledgement, per-endpoint send buffering, and flow control. At most
//! one data word is in flight per direction, so many channels can share a
//! fabric without congesting it.
//!
//! ## Features
//!
//! - **Never blocks on send**: an idle channel takes the word immediately,
//!   a busy one buffers it, a full buffer reports rejection
//! - **Symmetric**: both ends are players; sender and receiver are roles
//!   taken per operation, not per connection
//! - **Streaming variant**: fixed-role, token-free double-word mode for
//!   4-8x the throughput of the symmetric protocol
//! - **Pluggable links**: any reliable in-order frame transport, with an
//!   in-process channel built in
//! - **Observability**: integrated tracing and global metrics
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nbsp_tokio::{Event, MemoryLink, NbspConfig, Player};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (left, right) = MemoryLink::pair();
//!     let mut a = Player::new(Arc::new(left), NbspConfig::new().buffer_words(4))?;
//!     let mut b = Player::new(Arc::new(right), NbspConfig::receive_only())?;
//!
//!     a.send(0xDEADBEEF).await?;
//!     if let Event::Data(word) = b.recv().await? {
//!         println!("received {word:#x}");
//!     }
//!     a.flush().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! This implementation features a layered architecture:
//!
//! ```text
//! ┌──────────────────────┐
//! │   High-Level API     │  Player, StreamSender, StreamReceiver
//! ├──────────────────────┤
//! │   Protocol Core      │  nbsp-core engine (sync, sans-I/O)
//! ├──────────────────────┤
//! │   Link Layer         │  Link trait, MemoryLink
//! └──────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod link;
pub mod metrics;
pub mod player;
pub mod stream;

// Re-exports
pub use config::NbspConfig;
pub use error::{NbspError, Result};
pub use link::{Link, MemoryLink};
pub use player::{Event, Player};
pub use stream::{StreamReceiver, StreamSender};

// Core protocol types
pub use nbsp_core::{Endpoint, EndpointStats, StreamState, Word};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PROTOCOL_VERSION: u32 = 1;
