//! Abstract link layer for NBSP
//!
//! The [`Link`] trait models the channel the protocol runs over: a reliable,
//! lossless, in-order frame transport between exactly two peers. The
//! built-in [`MemoryLink`] connects two cooperative tasks in one process
//! through unbounded queues; custom implementations can carry frames over
//! any transport that preserves order and never drops.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::sync::Mutex;

use crate::error::{NbspError, Result};

/// Boxed future returned by [`Link::send_frame`].
pub type SendFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Boxed future returned by [`Link::recv_frame`].
pub type RecvFuture<'a> = Pin<Box<dyn Future<Output = Result<Bytes>> + Send + 'a>>;

/// Bidirectional frame channel between two NBSP players.
///
/// Implementors must deliver frames reliably and in submission order, per
/// direction. The trait is object-safe so it can be used as `Arc<dyn Link>`.
pub trait Link: Send + Sync + 'static {
    /// Ship one encoded frame to the peer.
    fn send_frame<'a>(&'a self, frame: Bytes) -> SendFuture<'a>;

    /// Wait for the next frame from the peer.
    fn recv_frame<'a>(&'a self) -> RecvFuture<'a>;

    /// Return the next frame if one is already queued, without suspending.
    /// This is the default arm of a cooperative select loop.
    fn try_recv_frame(&self) -> Result<Option<Bytes>>;
}

// ---------------------------------------------------------------------------
// MemoryLink — in-process implementation backed by tokio mpsc queues
// ---------------------------------------------------------------------------

/// In-process [`Link`] connecting two tasks through unbounded mpsc queues.
///
/// The queues provide the transport-level push-pull buffering the protocol
/// assumes: outbound frames never block, and the single-outstanding-word
/// discipline keeps the queues from growing past a handful of frames.
pub struct MemoryLink {
    tx: mpsc::UnboundedSender<Bytes>,
    rx: Mutex<mpsc::UnboundedReceiver<Bytes>>,
}

impl MemoryLink {
    /// Create both ends of a bidirectional in-memory channel.
    pub fn pair() -> (MemoryLink, MemoryLink) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();

        (
            MemoryLink {
                tx: a_tx,
                rx: Mutex::new(a_rx),
            },
            MemoryLink {
                tx: b_tx,
                rx: Mutex::new(b_rx),
            },
        )
    }
}

impl Link for MemoryLink {
    fn send_frame<'a>(&'a self, frame: Bytes) -> SendFuture<'a> {
        Box::pin(async move {
            self.tx.send(frame).map_err(|_| NbspError::LinkClosed)
        })
    }

    fn recv_frame<'a>(&'a self) -> RecvFuture<'a> {
        Box::pin(async move {
            self.rx
                .lock()
                .await
                .recv()
                .await
                .ok_or(NbspError::LinkClosed)
        })
    }

    fn try_recv_frame(&self) -> Result<Option<Bytes>> {
        // a player drives its link from a single task, so the lock is free
        let mut rx = match self.rx.try_lock() {
            Ok(rx) => rx,
            Err(_) => return Ok(None),
        };
        match rx.try_recv() {
            Ok(frame) => Ok(Some(frame)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(NbspError::LinkClosed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frames_cross_in_order() {
        let (a, b) = MemoryLink::pair();

        a.send_frame(Bytes::from_static(b"one")).await.unwrap();
        a.send_frame(Bytes::from_static(b"two")).await.unwrap();

        assert_eq!(b.recv_frame().await.unwrap(), Bytes::from_static(b"one"));
        assert_eq!(b.recv_frame().await.unwrap(), Bytes::from_static(b"two"));
    }

    #[tokio::test]
    async fn try_recv_does_not_suspend() {
        let (a, b) = MemoryLink::pair();

        assert!(b.try_recv_frame().unwrap().is_none());
        a.send_frame(Bytes::from_static(b"x")).await.unwrap();
        assert_eq!(
            b.try_recv_frame().unwrap(),
            Some(Bytes::from_static(b"x"))
        );
    }

    #[tokio::test]
    async fn dropped_peer_surfaces_as_closed() {
        let (a, b) = MemoryLink::pair();
        drop(b);

        let err = a.send_frame(Bytes::from_static(b"x")).await.unwrap_err();
        assert!(err.is_closed());
    }
}
