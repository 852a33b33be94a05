//! Bounded-drain behavior under controlled (paused) time

use std::sync::Arc;
use std::time::Duration;

use nbsp_tokio::{MemoryLink, NbspConfig, Player};
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn drain_returns_at_deadline_with_work_left() {
    let (left, right) = MemoryLink::pair();
    let mut a = Player::new(Arc::new(left), NbspConfig::new().buffer_words(4)).unwrap();
    let mut b = Player::new(Arc::new(right), NbspConfig::receive_only()).unwrap();

    for word in 1..=3 {
        assert!(a.send(word).await.unwrap());
    }
    assert_eq!(a.pending_words_to_send(), 3);

    // the peer services the channel every 30ms, so acks land at roughly
    // t=30, t=60, t=90
    let peer = tokio::spawn(async move {
        for _ in 0..3 {
            sleep(Duration::from_millis(30)).await;
            b.recv().await.unwrap();
        }
    });

    // two acks fit before the deadline, the third does not
    let remaining = a.drain_for(Duration::from_millis(70)).await.unwrap();
    assert_eq!(remaining, 1);

    // an unbounded flush picks up the rest
    a.flush().await.unwrap();
    assert_eq!(a.pending_words_to_send(), 0);

    peer.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn drain_with_nothing_pending_returns_immediately() {
    let (left, _right) = MemoryLink::pair();
    let mut a = Player::new(Arc::new(left), NbspConfig::default()).unwrap();

    let remaining = a.drain_for(Duration::from_secs(3600)).await.unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test(start_paused = true)]
async fn drain_finishes_early_when_acks_arrive_in_time() {
    let (left, right) = MemoryLink::pair();
    let mut a = Player::new(Arc::new(left), NbspConfig::new().buffer_words(4)).unwrap();
    let mut b = Player::new(Arc::new(right), NbspConfig::receive_only()).unwrap();

    for word in 1..=2 {
        assert!(a.send(word).await.unwrap());
    }

    let peer = tokio::spawn(async move {
        for _ in 0..2 {
            sleep(Duration::from_millis(5)).await;
            b.recv().await.unwrap();
        }
    });

    let remaining = a.drain_for(Duration::from_secs(10)).await.unwrap();
    assert_eq!(remaining, 0);

    peer.await.unwrap();
}
