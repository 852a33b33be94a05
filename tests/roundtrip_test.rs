//! End-to-end tests for the symmetric async player over an in-memory link

use std::sync::Arc;

use nbsp_tokio::{Event, MemoryLink, NbspConfig, Player};

fn player_pair(a_words: u32, b_words: u32) -> (Player, Player) {
    let (left, right) = MemoryLink::pair();
    let a = Player::new(Arc::new(left), NbspConfig::new().buffer_words(a_words)).unwrap();
    let b = Player::new(Arc::new(right), NbspConfig::new().buffer_words(b_words)).unwrap();
    (a, b)
}

#[tokio::test]
async fn round_trip() {
    let (mut a, mut b) = player_pair(2, 2);

    assert!(a.send(0xDEADBEEF).await.unwrap());
    assert_eq!(a.pending_words_to_send(), 1);

    // B parses the data, stores it, and acks before recv returns
    assert_eq!(b.recv().await.unwrap(), Event::Data(0xDEADBEEF));
    assert_eq!(b.received_data(), 0xDEADBEEF);

    assert_eq!(a.recv().await.unwrap(), Event::AckHandled);
    assert_eq!(a.pending_words_to_send(), 0);
    assert_eq!(b.pending_words_to_send(), 0);
}

#[tokio::test]
async fn bidirectional_interleave() {
    let (mut a, mut b) = player_pair(2, 2);

    assert!(a.send(0xA1).await.unwrap());
    assert!(b.send(0xB1).await.unwrap());

    assert_eq!(a.recv().await.unwrap(), Event::Data(0xB1));
    assert_eq!(b.recv().await.unwrap(), Event::Data(0xA1));
    assert_eq!(a.recv().await.unwrap(), Event::AckHandled);
    assert_eq!(b.recv().await.unwrap(), Event::AckHandled);

    assert_eq!(a.pending_words_to_send(), 0);
    assert_eq!(b.pending_words_to_send(), 0);
    assert_eq!(a.received_data(), 0xB1);
    assert_eq!(b.received_data(), 0xA1);
}

#[tokio::test]
async fn buffered_burst_reaches_peer_in_order() {
    let (left, right) = MemoryLink::pair();
    let mut a = Player::new(Arc::new(left), NbspConfig::new().buffer_words(4)).unwrap();
    let mut b = Player::new(Arc::new(right), NbspConfig::receive_only()).unwrap();

    let peer = tokio::spawn(async move {
        let mut words = Vec::new();
        while words.len() < 5 {
            if let Event::Data(word) = b.recv().await.unwrap() {
                words.push(word);
            }
        }
        words
    });

    for word in 1..=4 {
        assert!(a.send(word).await.unwrap());
    }
    // one on the wire plus three buffered: the burst is over capacity
    assert!(!a.send(5).await.unwrap());

    // the first ack frees a slot
    assert_eq!(a.recv().await.unwrap(), Event::AckHandled);
    assert!(a.send(5).await.unwrap());

    a.flush().await.unwrap();
    assert_eq!(a.pending_words_to_send(), 0);

    assert_eq!(peer.await.unwrap(), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn try_recv_is_a_select_default() {
    let (mut a, mut b) = player_pair(2, 2);

    // quiet channel: nothing to handle, no suspension
    assert_eq!(b.try_recv().await.unwrap(), None);

    a.send(7).await.unwrap();
    assert_eq!(b.try_recv().await.unwrap(), Some(Event::Data(7)));
    assert_eq!(a.try_recv().await.unwrap(), Some(Event::AckHandled));
    assert_eq!(a.try_recv().await.unwrap(), None);
}

#[tokio::test]
async fn flush_is_idempotent() {
    let (mut a, mut b) = player_pair(2, 2);

    // nothing pending: an immediate no-op
    a.flush().await.unwrap();

    a.send(1).await.unwrap();
    let peer = tokio::spawn(async move {
        b.recv().await.unwrap();
        b
    });

    a.flush().await.unwrap();
    a.flush().await.unwrap();
    assert_eq!(a.pending_words_to_send(), 0);

    drop(peer.await.unwrap());
}

#[tokio::test]
async fn closed_link_surfaces_on_send() {
    let (left, right) = MemoryLink::pair();
    let mut a = Player::new(Arc::new(left), NbspConfig::default()).unwrap();
    let b = Player::new(Arc::new(right), NbspConfig::receive_only()).unwrap();
    drop(b);

    let err = a.send(1).await.unwrap_err();
    assert!(err.is_closed());
}
