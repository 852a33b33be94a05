//! Process-wide counters for NBSP channels

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Global metrics collector, shared by every player in the process.
#[derive(Debug, Default)]
pub struct GlobalMetrics {
    /// Total players created
    pub players_created: AtomicU64,
    /// Players currently alive
    pub active_players: AtomicUsize,
    /// Words accepted for sending across all players
    pub total_words_sent: AtomicU64,
    /// Data words received across all players
    pub total_words_received: AtomicU64,
    /// Send attempts rejected because a buffer was full
    pub total_sends_rejected: AtomicU64,
}

impl GlobalMetrics {
    /// Record a new player
    pub fn player_created(&self) {
        self.players_created.fetch_add(1, Ordering::Relaxed);
        self.active_players.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a player going away
    pub fn player_closed(&self) {
        self.active_players.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn record_word_sent(&self) {
        self.total_words_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_word_received(&self) {
        self.total_words_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_send_rejected(&self) {
        self.total_sends_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            players_created: self.players_created.load(Ordering::Relaxed),
            active_players: self.active_players.load(Ordering::Relaxed),
            total_words_sent: self.total_words_sent.load(Ordering::Relaxed),
            total_words_received: self.total_words_received.load(Ordering::Relaxed),
            total_sends_rejected: self.total_sends_rejected.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub players_created: u64,
    pub active_players: usize,
    pub total_words_sent: u64,
    pub total_words_received: u64,
    pub total_sends_rejected: u64,
}

impl MetricsSnapshot {
    /// Fraction of send attempts that bounced off a full buffer
    pub fn rejection_rate(&self) -> f64 {
        let attempts = self.total_words_sent + self.total_sends_rejected;
        if attempts == 0 {
            0.0
        } else {
            self.total_sends_rejected as f64 / attempts as f64
        }
    }
}

lazy_static::lazy_static! {
    /// Global metrics instance
    pub static ref GLOBAL_METRICS: GlobalMetrics = GlobalMetrics::default();
}

/// Get global metrics
pub fn global_metrics() -> &'static GlobalMetrics {
    &GLOBAL_METRICS
}

/// Format metrics for human-readable display
pub fn format_metrics(snapshot: &MetricsSnapshot) -> String {
    format!(
        "NBSP Metrics:\n\
         Players: {} created, {} active\n\
         Words: {} sent, {} received\n\
         Rejected sends: {} (rate: {:.2}%)",
        snapshot.players_created,
        snapshot.active_players,
        snapshot.total_words_sent,
        snapshot.total_words_received,
        snapshot.total_sends_rejected,
        snapshot.rejection_rate() * 100.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_lifecycle() {
        let metrics = GlobalMetrics::default();

        metrics.player_created();
        assert_eq!(metrics.active_players.load(Ordering::Relaxed), 1);

        metrics.player_closed();
        assert_eq!(metrics.active_players.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_rejection_rate() {
        let metrics = GlobalMetrics::default();
        for _ in 0..3 {
            metrics.record_word_sent();
        }
        metrics.record_send_rejected();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_words_sent, 3);
        assert!((snapshot.rejection_rate() - 0.25).abs() < f64::EPSILON);
    }
}
