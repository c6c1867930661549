//! Statistics for a client connection

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Live counters for one connection
///
/// Updated from both the reader task and the application side, so every
/// field is atomic. Use [`ClientStats::snapshot`] to read a consistent-enough
/// copy.
#[derive(Debug)]
pub struct ClientStats {
    started_at: Instant,
    bytes_received: AtomicU64,
    bytes_sent: AtomicU64,
    messages_received: AtomicU64,
    messages_sent: AtomicU64,
    messages_dropped: AtomicU64,
    malformed_frames: AtomicU64,
    server_errors: AtomicU64,
    pings_received: AtomicU64,
    pongs_received: AtomicU64,
}

/// Point-in-time copy of [`ClientStats`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Total bytes read from the transport
    pub bytes_received: u64,
    /// Total bytes written to the transport
    pub bytes_sent: u64,
    /// Messages delivered to a subscription callback
    pub messages_received: u64,
    /// Messages published
    pub messages_sent: u64,
    /// Messages for unknown or removed subscriptions
    pub messages_dropped: u64,
    /// Control lines that matched no known production
    pub malformed_frames: u64,
    /// `-ERR` frames received
    pub server_errors: u64,
    /// `PING` frames received
    pub pings_received: u64,
    /// `PONG` frames received
    pub pongs_received: u64,
    /// Time since the stats were created
    pub uptime: Duration,
}

impl ClientStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            bytes_received: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            messages_received: AtomicU64::new(0),
            messages_sent: AtomicU64::new(0),
            messages_dropped: AtomicU64::new(0),
            malformed_frames: AtomicU64::new(0),
            server_errors: AtomicU64::new(0),
            pings_received: AtomicU64::new(0),
            pongs_received: AtomicU64::new(0),
        }
    }

    pub fn add_bytes_received(&self, n: usize) {
        self.bytes_received.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn add_bytes_sent(&self, n: usize) {
        self.bytes_sent.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn inc_messages_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_messages_sent(&self) {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_messages_dropped(&self) {
        self.messages_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_malformed_frames(&self) {
        self.malformed_frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_server_errors(&self) {
        self.server_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_pings_received(&self) {
        self.pings_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_pongs_received(&self) {
        self.pongs_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the current counter values
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
            malformed_frames: self.malformed_frames.load(Ordering::Relaxed),
            server_errors: self.server_errors.load(Ordering::Relaxed),
            pings_received: self.pings_received.load(Ordering::Relaxed),
            pongs_received: self.pongs_received.load(Ordering::Relaxed),
            uptime: self.started_at.elapsed(),
        }
    }
}

impl Default for ClientStats {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsSnapshot {
    /// Average inbound throughput in bits per second
    pub fn inbound_bitrate(&self) -> u64 {
        let secs = self.uptime.as_secs();
        if secs > 0 {
            (self.bytes_received * 8) / secs
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = ClientStats::new();
        stats.add_bytes_received(100);
        stats.add_bytes_sent(40);
        stats.inc_messages_received();
        stats.inc_messages_received();
        stats.inc_messages_dropped();
        stats.inc_server_errors();

        let snap = stats.snapshot();
        assert_eq!(snap.bytes_received, 100);
        assert_eq!(snap.bytes_sent, 40);
        assert_eq!(snap.messages_received, 2);
        assert_eq!(snap.messages_dropped, 1);
        assert_eq!(snap.server_errors, 1);
        assert_eq!(snap.malformed_frames, 0);
    }

    #[test]
    fn test_bitrate() {
        let snap = StatsSnapshot {
            bytes_received: 1000,
            uptime: Duration::from_secs(2),
            ..Default::default()
        };
        assert_eq!(snap.inbound_bitrate(), 4000);

        let zero = StatsSnapshot::default();
        assert_eq!(zero.inbound_bitrate(), 0);
    }
}
