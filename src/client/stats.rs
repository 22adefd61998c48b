//! Client-level statistics

/// Counters for one client's lifetime, across reconnects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientStats {
    /// Push events received, decodable or not
    pub events_received: u64,
    /// Push events dropped because their payload failed to decode
    pub decode_failures: u64,
    /// Push events dropped for a channel or room not currently joined
    pub unjoined_dropped: u64,
    /// Chat messages appended to history
    pub messages_appended: u64,
    /// Chat messages dropped as duplicates (self-echo or redelivery)
    pub duplicates_dropped: u64,
    /// Tally updates applied
    pub tallies_applied: u64,
    /// Tally updates dropped as stale, unknown, or finalized
    pub tallies_dropped: u64,
    /// Requests emitted
    pub requests_sent: u64,
    /// Acknowledgements received
    pub acks_received: u64,
    /// Requests that hit the acknowledgement bound
    pub ack_timeouts: u64,
}

impl ClientStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push events that were dropped for any reason
    pub fn total_dropped(&self) -> u64 {
        self.decode_failures + self.unjoined_dropped + self.duplicates_dropped
            + self.tallies_dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_start_at_zero() {
        let stats = ClientStats::new();
        assert_eq!(stats.events_received, 0);
        assert_eq!(stats.total_dropped(), 0);
    }

    #[test]
    fn test_total_dropped_sums() {
        let stats = ClientStats {
            decode_failures: 1,
            unjoined_dropped: 2,
            duplicates_dropped: 3,
            tallies_dropped: 4,
            ..Default::default()
        };
        assert_eq!(stats.total_dropped(), 10);
    }
}
