//! Rate limiting for incoming snapshots: plain timestamp comparison on
//! arrival, no background timer.

/// Minimum wall-clock gap between two accepted updates, in milliseconds.
pub const UPDATE_INTERVAL_MS: u64 = 500;

/// Decides whether an incoming snapshot is promoted to the current value
/// and history, or dropped. Rejected updates are dropped outright, not
/// queued or coalesced, so history granularity is capped at the interval
/// regardless of the upstream rate.
#[derive(Debug)]
pub struct UpdateThrottle {
    interval_ms: u64,
    last_accepted_at_ms: Option<u64>,
}

impl UpdateThrottle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_accepted_at_ms: None,
        }
    }

    /// True iff at least the interval has elapsed since the last accepted
    /// update; the first call always accepts. Stamps on acceptance.
    pub fn accept(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_accepted_at_ms {
            if now_ms.saturating_sub(last) < self.interval_ms {
                return false;
            }
        }
        self.last_accepted_at_ms = Some(now_ms);
        true
    }
}

impl Default for UpdateThrottle {
    fn default() -> Self {
        Self::new(UPDATE_INTERVAL_MS)
    }
}
