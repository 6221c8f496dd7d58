//! Per-call lifecycle timestamps.

use std::time::{Duration, Instant};

/// When each phase of a call happened.
///
/// The pipeline fills the three instants in order: `created` before any
/// network activity, `sent` once the round trip returns (whatever its
/// outcome), `parsed` only after a successful decode. Instants are
/// monotonic, so `created <= sent <= parsed` whenever they are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lifecycle {
    pub created: Option<Instant>,
    pub sent: Option<Instant>,
    pub parsed: Option<Instant>,
}

impl Lifecycle {
    pub(crate) fn mark_created(&mut self) {
        self.created = Some(Instant::now());
    }

    pub(crate) fn mark_sent(&mut self) {
        self.sent = Some(Instant::now());
    }

    pub(crate) fn mark_parsed(&mut self) {
        self.parsed = Some(Instant::now());
    }

    /// Time from creation to the end of the network round trip.
    pub fn round_trip(&self) -> Option<Duration> {
        Some(self.sent?.duration_since(self.created?))
    }

    /// Time spent reading and decoding the reply.
    pub fn decode_time(&self) -> Option<Duration> {
        Some(self.parsed?.duration_since(self.sent?))
    }

    /// Whether the call completed with a decoded result.
    pub fn is_complete(&self) -> bool {
        self.created.is_some() && self.sent.is_some() && self.parsed.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_by_default() {
        let lc = Lifecycle::default();
        assert!(lc.round_trip().is_none());
        assert!(lc.decode_time().is_none());
        assert!(!lc.is_complete());
    }

    #[test]
    fn marks_are_ordered() {
        let mut lc = Lifecycle::default();
        lc.mark_created();
        lc.mark_sent();
        lc.mark_parsed();

        assert!(lc.is_complete());
        assert!(lc.created <= lc.sent);
        assert!(lc.sent <= lc.parsed);
        assert!(lc.round_trip().is_some());
        assert!(lc.decode_time().is_some());
    }

    #[test]
    fn decode_time_needs_both_marks() {
        let mut lc = Lifecycle::default();
        lc.mark_created();
        lc.mark_sent();
        assert!(lc.round_trip().is_some());
        assert!(lc.decode_time().is_none());
    }
}
