//! Nonce generation for private requests
//!
//! Kraken rejects a private request whose nonce is not greater than the
//! last one it saw for the same API key.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Strictly increasing nonce source seeded from the wall clock
///
/// Each call returns `max(last + 1, now_ms)`, so two requests inside the same
/// millisecond, or after the clock steps backwards, still get distinct and
/// increasing values.
#[derive(Debug, Default)]
pub struct NonceSource {
    last: AtomicU64,
}

impl NonceSource {
    /// Create a nonce source with no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a nonce source whose next value is greater than `floor`
    pub fn starting_at(floor: u64) -> Self {
        Self {
            last: AtomicU64::new(floor),
        }
    }

    /// Get the next nonce
    pub fn next(&self) -> u64 {
        let now = Self::now_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        now.max(previous.saturating_add(1))
    }

    /// The most recently issued nonce (0 if none)
    pub fn last(&self) -> u64 {
        self.last.load(Ordering::SeqCst)
    }

    fn now_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_strictly_increasing() {
        let source = NonceSource::new();
        let mut previous = source.next();
        for _ in 0..1000 {
            let nonce = source.next();
            assert!(nonce > previous);
            previous = nonce;
        }
        assert_eq!(source.last(), previous);
    }

    #[test]
    fn test_nonce_tracks_clock() {
        let source = NonceSource::new();
        let before = NonceSource::now_millis();
        let nonce = source.next();
        assert!(nonce >= before);
    }

    #[test]
    fn test_nonce_respects_floor() {
        let floor = NonceSource::now_millis() + 1_000_000;
        let source = NonceSource::starting_at(floor);
        assert_eq!(source.next(), floor + 1);
        assert_eq!(source.next(), floor + 2);
    }

    #[test]
    fn test_independent_sources() {
        let a = NonceSource::starting_at(10);
        let b = NonceSource::starting_at(10);
        a.next();
        a.next();
        assert!(b.next() > 10);
        assert!(a.last() > 10);
    }
}
