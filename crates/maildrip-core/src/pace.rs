//! Pacing between successful sends.

use rand::Rng;
use std::time::Duration;

/// Supplies the delay inserted after each successful send.
///
/// Injected into [`crate::Campaign`] so tests can run with a deterministic
/// or zero-length interval.
pub trait Pacer {
    /// Draws a fresh interval. Called once per successful send, never after
    /// a skip, an invalid address, or a failed attempt.
    fn interval(&mut self) -> Duration;
}

/// Production pacer: uniform delay in a closed range of whole seconds.
///
/// The default range of [20, 59] seconds keeps send rates below typical
/// provider abuse thresholds.
#[derive(Debug, Clone, Copy)]
pub struct ThrottlePacer {
    min_secs: u64,
    max_secs: u64,
}

impl ThrottlePacer {
    /// Creates a pacer drawing uniformly from `[min_secs, max_secs]`.
    #[must_use]
    pub const fn new(min_secs: u64, max_secs: u64) -> Self {
        Self { min_secs, max_secs }
    }
}

impl Default for ThrottlePacer {
    fn default() -> Self {
        Self::new(20, 59)
    }
}

impl Pacer for ThrottlePacer {
    fn interval(&mut self) -> Duration {
        let secs = rand::thread_rng().gen_range(self.min_secs..=self.max_secs);
        Duration::from_secs(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_within_closed_range() {
        let mut pacer = ThrottlePacer::default();
        for _ in 0..200 {
            let secs = pacer.interval().as_secs();
            assert!((20..=59).contains(&secs), "interval {secs}s out of range");
        }
    }

    #[test]
    fn degenerate_range_is_fixed() {
        let mut pacer = ThrottlePacer::new(5, 5);
        assert_eq!(pacer.interval(), Duration::from_secs(5));
    }
}
