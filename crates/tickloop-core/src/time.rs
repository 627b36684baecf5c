//! Default [`TimeSource`] backed by [`std::time::Instant`].

use std::time::Instant;

use crate::traits::TimeSource;

/// High-resolution monotonic clock measuring seconds since its origin.
///
/// [`reset`](TimeSource::reset) moves the origin to the current instant.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    fn seconds(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    fn reset(&mut self) {
        self.origin = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn readings_never_decrease() {
        let clock = MonotonicClock::new();
        let a = clock.seconds();
        std::thread::sleep(Duration::from_millis(2));
        let b = clock.seconds();
        assert!(b > a);
    }

    #[test]
    fn reset_rewinds_to_zero() {
        let mut clock = MonotonicClock::new();
        std::thread::sleep(Duration::from_millis(20));
        assert!(clock.seconds() >= 0.02);
        clock.reset();
        assert!(clock.seconds() < 0.02);
    }
}
