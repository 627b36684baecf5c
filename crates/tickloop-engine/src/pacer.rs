//! Loop pacing between iterations of [`Sim::run`](crate::Sim::run).
//!
//! The scheduler itself never sleeps; how often the loop body runs is up
//! to the embedding application. A [`Pacer`] is invoked after every
//! iteration and may block, but must return promptly once the stop signal
//! fires so shutdown is never delayed by a long pause.

use std::time::{Duration, Instant};

use tickloop_core::StopSignal;

/// Waits between loop iterations.
pub trait Pacer {
    /// Block until the next iteration should run, or until `stop` fires.
    fn pace(&mut self, stop: &StopSignal);
}

impl<F> Pacer for F
where
    F: FnMut(&StopSignal),
{
    fn pace(&mut self, stop: &StopSignal) {
        self(stop)
    }
}

/// Runs iterations back to back, yielding the thread in between.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unpaced;

impl Pacer for Unpaced {
    fn pace(&mut self, _stop: &StopSignal) {
        std::thread::yield_now();
    }
}

/// Runs at most one iteration per `period`.
///
/// Sleeps for the remainder of the current period. The wait is on the
/// stop signal, so stopping wakes it immediately. An iteration that
/// overruns its period starts the next one right away, and the schedule
/// restarts from that point instead of bursting to catch up.
#[derive(Clone, Debug)]
pub struct FixedInterval {
    period: Duration,
    next: Option<Instant>,
}

impl FixedInterval {
    /// Pace at one iteration per `period`.
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    /// Pace at `hz` iterations per second. Non-positive or non-finite
    /// rates fall back to no delay.
    pub fn from_hz(hz: f64) -> Self {
        let period = if hz.is_finite() && hz > 0.0 {
            Duration::from_secs_f64(1.0 / hz)
        } else {
            Duration::ZERO
        };
        Self::new(period)
    }

    /// The configured period.
    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Pacer for FixedInterval {
    fn pace(&mut self, stop: &StopSignal) {
        let now = Instant::now();
        let deadline = self.next.unwrap_or(now + self.period);
        if let Some(remaining) = deadline.checked_duration_since(now) {
            if !remaining.is_zero() && stop.wait_timeout(remaining) {
                return;
            }
        }
        self.next = Some(deadline.max(Instant::now()) + self.period);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickloop_core::stop_signal;

    #[test]
    fn fixed_interval_waits_about_one_period() {
        let (_stopper, stop) = stop_signal();
        let mut pacer = FixedInterval::new(Duration::from_millis(20));
        let start = Instant::now();
        pacer.pace(&stop);
        pacer.pace(&stop);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(40), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(2), "elapsed {elapsed:?}");
    }

    #[test]
    fn fixed_interval_wakes_on_stop() {
        let (stopper, stop) = stop_signal();
        let mut pacer = FixedInterval::new(Duration::from_secs(30));
        let waker = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            stopper.stop();
        });
        let start = Instant::now();
        pacer.pace(&stop);
        assert!(start.elapsed() < Duration::from_secs(5));
        waker.join().unwrap();
    }

    #[test]
    fn from_hz_converts_and_guards() {
        assert_eq!(FixedInterval::from_hz(4.0).period(), Duration::from_millis(250));
        assert_eq!(FixedInterval::from_hz(0.0).period(), Duration::ZERO);
        assert_eq!(FixedInterval::from_hz(f64::NAN).period(), Duration::ZERO);
    }

    #[test]
    fn closure_is_a_pacer() {
        let (_stopper, stop) = stop_signal();
        let mut calls = 0;
        let mut pacer = |_: &StopSignal| calls += 1;
        pacer.pace(&stop);
        pacer.pace(&stop);
        assert_eq!(calls, 2);
    }

    #[test]
    fn unpaced_returns_immediately() {
        let (_stopper, stop) = stop_signal();
        let start = Instant::now();
        for _ in 0..100 {
            Unpaced.pace(&stop);
        }
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
