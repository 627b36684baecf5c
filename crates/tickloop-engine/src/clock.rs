//! Simulation clock: real elapsed time, simulation time, and their
//! projection onto calendar time.
//!
//! Two timelines are kept apart. [`now()`](SimClock::now) is real time
//! read from the [`TimeSource`] relative to the loop start.
//! [`seconds()`](SimClock::seconds) is simulation time, which only moves
//! when the stepper advances it and lags real time until caught up.
//! Either can be projected onto wall-clock time, anchored at the whole
//! second the loop started in.

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use tickloop_core::TimeSource;

/// Owned by the loop thread; never shared.
pub struct SimClock {
    source: Box<dyn TimeSource>,
    /// Time-source reading taken right after the reset at loop start.
    base_time: f64,
    /// Accumulated simulation seconds.
    sim_time: f64,
    /// Wall-clock second the loop started in.
    run_time: DateTime<Utc>,
}

impl SimClock {
    /// Wrap a time source. The clock reads zero until [`start`](Self::start).
    pub fn new(source: Box<dyn TimeSource>) -> Self {
        let base_time = source.seconds();
        Self {
            source,
            base_time,
            sim_time: 0.0,
            run_time: DateTime::<Utc>::default(),
        }
    }

    /// Anchor the clock for a new run: record the wall-clock second,
    /// rewind the time source, and zero simulation time.
    pub fn start(&mut self) {
        self.run_time = self.source.wall_clock().trunc_subsecs(0);
        self.source.reset();
        self.base_time = self.source.seconds();
        self.sim_time = 0.0;
    }

    /// Real seconds elapsed since [`start`](Self::start).
    pub fn now(&self) -> f64 {
        self.source.seconds() - self.base_time
    }

    /// Current simulation time in seconds.
    pub fn seconds(&self) -> f64 {
        self.sim_time
    }

    /// Advance simulation time by one step of `hz` seconds.
    pub fn advance(&mut self, hz: f64) {
        self.sim_time += hz;
    }

    /// Calendar time the simulation currently represents.
    pub fn time(&self) -> DateTime<Utc> {
        self.project(self.sim_time)
    }

    /// Calendar time right now, per the time source.
    pub fn real_time(&self) -> DateTime<Utc> {
        self.project(self.now())
    }

    /// Project a point on the loop timeline onto calendar time.
    pub fn project(&self, after: f64) -> DateTime<Utc> {
        project(self.run_time, self.base_time, after)
    }

    /// Wall-clock second the current run is anchored to.
    pub fn run_time(&self) -> DateTime<Utc> {
        self.run_time
    }
}

impl std::fmt::Debug for SimClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimClock")
            .field("base_time", &self.base_time)
            .field("sim_time", &self.sim_time)
            .field("run_time", &self.run_time)
            .finish_non_exhaustive()
    }
}

/// `run_time + base + after`, keeping nanosecond precision of the
/// fractional second. Non-finite or out-of-range offsets collapse to
/// `run_time`.
fn project(run_time: DateTime<Utc>, base: f64, after: f64) -> DateTime<Utc> {
    let real = base + after;
    if !real.is_finite() {
        return run_time;
    }
    let whole = real.floor();
    let nanos = ((real - whole) * 1e9) as i64;
    TimeDelta::try_seconds(whole as i64)
        .and_then(|secs| secs.checked_add(&TimeDelta::nanoseconds(nanos)))
        .and_then(|delta| run_time.checked_add_signed(delta))
        .unwrap_or(run_time)
}
