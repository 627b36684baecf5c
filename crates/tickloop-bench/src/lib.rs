//! Benchmark profiles for the tickloop scheduler.
//!
//! - [`manual_sim`]: a scheduler driven by a [`ManualClock`], so a bench
//!   controls exactly how much catch-up each tick performs
//! - [`Particles`]: a small state type with per-step work

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use tickloop_core::{stop_signal, Frame, Stopper};
use tickloop_engine::{Sim, SimConfig};
use tickloop_test_utils::ManualClock;

/// Positions and velocities integrated once per fixed step.
#[derive(Clone, Debug)]
pub struct Particles {
    pub pos: Vec<f64>,
    pub vel: Vec<f64>,
}

impl Particles {
    /// `n` particles with deterministic, distinct velocities.
    pub fn new(n: usize) -> Self {
        Self {
            pos: vec![0.0; n],
            vel: (0..n).map(|i| (i % 17) as f64 * 0.25 - 2.0).collect(),
        }
    }

    /// Explicit Euler over one step.
    pub fn integrate(&mut self, frame: Frame) {
        for (p, v) in self.pos.iter_mut().zip(&self.vel) {
            *p += v * frame.step;
        }
    }
}

/// Build a started scheduler over `state` whose time source only moves
/// when the returned [`ManualClock`] is moved.
///
/// The [`Stopper`] must be kept alive for as long as the scheduler runs;
/// dropping it fires the stop signal.
pub fn manual_sim<S>(fps: i32, render_fps: i32, state: S) -> (Sim<S>, ManualClock, Stopper) {
    let (stopper, stop) = stop_signal();
    let clock = ManualClock::new();
    let config = SimConfig::new(fps.max(1)).with_render_fps(render_fps);
    let mut sim = match Sim::with_time_source(config, state, stop, clock.clone()) {
        Ok(sim) => sim,
        Err(e) => panic!("bench profile config rejected: {e}"),
    };
    sim.start();
    (sim, clock, stopper)
}
