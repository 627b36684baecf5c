//! Shared, runtime-adjustable simulation and render rates.
//!
//! The loop thread reads the rates every iteration (and between catch-up
//! steps); any thread may change them. [`RateCell`] serializes access
//! with a read/write lock. Changes take effect at the next read, never
//! retroactively.

use std::sync::{PoisonError, RwLock};

use thiserror::Error;

/// Errors from runtime rate changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RateError {
    /// A negative rate was requested. The previous rate is kept.
    #[error("fps must be >= 0, got {value}")]
    InvalidRate {
        /// The rejected rate.
        value: i32,
    },
}

/// A consistent snapshot of both rate pairs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rates {
    /// Simulation steps per second.
    pub fps: i32,
    /// Simulation step size in seconds, `1 / fps`.
    pub hz: f64,
    /// Render limit in frames per second; `<= 0` is unthrottled.
    pub render_fps: i32,
    /// Minimum spacing between renders in seconds, `1 / render_fps`.
    /// Zero when unthrottled.
    pub render_hz: f64,
}

impl Rates {
    /// Build both pairs from their frame rates.
    pub fn new(fps: i32, render_fps: i32) -> Self {
        Self {
            fps,
            hz: period(fps),
            render_fps,
            render_hz: render_period(render_fps),
        }
    }

    /// Whether rendering is rate limited.
    pub fn render_limited(&self) -> bool {
        self.render_fps > 0
    }
}

/// `1 / fps`. A zero rate yields an infinite step, which pauses stepping.
fn period(fps: i32) -> f64 {
    1.0 / f64::from(fps)
}

fn render_period(render_fps: i32) -> f64 {
    if render_fps > 0 {
        period(render_fps)
    } else {
        0.0
    }
}

/// Read/write-locked [`Rates`].
#[derive(Debug)]
pub struct RateCell {
    rates: RwLock<Rates>,
}

impl RateCell {
    /// Create a cell holding `rates`.
    pub fn new(rates: Rates) -> Self {
        Self {
            rates: RwLock::new(rates),
        }
    }

    /// Snapshot of the current rates.
    pub fn get(&self) -> Rates {
        *self.rates.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current simulation step size in seconds.
    pub fn step(&self) -> f64 {
        self.get().hz
    }

    /// Change the simulation rate, returning the previous one.
    ///
    /// Negative rates are rejected and leave the cell untouched. Zero is
    /// accepted and pauses stepping (the step becomes infinite), even
    /// though a scheduler cannot be constructed with it.
    pub fn set_fps(&self, fps: i32) -> Result<i32, RateError> {
        if fps < 0 {
            return Err(RateError::InvalidRate { value: fps });
        }
        let mut rates = self.rates.write().unwrap_or_else(PoisonError::into_inner);
        let previous = rates.fps;
        rates.fps = fps;
        rates.hz = period(fps);
        drop(rates);
        tracing::info!(previous, fps, "simulation rate changed");
        Ok(previous)
    }

    /// Change the render limit, returning the previous one.
    ///
    /// `fps <= 0` disables limiting.
    pub fn set_render_fps(&self, fps: i32) -> i32 {
        let mut rates = self.rates.write().unwrap_or_else(PoisonError::into_inner);
        let previous = rates.render_fps;
        rates.render_fps = fps;
        rates.render_hz = render_period(fps);
        drop(rates);
        tracing::info!(previous, fps, "render rate changed");
        previous
    }
}

// Compile-time assertion: RateCell must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<RateCell>();
};
