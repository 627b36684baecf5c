//! The per-frame timing snapshot passed to hooks and ops.

use chrono::{DateTime, Utc};

/// Timing snapshot for one hook or op invocation.
///
/// Frames are plain values: hooks and ops receive a copy and must not
/// expect it to track the scheduler after the call returns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Fixed step size in effect for this frame, in seconds (`1 / fps`).
    ///
    /// `f64::INFINITY` while the simulation rate is set to zero.
    pub step: f64,
    /// Position of this frame on the simulation timeline, in seconds.
    ///
    /// For step frames this is the simulation time *before* the step is
    /// applied; the step covers `[time, time + step)`.
    pub time: f64,
    /// Real elapsed time since loop start when the frame was dispatched.
    ///
    /// `now - time` is how far real time is ahead of the simulation,
    /// which renderers use for interpolation.
    pub now: f64,
    /// Calendar projection of [`time`](Frame::time).
    pub when: DateTime<Utc>,
}

impl Frame {
    /// Fraction of a step that real time is ahead of simulation time,
    /// clamped to `[0, 1]`.
    ///
    /// Returns 0 when stepping is paused (infinite step).
    pub fn alpha(&self) -> f64 {
        if !self.step.is_finite() || self.step <= 0.0 {
            return 0.0;
        }
        ((self.now - self.time) / self.step).clamp(0.0, 1.0)
    }

    /// Simulation time at the end of this frame's step.
    pub fn end(&self) -> f64 {
        self.time + self.step
    }
}
