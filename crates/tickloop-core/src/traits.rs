//! Core abstraction traits: loop hooks, ops, and the external time source.

use chrono::{DateTime, Utc};

use crate::frame::Frame;

/// A callback invoked by the scheduler on the loop thread.
///
/// The scheduler has three hook slots (pre-frame, per-step frame, and
/// render). Each receives exclusive access to the loop-owned state and a
/// [`Frame`] snapshot. Any `FnMut(&mut S, Frame)` closure is a hook.
pub trait Hook<S> {
    /// Run the hook for one frame.
    fn run(&mut self, state: &mut S, frame: Frame);
}

impl<S, F> Hook<S> for F
where
    F: FnMut(&mut S, Frame),
{
    fn run(&mut self, state: &mut S, frame: Frame) {
        self(state, frame)
    }
}

/// A unit of work handed to the loop thread from elsewhere.
///
/// Ops run at most once, on the loop thread, at a fixed-step boundary,
/// before that step's frame hook.
pub type Op<S> = Box<dyn FnOnce(&mut S, Frame) + Send>;

/// A monotonic clock the scheduler reads to decide how many steps are due.
///
/// Readings are seconds on an arbitrary timeline. The scheduler calls
/// [`reset`](TimeSource::reset) once when the loop starts and measures
/// everything relative to the reading taken right after.
pub trait TimeSource: Send {
    /// Current reading, in seconds. Must never decrease between resets.
    fn seconds(&self) -> f64;

    /// Rewind the timeline to zero.
    fn reset(&mut self);

    /// Calendar time right now. Used once per run to anchor the
    /// projection of simulation time onto wall-clock time.
    fn wall_clock(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Box<T> {
    fn seconds(&self) -> f64 {
        (**self).seconds()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn wall_clock(&self) -> DateTime<Utc> {
        (**self).wall_clock()
    }
}
