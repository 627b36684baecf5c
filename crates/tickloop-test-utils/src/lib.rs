//! Test utilities for tickloop development.
//!
//! Provides [`ManualClock`], a [`TimeSource`] whose readings only move
//! when a test moves them, and [`FrameLog`], a hook that records every
//! [`Frame`] it sees.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tickloop_core::{Frame, TimeSource};

/// Settable time source shared between a test and the scheduler.
///
/// Clones share the same reading, so a test keeps one clone and hands
/// another to the scheduler. [`reset`](TimeSource::reset) sets the
/// reading to zero. The wall clock is fixed at construction.
#[derive(Clone, Debug)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
    wall: DateTime<Utc>,
}

impl ManualClock {
    /// A clock reading zero, anchored at the Unix epoch.
    pub fn new() -> Self {
        Self::with_wall_clock(DateTime::<Utc>::default())
    }

    /// A clock reading zero whose wall clock always reports `wall`.
    pub fn with_wall_clock(wall: DateTime<Utc>) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(0f64.to_bits())),
            wall,
        }
    }

    /// Current reading in seconds.
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Jump to an absolute reading.
    pub fn set(&self, seconds: f64) {
        self.bits.store(seconds.to_bits(), Ordering::Release);
    }

    /// Move the reading forward by `seconds`.
    pub fn advance(&self, seconds: f64) {
        self.set(self.get() + seconds);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualClock {
    fn seconds(&self) -> f64 {
        self.get()
    }

    fn reset(&mut self) {
        self.set(0.0);
    }

    fn wall_clock(&self) -> DateTime<Utc> {
        self.wall
    }
}

/// Hook that records every frame it is invoked with.
///
/// Clones share one log.
#[derive(Clone, Debug, Default)]
pub struct FrameLog {
    frames: Arc<Mutex<Vec<Frame>>>,
}

impl FrameLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A hook appending to this log, for any state type.
    pub fn hook<S: 'static>(&self) -> impl FnMut(&mut S, Frame) + 'static {
        let frames = Arc::clone(&self.frames);
        move |_state: &mut S, frame: Frame| frames.lock().unwrap().push(frame)
    }

    /// Copy of every recorded frame, oldest first.
    pub fn frames(&self) -> Vec<Frame> {
        self.frames.lock().unwrap().clone()
    }

    /// Recorded `Frame::time` values, oldest first.
    pub fn times(&self) -> Vec<f64> {
        self.frames.lock().unwrap().iter().map(|f| f.time).collect()
    }

    pub fn len(&self) -> usize {
        self.frames.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.frames.lock().unwrap().clear();
    }
}
