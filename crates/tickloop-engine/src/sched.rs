//! Cross-thread op scheduling.
//!
//! Ops travel from submitting threads to the loop thread over a
//! zero-capacity crossbeam channel, so every handoff is a rendezvous:
//! the submitter blocks until the loop takes the op at its next
//! fixed-step boundary, and at most one op is ever in flight. Back
//! pressure lands on submitters, never on the loop, which only polls.
//!
//! ```text
//! Submitter thread(s)                       Loop thread
//!     |                                         |
//!     |--schedule_async(op)--+                  |
//!     |   [ops: bounded(0)]  |  (blocks)        | per step:
//!     |                      +----------------->|   drain(): try_recv()* -> op(state, frame)
//!     |<-- Delivered --------+                  |   frame hook
//!     |                                         |
//!     |--schedule_sync(op)---+----------------->|   op(state, frame); done.send(())
//!     |   blocks on done_rx  |                  |
//!     |<-- Delivered (after op ran) ------------|
//! ```

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use tickloop_core::{Frame, Op, StopSignal};

use crate::rate::{RateCell, RateError, Rates};

/// Outcome of an op submission.
///
/// `Dropped` is the only abnormal outcome: the stop signal fired (or the
/// scheduler was dropped) before the loop took the op, so it never ran.
/// It is informational; submissions never fail with an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The loop took the op. For synchronous submissions, the op has
    /// also finished running.
    Delivered,
    /// The op was discarded without running.
    Dropped,
}

impl Delivery {
    /// Whether the op reached the loop.
    pub fn is_delivered(self) -> bool {
        self == Self::Delivered
    }
}

// ── SimHandle ────────────────────────────────────────────────────

/// Thread-safe handle to a running scheduler.
///
/// Obtained from [`Sim::handle`](crate::Sim::handle). Cheap to clone;
/// every clone talks to the same loop.
pub struct SimHandle<S> {
    rates: Arc<RateCell>,
    ops: Sender<Op<S>>,
    stop: StopSignal,
}

impl<S> Clone for SimHandle<S> {
    fn clone(&self) -> Self {
        Self {
            rates: Arc::clone(&self.rates),
            ops: self.ops.clone(),
            stop: self.stop.clone(),
        }
    }
}

impl<S> std::fmt::Debug for SimHandle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimHandle")
            .field("rates", &self.rates.get())
            .field("stopped", &self.stop.is_stopped())
            .finish()
    }
}

impl<S> SimHandle<S> {
    pub(crate) fn new(rates: Arc<RateCell>, ops: Sender<Op<S>>, stop: StopSignal) -> Self {
        Self { rates, ops, stop }
    }

    /// Snapshot of the current rates.
    pub fn rates(&self) -> Rates {
        self.rates.get()
    }

    /// Change the simulation rate, returning the previous one.
    ///
    /// See [`RateCell::set_fps`]. The new step size applies from the
    /// loop's next increment.
    pub fn set_fps(&self, fps: i32) -> Result<i32, RateError> {
        self.rates.set_fps(fps)
    }

    /// Change the render limit, returning the previous one. `fps <= 0`
    /// renders every iteration.
    pub fn set_render_fps(&self, fps: i32) -> i32 {
        self.rates.set_render_fps(fps)
    }

    /// Whether the loop's stop signal has fired.
    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    /// Hand `op` to the loop thread without waiting for it to run.
    ///
    /// Blocks only until the loop takes the op (its next fixed-step
    /// boundary). If the stop signal fires first, the op is dropped and
    /// never runs. Calling this from the loop thread itself (a hook or
    /// another op) deadlocks until the stop signal fires.
    pub fn schedule_async<F>(&self, op: F) -> Delivery
    where
        F: FnOnce(&mut S, Frame) + Send + 'static,
    {
        self.hand_off(Box::new(op))
    }

    /// Hand `op` to the loop thread and wait until it has finished.
    ///
    /// Effects of the op are visible to the caller when this returns
    /// [`Delivery::Delivered`]. If the stop signal fires before the
    /// handoff, returns [`Delivery::Dropped`] without running the op.
    ///
    /// Must not be called from the loop thread: the loop cannot take the
    /// op while it is blocked here, so the call deadlocks.
    pub fn schedule_sync<F>(&self, op: F) -> Delivery
    where
        F: FnOnce(&mut S, Frame) + Send + 'static,
    {
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        let op: Op<S> = Box::new(move |state, frame| {
            op(state, frame);
            // Best-effort: the submitter only goes away if it panicked.
            let _ = done_tx.send(());
        });
        match self.hand_off(op) {
            Delivery::Delivered => match done_rx.recv() {
                Ok(()) => Delivery::Delivered,
                // The op was dropped mid-run (it panicked on the loop).
                Err(_) => Delivery::Dropped,
            },
            Delivery::Dropped => Delivery::Dropped,
        }
    }

    fn hand_off(&self, op: Op<S>) -> Delivery {
        if self.stop.is_stopped() {
            tracing::debug!("op dropped: loop already stopped");
            return Delivery::Dropped;
        }
        crossbeam_channel::select! {
            send(self.ops, op) -> res => match res {
                Ok(()) => Delivery::Delivered,
                Err(_) => {
                    tracing::debug!("op dropped: scheduler gone");
                    Delivery::Dropped
                }
            },
            recv(self.stop.receiver()) -> _ => {
                tracing::debug!("op dropped: stop signal fired during handoff");
                Delivery::Dropped
            }
        }
    }
}

// ── OpQueue ──────────────────────────────────────────────────────

/// Loop-side end of the op channel.
pub(crate) struct OpQueue<S> {
    tx: Sender<Op<S>>,
    rx: Receiver<Op<S>>,
}

impl<S> OpQueue<S> {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::bounded(0);
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Op<S>> {
        self.tx.clone()
    }

    /// Run every op currently waiting to be handed off, in handoff order.
    /// Never blocks. Returns the number of ops run.
    pub fn drain(&self, state: &mut S, frame: Frame) -> u64 {
        let mut ran = 0;
        while let Ok(op) = self.rx.try_recv() {
            op(state, frame);
            ran += 1;
        }
        ran
    }
}
