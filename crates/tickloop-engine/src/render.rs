//! Render gate: the once-per-iteration decision whether to render.

use crate::rate::Rates;

/// Tracks the earliest real time at which a rate-limited render may run.
#[derive(Clone, Debug, Default)]
pub(crate) struct RenderGate {
    deadline: f64,
}

impl RenderGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether to render at real time `now`, updating the deadline
    /// when the answer is yes.
    ///
    /// When limited, the next deadline is measured from `now` rather than
    /// from the previous deadline, so a late render never causes a burst
    /// of catch-up renders.
    pub fn admit(&mut self, now: f64, rates: &Rates) -> bool {
        if !rates.render_limited() {
            self.deadline = now;
            return true;
        }
        if now >= self.deadline {
            self.deadline = now + rates.render_hz;
            true
        } else {
            false
        }
    }

    pub fn deadline(&self) -> f64 {
        self.deadline
    }

    pub fn reset(&mut self) {
        self.deadline = 0.0;
    }
}
