//! Loop counters and the report returned from [`Sim::run`](crate::Sim::run).

/// Counters accumulated by the loop since the current run started.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoopMetrics {
    /// Loop iterations executed.
    pub iterations: u64,
    /// Fixed simulation steps executed (frame hook invocations, whether
    /// or not a frame hook is installed).
    pub steps: u64,
    /// Render hook invocations admitted by the render gate.
    pub renders: u64,
    /// Ops run on the loop thread.
    pub ops_run: u64,
    /// Largest number of steps taken in a single iteration.
    pub max_steps_per_iteration: u64,
    /// Wall-clock duration of the most recent iteration, in microseconds.
    pub last_iteration_us: u64,
}

impl LoopMetrics {
    pub(crate) fn record_iteration(&mut self, steps: u64, ops: u64, rendered: bool, us: u64) {
        self.iterations += 1;
        self.steps += steps;
        self.ops_run += ops;
        if rendered {
            self.renders += 1;
        }
        self.max_steps_per_iteration = self.max_steps_per_iteration.max(steps);
        self.last_iteration_us = us;
    }
}

/// Summary returned when [`Sim::run`](crate::Sim::run) exits.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Wall-clock time spent inside `run`, in milliseconds.
    pub total_ms: u64,
    /// Simulation time reached when the loop stopped, in seconds.
    pub sim_seconds: f64,
    /// Counters for the run.
    pub metrics: LoopMetrics,
}
