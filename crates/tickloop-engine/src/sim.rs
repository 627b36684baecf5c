//! The scheduler and its run loop.
//!
//! [`Sim`] owns the simulation state, simulation time, and the three
//! hook slots. All of them live on the loop thread; nothing here is
//! shared except the rate cell and the op channel, both reached from
//! other threads through a [`SimHandle`].
//!
//! # Iteration
//!
//! ```text
//! tick():
//!   stopped?            -> Stopped
//!   pre-frame hook      (time = sim_time)
//!   while sim_time + hz <= now:
//!       drain ops       (in handoff order)
//!       frame hook      (time = sim_time before the step)
//!       sim_time += hz  (hz re-read for the next increment)
//!   render gate         -> render hook (time = latest sim_time)
//! ```
//!
//! # Ownership model
//!
//! Hooks are not required to be [`Send`], so a `Sim` is built and run on
//! the thread that owns it (often the main thread, where windowing
//! toolkits insist on living). Take a [`handle()`](Sim::handle) before
//! calling [`run()`](Sim::run) and hand clones to other threads.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tickloop_core::{Frame, Hook, MonotonicClock, StopSignal, TimeSource};

use crate::clock::SimClock;
use crate::config::{ConfigError, SimConfig};
use crate::metrics::{LoopMetrics, RunReport};
use crate::pacer::{Pacer, Unpaced};
use crate::rate::{RateCell, RateError, Rates};
use crate::render::RenderGate;
use crate::sched::{OpQueue, SimHandle};

/// Slack when deciding whether a full step is due. Absorbs rounding in
/// accumulated simulation time so that e.g. three 1/30 s steps fit in
/// 0.1 s of real time.
const STEP_TOLERANCE: f64 = 1e-9;

/// Result of a single loop iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// The iteration ran; the loop should continue.
    Running,
    /// The stop signal has fired. Terminal.
    Stopped,
}

type HookSlot<S> = Option<Box<dyn Hook<S>>>;

struct Hooks<S> {
    pre_frame: HookSlot<S>,
    frame: HookSlot<S>,
    render: HookSlot<S>,
}

impl<S> Default for Hooks<S> {
    fn default() -> Self {
        Self {
            pre_frame: None,
            frame: None,
            render: None,
        }
    }
}

fn run_hook<S>(slot: &mut HookSlot<S>, state: &mut S, frame: Frame) {
    if let Some(hook) = slot {
        hook.run(state, frame);
    }
}

// ── Sim ──────────────────────────────────────────────────────────

/// Fixed-timestep simulation/render scheduler over a state `S`.
///
/// # Example
///
/// ```ignore
/// let (stopper, stop) = stop_signal();
/// let mut sim = Sim::new(SimConfig::new(60).with_render_fps(30), World::default(), stop)?;
/// sim.on_frame(|world: &mut World, frame: Frame| world.step(frame.step));
/// sim.on_render(|world: &mut World, frame: Frame| draw(world, frame.alpha()));
/// let handle = sim.handle();
/// spawn_network_thread(handle, stopper);
/// let report = sim.run();
/// ```
pub struct Sim<S> {
    state: S,
    hooks: Hooks<S>,
    rates: Arc<RateCell>,
    clock: SimClock,
    render: RenderGate,
    ops: OpQueue<S>,
    stop: StopSignal,
    pacer: Box<dyn Pacer>,
    metrics: LoopMetrics,
    started: bool,
}

impl<S> Sim<S> {
    /// Create a scheduler reading real time from a [`MonotonicClock`].
    ///
    /// Fails with [`ConfigError::InvalidFps`] if `config.fps <= 0`.
    pub fn new(config: SimConfig, state: S, stop: StopSignal) -> Result<Self, ConfigError> {
        Self::with_time_source(config, state, stop, MonotonicClock::new())
    }

    /// Create a scheduler reading real time from `source`.
    pub fn with_time_source<T>(
        config: SimConfig,
        state: S,
        stop: StopSignal,
        source: T,
    ) -> Result<Self, ConfigError>
    where
        T: TimeSource + 'static,
    {
        config.validate()?;
        Ok(Self {
            state,
            hooks: Hooks::default(),
            rates: Arc::new(RateCell::new(Rates::new(config.fps, config.render_fps))),
            clock: SimClock::new(Box::new(source)),
            render: RenderGate::new(),
            ops: OpQueue::new(),
            stop,
            pacer: Box::new(Unpaced),
            metrics: LoopMetrics::default(),
            started: false,
        })
    }

    /// A thread-safe handle for rate changes and op submission.
    pub fn handle(&self) -> SimHandle<S> {
        SimHandle::new(Arc::clone(&self.rates), self.ops.sender(), self.stop.clone())
    }

    // ── Hooks ────────────────────────────────────────────────────

    /// Install the hook run at the start of every iteration, before any
    /// steps. The usual place to poll window events.
    pub fn on_pre_frame<H>(&mut self, hook: H) -> &mut Self
    where
        H: Hook<S> + 'static,
    {
        self.hooks.pre_frame = Some(Box::new(hook));
        self
    }

    /// Install the hook run once per fixed step.
    pub fn on_frame<H>(&mut self, hook: H) -> &mut Self
    where
        H: Hook<S> + 'static,
    {
        self.hooks.frame = Some(Box::new(hook));
        self
    }

    /// Install the hook run when the render gate admits a render.
    pub fn on_render<H>(&mut self, hook: H) -> &mut Self
    where
        H: Hook<S> + 'static,
    {
        self.hooks.render = Some(Box::new(hook));
        self
    }

    /// Remove the pre-frame hook.
    pub fn clear_pre_frame(&mut self) -> &mut Self {
        self.hooks.pre_frame = None;
        self
    }

    /// Remove the per-step hook.
    pub fn clear_frame(&mut self) -> &mut Self {
        self.hooks.frame = None;
        self
    }

    /// Remove the render hook.
    pub fn clear_render(&mut self) -> &mut Self {
        self.hooks.render = None;
        self
    }

    /// Replace the pacer [`run()`](Self::run) waits on between
    /// iterations. Defaults to [`Unpaced`].
    pub fn set_pacer<P>(&mut self, pacer: P) -> &mut Self
    where
        P: Pacer + 'static,
    {
        self.pacer = Box::new(pacer);
        self
    }

    // ── State ────────────────────────────────────────────────────

    /// The loop-owned state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Mutable access to the loop-owned state.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Consume the scheduler, returning its state.
    pub fn into_state(self) -> S {
        self.state
    }

    // ── Rates ────────────────────────────────────────────────────

    /// Snapshot of the current rates.
    pub fn rates(&self) -> Rates {
        self.rates.get()
    }

    /// Change the simulation rate. See [`RateCell::set_fps`].
    pub fn set_fps(&self, fps: i32) -> Result<i32, RateError> {
        self.rates.set_fps(fps)
    }

    /// Change the render limit. See [`RateCell::set_render_fps`].
    pub fn set_render_fps(&self, fps: i32) -> i32 {
        self.rates.set_render_fps(fps)
    }

    // ── Time ─────────────────────────────────────────────────────

    /// Simulation time in seconds.
    pub fn seconds(&self) -> f64 {
        self.clock.seconds()
    }

    /// Real seconds elapsed since the loop started.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Calendar time the simulation currently represents.
    pub fn time(&self) -> DateTime<Utc> {
        self.clock.time()
    }

    /// Calendar time right now.
    pub fn real_time(&self) -> DateTime<Utc> {
        self.clock.real_time()
    }

    /// Counters since the current run started.
    pub fn metrics(&self) -> &LoopMetrics {
        &self.metrics
    }

    /// Whether the stop signal has fired.
    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    // ── Loop ─────────────────────────────────────────────────────

    /// Begin a new run: rewind the time source, zero simulation time,
    /// clear the render deadline and metrics.
    ///
    /// [`run()`](Self::run) always calls this; [`tick()`](Self::tick)
    /// calls it on first use.
    pub fn start(&mut self) {
        self.clock.start();
        self.render.reset();
        self.metrics = LoopMetrics::default();
        self.started = true;
    }

    /// Run one loop iteration.
    ///
    /// For hosts that drive the loop themselves (for example from a
    /// display-refresh callback) instead of calling [`run()`](Self::run).
    pub fn tick(&mut self) -> LoopState {
        if self.stop.is_stopped() {
            return LoopState::Stopped;
        }
        if !self.started {
            self.start();
        }
        let iteration_start = Instant::now();

        let mut hz = self.rates.step();
        let sim_time = self.clock.seconds();
        let pre = Frame {
            step: hz,
            time: sim_time,
            now: self.clock.now(),
            when: self.clock.project(sim_time),
        };
        run_hook(&mut self.hooks.pre_frame, &mut self.state, pre);

        let mut now = self.clock.now();
        let mut steps = 0;
        let mut ops = 0;
        while self.clock.seconds() + hz <= now + STEP_TOLERANCE {
            let frame = Frame {
                step: hz,
                time: self.clock.seconds(),
                now,
                when: self.clock.time(),
            };
            ops += self.ops.drain(&mut self.state, frame);
            run_hook(&mut self.hooks.frame, &mut self.state, frame);
            self.clock.advance(hz);
            steps += 1;

            now = self.clock.now();
            hz = self.rates.step();
        }

        let rates = self.rates.get();
        let rendered = self.render.admit(now, &rates);
        if rendered {
            let frame = Frame {
                step: rates.hz,
                time: self.clock.seconds(),
                now,
                when: self.clock.time(),
            };
            run_hook(&mut self.hooks.render, &mut self.state, frame);
        }

        let elapsed_us = iteration_start.elapsed().as_micros() as u64;
        self.metrics
            .record_iteration(steps, ops, rendered, elapsed_us);
        tracing::trace!(
            steps,
            ops,
            rendered,
            sim_time = self.clock.seconds(),
            "iteration"
        );
        LoopState::Running
    }

    /// Run the loop until the stop signal fires.
    ///
    /// Starts a fresh run (see [`start()`](Self::start)), then alternates
    /// [`tick()`](Self::tick) with the configured [`Pacer`]. Returns
    /// immediately if the signal has already fired.
    pub fn run(&mut self) -> RunReport {
        let run_start = Instant::now();
        self.start();
        let rates = self.rates.get();
        tracing::info!(
            fps = rates.fps,
            render_fps = rates.render_fps,
            run_time = %self.clock.run_time(),
            "simulation loop started"
        );

        while self.tick() == LoopState::Running {
            self.pacer.pace(&self.stop);
        }

        let report = RunReport {
            total_ms: run_start.elapsed().as_millis() as u64,
            sim_seconds: self.clock.seconds(),
            metrics: self.metrics.clone(),
        };
        tracing::info!(
            sim_seconds = report.sim_seconds,
            iterations = report.metrics.iterations,
            steps = report.metrics.steps,
            renders = report.metrics.renders,
            ops = report.metrics.ops_run,
            "simulation loop stopped"
        );
        report
    }
}

impl<S> std::fmt::Debug for Sim<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sim")
            .field("rates", &self.rates.get())
            .field("clock", &self.clock)
            .field("render_deadline", &self.render.deadline())
            .field("metrics", &self.metrics)
            .field("stopped", &self.stop.is_stopped())
            .finish_non_exhaustive()
    }
}
