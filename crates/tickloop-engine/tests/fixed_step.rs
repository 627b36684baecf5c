//! Integration test: fixed-step catch-up and render gating under a
//! manually driven time source.
//!
//! Real time is whatever the test sets on a `ManualClock`, so step and
//! render counts are exact.

use proptest::prelude::*;
use tickloop_core::{stop_signal, Frame, StopSignal, Stopper};
use tickloop_engine::{ConfigError, LoopState, RateError, Sim, SimConfig};
use tickloop_test_utils::{FrameLog, ManualClock};

// ── Helpers ──────────────────────────────────────────────────────────

struct Rig {
    sim: Sim<()>,
    clock: ManualClock,
    steps: FrameLog,
    renders: FrameLog,
    _stopper: Stopper,
}

fn rig(fps: i32, render_fps: i32) -> Rig {
    let (stopper, stop) = stop_signal();
    let clock = ManualClock::new();
    let mut sim = Sim::with_time_source(
        SimConfig::new(fps).with_render_fps(render_fps),
        (),
        stop,
        clock.clone(),
    )
    .unwrap();
    let steps = FrameLog::new();
    let renders = FrameLog::new();
    sim.on_frame(steps.hook()).on_render(renders.hook());
    sim.start();
    Rig {
        sim,
        clock,
        steps,
        renders,
        _stopper: stopper,
    }
}

// ── Construction ─────────────────────────────────────────────────────

#[test]
fn invalid_rates_are_rejected_at_construction() {
    for fps in [0, -1, i32::MIN] {
        let (_stopper, stop) = stop_signal();
        match Sim::new(SimConfig::new(fps), (), stop) {
            Err(ConfigError::InvalidFps { value }) => assert_eq!(value, fps),
            Ok(_) => panic!("fps {fps} accepted"),
        }
    }
}

#[test]
fn default_config_is_sixty_unthrottled() {
    let (_stopper, stop) = stop_signal();
    let sim = Sim::new(SimConfig::default(), (), stop).unwrap();
    let rates = sim.rates();
    assert_eq!(rates.fps, 60);
    assert_eq!(rates.render_fps, 0);
    assert!(!rates.render_limited());
}

// ── Catch-up ─────────────────────────────────────────────────────────

#[test]
fn one_long_gap_is_caught_up_in_one_iteration() {
    let mut r = rig(50, 0);
    r.clock.set(2.0);
    assert_eq!(r.sim.tick(), LoopState::Running);
    assert_eq!(r.steps.len(), 100);
    assert_eq!(r.sim.metrics().max_steps_per_iteration, 100);
    assert_eq!(r.renders.len(), 1);
}

#[test]
fn frames_are_contiguous_across_iterations() {
    let mut r = rig(30, 0);
    for i in 1..=30 {
        r.clock.set(f64::from(i) * 0.037);
        r.sim.tick();
    }
    let frames = r.steps.frames();
    assert!(!frames.is_empty());
    assert_eq!(frames[0].time, 0.0);
    for pair in frames.windows(2) {
        assert!((pair[0].end() - pair[1].time).abs() < 1e-9);
    }
    let last = frames[frames.len() - 1];
    assert!(last.end() <= r.clock.get() + 1e-9);
    assert!(r.clock.get() - r.sim.seconds() < 1.0 / 30.0);
}

#[test]
fn sim_time_never_passes_real_time() {
    let mut r = rig(7, 0);
    let mut t = 0.0;
    for _ in 0..200 {
        t += 0.013;
        r.clock.set(t);
        r.sim.tick();
        assert!(r.sim.seconds() <= r.sim.now() + 1e-9);
    }
}

// ── Runtime rate changes ─────────────────────────────────────────────

#[test]
fn negative_runtime_rate_is_ignored() {
    let mut r = rig(20, 0);
    assert_eq!(r.sim.set_fps(-1), Err(RateError::InvalidRate { value: -1 }));
    r.clock.set(1.0);
    r.sim.tick();
    assert_eq!(r.steps.len(), 20);
}

#[test]
fn rate_change_between_iterations_changes_step_size() {
    let mut r = rig(10, 0);
    r.clock.set(0.5);
    r.sim.tick();
    assert_eq!(r.steps.len(), 5);

    r.sim.set_fps(100).unwrap();
    r.clock.set(0.6);
    r.sim.tick();
    let frames = r.steps.frames();
    assert_eq!(frames.len(), 15);
    assert!(frames[5..].iter().all(|f| (f.step - 0.01).abs() < 1e-12));
}

// ── Render gate ──────────────────────────────────────────────────────

#[test]
fn unthrottled_renders_every_iteration() {
    let mut r = rig(60, 0);
    for i in 0..40 {
        r.clock.set(f64::from(i) * 0.001);
        r.sim.tick();
    }
    assert_eq!(r.renders.len(), 40);
}

#[test]
fn limited_render_rate_holds_over_a_second() {
    let mut r = rig(60, 20);
    for i in 0..=1000 {
        r.clock.set(f64::from(i) * 0.001);
        r.sim.tick();
    }
    let n = r.renders.len();
    assert!((20..=22).contains(&n), "{n} renders");
}

#[test]
fn switching_render_limit_off_renders_immediately() {
    let mut r = rig(60, 2);
    r.sim.tick();
    r.clock.set(0.1);
    r.sim.tick();
    assert_eq!(r.renders.len(), 1);
    assert_eq!(r.sim.set_render_fps(0), 2);
    r.sim.tick();
    assert_eq!(r.renders.len(), 2);
}

// ── run() with an injected pacer ─────────────────────────────────────

#[test]
fn paced_run_steps_in_lockstep_with_the_pacer() {
    let (stopper, stop) = stop_signal();
    let clock = ManualClock::new();
    let mut sim =
        Sim::with_time_source(SimConfig::new(4), 0u32, stop, clock.clone()).unwrap();
    sim.on_frame(|n: &mut u32, _: Frame| *n += 1);
    let mut paced = 0;
    sim.set_pacer(move |_: &StopSignal| {
        paced += 1;
        clock.advance(0.25);
        if paced == 8 {
            stopper.stop();
        }
    });
    let report = sim.run();
    assert_eq!(*sim.state(), 7);
    assert_eq!(report.sim_seconds, 1.75);
    assert_eq!(report.metrics.steps, 7);
}

// ── Properties ───────────────────────────────────────────────────────

proptest! {
    /// Starting from zero and jumping straight to `t`, exactly the steps
    /// that fit in `t` run, each at the next multiple of the period.
    #[test]
    fn single_jump_runs_floor_of_elapsed_over_period(fps in 1i32..200, t in 0.0f64..3.0) {
        let mut r = rig(fps, 0);
        r.clock.set(t);
        r.sim.tick();
        let hz = 1.0 / f64::from(fps);
        let n = r.steps.len();
        prop_assert!(n as f64 * hz <= t + 1e-6);
        prop_assert!((n as f64 + 1.0) * hz > t - 1e-6);
        for (i, time) in r.steps.times().into_iter().enumerate() {
            prop_assert!((time - i as f64 * hz).abs() < 1e-6);
        }
    }

    /// Limited renders are never closer together than the render period.
    #[test]
    fn limited_renders_respect_period(
        render_fps in 1i32..120,
        gaps in prop::collection::vec(0.0f64..0.05, 1..200),
    ) {
        let mut r = rig(60, render_fps);
        let mut t = 0.0;
        for g in gaps {
            t += g;
            r.clock.set(t);
            r.sim.tick();
        }
        let period = 1.0 / f64::from(render_fps);
        let frames = r.renders.frames();
        for pair in frames.windows(2) {
            prop_assert!(pair[1].now - pair[0].now >= period - 1e-9);
        }
    }
}
