//! Tickloop headless demo: a slow simulation, a fast render pass, and
//! events and ops arriving from other threads.
//!
//! Demonstrates:
//!   1. A `Sim` stepping at 2 fps with rendering limited to 30 fps
//!   2. Window-style events posted from a producer thread and replayed
//!      in the pre-frame hook
//!   3. Dropping the render rate to 5 fps while "unfocused"
//!   4. A worker thread reading and mutating state with `schedule_sync`
//!   5. Escape (or close) firing the stop signal
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example headless

use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tickloop_core::{stop_signal, Frame};
use tickloop_engine::{event_queue, Action, Event, FixedInterval, Key, Modifiers, Sim, SimConfig};
use tracing_subscriber::EnvFilter;

// ─── Rates ──────────────────────────────────────────────────────

const FPS: i32 = 2;
const RENDER_FPS: i32 = 30;
const UNFOCUSED_RENDER_FPS: i32 = 5;

// ─── World ──────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct World {
    ticks: u64,
    renders: u64,
    cursor: (f64, f64),
    bonus: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (stopper, stop) = stop_signal();
    let (events, queue) = event_queue();

    let config = SimConfig::new(FPS).with_render_fps(RENDER_FPS);
    let mut sim = match Sim::new(config, World::default(), stop) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("bad config: {e}");
            return;
        }
    };
    sim.set_pacer(FixedInterval::new(Duration::from_millis(2)));

    // ─── Hooks ──────────────────────────────────────────────────

    let handle = sim.handle();
    let close = stopper.clone();
    sim.on_pre_frame(move |world: &mut World, _: Frame| {
        queue.play(&mut |event: Event, when: DateTime<Utc>| match event {
            Event::Focus { focused } => {
                let fps = if focused { RENDER_FPS } else { UNFOCUSED_RENDER_FPS };
                handle.set_render_fps(fps);
                tracing::info!(focused, render_fps = fps, "focus changed");
            }
            Event::CursorPos { x, y } => world.cursor = (x, y),
            Event::Key {
                key: Key::ESCAPE,
                action: Action::Press,
                ..
            }
            | Event::Close => {
                tracing::info!(%when, "close requested");
                close.stop();
            }
            other => tracing::debug!(?other, "ignored event"),
        });
    });

    sim.on_frame(|world: &mut World, frame: Frame| {
        world.ticks += 1;
        tracing::info!(
            tick = world.ticks,
            sim_time = frame.time,
            when = %frame.when,
            "step"
        );
    });

    sim.on_render(|world: &mut World, frame: Frame| {
        world.renders += 1;
        tracing::trace!(
            renders = world.renders,
            alpha = frame.alpha(),
            cursor = ?world.cursor,
            "render"
        );
    });

    // ─── Producer: window events ────────────────────────────────

    let producer = thread::spawn(move || {
        let script = [
            (300, Event::CursorPos { x: 10.0, y: 20.0 }),
            (700, Event::Focus { focused: false }),
            (1500, Event::Scroll { dx: 0.0, dy: 1.0 }),
            (1000, Event::Focus { focused: true }),
            (
                1500,
                Event::Key {
                    key: Key::ESCAPE,
                    scancode: 9,
                    action: Action::Press,
                    mods: Modifiers::NONE,
                },
            ),
        ];
        for (delay_ms, event) in script {
            thread::sleep(Duration::from_millis(delay_ms));
            if !events.post(event) {
                break;
            }
        }
    });

    // ─── Worker: synchronous ops ────────────────────────────────

    let worker_handle = sim.handle();
    let worker = thread::spawn(move || {
        let mut round = 0;
        loop {
            round += 1;
            let delivery = worker_handle.schedule_sync(move |world: &mut World, frame: Frame| {
                world.bonus += round;
                tracing::info!(
                    round,
                    ticks = world.ticks,
                    renders = world.renders,
                    sim_time = frame.time,
                    "worker op"
                );
            });
            if !delivery.is_delivered() {
                tracing::info!(round, "worker stopping");
                break;
            }
        }
    });

    // ─── Run ────────────────────────────────────────────────────

    let report = sim.run();
    drop(stopper);
    let _ = producer.join();
    let _ = worker.join();

    let world = sim.state();
    println!(
        "ran {:.1}s of simulation in {} ms: {} steps, {} renders, {} ops, bonus {}",
        report.sim_seconds,
        report.total_ms,
        report.metrics.steps,
        report.metrics.renders,
        report.metrics.ops_run,
        world.bonus,
    );
}
