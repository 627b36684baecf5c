//! Criterion micro-benchmarks for fixed-step catch-up, render gating,
//! and op handoff.

use std::hint::black_box;
use std::thread;

use criterion::{criterion_group, criterion_main, Criterion};
use tickloop_bench::{manual_sim, Particles};
use tickloop_core::Frame;

/// Benchmark: one tick that catches up 60 steps over 1K particles.
fn bench_catch_up_60_steps(c: &mut Criterion) {
    let (mut sim, clock, _stopper) = manual_sim(60, 0, Particles::new(1_000));
    sim.on_frame(|p: &mut Particles, frame: Frame| p.integrate(frame));

    c.bench_function("catch_up_60_steps_1k", |b| {
        b.iter(|| {
            clock.advance(1.0);
            sim.tick();
            black_box(sim.state().pos[1]);
        });
    });
}

/// Benchmark: a tick with nothing due, so only the hooks and render gate run.
fn bench_idle_tick(c: &mut Criterion) {
    let (mut sim, _clock, _stopper) = manual_sim(60, 30, 0u64);
    sim.on_pre_frame(|n: &mut u64, _: Frame| *n += 1);
    sim.on_render(|n: &mut u64, _: Frame| *n += 1);

    c.bench_function("idle_tick", |b| {
        b.iter(|| {
            black_box(sim.tick());
        });
    });
}

/// Benchmark: one step that drains an op handed off from another thread.
fn bench_async_handoff(c: &mut Criterion) {
    let (mut sim, clock, stopper) = manual_sim(1_000, 0, 0u64);
    let handle = sim.handle();
    let submitter = thread::spawn(move || {
        while handle
            .schedule_async(|n: &mut u64, _: Frame| *n += 1)
            .is_delivered()
        {}
    });

    c.bench_function("async_handoff", |b| {
        b.iter(|| {
            let before = *sim.state();
            while *sim.state() == before {
                clock.advance(0.001);
                sim.tick();
            }
        });
    });

    stopper.stop();
    let _ = submitter.join();
}

criterion_group!(
    benches,
    bench_catch_up_60_steps,
    bench_idle_tick,
    bench_async_handoff
);
criterion_main!(benches);
