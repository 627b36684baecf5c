//! Tickloop: a fixed-timestep simulation scheduler with a rate-limited
//! render pass and a cross-thread op queue.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the tickloop sub-crates. For most users, adding `tickloop` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tickloop::prelude::*;
//!
//! #[derive(Default)]
//! struct Counter {
//!     steps: u32,
//!     renders: u32,
//! }
//!
//! let (stopper, stop) = stop_signal();
//! let config = SimConfig::new(120).with_render_fps(30);
//! let mut sim = Sim::new(config, Counter::default(), stop).unwrap();
//!
//! sim.on_frame(|c: &mut Counter, _: Frame| c.steps += 1);
//! sim.on_render(move |c: &mut Counter, _: Frame| {
//!     c.renders += 1;
//!     if c.renders == 3 {
//!         stopper.stop();
//!     }
//! });
//!
//! let report = sim.run();
//! assert_eq!(report.metrics.renders, 3);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tickloop-core` | `Frame`, hook/op/time-source traits, stop signal |
//! | [`engine`] | `tickloop-engine` | `Sim`, handles, rates, pacing, events, metrics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and traits (`tickloop-core`).
///
/// Contains [`types::Frame`], the [`types::Hook`] and [`types::TimeSource`]
/// traits, and the [`types::stop_signal`] constructor.
pub use tickloop_core as types;

/// The scheduler and its surroundings (`tickloop-engine`).
///
/// [`engine::Sim`] runs the loop; [`engine::SimHandle`] reaches it from
/// other threads.
pub use tickloop_engine as engine;

/// Common imports for typical tickloop usage.
///
/// ```rust
/// use tickloop::prelude::*;
/// ```
pub mod prelude {
    // Core
    pub use tickloop_core::{stop_signal, Frame, Hook, StopSignal, Stopper, TimeSource};

    // Scheduler
    pub use tickloop_engine::{
        ConfigError, Delivery, LoopState, RateError, Rates, RunReport, Sim, SimConfig, SimHandle,
    };

    // Pacing
    pub use tickloop_engine::{FixedInterval, Pacer, Unpaced};

    // Events
    pub use tickloop_engine::{event_queue, Event, EventHandler, EventQueue, EventSender};
}
