//! Fixed-timestep simulation scheduler.
//!
//! [`Sim`] owns simulation time and a user state value. Each loop
//! iteration runs a pre-frame hook, catches the simulation up with real
//! time in fixed `1 / fps` increments (running queued ops and the frame
//! hook at every increment), then decides whether to render. Other
//! threads talk to the loop only through a [`SimHandle`]: rate changes
//! and ops handed over a rendezvous channel.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod clock;
pub mod config;
pub mod event;
pub mod metrics;
pub mod pacer;
pub mod rate;
pub(crate) mod render;
pub mod sched;
pub mod sim;

pub use clock::SimClock;
pub use config::{ConfigError, SimConfig};
pub use event::{
    event_queue, Action, Event, EventHandler, EventQueue, EventSender, Key, Modifiers, MouseButton,
};
pub use metrics::{LoopMetrics, RunReport};
pub use pacer::{FixedInterval, Pacer, Unpaced};
pub use rate::{RateCell, RateError, Rates};
pub use sched::{Delivery, SimHandle};
pub use sim::{LoopState, Sim};
