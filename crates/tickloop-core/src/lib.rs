//! Core types and traits for the tickloop scheduler.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the engine and by embedding applications:
//! the [`Frame`] snapshot handed to hooks and ops, the [`Hook`] and
//! [`TimeSource`] traits, the [`Op`] type, and the one-shot stop signal.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod frame;
pub mod stop;
pub mod time;
pub mod traits;

pub use frame::Frame;
pub use stop::{stop_signal, StopSignal, Stopper};
pub use time::MonotonicClock;
pub use traits::{Hook, Op, TimeSource};
