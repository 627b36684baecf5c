//! Window/input events collected off the loop thread and replayed on it.
//!
//! Host toolkits deliver input through callbacks on whatever thread they
//! like. Those callbacks translate into the closed [`Event`] type and
//! [`post`](EventSender::post) it; the pre-frame hook then drains the
//! [`EventQueue`] on the loop thread, so input handling never races the
//! simulation. This is the same collect-off-thread, drain-on-thread
//! pattern the op queue uses, minus the rendezvous: posting never blocks.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use crossbeam_channel::{Receiver, Sender};

/// Key, button, or modifier state transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// The key or button went down.
    Press,
    /// The key or button went up.
    Release,
    /// The key was held long enough to auto-repeat.
    Repeat,
}

/// Bit set of held modifier keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(pub u8);

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self(0);
    /// Either shift key.
    pub const SHIFT: Self = Self(1 << 0);
    /// Either control key.
    pub const CONTROL: Self = Self(1 << 1);
    /// Either alt key.
    pub const ALT: Self = Self(1 << 2);
    /// Either super (logo) key.
    pub const SUPER: Self = Self(1 << 3);

    /// Whether every modifier in `other` is held.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Toolkit key code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Key(pub i32);

impl Key {
    /// Escape.
    pub const ESCAPE: Self = Self(256);
    /// Enter.
    pub const ENTER: Self = Self(257);
    /// Space bar.
    pub const SPACE: Self = Self(32);
}

/// Mouse button index; 0 is the primary button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MouseButton(pub u8);

/// Window and input events.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The window contents need redrawing.
    Refresh,
    /// A Unicode character was typed.
    Char {
        /// The character.
        ch: char,
    },
    /// A Unicode character was typed with modifiers held.
    CharMods {
        /// The character.
        ch: char,
        /// Modifiers held while typing.
        mods: Modifiers,
    },
    /// The cursor entered or left the window.
    CursorEnter {
        /// `true` on enter.
        entered: bool,
    },
    /// The cursor moved, in window coordinates.
    CursorPos {
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// Files were dropped onto the window.
    Drop {
        /// Dropped paths.
        paths: Vec<PathBuf>,
    },
    /// The framebuffer was resized, in pixels.
    FramebufferSize {
        /// New width.
        width: i32,
        /// New height.
        height: i32,
    },
    /// The window was minimized or restored.
    Iconify {
        /// `true` when minimized.
        iconified: bool,
    },
    /// A keyboard key changed state.
    Key {
        /// Toolkit key code.
        key: Key,
        /// Platform scancode.
        scancode: i32,
        /// The transition.
        action: Action,
        /// Modifiers held.
        mods: Modifiers,
    },
    /// A mouse button changed state.
    MouseButton {
        /// Which button.
        button: MouseButton,
        /// The transition.
        action: Action,
        /// Modifiers held.
        mods: Modifiers,
    },
    /// The user asked to close the window.
    Close,
    /// The window gained or lost input focus.
    Focus {
        /// `true` when focused.
        focused: bool,
    },
    /// The window moved, in screen coordinates.
    Position {
        /// Left edge.
        x: i32,
        /// Top edge.
        y: i32,
    },
    /// The window was resized, in screen coordinates.
    Resize {
        /// New width.
        width: i32,
        /// New height.
        height: i32,
    },
    /// A scroll wheel or trackpad scrolled.
    Scroll {
        /// Horizontal offset.
        dx: f64,
        /// Vertical offset.
        dy: f64,
    },
}

/// Consumer of replayed events.
pub trait EventHandler {
    /// Handle one event, stamped with the time it was posted.
    fn handle(&mut self, event: Event, when: DateTime<Utc>);
}

impl<F> EventHandler for F
where
    F: FnMut(Event, DateTime<Utc>),
{
    fn handle(&mut self, event: Event, when: DateTime<Utc>) {
        self(event, when)
    }
}

/// Create a connected event sender/queue pair.
pub fn event_queue() -> (EventSender, EventQueue) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (EventSender { tx }, EventQueue { rx })
}

/// Posting side; cloneable and usable from any thread.
#[derive(Clone, Debug)]
pub struct EventSender {
    tx: Sender<(Event, DateTime<Utc>)>,
}

impl EventSender {
    /// Post an event stamped with the current calendar time.
    ///
    /// Returns `false` if the queue has been dropped.
    pub fn post(&self, event: Event) -> bool {
        self.post_at(event, Utc::now())
    }

    /// Post an event with an explicit timestamp.
    pub fn post_at(&self, event: Event, when: DateTime<Utc>) -> bool {
        self.tx.send((event, when)).is_ok()
    }
}

/// Draining side, held by the loop thread.
#[derive(Debug)]
pub struct EventQueue {
    rx: Receiver<(Event, DateTime<Utc>)>,
}

impl EventQueue {
    /// Events waiting to be drained.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether no events are waiting.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Take the events posted so far, oldest first, without blocking.
    ///
    /// Events posted while the iterator is being consumed are left for
    /// the next drain, so one drain always terminates.
    pub fn drain(&self) -> impl Iterator<Item = (Event, DateTime<Utc>)> + '_ {
        let pending = self.rx.len();
        self.rx.try_iter().take(pending)
    }

    /// Replay the posted events into `handler`. Returns how many ran.
    pub fn play<H>(&self, handler: &mut H) -> usize
    where
        H: EventHandler + ?Sized,
    {
        let mut played = 0;
        for (event, when) in self.drain() {
            handler.handle(event, when);
            played += 1;
        }
        played
    }
}
