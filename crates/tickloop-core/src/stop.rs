//! One-shot broadcast stop signal.
//!
//! Built on a crossbeam channel that never carries a message: firing the
//! signal drops the only sender, which disconnects every receiver at
//! once. Receivers therefore observe the stop both by polling and inside
//! `crossbeam_channel::select!`, and there is no way to un-fire it.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};

/// Create a connected stop pair.
///
/// The [`Stopper`] fires the signal; every clone of the [`StopSignal`]
/// observes it.
pub fn stop_signal() -> (Stopper, StopSignal) {
    let (tx, rx) = crossbeam_channel::bounded(0);
    (
        Stopper {
            tx: Arc::new(Mutex::new(Some(tx))),
        },
        StopSignal { rx },
    )
}

/// Firing side of a stop signal.
///
/// Clones share the same signal. The signal also fires when the last
/// clone is dropped, so a loop can never outlive everyone able to stop it.
#[derive(Clone, Debug)]
pub struct Stopper {
    tx: Arc<Mutex<Option<Sender<()>>>>,
}

impl Stopper {
    /// Fire the signal. Returns `true` if this call fired it, `false` if
    /// it had already been fired.
    pub fn stop(&self) -> bool {
        let fired = self
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some();
        if fired {
            tracing::debug!("stop signal fired");
        }
        fired
    }

    /// Whether the signal has been fired.
    pub fn is_stopped(&self) -> bool {
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

/// Observing side of a stop signal. Cheap to clone.
#[derive(Clone, Debug)]
pub struct StopSignal {
    rx: Receiver<()>,
}

impl StopSignal {
    /// Whether the signal has fired.
    pub fn is_stopped(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Block until the signal fires.
    pub fn wait(&self) {
        // Nothing is ever sent; recv only returns on disconnect.
        let _ = self.rx.recv();
    }

    /// Block until the signal fires or `timeout` elapses.
    ///
    /// Returns `true` if the signal fired.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        matches!(
            self.rx.recv_timeout(timeout),
            Err(RecvTimeoutError::Disconnected)
        )
    }

    /// The underlying receiver, for use in `crossbeam_channel::select!`.
    ///
    /// It becomes ready (disconnected) exactly when the signal fires.
    pub fn receiver(&self) -> &Receiver<()> {
        &self.rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn starts_unfired() {
        let (stopper, signal) = stop_signal();
        assert!(!stopper.is_stopped());
        assert!(!signal.is_stopped());
    }

    #[test]
    fn stop_fires_once() {
        let (stopper, signal) = stop_signal();
        assert!(stopper.stop());
        assert!(!stopper.stop(), "second stop must report already fired");
        assert!(signal.is_stopped());
        assert!(stopper.is_stopped());
    }

    #[test]
    fn all_clones_observe() {
        let (stopper, signal) = stop_signal();
        let a = signal.clone();
        let b = signal.clone();
        stopper.clone().stop();
        assert!(a.is_stopped());
        assert!(b.is_stopped());
        assert!(signal.is_stopped());
    }

    #[test]
    fn dropping_last_stopper_fires() {
        let (stopper, signal) = stop_signal();
        let extra = stopper.clone();
        drop(stopper);
        assert!(!signal.is_stopped(), "a live clone keeps the signal armed");
        drop(extra);
        assert!(signal.is_stopped());
    }

    #[test]
    fn wait_timeout_expires_when_unfired() {
        let (_stopper, signal) = stop_signal();
        assert!(!signal.wait_timeout(Duration::from_millis(5)));
    }

    #[test]
    fn wait_wakes_on_stop_from_other_thread() {
        let (stopper, signal) = stop_signal();
        let start = Instant::now();
        let h = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            stopper.stop();
        });
        assert!(signal.wait_timeout(Duration::from_secs(5)));
        assert!(start.elapsed() < Duration::from_secs(5));
        signal.wait();
        h.join().unwrap();
    }

    #[test]
    fn receiver_is_select_ready_after_stop() {
        let (stopper, signal) = stop_signal();
        stopper.stop();
        let fired = crossbeam_channel::select! {
            recv(signal.receiver()) -> msg => msg.is_err(),
            default(Duration::from_secs(1)) => false,
        };
        assert!(fired);
    }
}
