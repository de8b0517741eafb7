//! Backend interface contract
//!
//! The core consumes, but does not own, a reminder scheduler: the backend
//! decides when the interval has elapsed, answers authoritative remaining-time
//! queries, and persists the configured interval. This module defines that
//! contract as a trait plus the cancellable reminder-due subscription, and
//! ships an in-process implementation in [`local`].

pub mod local;

use std::future::Future;

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::warn;

// Re-export main types
pub use local::LocalBackend;

/// Errors surfaced by backend calls.
///
/// All of them are non-fatal to the caller: the core logs, keeps its last
/// known state, and relies on the next scheduled resync as the retry.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The call never reached the backend or was rejected by it.
    #[error("backend communication failed: {0}")]
    Communication(String),
    /// Backend-side state was unreadable (poisoned lock).
    #[error("backend state unavailable: {0}")]
    State(String),
}

/// The RPC surface the core depends on.
///
/// Argument and return shapes are the contract; the transport behind them is
/// the implementation's business.
pub trait Backend: Send + Sync + 'static {
    /// Read the configured interval between reminders, in seconds.
    fn get_interval(&self) -> impl Future<Output = Result<u64, BackendError>> + Send;

    /// Persist a new interval and reschedule the backend timer from it. The
    /// backend clamps the minimum bound independently of the client clamp.
    fn update_interval(
        &self,
        interval_seconds: u64,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Authoritative countdown snapshot, in seconds (>= 0).
    fn get_remaining_seconds(&self) -> impl Future<Output = Result<u64, BackendError>> + Send;

    /// Request the backend retract the foreground display surface.
    fn hide_display(&self) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Register for reminder-due events. Dropping the returned subscription
    /// deregisters the handler.
    fn subscribe(&self) -> ReminderEvents;
}

/// Cancellable subscription to the backend's zero-payload reminder-due signal.
///
/// Delivery is at-most-once per backend trigger, but the consumer tolerates
/// both duplicates and gaps, so a lagged channel collapses any number of
/// missed signals into a single delivery.
#[derive(Debug)]
pub struct ReminderEvents {
    rx: broadcast::Receiver<()>,
}

impl ReminderEvents {
    pub fn new(rx: broadcast::Receiver<()>) -> Self {
        Self { rx }
    }

    /// Wait for the next reminder-due signal. Returns `None` once the backend
    /// side of the channel is gone, which ends the consumer's event loop.
    pub async fn recv(&mut self) -> Option<()> {
        match self.rx.recv().await {
            Ok(()) => Some(()),
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!("Reminder event stream lagged, collapsing {} signals into one", missed);
                Some(())
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted backend used by the countdown-engine and controller tests.

    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use tokio::sync::broadcast;

    use super::{Backend, BackendError, ReminderEvents};

    #[derive(Debug)]
    pub struct MockBackend {
        interval: Mutex<u64>,
        remaining: Mutex<u64>,
        fail_queries: AtomicBool,
        pub remaining_calls: AtomicUsize,
        pub hide_calls: AtomicUsize,
        pub updates: Mutex<Vec<u64>>,
        events_tx: broadcast::Sender<()>,
    }

    impl MockBackend {
        pub fn new(interval: u64, remaining: u64) -> Self {
            let (events_tx, _) = broadcast::channel(16);
            Self {
                interval: Mutex::new(interval),
                remaining: Mutex::new(remaining),
                fail_queries: AtomicBool::new(false),
                remaining_calls: AtomicUsize::new(0),
                hide_calls: AtomicUsize::new(0),
                updates: Mutex::new(Vec::new()),
                events_tx,
            }
        }

        pub fn set_remaining(&self, remaining: u64) {
            *self.remaining.lock().unwrap() = remaining;
        }

        pub fn set_fail_queries(&self, fail: bool) {
            self.fail_queries.store(fail, Ordering::SeqCst);
        }

        pub fn emit_reminder_due(&self) {
            let _ = self.events_tx.send(());
        }
    }

    impl Backend for MockBackend {
        async fn get_interval(&self) -> Result<u64, BackendError> {
            if self.fail_queries.load(Ordering::SeqCst) {
                return Err(BackendError::Communication("scripted failure".into()));
            }
            Ok(*self.interval.lock().unwrap())
        }

        async fn update_interval(&self, interval_seconds: u64) -> Result<(), BackendError> {
            *self.interval.lock().unwrap() = interval_seconds;
            self.updates.lock().unwrap().push(interval_seconds);
            Ok(())
        }

        async fn get_remaining_seconds(&self) -> Result<u64, BackendError> {
            self.remaining_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_queries.load(Ordering::SeqCst) {
                return Err(BackendError::Communication("scripted failure".into()));
            }
            Ok(*self.remaining.lock().unwrap())
        }

        async fn hide_display(&self) -> Result<(), BackendError> {
            self.hide_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn subscribe(&self) -> ReminderEvents {
            ReminderEvents::new(self.events_tx.subscribe())
        }
    }
}
