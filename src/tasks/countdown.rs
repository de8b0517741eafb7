//! Countdown reconciliation background tasks
//!
//! Two independent tasks share one mutable countdown cell: a 1 s local tick
//! that interpolates the remaining time downwards, and a resync task that
//! snaps the cell to the backend's authoritative value. The resync runs
//! immediately on mount, every [`RESYNC_PERIOD`] thereafter, and on demand
//! when the local countdown reaches zero. Resync always wins over
//! interpolation.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, sleep, Instant},
};
use tracing::{debug, error, warn};

use crate::{
    backend::Backend,
    state::CountdownState,
};

/// Cadence of the local interpolation tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);
/// Cadence of the periodic backend resync, which doubles as the retry loop
/// after a failed call.
pub const RESYNC_PERIOD: Duration = Duration::from_secs(10);
/// Delay before the post-action resync, giving the backend time to commit its
/// own timer reset first.
pub const SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Owner of the two countdown timers.
///
/// Dropping the handle aborts both tasks, which is what scopes the timers to
/// the Reminder view on every exit path.
#[derive(Debug)]
pub struct CountdownHandle {
    tick: JoinHandle<()>,
    resync: JoinHandle<()>,
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.tick.abort();
        self.resync.abort();
    }
}

/// Mount the countdown engine onto the shared cell.
///
/// The resync task performs its mount-time resync before the first tick can
/// fire (the tick interval starts one period after mount).
pub fn start_countdown<B: Backend>(
    backend: Arc<B>,
    cell: Arc<Mutex<CountdownState>>,
) -> CountdownHandle {
    let (resync_tx, resync_rx) = mpsc::channel(4);

    let resync_backend = Arc::clone(&backend);
    let resync_cell = Arc::clone(&cell);
    let resync = tokio::spawn(async move {
        resync_task(resync_backend, resync_cell, resync_rx).await;
    });

    let tick = tokio::spawn(async move {
        tick_task(cell, resync_tx).await;
    });

    CountdownHandle { tick, resync }
}

/// Detached one-shot resync run shortly after a dismiss/drink action, so the
/// backend's committed timer reset is absorbed into the cell even though the
/// Reminder view (and its periodic timers) is already gone.
pub fn spawn_settle_resync<B: Backend>(
    backend: Arc<B>,
    cell: Arc<Mutex<CountdownState>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        sleep(SETTLE_DELAY).await;
        resync_once(backend.as_ref(), &cell, false).await;
    })
}

/// Local interpolation tick. A 1 -> 0 edge requests an out-of-band resync
/// instead of treating the zero as a reminder event.
async fn tick_task(cell: Arc<Mutex<CountdownState>>, resync_tx: mpsc::Sender<()>) {
    let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    loop {
        ticker.tick().await;

        let hit_zero = match cell.lock() {
            Ok(mut countdown) => countdown.tick(),
            Err(e) => {
                error!("Countdown cell lock poisoned, stopping tick task: {}", e);
                return;
            }
        };

        if hit_zero {
            debug!("Local countdown reached zero, requesting out-of-band resync");
            // A full queue means a resync is already pending, which is enough.
            let _ = resync_tx.try_send(());
        }
    }
}

/// Authoritative resync loop: once immediately, then periodically and on
/// demand.
async fn resync_task<B: Backend>(
    backend: Arc<B>,
    cell: Arc<Mutex<CountdownState>>,
    mut on_demand: mpsc::Receiver<()>,
) {
    // Mount-time resync also fetches the configured interval; later resyncs
    // only re-query the remaining time.
    resync_once(backend.as_ref(), &cell, true).await;

    let mut ticker = interval_at(Instant::now() + RESYNC_PERIOD, RESYNC_PERIOD);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                resync_once(backend.as_ref(), &cell, false).await;
            }
            Some(()) = on_demand.recv() => {
                resync_once(backend.as_ref(), &cell, false).await;
            }
        }
    }
}

/// One resync round trip. On failure the cell keeps its last known value and
/// the countdown degrades to pure local interpolation until the next round.
async fn resync_once<B: Backend>(
    backend: &B,
    cell: &Mutex<CountdownState>,
    fetch_interval: bool,
) {
    let interval_seconds = if fetch_interval {
        match backend.get_interval().await {
            Ok(secs) => Some(secs),
            Err(e) => {
                warn!("Failed to fetch configured interval: {}", e);
                None
            }
        }
    } else {
        None
    };

    match backend.get_remaining_seconds().await {
        Ok(remaining) => match cell.lock() {
            Ok(mut countdown) => {
                match interval_seconds {
                    Some(interval_seconds) => countdown.resync(interval_seconds, remaining),
                    None => countdown.resync_remaining(remaining),
                }
                debug!(
                    "Resynced countdown: {}s remaining of {}s",
                    countdown.seconds_remaining, countdown.interval_seconds
                );
            }
            Err(e) => error!("Countdown cell lock poisoned during resync: {}", e),
        },
        Err(e) => {
            warn!("Resync failed, keeping last known countdown: {}", e);
        }
    }
}
