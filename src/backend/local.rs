//! In-process reminder scheduler
//!
//! Stand-alone deployments run the scheduling truth inside the daemon: a 1 s
//! check loop that emits reminder-due once the configured interval elapses,
//! re-arming itself on emission. The frontend core still talks to it only
//! through the [`Backend`] trait, so it is interchangeable with a remote one.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{
    sync::broadcast,
    task::JoinHandle,
    time::{interval, Instant},
};
use tracing::{debug, info, warn};

use super::{Backend, BackendError, ReminderEvents};

/// The backend's own minimum interval, enforced independently of any client
/// clamp.
const MIN_INTERVAL_SECONDS: u64 = 10;

/// How often the scheduler checks whether the interval has elapsed.
const CHECK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct SchedulerState {
    /// Configured period between reminders.
    interval_seconds: Mutex<u64>,
    /// When the current period started; reset on emission, on hide, and on
    /// interval updates.
    armed_at: Mutex<Instant>,
    /// Where the configured interval is persisted, if a config dir exists.
    settings_path: Option<PathBuf>,
}

impl SchedulerState {
    fn interval_seconds(&self) -> Result<u64, BackendError> {
        self.interval_seconds
            .lock()
            .map(|secs| *secs)
            .map_err(|e| BackendError::State(format!("interval lock poisoned: {}", e)))
    }

    fn elapsed_seconds(&self) -> Result<u64, BackendError> {
        self.armed_at
            .lock()
            .map(|armed| armed.elapsed().as_secs())
            .map_err(|e| BackendError::State(format!("timer lock poisoned: {}", e)))
    }

    fn rearm(&self) -> Result<(), BackendError> {
        self.armed_at
            .lock()
            .map(|mut armed| *armed = Instant::now())
            .map_err(|e| BackendError::State(format!("timer lock poisoned: {}", e)))
    }
}

/// In-process [`Backend`] implementation owning the reminder timer.
#[derive(Debug)]
pub struct LocalBackend {
    state: Arc<SchedulerState>,
    events_tx: broadcast::Sender<()>,
    scheduler: JoinHandle<()>,
}

impl LocalBackend {
    /// Spawn the scheduler with the given default interval, preferring a
    /// previously persisted interval when one can be read.
    pub fn start(default_interval_seconds: u64) -> Self {
        let settings_path = dirs::config_dir().map(|dir| dir.join("drink-water/settings.json"));
        let interval_seconds = load_persisted_interval(settings_path.as_deref())
            .unwrap_or(default_interval_seconds)
            .max(MIN_INTERVAL_SECONDS);

        info!("Starting reminder scheduler with {}s interval", interval_seconds);

        let state = Arc::new(SchedulerState {
            interval_seconds: Mutex::new(interval_seconds),
            armed_at: Mutex::new(Instant::now()),
            settings_path,
        });
        let (events_tx, _) = broadcast::channel(16);

        let scheduler_state = Arc::clone(&state);
        let scheduler_tx = events_tx.clone();
        let scheduler = tokio::spawn(async move {
            scheduler_loop(scheduler_state, scheduler_tx).await;
        });

        Self {
            state,
            events_tx,
            scheduler,
        }
    }
}

impl Drop for LocalBackend {
    fn drop(&mut self) {
        self.scheduler.abort();
    }
}

impl Backend for LocalBackend {
    async fn get_interval(&self) -> Result<u64, BackendError> {
        self.state.interval_seconds()
    }

    async fn update_interval(&self, interval_seconds: u64) -> Result<(), BackendError> {
        let clamped = interval_seconds.max(MIN_INTERVAL_SECONDS);
        if clamped != interval_seconds {
            warn!(
                "Requested interval {}s below backend minimum, clamped to {}s",
                interval_seconds, clamped
            );
        }

        {
            let mut secs = self
                .state
                .interval_seconds
                .lock()
                .map_err(|e| BackendError::State(format!("interval lock poisoned: {}", e)))?;
            *secs = clamped;
        }
        // A new interval restarts the period from now.
        self.state.rearm()?;
        info!("Reminder interval updated to {}s", clamped);

        if let Some(path) = &self.state.settings_path {
            if let Err(e) = persist_interval(path, clamped).await {
                warn!("Failed to persist interval to {}: {}", path.display(), e);
            }
        }
        Ok(())
    }

    async fn get_remaining_seconds(&self) -> Result<u64, BackendError> {
        let interval_seconds = self.state.interval_seconds()?;
        let elapsed = self.state.elapsed_seconds()?;
        Ok(interval_seconds.saturating_sub(elapsed))
    }

    async fn hide_display(&self) -> Result<(), BackendError> {
        // The RPC surface carries no separate reset call: retracting the
        // display is the point where a dismissal defers the next reminder by
        // a full interval.
        debug!("Display surface retracted, re-arming reminder timer");
        self.state.rearm()
    }

    fn subscribe(&self) -> ReminderEvents {
        ReminderEvents::new(self.events_tx.subscribe())
    }
}

/// 1 s check loop emitting reminder-due when the interval elapses.
async fn scheduler_loop(state: Arc<SchedulerState>, events_tx: broadcast::Sender<()>) {
    let mut ticker = interval(CHECK_PERIOD);
    loop {
        ticker.tick().await;

        let due = match (state.interval_seconds(), state.elapsed_seconds()) {
            (Ok(interval_seconds), Ok(elapsed)) => elapsed >= interval_seconds,
            (Err(e), _) | (_, Err(e)) => {
                warn!("Scheduler check skipped: {}", e);
                continue;
            }
        };

        if due {
            info!("Reminder interval elapsed, emitting reminder-due");
            if let Err(e) = state.rearm() {
                warn!("Failed to re-arm reminder timer: {}", e);
            }
            if events_tx.send(()).is_err() {
                debug!("Reminder due with no subscriber, dropping signal");
            }
        }
    }
}

fn load_persisted_interval(path: Option<&std::path::Path>) -> Option<u64> {
    let path = path?;
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str::<u64>(&content) {
        Ok(secs) => {
            debug!("Loaded persisted interval {}s from {}", secs, path.display());
            Some(secs)
        }
        Err(e) => {
            warn!("Ignoring unreadable settings file {}: {}", path.display(), e);
            None
        }
    }
}

async fn persist_interval(path: &std::path::Path, interval_seconds: u64) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| format!("create config dir: {}", e))?;
    }
    let json = serde_json::to_string(&interval_seconds).map_err(|e| e.to_string())?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| format!("write settings: {}", e))
}
