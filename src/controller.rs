//! View-mode controller
//!
//! Owns the single mode variable and mediates every transition triggered by
//! user actions or backend-pushed events. The transition table itself is the
//! pure function in [`crate::state::view_mode`]; this type applies its
//! effects: backend calls (fire-and-forget, failures logged), countdown
//! engine mount/unmount, the startup dwell timer, and the settings draft
//! lifecycle.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{
    backend::Backend,
    state::{transition, CountdownState, Effect, Mode, ModeLabel, SettingsDraft, Trigger},
    tasks::countdown::{spawn_settle_resync, start_countdown, CountdownHandle},
};

/// User-originated actions, one per entry point the presentation layer has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// "Later" on the reminder card.
    Dismiss,
    /// "I Drank Water" on the reminder card.
    Drink,
    /// Close request from the startup screen.
    Close,
    /// Open the settings screen.
    OpenSettings,
    /// Leave settings without saving.
    SettingsBack,
    /// Collapse and persist the draft, then leave settings.
    SettingsSave,
    /// Replace the draft fields (clamped at the boundary).
    UpdateDraft { hours: u64, minutes: u64, seconds: u64 },
    /// Apply a quick preset to the draft by label.
    ApplyPreset { label: String },
}

impl UserAction {
    fn name(&self) -> &'static str {
        match self {
            UserAction::Dismiss => "dismiss",
            UserAction::Drink => "drink",
            UserAction::Close => "close",
            UserAction::OpenSettings => "settings-open",
            UserAction::SettingsBack => "settings-back",
            UserAction::SettingsSave => "settings-save",
            UserAction::UpdateDraft { .. } => "settings-draft",
            UserAction::ApplyPreset { .. } => "settings-preset",
        }
    }
}

/// Messages consumed by the controller event loop. Everything that can move
/// the state machine arrives here, so transitions are serialized by
/// construction.
#[derive(Debug)]
pub enum ControllerEvent {
    /// A user action with a reply channel for the post-action snapshot.
    Action {
        action: UserAction,
        reply: oneshot::Sender<StatusSnapshot>,
    },
    /// Read-only status query.
    Query {
        reply: oneshot::Sender<StatusSnapshot>,
    },
    /// Backend-pushed reminder-due signal.
    ReminderDue,
    /// A startup dwell timer fired. Stale epochs are ignored.
    DwellElapsed { epoch: u64 },
}

/// Point-in-time view of the controller for status reporting.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub mode: ModeLabel,
    pub countdown_active: bool,
    pub seconds_remaining: u64,
    pub interval_seconds: u64,
    pub progress: f64,
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<SettingsDraft>,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// The controller instance owned by the event loop task.
#[derive(Debug)]
pub struct ViewModeController<B: Backend> {
    backend: Arc<B>,
    mode: Mode,
    /// Shared countdown cell; outlives individual engine mounts so settle
    /// resyncs and status queries see the last known value.
    cell: Arc<Mutex<CountdownState>>,
    countdown: Option<CountdownHandle>,
    draft: Option<SettingsDraft>,
    /// Weak handle back to the event loop, so in-flight dwell timers never
    /// keep the loop's channel open on shutdown.
    events_tx: mpsc::WeakSender<ControllerEvent>,
    dwell: Duration,
    dwell_epoch: u64,
    last_action: Option<String>,
    last_action_time: Option<DateTime<Utc>>,
}

impl<B: Backend> ViewModeController<B> {
    /// Create the controller in Startup mode. Call [`Self::arm_dwell`] once
    /// the event loop is ready to receive the dwell completion.
    pub fn new(backend: Arc<B>, dwell: Duration, events_tx: mpsc::Sender<ControllerEvent>) -> Self {
        Self {
            backend,
            mode: Mode::Startup,
            cell: Arc::new(Mutex::new(CountdownState::new())),
            countdown: None,
            draft: None,
            events_tx: events_tx.downgrade(),
            dwell,
            dwell_epoch: 0,
            last_action: None,
            last_action_time: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Start (or restart) the fixed startup dwell. Each arming bumps the
    /// epoch so a timer from an earlier Startup entry cannot complete the
    /// current one.
    pub fn arm_dwell(&mut self) {
        self.dwell_epoch += 1;
        let epoch = self.dwell_epoch;
        let dwell = self.dwell;
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            sleep(dwell).await;
            if let Some(tx) = events_tx.upgrade() {
                let _ = tx.send(ControllerEvent::DwellElapsed { epoch }).await;
            }
        });
    }

    pub async fn on_dwell_elapsed(&mut self, epoch: u64) {
        if epoch != self.dwell_epoch {
            debug!("Ignoring stale startup dwell (epoch {})", epoch);
            return;
        }
        self.apply(Trigger::DwellElapsed).await;
    }

    pub async fn on_reminder_due(&mut self) {
        debug!("Reminder-due received in {:?}", self.mode.label());
        self.apply(Trigger::ReminderDue).await;
    }

    /// Single entry point for user actions; returns the post-action snapshot.
    /// Actions that are not valid for the current mode fall through the
    /// ignored-pair arm of the transition table and change nothing.
    pub async fn on_action(&mut self, action: UserAction) -> StatusSnapshot {
        info!("User action: {}", action.name());
        self.last_action = Some(action.name().to_string());
        self.last_action_time = Some(Utc::now());

        match action {
            UserAction::Dismiss => self.apply(Trigger::Dismiss).await,
            UserAction::Drink => {
                // The backend owns persistence; intake is only logged here.
                info!("Water intake recorded");
                self.apply(Trigger::Drink).await;
            }
            UserAction::Close => self.apply(Trigger::Close).await,
            UserAction::OpenSettings => {
                self.apply(Trigger::OpenSettings).await;
                if matches!(self.mode, Mode::Settings { .. }) && self.draft.is_none() {
                    self.draft = Some(self.seed_draft().await);
                }
            }
            UserAction::SettingsBack => self.apply(Trigger::SettingsBack).await,
            UserAction::SettingsSave => self.apply(Trigger::SettingsSave).await,
            UserAction::UpdateDraft {
                hours,
                minutes,
                seconds,
            } => match &mut self.draft {
                Some(draft) => draft.set_fields(hours, minutes, seconds),
                None => debug!("Draft update outside settings mode, ignoring"),
            },
            UserAction::ApplyPreset { label } => match &mut self.draft {
                Some(draft) => {
                    if !draft.apply_preset(&label) {
                        debug!("Unknown settings preset '{}', ignoring", label);
                    }
                }
                None => debug!("Preset apply outside settings mode, ignoring"),
            },
        }

        self.snapshot()
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let countdown = self
            .cell
            .lock()
            .map(|cell| cell.clone())
            .unwrap_or_default();
        StatusSnapshot {
            mode: self.mode.label(),
            countdown_active: self.countdown.is_some(),
            seconds_remaining: countdown.seconds_remaining,
            interval_seconds: countdown.interval_seconds,
            progress: countdown.progress_ratio(),
            display: countdown.display(),
            draft: self.draft,
            last_action: self.last_action.clone(),
            last_action_time: self.last_action_time,
        }
    }

    /// Run one trigger through the pure machine, then execute its effects.
    /// The mode change is committed before any backend call, so a failing
    /// call never blocks the local transition.
    async fn apply(&mut self, trigger: Trigger) {
        let previous = self.mode;
        let transition = transition(self.mode, trigger);
        self.mode = transition.next;

        if previous != self.mode {
            info!("View mode: {:?} -> {:?}", previous.label(), self.mode.label());
        }

        for effect in transition.effects {
            self.run_effect(effect).await;
        }

        self.sync_countdown_mount();
        if self.mode == Mode::Startup && previous != Mode::Startup {
            // Returning from settings restarts the dwell.
            self.arm_dwell();
        }
    }

    async fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::HideDisplay => {
                if let Err(e) = self.backend.hide_display().await {
                    warn!("Failed to hide display, view state already changed: {}", e);
                }
            }
            Effect::SettleResync => {
                // Detached: runs after the engine is unmounted, writing into
                // the shared cell.
                spawn_settle_resync(Arc::clone(&self.backend), Arc::clone(&self.cell));
            }
            Effect::PersistDraft => {
                if let Some(draft) = self.draft.take() {
                    let interval_seconds = draft.interval_seconds();
                    match self.backend.update_interval(interval_seconds).await {
                        Ok(()) => info!("Persisted reminder interval of {}s", interval_seconds),
                        Err(e) => warn!("Failed to persist interval: {}", e),
                    }
                }
            }
            Effect::DiscardDraft => {
                self.draft = None;
            }
        }
    }

    /// Keep the countdown engine mounted exactly while the mode wants it.
    /// Mounting is idempotent per mount: a duplicate reminder-due cannot
    /// create a second pair of timers.
    fn sync_countdown_mount(&mut self) {
        if self.mode.wants_countdown() {
            if self.countdown.is_none() {
                self.countdown = Some(start_countdown(
                    Arc::clone(&self.backend),
                    Arc::clone(&self.cell),
                ));
            }
        } else if self.countdown.take().is_some() {
            debug!("Countdown engine unmounted");
        }
    }

    /// Seed the settings draft from the backend's configured interval,
    /// falling back to the default cadence when the call fails.
    async fn seed_draft(&self) -> SettingsDraft {
        match self.backend.get_interval().await {
            Ok(interval_seconds) => SettingsDraft::from_interval(interval_seconds),
            Err(e) => {
                warn!("Failed to read configured interval, seeding default draft: {}", e);
                SettingsDraft::default()
            }
        }
    }
}
