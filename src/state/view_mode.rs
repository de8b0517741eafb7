//! View-mode state machine
//!
//! The set of screens the frontend can display is modeled as a pure state
//! machine: `transition(mode, trigger)` returns the next mode plus the side
//! effects the controller must carry out. Keeping the function pure means the
//! whole table is unit-testable without a live display surface.

use serde::Serialize;

/// The mode a screen can be restored to when leaving Settings.
///
/// Settings can be entered from either Startup or Reminder, and never from
/// itself, so the restore target is a strict subset of [`Mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnMode {
    Startup,
    Reminder,
}

/// The mutually-exclusive set of screens. Exactly one is active at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Brief splash shown at process start, auto-completes after a fixed dwell.
    Startup,
    /// The hydration reminder card is in the foreground.
    Reminder,
    /// Interval settings form. `previous` is restored on exit; a reminder-due
    /// arriving while here is queued (at most one) in `pending_reminder` and
    /// applied on exit instead of being dropped.
    Settings {
        previous: ReturnMode,
        pending_reminder: bool,
    },
    /// Display surface retracted, waiting for the next reminder.
    Hidden,
}

impl Mode {
    /// Flat label for status reporting.
    pub fn label(&self) -> ModeLabel {
        match self {
            Mode::Startup => ModeLabel::Startup,
            Mode::Reminder => ModeLabel::Reminder,
            Mode::Settings { .. } => ModeLabel::Settings,
            Mode::Hidden => ModeLabel::Hidden,
        }
    }

    /// Whether the countdown engine should be running in this mode.
    pub fn wants_countdown(&self) -> bool {
        matches!(self, Mode::Reminder)
    }
}

/// Serializable view of [`Mode`] without the Settings bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeLabel {
    Startup,
    Reminder,
    Settings,
    Hidden,
}

/// Every external stimulus that can move the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The startup dwell time elapsed.
    DwellElapsed,
    /// Backend pushed a reminder-due event.
    ReminderDue,
    /// User pressed "Later".
    Dismiss,
    /// User pressed "I Drank Water".
    Drink,
    /// User asked for the settings screen.
    OpenSettings,
    /// User saved the settings draft.
    SettingsSave,
    /// User left settings without saving.
    SettingsBack,
    /// User asked to close the startup screen.
    Close,
}

/// Side effects the controller must execute after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Ask the backend to retract the foreground surface.
    HideDisplay,
    /// Schedule the short-delay resync that absorbs a backend timer reset.
    SettleResync,
    /// Collapse the settings draft and persist it to the backend.
    PersistDraft,
    /// Throw the settings draft away.
    DiscardDraft,
}

/// Result of applying a trigger: the next mode and the effects to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: Mode,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(next: Mode) -> Self {
        Self {
            next,
            effects: Vec::new(),
        }
    }

    fn with(next: Mode, effects: &[Effect]) -> Self {
        Self {
            next,
            effects: effects.to_vec(),
        }
    }
}

impl From<ReturnMode> for Mode {
    fn from(value: ReturnMode) -> Self {
        match value {
            ReturnMode::Startup => Mode::Startup,
            ReturnMode::Reminder => Mode::Reminder,
        }
    }
}

/// Pure transition function for the view-mode machine.
///
/// Any (mode, trigger) pair not covered by the table is ignored: the mode is
/// returned unchanged with no effects. Ignoring instead of erroring is what
/// makes duplicate or stray backend events harmless.
pub fn transition(current: Mode, trigger: Trigger) -> Transition {
    match (current, trigger) {
        // Startup runs its fixed dwell and retracts, or hands off to settings.
        (Mode::Startup, Trigger::DwellElapsed) => {
            Transition::with(Mode::Hidden, &[Effect::HideDisplay])
        }
        (Mode::Startup, Trigger::Close) => Transition::with(Mode::Hidden, &[Effect::HideDisplay]),
        (Mode::Startup, Trigger::OpenSettings) => Transition::to(Mode::Settings {
            previous: ReturnMode::Startup,
            pending_reminder: false,
        }),

        // The backend is the only thing that can surface the reminder.
        (Mode::Hidden, Trigger::ReminderDue) => Transition::to(Mode::Reminder),
        // Duplicate delivery while already showing: no-op by construction.
        (Mode::Reminder, Trigger::ReminderDue) => Transition::to(Mode::Reminder),

        (Mode::Reminder, Trigger::Dismiss) => {
            Transition::with(Mode::Hidden, &[Effect::HideDisplay, Effect::SettleResync])
        }
        (Mode::Reminder, Trigger::Drink) => {
            Transition::with(Mode::Hidden, &[Effect::HideDisplay, Effect::SettleResync])
        }
        (Mode::Reminder, Trigger::OpenSettings) => Transition::to(Mode::Settings {
            previous: ReturnMode::Reminder,
            pending_reminder: false,
        }),

        // A reminder arriving mid-settings is queued, never dropped. Queue
        // depth is one: the flag is already true on a second delivery.
        (Mode::Settings { previous, .. }, Trigger::ReminderDue) => Transition::to(Mode::Settings {
            previous,
            pending_reminder: true,
        }),
        (
            Mode::Settings {
                previous,
                pending_reminder,
            },
            Trigger::SettingsSave,
        ) => Transition::with(exit_settings(previous, pending_reminder), &[Effect::PersistDraft]),
        (
            Mode::Settings {
                previous,
                pending_reminder,
            },
            Trigger::SettingsBack,
        ) => Transition::with(exit_settings(previous, pending_reminder), &[Effect::DiscardDraft]),

        // Everything else is not a valid trigger for the current mode.
        (mode, _) => Transition::to(mode),
    }
}

/// Where leaving Settings lands: the queued reminder wins over the mode the
/// user came from.
fn exit_settings(previous: ReturnMode, pending_reminder: bool) -> Mode {
    if pending_reminder {
        Mode::Reminder
    } else {
        previous.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TRIGGERS: [Trigger; 8] = [
        Trigger::DwellElapsed,
        Trigger::ReminderDue,
        Trigger::Dismiss,
        Trigger::Drink,
        Trigger::OpenSettings,
        Trigger::SettingsSave,
        Trigger::SettingsBack,
        Trigger::Close,
    ];

    fn settings_from(previous: ReturnMode) -> Mode {
        Mode::Settings {
            previous,
            pending_reminder: false,
        }
    }

    #[test]
    fn startup_dwell_hides_display() {
        let t = transition(Mode::Startup, Trigger::DwellElapsed);
        assert_eq!(t.next, Mode::Hidden);
        assert_eq!(t.effects, vec![Effect::HideDisplay]);
    }

    #[test]
    fn startup_close_hides_display() {
        let t = transition(Mode::Startup, Trigger::Close);
        assert_eq!(t.next, Mode::Hidden);
        assert_eq!(t.effects, vec![Effect::HideDisplay]);
    }

    #[test]
    fn hidden_reminder_due_shows_reminder() {
        let t = transition(Mode::Hidden, Trigger::ReminderDue);
        assert_eq!(t.next, Mode::Reminder);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn reminder_due_is_idempotent_in_reminder() {
        let first = transition(Mode::Hidden, Trigger::ReminderDue);
        let second = transition(first.next, Trigger::ReminderDue);
        assert_eq!(second.next, Mode::Reminder);
        assert!(second.effects.is_empty());
    }

    #[test]
    fn dismiss_and_drink_hide_and_schedule_settle_resync() {
        for trigger in [Trigger::Dismiss, Trigger::Drink] {
            let t = transition(Mode::Reminder, trigger);
            assert_eq!(t.next, Mode::Hidden);
            assert_eq!(t.effects, vec![Effect::HideDisplay, Effect::SettleResync]);
        }
    }

    #[test]
    fn previous_mode_round_trips_from_startup() {
        let entered = transition(Mode::Startup, Trigger::OpenSettings);
        assert_eq!(entered.next, settings_from(ReturnMode::Startup));
        let back = transition(entered.next, Trigger::SettingsBack);
        assert_eq!(back.next, Mode::Startup);
        assert_eq!(back.effects, vec![Effect::DiscardDraft]);
    }

    #[test]
    fn previous_mode_round_trips_from_reminder() {
        let entered = transition(Mode::Reminder, Trigger::OpenSettings);
        assert_eq!(entered.next, settings_from(ReturnMode::Reminder));
        let back = transition(entered.next, Trigger::SettingsBack);
        assert_eq!(back.next, Mode::Reminder);
    }

    #[test]
    fn save_persists_draft_and_restores_previous_mode() {
        let entered = transition(Mode::Startup, Trigger::OpenSettings);
        let saved = transition(entered.next, Trigger::SettingsSave);
        assert_eq!(saved.next, Mode::Startup);
        assert_eq!(saved.effects, vec![Effect::PersistDraft]);
    }

    #[test]
    fn reminder_due_in_settings_is_queued_not_dropped() {
        let entered = transition(Mode::Startup, Trigger::OpenSettings);
        let queued = transition(entered.next, Trigger::ReminderDue);
        assert_eq!(
            queued.next,
            Mode::Settings {
                previous: ReturnMode::Startup,
                pending_reminder: true,
            }
        );
        assert!(queued.effects.is_empty());

        // Both exits land on the queued reminder instead of the entry mode.
        let back = transition(queued.next, Trigger::SettingsBack);
        assert_eq!(back.next, Mode::Reminder);
        let saved = transition(queued.next, Trigger::SettingsSave);
        assert_eq!(saved.next, Mode::Reminder);
    }

    #[test]
    fn duplicate_reminder_due_in_settings_queues_at_most_one() {
        let entered = transition(Mode::Reminder, Trigger::OpenSettings);
        let once = transition(entered.next, Trigger::ReminderDue);
        let twice = transition(once.next, Trigger::ReminderDue);
        assert_eq!(once.next, twice.next);
    }

    #[test]
    fn settings_never_remembers_itself() {
        // OpenSettings while already in settings is one of the ignored pairs.
        let entered = transition(Mode::Reminder, Trigger::OpenSettings);
        let again = transition(entered.next, Trigger::OpenSettings);
        assert_eq!(again.next, entered.next);
        assert!(again.effects.is_empty());
    }

    #[test]
    fn invalid_triggers_are_ignored_without_effects() {
        let ignored = [
            (Mode::Startup, Trigger::Dismiss),
            (Mode::Startup, Trigger::Drink),
            (Mode::Startup, Trigger::SettingsSave),
            (Mode::Startup, Trigger::SettingsBack),
            (Mode::Startup, Trigger::ReminderDue),
            (Mode::Hidden, Trigger::DwellElapsed),
            (Mode::Hidden, Trigger::Dismiss),
            (Mode::Hidden, Trigger::Drink),
            (Mode::Hidden, Trigger::OpenSettings),
            (Mode::Hidden, Trigger::Close),
            (Mode::Reminder, Trigger::DwellElapsed),
            (Mode::Reminder, Trigger::Close),
            (settings_from(ReturnMode::Startup), Trigger::DwellElapsed),
            (settings_from(ReturnMode::Startup), Trigger::Dismiss),
            (settings_from(ReturnMode::Reminder), Trigger::Drink),
            (settings_from(ReturnMode::Reminder), Trigger::Close),
        ];
        for (mode, trigger) in ignored {
            let t = transition(mode, trigger);
            assert_eq!(t.next, mode, "{mode:?} + {trigger:?}");
            assert!(t.effects.is_empty(), "{mode:?} + {trigger:?}");
        }
    }

    #[test]
    fn every_pair_lands_in_a_defined_mode() {
        let modes = [
            Mode::Startup,
            Mode::Reminder,
            Mode::Hidden,
            settings_from(ReturnMode::Startup),
            settings_from(ReturnMode::Reminder),
            Mode::Settings {
                previous: ReturnMode::Reminder,
                pending_reminder: true,
            },
        ];
        for mode in modes {
            for trigger in ALL_TRIGGERS {
                let t = transition(mode, trigger);
                // A transition always yields exactly one concrete mode, and a
                // Settings mode never records Settings as its restore target
                // (unrepresentable, but the label check keeps the walk honest).
                let _ = t.next.label();
            }
        }
    }
}
