//! In-memory settings form state
//!
//! The draft holds unsaved user input for the reminder interval. It lives only
//! while the settings screen is open: seeded from the backend's configured
//! interval on entry, collapsed to a single seconds value on save, and thrown
//! away on back.

use serde::{Deserialize, Serialize};

/// Upper bound for the hours field.
pub const MAX_HOURS: u64 = 24;
/// Upper bound for the minutes and seconds fields.
pub const MAX_MINUTES_SECONDS: u64 = 59;
/// Shortest interval the client will ask the backend to persist.
pub const MIN_INTERVAL_SECONDS: u64 = 10;

/// Quick-pick intervals offered by the settings screen, as (label, seconds).
pub const PRESETS: [(&str, u64); 5] = [
    ("15m", 15 * 60),
    ("30m", 30 * 60),
    ("45m", 45 * 60),
    ("1h", 60 * 60),
    ("2h", 2 * 60 * 60),
];

/// Transient interval form state, each field independently bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsDraft {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl SettingsDraft {
    /// Decompose a configured interval into form fields.
    pub fn from_interval(interval_seconds: u64) -> Self {
        Self {
            hours: (interval_seconds / 3600).min(MAX_HOURS),
            minutes: (interval_seconds % 3600) / 60,
            seconds: interval_seconds % 60,
        }
    }

    /// Replace all three fields, clamping each to its bound. Out-of-range
    /// input is never an error, just snapped back into range.
    pub fn set_fields(&mut self, hours: u64, minutes: u64, seconds: u64) {
        self.hours = hours.min(MAX_HOURS);
        self.minutes = minutes.min(MAX_MINUTES_SECONDS);
        self.seconds = seconds.min(MAX_MINUTES_SECONDS);
    }

    /// Apply a quick preset by label. Unknown labels leave the draft alone.
    pub fn apply_preset(&mut self, label: &str) -> bool {
        match PRESETS.iter().find(|(name, _)| *name == label) {
            Some((_, total)) => {
                *self = Self::from_interval(*total);
                true
            }
            None => false,
        }
    }

    /// Collapse to the interval sent to the backend, floored at the minimum.
    /// The backend re-clamps independently; this is only the client-side bound.
    pub fn interval_seconds(&self) -> u64 {
        let total = self.hours * 3600 + self.minutes * 60 + self.seconds;
        total.max(MIN_INTERVAL_SECONDS)
    }
}

impl Default for SettingsDraft {
    /// One hour, the default reminder cadence.
    fn default() -> Self {
        Self {
            hours: 1,
            minutes: 0,
            seconds: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposes_interval_into_fields() {
        let draft = SettingsDraft::from_interval(3661);
        assert_eq!(draft.hours, 1);
        assert_eq!(draft.minutes, 1);
        assert_eq!(draft.seconds, 1);
    }

    #[test]
    fn fields_clamp_at_their_bounds() {
        let mut draft = SettingsDraft::default();
        draft.set_fields(99, 99, 99);
        assert_eq!(draft.hours, 24);
        assert_eq!(draft.minutes, 59);
        assert_eq!(draft.seconds, 59);
    }

    #[test]
    fn tiny_interval_is_floored_to_minimum_on_save() {
        let mut draft = SettingsDraft::default();
        draft.set_fields(0, 0, 3);
        assert_eq!(draft.interval_seconds(), 10);
    }

    #[test]
    fn round_trips_a_normal_interval() {
        let mut draft = SettingsDraft::default();
        draft.set_fields(1, 30, 0);
        assert_eq!(draft.interval_seconds(), 5400);
        assert_eq!(SettingsDraft::from_interval(5400), draft);
    }

    #[test]
    fn presets_decompose_into_fields() {
        let mut draft = SettingsDraft::default();
        assert!(draft.apply_preset("45m"));
        assert_eq!(draft.hours, 0);
        assert_eq!(draft.minutes, 45);
        assert_eq!(draft.seconds, 0);
        assert_eq!(draft.interval_seconds(), 2700);

        assert!(draft.apply_preset("2h"));
        assert_eq!(draft.hours, 2);
        assert_eq!(draft.interval_seconds(), 7200);
    }

    #[test]
    fn unknown_preset_leaves_draft_untouched() {
        let mut draft = SettingsDraft::from_interval(900);
        assert!(!draft.apply_preset("7h"));
        assert_eq!(draft.interval_seconds(), 900);
    }
}
