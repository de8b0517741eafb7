//! Countdown state structure and management
//!
//! The countdown is a local approximation of the backend's authoritative
//! remaining time. Local ticks only ever interpolate downwards; a resync
//! overwrites unconditionally with whatever the backend reports.

/// Local countdown cell shared by the tick and resync tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownState {
    /// Client-side estimate of seconds until the next reminder.
    pub seconds_remaining: u64,
    /// Configured period between reminders, used only for the progress ratio.
    pub interval_seconds: u64,
}

impl CountdownState {
    /// Create an empty countdown, populated by the first resync.
    pub fn new() -> Self {
        Self {
            seconds_remaining: 0,
            interval_seconds: 0,
        }
    }

    /// Apply one local tick, flooring at zero.
    ///
    /// Returns true only on the 1 -> 0 edge. Reaching zero locally is not a
    /// reminder event, it is a prompt to ask the backend again, and the edge
    /// guard keeps a countdown parked at zero from asking every second.
    pub fn tick(&mut self) -> bool {
        let hit_zero = self.seconds_remaining == 1;
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        hit_zero
    }

    /// Snap to the backend-reported remaining time, discarding local drift.
    pub fn resync_remaining(&mut self, seconds_remaining: u64) {
        self.seconds_remaining = seconds_remaining;
    }

    /// Snap both fields, used by the mount-time resync.
    pub fn resync(&mut self, interval_seconds: u64, seconds_remaining: u64) {
        self.interval_seconds = interval_seconds;
        self.seconds_remaining = seconds_remaining;
    }

    /// Normalized progress through the interval, clamped to [0, 1].
    ///
    /// An unconfigured interval yields 0 rather than dividing by zero.
    pub fn progress_ratio(&self) -> f64 {
        if self.interval_seconds == 0 {
            return 0.0;
        }
        let elapsed = self.interval_seconds.saturating_sub(self.seconds_remaining);
        (elapsed as f64 / self.interval_seconds as f64).clamp(0.0, 1.0)
    }

    /// Human-readable remaining time for display.
    pub fn display(&self) -> String {
        format_remaining(self.seconds_remaining)
    }
}

impl Default for CountdownState {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a remaining-seconds value as `Hh Mm`, `Mm Ss`, or `Ss`.
pub fn format_remaining(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_decrements_and_floors_at_zero() {
        let mut countdown = CountdownState {
            seconds_remaining: 2,
            interval_seconds: 60,
        };
        assert!(!countdown.tick());
        assert_eq!(countdown.seconds_remaining, 1);
        assert!(countdown.tick());
        assert_eq!(countdown.seconds_remaining, 0);
        // Parked at zero: no further edges, no underflow.
        assert!(!countdown.tick());
        assert_eq!(countdown.seconds_remaining, 0);
    }

    #[test]
    fn local_ticks_never_increase_remaining() {
        let mut countdown = CountdownState {
            seconds_remaining: 5,
            interval_seconds: 60,
        };
        let mut previous = countdown.seconds_remaining;
        for _ in 0..10 {
            countdown.tick();
            assert!(countdown.seconds_remaining <= previous);
            previous = countdown.seconds_remaining;
        }
    }

    #[test]
    fn resync_overwrites_local_drift_exactly() {
        let mut countdown = CountdownState {
            seconds_remaining: 42,
            interval_seconds: 3600,
        };
        countdown.tick();
        countdown.tick();
        countdown.resync_remaining(3599);
        assert_eq!(countdown.seconds_remaining, 3599);

        countdown.resync(1800, 1234);
        assert_eq!(countdown.interval_seconds, 1800);
        assert_eq!(countdown.seconds_remaining, 1234);
    }

    #[test]
    fn progress_ratio_stays_in_unit_range() {
        let mut countdown = CountdownState {
            seconds_remaining: 3600,
            interval_seconds: 3600,
        };
        assert_eq!(countdown.progress_ratio(), 0.0);

        countdown.seconds_remaining = 1800;
        assert!((countdown.progress_ratio() - 0.5).abs() < f64::EPSILON);

        countdown.seconds_remaining = 0;
        assert_eq!(countdown.progress_ratio(), 1.0);

        // A resync can report more remaining than the interval; still clamped.
        countdown.seconds_remaining = 7200;
        assert_eq!(countdown.progress_ratio(), 0.0);
    }

    #[test]
    fn zero_interval_yields_zero_ratio() {
        let countdown = CountdownState {
            seconds_remaining: 30,
            interval_seconds: 0,
        };
        assert_eq!(countdown.progress_ratio(), 0.0);
    }

    #[test]
    fn full_hour_scenario_counts_down_to_zero_edge() {
        let mut countdown = CountdownState::new();
        countdown.resync(3600, 3600);
        assert_eq!(countdown.progress_ratio(), 0.0);
        assert_eq!(countdown.display(), "1h 0m");

        let mut edges = 0;
        for _ in 0..3600 {
            if countdown.tick() {
                edges += 1;
            }
        }
        assert_eq!(edges, 1);
        assert_eq!(countdown.progress_ratio(), 1.0);
        assert_eq!(countdown.display(), "0s");
    }

    #[test]
    fn formats_per_magnitude() {
        assert_eq!(format_remaining(3661), "1h 1m");
        assert_eq!(format_remaining(125), "2m 5s");
        assert_eq!(format_remaining(9), "9s");
        assert_eq!(format_remaining(3600), "1h 0m");
        assert_eq!(format_remaining(60), "1m 0s");
        assert_eq!(format_remaining(0), "0s");
    }
}
