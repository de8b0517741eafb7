//! State management module
//!
//! This module contains the pure state types of the core: the view-mode state
//! machine, the countdown cell, and the transient settings draft.

pub mod countdown;
pub mod settings_draft;
pub mod view_mode;

// Re-export main types
pub use countdown::{format_remaining, CountdownState};
pub use settings_draft::SettingsDraft;
pub use view_mode::{transition, Effect, Mode, ModeLabel, ReturnMode, Transition, Trigger};
