//! Background tasks module
//!
//! This module contains the long-running tasks of the daemon: the view-mode
//! controller event loop and the countdown reconciliation timers.

pub mod controller;
pub mod countdown;

// Re-export main functions
pub use controller::controller_task;
pub use countdown::{spawn_settle_resync, start_countdown, CountdownHandle};
