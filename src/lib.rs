//! Drink Water - A state-managed hydration reminder companion daemon
//!
//! This library keeps a foreground reminder display in sync with the backend
//! timer that owns scheduling truth: a view-mode state machine mediates which
//! screen is visible, and a countdown reconciliation engine interpolates the
//! remaining time locally while periodically snapping to the backend's value.

pub mod api;
pub mod backend;
pub mod config;
pub mod controller;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use backend::{Backend, LocalBackend};
pub use config::Config;
pub use controller::ViewModeController;
pub use utils::signals::shutdown_signal;
