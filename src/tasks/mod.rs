//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod phase_notifier;
pub mod session_reaper;

// Re-export main functions
pub use phase_notifier::phase_notifier_task;
pub use session_reaper::session_reaper_task;
