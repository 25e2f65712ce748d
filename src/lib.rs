//! Interval Timer - work/break phase cycling served over HTTP
//!
//! The [`timer`] module holds the phase-cycling state machine. Everything
//! else is the presentation plumbing around it: one independent timer per
//! client session, polled through a small JSON API.

pub mod config;
pub mod timer;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use timer::{IntervalTimer, Phase, PhaseDurations};
pub use utils::signals::shutdown_signal;
