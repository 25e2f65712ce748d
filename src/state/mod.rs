//! State management module
//!
//! Session registry and the display snapshots served to clients.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, PhaseEvent, Session, StateError};
pub use timer_state::{DurationSettings, TimerSnapshot};
