//! Interval timer core
//!
//! The phase-cycling state machine and the clocks that feed it.

pub mod clock;
pub mod interval_timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use interval_timer::{
    format_time, IntervalTimer, Phase, PhaseDurations, Statistics, Tick, TimerError,
    NOTIFICATION_WINDOW,
};
