//! Display snapshot of a single timer

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::timer::{format_time, IntervalTimer, Phase, Statistics};

/// Configured durations split back into the minute/second inputs a UI shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationSettings {
    pub work_minutes: u64,
    pub work_seconds: u64,
    pub break_minutes: u64,
    pub break_seconds: u64,
}

/// Everything the presentation layer renders on one refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub running: bool,
    pub phase: Phase,
    pub remaining_seconds: u64,
    pub remaining_display: String,
    pub progress: f64,
    pub progress_percent: u8,
    pub loop_count: u64,
    pub statistics: Statistics,
    pub notification_active: bool,
    pub durations: DurationSettings,
}

impl TimerSnapshot {
    /// Read display values from a timer at `now`.
    ///
    /// Does not advance the timer; callers tick first.
    pub fn capture(timer: &IntervalTimer, now: Instant) -> Self {
        let remaining_seconds = timer.remaining(now).as_secs();
        let progress = timer.progress_fraction(now);
        let durations = timer.durations();
        let work = durations.work.as_secs();
        let rest = durations.rest.as_secs();

        Self {
            running: timer.is_running(),
            phase: timer.phase(),
            remaining_seconds,
            remaining_display: format_time(remaining_seconds),
            progress,
            progress_percent: (progress * 100.0).round() as u8,
            loop_count: timer.loop_count(),
            statistics: timer.statistics(),
            notification_active: timer.notification_active(now),
            durations: DurationSettings {
                work_minutes: work / 60,
                work_seconds: work % 60,
                break_minutes: rest / 60,
                break_seconds: rest % 60,
            },
        }
    }
}
