//! Work/break phase-cycling state machine
//!
//! All time arithmetic lives here. The timer never reads a clock itself;
//! every time-dependent operation takes the caller's `now`, which keeps the
//! state machine deterministic under test.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// How long the "phase complete" notification stays active after a switch
pub const NOTIFICATION_WINDOW: Duration = Duration::from_secs(3);

/// Default work phase length (50:00)
pub const DEFAULT_WORK_SECONDS: u64 = 50 * 60;

/// Default break phase length (10:00)
pub const DEFAULT_BREAK_SECONDS: u64 = 10 * 60;

/// Errors raised at the configuration boundary
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// The two alternating phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Work,
    Break,
}

impl Phase {
    /// The phase that follows this one
    pub fn toggled(self) -> Self {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Break => "break",
        }
    }
}

/// Configured length of each phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    pub work: Duration,
    pub rest: Duration,
}

impl PhaseDurations {
    /// Build from signed second counts, rejecting negative values
    pub fn from_secs(work_seconds: i64, break_seconds: i64) -> Result<Self, TimerError> {
        let work = u64::try_from(work_seconds).map_err(|_| {
            TimerError::InvalidConfiguration(format!(
                "work duration must not be negative (got {}s)",
                work_seconds
            ))
        })?;
        let rest = u64::try_from(break_seconds).map_err(|_| {
            TimerError::InvalidConfiguration(format!(
                "break duration must not be negative (got {}s)",
                break_seconds
            ))
        })?;

        Ok(Self {
            work: Duration::from_secs(work),
            rest: Duration::from_secs(rest),
        })
    }

    /// Combine separate minute and second inputs into phase totals
    pub fn from_parts(work_minutes: u32, work_seconds: u32, break_minutes: u32, break_seconds: u32) -> Self {
        Self {
            work: Duration::from_secs(u64::from(work_minutes) * 60 + u64::from(work_seconds)),
            rest: Duration::from_secs(u64::from(break_minutes) * 60 + u64::from(break_seconds)),
        }
    }

    /// Length of the given phase
    pub fn of(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Work => self.work,
            Phase::Break => self.rest,
        }
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            work: Duration::from_secs(DEFAULT_WORK_SECONDS),
            rest: Duration::from_secs(DEFAULT_BREAK_SECONDS),
        }
    }
}

/// Outcome of a single poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub phase: Phase,
    pub remaining: Duration,
    /// Whether this tick switched phase
    pub switched: bool,
}

/// Nominal totals credited per completed loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub completed_loops: u64,
    pub total_work_minutes: f64,
    pub total_break_minutes: f64,
}

/// One independent interval timer
#[derive(Debug, Clone, Default)]
pub struct IntervalTimer {
    is_running: bool,
    phase: Phase,
    phase_started_at: Option<Instant>,
    running_since: Option<Instant>,
    durations: PhaseDurations,
    loop_count: u64,
    notification_until: Option<Instant>,
}

impl IntervalTimer {
    /// Stopped timer with the default 50:00 / 10:00 durations
    pub fn new() -> Self {
        Self::default()
    }

    /// Stopped timer with custom durations
    pub fn with_durations(durations: PhaseDurations) -> Self {
        Self {
            durations,
            ..Self::default()
        }
    }

    /// Replace the phase durations. Ignored while running; returns whether
    /// the new durations were applied.
    pub fn configure(&mut self, durations: PhaseDurations) -> bool {
        if self.is_running {
            debug!("Ignoring duration change while timer is running");
            return false;
        }
        self.durations = durations;
        true
    }

    /// Begin a fresh work phase at `now`.
    ///
    /// Calling this while already running restarts the clock and forces the
    /// phase back to work.
    pub fn start(&mut self, now: Instant) {
        self.is_running = true;
        self.phase = Phase::Work;
        self.phase_started_at = Some(now);
        self.running_since = Some(now);
    }

    /// Halt the timer, keeping loop count, phase and durations.
    ///
    /// A later `start` begins a new work phase; the interrupted phase is not
    /// resumed.
    pub fn stop(&mut self) {
        self.is_running = false;
        self.phase_started_at = None;
        self.running_since = None;
    }

    /// Same as [`IntervalTimer::stop`]
    pub fn pause(&mut self) {
        self.stop();
    }

    /// Return to the initial stopped state, keeping only the durations
    pub fn reset(&mut self) {
        *self = Self::with_durations(self.durations);
    }

    /// Advance the state machine to `now`.
    ///
    /// Switches phase at most once per call. If the caller polls less often
    /// than a phase lasts, the extra phases are cleared one tick at a time
    /// and overshoot is never carried into the new phase.
    pub fn tick(&mut self, now: Instant) -> Tick {
        let Some(started) = self.phase_started_at.filter(|_| self.is_running) else {
            return Tick {
                phase: self.phase,
                remaining: Duration::ZERO,
                switched: false,
            };
        };

        let mut remaining = self.phase_total().saturating_sub(now.saturating_duration_since(started));
        let mut switched = false;

        if remaining.is_zero() {
            self.switch_phase(now);
            remaining = self.phase_total();
            switched = true;
        }

        Tick {
            phase: self.phase,
            remaining,
            switched,
        }
    }

    fn switch_phase(&mut self, now: Instant) {
        self.phase = self.phase.toggled();
        if self.phase == Phase::Work {
            self.loop_count += 1;
        }
        self.phase_started_at = Some(now);
        self.notification_until = Some(now + NOTIFICATION_WINDOW);
        debug!("Switched to {} phase (loops completed: {})", self.phase.label(), self.loop_count);
    }

    /// Time left in the current phase without advancing it
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.phase_started_at {
            Some(started) if self.is_running => self
                .phase_total()
                .saturating_sub(now.saturating_duration_since(started)),
            _ => Duration::ZERO,
        }
    }

    /// Share of the current phase already elapsed, in `[0, 1]`
    pub fn progress_fraction(&self, now: Instant) -> f64 {
        let total = self.phase_total();
        if !self.is_running || total.is_zero() {
            return 0.0;
        }
        let remaining = self.remaining(now);
        ((total - remaining).as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn statistics(&self) -> Statistics {
        let loops = self.loop_count as f64;
        Statistics {
            completed_loops: self.loop_count,
            total_work_minutes: loops * self.durations.work.as_secs_f64() / 60.0,
            total_break_minutes: loops * self.durations.rest.as_secs_f64() / 60.0,
        }
    }

    /// Whether the phase-complete notification should be showing
    pub fn notification_active(&self, now: Instant) -> bool {
        self.notification_until.is_some_and(|until| now < until)
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn loop_count(&self) -> u64 {
        self.loop_count
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }

    /// Configured length of the current phase
    pub fn phase_total(&self) -> Duration {
        self.durations.of(self.phase)
    }

    /// Instant of the last `start`, if running
    pub fn running_since(&self) -> Option<Instant> {
        self.running_since
    }
}

/// Format whole seconds as `MM:SS`; minutes are not wrapped at 60
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
