//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{state::TimerSnapshot, timer::PhaseDurations};

/// Largest minutes value a client may submit per phase
pub const MAX_MINUTES: u32 = 99;
/// Largest seconds value a client may submit per phase
pub const MAX_SECONDS: u32 = 59;

/// Duration inputs as entered in the settings form
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DurationsRequest {
    pub work_minutes: u32,
    #[serde(default)]
    pub work_seconds: u32,
    pub break_minutes: u32,
    #[serde(default)]
    pub break_seconds: u32,
}

impl DurationsRequest {
    /// Check the form bounds and combine into phase durations
    pub fn validate(&self) -> Result<PhaseDurations, String> {
        for (name, minutes) in [("work", self.work_minutes), ("break", self.break_minutes)] {
            if minutes > MAX_MINUTES {
                return Err(format!("{} minutes must be between 0 and {}", name, MAX_MINUTES));
            }
        }
        for (name, seconds) in [("work", self.work_seconds), ("break", self.break_seconds)] {
            if seconds > MAX_SECONDS {
                return Err(format!("{} seconds must be between 0 and {}", name, MAX_SECONDS));
            }
        }

        Ok(PhaseDurations::from_parts(
            self.work_minutes,
            self.work_seconds,
            self.break_minutes,
            self.break_seconds,
        ))
    }
}

/// Response for every per-session endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub session_id: Uuid,
    pub timer: TimerSnapshot,
}

impl SessionResponse {
    pub fn new(status: &str, message: String, session_id: Uuid, timer: TimerSnapshot) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            session_id,
            timer,
        }
    }

    /// Status derived from whether the timer is counting down
    pub fn from_timer(message: String, session_id: Uuid, timer: TimerSnapshot) -> Self {
        let status = if timer.running { "running" } else { "stopped" };
        Self::new(status, message, session_id, timer)
    }

    /// The request was accepted but had no effect
    pub fn ignored(message: String, session_id: Uuid, timer: TimerSnapshot) -> Self {
        Self::new("ignored", message, session_id, timer)
    }
}

/// Server-wide status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub sessions: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_validate_bounds() {
        let ok = DurationsRequest {
            work_minutes: 99,
            work_seconds: 59,
            break_minutes: 0,
            break_seconds: 0,
        };
        let durations = ok.validate().unwrap();
        assert_eq!(durations.work, Duration::from_secs(99 * 60 + 59));
        assert_eq!(durations.rest, Duration::ZERO);

        let too_long = DurationsRequest { work_minutes: 100, ..ok };
        assert!(too_long.validate().unwrap_err().contains("work minutes"));

        let bad_seconds = DurationsRequest { break_seconds: 60, ..ok };
        assert!(bad_seconds.validate().unwrap_err().contains("break seconds"));
    }

    #[test]
    fn test_seconds_default_to_zero() {
        let req: DurationsRequest =
            serde_json::from_str(r#"{"work_minutes": 25, "break_minutes": 5}"#).unwrap();
        assert_eq!(req.work_seconds, 0);
        assert_eq!(req.validate().unwrap().rest, Duration::from_secs(300));
    }
}
