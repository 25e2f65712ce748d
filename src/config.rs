//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::timer::PhaseDurations;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "interval-timer")]
#[command(about = "A session-based HTTP server driving work/break interval timers")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Work phase length in minutes for new sessions
    #[arg(short, long, default_value = "50")]
    pub work_minutes: u32,

    /// Break phase length in minutes for new sessions
    #[arg(short, long, default_value = "10")]
    pub break_minutes: u32,

    /// Minutes a session may go unpolled before it is dropped
    #[arg(long, default_value = "120")]
    pub session_ttl: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Durations given to sessions created without explicit settings
    pub fn default_durations(&self) -> PhaseDurations {
        PhaseDurations::from_parts(self.work_minutes, 0, self.break_minutes, 0)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl.saturating_mul(60))
    }

    /// How often idle sessions are swept
    pub fn reap_interval(&self) -> Duration {
        Duration::from_secs(60)
    }
}
