//! Monotonic time sources

use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

/// Source of "now" for everything that does time arithmetic
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> Instant;
}

/// Wall clock backed by `Instant::now()`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    /// Create a clock pinned at its base instant
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Instant the clock started from
    pub fn base(&self) -> Instant {
        self.base
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap_or_else(|e| e.into_inner()) += by;
    }

    /// Pin the clock at `base + offset`
    pub fn set(&self, offset: Duration) {
        *self.offset.lock().unwrap_or_else(|e| e.into_inner()) = offset;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock().unwrap_or_else(|e| e.into_inner());
        self.base + offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new();
        let t0 = clock.now();
        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.now() - t0, Duration::from_secs(5));

        clock.set(Duration::from_secs(1));
        assert_eq!(clock.now(), clock.base() + Duration::from_secs(1));
    }

    #[test]
    fn test_manual_clock_survives_poisoned_lock() {
        use std::sync::Arc;

        let clock = Arc::new(ManualClock::new());
        let poisoner = Arc::clone(&clock);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.offset.lock().unwrap();
            panic!("poison the offset lock");
        })
        .join();
        assert!(clock.offset.is_poisoned());

        clock.advance(Duration::from_secs(3));
        assert_eq!(clock.now(), clock.base() + Duration::from_secs(3));
        clock.set(Duration::from_secs(10));
        assert_eq!(clock.now(), clock.base() + Duration::from_secs(10));
    }

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
