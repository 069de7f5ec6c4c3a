//! Banner timing
//!
//! When the gift is granted the storefront shows a celebratory banner for a
//! fixed duration. The engine holds a [`BannerTimer`] for the currently
//! armed banner, if any, and asks it for expiry against a [`Clock`].
//!
//! Time is injected through the [`Clock`] trait so tests can drive expiry
//! deterministically instead of sleeping.

use std::time::{Duration, Instant};

/// A source of monotonic time.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A countdown armed when the gift banner is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerTimer {
    armed_at: Instant,
    duration: Duration,
}

impl BannerTimer {
    /// Arms a timer at `now` that expires after `duration`.
    #[must_use]
    pub fn arm(now: Instant, duration: Duration) -> Self {
        Self {
            armed_at: now,
            duration,
        }
    }

    /// Returns `true` once `duration` has elapsed since the timer was armed.
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.armed_at) >= self.duration
    }

    /// Returns how much banner time is left at `now`, zero once expired.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.duration
            .saturating_sub(now.saturating_duration_since(self.armed_at))
    }
}
