//! Domain Services
//!
//! Pure cooldown arithmetic, a function of the stored send timestamp only.

use chrono::{DateTime, Duration, Utc};

/// Minimum wait between two issuances for the same phone number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResendCooldown {
    window: Duration,
}

impl ResendCooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window: window.max(Duration::zero()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn window_secs(&self) -> u64 {
        self.window.num_seconds().max(0) as u64
    }

    /// Latest `last_sent_at` that no longer blocks an issuance at `now`
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Whole seconds left before a new code may be sent
    ///
    /// `None` when not cooling down. Otherwise rounded up, so the value is
    /// always in `1..=window`. A send timestamp in the future counts as
    /// "just sent".
    pub fn remaining(&self, now: DateTime<Utc>, last_sent_at: Option<DateTime<Utc>>) -> Option<u64> {
        let last_sent_at = last_sent_at?;
        let elapsed = now.signed_duration_since(last_sent_at).max(Duration::zero());
        if elapsed >= self.window {
            return None;
        }

        let left_ms = (self.window - elapsed).num_milliseconds();
        Some(((left_ms + 999) / 1000) as u64)
    }
}
