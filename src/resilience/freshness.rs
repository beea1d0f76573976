use chrono::{DateTime, TimeDelta, Utc};

const STALE_AFTER_MINUTES: i64 = 10;
const OFFLINE_AFTER_MINUTES: i64 = 30;
const OFFLINE_FAILURES: u32 = 3;

/// How much to trust the weather shown on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
    Offline,
}

impl Freshness {
    #[must_use]
    pub fn evaluate(
        last_success: Option<DateTime<Utc>>,
        consecutive_failures: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let Some(last_success) = last_success else {
            return if consecutive_failures >= OFFLINE_FAILURES {
                Self::Offline
            } else {
                Self::Stale
            };
        };
        let age = now - last_success;
        if age > TimeDelta::minutes(OFFLINE_AFTER_MINUTES) || consecutive_failures >= OFFLINE_FAILURES
        {
            Self::Offline
        } else if age > TimeDelta::minutes(STALE_AFTER_MINUTES) || consecutive_failures >= 1 {
            Self::Stale
        } else {
            Self::Fresh
        }
    }

    /// Overlay badge; fresh data shows none.
    #[must_use]
    pub fn badge(self) -> Option<&'static str> {
        match self {
            Self::Fresh => None,
            Self::Stale => Some("stale"),
            Self::Offline => Some("offline"),
        }
    }
}
