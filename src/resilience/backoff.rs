use std::time::Duration;

/// Doubling retry delay for weather fetches, capped at `max`.
#[derive(Debug, Clone)]
pub struct Backoff {
    current: Duration,
    base: Duration,
    max: Duration,
    attempts: u32,
}

impl Backoff {
    pub const WEATHER_BASE: Duration = Duration::from_secs(10);
    pub const WEATHER_MAX: Duration = Duration::from_secs(300);

    #[must_use]
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            current: base,
            base,
            max: max.max(base),
            attempts: 0,
        }
    }

    #[must_use]
    pub fn for_weather() -> Self {
        Self::new(Self::WEATHER_BASE, Self::WEATHER_MAX)
    }

    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = self.current.saturating_mul(2).min(self.max);
        self.attempts = self.attempts.saturating_add(1);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.base;
        self.attempts = 0;
    }

    /// Retries handed out since the last reset.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}
