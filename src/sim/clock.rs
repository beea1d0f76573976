use std::time::{Duration, Instant};

/// Largest step handed to the simulations, whatever the wall clock says.
pub const MAX_STEP: Duration = Duration::from_millis(100);

/// Per-frame delta source shared by every simulation.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_tick: Option<Instant>,
}

impl FrameClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the time since the previous tick, capped at [`MAX_STEP`].
    /// The first tick only seeds the clock and yields zero.
    pub fn tick(&mut self, now: Instant) -> Duration {
        let Some(previous) = self.last_tick.replace(now) else {
            return Duration::ZERO;
        };
        now.saturating_duration_since(previous).min(MAX_STEP)
    }
}
