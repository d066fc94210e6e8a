use std::time::{Duration, Instant};

/// How long a "copied" indicator stays visible
pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_millis(2000);

/// Timed flag behind copy buttons' check-mark state
///
/// Time is passed in by the caller, so the state is driven by whatever
/// clock the host uses.
#[derive(Debug, Clone, Copy)]
pub struct CopyFeedback {
    copied_at: Option<Instant>,
    duration: Duration,
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self::new(COPY_FEEDBACK_DURATION)
    }
}

impl CopyFeedback {
    pub fn new(duration: Duration) -> Self {
        Self {
            copied_at: None,
            duration,
        }
    }

    /// Start showing the indicator
    pub fn mark(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    /// Hide the indicator immediately
    pub fn reset(&mut self) {
        self.copied_at = None;
    }

    /// Whether the indicator is showing at `now`
    pub fn is_active(&self, now: Instant) -> bool {
        self.copied_at
            .map(|at| now.saturating_duration_since(at) < self.duration)
            .unwrap_or(false)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}
