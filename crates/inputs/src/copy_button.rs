//! Copy-to-clipboard button with a short-lived check mark

use log::warn;
use platform::{ClipboardWriter, CopyFeedback};
use std::time::{Duration, Instant};

/// Icon a copy button shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyIcon {
    Copy,
    Check,
}

/// Button copying a fixed value, with a short-lived check mark
pub struct CopyButton<C> {
    value: String,
    clipboard: C,
    feedback: CopyFeedback,
}

impl<C: ClipboardWriter> CopyButton<C> {
    pub fn new(value: impl Into<String>, clipboard: C) -> Self {
        Self {
            value: value.into(),
            clipboard,
            feedback: CopyFeedback::default(),
        }
    }

    /// Override how long the check mark stays
    pub fn with_feedback_duration(mut self, duration: Duration) -> Self {
        self.feedback = CopyFeedback::new(duration);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Copy the value
    ///
    /// A failed write is logged and leaves the button as it was. Returns
    /// whether the value reached the clipboard.
    pub fn click(&mut self, now: Instant) -> bool {
        match self.clipboard.write_text(&self.value) {
            Ok(()) => {
                self.feedback.mark(now);
                true
            }
            Err(e) => {
                warn!("Copy to clipboard failed: {e:#}");
                false
            }
        }
    }

    pub fn has_copied(&self, now: Instant) -> bool {
        self.feedback.is_active(now)
    }

    pub fn icon(&self, now: Instant) -> CopyIcon {
        if self.has_copied(now) {
            CopyIcon::Check
        } else {
            CopyIcon::Copy
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::MemoryClipboard;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_click_copies_and_shows_check() {
        let clipboard = MemoryClipboard::new();
        let mut button = CopyButton::new("npm install", &clipboard);
        let now = Instant::now();

        assert_eq!(button.icon(now), CopyIcon::Copy);
        assert!(button.click(now));
        assert_eq!(clipboard.contents().as_deref(), Some("npm install"));
        assert_eq!(button.icon(now + Duration::from_millis(1500)), CopyIcon::Check);
        assert_eq!(button.icon(now + Duration::from_millis(2000)), CopyIcon::Copy);
    }

    #[test]
    fn test_click_again_restarts_timer() {
        let clipboard = MemoryClipboard::new();
        let mut button = CopyButton::new("a", &clipboard);
        let start = Instant::now();

        button.click(start);
        button.set_value("b");
        button.click(start + Duration::from_millis(1500));
        assert!(button.has_copied(start + Duration::from_millis(3000)));
        assert_eq!(clipboard.history(), vec!["a", "b"]);
    }

    #[test]
    fn test_failed_write_keeps_state() {
        let clipboard = MemoryClipboard::new();
        clipboard.set_failing(true);
        let mut button = CopyButton::new("secret", &clipboard).with_feedback_duration(Duration::from_secs(1));
        let now = Instant::now();

        assert!(!button.click(now));
        assert!(!button.has_copied(now));
        assert_eq!(clipboard.contents(), None);
    }
}
