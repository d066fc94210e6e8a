use anyhow::{anyhow, Result};
use std::sync::{Mutex, MutexGuard};

/// Write access to a clipboard
///
/// Writes are fire-and-forget from the widget's point of view: callers decide
/// whether a failure is surfaced, the clipboard never retries.
pub trait ClipboardWriter {
    /// Replace the clipboard contents with `text`
    fn write_text(&self, text: &str) -> Result<()>;
}

impl<C: ClipboardWriter + ?Sized> ClipboardWriter for &C {
    fn write_text(&self, text: &str) -> Result<()> {
        (**self).write_text(text)
    }
}

/// In-memory clipboard that records every write
///
/// Used by tests and by hosts without a system clipboard. It can be switched
/// into a failing mode to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    writes: Mutex<Vec<String>>,
    failing: Mutex<bool>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        *lock(&self.failing) = failing;
    }

    /// The most recent successful write
    pub fn contents(&self) -> Option<String> {
        lock(&self.writes).last().cloned()
    }

    /// All successful writes, oldest first
    pub fn history(&self) -> Vec<String> {
        lock(&self.writes).clone()
    }
}

impl ClipboardWriter for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        if *lock(&self.failing) {
            return Err(anyhow!("clipboard is unavailable"));
        }
        lock(&self.writes).push(text.to_string());
        Ok(())
    }
}

// A poisoned lock only means a panicking writer; the data is still a plain list.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The operating system clipboard
#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard {
    inner: Mutex<arboard::Clipboard>,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    /// Connect to the system clipboard
    pub fn new() -> Result<Self> {
        use anyhow::Context;

        let clipboard = arboard::Clipboard::new().context("Failed to open system clipboard")?;
        Ok(Self {
            inner: Mutex::new(clipboard),
        })
    }
}

#[cfg(feature = "system-clipboard")]
impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        lock(&self.inner)
            .set_text(text.to_string())
            .map_err(|e| anyhow!("Failed to write to system clipboard: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_memory_clipboard_records_writes() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.contents(), None);

        clipboard.write_text("first").unwrap();
        clipboard.write_text("second").unwrap();

        assert_eq!(clipboard.contents().as_deref(), Some("second"));
        assert_eq!(clipboard.history(), vec!["first", "second"]);
    }

    #[test]
    fn test_memory_clipboard_failure_keeps_contents() {
        let clipboard = MemoryClipboard::new();
        clipboard.write_text("kept").unwrap();

        clipboard.set_failing(true);
        assert!(clipboard.write_text("lost").is_err());
        assert_eq!(clipboard.contents().as_deref(), Some("kept"));

        clipboard.set_failing(false);
        assert!(clipboard.write_text("back").is_ok());
    }

    #[test]
    fn test_writer_through_reference() {
        let clipboard = MemoryClipboard::new();
        let writer: &dyn ClipboardWriter = &clipboard;
        (&writer).write_text("via ref").unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("via ref"));
    }
}
