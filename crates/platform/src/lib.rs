//! Platform capabilities for the widget crates
//!
//! Clipboard and identifier access are injected into widgets instead of being
//! reached through global state, so widget logic runs without a live UI.

mod clipboard;
mod feedback;
mod ids;

pub use clipboard::{ClipboardWriter, MemoryClipboard};
#[cfg(feature = "system-clipboard")]
pub use clipboard::SystemClipboard;
pub use feedback::{CopyFeedback, COPY_FEEDBACK_DURATION};
pub use ids::{SequentialIds, UniqueIdGenerator, UuidGenerator};
