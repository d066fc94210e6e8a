//! Input widgets
//!
//! Headless state for a tags input, a multi-select combobox, a sortable list
//! and a copy button. Hosts feed in key presses, clicks and drags, then read
//! back what to render.

mod copy_button;
mod multi_select;
mod sortable;
mod tags_input;

pub use copy_button::{CopyButton, CopyIcon};
pub use multi_select::{MultiSelect, MultiSelectOptions, SelectItem};
pub use sortable::{array_move, HasId, Sortable, SortableOptions, SortableOrientation, SortingStrategy};
pub use tags_input::{TagsInput, TagsInputOptions};

/// Keys the text inputs react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Escape,
}
