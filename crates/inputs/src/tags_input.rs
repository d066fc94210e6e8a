//! Free-form tag entry with inline editing

use anyhow::{anyhow, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::Key;

/// Configuration options for a tags input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagsInputOptions {
    /// Shown while there are no tags
    pub placeholder: String,
    /// Tags shown before the rest collapse into a `+N` button
    pub limit: Option<usize>,
}

impl Default for TagsInputOptions {
    fn default() -> Self {
        Self {
            placeholder: "Type and press Enter...".to_string(),
            limit: None,
        }
    }
}

impl TagsInputOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

type ChangeCallback = Box<dyn FnMut(&[String])>;

/// State of a tags input
///
/// Tags are unique and trimmed. Every change to the list is reported to the
/// change callback with the new list.
pub struct TagsInput {
    tags: Vec<String>,
    input: String,
    editing: Option<(usize, String)>,
    expanded: bool,
    options: TagsInputOptions,
    on_change: Option<ChangeCallback>,
}

impl TagsInput {
    pub fn new(tags: Vec<String>) -> Self {
        Self {
            tags,
            input: String::new(),
            editing: None,
            expanded: false,
            options: TagsInputOptions::default(),
            on_change: None,
        }
    }

    pub fn with_options(mut self, options: TagsInputOptions) -> Self {
        self.options = options;
        self
    }

    pub fn on_change(mut self, callback: impl FnMut(&[String]) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// The placeholder, shown only while there are no tags
    pub fn placeholder(&self) -> Option<&str> {
        self.tags.is_empty().then_some(self.options.placeholder.as_str())
    }

    /// Key press in the main text box
    ///
    /// Enter adds the typed tag; Backspace on an empty box removes the last
    /// tag. Returns whether the tag list changed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Enter => self.add_tag(),
            Key::Backspace => self.backspace(),
            Key::Escape => false,
        }
    }

    /// Add the typed text as a tag
    ///
    /// Blank text and duplicates are ignored and stay in the box.
    pub fn add_tag(&mut self) -> bool {
        let tag = self.input.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }

        self.tags.push(tag.to_string());
        self.input.clear();
        self.notify();
        true
    }

    /// Remove the last tag when the text box is empty
    pub fn backspace(&mut self) -> bool {
        if !self.input.is_empty() || self.tags.pop().is_none() {
            return false;
        }
        self.notify();
        true
    }

    /// Remove a tag by position, abandoning any edit in progress
    pub fn remove_tag(&mut self, index: usize) -> Result<String> {
        if index >= self.tags.len() {
            return Err(anyhow!("No tag at index {}", index));
        }
        let removed = self.tags.remove(index);
        self.editing = None;
        self.notify();
        Ok(removed)
    }

    /// Start editing a tag in place (double click)
    pub fn start_edit(&mut self, index: usize) -> Result<()> {
        let tag = self
            .tags
            .get(index)
            .ok_or_else(|| anyhow!("No tag at index {}", index))?;
        self.editing = Some((index, tag.clone()));
        Ok(())
    }

    pub fn editing_index(&self) -> Option<usize> {
        self.editing.as_ref().map(|(index, _)| *index)
    }

    pub fn editing_value(&self) -> Option<&str> {
        self.editing.as_ref().map(|(_, value)| value.as_str())
    }

    pub fn set_edit_value(&mut self, text: impl Into<String>) {
        if let Some((_, value)) = self.editing.as_mut() {
            *value = text.into();
        }
    }

    /// Key press in the edit box: Enter saves, Escape cancels
    pub fn handle_edit_key(&mut self, key: Key) -> bool {
        match key {
            Key::Enter => self.save_edit(),
            Key::Escape => {
                self.cancel_edit();
                false
            }
            Key::Backspace => false,
        }
    }

    /// Commit the edit (Enter or blur)
    ///
    /// A blank value or one equal to another tag is discarded. Editing ends
    /// either way; returns whether the tag changed.
    pub fn save_edit(&mut self) -> bool {
        let Some((index, value)) = self.editing.take() else {
            return false;
        };

        let value = value.trim();
        let collides = self
            .tags
            .iter()
            .enumerate()
            .any(|(i, tag)| i != index && tag == value);
        if value.is_empty() || collides || index >= self.tags.len() {
            debug!("Discarding edit of tag {} to '{}'", index, value);
            return false;
        }

        self.tags[index] = value.to_string();
        self.notify();
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    fn is_limited(&self) -> bool {
        matches!(self.options.limit, Some(limit) if limit > 0 && self.tags.len() > limit)
    }

    /// Tags on screen: the first `limit` unless expanded
    pub fn visible_tags(&self) -> &[String] {
        match self.options.limit {
            Some(limit) if self.is_limited() && !self.expanded => &self.tags[..limit],
            _ => &self.tags,
        }
    }

    /// Number behind the `+N` button; zero when nothing is collapsed
    pub fn remaining_count(&self) -> usize {
        match self.options.limit {
            Some(limit) if self.is_limited() && !self.expanded => self.tags.len() - limit,
            _ => 0,
        }
    }

    /// Whether the "Show less" button is shown
    pub fn can_show_less(&self) -> bool {
        self.is_limited() && self.expanded
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Click on `+N`
    pub fn expand(&mut self) {
        self.expanded = true;
    }

    /// Click on "Show less"
    pub fn collapse(&mut self) {
        self.expanded = false;
    }

    fn notify(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.tags);
        }
    }
}
