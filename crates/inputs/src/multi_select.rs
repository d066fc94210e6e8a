//! Combobox selecting several values from a fixed option list

use serde::{Deserialize, Serialize};

/// A choice in the option list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectItem {
    pub value: String,
    pub label: String,
}

impl SelectItem {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Configuration options for a multi-select
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiSelectOptions {
    /// Shown on the trigger while nothing is selected
    pub placeholder: String,
    /// Badges shown on the closed trigger before collapsing into `+N`
    pub limit: Option<usize>,
}

impl Default for MultiSelectOptions {
    fn default() -> Self {
        Self {
            placeholder: "Select items...".to_string(),
            limit: None,
        }
    }
}

impl MultiSelectOptions {
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

/// State of a multi-select combobox
///
/// The selection keeps the order values were picked in. Opening the popover
/// shows every selected badge; closing it collapses them again.
pub struct MultiSelect {
    items: Vec<SelectItem>,
    value: Vec<String>,
    open: bool,
    show_all: bool,
    search: String,
    options: MultiSelectOptions,
    on_change: Option<ChangeCallback>,
}

impl MultiSelect {
    pub fn new(items: Vec<SelectItem>, value: Vec<String>) -> Self {
        Self {
            items,
            value,
            open: false,
            show_all: false,
            search: String::new(),
            options: MultiSelectOptions::default(),
            on_change: None,
        }
    }

    pub fn with_options(mut self, options: MultiSelectOptions) -> Self {
        self.options = options;
        self
    }

    pub fn on_change(mut self, callback: impl FnMut(&[String]) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Selected values, including any not in the option list
    pub fn value(&self) -> &[String] {
        &self.value
    }

    pub fn items(&self) -> &[SelectItem] {
        &self.items
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.value.iter().any(|v| v == value)
    }

    /// Select or deselect an option from the list
    pub fn toggle(&mut self, value: &str) {
        match self.value.iter().position(|v| v == value) {
            Some(index) => {
                self.value.remove(index);
            }
            None => self.value.push(value.to_string()),
        }
        self.notify();
    }

    /// The `x` on a badge
    pub fn remove(&mut self, value: &str) -> bool {
        let before = self.value.len();
        self.value.retain(|v| v != value);
        let removed = self.value.len() != before;
        if removed {
            self.notify();
        }
        removed
    }

    /// Selected options in selection order; unknown values are skipped
    pub fn selected_items(&self) -> Vec<&SelectItem> {
        self.value
            .iter()
            .filter_map(|v| self.items.iter().find(|item| &item.value == v))
            .collect()
    }

    /// The trigger placeholder, shown only while nothing is selected
    pub fn placeholder(&self) -> Option<&str> {
        self.selected_items()
            .is_empty()
            .then_some(self.options.placeholder.as_str())
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
        self.show_all = open;
        if !open {
            self.search.clear();
        }
    }

    pub fn toggle_open(&mut self) -> bool {
        self.set_open(!self.open);
        self.open
    }

    fn is_collapsed(&self) -> bool {
        self.options.limit.is_some() && !self.show_all && !self.open
    }

    /// Badges on the trigger
    pub fn displayed_items(&self) -> Vec<&SelectItem> {
        let selected = self.selected_items();
        match self.options.limit {
            Some(limit) if self.is_collapsed() => selected.into_iter().take(limit).collect(),
            _ => selected,
        }
    }

    /// Count on the `+N` badge; zero hides it
    pub fn hidden_count(&self) -> usize {
        match self.options.limit {
            Some(limit) if self.is_collapsed() => self.selected_items().len().saturating_sub(limit),
            _ => 0,
        }
    }

    /// Click on the `+N` badge
    pub fn show_all(&mut self) {
        self.show_all = true;
    }

    /// Whether the "Show less" button is shown on the closed trigger
    pub fn can_show_less(&self) -> bool {
        matches!(self.options.limit, Some(limit) if self.show_all && !self.open && self.selected_items().len() > limit)
    }

    pub fn show_less(&mut self) {
        self.show_all = false;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Text typed into the popover's search box
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Options matching the search box, case-insensitively on label or value
    ///
    /// An empty result shows "No results found.".
    pub fn matching_items(&self) -> Vec<&SelectItem> {
        let query = self.search.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| {
                query.is_empty()
                    || item.label.to_lowercase().contains(&query)
                    || item.value.to_lowercase().contains(&query)
            })
            .collect()
    }

    fn notify(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.value);
        }
    }
}
