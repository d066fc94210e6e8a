//! Feature flags and page sizes for a data table

use serde::{Deserialize, Serialize};

/// Page sizes always offered by the page size picker
pub const DEFAULT_PAGE_SIZES: [usize; 4] = [10, 20, 50, 100];

/// Configuration options for a data table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataTableOptions {
    /// Whether rows are split into pages
    pub pagination: bool,

    /// Rows per page when the table is created or reset.
    pub initial_page_size: usize,

    /// Whether the column visibility menu is shown
    pub column_visibility: bool,

    /// Whether the global search box is shown
    pub global_search: bool,

    /// Whether the advanced filter editor is shown
    pub advanced_filter: bool,

    /// Base set of page sizes offered by the picker.
    pub page_size_options: Vec<usize>,
}

impl Default for DataTableOptions {
    fn default() -> Self {
        Self {
            pagination: true,
            initial_page_size: 10,
            column_visibility: false,
            global_search: true,
            advanced_filter: false,
            page_size_options: DEFAULT_PAGE_SIZES.to_vec(),
        }
    }
}

impl DataTableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pagination(mut self, pagination: bool) -> Self {
        self.pagination = pagination;
        self
    }

    /// Set the starting page size; zero is raised to one.
    pub fn initial_page_size(mut self, size: usize) -> Self {
        self.initial_page_size = size.max(1);
        self
    }

    pub fn column_visibility(mut self, enabled: bool) -> Self {
        self.column_visibility = enabled;
        self
    }

    pub fn global_search(mut self, enabled: bool) -> Self {
        self.global_search = enabled;
        self
    }

    pub fn advanced_filter(mut self, enabled: bool) -> Self {
        self.advanced_filter = enabled;
        self
    }

    pub fn page_size_options(mut self, sizes: Vec<usize>) -> Self {
        self.page_size_options = sizes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_options_from_json() {
        let options: DataTableOptions =
            serde_json::from_str(r#"{"initial_page_size": 25, "advanced_filter": true}"#).unwrap();
        assert_eq!(
            options,
            DataTableOptions::new().initial_page_size(25).advanced_filter(true)
        );
        assert!(options.pagination);
        assert_eq!(options.page_size_options, vec![10, 20, 50, 100]);
    }
}
