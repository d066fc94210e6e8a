//! Column metadata and the seam the filter and sort editors drive

use serde::{Deserialize, Serialize};

use crate::filter::{ColumnFilter, FilterType};

/// Column id reserved for row action buttons; never filtered or sorted
pub const ACTIONS_COLUMN: &str = "actions";
/// Column id reserved for row selection checkboxes; never sorted
pub const SELECT_COLUMN: &str = "select";

/// A choice offered by select and multi-select filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

fn enabled() -> bool {
    true
}

/// Definition of one table column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub id: String,
    /// Header text; the id is shown when absent
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub filter_type: FilterType,
    /// Choices for select and multi-select filters
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default = "enabled")]
    pub can_filter: bool,
    #[serde(default = "enabled")]
    pub can_sort: bool,
    #[serde(default = "enabled")]
    pub can_hide: bool,
}

impl ColumnDef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: None,
            filter_type: FilterType::default(),
            options: Vec::new(),
            can_filter: true,
            can_sort: true,
            can_hide: true,
        }
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn filter_type(mut self, filter_type: FilterType) -> Self {
        self.filter_type = filter_type;
        self
    }

    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn filterable(mut self, can_filter: bool) -> Self {
        self.can_filter = can_filter;
        self
    }

    pub fn sortable(mut self, can_sort: bool) -> Self {
        self.can_sort = can_sort;
        self
    }

    pub fn hideable(mut self, can_hide: bool) -> Self {
        self.can_hide = can_hide;
        self
    }

    /// Header text, falling back to the id
    pub fn title(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.id)
    }

    /// Whether the advanced filter editor offers this column
    pub fn is_filterable(&self) -> bool {
        self.can_filter && self.id != ACTIONS_COLUMN
    }

    /// Whether the advanced sort editor offers this column
    pub fn is_sortable(&self) -> bool {
        self.can_sort && self.id != SELECT_COLUMN && self.id != ACTIONS_COLUMN
    }
}

/// One key of a multi-column sort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub id: String,
    pub desc: bool,
}

impl SortKey {
    pub fn asc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: false,
        }
    }

    pub fn desc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: true,
        }
    }
}

/// Table state the filter and sort editors drive
///
/// Editors only push configuration through this trait; the host owns the
/// rows and decides how filters and sort keys are applied to them.
pub trait TableHost {
    fn columns(&self) -> &[ColumnDef];

    /// Install or clear (`None`) the predicate of one column
    fn set_column_filter(&mut self, column_id: &str, filter: Option<ColumnFilter>);

    fn set_sorting(&mut self, sorting: Vec<SortKey>);

    fn reset_sorting(&mut self);

    fn column(&self, id: &str) -> Option<&ColumnDef> {
        self.columns().iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reserved_columns() {
        assert!(!ColumnDef::new(ACTIONS_COLUMN).is_filterable());
        assert!(!ColumnDef::new(ACTIONS_COLUMN).is_sortable());
        assert!(ColumnDef::new(SELECT_COLUMN).is_filterable());
        assert!(!ColumnDef::new(SELECT_COLUMN).is_sortable());
        assert!(!ColumnDef::new("name").filterable(false).is_filterable());
    }

    #[test]
    fn test_column_from_json_defaults() {
        let column: ColumnDef = serde_json::from_str(r#"{"id": "status", "filterType": "select"}"#).unwrap();
        assert_eq!(column.title(), "status");
        assert_eq!(column.filter_type, FilterType::Select);
        assert!(column.can_filter && column.can_sort && column.can_hide);

        let column = ColumnDef::new("age").header("Age");
        assert_eq!(column.title(), "Age");
        assert_eq!(column.filter_type, FilterType::Text);
    }
}
