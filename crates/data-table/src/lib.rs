//! Data Table Library
//!
//! Headless state for a data table: loosely typed cells, declarative column
//! filters, the advanced filter and sort editors, and an in-memory table that
//! applies search, filters, sorting and pagination to its rows.
//!
//! # Example
//!
//! ```
//! use data_table::prelude::*;
//! use platform::SequentialIds;
//! use serde_json::json;
//!
//! let columns = vec![
//!     ColumnDef::new("name"),
//!     ColumnDef::new("age").filter_type(FilterType::Number),
//! ];
//! let rows = vec![json!({"name": "Ada", "age": 36}), json!({"name": "Linus", "age": 28})];
//! let mut table = DataTable::new(columns, rows);
//!
//! let mut filters = AdvancedFilter::with_ids(SequentialIds::new("filter"));
//! let id = filters.add(&mut table).unwrap();
//! filters.update_column(&mut table, &id, "age").unwrap();
//! filters.update_operator(&mut table, &id, Operator::GreaterThan).unwrap();
//! filters.update_value(&mut table, &id, Some(FilterValue::scalar(30))).unwrap();
//!
//! assert_eq!(table.filtered_row_count(), 1);
//! ```

pub mod advanced_filter;
pub mod advanced_sort;
pub mod column;
pub mod filter;
pub mod options;
pub mod table;
pub mod value;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::advanced_filter::AdvancedFilter;
    pub use crate::advanced_sort::{AdvancedSort, SortCondition, SortDirection};
    pub use crate::column::{ColumnDef, SelectOption, SortKey, TableHost};
    pub use crate::filter::{evaluate, ColumnFilter, FilterCondition, FilterType, Operator};
    pub use crate::options::DataTableOptions;
    pub use crate::table::{DataTable, Row};
    pub use crate::value::{Bound, CellValue, FilterValue};
}
