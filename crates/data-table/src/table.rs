//! In-memory table state: filtering, sorting, pagination and visibility

use anyhow::{anyhow, Result};
use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

use crate::advanced_sort::SortDirection;
use crate::column::{ColumnDef, SortKey, TableHost};
use crate::filter::ColumnFilter;
use crate::options::DataTableOptions;
use crate::value::CellValue;

/// A record the table can read cells from
pub trait Row {
    /// The cell for a column; missing fields are `Null`
    fn cell(&self, column_id: &str) -> CellValue;
}

impl Row for serde_json::Map<String, serde_json::Value> {
    fn cell(&self, column_id: &str) -> CellValue {
        self.get(column_id).map(CellValue::from).unwrap_or_default()
    }
}

impl Row for serde_json::Value {
    fn cell(&self, column_id: &str) -> CellValue {
        self.get(column_id).map(CellValue::from).unwrap_or_default()
    }
}

impl Row for HashMap<String, CellValue> {
    fn cell(&self, column_id: &str) -> CellValue {
        self.get(column_id).cloned().unwrap_or_default()
    }
}

impl Row for BTreeMap<String, CellValue> {
    fn cell(&self, column_id: &str) -> CellValue {
        self.get(column_id).cloned().unwrap_or_default()
    }
}

/// Rows plus the filter, sort, page and visibility state applied to them
///
/// Derived row models are recomputed on demand. Any change to the rows,
/// filters or sorting returns to the first page.
pub struct DataTable<R> {
    columns: Vec<ColumnDef>,
    rows: Vec<R>,
    options: DataTableOptions,
    global_filter: String,
    column_filters: BTreeMap<String, ColumnFilter>,
    sorting: Vec<SortKey>,
    hidden: HashSet<String>,
    selected: HashSet<usize>,
    page_index: usize,
    page_size: usize,
}

impl<R: Row> DataTable<R> {
    pub fn new(columns: Vec<ColumnDef>, rows: Vec<R>) -> Self {
        Self::with_options(columns, rows, DataTableOptions::default())
    }

    pub fn with_options(columns: Vec<ColumnDef>, rows: Vec<R>, options: DataTableOptions) -> Self {
        let page_size = options.initial_page_size.max(1);
        Self {
            columns,
            rows,
            options,
            global_filter: String::new(),
            column_filters: BTreeMap::new(),
            sorting: Vec::new(),
            hidden: HashSet::new(),
            selected: HashSet::new(),
            page_index: 0,
            page_size,
        }
    }

    pub fn options(&self) -> &DataTableOptions {
        &self.options
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Replace the data set, dropping the row selection
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.selected.clear();
        self.page_index = 0;
    }

    pub fn global_filter(&self) -> &str {
        &self.global_filter
    }

    /// Update the search box text
    pub fn set_global_filter(&mut self, query: impl Into<String>) {
        self.global_filter = query.into();
        self.page_index = 0;
    }

    pub fn column_filter(&self, column_id: &str) -> Option<&ColumnFilter> {
        self.column_filters.get(column_id)
    }

    pub fn has_column_filters(&self) -> bool {
        !self.column_filters.is_empty()
    }

    pub fn reset_column_filters(&mut self) {
        self.column_filters.clear();
        self.page_index = 0;
    }

    pub fn sorting(&self) -> &[SortKey] {
        &self.sorting
    }

    /// Direction a column is currently sorted in
    pub fn sort_direction(&self, column_id: &str) -> Option<SortDirection> {
        self.sorting.iter().find(|k| k.id == column_id).map(|k| {
            if k.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            }
        })
    }

    /// Header click: unsorted, ascending, descending, then unsorted again
    ///
    /// The clicked column becomes the only sort key.
    pub fn toggle_sorting(&mut self, column_id: &str) -> Result<Option<SortDirection>> {
        if !self.column(column_id).map(|c| c.can_sort).unwrap_or(false) {
            return Err(anyhow!("Column '{}' can't be sorted", column_id));
        }
        let next = match self.sort_direction(column_id) {
            None => Some(SortKey::asc(column_id)),
            Some(SortDirection::Asc) => Some(SortKey::desc(column_id)),
            Some(SortDirection::Desc) => None,
        };
        match next {
            Some(key) => self.set_sorting(vec![key]),
            None => self.reset_sorting(),
        }
        Ok(self.sort_direction(column_id))
    }

    fn passes_global_filter(&self, row: &R) -> bool {
        if self.global_filter.is_empty() {
            return true;
        }
        let query = self.global_filter.to_lowercase();
        self.columns
            .iter()
            .filter(|c| c.is_filterable())
            .any(|c| {
                let cell = row.cell(&c.id);
                !cell.is_null() && cell.to_display_string().to_lowercase().contains(&query)
            })
    }

    fn passes_column_filters(&self, row: &R) -> bool {
        self.column_filters
            .iter()
            .all(|(column_id, filter)| filter.matches(&row.cell(column_id)))
    }

    /// Indices of rows passing the search and every column filter
    pub fn filtered_indices(&self) -> Vec<usize> {
        let indices: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| self.passes_global_filter(row) && self.passes_column_filters(row))
            .map(|(i, _)| i)
            .collect();
        trace!("{} of {} rows pass the filters", indices.len(), self.rows.len());
        indices
    }

    /// Filtered row indices in sort order
    pub fn sorted_indices(&self) -> Vec<usize> {
        let mut indices = self.filtered_indices();
        if self.sorting.is_empty() {
            return indices;
        }

        let keys: Vec<(&SortKey, Vec<CellValue>)> = self
            .sorting
            .iter()
            .map(|key| (key, self.rows.iter().map(|row| row.cell(&key.id)).collect()))
            .collect();

        indices.sort_by(|&a, &b| {
            keys.iter()
                .map(|(key, cells)| compare_for_sort(&cells[a], &cells[b], key.desc))
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        indices
    }

    /// Filtered and sorted rows
    pub fn row_model(&self) -> Vec<&R> {
        self.sorted_indices().into_iter().map(|i| &self.rows[i]).collect()
    }

    /// Number of rows after filtering, shown as the table total
    pub fn filtered_row_count(&self) -> usize {
        self.filtered_indices().len()
    }

    /// Indices of the rows on the current page
    pub fn page_indices(&self) -> Vec<usize> {
        let sorted = self.sorted_indices();
        if !self.options.pagination {
            return sorted;
        }
        sorted
            .into_iter()
            .skip(self.page_index * self.page_size)
            .take(self.page_size)
            .collect()
    }

    /// Rows on the current page
    pub fn page_rows(&self) -> Vec<&R> {
        self.page_indices().into_iter().map(|i| &self.rows[i]).collect()
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages; zero when nothing passes the filters
    pub fn page_count(&self) -> usize {
        self.filtered_row_count().div_ceil(self.page_size)
    }

    pub fn can_previous_page(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    /// Jump to a page, clamped to the existing pages
    pub fn set_page_index(&mut self, index: usize) {
        let last = self.page_count().saturating_sub(1);
        self.page_index = index.min(last);
    }

    pub fn previous_page(&mut self) {
        self.set_page_index(self.page_index.saturating_sub(1));
    }

    pub fn next_page(&mut self) {
        self.set_page_index(self.page_index + 1);
    }

    pub fn first_page(&mut self) {
        self.page_index = 0;
    }

    pub fn last_page(&mut self) {
        self.set_page_index(usize::MAX);
    }

    /// Change rows per page, keeping the current top row on screen
    pub fn set_page_size(&mut self, size: usize) {
        let size = size.max(1);
        let top_row = self.page_index * self.page_size;
        self.page_size = size;
        self.page_index = top_row / size;
        debug!("Page size {} (page {})", size, self.page_index + 1);
    }

    /// Sizes offered by the picker: the base set plus current and initial
    pub fn page_size_options(&self) -> Vec<usize> {
        let mut sizes: BTreeSet<usize> = self.options.page_size_options.iter().copied().collect();
        sizes.insert(self.page_size);
        sizes.insert(self.options.initial_page_size.max(1));
        sizes.into_iter().collect()
    }

    /// One-line pagination footer, e.g. `2 / 5 | Total: 42`
    pub fn pagination_summary(&self) -> String {
        format!(
            "{} / {} | Total: {}",
            self.page_index + 1,
            self.page_count(),
            self.filtered_row_count()
        )
    }

    pub fn is_column_visible(&self, column_id: &str) -> bool {
        !self.hidden.contains(column_id)
    }

    /// Show or hide a column
    ///
    /// # Errors
    ///
    /// Fails for unknown columns and for hiding a column that can't be hidden.
    pub fn set_column_visibility(&mut self, column_id: &str, visible: bool) -> Result<()> {
        let column = self
            .column(column_id)
            .ok_or_else(|| anyhow!("No column with id '{}'", column_id))?;
        if !visible && !column.can_hide {
            return Err(anyhow!("Column '{}' can't be hidden", column_id));
        }

        if visible {
            self.hidden.remove(column_id);
        } else {
            self.hidden.insert(column_id.to_string());
        }
        Ok(())
    }

    pub fn toggle_column_visibility(&mut self, column_id: &str) -> Result<bool> {
        let visible = !self.is_column_visible(column_id);
        self.set_column_visibility(column_id, visible)?;
        Ok(visible)
    }

    pub fn visible_columns(&self) -> Vec<&ColumnDef> {
        self.columns
            .iter()
            .filter(|c| self.is_column_visible(&c.id))
            .collect()
    }

    /// Columns listed in the visibility menu
    pub fn hideable_columns(&self) -> Vec<&ColumnDef> {
        self.columns.iter().filter(|c| c.can_hide).collect()
    }

    pub fn reset_column_visibility(&mut self) {
        self.hidden.clear();
    }

    /// Toggle selection of the row at `index` in the data set
    pub fn toggle_row_selected(&mut self, index: usize) -> Result<bool> {
        if index >= self.rows.len() {
            return Err(anyhow!("Row {} is out of range", index));
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
        Ok(self.selected.contains(&index))
    }

    pub fn is_row_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Selected rows that pass the current filters
    pub fn selected_row_count(&self) -> usize {
        self.filtered_indices()
            .into_iter()
            .filter(|i| self.selected.contains(i))
            .count()
    }

    /// The refresh button: drop search, filters, sorting, visibility and
    /// selection, and return to the first page at the initial size
    pub fn reset(&mut self) {
        self.global_filter.clear();
        self.column_filters.clear();
        self.sorting.clear();
        self.hidden.clear();
        self.selected.clear();
        self.page_index = 0;
        self.page_size = self.options.initial_page_size.max(1);
        debug!("Table state reset");
    }
}

impl<R: Row> TableHost for DataTable<R> {
    fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    fn set_column_filter(&mut self, column_id: &str, filter: Option<ColumnFilter>) {
        match filter {
            Some(filter) => {
                self.column_filters.insert(column_id.to_string(), filter);
            }
            None => {
                self.column_filters.remove(column_id);
            }
        }
        self.page_index = 0;
    }

    fn set_sorting(&mut self, sorting: Vec<SortKey>) {
        self.sorting = sorting;
        self.page_index = 0;
    }

    fn reset_sorting(&mut self) {
        self.sorting.clear();
        self.page_index = 0;
    }
}

impl<R: Row> fmt::Display for DataTable<R> {
    /// The visible columns and the current page as an aligned text grid
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = self.visible_columns();
        let header: Vec<String> = columns.iter().map(|c| c.title().to_string()).collect();
        let body: Vec<Vec<String>> = self
            .page_rows()
            .into_iter()
            .map(|row| columns.iter().map(|c| row.cell(&c.id).to_display_string()).collect())
            .collect();

        let widths: Vec<usize> = (0..columns.len())
            .map(|i| {
                body.iter()
                    .map(|cells| cells[i].chars().count())
                    .chain(std::iter::once(header[i].chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let write_line = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
            let line = cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(" | ");
            writeln!(f, "{}", line.trim_end())
        };

        write_line(f, &header)?;
        if body.is_empty() {
            return writeln!(f, "No results.");
        }
        for cells in &body {
            write_line(f, cells)?;
        }
        Ok(())
    }
}

/// Sort comparison for one key: nulls last in both directions
fn compare_for_sort(a: &CellValue, b: &CellValue, desc: bool) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = compare_cells(a, b);
            if desc {
                ord.reverse()
            } else {
                ord
            }
        }
    }
}

/// Numbers compare numerically, booleans false first, everything else
/// alphanumerically on its string form
pub fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Number(x), CellValue::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (CellValue::Bool(x), CellValue::Bool(y)) => x.cmp(y),
        _ => compare_alphanumeric(&a.to_display_string(), &b.to_display_string()),
    }
}

/// Case-insensitive comparison treating digit runs as numbers
///
/// `"item2"` sorts before `"item10"`. Where one string has text and the other
/// digits at the same position, the text sorts first.
pub fn compare_alphanumeric(a: &str, b: &str) -> Ordering {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let a_chunks = chunks(&a);
    let b_chunks = chunks(&b);

    for (x, y) in a_chunks.iter().zip(&b_chunks) {
        let ord = match (is_digits(x), is_digits(y)) {
            (true, true) => compare_digit_runs(x, y),
            (false, false) => x.cmp(y),
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a_chunks.len().cmp(&b_chunks.len())
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Split into maximal runs of ASCII digits and non-digits
fn chunks(s: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut in_digits = None;

    for (i, c) in s.char_indices() {
        let digit = c.is_ascii_digit();
        if in_digits.is_some_and(|d| d != digit) {
            chunks.push(&s[start..i]);
            start = i;
        }
        in_digits = Some(digit);
    }
    if start < s.len() {
        chunks.push(&s[start..]);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_alphanumeric_order() {
        assert_eq!(compare_alphanumeric("item2", "item10"), Ordering::Less);
        assert_eq!(compare_alphanumeric("Apple", "apple"), Ordering::Equal);
        assert_eq!(compare_alphanumeric("b", "A"), Ordering::Greater);
        assert_eq!(compare_alphanumeric("a", "1"), Ordering::Less);
        assert_eq!(compare_alphanumeric("file", "file1"), Ordering::Less);
        assert_eq!(compare_alphanumeric("v007", "v7"), Ordering::Equal);
    }

    #[test]
    fn test_chunks() {
        assert_eq!(chunks("ab12cd3"), vec!["ab", "12", "cd", "3"]);
        assert_eq!(chunks(""), Vec::<&str>::new());
    }

    #[test]
    fn test_nulls_sort_last_in_both_directions() {
        let null = CellValue::Null;
        let one = CellValue::Number(1.0);
        assert_eq!(compare_for_sort(&null, &one, false), Ordering::Greater);
        assert_eq!(compare_for_sort(&null, &one, true), Ordering::Greater);
        assert_eq!(compare_for_sort(&one, &CellValue::Number(2.0), true), Ordering::Greater);
    }
}
