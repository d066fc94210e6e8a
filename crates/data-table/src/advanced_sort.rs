//! Editor for an ordered list of sort keys

use anyhow::{anyhow, Error, Result};
use derive_more::Display;
use log::debug;
use platform::{UniqueIdGenerator, UuidGenerator};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::column::{ColumnDef, SortKey, TableHost};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[display(fmt = "asc")]
    Asc,
    #[display(fmt = "desc")]
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(anyhow!("Unknown sort direction '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortCondition {
    pub id: String,
    pub column_id: String,
    pub direction: SortDirection,
}

impl SortCondition {
    fn to_key(&self) -> SortKey {
        SortKey {
            id: self.column_id.clone(),
            desc: self.direction == SortDirection::Desc,
        }
    }
}

/// Sort key list behind the "Sort" popover
///
/// Every edit pushes the full key list to the host; an empty list resets the
/// host's sorting.
pub struct AdvancedSort<G = UuidGenerator> {
    ids: G,
    sorts: Vec<SortCondition>,
    is_open: bool,
}

impl AdvancedSort<UuidGenerator> {
    pub fn new() -> Self {
        Self::with_ids(UuidGenerator)
    }
}

impl Default for AdvancedSort<UuidGenerator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: UniqueIdGenerator> AdvancedSort<G> {
    pub fn with_ids(ids: G) -> Self {
        Self {
            ids,
            sorts: Vec::new(),
            is_open: false,
        }
    }

    pub fn sorts(&self) -> &[SortCondition] {
        &self.sorts
    }

    pub fn sort(&self, id: &str) -> Option<&SortCondition> {
        self.sorts.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sorts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorts.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    pub fn sortable_columns<'h, H: TableHost + ?Sized>(&self, host: &'h H) -> Vec<&'h ColumnDef> {
        host.columns().iter().filter(|c| c.is_sortable()).collect()
    }

    /// Whether "Add Sort" is enabled: some sortable column is still unused
    pub fn can_add<H: TableHost + ?Sized>(&self, host: &H) -> bool {
        self.sorts.len() < self.sortable_columns(host).len()
    }

    /// Columns a sort row may switch to: those no other row uses
    pub fn available_columns<'h, H: TableHost + ?Sized>(&self, host: &'h H, id: &str) -> Vec<&'h ColumnDef> {
        self.sortable_columns(host)
            .into_iter()
            .filter(|c| !self.sorts.iter().any(|s| s.id != id && s.column_id == c.id))
            .collect()
    }

    /// Append an ascending sort on the first unused sortable column
    ///
    /// Falls back to the first sortable column when all are in use.
    pub fn add<H: TableHost + ?Sized>(&mut self, host: &mut H) -> Option<String> {
        let columns = self.sortable_columns(host);
        let column = columns
            .iter()
            .find(|c| !self.sorts.iter().any(|s| s.column_id == c.id))
            .or_else(|| columns.first())?;

        let sort = SortCondition {
            id: self.ids.next_id(),
            column_id: column.id.clone(),
            direction: SortDirection::Asc,
        };
        let id = sort.id.clone();

        self.sorts.push(sort);
        self.apply(host);
        Some(id)
    }

    pub fn remove<H: TableHost + ?Sized>(&mut self, host: &mut H, id: &str) -> Result<()> {
        let index = self.index_of(id)?;
        self.sorts.remove(index);
        self.apply(host);
        Ok(())
    }

    pub fn update_column<H: TableHost + ?Sized>(&mut self, host: &mut H, id: &str, column_id: &str) -> Result<()> {
        let index = self.index_of(id)?;
        if !host.column(column_id).map(ColumnDef::is_sortable).unwrap_or(false) {
            return Err(anyhow!("Column '{}' can't be sorted", column_id));
        }
        self.sorts[index].column_id = column_id.to_string();
        self.apply(host);
        Ok(())
    }

    pub fn update_direction<H: TableHost + ?Sized>(
        &mut self,
        host: &mut H,
        id: &str,
        direction: SortDirection,
    ) -> Result<()> {
        let index = self.index_of(id)?;
        self.sorts[index].direction = direction;
        self.apply(host);
        Ok(())
    }

    /// Remove every sort and reset the host's sorting
    pub fn clear<H: TableHost + ?Sized>(&mut self, host: &mut H) {
        self.sorts.clear();
        host.reset_sorting();
    }

    /// Push the current key list to the host
    pub fn apply<H: TableHost + ?Sized>(&self, host: &mut H) {
        if self.sorts.is_empty() {
            host.reset_sorting();
            return;
        }
        let keys: Vec<SortKey> = self.sorts.iter().map(SortCondition::to_key).collect();
        debug!("Sorting by {} keys", keys.len());
        host.set_sorting(keys);
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.sorts
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| anyhow!("No sort with id '{}'", id))
    }
}
