//! Editor for a list of filter conditions across columns

use anyhow::{anyhow, Result};
use log::debug;
use platform::{UniqueIdGenerator, UuidGenerator};
use std::collections::HashMap;

use crate::column::{ColumnDef, TableHost};
use crate::filter::{ColumnFilter, FilterCondition, FilterType, Operator};
use crate::value::FilterValue;

/// Condition list behind the "Advanced Filters" popover
///
/// Every edit re-installs the predicate of every filterable column on the
/// host, so a column whose last condition goes away is cleared rather than
/// left filtering on stale conditions.
pub struct AdvancedFilter<G = UuidGenerator> {
    ids: G,
    conditions: Vec<FilterCondition>,
    is_open: bool,
}

impl AdvancedFilter<UuidGenerator> {
    pub fn new() -> Self {
        Self::with_ids(UuidGenerator)
    }
}

impl Default for AdvancedFilter<UuidGenerator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: UniqueIdGenerator> AdvancedFilter<G> {
    /// Create an editor that takes condition ids from `ids`
    pub fn with_ids(ids: G) -> Self {
        Self {
            ids,
            conditions: Vec::new(),
            is_open: false,
        }
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    pub fn condition(&self, id: &str) -> Option<&FilterCondition> {
        self.conditions.iter().find(|c| c.id == id)
    }

    /// Count shown on the trigger badge
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    pub fn toggle_open(&mut self) -> bool {
        self.is_open = !self.is_open;
        self.is_open
    }

    /// Columns the editor offers, in table order
    pub fn filterable_columns<'h, H: TableHost + ?Sized>(&self, host: &'h H) -> Vec<&'h ColumnDef> {
        host.columns().iter().filter(|c| c.is_filterable()).collect()
    }

    /// Resolved filter type of a condition's column
    pub fn filter_type_of<H: TableHost + ?Sized>(&self, host: &H, id: &str) -> Option<FilterType> {
        let condition = self.condition(id)?;
        host.column(&condition.column_id).map(|c| c.filter_type)
    }

    /// Whether the value input of a condition is disabled
    pub fn is_value_disabled(&self, id: &str) -> bool {
        self.condition(id)
            .map(|c| c.operator.ignores_value())
            .unwrap_or(false)
    }

    /// Append a condition on the first filterable column
    ///
    /// The condition starts with that column's default operator and no
    /// value. Returns `None` when the table has nothing to filter.
    pub fn add<H: TableHost + ?Sized>(&mut self, host: &mut H) -> Option<String> {
        let column = self.filterable_columns(host).first().copied()?;
        let condition = FilterCondition::new(
            self.ids.next_id(),
            column.id.clone(),
            column.filter_type.default_operator(),
        );
        let id = condition.id.clone();

        self.conditions.push(condition);
        self.apply(host);
        Some(id)
    }

    pub fn remove<H: TableHost + ?Sized>(&mut self, host: &mut H, id: &str) -> Result<()> {
        let index = self.index_of(id)?;
        self.conditions.remove(index);
        self.apply(host);
        Ok(())
    }

    /// Point a condition at another column
    ///
    /// A different column resets the operator to that column's default and
    /// clears the value.
    pub fn update_column<H: TableHost + ?Sized>(&mut self, host: &mut H, id: &str, column_id: &str) -> Result<()> {
        let index = self.index_of(id)?;
        let column = host
            .column(column_id)
            .filter(|c| c.is_filterable())
            .ok_or_else(|| anyhow!("Column '{}' can't be filtered", column_id))?;
        let operator = column.filter_type.default_operator();

        let condition = &mut self.conditions[index];
        if condition.column_id != column_id {
            condition.column_id = column_id.to_string();
            condition.operator = operator;
            condition.value = None;
        }
        self.apply(host);
        Ok(())
    }

    /// Change a condition's operator
    ///
    /// # Errors
    ///
    /// Fails if the operator isn't offered for the column's filter type.
    pub fn update_operator<H: TableHost + ?Sized>(
        &mut self,
        host: &mut H,
        id: &str,
        operator: Operator,
    ) -> Result<()> {
        let index = self.index_of(id)?;
        let filter_type = self.filter_type_of(host, id).unwrap_or_default();
        if !filter_type.supports(operator) {
            return Err(anyhow!(
                "Operator '{}' isn't available for {} filters",
                operator,
                filter_type
            ));
        }

        self.conditions[index].operator = operator;
        self.apply(host);
        Ok(())
    }

    /// Set or clear (`None`) a condition's value
    pub fn update_value<H: TableHost + ?Sized>(
        &mut self,
        host: &mut H,
        id: &str,
        value: Option<FilterValue>,
    ) -> Result<()> {
        let index = self.index_of(id)?;
        self.conditions[index].value = value;
        self.apply(host);
        Ok(())
    }

    /// Remove every condition
    pub fn clear<H: TableHost + ?Sized>(&mut self, host: &mut H) {
        self.conditions.clear();
        self.apply(host);
    }

    /// Re-install the predicate of every filterable column on the host
    pub fn apply<H: TableHost + ?Sized>(&self, host: &mut H) {
        let mut by_column: HashMap<&str, Vec<FilterCondition>> = HashMap::new();
        for condition in &self.conditions {
            by_column
                .entry(condition.column_id.as_str())
                .or_default()
                .push(condition.clone());
        }

        let targets: Vec<(String, FilterType)> = host
            .columns()
            .iter()
            .filter(|c| c.is_filterable())
            .map(|c| (c.id.clone(), c.filter_type))
            .collect();

        for (column_id, filter_type) in targets {
            match by_column.remove(column_id.as_str()) {
                Some(conditions) => {
                    debug!("Filtering column '{}' with {} conditions", column_id, conditions.len());
                    host.set_column_filter(&column_id, Some(ColumnFilter::new(filter_type, conditions)));
                }
                None => host.set_column_filter(&column_id, None),
            }
        }
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.conditions
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| anyhow!("No filter condition with id '{}'", id))
    }
}
