//! Filter types, operators and the row filter evaluator

use anyhow::{anyhow, Error, Result};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::value::{CellValue, FilterValue};

/// The category of a column's filter, deciding operators and value shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterType {
    #[default]
    #[display(fmt = "text")]
    Text,
    #[display(fmt = "number")]
    Number,
    /// Numeric `[min, max]`, inclusive
    #[display(fmt = "range")]
    Range,
    #[display(fmt = "date")]
    Date,
    /// Date `[start, end]`, inclusive
    #[display(fmt = "dateRange")]
    DateRange,
    #[display(fmt = "boolean")]
    Boolean,
    #[display(fmt = "select")]
    Select,
    /// Comma-joined tokens, any of which may match
    #[display(fmt = "multiSelect")]
    MultiSelect,
}

impl FilterType {
    pub const ALL: [FilterType; 8] = [
        FilterType::Text,
        FilterType::Number,
        FilterType::Range,
        FilterType::Date,
        FilterType::DateRange,
        FilterType::Boolean,
        FilterType::Select,
        FilterType::MultiSelect,
    ];

    /// Operators offered for this type, default first
    pub fn operators(self) -> &'static [Operator] {
        use Operator::*;
        match self {
            FilterType::Text => &[
                Contains,
                NotContains,
                Is,
                IsNot,
                StartsWith,
                EndsWith,
                IsEmpty,
                IsNotEmpty,
            ],
            FilterType::Number => &[Equals, GreaterThan, GreaterOrEqual, LessThan, LessOrEqual],
            FilterType::Range | FilterType::DateRange => &[Between],
            FilterType::Date => &[Equals, Before, After],
            FilterType::Boolean => &[Is],
            FilterType::Select => &[Is, IsNot],
            FilterType::MultiSelect => &[In],
        }
    }

    /// The operator a new condition starts with
    pub fn default_operator(self) -> Operator {
        self.operators()[0]
    }

    pub fn supports(self, operator: Operator) -> bool {
        self.operators().contains(&operator)
    }

    /// Whether values are `[low, high]` pairs
    pub fn takes_pair(self) -> bool {
        matches!(self, FilterType::Range | FilterType::DateRange)
    }
}

impl FromStr for FilterType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FilterType::ALL
            .into_iter()
            .find(|t| t.to_string() == s)
            .ok_or_else(|| anyhow!("Unknown filter type '{}'", s))
    }
}

/// A comparison a condition applies, tagged as it is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Operator {
    #[display(fmt = "contains")]
    #[serde(rename = "contains")]
    Contains,
    #[display(fmt = "notContains")]
    #[serde(rename = "notContains")]
    NotContains,
    #[display(fmt = "is")]
    #[serde(rename = "is")]
    Is,
    #[display(fmt = "isNot")]
    #[serde(rename = "isNot")]
    IsNot,
    #[display(fmt = "startsWith")]
    #[serde(rename = "startsWith")]
    StartsWith,
    #[display(fmt = "endsWith")]
    #[serde(rename = "endsWith")]
    EndsWith,
    #[display(fmt = "isEmpty")]
    #[serde(rename = "isEmpty")]
    IsEmpty,
    #[display(fmt = "isNotEmpty")]
    #[serde(rename = "isNotEmpty")]
    IsNotEmpty,
    #[display(fmt = "=")]
    #[serde(rename = "=")]
    Equals,
    #[display(fmt = ">")]
    #[serde(rename = ">")]
    GreaterThan,
    #[display(fmt = ">=")]
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[display(fmt = "<")]
    #[serde(rename = "<")]
    LessThan,
    #[display(fmt = "<=")]
    #[serde(rename = "<=")]
    LessOrEqual,
    #[display(fmt = "between")]
    #[serde(rename = "between")]
    Between,
    #[display(fmt = "before")]
    #[serde(rename = "before")]
    Before,
    #[display(fmt = "after")]
    #[serde(rename = "after")]
    After,
    #[display(fmt = "in")]
    #[serde(rename = "in")]
    In,
}

impl Operator {
    pub const ALL: [Operator; 17] = [
        Operator::Contains,
        Operator::NotContains,
        Operator::Is,
        Operator::IsNot,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::IsEmpty,
        Operator::IsNotEmpty,
        Operator::Equals,
        Operator::GreaterThan,
        Operator::GreaterOrEqual,
        Operator::LessThan,
        Operator::LessOrEqual,
        Operator::Between,
        Operator::Before,
        Operator::After,
        Operator::In,
    ];

    /// The stored tag, e.g. `"notContains"` or `">="`
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Contains => "contains",
            Operator::NotContains => "notContains",
            Operator::Is => "is",
            Operator::IsNot => "isNot",
            Operator::StartsWith => "startsWith",
            Operator::EndsWith => "endsWith",
            Operator::IsEmpty => "isEmpty",
            Operator::IsNotEmpty => "isNotEmpty",
            Operator::Equals => "=",
            Operator::GreaterThan => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessOrEqual => "<=",
            Operator::Between => "between",
            Operator::Before => "before",
            Operator::After => "after",
            Operator::In => "in",
        }
    }

    /// Label shown in the operator picker for a column of `filter_type`
    pub fn label(self, filter_type: FilterType) -> &'static str {
        match (self, filter_type) {
            (Operator::Equals, FilterType::Date) => "On",
            (Operator::Contains, _) => "Contains",
            (Operator::NotContains, _) => "Does not contain",
            (Operator::Is, _) => "Is",
            (Operator::IsNot, _) => "Is not",
            (Operator::StartsWith, _) => "Starts with",
            (Operator::EndsWith, _) => "Ends with",
            (Operator::IsEmpty, _) => "Is empty",
            (Operator::IsNotEmpty, _) => "Is not empty",
            (Operator::Between, _) => "Between",
            (Operator::Before, _) => "Before",
            (Operator::After, _) => "After",
            (Operator::In, _) => "In any",
            (op, _) => op.as_str(),
        }
    }

    /// Operators that look only at the cell and ignore the value input
    pub fn ignores_value(self) -> bool {
        matches!(self, Operator::IsEmpty | Operator::IsNotEmpty)
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| anyhow!("Unknown operator '{}'", s))
    }
}

/// One user-authored column/operator/value rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    pub id: String,
    pub column_id: String,
    pub operator: Operator,
    /// Absent until the user fills the value in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FilterValue>,
}

impl FilterCondition {
    pub fn new(id: impl Into<String>, column_id: impl Into<String>, operator: Operator) -> Self {
        Self {
            id: id.into(),
            column_id: column_id.into(),
            operator,
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<FilterValue>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Test one cell against one condition
pub fn evaluate(cell: &CellValue, condition: &FilterCondition, filter_type: FilterType) -> bool {
    matches_filter(cell, condition.operator, condition.value.as_ref(), filter_type)
}

/// Test one cell against an operator and value
///
/// Never fails: emptiness checks come first and consult only the cell, an
/// unset value passes, and an operator the type doesn't offer passes.
pub fn matches_filter(
    cell: &CellValue,
    operator: Operator,
    value: Option<&FilterValue>,
    filter_type: FilterType,
) -> bool {
    match operator {
        Operator::IsEmpty => return cell.to_filter_string().trim().is_empty(),
        Operator::IsNotEmpty => return !cell.to_filter_string().trim().is_empty(),
        _ => {}
    }

    let Some(value) = value.filter(|v| !v.is_unset()) else {
        return true;
    };

    match filter_type {
        FilterType::Text => {
            let cell = cell.to_filter_string().to_lowercase();
            let wanted = value.to_display_string().to_lowercase();
            match operator {
                Operator::Contains => cell.contains(&wanted),
                Operator::NotContains => !cell.contains(&wanted),
                Operator::Is => cell == wanted,
                Operator::IsNot => cell != wanted,
                Operator::StartsWith => cell.starts_with(&wanted),
                Operator::EndsWith => cell.ends_with(&wanted),
                _ => true,
            }
        }
        FilterType::Number => {
            let cell = cell.to_number();
            let wanted = value.to_number();
            match operator {
                Operator::Equals => cell == wanted,
                Operator::GreaterThan => cell > wanted,
                Operator::GreaterOrEqual => cell >= wanted,
                Operator::LessThan => cell < wanted,
                Operator::LessOrEqual => cell <= wanted,
                _ => true,
            }
        }
        FilterType::Range => match (operator, value.bounds()) {
            (Operator::Between, Some((min, max))) => {
                let cell = cell.to_number();
                cell >= min.to_number() && cell <= max.to_number()
            }
            _ => true,
        },
        FilterType::Date => {
            let cell = cell.to_timestamp();
            let wanted = value.to_timestamp();
            match operator {
                Operator::Equals => cell == wanted,
                Operator::Before => cell < wanted,
                Operator::After => cell > wanted,
                _ => true,
            }
        }
        FilterType::DateRange => match (operator, value.bounds()) {
            (Operator::Between, Some((start, end))) => {
                let cell = cell.to_timestamp();
                cell >= start.to_timestamp() && cell <= end.to_timestamp()
            }
            _ => true,
        },
        FilterType::Boolean => match operator {
            Operator::Is => cell.is_truthy() == value.is_truthy(),
            _ => true,
        },
        FilterType::Select => {
            let cell = cell.to_filter_string().to_lowercase();
            let wanted = value.to_display_string().to_lowercase();
            match operator {
                Operator::Is => cell == wanted,
                Operator::IsNot => cell != wanted,
                _ => true,
            }
        }
        FilterType::MultiSelect => match operator {
            Operator::In => {
                let cell = cell.to_filter_string().to_lowercase();
                value
                    .token_list()
                    .iter()
                    .any(|token| cell.contains(&token.to_lowercase()))
            }
            _ => true,
        },
    }
}

/// The predicate installed on a column: every condition must pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnFilter {
    pub filter_type: FilterType,
    pub conditions: Vec<FilterCondition>,
}

impl ColumnFilter {
    pub fn new(filter_type: FilterType, conditions: Vec<FilterCondition>) -> Self {
        Self {
            filter_type,
            conditions,
        }
    }

    pub fn matches(&self, cell: &CellValue) -> bool {
        self.conditions
            .iter()
            .all(|condition| evaluate(cell, condition, self.filter_type))
    }
}
