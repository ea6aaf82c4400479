// Query Builder
// This module turns a form snapshot into a query object
// Each section of the form maps onto one clause of the query

use super::ast::{
    ApplyRule, ApplyToken, Comparand, Comparator, Connective, Direction, Filter, Options, Order,
    Query, Transformations,
};
use crate::error::QueryError;
use crate::form::{
    fields, ColumnChoice, ConditionRow, Dataset, FormState, LogicConnector, OrderKey,
    TransformationRow,
};
use tracing::debug;

/// Builds queries from form state
pub struct QueryBuilder;

impl QueryBuilder {
    /// Build the query object for the current state of the form
    pub fn build(form: &FormState) -> Result<Query, QueryError> {
        let dataset = form.dataset;

        let conditions = form
            .conditions
            .iter()
            .map(|row| Self::build_condition(dataset, row))
            .collect::<Result<Vec<_>, _>>()?;
        let where_ = Self::combine(conditions, form.connector);
        debug!(dataset = dataset.name(), filter = ?where_, "built WHERE");

        let columns = Self::build_columns(form);
        let order = Self::build_order(form)?;
        let group = Self::build_group(form);
        let apply = form
            .transformations
            .iter()
            .map(|row| Self::build_apply(dataset, row))
            .collect::<Result<Vec<_>, _>>()?;

        // TRANSFORMATIONS only appears when there is something to put in it
        let transformations = if group.is_empty() && apply.is_empty() {
            None
        } else {
            Some(Transformations { group, apply })
        };

        Ok(Query {
            where_,
            options: Options { columns, order },
            transformations,
        })
    }

    /// A single condition row; falls back to the dataset's default field and EQ
    fn build_condition(dataset: Dataset, row: &ConditionRow) -> Result<Filter, QueryError> {
        let key = match &row.field {
            Some(label) => fields::resolve_label(dataset, label)?,
            None => fields::default_field(dataset),
        };
        let op = match &row.operator {
            Some(label) => label.parse::<Comparator>()?,
            None => Comparator::Eq,
        };
        let value = if op.is_numeric() {
            Self::numeric_comparand(&row.text)
        } else {
            Comparand::Text(row.text.clone())
        };

        let comparison = Filter::Comparison { op, key, value };
        Ok(if row.not {
            comparison.negate()
        } else {
            comparison
        })
    }

    /// Read numeric input the way a form field coerces it:
    /// empty stays an empty string, blank is zero, garbage is invalid
    fn numeric_comparand(text: &str) -> Comparand {
        if text.is_empty() {
            return Comparand::Text(String::new());
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Comparand::Number(0.0);
        }
        if let Some(n) = Self::radix_literal(trimmed) {
            return Comparand::Number(n);
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Comparand::Number(n),
            _ => Comparand::Invalid,
        }
    }

    /// Unsigned 0x / 0o / 0b integer literals, e.g. "0x7E0" -> 2016
    fn radix_literal(text: &str) -> Option<f64> {
        let prefix = text.get(..2)?.to_ascii_lowercase();
        let radix = match prefix.as_str() {
            "0x" => 16,
            "0o" => 8,
            "0b" => 2,
            _ => return None,
        };
        let digits = &text[2..];
        // from_str_radix would also accept a sign here
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        u128::from_str_radix(digits, radix).ok().map(|n| n as f64)
    }

    /// Combine the condition filters under the selected connector
    /// With one condition the connector is ignored, except for NOT
    fn combine(mut filters: Vec<Filter>, connector: LogicConnector) -> Filter {
        match (filters.len(), connector) {
            (0, _) => Filter::Empty,
            (1, LogicConnector::None) => filters.remove(0).negate(),
            (1, _) => filters.remove(0),
            // "none of" = NOT (a OR b OR ...)
            (_, LogicConnector::None) => Filter::Logic {
                connective: Connective::Or,
                filters,
            }
            .negate(),
            (_, LogicConnector::Any) => Filter::Logic {
                connective: Connective::Or,
                filters,
            },
            (_, LogicConnector::All) => Filter::Logic {
                connective: Connective::And,
                filters,
            },
        }
    }

    fn build_columns(form: &FormState) -> Vec<String> {
        form.columns
            .iter()
            .filter(|choice| choice.is_checked())
            .map(|choice| match choice {
                ColumnChoice::Field { key, .. } => fields::prefixed(form.dataset, key),
                ColumnChoice::Transformation { name, .. } => name.clone(),
            })
            .collect()
    }

    fn build_order(form: &FormState) -> Result<Option<Order>, QueryError> {
        let mut keys = Vec::with_capacity(form.order.selected.len());
        for selected in &form.order.selected {
            keys.push(match selected {
                OrderKey::Field { label } => fields::resolve_label(form.dataset, label)?,
                OrderKey::Transformation { name } => name.clone(),
            });
        }

        // Descending always needs the object form, even with no keys
        let order = if form.order.descending {
            Some(Order::Sort {
                dir: Direction::Down,
                keys,
            })
        } else {
            match keys.len() {
                0 => None,
                1 => keys.pop().map(Order::Key),
                _ => Some(Order::Sort {
                    dir: Direction::Up,
                    keys,
                }),
            }
        };
        Ok(order)
    }

    fn build_group(form: &FormState) -> Vec<String> {
        form.groups
            .iter()
            .filter(|g| g.checked)
            .map(|g| fields::prefixed(form.dataset, &g.key))
            .collect()
    }

    /// A transformation row; defaults to COUNT over the dataset's default field
    fn build_apply(dataset: Dataset, row: &TransformationRow) -> Result<ApplyRule, QueryError> {
        let token = match &row.operator {
            Some(label) => label.parse::<ApplyToken>()?,
            None => ApplyToken::Count,
        };
        let key = match &row.field {
            Some(label) => fields::resolve_label(dataset, label)?,
            None => fields::default_field(dataset),
        };
        Ok(ApplyRule {
            name: row.name.clone(),
            token,
            key,
        })
    }
}
