//! Order-by parsing and sort-field validation
//!
//! The client sorts by a single resource field, optionally followed by a
//! direction qualifier. Validation happens before any data is fetched: an
//! unknown field rejects the whole request and the repository is never
//! called.

use crate::core::entity::{Entity, Resource};
use crate::core::error::QueryError;
use crate::mapping::property::FieldMapping;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// The opposite direction
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn is_descending(self) -> bool {
        self == SortDirection::Descending
    }

    /// Apply this direction to an ascending comparison result
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    fn from_qualifier(qualifier: &str) -> Option<Self> {
        match qualifier.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

/// A parsed order-by expression: one resource field and a direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Resource field as written by the client (trimmed)
    pub field: String,
    pub direction: SortDirection,
}

impl OrderBy {
    /// Parse `field`, `field asc|ascending` or `field desc|descending`
    ///
    /// Qualifiers are case-insensitive. A blank expression means "no
    /// explicit order" and yields `None`. Multi-key expressions (containing
    /// a comma) and unknown qualifiers are rejected.
    pub fn parse(expression: &str) -> Result<Option<Self>, QueryError> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Ok(None);
        }

        let invalid = || QueryError::InvalidSortField {
            field: expression.to_string(),
        };

        if expression.contains(',') {
            return Err(invalid());
        }

        let mut tokens = expression.split_whitespace();
        let field = tokens.next().ok_or_else(invalid)?;
        let direction = match tokens.next() {
            None => SortDirection::Ascending,
            Some(qualifier) => SortDirection::from_qualifier(qualifier).ok_or_else(invalid)?,
        };

        if tokens.next().is_some() {
            return Err(invalid());
        }

        Ok(Some(Self {
            field: field.to_string(),
            direction,
        }))
    }
}

/// One entity-level sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKey {
    /// Canonical entity field name
    pub field: String,
    pub direction: SortDirection,
}

/// A validated order-by expression translated to entity sort keys
///
/// Keys are applied in order: primary first, then secondary, and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortClause {
    /// Canonical resource field the client sorted by
    pub resource_field: &'static str,
    pub keys: Vec<SortKey>,
}

impl fmt::Display for SortClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self
            .keys
            .iter()
            .map(|key| format!("{} {}", key.field, key.direction))
            .collect();
        write!(f, "{}", keys.join(", "))
    }
}

/// Validates order-by expressions against one field mapping
pub struct SortValidator<'a, R, E> {
    mapping: &'a FieldMapping<R, E>,
}

impl<'a, R: Resource, E: Entity> SortValidator<'a, R, E> {
    pub fn new(mapping: &'a FieldMapping<R, E>) -> Self {
        Self { mapping }
    }

    /// Check an order-by expression without translating it
    ///
    /// Blank expressions are valid.
    pub fn is_valid(&self, expression: &str) -> bool {
        self.resolve(Some(expression)).is_ok()
    }

    /// Validate an order-by expression and translate it to entity sort keys
    ///
    /// For each mapped entity field the effective direction is the requested
    /// direction, reversed when the mapped property carries the reversal
    /// flag. Returns `None` when no explicit order was requested.
    pub fn resolve(&self, expression: Option<&str>) -> Result<Option<SortClause>, QueryError> {
        let Some(expression) = expression else {
            return Ok(None);
        };
        let Some(order_by) = OrderBy::parse(expression).inspect_err(|_| {
            tracing::debug!(
                resource = R::type_name(),
                order_by = expression,
                "Rejected malformed order-by expression"
            );
        })?
        else {
            return Ok(None);
        };

        let entry = self.mapping.get(&order_by.field).ok_or_else(|| {
            tracing::debug!(
                resource = R::type_name(),
                field = %order_by.field,
                "Rejected unknown sort field"
            );
            QueryError::InvalidSortField {
                field: order_by.field.clone(),
            }
        })?;

        let keys = entry
            .properties()
            .iter()
            .map(|property| SortKey {
                field: property.name.clone(),
                direction: if property.revert_sort_direction {
                    order_by.direction.reversed()
                } else {
                    order_by.direction
                },
            })
            .collect();

        Ok(Some(SortClause {
            resource_field: entry.resource_field(),
            keys,
        }))
    }
}
