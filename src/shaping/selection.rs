//! Requested output fields
//!
//! The `fields` query parameter is a comma-separated list of resource field
//! names. It is checked against the resource's declared fields before any
//! data is fetched.

use crate::core::entity::{FieldTable, Resource};
use crate::core::error::QueryError;
use crate::shaping::shaped::ShapedResult;

/// Check that every token of a comma-separated field list names a declared
/// field of `R` (case-insensitive)
///
/// Blank input is valid and means "all fields".
pub fn type_has_properties<R: FieldTable>(fields_csv: &str) -> bool {
    tokens(fields_csv).all(R::has_field)
}

/// A validated set of output fields for resource type `R`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelection {
    /// Every declared field, in declaration order
    All,
    /// Only these canonical field names, in request order, without duplicates
    Only(Vec<&'static str>),
}

impl FieldSelection {
    /// Parse and validate a comma-separated field list for `R`
    ///
    /// Tokens are trimmed and matched case-insensitively; duplicates keep
    /// their first position. The first unknown token is reported.
    pub fn parse<R: FieldTable>(fields_csv: Option<&str>) -> Result<Self, QueryError> {
        let mut selected: Vec<&'static str> = Vec::new();

        for token in tokens(fields_csv.unwrap_or_default()) {
            let field = R::resolve_field(token).ok_or_else(|| {
                tracing::debug!(
                    resource = R::type_name(),
                    field = token,
                    "Rejected unknown shape field"
                );
                QueryError::InvalidShapeField {
                    field: token.to_string(),
                }
            })?;

            if !selected.contains(&field) {
                selected.push(field);
            }
        }

        if selected.is_empty() {
            Ok(FieldSelection::All)
        } else {
            Ok(FieldSelection::Only(selected))
        }
    }

    /// Canonical field names this selection produces for `R`
    pub fn field_names<R: FieldTable>(&self) -> &[&'static str] {
        match self {
            FieldSelection::All => R::fields(),
            FieldSelection::Only(fields) => fields,
        }
    }

    /// Narrow a resource to the selected fields
    ///
    /// Values are read through the resource's own field accessor.
    pub fn project<R: Resource>(&self, resource: &R) -> ShapedResult {
        self.field_names::<R>()
            .iter()
            .filter_map(|field| {
                resource
                    .field_value(field)
                    .map(|value| (field.to_string(), value))
            })
            .collect()
    }

    /// Narrow every resource of a collection independently
    pub fn project_all<'a, R: Resource>(
        &self,
        resources: impl IntoIterator<Item = &'a R>,
    ) -> Vec<ShapedResult> {
        resources
            .into_iter()
            .map(|resource| self.project(resource))
            .collect()
    }
}

/// Validate a field list and narrow one resource in a single step
pub fn project<R: Resource>(resource: &R, fields_csv: &str) -> Result<ShapedResult, QueryError> {
    Ok(FieldSelection::parse::<R>(Some(fields_csv))?.project(resource))
}

fn tokens(fields_csv: &str) -> impl Iterator<Item = &str> {
    fields_csv
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
