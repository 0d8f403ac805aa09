//! Resource and entity traits built on static field tables
//!
//! A *resource* is the public API shape of an object, an *entity* is its
//! stored shape. Both describe their fields through a static table of names
//! and an explicit accessor, so field lookups never need reflection. String
//! comparison only happens at the input boundary, where a client-supplied
//! name is resolved to the canonical declared name.

use crate::core::field::FieldValue;

/// Static description of a type's public fields
///
/// Usually implemented through [`impl_field_table!`](crate::impl_field_table).
pub trait FieldTable {
    /// Type name used in configuration and error messages (e.g., "country")
    fn type_name() -> &'static str;

    /// Declared field names, in declaration order
    fn fields() -> &'static [&'static str];

    /// Get the value of a declared field
    ///
    /// `field` must be a canonical name from [`fields`](Self::fields).
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Resolve a client-supplied name to its canonical declared spelling
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    fn resolve_field(name: &str) -> Option<&'static str> {
        let name = name.trim();
        Self::fields()
            .iter()
            .copied()
            .find(|field| field.eq_ignore_ascii_case(name))
    }

    /// Check if the type declares a field with this name (case-insensitive)
    fn has_field(name: &str) -> bool {
        Self::resolve_field(name).is_some()
    }
}

/// A public API shape returned by collection endpoints
pub trait Resource: FieldTable + Send + Sync + 'static {}

/// A stored shape returned by repositories
pub trait Entity: FieldTable + Clone + Send + Sync + 'static {
    /// Field used to order results when the client asks for no explicit order
    ///
    /// Defaults to the first declared field.
    fn default_sort_field() -> &'static str {
        Self::fields().first().copied().unwrap_or_default()
    }
}
