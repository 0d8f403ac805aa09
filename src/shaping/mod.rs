//! Output shaping
//!
//! Validates the client's requested output fields against a resource's
//! declared fields and narrows each result to exactly those fields.

pub mod selection;
pub mod shaped;

pub use selection::{FieldSelection, project, type_has_properties};
pub use shaped::ShapedResult;
