//! Helpers for declaring resource and entity types

pub mod macros;
