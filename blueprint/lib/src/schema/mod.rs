//! The abstract schema data model, its validator and its text rendering.

mod render;
mod types;
mod validate;

pub use render::render;
pub use types::{AbstractSchema, Field, FieldType, Model, Reference};
pub use validate::{ValidationError, ValidationIssue, validate, validate_str};
