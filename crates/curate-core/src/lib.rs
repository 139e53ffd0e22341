//! curate-core
//!
//! Pure domain types for the evidence engine: the schema model, the
//! persistent evidence tree and the dotted field-path resolver.
//! No I/O and no async; every other crate builds on these types.

pub mod error;
pub mod evidence;
pub mod models;
pub mod path;
pub mod schema;

pub use crate::error::CoreError;
pub use crate::evidence::EvidenceValue;
pub use crate::path::FieldPath;
pub use crate::schema::{FieldDefinition, FieldType, Schema};
