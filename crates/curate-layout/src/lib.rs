//! curate-layout
//!
//! Arranges a schema's fields into tabs and sections, or a flat list when
//! the schema declares no layout, and tracks which sections are open.

pub mod audit;
pub mod layout;
pub mod open_state;

pub use crate::audit::{unplaced_fields, unresolved_section_fields};
pub use crate::layout::{Layout, SectionView, TabView, organize};
pub use crate::open_state::{SectionOpenState, initial_open_sections};
