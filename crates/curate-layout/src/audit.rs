//! Layout diagnostics. Nothing here changes what is rendered.

use std::collections::HashSet;

use curate_core::{FieldPath, Schema};

/// Top-level fields that no section references, directly or through a
/// nested path. Empty when the schema has no layout.
pub fn unplaced_fields(schema: &Schema) -> Vec<FieldPath> {
    let Some(tabs) = schema.layout() else {
        return Vec::new();
    };

    let placed: HashSet<&str> = tabs
        .iter()
        .flat_map(|tab| &tab.sections)
        .flat_map(|section| &section.fields)
        .filter_map(|path| path.segments().first().map(String::as_str))
        .collect();

    let unplaced: Vec<FieldPath> = schema
        .fields
        .keys()
        .filter(|name| !placed.contains(name.as_str()))
        .map(|name| FieldPath::parse(name))
        .collect();

    for path in &unplaced {
        tracing::debug!(path = %path, "field is not placed in any layout section");
    }
    unplaced
}

/// Section paths the schema cannot resolve. Each one is logged; at render
/// time such paths get the text fallback.
pub fn unresolved_section_fields(schema: &Schema) -> Vec<FieldPath> {
    let Some(tabs) = schema.layout() else {
        return Vec::new();
    };

    let mut unresolved = Vec::new();
    for tab in tabs {
        for section in &tab.sections {
            for path in &section.fields {
                if schema.field(path).is_none() {
                    tracing::warn!(
                        tab = %tab.name,
                        section = %section.name,
                        path = %path,
                        "layout references a field the schema does not define"
                    );
                    unresolved.push(path.clone());
                }
            }
        }
    }
    unresolved
}
