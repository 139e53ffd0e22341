use curate_core::path::as_index;
use curate_core::{EvidenceValue, FieldDefinition, FieldPath};

use crate::node::{RenderNode, Widget};

/// Where in the form a field is being rendered.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub path: &'a FieldPath,
    pub depth: usize,
    pub error: Option<&'a str>,
}

impl RenderContext<'_> {
    /// A node carrying everything common to all widgets. Children are
    /// filled in by the dispatcher.
    pub fn node(
        &self,
        renderer: &str,
        widget: Widget,
        def: &FieldDefinition,
        value: Option<&EvidenceValue>,
    ) -> RenderNode {
        RenderNode {
            path: self.path.clone(),
            renderer: renderer.to_string(),
            widget,
            label: label_for(self.path, def),
            required: def.required,
            depth: self.depth,
            value: value.cloned().unwrap_or_default(),
            error: self.error.map(String::from),
            placeholder: def.placeholder.clone(),
            hint: def.hint.clone(),
            tooltip: def.tooltip.clone(),
            help_url: def.help_url.clone(),
            icon: def.icon.clone(),
            children: Vec::new(),
        }
    }
}

/// A widget for one kind of field.
pub trait FieldRenderer: Send + Sync {
    /// Registry key: a component name for specialized widgets, a type tag
    /// for built-ins.
    fn name(&self) -> &str;

    fn render(
        &self,
        ctx: &RenderContext<'_>,
        def: &FieldDefinition,
        value: Option<&EvidenceValue>,
    ) -> RenderNode;

    /// Turn raw widget input into the value stored in the evidence.
    fn normalize(&self, _def: &FieldDefinition, raw: &EvidenceValue) -> EvidenceValue {
        raw.clone()
    }
}

/// The definition's label, else one derived from the last path segment:
/// `case_level` → "Case level", `3` → "Item 4".
pub fn label_for(path: &FieldPath, def: &FieldDefinition) -> String {
    if let Some(label) = &def.label {
        return label.clone();
    }
    let Some(last) = path.last() else {
        return String::new();
    };
    if let Some(index) = as_index(last) {
        return format!("Item {}", index + 1);
    }
    let words = last.replace(['_', '-'], " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
