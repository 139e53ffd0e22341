//! Recursive rendering of fields and forms, and the array edits the
//! rendered list widgets offer.

use curate_core::models::validation::ValidationResult;
use curate_core::path;
use curate_core::{EvidenceValue, FieldDefinition, FieldPath, FieldType, Schema};
use curate_layout::Layout;
use serde::Serialize;
use ts_rs::TS;

use crate::node::RenderNode;
use crate::registry::resolve_renderer;
use crate::renderer::RenderContext;

/// Everything a render pass reads. Borrowed; rendering never mutates.
#[derive(Debug, Clone, Copy)]
pub struct FormView<'a> {
    pub schema: &'a Schema,
    pub data: &'a EvidenceValue,
    pub validation: &'a ValidationResult,
}

/// The whole form: its arrangement plus one rendered tree per placed field.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RenderedForm {
    pub layout: Layout,
    pub fields: Vec<RenderNode>,
}

/// Render the field at `path` and everything below it. `depth` is the
/// nesting level of this field; children are rendered at `depth + 1`.
pub fn render_field(view: &FormView<'_>, path: &FieldPath, depth: usize) -> RenderNode {
    let def = view.schema.field_or_fallback(path);
    render_definition(view, path, &def, depth)
}

fn render_definition(
    view: &FormView<'_>,
    path: &FieldPath,
    def: &FieldDefinition,
    depth: usize,
) -> RenderNode {
    let value = path::get(view.data, path);
    let key = path.to_string();
    let ctx = RenderContext {
        path,
        depth,
        error: view.validation.error_for(&key),
    };

    let mut node = resolve_renderer(def).renderer().render(&ctx, def, value);

    node.children = match def.field_type {
        FieldType::Object => def
            .properties
            .iter()
            .map(|(name, child)| {
                render_definition(view, &path.child(name.as_str()), child, depth + 1)
            })
            .collect(),
        FieldType::Array => {
            let count = value.and_then(EvidenceValue::as_array).map_or(0, <[_]>::len);
            let fallback;
            let items = match def.items.as_deref() {
                Some(items) => items,
                None => {
                    if count > 0 {
                        tracing::warn!(path = %path, "array field has no item definition, using text fallback");
                    }
                    fallback = FieldDefinition::fallback();
                    &fallback
                }
            };
            (0..count)
                .map(|index| render_definition(view, &path.index(index), items, depth + 1))
                .collect()
        }
        _ => Vec::new(),
    };

    node
}

/// Render every placed field in layout order, each as a depth-0 tree.
pub fn render_form(view: &FormView<'_>, layout: &Layout) -> RenderedForm {
    let fields = layout
        .field_paths()
        .into_iter()
        .map(|path| render_field(view, path, 0))
        .collect();
    RenderedForm {
        layout: layout.clone(),
        fields,
    }
}

/// The empty value a new element of `def` starts as.
fn blank_value(def: &FieldDefinition) -> EvidenceValue {
    match def.field_type {
        FieldType::Object => EvidenceValue::object(),
        FieldType::Array | FieldType::Multiselect => EvidenceValue::array(Vec::new()),
        _ => EvidenceValue::Null,
    }
}

/// Append a blank element to the array at `path`, creating the array if it
/// does not exist yet.
pub fn add_item(schema: &Schema, data: &EvidenceValue, path: &FieldPath) -> EvidenceValue {
    let len = path::get(data, path)
        .and_then(EvidenceValue::as_array)
        .map_or(0, <[_]>::len);
    let blank = schema
        .field(path)
        .and_then(|def| def.items.as_deref())
        .map(blank_value)
        .unwrap_or_default();
    path::set(data, &path.index(len), blank, Some(schema))
}

/// Remove element `index` of the array at `path`; later elements shift down.
pub fn remove_item(data: &EvidenceValue, path: &FieldPath, index: usize) -> EvidenceValue {
    path::remove(data, &path.index(index))
}

/// Normalise raw widget input for the field, using the renderer that
/// would draw it.
pub fn normalize_input(def: &FieldDefinition, raw: &EvidenceValue) -> EvidenceValue {
    resolve_renderer(def).renderer().normalize(def, raw)
}
