//! curate-render
//!
//! Field rendering dispatcher. Each field path is matched to a renderer
//! (a specialized widget named by the definition's `component`, else the
//! built-in widget for its type, else a plain text input) and the form is
//! turned into a serialisable tree of [`RenderNode`]s for the presentation
//! layer.

pub mod dispatch;
pub mod node;
pub mod registry;
pub mod renderer;
pub mod widgets;

pub use crate::dispatch::{
    FormView, RenderedForm, add_item, normalize_input, remove_item, render_field, render_form,
};
pub use crate::node::{RenderNode, Widget};
pub use crate::registry::{RendererHandle, RendererRegistry, registry, resolve_renderer};
pub use crate::renderer::{FieldRenderer, RenderContext};
