use curate_core::{EvidenceValue, FieldPath};
use serde::Serialize;
use ts_rs::TS;

/// What the presentation layer should draw for a field.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum Widget {
    Text {
        multiline: bool,
        input_type: String,
    },
    Number {
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
    },
    Checkbox,
    Date,
    Select {
        options: Vec<String>,
        multiple: bool,
    },
    /// An object: its properties are the children.
    Group,
    /// An array: one child per current element.
    List { items: usize },
    /// A domain identifier, typed in or picked through a lookup.
    Identifier { prefix: String, lookup: bool },
    PhenotypePicker,
    Score {
        min: Option<f64>,
        max: Option<f64>,
        step: f64,
    },
}

/// One rendered field and its nested children.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RenderNode {
    #[ts(type = "string")]
    pub path: FieldPath,
    /// Name of the renderer that produced this node.
    pub renderer: String,
    pub widget: Widget,
    pub label: String,
    pub required: bool,
    pub depth: usize,
    #[ts(type = "unknown")]
    pub value: EvidenceValue,
    pub error: Option<String>,
    pub placeholder: Option<String>,
    pub hint: Option<String>,
    pub tooltip: Option<String>,
    pub help_url: Option<String>,
    pub icon: Option<String>,
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    /// Every node in the subtree, parents before children.
    pub fn walk(&self) -> Vec<&RenderNode> {
        let mut nodes = vec![self];
        for child in &self.children {
            nodes.extend(child.walk());
        }
        nodes
    }

    pub fn find(&self, path: &FieldPath) -> Option<&RenderNode> {
        if &self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(path))
    }
}
