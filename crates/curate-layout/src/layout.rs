use std::sync::Arc;

use curate_core::schema::{Section, Tab};
use curate_core::{FieldPath, Schema};
use serde::Serialize;
use ts_rs::TS;

/// How the form is arranged.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum Layout {
    Tabbed {
        tabs: Vec<TabView>,
    },
    /// Top-level field paths in declaration order.
    Flat {
        #[ts(type = "Array<string>")]
        fields: Vec<FieldPath>,
    },
}

impl Layout {
    pub fn tabs(&self) -> &[TabView] {
        match self {
            Layout::Tabbed { tabs } => tabs,
            Layout::Flat { .. } => &[],
        }
    }

    /// Every placed field path in display order, tab by tab and section by
    /// section.
    pub fn field_paths(&self) -> Vec<&FieldPath> {
        match self {
            Layout::Flat { fields } => fields.iter().collect(),
            Layout::Tabbed { tabs } => tabs
                .iter()
                .flat_map(|tab| tab.sections.iter())
                .flat_map(|section| section.fields.iter())
                .collect(),
        }
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, Layout::Flat { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TabView {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub show_score_badge: bool,
    /// Shared so open-state can tell a new section list from the same one.
    #[ts(as = "Vec<SectionView>")]
    pub sections: Arc<Vec<SectionView>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SectionView {
    pub name: String,
    pub icon: Option<String>,
    pub help_text: Option<String>,
    pub initially_open: bool,
    #[ts(type = "Array<string>")]
    pub fields: Vec<FieldPath>,
}

impl From<&Section> for SectionView {
    fn from(section: &Section) -> Self {
        Self {
            name: section.name.clone(),
            icon: section.icon.clone(),
            help_text: section.help_text.clone(),
            initially_open: section.collapsed != Some(true),
            fields: section.fields.clone(),
        }
    }
}

impl From<&Tab> for TabView {
    fn from(tab: &Tab) -> Self {
        Self {
            id: tab.id.clone(),
            name: tab.name.clone(),
            icon: tab.icon.clone(),
            show_score_badge: tab.show_score_badge,
            sections: Arc::new(tab.sections.iter().map(SectionView::from).collect()),
        }
    }
}

/// Arrange the schema's fields.
///
/// Without a layout the result is every top-level field in declaration
/// order. With one, tabs and sections come out exactly as declared, with no
/// reordering or de-duplication. A single tab stays a tab. A layout whose
/// tabs all lack sections is unusable and falls back to the flat list.
pub fn organize(schema: &Schema) -> Layout {
    let Some(tabs) = schema.layout() else {
        return Layout::Flat {
            fields: schema.top_level_paths(),
        };
    };

    if !tabs.iter().any(|tab| !tab.sections.is_empty()) {
        tracing::warn!(
            schema = schema.id.as_deref().unwrap_or("<unnamed>"),
            tabs = tabs.len(),
            "layout has no usable tabs, falling back to flat field list"
        );
        return Layout::Flat {
            fields: schema.top_level_paths(),
        };
    }

    Layout::Tabbed {
        tabs: tabs.iter().map(TabView::from).collect(),
    }
}
