//! The schema model: field definitions, layout and scoring configuration.
//!
//! Deserializes the backend wire shape directly (`field_definitions`,
//! `ui_configuration.layout.tabs`, `scoring_configuration`). Field keys are
//! accepted in camelCase and snake_case.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::path::{FieldPath, as_index};

/// The kind of container a field holds, for creating missing intermediates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Object,
    Array,
}

/// The type tag of a field. Unrecognised tags are kept verbatim so the
/// renderer can degrade to a text input instead of the schema failing to load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    Number,
    Boolean,
    Date,
    Array,
    Object,
    Select,
    Multiselect,
    Email,
    Url,
    /// HGNC gene identifier (`HGNC:1100`).
    HgncId,
    /// MONDO disease identifier (`MONDO:0007254`).
    MondoId,
    /// OMIM entry (`OMIM:113705`).
    OmimId,
    /// PubMed identifier.
    Pmid,
    /// Human Phenotype Ontology term (`HP:0001250`).
    HpoTerm,
    Score,
    Unknown(String),
}

impl FieldType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" | "string" => FieldType::Text,
            "textarea" => FieldType::Textarea,
            "number" | "integer" => FieldType::Number,
            "boolean" => FieldType::Boolean,
            "date" => FieldType::Date,
            "array" => FieldType::Array,
            "object" => FieldType::Object,
            "select" => FieldType::Select,
            "multiselect" => FieldType::Multiselect,
            "email" => FieldType::Email,
            "url" => FieldType::Url,
            "hgnc_id" => FieldType::HgncId,
            "mondo_id" => FieldType::MondoId,
            "omim_id" => FieldType::OmimId,
            "pmid" => FieldType::Pmid,
            "hpo_term" => FieldType::HpoTerm,
            "score" => FieldType::Score,
            _ => FieldType::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Array => "array",
            FieldType::Object => "object",
            FieldType::Select => "select",
            FieldType::Multiselect => "multiselect",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::HgncId => "hgnc_id",
            FieldType::MondoId => "mondo_id",
            FieldType::OmimId => "omim_id",
            FieldType::Pmid => "pmid",
            FieldType::HpoTerm => "hpo_term",
            FieldType::Score => "score",
            FieldType::Unknown(raw) => raw,
        }
    }

    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self {
            FieldType::Object => Some(ContainerKind::Object),
            FieldType::Array | FieldType::Multiselect => Some(ContainerKind::Array),
            _ => None,
        }
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        FieldType::parse(&value)
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.as_str().to_string()
    }
}

/// One node of the schema tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    // Constraints
    #[serde(default, deserialize_with = "lenient_bool")]
    pub required: bool,
    #[serde(default, alias = "min_length", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, alias = "max_length", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Allowed values. Kept raw: a non-list here disables the membership rule.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<serde_json::Value>,
    #[serde(default, alias = "error_message", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    // Presentation
    #[serde(default, alias = "title", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, alias = "description", skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(default, alias = "help_url", skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,

    // Composite
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, FieldDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<FieldDefinition>>,
}

impl FieldDefinition {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            ..Self::default()
        }
    }

    /// The stand-in for a path the schema does not know: an unconstrained
    /// text input.
    pub fn fallback() -> Self {
        Self::new(FieldType::Text)
    }

    /// The definition that governs `segment` below this one.
    fn child(&self, segment: &str) -> Option<&FieldDefinition> {
        match self.field_type {
            FieldType::Array | FieldType::Multiselect => {
                let items = self.items.as_deref()?;
                if as_index(segment).is_some() {
                    Some(items)
                } else {
                    // `list.name` is shorthand for `list.<n>.name`
                    items.properties.get(segment)
                }
            }
            _ => self.properties.get(segment),
        }
    }
}

/// `required` is sometimes a JSON-Schema style list of child names; only a
/// literal `true` marks the field itself required.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_bool().unwrap_or(false))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, alias = "show_score_badge")]
    pub show_score_badge: bool,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, alias = "help_text", skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    #[serde(default)]
    pub fields: Vec<FieldPath>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfiguration {
    #[serde(default)]
    pub tabs: Vec<Tab>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutConfiguration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScoringConfiguration {
    /// Opaque engine identifier; the scoring math never branches on it.
    #[serde(default)]
    pub engine: String,
    #[serde(default, alias = "maxScore")]
    pub max_score: f64,
    /// Label → minimum score. Order carries no meaning.
    #[serde(default, alias = "classificationThresholds")]
    pub classification_thresholds: IndexMap<String, f64>,
}

/// A curation methodology's schema. Read-only for the life of a form session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "field_definitions", alias = "fields")]
    pub fields: IndexMap<String, FieldDefinition>,
    #[serde(
        rename = "ui_configuration",
        alias = "uiConfiguration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ui: Option<UiConfiguration>,
    #[serde(
        rename = "scoring_configuration",
        alias = "scoringConfiguration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub scoring: Option<ScoringConfiguration>,
}

impl Schema {
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let schema: Schema = serde_json::from_str(json)?;
        schema.check()?;
        Ok(schema)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, CoreError> {
        let schema: Schema = serde_json::from_value(value)?;
        schema.check()?;
        Ok(schema)
    }

    fn check(&self) -> Result<(), CoreError> {
        if self.fields.is_empty() {
            return Err(CoreError::InvalidSchema(
                "field_definitions is empty".to_string(),
            ));
        }
        if let Some(scoring) = &self.scoring
            && (scoring.max_score < 0.0 || !scoring.max_score.is_finite())
        {
            return Err(CoreError::InvalidSchema(format!(
                "max_score must be a non-negative number, got {}",
                scoring.max_score
            )));
        }
        Ok(())
    }

    /// The declared tabs, if the schema carries a layout at all.
    pub fn layout(&self) -> Option<&[Tab]> {
        self.ui
            .as_ref()
            .and_then(|ui| ui.layout.as_ref())
            .map(|layout| layout.tabs.as_slice())
    }

    pub fn scoring_configuration(&self) -> Option<&ScoringConfiguration> {
        self.scoring.as_ref()
    }

    /// Top-level field paths in declaration order.
    pub fn top_level_paths(&self) -> Vec<FieldPath> {
        self.fields.keys().map(|k| FieldPath::parse(k)).collect()
    }

    /// Look up the definition governing `path`.
    pub fn field(&self, path: &FieldPath) -> Option<&FieldDefinition> {
        let (first, rest) = path.segments().split_first()?;
        let mut current = self.fields.get(first)?;
        for segment in rest {
            current = current.child(segment)?;
        }
        Some(current)
    }

    /// Like [`Schema::field`], but a miss yields the text fallback and a
    /// diagnostic instead of nothing.
    pub fn field_or_fallback(&self, path: &FieldPath) -> Cow<'_, FieldDefinition> {
        match self.field(path) {
            Some(def) => Cow::Borrowed(def),
            None => {
                tracing::warn!(
                    path = %path,
                    schema = self.id.as_deref().unwrap_or("<unnamed>"),
                    "field path not found in schema, using text fallback"
                );
                Cow::Owned(FieldDefinition::fallback())
            }
        }
    }

    /// Whether the field at `path` holds an object or an array.
    pub fn container_kind(&self, path: &FieldPath) -> Option<ContainerKind> {
        self.field(path).and_then(|def| def.field_type.container_kind())
    }
}
