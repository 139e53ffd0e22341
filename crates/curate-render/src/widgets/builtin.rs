//! One renderer per field type.

use curate_core::{EvidenceValue, FieldDefinition};

use crate::node::{RenderNode, Widget};
use crate::renderer::{FieldRenderer, RenderContext};
use crate::widgets::{map_strings, normalize_curie, parse_number};

/// Single- or multi-line text; also email and url, which only differ in the
/// input type hint.
pub struct TextRenderer {
    pub name: &'static str,
    pub input_type: &'static str,
    pub multiline: bool,
}

impl FieldRenderer for TextRenderer {
    fn name(&self) -> &str {
        self.name
    }

    fn render(
        &self,
        ctx: &RenderContext<'_>,
        def: &FieldDefinition,
        value: Option<&EvidenceValue>,
    ) -> RenderNode {
        let widget = Widget::Text {
            multiline: self.multiline,
            input_type: self.input_type.to_string(),
        };
        ctx.node(self.name, widget, def, value)
    }

    fn normalize(&self, _def: &FieldDefinition, raw: &EvidenceValue) -> EvidenceValue {
        match self.input_type {
            "email" | "url" => map_strings(raw, |s| s.trim().to_string()),
            _ => raw.clone(),
        }
    }
}

pub struct NumberRenderer;

impl FieldRenderer for NumberRenderer {
    fn name(&self) -> &str {
        "number"
    }

    fn render(
        &self,
        ctx: &RenderContext<'_>,
        def: &FieldDefinition,
        value: Option<&EvidenceValue>,
    ) -> RenderNode {
        let widget = Widget::Number {
            min: def.minimum,
            max: def.maximum,
            step: None,
        };
        ctx.node(self.name(), widget, def, value)
    }

    fn normalize(&self, _def: &FieldDefinition, raw: &EvidenceValue) -> EvidenceValue {
        parse_number(raw)
    }
}

pub struct BooleanRenderer;

impl FieldRenderer for BooleanRenderer {
    fn name(&self) -> &str {
        "boolean"
    }

    fn render(
        &self,
        ctx: &RenderContext<'_>,
        def: &FieldDefinition,
        value: Option<&EvidenceValue>,
    ) -> RenderNode {
        ctx.node(self.name(), Widget::Checkbox, def, value)
    }

    fn normalize(&self, _def: &FieldDefinition, raw: &EvidenceValue) -> EvidenceValue {
        match raw {
            EvidenceValue::String(s) => {
                let on = matches!(
                    s.trim().to_ascii_lowercase().as_str(),
                    "true" | "on" | "yes" | "1"
                );
                EvidenceValue::Bool(on)
            }
            EvidenceValue::Null => EvidenceValue::Bool(false),
            other => EvidenceValue::Bool(!other.is_falsy()),
        }
    }
}

pub struct DateRenderer;

impl FieldRenderer for DateRenderer {
    fn name(&self) -> &str {
        "date"
    }

    fn render(
        &self,
        ctx: &RenderContext<'_>,
        def: &FieldDefinition,
        value: Option<&EvidenceValue>,
    ) -> RenderNode {
        ctx.node(self.name(), Widget::Date, def, value)
    }

    /// Calendar dates are stored as `YYYY-MM-DD`; a full timestamp keeps
    /// only its UTC date.
    fn normalize(&self, _def: &FieldDefinition, raw: &EvidenceValue) -> EvidenceValue {
        map_strings(raw, |s| {
            let s = s.trim();
            if let Ok(date) = s.parse::<jiff::civil::Date>() {
                return date.to_string();
            }
            if let Ok(ts) = s.parse::<jiff::Timestamp>() {
                return ts.to_zoned(jiff::tz::TimeZone::UTC).date().to_string();
            }
            s.to_string()
        })
    }
}

/// Select and multiselect. Options are the definition's `enum` values.
pub struct SelectRenderer {
    pub multiple: bool,
}

impl SelectRenderer {
    fn options(def: &FieldDefinition) -> Vec<EvidenceValue> {
        def.allowed_values
            .as_ref()
            .and_then(serde_json::Value::as_array)
            .map(|values| values.iter().cloned().map(EvidenceValue::from).collect())
            .unwrap_or_default()
    }

    /// Snap typed text to the canonical option it names, ignoring case.
    fn canonical(options: &[EvidenceValue], input: &str) -> EvidenceValue {
        let input = input.trim();
        options
            .iter()
            .find(|option| option.to_text().eq_ignore_ascii_case(input))
            .cloned()
            .unwrap_or_else(|| EvidenceValue::from(input))
    }
}

impl FieldRenderer for SelectRenderer {
    fn name(&self) -> &str {
        if self.multiple { "multiselect" } else { "select" }
    }

    fn render(
        &self,
        ctx: &RenderContext<'_>,
        def: &FieldDefinition,
        value: Option<&EvidenceValue>,
    ) -> RenderNode {
        let widget = Widget::Select {
            options: Self::options(def).iter().map(EvidenceValue::to_text).collect(),
            multiple: self.multiple,
        };
        ctx.node(self.name(), widget, def, value)
    }

    fn normalize(&self, def: &FieldDefinition, raw: &EvidenceValue) -> EvidenceValue {
        let options = Self::options(def);
        match (raw, self.multiple) {
            (EvidenceValue::String(s), false) if s.trim().is_empty() => EvidenceValue::Null,
            (EvidenceValue::String(s), false) => Self::canonical(&options, s),
            (EvidenceValue::String(s), true) => EvidenceValue::array(
                s.split(',')
                    .filter(|part| !part.trim().is_empty())
                    .map(|part| Self::canonical(&options, part))
                    .collect(),
            ),
            (EvidenceValue::Array(items), true) => EvidenceValue::array(
                items
                    .iter()
                    .map(|item| match item {
                        EvidenceValue::String(s) => Self::canonical(&options, s),
                        other => other.clone(),
                    })
                    .collect(),
            ),
            (other, _) => other.clone(),
        }
    }
}

pub struct ObjectRenderer;

impl FieldRenderer for ObjectRenderer {
    fn name(&self) -> &str {
        "object"
    }

    fn render(
        &self,
        ctx: &RenderContext<'_>,
        def: &FieldDefinition,
        value: Option<&EvidenceValue>,
    ) -> RenderNode {
        ctx.node(self.name(), Widget::Group, def, value)
    }
}

pub struct ArrayRenderer;

impl FieldRenderer for ArrayRenderer {
    fn name(&self) -> &str {
        "array"
    }

    fn render(
        &self,
        ctx: &RenderContext<'_>,
        def: &FieldDefinition,
        value: Option<&EvidenceValue>,
    ) -> RenderNode {
        let items = value.and_then(EvidenceValue::as_array).map_or(0, <[_]>::len);
        ctx.node(self.name(), Widget::List { items }, def, value)
    }
}

/// Plain-text entry of a domain identifier with CURIE normalisation.
pub struct IdentifierRenderer {
    pub name: &'static str,
    pub prefix: &'static str,
    pub width: Option<usize>,
}

impl FieldRenderer for IdentifierRenderer {
    fn name(&self) -> &str {
        self.name
    }

    fn render(
        &self,
        ctx: &RenderContext<'_>,
        def: &FieldDefinition,
        value: Option<&EvidenceValue>,
    ) -> RenderNode {
        let widget = Widget::Identifier {
            prefix: self.prefix.to_string(),
            lookup: false,
        };
        ctx.node(self.name, widget, def, value)
    }

    fn normalize(&self, _def: &FieldDefinition, raw: &EvidenceValue) -> EvidenceValue {
        map_strings(raw, |s| normalize_curie(s, self.prefix, self.width))
    }
}

/// PubMed identifiers are stored as bare digits.
pub struct PmidRenderer;

impl FieldRenderer for PmidRenderer {
    fn name(&self) -> &str {
        "pmid"
    }

    fn render(
        &self,
        ctx: &RenderContext<'_>,
        def: &FieldDefinition,
        value: Option<&EvidenceValue>,
    ) -> RenderNode {
        let widget = Widget::Identifier {
            prefix: "PMID".to_string(),
            lookup: false,
        };
        ctx.node(self.name(), widget, def, value)
    }

    fn normalize(&self, _def: &FieldDefinition, raw: &EvidenceValue) -> EvidenceValue {
        normalize_pmid(raw)
    }
}

pub(crate) fn normalize_pmid(raw: &EvidenceValue) -> EvidenceValue {
    match raw {
        EvidenceValue::Number(n) => EvidenceValue::String(n.to_string()),
        other => map_strings(other, |s| {
            let curie = normalize_curie(s, "PMID", None);
            match curie.strip_prefix("PMID:") {
                Some(digits) => digits.to_string(),
                None => curie,
            }
        }),
    }
}

pub struct ScoreRenderer;

impl FieldRenderer for ScoreRenderer {
    fn name(&self) -> &str {
        "score"
    }

    fn render(
        &self,
        ctx: &RenderContext<'_>,
        def: &FieldDefinition,
        value: Option<&EvidenceValue>,
    ) -> RenderNode {
        let widget = Widget::Number {
            min: def.minimum,
            max: def.maximum,
            step: Some(0.5),
        };
        ctx.node(self.name(), widget, def, value)
    }

    fn normalize(&self, _def: &FieldDefinition, raw: &EvidenceValue) -> EvidenceValue {
        parse_number(raw)
    }
}
