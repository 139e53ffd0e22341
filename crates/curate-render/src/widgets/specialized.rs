//! Widgets selected by a definition's `component`, independent of its type.

use curate_core::{EvidenceValue, FieldDefinition};

use crate::node::{RenderNode, Widget};
use crate::renderer::{FieldRenderer, RenderContext};
use crate::widgets::builtin::normalize_pmid;
use crate::widgets::{map_strings, normalize_curie, parse_number};

/// A searchable lookup against an ontology or registry. Stored values are
/// CURIEs with the lookup's prefix.
pub struct OntologyLookup {
    pub name: &'static str,
    pub prefix: &'static str,
    pub width: Option<usize>,
}

pub const GENE_LOOKUP: OntologyLookup = OntologyLookup {
    name: "GeneLookup",
    prefix: "HGNC",
    width: None,
};

pub const DISEASE_LOOKUP: OntologyLookup = OntologyLookup {
    name: "DiseaseLookup",
    prefix: "MONDO",
    width: Some(7),
};

impl FieldRenderer for OntologyLookup {
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
            lookup: true,
        };
        ctx.node(self.name, widget, def, value)
    }

    fn normalize(&self, _def: &FieldDefinition, raw: &EvidenceValue) -> EvidenceValue {
        map_strings(raw, |s| normalize_curie(s, self.prefix, self.width))
    }
}

pub struct PublicationLookup;

impl FieldRenderer for PublicationLookup {
    fn name(&self) -> &str {
        "PublicationLookup"
    }

    fn render(
        &self,
        ctx: &RenderContext<'_>,
        def: &FieldDefinition,
        value: Option<&EvidenceValue>,
    ) -> RenderNode {
        let widget = Widget::Identifier {
            prefix: "PMID".to_string(),
            lookup: true,
        };
        ctx.node(self.name(), widget, def, value)
    }

    fn normalize(&self, _def: &FieldDefinition, raw: &EvidenceValue) -> EvidenceValue {
        normalize_pmid(raw)
    }
}

/// Picks any number of HPO terms. Accepts a list or comma-separated text.
pub struct PhenotypeTermPicker;

impl FieldRenderer for PhenotypeTermPicker {
    fn name(&self) -> &str {
        "PhenotypeTermPicker"
    }

    fn render(
        &self,
        ctx: &RenderContext<'_>,
        def: &FieldDefinition,
        value: Option<&EvidenceValue>,
    ) -> RenderNode {
        ctx.node(self.name(), Widget::PhenotypePicker, def, value)
    }

    fn normalize(&self, _def: &FieldDefinition, raw: &EvidenceValue) -> EvidenceValue {
        let terms = match raw {
            EvidenceValue::String(s) => EvidenceValue::array(
                s.split([',', ';'])
                    .filter(|t| !t.trim().is_empty())
                    .map(EvidenceValue::from)
                    .collect(),
            ),
            EvidenceValue::Null => EvidenceValue::array(Vec::new()),
            other => other.clone(),
        };
        map_strings(&terms, |t| normalize_curie(t, "HP", Some(7)))
    }
}

/// Points entry for a scored evidence item, stepping by half points.
pub struct ScoreInput;

impl FieldRenderer for ScoreInput {
    fn name(&self) -> &str {
        "ScoreInput"
    }

    fn render(
        &self,
        ctx: &RenderContext<'_>,
        def: &FieldDefinition,
        value: Option<&EvidenceValue>,
    ) -> RenderNode {
        let widget = Widget::Score {
            min: def.minimum,
            max: def.maximum,
            step: 0.5,
        };
        ctx.node(self.name(), widget, def, value)
    }

    fn normalize(&self, _def: &FieldDefinition, raw: &EvidenceValue) -> EvidenceValue {
        parse_number(raw)
    }
}
