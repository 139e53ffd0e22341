//! Whole-form validation over a compiled schema.

use std::collections::BTreeMap;

use curate_core::models::validation::ValidationResult;
use curate_core::path::as_index;
use curate_core::{EvidenceValue, FieldDefinition, FieldPath, Schema};
use indexmap::IndexMap;

use crate::rule::{Rule, compile, first_failure};

/// Rules for one schema node and everything below it.
#[derive(Debug, Clone, Default)]
struct CompiledField {
    rules: Vec<Rule>,
    properties: IndexMap<String, CompiledField>,
    items: Option<Box<CompiledField>>,
}

impl CompiledField {
    fn from_definition(def: &FieldDefinition) -> Self {
        Self {
            rules: compile(def),
            properties: def
                .properties
                .iter()
                .map(|(name, child)| (name.clone(), CompiledField::from_definition(child)))
                .collect(),
            items: def
                .items
                .as_deref()
                .map(|items| Box::new(CompiledField::from_definition(items))),
        }
    }

    fn child(&self, segment: &str) -> Option<&CompiledField> {
        match &self.items {
            Some(items) if as_index(segment).is_some() => Some(items),
            Some(items) => items.properties.get(segment),
            None => self.properties.get(segment),
        }
    }

    fn visit(
        &self,
        path: &FieldPath,
        value: Option<&EvidenceValue>,
        errors: &mut BTreeMap<String, String>,
    ) {
        if let Some(message) = first_failure(&self.rules, value) {
            errors.insert(path.to_string(), message);
        }

        match value {
            Some(EvidenceValue::Object(map)) => {
                for (name, child) in &self.properties {
                    child.visit(&path.child(name.as_str()), map.get(name.as_str()), errors);
                }
            }
            Some(EvidenceValue::Array(elements)) => {
                if let Some(items) = &self.items {
                    for (index, element) in elements.iter().enumerate() {
                        items.visit(&path.index(index), Some(element), errors);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Every definition of a schema compiled once, ready to validate any
/// number of evidence versions.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: IndexMap<String, CompiledField>,
}

impl RuleSet {
    pub fn for_schema(schema: &Schema) -> Self {
        let fields: IndexMap<_, _> = schema
            .fields
            .iter()
            .map(|(name, def)| (name.clone(), CompiledField::from_definition(def)))
            .collect();
        tracing::debug!(
            schema = schema.id.as_deref().unwrap_or("<unnamed>"),
            fields = fields.len(),
            "compiled validation rules"
        );
        Self { fields }
    }

    /// The rules attached to the field at `path`. Unknown paths have none.
    pub fn rules_for(&self, path: &FieldPath) -> &[Rule] {
        let Some((first, rest)) = path.segments().split_first() else {
            return &[];
        };
        let Some(mut current) = self.fields.get(first) else {
            return &[];
        };
        for segment in rest {
            match current.child(segment) {
                Some(next) => current = next,
                None => return &[],
            }
        }
        &current.rules
    }

    /// First failing message for a single field value.
    pub fn check_field(&self, path: &FieldPath, value: Option<&EvidenceValue>) -> Option<String> {
        first_failure(self.rules_for(path), value)
    }
}

/// Validate the whole evidence tree. Each top-level field is checked, then
/// the walk descends into present objects and into every current array
/// element. Only the first failing rule per path is reported.
pub fn validate(schema: &Schema, rules: &RuleSet, data: &EvidenceValue) -> ValidationResult {
    let root = data.as_object();
    let mut errors = BTreeMap::new();

    for name in schema.fields.keys() {
        let Some(field) = rules.fields.get(name) else {
            continue;
        };
        let value = root.and_then(|map| map.get(name.as_str()));
        field.visit(&FieldPath::parse(name), value, &mut errors);
    }

    ValidationResult::from_errors(errors)
}
