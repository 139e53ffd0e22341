//! The static renderer registry.
//!
//! Populated once on first use and never mutated afterwards. Registering two
//! renderers under one key is a programming error and panics at startup.

use std::collections::HashMap;
use std::sync::LazyLock;

use curate_core::{FieldDefinition, FieldType};

use crate::renderer::FieldRenderer;
use crate::widgets::builtin::{
    ArrayRenderer, BooleanRenderer, DateRenderer, IdentifierRenderer, NumberRenderer,
    ObjectRenderer, PmidRenderer, ScoreRenderer, SelectRenderer, TextRenderer,
};
use crate::widgets::specialized::{
    DISEASE_LOOKUP, GENE_LOOKUP, PhenotypeTermPicker, PublicationLookup, ScoreInput,
};

static REGISTRY: LazyLock<RendererRegistry> = LazyLock::new(RendererRegistry::standard);

/// The process-wide registry.
pub fn registry() -> &'static RendererRegistry {
    &REGISTRY
}

/// Pick the renderer for a definition from the process-wide registry.
pub fn resolve_renderer(def: &FieldDefinition) -> RendererHandle<'static> {
    registry().resolve(def)
}

/// A resolved renderer and how it was chosen.
#[derive(Clone, Copy)]
pub enum RendererHandle<'a> {
    /// Named by the definition's `component`.
    Specialized(&'a dyn FieldRenderer),
    /// The built-in widget for the definition's type.
    BuiltIn(&'a dyn FieldRenderer),
    /// Neither matched; plain text input.
    Fallback(&'a dyn FieldRenderer),
}

impl<'a> RendererHandle<'a> {
    pub fn renderer(&self) -> &'a dyn FieldRenderer {
        match *self {
            RendererHandle::Specialized(r)
            | RendererHandle::BuiltIn(r)
            | RendererHandle::Fallback(r) => r,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, RendererHandle::Fallback(_))
    }
}

impl std::fmt::Debug for RendererHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            RendererHandle::Specialized(_) => "Specialized",
            RendererHandle::BuiltIn(_) => "BuiltIn",
            RendererHandle::Fallback(_) => "Fallback",
        };
        f.debug_tuple(kind).field(&self.renderer().name()).finish()
    }
}

pub struct RendererRegistry {
    specialized: HashMap<String, Box<dyn FieldRenderer>>,
    built_in: HashMap<FieldType, Box<dyn FieldRenderer>>,
    fallback: Box<dyn FieldRenderer>,
}

impl RendererRegistry {
    /// Build a registry. Panics if two specialized widgets share a name or
    /// two built-ins claim the same type.
    pub fn new(
        specialized: Vec<Box<dyn FieldRenderer>>,
        built_in: Vec<(FieldType, Box<dyn FieldRenderer>)>,
    ) -> Self {
        let mut by_name = HashMap::new();
        for renderer in specialized {
            let name = renderer.name().to_string();
            if by_name.insert(name.clone(), renderer).is_some() {
                panic!("specialized renderer `{name}` registered twice");
            }
        }

        let mut by_type = HashMap::new();
        for (field_type, renderer) in built_in {
            if let FieldType::Unknown(raw) = &field_type {
                panic!("built-in renderer registered for unknown type `{raw}`");
            }
            let tag = field_type.as_str().to_string();
            if by_type.insert(field_type, renderer).is_some() {
                panic!("built-in renderer for type `{tag}` registered twice");
            }
        }

        Self {
            specialized: by_name,
            built_in: by_type,
            fallback: Box::new(TextRenderer {
                name: "fallback",
                input_type: "text",
                multiline: false,
            }),
        }
    }

    /// Built-ins for every field type plus the domain lookup widgets.
    pub fn standard() -> Self {
        let specialized: Vec<Box<dyn FieldRenderer>> = vec![
            Box::new(GENE_LOOKUP),
            Box::new(DISEASE_LOOKUP),
            Box::new(PublicationLookup),
            Box::new(PhenotypeTermPicker),
            Box::new(ScoreInput),
        ];

        let text = |name: &'static str, input_type: &'static str, multiline: bool| -> Box<dyn FieldRenderer> {
            Box::new(TextRenderer {
                name,
                input_type,
                multiline,
            })
        };
        let identifier = |name: &'static str, prefix: &'static str, width: Option<usize>| -> Box<dyn FieldRenderer> {
            Box::new(IdentifierRenderer {
                name,
                prefix,
                width,
            })
        };

        let built_in: Vec<(FieldType, Box<dyn FieldRenderer>)> = vec![
            (FieldType::Text, text("text", "text", false)),
            (FieldType::Textarea, text("textarea", "text", true)),
            (FieldType::Email, text("email", "email", false)),
            (FieldType::Url, text("url", "url", false)),
            (FieldType::Number, Box::new(NumberRenderer)),
            (FieldType::Boolean, Box::new(BooleanRenderer)),
            (FieldType::Date, Box::new(DateRenderer)),
            (FieldType::Select, Box::new(SelectRenderer { multiple: false })),
            (FieldType::Multiselect, Box::new(SelectRenderer { multiple: true })),
            (FieldType::Object, Box::new(ObjectRenderer)),
            (FieldType::Array, Box::new(ArrayRenderer)),
            (FieldType::HgncId, identifier("hgnc_id", "HGNC", None)),
            (FieldType::MondoId, identifier("mondo_id", "MONDO", Some(7))),
            (FieldType::OmimId, identifier("omim_id", "OMIM", None)),
            (FieldType::HpoTerm, identifier("hpo_term", "HP", Some(7))),
            (FieldType::Pmid, Box::new(PmidRenderer)),
            (FieldType::Score, Box::new(ScoreRenderer)),
        ];

        Self::new(specialized, built_in)
    }

    /// Specialized widget named by `component`, else the built-in for the
    /// type, else the text fallback. Misses are logged, never fatal.
    pub fn resolve(&self, def: &FieldDefinition) -> RendererHandle<'_> {
        if let Some(component) = &def.component {
            match self.specialized.get(component) {
                Some(renderer) => return RendererHandle::Specialized(renderer.as_ref()),
                None => tracing::warn!(
                    component = %component,
                    field_type = def.field_type.as_str(),
                    "unknown component, using the renderer for the field type"
                ),
            }
        }

        if let Some(renderer) = self.built_in.get(&def.field_type) {
            return RendererHandle::BuiltIn(renderer.as_ref());
        }

        tracing::warn!(
            field_type = def.field_type.as_str(),
            "no renderer for field type, using text fallback"
        );
        RendererHandle::Fallback(self.fallback.as_ref())
    }

    pub fn specialized_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.specialized.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
