use std::collections::BTreeMap;
use std::sync::Arc;

use curate_core::models::authoritative::{AuthoritativeRequest, AuthoritativeResponse};
use curate_core::models::score::ScoreState;
use curate_core::models::validation::ValidationResult;
use curate_core::path;
use curate_core::{EvidenceValue, FieldPath, Schema};
use curate_layout::{Layout, organize};
use curate_render::{FormView, RenderedForm, add_item, normalize_input, remove_item, render_form};
use curate_rules::{RuleSet, validate};
use curate_scoring::{ScoreMemo, ScoreSummary};
use uuid::Uuid;

use crate::draft::Draft;
use crate::error::{DraftError, ValidatorError};

/// What happened to an authoritative response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    /// The evidence changed after the request was made; the response was
    /// dropped.
    Stale,
}

/// Derived values remembered against the inputs they were derived from:
/// the evidence root (by identity) and the revision of the backend errors.
#[derive(Debug)]
struct Derived<T> {
    data: EvidenceValue,
    errors_revision: u64,
    value: T,
}

impl<T> Derived<T> {
    fn is_fresh(&self, data: &EvidenceValue, errors_revision: u64) -> bool {
        self.data.same_node(data) && self.errors_revision == errors_revision
    }
}

/// One open evidence form.
///
/// Single writer: every edit goes through `&mut self`. Validation, score,
/// layout and the render tree are derived on read and cached until their
/// inputs change.
#[derive(Debug)]
pub struct FormSession {
    id: Uuid,
    schema: Arc<Schema>,
    rules: Arc<RuleSet>,
    layout: Layout,
    data: EvidenceValue,
    generation: u64,
    server_errors: BTreeMap<String, String>,
    /// The backend's overall verdict on the current evidence. A failure
    /// with no field errors still blocks submission.
    server_valid: bool,
    errors_revision: u64,
    score: ScoreState,
    validation: Option<Derived<ValidationResult>>,
    rendered: Option<Derived<RenderedForm>>,
    score_memo: ScoreMemo,
}

impl FormSession {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::with_data(schema, Uuid::new_v4(), EvidenceValue::object())
    }

    /// Open a form on existing evidence, e.g. a record loaded for editing.
    pub fn with_evidence(schema: Arc<Schema>, data: EvidenceValue) -> Self {
        Self::with_data(schema, Uuid::new_v4(), data)
    }

    /// Resume from a saved draft. The draft must belong to this schema.
    pub fn from_draft(schema: Arc<Schema>, draft: Draft) -> Result<Self, DraftError> {
        if draft.schema_id != schema.id {
            return Err(DraftError::SchemaMismatch {
                expected: schema.id.clone(),
                found: draft.schema_id,
            });
        }
        tracing::info!(
            session_id = %draft.session_id,
            saved_at = %draft.saved_at,
            "resuming form from draft"
        );
        Ok(Self::with_data(schema, draft.session_id, draft.evidence_data))
    }

    fn with_data(schema: Arc<Schema>, id: Uuid, data: EvidenceValue) -> Self {
        let rules = Arc::new(RuleSet::for_schema(&schema));
        let layout = organize(&schema);
        tracing::info!(
            session_id = %id,
            schema = schema.id.as_deref().unwrap_or("<unnamed>"),
            "form session opened"
        );
        Self {
            id,
            schema,
            rules,
            layout,
            data,
            generation: 0,
            server_errors: BTreeMap::new(),
            server_valid: true,
            errors_revision: 0,
            score: ScoreState::default(),
            validation: None,
            rendered: None,
            score_memo: ScoreMemo::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn data(&self) -> &EvidenceValue {
        &self.data
    }

    pub fn get(&self, path: &FieldPath) -> Option<&EvidenceValue> {
        path::get(&self.data, path)
    }

    /// Incremented on every edit. Authoritative responses are matched
    /// against it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn score_state(&self) -> &ScoreState {
        &self.score
    }

    /// Store `value` at `path`.
    pub fn set(&mut self, path: &FieldPath, value: EvidenceValue) {
        let data = path::set(&self.data, path, value, Some(&self.schema));
        self.commit(data, path);
    }

    /// Store raw widget input at `path`, normalised by the field's renderer.
    pub fn input(&mut self, path: &FieldPath, raw: &EvidenceValue) {
        let def = self.schema.field_or_fallback(path);
        let value = normalize_input(&def, raw);
        self.set(path, value);
    }

    pub fn add_item(&mut self, path: &FieldPath) {
        let data = add_item(&self.schema, &self.data, path);
        self.commit(data, path);
    }

    pub fn remove_item(&mut self, path: &FieldPath, index: usize) {
        let data = remove_item(&self.data, path, index);
        self.commit(data, path);
    }

    fn commit(&mut self, data: EvidenceValue, edited: &FieldPath) {
        self.data = data;
        self.generation += 1;

        // Backend errors on the edited field, above it or below it are
        // assumed fixed until the next authoritative answer. The backend's
        // overall verdict was for the old evidence.
        let before = self.server_errors.len();
        self.server_errors.retain(|key, _| {
            let errored = FieldPath::parse(key);
            !(edited.starts_with(&errored) || errored.starts_with(edited))
        });
        if self.server_errors.len() != before || !self.server_valid {
            self.server_valid = true;
            self.errors_revision += 1;
        }

        tracing::trace!(path = %edited, generation = self.generation, "evidence edited");
    }

    /// Local rule results merged with the outstanding backend errors.
    pub fn validation(&mut self) -> &ValidationResult {
        let fresh = self
            .validation
            .as_ref()
            .is_some_and(|d| d.is_fresh(&self.data, self.errors_revision));
        if !fresh {
            self.validation = None;
        }
        let derived = self.validation.get_or_insert_with(|| {
            let local = validate(&self.schema, &self.rules, &self.data);
            let mut merged = local.merged_with(&self.server_errors);
            merged.is_valid &= self.server_valid;
            tracing::debug!(
                generation = self.generation,
                errors = merged.field_errors.len(),
                "validation recomputed"
            );
            Derived {
                data: self.data.clone(),
                errors_revision: self.errors_revision,
                value: merged,
            }
        });
        &derived.value
    }

    pub fn score(&mut self) -> &ScoreSummary {
        self.score_memo
            .get(&self.score, self.schema.scoring_configuration())
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The full render tree for the current evidence and validation.
    pub fn render(&mut self) -> &RenderedForm {
        let fresh = self
            .rendered
            .as_ref()
            .is_some_and(|d| d.is_fresh(&self.data, self.errors_revision));
        let validation = if fresh {
            None
        } else {
            self.rendered = None;
            Some(self.validation().clone())
        };
        let derived = self.rendered.get_or_insert_with(|| {
            let validation = validation.unwrap_or_default();
            let view = FormView {
                schema: &self.schema,
                data: &self.data,
                validation: &validation,
            };
            Derived {
                data: self.data.clone(),
                errors_revision: self.errors_revision,
                value: render_form(&view, &self.layout),
            }
        });
        &derived.value
    }

    /// The request for the current evidence, tagged with its generation.
    pub fn authoritative_request(&self) -> (u64, AuthoritativeRequest) {
        let request = AuthoritativeRequest {
            schema_id: self.schema.id.clone(),
            evidence_data: self.data.clone(),
        };
        (self.generation, request)
    }

    /// Accept the backend's answer for the evidence at `generation`. Answers
    /// for anything but the current generation are discarded.
    pub fn apply_authoritative(
        &mut self,
        generation: u64,
        response: AuthoritativeResponse,
    ) -> Applied {
        if generation != self.generation {
            tracing::debug!(
                response_generation = generation,
                current_generation = self.generation,
                "discarding stale authoritative response"
            );
            return Applied::Stale;
        }

        if response.errors != self.server_errors || response.is_valid != self.server_valid {
            self.server_errors = response.errors;
            self.server_valid = response.is_valid;
            self.errors_revision += 1;
        }
        if let Some(calculations) = response.score_calculations {
            self.score = ScoreState::new(calculations);
        }
        tracing::debug!(
            generation,
            is_valid = response.is_valid,
            "authoritative response applied"
        );
        Applied::Applied
    }

    /// The authoritative call failed. Local state stays as it is.
    pub fn authoritative_failed(&self, generation: u64, error: &ValidatorError) {
        tracing::warn!(
            generation,
            current_generation = self.generation,
            error = %error,
            "authoritative validation failed, keeping local state"
        );
    }

    pub fn server_errors(&self) -> &BTreeMap<String, String> {
        &self.server_errors
    }

    /// False while the backend's last verdict on the current evidence is a
    /// rejection.
    pub fn server_valid(&self) -> bool {
        self.server_valid
    }

    /// The current evidence as a draft.
    pub fn draft(&self) -> Draft {
        Draft {
            session_id: self.id,
            schema_id: self.schema.id.clone(),
            generation: self.generation,
            saved_at: jiff::Timestamp::now(),
            evidence_data: self.data.clone(),
        }
    }
}
