//! The work behind each subcommand. Everything here returns values;
//! printing happens in `main`.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use curate_core::models::authoritative::AuthoritativeResponse;
use curate_core::models::score::ScoreCalculations;
use curate_core::models::validation::ValidationResult;
use curate_core::{EvidenceValue, FieldPath, Schema};
use curate_layout::{Layout, organize, unplaced_fields, unresolved_section_fields};
use curate_render::RenderedForm;
use curate_scoring::{ScoreSummary, evaluate};
use curate_session::{Draft, DraftStore, FileDraftStore, FormSession};
use eyre::WrapErr;
use serde::Serialize;

pub fn read_schema(path: &Path) -> eyre::Result<Schema> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read schema at {}", path.display()))?;
    Schema::from_json(&json).wrap_err_with(|| format!("invalid schema at {}", path.display()))
}

pub fn read_evidence(path: &Path) -> eyre::Result<EvidenceValue> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read evidence at {}", path.display()))?;
    let evidence: EvidenceValue = serde_json::from_str(&json)
        .wrap_err_with(|| format!("invalid evidence JSON at {}", path.display()))?;
    if evidence.as_object().is_none() {
        eyre::bail!("evidence at {} is not a JSON object", path.display());
    }
    Ok(evidence)
}

pub fn read_scores(path: &Path) -> eyre::Result<ScoreCalculations> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read scores at {}", path.display()))?;
    serde_json::from_str(&json)
        .wrap_err_with(|| format!("invalid score calculations at {}", path.display()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReport {
    pub layout: Layout,
    pub unplaced_fields: Vec<FieldPath>,
    pub unresolved_fields: Vec<FieldPath>,
}

pub fn layout_report(schema: &Schema) -> LayoutReport {
    LayoutReport {
        layout: organize(schema),
        unplaced_fields: unplaced_fields(schema),
        unresolved_fields: unresolved_section_fields(schema),
    }
}

pub fn validate_evidence(schema: &Schema, evidence: &EvidenceValue) -> ValidationResult {
    let rules = curate_rules::RuleSet::for_schema(schema);
    curate_rules::validate(schema, &rules, evidence)
}

pub fn score_summary(schema: &Schema, scores: Option<&ScoreCalculations>) -> ScoreSummary {
    if schema.scoring_configuration().is_none() {
        tracing::warn!("schema has no scoring configuration, only the total is reported");
    }
    evaluate(scores, schema.scoring_configuration())
}

/// One `path=value` edit from the command line. The value is read as JSON
/// when it parses, otherwise as a plain string.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub path: FieldPath,
    pub raw: EvidenceValue,
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected PATH=VALUE, got `{s}`"))?;
        let path = FieldPath::parse(path);
        if path.is_root() {
            return Err(format!("empty field path in `{s}`"));
        }
        let raw = serde_json::from_str::<serde_json::Value>(value)
            .map(EvidenceValue::from)
            .unwrap_or_else(|_| EvidenceValue::from(value));
        Ok(Self { path, raw })
    }
}

/// A session over `evidence` with `scores` applied as if the backend had
/// answered them.
pub fn open_session(
    schema: Arc<Schema>,
    evidence: EvidenceValue,
    scores: Option<ScoreCalculations>,
) -> FormSession {
    let mut session = FormSession::with_evidence(schema, evidence);
    if let Some(scores) = scores {
        let (generation, _) = session.authoritative_request();
        session.apply_authoritative(
            generation,
            AuthoritativeResponse {
                is_valid: true,
                errors: Default::default(),
                score_calculations: Some(scores),
            },
        );
    }
    session
}

/// Apply edits as widget input, so each value is normalised by its field.
pub fn apply_edits(session: &mut FormSession, edits: &[Assignment]) {
    for edit in edits {
        session.input(&edit.path, &edit.raw);
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderReport<'a> {
    pub form: &'a RenderedForm,
    pub validation: ValidationResult,
    pub score: ScoreSummary,
}

pub fn render_report(session: &mut FormSession) -> RenderReport<'_> {
    let validation = session.validation().clone();
    let score = session.score().clone();
    RenderReport {
        form: session.render(),
        validation,
        score,
    }
}

pub async fn save_draft(session: &FormSession, dir: &Path) -> eyre::Result<PathBuf> {
    let store = FileDraftStore::new(dir);
    let draft = session.draft();
    let path = dir.join(format!("{}.json", draft.session_id));
    store
        .save(draft)
        .await
        .wrap_err_with(|| format!("failed to save draft in {}", dir.display()))?;
    Ok(path)
}

pub fn latest_draft(schema: &Schema, dir: &Path) -> eyre::Result<Option<Draft>> {
    FileDraftStore::new(dir)
        .latest_for_schema(schema.id.as_deref())
        .wrap_err_with(|| format!("failed to read drafts in {}", dir.display()))
}
