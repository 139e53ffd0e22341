use std::collections::BTreeMap;
use std::sync::Arc;

/// Partial scores keyed by calculation name, as returned by the backend.
/// Values are usually numbers; anything else is ignored when summing.
pub type ScoreCalculations = BTreeMap<String, serde_json::Value>;

/// The most recent score payload. Replaced wholesale, never edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreState {
    pub score_calculations: Option<Arc<ScoreCalculations>>,
}

impl ScoreState {
    pub fn new(calculations: ScoreCalculations) -> Self {
        Self {
            score_calculations: Some(Arc::new(calculations)),
        }
    }
}
