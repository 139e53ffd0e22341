use std::sync::Arc;

use curate_core::models::score::{ScoreCalculations, ScoreState};
use curate_core::schema::ScoringConfiguration;

use crate::summary::{ScoreSummary, evaluate};

/// Derive-on-read cache for [`evaluate`]. The calculations are compared by
/// allocation identity, the configuration by value; either changing
/// triggers a recompute.
#[derive(Debug, Default)]
pub struct ScoreMemo {
    inputs: Option<(Option<Arc<ScoreCalculations>>, Option<ScoringConfiguration>)>,
    summary: ScoreSummary,
    computations: u64,
}

impl ScoreMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        state: &ScoreState,
        config: Option<&ScoringConfiguration>,
    ) -> &ScoreSummary {
        let fresh = match &self.inputs {
            Some((calculations, cached_config)) => {
                same_calculations(calculations, &state.score_calculations)
                    && cached_config.as_ref() == config
            }
            None => false,
        };

        if !fresh {
            self.summary = evaluate(state.score_calculations.as_deref(), config);
            self.inputs = Some((state.score_calculations.clone(), config.cloned()));
            self.computations += 1;
            tracing::debug!(
                total = self.summary.total_score,
                classification = self.summary.classification.as_deref().unwrap_or("-"),
                "score summary recomputed"
            );
        }
        &self.summary
    }

    /// How many times the summary has been derived.
    pub fn computations(&self) -> u64 {
        self.computations
    }
}

fn same_calculations(
    a: &Option<Arc<ScoreCalculations>>,
    b: &Option<Arc<ScoreCalculations>>,
) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
