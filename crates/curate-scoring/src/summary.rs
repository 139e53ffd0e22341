use curate_core::models::score::ScoreCalculations;
use curate_core::schema::ScoringConfiguration;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// How close (in score points) the total must be to the next threshold to
/// be flagged. Fixed regardless of the methodology's scale.
pub const NEAR_THRESHOLD_WINDOW: f64 = 1.0;

/// Calculation key that, when present and numeric, is the total itself.
const TOTAL_KEY: &str = "total_score";

/// Display color of a classification, by its rank among the thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ClassificationColor {
    Success,
    Info,
    Warning,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ScoreSummary {
    pub total_score: f64,
    pub classification: Option<String>,
    pub classification_color: ClassificationColor,
    pub near_threshold: bool,
    /// 0–100, rounded.
    pub progress_percentage: u32,
}

/// The total: `total_score` when numeric, else the sum of every numeric
/// calculation. No calculations means zero.
pub fn total_score(calculations: Option<&ScoreCalculations>) -> f64 {
    let Some(calculations) = calculations else {
        return 0.0;
    };
    if let Some(total) = calculations.get(TOTAL_KEY).and_then(serde_json::Value::as_f64) {
        return total;
    }
    calculations
        .values()
        .filter_map(serde_json::Value::as_f64)
        .sum()
}

/// Thresholds highest first. Ties keep declaration order.
fn ranked(config: &ScoringConfiguration) -> Vec<(&str, f64)> {
    let mut tiers: Vec<(&str, f64)> = config
        .classification_thresholds
        .iter()
        .map(|(label, min)| (label.as_str(), *min))
        .collect();
    tiers.sort_by(|a, b| b.1.total_cmp(&a.1));
    tiers
}

fn color_for(rank: usize, tiers: usize) -> ClassificationColor {
    if tiers > 1 && rank == tiers - 1 {
        ClassificationColor::Warning
    } else if rank <= 1 {
        ClassificationColor::Success
    } else {
        ClassificationColor::Info
    }
}

fn progress(total: f64, max_score: f64) -> u32 {
    if max_score <= 0.0 || !total.is_finite() {
        return 0;
    }
    let percentage = (total / max_score * 100.0).round();
    percentage.clamp(0.0, 100.0) as u32
}

/// Derive every score display value. Pure.
pub fn evaluate(
    calculations: Option<&ScoreCalculations>,
    config: Option<&ScoringConfiguration>,
) -> ScoreSummary {
    let total = total_score(calculations);
    let Some(config) = config else {
        return ScoreSummary {
            total_score: total,
            ..ScoreSummary::default()
        };
    };

    let tiers = ranked(config);
    let rank = tiers
        .iter()
        .position(|(_, min)| *min <= total)
        .or_else(|| tiers.len().checked_sub(1));

    // Gap to the tier directly above the current classification.
    let near_threshold = rank
        .and_then(|r| r.checked_sub(1))
        .map(|above| tiers[above].1 - total)
        .is_some_and(|gap| gap <= NEAR_THRESHOLD_WINDOW);

    ScoreSummary {
        total_score: total,
        classification: rank.map(|r| tiers[r].0.to_string()),
        classification_color: rank
            .map(|r| color_for(r, tiers.len()))
            .unwrap_or_default(),
        near_threshold,
        progress_percentage: progress(total, config.max_score),
    }
}
