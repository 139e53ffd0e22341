use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::evidence::EvidenceValue;
use crate::models::score::ScoreCalculations;

/// Request body for the backend's authoritative validation and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthoritativeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<String>,
    pub evidence_data: EvidenceValue,
}

/// Response from the backend's authoritative validation and scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthoritativeResponse {
    #[serde(default)]
    pub is_valid: bool,
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
    #[serde(default)]
    pub score_calculations: Option<ScoreCalculations>,
}
