use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Outcome of validating the evidence against the schema.
///
/// Keys of `field_errors` are dotted field paths. Produced by local rule
/// evaluation and by the authoritative check; never the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub field_errors: BTreeMap<String, String>,
}

impl ValidationResult {
    pub fn from_errors(field_errors: BTreeMap<String, String>) -> Self {
        Self {
            is_valid: field_errors.is_empty(),
            field_errors,
        }
    }

    pub fn valid() -> Self {
        Self::from_errors(BTreeMap::new())
    }

    pub fn error_for(&self, path: &str) -> Option<&str> {
        self.field_errors.get(path).map(String::as_str)
    }

    /// Fold backend errors in. A field that already fails locally keeps its
    /// local message.
    pub fn merged_with(&self, backend: &BTreeMap<String, String>) -> Self {
        let mut field_errors = self.field_errors.clone();
        for (path, message) in backend {
            field_errors
                .entry(path.clone())
                .or_insert_with(|| message.clone());
        }
        Self::from_errors(field_errors)
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}
