//! Persistent evidence tree.
//!
//! Containers are reference-counted so that a path update can rebuild only
//! the spine from the root to the edited node and share every other subtree
//! with the previous version. Comparing two versions with
//! [`EvidenceValue::same_node`] tells whether a subtree was touched.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type EvidenceMap = IndexMap<String, EvidenceValue>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum EvidenceValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Arc<Vec<EvidenceValue>>),
    Object(Arc<EvidenceMap>),
}

impl EvidenceValue {
    /// An empty object, the usual root of a fresh form.
    pub fn object() -> Self {
        EvidenceValue::Object(Arc::new(EvidenceMap::new()))
    }

    pub fn array(items: Vec<EvidenceValue>) -> Self {
        EvidenceValue::Array(Arc::new(items))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, EvidenceValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            EvidenceValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            EvidenceValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            EvidenceValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[EvidenceValue]> {
        match self {
            EvidenceValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&EvidenceMap> {
        match self {
            EvidenceValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Interpret the value as a number the way a form input does: numbers
    /// as-is, strings when they parse after trimming.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            EvidenceValue::Number(n) => n.as_f64(),
            EvidenceValue::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Falsy in the form-input sense: null, `false`, `0`, NaN and `""`.
    pub fn is_falsy(&self) -> bool {
        match self {
            EvidenceValue::Null => true,
            EvidenceValue::Bool(b) => !b,
            EvidenceValue::Number(n) => n.as_f64().is_none_or(|f| f == 0.0 || f.is_nan()),
            EvidenceValue::String(s) => s.is_empty(),
            EvidenceValue::Array(_) | EvidenceValue::Object(_) => false,
        }
    }

    /// Falsy, or an empty list. An untouched repeatable field is blank.
    pub fn is_blank(&self) -> bool {
        match self {
            EvidenceValue::Array(items) => items.is_empty(),
            other => other.is_falsy(),
        }
    }

    /// Length for length constraints: characters of a string, elements of a list.
    pub fn length(&self) -> Option<usize> {
        match self {
            EvidenceValue::String(s) => Some(s.chars().count()),
            EvidenceValue::Array(items) => Some(items.len()),
            _ => None,
        }
    }

    /// The text a pattern is tested against.
    pub fn to_text(&self) -> String {
        match self {
            EvidenceValue::String(s) => s.clone(),
            EvidenceValue::Number(n) => n.to_string(),
            EvidenceValue::Bool(b) => b.to_string(),
            EvidenceValue::Null => String::new(),
            other => serde_json::Value::from(other).to_string(),
        }
    }

    /// Equality that treats `1` and `1.0` as the same number.
    pub fn loosely_equals(&self, other: &EvidenceValue) -> bool {
        match (self, other) {
            (EvidenceValue::Number(a), EvidenceValue::Number(b)) => a.as_f64() == b.as_f64(),
            (a, b) => a == b,
        }
    }

    /// True when both values are the very same container allocation, or
    /// equal scalars. Used to decide whether a subtree changed between two
    /// versions of the tree.
    pub fn same_node(&self, other: &EvidenceValue) -> bool {
        match (self, other) {
            (EvidenceValue::Array(a), EvidenceValue::Array(b)) => Arc::ptr_eq(a, b),
            (EvidenceValue::Object(a), EvidenceValue::Object(b)) => Arc::ptr_eq(a, b),
            (EvidenceValue::Array(_) | EvidenceValue::Object(_), _)
            | (_, EvidenceValue::Array(_) | EvidenceValue::Object(_)) => false,
            (a, b) => a == b,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(self)
    }
}

impl From<serde_json::Value> for EvidenceValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => EvidenceValue::Null,
            serde_json::Value::Bool(b) => EvidenceValue::Bool(b),
            serde_json::Value::Number(n) => EvidenceValue::Number(n),
            serde_json::Value::String(s) => EvidenceValue::String(s),
            serde_json::Value::Array(items) => EvidenceValue::Array(Arc::new(
                items.into_iter().map(EvidenceValue::from).collect(),
            )),
            serde_json::Value::Object(map) => EvidenceValue::Object(Arc::new(
                map.into_iter()
                    .map(|(k, v)| (k, EvidenceValue::from(v)))
                    .collect(),
            )),
        }
    }
}

impl From<&EvidenceValue> for serde_json::Value {
    fn from(value: &EvidenceValue) -> Self {
        match value {
            EvidenceValue::Null => serde_json::Value::Null,
            EvidenceValue::Bool(b) => serde_json::Value::Bool(*b),
            EvidenceValue::Number(n) => serde_json::Value::Number(n.clone()),
            EvidenceValue::String(s) => serde_json::Value::String(s.clone()),
            EvidenceValue::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            EvidenceValue::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<EvidenceValue> for serde_json::Value {
    fn from(value: EvidenceValue) -> Self {
        serde_json::Value::from(&value)
    }
}

impl From<&str> for EvidenceValue {
    fn from(value: &str) -> Self {
        EvidenceValue::String(value.to_string())
    }
}

impl From<String> for EvidenceValue {
    fn from(value: String) -> Self {
        EvidenceValue::String(value)
    }
}

impl From<bool> for EvidenceValue {
    fn from(value: bool) -> Self {
        EvidenceValue::Bool(value)
    }
}

impl From<i64> for EvidenceValue {
    fn from(value: i64) -> Self {
        EvidenceValue::Number(value.into())
    }
}

impl From<f64> for EvidenceValue {
    /// Non-finite floats have no JSON representation and become `Null`.
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(EvidenceValue::Number)
            .unwrap_or(EvidenceValue::Null)
    }
}

impl From<Vec<EvidenceValue>> for EvidenceValue {
    fn from(items: Vec<EvidenceValue>) -> Self {
        EvidenceValue::array(items)
    }
}
