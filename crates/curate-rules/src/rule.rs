use curate_core::{EvidenceValue, FieldDefinition};
use regex::Regex;

pub const REQUIRED: &str = "Required";
pub const INVALID_FORMAT: &str = "Invalid format";
pub const INVALID_PATTERN: &str = "Invalid pattern configuration";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Pass,
    Fail(String),
}

impl RuleOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, RuleOutcome::Pass)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            RuleOutcome::Pass => None,
            RuleOutcome::Fail(message) => Some(message),
        }
    }
}

#[derive(Debug, Clone)]
pub enum RuleKind {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Minimum(f64),
    Maximum(f64),
    /// `None` when the configured pattern did not compile.
    Pattern(Option<Regex>),
    OneOf(Vec<EvidenceValue>),
}

/// One compiled constraint. Pure: the same value always gives the same outcome.
#[derive(Debug, Clone)]
pub struct Rule {
    kind: RuleKind,
    error_message: Option<String>,
}

impl Rule {
    pub fn new(kind: RuleKind, error_message: Option<String>) -> Self {
        Self {
            kind,
            error_message,
        }
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    /// Check a value. `None` is an undefined value (nothing at the path).
    pub fn check(&self, value: Option<&EvidenceValue>) -> RuleOutcome {
        match self.failure(value) {
            None => RuleOutcome::Pass,
            Some(default) => RuleOutcome::Fail(self.error_message.clone().unwrap_or(default)),
        }
    }

    fn failure(&self, value: Option<&EvidenceValue>) -> Option<String> {
        let present = value.unwrap_or(&EvidenceValue::Null);
        match &self.kind {
            RuleKind::Required => {
                let missing = match present {
                    EvidenceValue::Null => true,
                    EvidenceValue::String(s) => s.is_empty(),
                    EvidenceValue::Array(items) => items.is_empty(),
                    _ => false,
                };
                missing.then(|| REQUIRED.to_string())
            }
            RuleKind::MinLength(min) => {
                if present.is_blank() {
                    return None;
                }
                let len = present.length()?;
                (len < *min).then(|| format!("Minimum {min} characters"))
            }
            RuleKind::MaxLength(max) => {
                if present.is_blank() {
                    return None;
                }
                let len = present.length()?;
                (len > *max).then(|| format!("Maximum {max} characters"))
            }
            RuleKind::Minimum(min) => {
                let number = numeric(present)?;
                (number < *min).then(|| format!("Minimum value is {min}"))
            }
            RuleKind::Maximum(max) => {
                let number = numeric(present)?;
                (number > *max).then(|| format!("Maximum value is {max}"))
            }
            RuleKind::Pattern(None) => Some(INVALID_PATTERN.to_string()),
            RuleKind::Pattern(Some(regex)) => {
                if present.is_falsy() {
                    return None;
                }
                (!regex.is_match(&present.to_text())).then(|| INVALID_FORMAT.to_string())
            }
            RuleKind::OneOf(allowed) => {
                if present.is_falsy() {
                    return None;
                }
                let is_member = |v: &EvidenceValue| allowed.iter().any(|a| a.loosely_equals(v));
                let ok = match present.as_array() {
                    Some(items) => items.iter().all(is_member),
                    None => is_member(present),
                };
                (!ok).then(|| format!("Must be one of: {}", list(allowed)))
            }
        }
    }
}

/// The numeric reading of a value for bound checks; `None` skips the check.
fn numeric(value: &EvidenceValue) -> Option<f64> {
    match value {
        EvidenceValue::Null => None,
        EvidenceValue::String(s) if s.is_empty() => None,
        other => other.to_number(),
    }
}

fn list(values: &[EvidenceValue]) -> String {
    values
        .iter()
        .map(EvidenceValue::to_text)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Compile a field's constraints into rules, in the fixed order required,
/// length, bounds, pattern, membership. Absent constraints produce no rule.
pub fn compile(def: &FieldDefinition) -> Vec<Rule> {
    let message = || def.error_message.clone();
    let mut rules = Vec::new();

    if def.required {
        rules.push(Rule::new(RuleKind::Required, message()));
    }
    if let Some(min) = def.min_length {
        rules.push(Rule::new(RuleKind::MinLength(min), message()));
    }
    if let Some(max) = def.max_length {
        rules.push(Rule::new(RuleKind::MaxLength(max), message()));
    }
    if let Some(min) = def.minimum {
        rules.push(Rule::new(RuleKind::Minimum(min), message()));
    }
    if let Some(max) = def.maximum {
        rules.push(Rule::new(RuleKind::Maximum(max), message()));
    }
    if let Some(pattern) = &def.pattern {
        let regex = match Regex::new(pattern) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!(pattern = %pattern, error = %e, "field pattern does not compile");
                None
            }
        };
        rules.push(Rule::new(RuleKind::Pattern(regex), message()));
    }
    if let Some(serde_json::Value::Array(values)) = &def.allowed_values {
        let allowed = values.iter().cloned().map(EvidenceValue::from).collect();
        rules.push(Rule::new(RuleKind::OneOf(allowed), message()));
    }

    rules
}

/// The message of the first failing rule, if any.
pub fn first_failure(rules: &[Rule], value: Option<&EvidenceValue>) -> Option<String> {
    rules.iter().find_map(|rule| match rule.check(value) {
        RuleOutcome::Pass => None,
        RuleOutcome::Fail(message) => Some(message),
    })
}
