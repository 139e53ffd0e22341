//! The widgets shipped with the engine.

pub mod builtin;
pub mod specialized;

use curate_core::EvidenceValue;

/// Read a numeric input. Blank input clears the field; anything that is not
/// a number is kept as typed so validation can report it.
pub(crate) fn parse_number(raw: &EvidenceValue) -> EvidenceValue {
    let EvidenceValue::String(text) = raw else {
        return raw.clone();
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return EvidenceValue::Null;
    }
    if let Ok(integer) = trimmed.parse::<i64>() {
        return EvidenceValue::from(integer);
    }
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => EvidenceValue::from(number),
        _ => raw.clone(),
    }
}

/// Normalise a compact identifier (`hgnc:1100`, `MONDO_7254`, `1100`) to
/// `PREFIX:digits`, zero-padding the number to `width` when given. Input that
/// is not prefix-plus-digits is returned trimmed and otherwise untouched.
pub(crate) fn normalize_curie(raw: &str, prefix: &str, width: Option<usize>) -> String {
    let trimmed = raw.trim();
    let rest = strip_prefix_ignore_case(trimmed, prefix)
        .map(|r| r.trim_start_matches([':', '_', ' ']))
        .unwrap_or(trimmed);

    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return trimmed.to_string();
    }
    match width {
        Some(width) => format!("{prefix}:{rest:0>width$}"),
        None => format!("{prefix}:{rest}"),
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

/// Apply `f` to a string input, or to each string in a list input.
pub(crate) fn map_strings(raw: &EvidenceValue, f: impl Fn(&str) -> String) -> EvidenceValue {
    match raw {
        EvidenceValue::String(s) => EvidenceValue::String(f(s)),
        EvidenceValue::Array(items) => EvidenceValue::array(
            items
                .iter()
                .map(|item| match item {
                    EvidenceValue::String(s) => EvidenceValue::String(f(s)),
                    other => other.clone(),
                })
                .collect(),
        ),
        other => other.clone(),
    }
}
