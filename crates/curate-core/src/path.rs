//! Dotted field paths and the resolver that reads and writes them.
//!
//! A path such as `segregation.families.0.lod_score` addresses the schema
//! tree and the evidence tree alike. Numeric segments select array
//! elements. Reads never fail (a missing intermediate is simply absent) and
//! writes return a new root that shares every untouched subtree with the
//! old one.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::evidence::{EvidenceMap, EvidenceValue};
use crate::schema::{ContainerKind, Schema};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// The empty path, addressing the whole evidence object.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a `.`-joined path. Empty segments (`a..b`, leading dots) are dropped.
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split('.')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        self.child(index.to_string())
    }

    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// The first `len` segments.
    pub fn prefix(&self, len: usize) -> Self {
        Self(self.0[..len.min(self.0.len())].to_vec())
    }

    /// True when `self` equals `ancestor` or lies below it.
    pub fn starts_with(&self, ancestor: &FieldPath) -> bool {
        self.0.starts_with(&ancestor.0)
    }
}

/// Parse an array-index segment. Only plain ASCII digits qualify.
pub fn as_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FieldPath::parse(s))
    }
}

impl From<&str> for FieldPath {
    fn from(value: &str) -> Self {
        FieldPath::parse(value)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(FieldPath::parse(&raw))
    }
}

/// Read the value at `path`. `None` means undefined: some segment along the
/// way is missing, or indexes into a scalar.
pub fn get<'a>(data: &'a EvidenceValue, path: &FieldPath) -> Option<&'a EvidenceValue> {
    let mut current = data;
    for segment in path.segments() {
        current = match current {
            EvidenceValue::Object(map) => map.get(segment.as_str())?,
            EvidenceValue::Array(items) => items.get(as_index(segment)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Write `value` at `path`, returning the new root.
///
/// Missing intermediate containers are created; the schema decides whether
/// each one is an object or an array, and without a schema entry a numeric
/// next segment means array. Arrays are padded with `null` up to the
/// written index, at most [`MAX_ARRAY_PADDING`] slots past the current end;
/// a write further out is dropped with a warning and the old root is
/// returned. Only the containers on the path are rebuilt.
pub fn set(
    data: &EvidenceValue,
    path: &FieldPath,
    value: EvidenceValue,
    schema: Option<&Schema>,
) -> EvidenceValue {
    if let Some((at, index, len)) = oversized_index(data, path, schema) {
        tracing::warn!(
            path = %path,
            at = %at,
            index,
            len,
            "array index too far past the end, write ignored"
        );
        return data.clone();
    }
    set_at(Some(data), path, 0, value, schema)
}

/// Most `null` slots a single write may pad an array with.
pub const MAX_ARRAY_PADDING: usize = 1024;

/// The first numeric segment that would grow an array (existing or about to
/// be created) by more than [`MAX_ARRAY_PADDING`] slots.
fn oversized_index(
    data: &EvidenceValue,
    path: &FieldPath,
    schema: Option<&Schema>,
) -> Option<(FieldPath, usize, usize)> {
    let mut current = Some(data);
    for (depth, segment) in path.segments().iter().enumerate() {
        let node = current;
        current = node.and_then(|n| match n {
            EvidenceValue::Object(map) => map.get(segment.as_str()),
            EvidenceValue::Array(items) => as_index(segment).and_then(|i| items.get(i)),
            _ => None,
        });
        let Some(index) = as_index(segment) else {
            continue;
        };
        let len = match node {
            Some(EvidenceValue::Object(_)) => continue,
            Some(EvidenceValue::Array(items)) => items.len(),
            _ if container_for(schema, &path.prefix(depth), true) == ContainerKind::Object => {
                continue;
            }
            _ => 0,
        };
        if index.saturating_sub(len) > MAX_ARRAY_PADDING {
            return Some((path.prefix(depth), index, len));
        }
    }
    None
}

fn set_at(
    node: Option<&EvidenceValue>,
    path: &FieldPath,
    depth: usize,
    value: EvidenceValue,
    schema: Option<&Schema>,
) -> EvidenceValue {
    let segments = path.segments();
    if depth == segments.len() {
        return value;
    }
    let segment = &segments[depth];
    let index = as_index(segment);

    let kind = match node {
        Some(EvidenceValue::Object(_)) => ContainerKind::Object,
        Some(EvidenceValue::Array(_)) if index.is_some() => ContainerKind::Array,
        _ => container_for(schema, &path.prefix(depth), index.is_some()),
    };

    match (kind, index) {
        (ContainerKind::Array, Some(index)) => {
            let mut items = match node {
                Some(EvidenceValue::Array(items)) => Vec::clone(items),
                _ => Vec::new(),
            };
            if items.len() <= index {
                items.resize(index + 1, EvidenceValue::Null);
            }
            let child = set_at(items.get(index), path, depth + 1, value, schema);
            items[index] = child;
            EvidenceValue::Array(Arc::new(items))
        }
        _ => {
            let mut map = match node {
                Some(EvidenceValue::Object(map)) => EvidenceMap::clone(map),
                _ => EvidenceMap::new(),
            };
            let child = set_at(map.get(segment.as_str()), path, depth + 1, value, schema);
            map.insert(segment.clone(), child);
            EvidenceValue::Object(Arc::new(map))
        }
    }
}

fn container_for(schema: Option<&Schema>, at: &FieldPath, numeric_next: bool) -> ContainerKind {
    if at.is_root() {
        return ContainerKind::Object;
    }
    schema
        .and_then(|s| s.container_kind(at))
        .unwrap_or(if numeric_next {
            ContainerKind::Array
        } else {
            ContainerKind::Object
        })
}

/// Remove the node at `path` from its parent container, returning the new
/// root. Array elements after the removed one shift down. A path that does
/// not exist leaves the tree unchanged (the same root is returned).
pub fn remove(data: &EvidenceValue, path: &FieldPath) -> EvidenceValue {
    let (Some(parent_path), Some(last)) = (path.parent(), path.last()) else {
        return data.clone();
    };

    let replacement = match get(data, &parent_path) {
        Some(EvidenceValue::Array(items)) => match as_index(last) {
            Some(index) if index < items.len() => {
                let mut items = Vec::clone(items);
                items.remove(index);
                EvidenceValue::Array(Arc::new(items))
            }
            _ => return data.clone(),
        },
        Some(EvidenceValue::Object(map)) if map.contains_key(last) => {
            let mut map = EvidenceMap::clone(map);
            map.shift_remove(last);
            EvidenceValue::Object(Arc::new(map))
        }
        _ => return data.clone(),
    };

    set(data, &parent_path, replacement, None)
}
