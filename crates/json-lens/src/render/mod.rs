//! Canonical text rendering of a selected node's value.
//!
//! The edit surface shows one value in isolation: strings as a JSON-quoted
//! single line (so `"5"` and `5` stay distinguishable), everything else
//! pretty-printed with a two-space indent. When the authoritative document
//! cannot supply the value — it failed to parse, or the path no longer
//! addresses anything — rendering falls back to the pre-flattened child
//! rows handed over by the tree/graph view.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use json_lens_path::Resolution;

/// Type tag of one flattened child row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Object,
    Array,
    Primitive,
}

impl RowKind {
    /// Container rows carry no inline value and are dropped by the
    /// fallback renderer.
    pub fn is_container(&self) -> bool {
        matches!(self, RowKind::Object | RowKind::Array)
    }
}

/// A pre-flattened description of one immediate child of a node, supplied
/// by the tree/graph view. Used only as a rendering fallback.
///
/// The wire form matches the view's row shape:
/// `{"key": "a", "value": 1, "type": "primitive"}`. The key is absent for
/// array elements and for a scalar root; container rows carry a null value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSummary {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Value,
    #[serde(rename = "type")]
    pub kind: RowKind,
}

/// Render a resolution outcome as edit-surface text. Total: resolution
/// failures and any internal serialization error fall through to the
/// row-based fallback.
///
/// # Example
///
/// ```
/// use json_lens::render;
/// use json_lens_path::Resolution;
/// use serde_json::json;
///
/// assert_eq!(render(&Resolution::Resolved(json!("5")), &[]), "\"5\"");
/// assert_eq!(
///     render(&Resolution::Resolved(json!({"a": 1})), &[]),
///     "{\n  \"a\": 1\n}",
/// );
/// assert_eq!(render(&Resolution::Unresolved, &[]), "{}");
/// ```
pub fn render(resolution: &Resolution, rows: &[RowSummary]) -> String {
    if let Resolution::Resolved(value) = resolution {
        if let Ok(text) = render_value(value) {
            return text;
        }
    }
    render_rows(rows)
}

fn render_value(value: &Value) -> Result<String, serde_json::Error> {
    match value {
        Value::String(_) => serde_json::to_string(value),
        other => serde_json::to_string_pretty(other),
    }
}

/// Lossy reconstruction from child rows: keyed primitive rows become an
/// object, container rows are omitted. A single keyless row is shown as
/// its raw value.
fn render_rows(rows: &[RowSummary]) -> String {
    if rows.is_empty() {
        return "{}".to_string();
    }
    if rows.len() == 1 && rows[0].key.is_none() {
        return raw_text(&rows[0].value);
    }
    let mut map = Map::new();
    for row in rows {
        if row.kind.is_container() {
            continue;
        }
        if let Some(key) = &row.key {
            map.insert(key.clone(), row.value.clone());
        }
    }
    match serde_json::to_string_pretty(&Value::Object(map)) {
        Ok(text) => text,
        Err(_) => "{}".to_string(),
    }
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
