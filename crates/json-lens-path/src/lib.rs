//! Node paths into JSON documents.
//!
//! A [`Path`] is an ordered sequence of [`PathSegment`]s addressing one node
//! inside a JSON value tree, as produced by a tree/graph view of the
//! document. This crate walks a path against a live document snapshot and
//! formats a path as the canonical `$["key"][0]` display label.
//!
//! # Example
//!
//! ```
//! use json_lens_path::{format_path, get, resolve, PathSegment, Resolution};
//! use serde_json::json;
//!
//! let path = vec![PathSegment::key("customer"), PathSegment::index(0)];
//!
//! // Walk a parsed value
//! let doc = json!({"customer": ["Alice", "Bob"]});
//! assert_eq!(get(&doc, &path), Some(&json!("Alice")));
//!
//! // Resolve against raw document text
//! let res = resolve(r#"{"customer": ["Alice", "Bob"]}"#, &path);
//! assert_eq!(res, Resolution::Resolved(json!("Alice")));
//!
//! // Display label
//! assert_eq!(format_path(&path), r#"$["customer"][0]"#);
//! ```

use serde_json::Value;

pub mod types;
pub use types::{Path, PathSegment, Resolution};

/// Walk a parsed JSON value along `path`.
///
/// A [`PathSegment::Key`] indexes into objects, a [`PathSegment::Index`]
/// into arrays. Returns `None` as soon as the current value does not
/// support the segment's access kind or the key/index is absent — no
/// partial value is produced.
///
/// # Example
///
/// ```
/// use json_lens_path::{get, PathSegment};
/// use serde_json::json;
///
/// let doc = json!({"a": {"b": [1, 2, 3]}});
/// let path = [PathSegment::key("a"), PathSegment::key("b"), PathSegment::index(1)];
/// assert_eq!(get(&doc, &path), Some(&json!(2)));
///
/// // Index into an object is a kind mismatch, not a lookup
/// assert_eq!(get(&doc, &[PathSegment::index(0)]), None);
/// ```
pub fn get<'a>(root: &'a Value, path: &[PathSegment]) -> Option<&'a Value> {
    let mut current = root;
    for segment in path {
        current = match (segment, current) {
            (PathSegment::Key(key), Value::Object(map)) => map.get(key)?,
            (PathSegment::Index(index), Value::Array(arr)) => arr.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Resolve `path` against raw document text.
///
/// The text is parsed as JSON on every call so the walk always sees the
/// latest snapshot. A document that fails to parse, or a path that does not
/// address a value, yields [`Resolution::Unresolved`]; this function never
/// fails. The empty path resolves to the parsed root.
///
/// # Example
///
/// ```
/// use json_lens_path::{resolve, PathSegment, Resolution};
/// use serde_json::json;
///
/// assert_eq!(
///     resolve(r#"{"age": 5}"#, &[PathSegment::key("age")]),
///     Resolution::Resolved(json!(5)),
/// );
/// assert_eq!(resolve("not json", &[]), Resolution::Unresolved);
/// ```
pub fn resolve(document: &str, path: &[PathSegment]) -> Resolution {
    match serde_json::from_str::<Value>(document) {
        Ok(root) => match get(&root, path) {
            Some(value) => Resolution::Resolved(value.clone()),
            None => Resolution::Unresolved,
        },
        Err(_) => Resolution::Unresolved,
    }
}

/// Format a path as its canonical display label.
///
/// The empty path renders as `$`; each segment renders as a bracketed
/// token, indices bare and keys double-quoted. Keys are not escaped — the
/// label is for display, not for re-parsing.
///
/// # Example
///
/// ```
/// use json_lens_path::{format_path, PathSegment};
///
/// assert_eq!(format_path(&[]), "$");
/// assert_eq!(
///     format_path(&[PathSegment::key("customer"), PathSegment::index(0)]),
///     r#"$["customer"][0]"#,
/// );
/// ```
pub fn format_path(path: &[PathSegment]) -> String {
    let mut out = String::from("$");
    for segment in path {
        match segment {
            PathSegment::Key(key) => {
                out.push_str("[\"");
                out.push_str(key);
                out.push_str("\"]");
            }
            PathSegment::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
        }
    }
    out
}
