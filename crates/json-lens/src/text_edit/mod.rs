//! Format-preserving edits to JSON document text.
//!
//! [`modify`] computes the minimal textual edit operations that replace,
//! insert, or remove one value at a node path; [`apply_edits`] splices them
//! into the original text. Every byte outside the affected region is kept
//! verbatim — the document is never re-serialized as a whole. Newly written
//! structure is indented per [`FormatOptions`] and aligned to the depth of
//! the insertion point.

mod scanner;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use json_lens_path::PathSegment;

use scanner::{locate, ContainerSpans, Target};

// ── Types ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("MALFORMED_DOCUMENT")]
    MalformedDocument,
    #[error("NOT_FOUND")]
    NotFound,
    #[error("INVALID_TARGET")]
    InvalidTarget,
    #[error("INVALID_INDEX")]
    InvalidIndex,
    #[error("ROOT_REMOVAL")]
    RootRemoval,
    #[error("INVALID_EDIT")]
    InvalidEdit,
    #[error("SERIALIZE")]
    Serialize,
}

/// A single textual edit: replace `length` bytes at `offset` with `content`.
/// A zero `length` is an insertion; empty `content` is a deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub offset: usize,
    pub length: usize,
    pub content: String,
}

/// Formatting for newly written structure.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Indentation unit, one level deep.
    pub indent: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
        }
    }
}

// ── Edit computation ──────────────────────────────────────────────────────

/// Compute the edits that set the value at `path` to `value`.
///
/// `Some(value)` replaces the addressed value, inserts an absent final
/// object key into its existing parent, or appends at an array's
/// one-past-the-end index. `None` removes the addressed member, comma
/// included; removing an absent member yields no edits.
///
/// # Errors
///
/// - `MALFORMED_DOCUMENT` — `text` is not valid JSON
/// - `NOT_FOUND` — an intermediate path segment is absent
/// - `INVALID_TARGET` — a segment contradicts the document's shape
/// - `INVALID_INDEX` — array index past the one-past-the-end position
/// - `ROOT_REMOVAL` — `None` with an empty path
///
/// # Example
///
/// ```
/// use json_lens::text_edit::{apply_edits, modify, FormatOptions};
/// use json_lens_path::PathSegment;
/// use serde_json::json;
///
/// let doc = r#"{"name": "Alice", "age": 5}"#;
/// let edits = modify(doc, &[PathSegment::key("name")], Some(&json!("Bob")), &FormatOptions::default()).unwrap();
/// assert_eq!(apply_edits(doc, &edits).unwrap(), r#"{"name": "Bob", "age": 5}"#);
/// ```
pub fn modify(
    text: &str,
    path: &[PathSegment],
    value: Option<&Value>,
    options: &FormatOptions,
) -> Result<Vec<Edit>, EditError> {
    if serde_json::from_str::<Value>(text).is_err() {
        return Err(EditError::MalformedDocument);
    }
    match locate(text, path)? {
        Target::Root(span) => {
            let value = value.ok_or(EditError::RootRemoval)?;
            let content = format_value(value, line_indent(text, span.start), options)?;
            Ok(vec![Edit {
                offset: span.start,
                length: span.len(),
                content,
            }])
        }
        Target::Member {
            container,
            position,
        } => {
            let segment = path.last().ok_or(EditError::NotFound)?;
            match (position, value) {
                (Some(index), Some(value)) => {
                    let target = container.members[index].value;
                    let content = format_value(value, line_indent(text, target.start), options)?;
                    Ok(vec![Edit {
                        offset: target.start,
                        length: target.len(),
                        content,
                    }])
                }
                (Some(index), None) => Ok(vec![removal_edit(&container, index)]),
                (None, Some(value)) => {
                    Ok(vec![insertion_edit(text, segment, &container, value, options)?])
                }
                (None, None) => Ok(Vec::new()),
            }
        }
    }
}

/// Apply edits right-to-left so earlier offsets stay valid.
///
/// # Errors
///
/// `INVALID_EDIT` if any edit overlaps another, runs past the end of the
/// text, or does not fall on a character boundary. Nothing is produced in
/// that case.
pub fn apply_edits(text: &str, edits: &[Edit]) -> Result<String, EditError> {
    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by(|a, b| b.offset.cmp(&a.offset));
    let mut out = text.to_string();
    let mut floor = text.len();
    for edit in ordered {
        let end = edit.offset.checked_add(edit.length).ok_or(EditError::InvalidEdit)?;
        if end > floor || !text.is_char_boundary(edit.offset) || !text.is_char_boundary(end) {
            return Err(EditError::InvalidEdit);
        }
        out.replace_range(edit.offset..end, &edit.content);
        floor = edit.offset;
    }
    Ok(out)
}

// ── Content construction ──────────────────────────────────────────────────

/// Serialize `value` for writing at a point whose line starts with
/// `base_indent`: scalars single-line, containers pretty-printed and then
/// re-indented so continuation lines sit at the target's depth.
fn format_value(
    value: &Value,
    base_indent: &str,
    options: &FormatOptions,
) -> Result<String, EditError> {
    let rendered = match value {
        Value::Object(_) | Value::Array(_) => pretty(value, options)?,
        scalar => serde_json::to_string(scalar).map_err(|_| EditError::Serialize)?,
    };
    if base_indent.is_empty() || !rendered.contains('\n') {
        return Ok(rendered);
    }
    let mut out = String::with_capacity(rendered.len());
    for (i, line) in rendered.lines().enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str(base_indent);
        }
        out.push_str(line);
    }
    Ok(out)
}

fn pretty(value: &Value, options: &FormatOptions) -> Result<String, EditError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(options.indent.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|_| EditError::Serialize)?;
    String::from_utf8(buf).map_err(|_| EditError::Serialize)
}

/// New member text: `"key": value` for objects, the bare value for arrays.
fn member_text(
    segment: &PathSegment,
    value: &Value,
    base_indent: &str,
    options: &FormatOptions,
) -> Result<String, EditError> {
    let value_text = format_value(value, base_indent, options)?;
    match segment {
        PathSegment::Key(key) => {
            let key_text = serde_json::to_string(key).map_err(|_| EditError::Serialize)?;
            Ok(format!("{}: {}", key_text, value_text))
        }
        PathSegment::Index(_) => Ok(value_text),
    }
}

fn insertion_edit(
    text: &str,
    segment: &PathSegment,
    container: &ContainerSpans,
    value: &Value,
    options: &FormatOptions,
) -> Result<Edit, EditError> {
    if let PathSegment::Index(index) = segment {
        if *index != container.members.len() {
            return Err(EditError::InvalidIndex);
        }
    }
    match container.members.last() {
        None => {
            let interior = &text[container.open + 1..container.close];
            let content = if interior.contains('\n') {
                let container_indent = line_indent(text, container.open);
                let member_indent = format!("{}{}", container_indent, options.indent);
                let member = member_text(segment, value, &member_indent, options)?;
                format!("\n{}{}\n{}", member_indent, member, container_indent)
            } else {
                member_text(segment, value, line_indent(text, container.open), options)?
            };
            Ok(Edit {
                offset: container.open + 1,
                length: container.close - container.open - 1,
                content,
            })
        }
        Some(last) => {
            let multiline = text[container.open..container.close].contains('\n');
            let content = if multiline {
                let member_indent = line_indent(text, last.span.start);
                let member = member_text(segment, value, member_indent, options)?;
                format!(",\n{}{}", member_indent, member)
            } else {
                let member = member_text(segment, value, line_indent(text, last.span.start), options)?;
                format!(", {}", member)
            };
            Ok(Edit {
                offset: last.span.end,
                length: 0,
                content,
            })
        }
    }
}

/// Removal covers the member plus exactly one adjacent comma: the trailing
/// one unless the member is last, in which case the leading one. The only
/// member of a container takes the whole interior with it.
fn removal_edit(container: &ContainerSpans, index: usize) -> Edit {
    let members = &container.members;
    let target = &members[index];
    if members.len() == 1 {
        Edit {
            offset: container.open + 1,
            length: container.close - container.open - 1,
            content: String::new(),
        }
    } else if let Some(next) = members.get(index + 1) {
        Edit {
            offset: target.span.start,
            length: next.span.start - target.span.start,
            content: String::new(),
        }
    } else {
        let prev = &members[index - 1];
        Edit {
            offset: prev.span.end,
            length: target.span.end - prev.span.end,
            content: String::new(),
        }
    }
}

/// Leading whitespace of the line containing `offset`.
fn line_indent(text: &str, offset: usize) -> &str {
    let line_start = text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let rest = &text[line_start..];
    let end = rest
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(rest.len());
    &rest[..end]
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apply(text: &str, path: &[PathSegment], value: Option<&Value>) -> String {
        let edits = modify(text, path, value, &FormatOptions::default()).unwrap();
        apply_edits(text, &edits).unwrap()
    }

    #[test]
    fn replace_scalar_preserves_other_bytes() {
        let doc = r#"{"name": "Alice", "age": 5}"#;
        let out = apply(doc, &[PathSegment::key("name")], Some(&json!("Bob")));
        assert_eq!(out, r#"{"name": "Bob", "age": 5}"#);
    }

    #[test]
    fn replace_number() {
        let doc = r#"{"name": "Alice", "age": 5}"#;
        let out = apply(doc, &[PathSegment::key("age")], Some(&json!(6)));
        assert_eq!(out, r#"{"name": "Alice", "age": 6}"#);
    }

    #[test]
    fn replace_in_multiline_document() {
        let doc = "{\n  \"a\": 1,\n  \"b\": 2\n}";
        let out = apply(doc, &[PathSegment::key("a")], Some(&json!(9)));
        assert_eq!(out, "{\n  \"a\": 9,\n  \"b\": 2\n}");
    }

    #[test]
    fn replace_array_element() {
        let doc = r#"{"xs": [1, 2, 3]}"#;
        let out = apply(doc, &[PathSegment::key("xs"), PathSegment::index(1)], Some(&json!(99)));
        assert_eq!(out, r#"{"xs": [1, 99, 3]}"#);
    }

    #[test]
    fn replace_root() {
        let out = apply("[1, 2]", &[], Some(&json!(null)));
        assert_eq!(out, "null");
    }

    #[test]
    fn replace_scalar_with_object_reindents() {
        let doc = "{\n  \"a\": 1\n}";
        let out = apply(doc, &[PathSegment::key("a")], Some(&json!({"b": [1, 2]})));
        assert_eq!(
            out,
            "{\n  \"a\": {\n    \"b\": [\n      1,\n      2\n    ]\n  }\n}",
        );
    }

    #[test]
    fn insert_new_key_single_line() {
        let doc = r#"{"a": 1}"#;
        let out = apply(doc, &[PathSegment::key("b")], Some(&json!(2)));
        assert_eq!(out, r#"{"a": 1, "b": 2}"#);
    }

    #[test]
    fn insert_new_key_multi_line() {
        let doc = "{\n  \"a\": 1\n}";
        let out = apply(doc, &[PathSegment::key("b")], Some(&json!(2)));
        assert_eq!(out, "{\n  \"a\": 1,\n  \"b\": 2\n}");
    }

    #[test]
    fn insert_into_empty_object() {
        let doc = r#"{"a": {}}"#;
        let out = apply(doc, &[PathSegment::key("a"), PathSegment::key("x")], Some(&json!(1)));
        assert_eq!(out, r#"{"a": {"x": 1}}"#);
    }

    #[test]
    fn insert_into_empty_multiline_object() {
        let doc = "{\n  \"a\": {\n  }\n}";
        let out = apply(doc, &[PathSegment::key("a"), PathSegment::key("x")], Some(&json!(1)));
        assert_eq!(out, "{\n  \"a\": {\n    \"x\": 1\n  }\n}");
    }

    #[test]
    fn append_to_array() {
        let doc = r#"{"xs": [1, 2]}"#;
        let out = apply(doc, &[PathSegment::key("xs"), PathSegment::index(2)], Some(&json!(3)));
        assert_eq!(out, r#"{"xs": [1, 2, 3]}"#);
    }

    #[test]
    fn append_to_empty_array() {
        let doc = r#"{"xs": []}"#;
        let out = apply(doc, &[PathSegment::key("xs"), PathSegment::index(0)], Some(&json!(1)));
        assert_eq!(out, r#"{"xs": [1]}"#);
    }

    #[test]
    fn append_past_end_fails() {
        let doc = r#"{"xs": [1]}"#;
        let result = modify(
            doc,
            &[PathSegment::key("xs"), PathSegment::index(5)],
            Some(&json!(9)),
            &FormatOptions::default(),
        );
        assert_eq!(result, Err(EditError::InvalidIndex));
    }

    #[test]
    fn remove_first_member() {
        let doc = r#"{"a": 1, "b": 2}"#;
        let out = apply(doc, &[PathSegment::key("a")], None);
        assert_eq!(out, r#"{"b": 2}"#);
    }

    #[test]
    fn remove_last_member() {
        let doc = r#"{"a": 1, "b": 2}"#;
        let out = apply(doc, &[PathSegment::key("b")], None);
        assert_eq!(out, r#"{"a": 1}"#);
    }

    #[test]
    fn remove_middle_member_multiline() {
        let doc = "{\n  \"a\": 1,\n  \"b\": 2,\n  \"c\": 3\n}";
        let out = apply(doc, &[PathSegment::key("b")], None);
        assert_eq!(out, "{\n  \"a\": 1,\n  \"c\": 3\n}");
    }

    #[test]
    fn remove_only_member() {
        let doc = r#"{"a": 1}"#;
        let out = apply(doc, &[PathSegment::key("a")], None);
        assert_eq!(out, "{}");
    }

    #[test]
    fn remove_array_element() {
        let doc = r#"[1, 2, 3]"#;
        assert_eq!(apply(doc, &[PathSegment::index(0)], None), "[2, 3]");
        assert_eq!(apply(doc, &[PathSegment::index(2)], None), "[1, 2]");
    }

    #[test]
    fn remove_absent_key_is_noop() {
        let doc = r#"{"a": 1}"#;
        let edits = modify(doc, &[PathSegment::key("b")], None, &FormatOptions::default()).unwrap();
        assert!(edits.is_empty());
    }

    #[test]
    fn remove_root_fails() {
        let result = modify("{}", &[], None, &FormatOptions::default());
        assert_eq!(result, Err(EditError::RootRemoval));
    }

    #[test]
    fn malformed_document_fails() {
        let result = modify(
            "{not json",
            &[PathSegment::key("a")],
            Some(&json!(1)),
            &FormatOptions::default(),
        );
        assert_eq!(result, Err(EditError::MalformedDocument));
    }

    #[test]
    fn missing_intermediate_fails() {
        let doc = r#"{"a": {"b": 1}}"#;
        let result = modify(
            doc,
            &[PathSegment::key("z"), PathSegment::key("b")],
            Some(&json!(2)),
            &FormatOptions::default(),
        );
        assert_eq!(result, Err(EditError::NotFound));
    }

    #[test]
    fn path_through_scalar_fails() {
        let doc = r#"{"a": 5}"#;
        let result = modify(
            doc,
            &[PathSegment::key("a"), PathSegment::key("b")],
            Some(&json!(2)),
            &FormatOptions::default(),
        );
        assert_eq!(result, Err(EditError::InvalidTarget));
    }

    #[test]
    fn custom_indent_for_inserted_structure() {
        let doc = r#"{"a": 1}"#;
        let options = FormatOptions {
            indent: "    ".to_string(),
        };
        let edits = modify(doc, &[PathSegment::key("a")], Some(&json!([1])), &options).unwrap();
        let out = apply_edits(doc, &edits).unwrap();
        assert_eq!(out, "{\"a\": [\n    1\n]}");
    }

    #[test]
    fn apply_edits_rejects_overlap() {
        let edits = [
            Edit {
                offset: 0,
                length: 4,
                content: "x".to_string(),
            },
            Edit {
                offset: 2,
                length: 4,
                content: "y".to_string(),
            },
        ];
        assert_eq!(apply_edits("0123456789", &edits), Err(EditError::InvalidEdit));
    }

    #[test]
    fn apply_edits_rejects_out_of_bounds() {
        let edits = [Edit {
            offset: 8,
            length: 4,
            content: String::new(),
        }];
        assert_eq!(apply_edits("0123", &edits), Err(EditError::InvalidEdit));
    }

    #[test]
    fn apply_edits_in_any_order() {
        let edits = [
            Edit {
                offset: 0,
                length: 1,
                content: "A".to_string(),
            },
            Edit {
                offset: 3,
                length: 1,
                content: "B".to_string(),
            },
        ];
        assert_eq!(apply_edits("abcd", &edits).unwrap(), "AbcB");
    }
}
