//! Edit sessions: the view → edit → commit lifecycle for one selected node.
//!
//! A session is transient. It is created when a node is selected and the
//! edit surface opens, rebuilt whenever the selection or the document
//! changes, and dropped when the surface closes; no draft survives across
//! sessions. Committing is the one operation with external side effects:
//! on success the new document text goes to the authoritative document
//! store and to its mirrored source view as a single combined update.

use serde_json::Value;

use json_lens_path::{format_path, resolve, Path, PathSegment};

use crate::render::{render, RowSummary};
use crate::text_edit::{apply_edits, modify, EditError, FormatOptions};

// ── Collaborators ─────────────────────────────────────────────────────────

/// The store owning the authoritative JSON document text.
pub trait DocumentStore {
    /// Latest document snapshot. Fetched fresh at session start and again
    /// at commit time, so a session never writes through a stale copy.
    fn get(&self) -> String;

    /// Replace the authoritative text after a successful commit.
    fn set_document(&mut self, text: String);
}

/// A secondary editable view kept consistent with the document store.
pub trait SourceMirror {
    fn set_contents(&mut self, text: String, has_changes: bool);
}

// ── Pure commit pipeline ──────────────────────────────────────────────────

/// Interpret edited text as a JSON value: parsed when possible, otherwise
/// the raw text verbatim as a string. An edit that is not valid JSON is
/// still accepted.
///
/// # Example
///
/// ```
/// use json_lens::parse_edited_value;
/// use serde_json::json;
///
/// assert_eq!(parse_edited_value("\"Bob\""), json!("Bob"));
/// assert_eq!(parse_edited_value("5"), json!(5));
/// assert_eq!(parse_edited_value("not json"), json!("not json"));
/// ```
pub fn parse_edited_value(edited: &str) -> Value {
    serde_json::from_str(edited).unwrap_or_else(|_| Value::String(edited.to_string()))
}

/// Produce the full replacement document text for an edit at `path`.
///
/// The edited text is interpreted per [`parse_edited_value`], the minimal
/// edit region is computed, and the edits are applied. Any stage's failure
/// aborts with nothing written.
pub fn commit_text(
    original: &str,
    path: &[PathSegment],
    edited: &str,
) -> Result<String, EditError> {
    let value = parse_edited_value(edited);
    let edits = modify(original, path, Some(&value), &FormatOptions::default())?;
    apply_edits(original, &edits)
}

// ── Session ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Viewing,
    Editing,
    Committed,
}

/// One node's view/edit/commit interaction.
#[derive(Debug)]
pub struct EditSession {
    path: Path,
    rows: Vec<RowSummary>,
    text: String,
    state: SessionState,
}

impl EditSession {
    /// Open a session on the node at `path`, rendering its current value
    /// from `document` (falling back to `rows` when it cannot be
    /// resolved).
    pub fn open(document: &str, path: Path, rows: Vec<RowSummary>) -> Self {
        let text = render(&resolve(document, &path), &rows);
        EditSession {
            path,
            rows,
            text,
            state: SessionState::Viewing,
        }
    }

    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Canonical `$["key"][0]` label for the surface's header.
    pub fn path_label(&self) -> String {
        format_path(&self.path)
    }

    /// Current display or edit text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        self.state == SessionState::Editing
    }

    /// Enter `Editing`. No effect once committed.
    pub fn begin_edit(&mut self) {
        if self.state == SessionState::Viewing {
            self.state = SessionState::Editing;
        }
    }

    /// Replace the edit buffer. Ignored outside `Editing`.
    pub fn set_text(&mut self, text: String) {
        if self.state == SessionState::Editing {
            self.text = text;
        }
    }

    /// Discard the edit buffer and re-render from the current document.
    pub fn cancel(&mut self, document: &str) {
        self.text = render(&resolve(document, &self.path), &self.rows);
        self.state = SessionState::Viewing;
    }

    /// Commit the edit buffer back into the document.
    ///
    /// Re-fetches the authoritative text from `store`, runs the commit
    /// pipeline, and on success hands the new text to both collaborators
    /// as one combined update. On failure neither store is touched, the
    /// session stays in `Editing` with the buffer preserved for retry, and
    /// the error is reported to the operational log.
    pub fn commit(
        &mut self,
        store: &mut impl DocumentStore,
        mirror: &mut impl SourceMirror,
    ) -> Result<(), EditError> {
        let original = store.get();
        match commit_text(&original, &self.path, &self.text) {
            Ok(new_text) => {
                store.set_document(new_text.clone());
                mirror.set_contents(new_text, true);
                self.state = SessionState::Committed;
                tracing::debug!(path = %format_path(&self.path), "node edit committed");
                Ok(())
            }
            Err(error) => {
                tracing::error!(
                    path = %format_path(&self.path),
                    error = %error,
                    "node edit commit failed",
                );
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RowKind;
    use serde_json::json;

    #[derive(Default)]
    struct MemoryStore {
        text: String,
        sets: usize,
    }

    impl MemoryStore {
        fn new(text: &str) -> Self {
            MemoryStore {
                text: text.to_string(),
                sets: 0,
            }
        }
    }

    impl DocumentStore for MemoryStore {
        fn get(&self) -> String {
            self.text.clone()
        }

        fn set_document(&mut self, text: String) {
            self.text = text;
            self.sets += 1;
        }
    }

    #[derive(Default)]
    struct MirrorStore {
        contents: Option<(String, bool)>,
    }

    impl SourceMirror for MirrorStore {
        fn set_contents(&mut self, text: String, has_changes: bool) {
            self.contents = Some((text, has_changes));
        }
    }

    #[test]
    fn parse_edited_value_fallback() {
        assert_eq!(parse_edited_value("{\"a\": 1}"), json!({"a": 1}));
        assert_eq!(parse_edited_value("not json"), json!("not json"));
    }

    #[test]
    fn commit_text_invalid_json_stores_literal_string() {
        let out = commit_text(r#"{"a": 1}"#, &[PathSegment::key("a")], "not json").unwrap();
        assert_eq!(out, r#"{"a": "not json"}"#);
    }

    #[test]
    fn commit_text_malformed_original_fails() {
        let result = commit_text("{oops", &[PathSegment::key("a")], "1");
        assert_eq!(result, Err(EditError::MalformedDocument));
    }

    #[test]
    fn open_renders_resolved_value() {
        let session = EditSession::open(r#"{"age": 5}"#, vec![PathSegment::key("age")], vec![]);
        assert_eq!(session.text(), "5");
        assert_eq!(session.state(), SessionState::Viewing);
        assert_eq!(session.path_label(), r#"$["age"]"#);
    }

    #[test]
    fn open_falls_back_to_rows_on_malformed_document() {
        let rows = vec![RowSummary {
            key: Some("a".to_string()),
            value: json!(1),
            kind: RowKind::Primitive,
        }];
        let session = EditSession::open("{oops", vec![PathSegment::key("a")], rows);
        assert_eq!(session.text(), "1");
    }

    #[test]
    fn set_text_ignored_while_viewing() {
        let mut session = EditSession::open(r#"{"a": 1}"#, vec![PathSegment::key("a")], vec![]);
        session.set_text("2".to_string());
        assert_eq!(session.text(), "1");
    }

    #[test]
    fn cancel_restores_rendered_text() {
        let doc = r#"{"a": 1}"#;
        let mut session = EditSession::open(doc, vec![PathSegment::key("a")], vec![]);
        session.begin_edit();
        session.set_text("999".to_string());
        assert_eq!(session.text(), "999");
        session.cancel(doc);
        assert_eq!(session.text(), "1");
        assert_eq!(session.state(), SessionState::Viewing);
    }

    #[test]
    fn commit_updates_both_stores() {
        let mut store = MemoryStore::new(r#"{"name": "Alice", "age": 5}"#);
        let mut mirror = MirrorStore::default();
        let mut session =
            EditSession::open(&store.get(), vec![PathSegment::key("name")], vec![]);
        session.begin_edit();
        session.set_text("\"Bob\"".to_string());
        session.commit(&mut store, &mut mirror).unwrap();

        assert_eq!(store.text, r#"{"name": "Bob", "age": 5}"#);
        assert_eq!(store.sets, 1);
        assert_eq!(
            mirror.contents,
            Some((r#"{"name": "Bob", "age": 5}"#.to_string(), true)),
        );
        assert_eq!(session.state(), SessionState::Committed);
    }

    #[test]
    fn failed_commit_leaves_stores_untouched() {
        let mut store = MemoryStore::new("{oops");
        let mut mirror = MirrorStore::default();
        let mut session = EditSession::open(&store.get(), vec![PathSegment::key("a")], vec![]);
        session.begin_edit();
        session.set_text("1".to_string());

        let result = session.commit(&mut store, &mut mirror);
        assert_eq!(result, Err(EditError::MalformedDocument));
        assert_eq!(store.text, "{oops");
        assert_eq!(store.sets, 0);
        assert_eq!(mirror.contents, None);
        // Still editing, buffer preserved for retry
        assert_eq!(session.state(), SessionState::Editing);
        assert_eq!(session.text(), "1");
    }

    #[test]
    fn commit_reads_fresh_snapshot() {
        let mut store = MemoryStore::new(r#"{"a": 1, "b": 2}"#);
        let mut mirror = MirrorStore::default();
        let mut session = EditSession::open(&store.get(), vec![PathSegment::key("a")], vec![]);
        session.begin_edit();
        session.set_text("9".to_string());

        // The document changes underneath the session before commit.
        store.text = r#"{"a": 1, "b": 3}"#.to_string();
        store.sets = 0;
        session.commit(&mut store, &mut mirror).unwrap();
        assert_eq!(store.text, r#"{"a": 9, "b": 3}"#);
    }
}
