//! json-lens — view and edit single nodes of a JSON document.
//!
//! Given a document's text and a path produced by a tree/graph view, this
//! crate renders the addressed value for an edit surface and commits an
//! edited value back into the document text, changing only the bytes of the
//! targeted region and leaving the formatting of everything else intact.
//!
//! - [`render`] turns a resolved value (or, when the document cannot supply
//!   one, pre-flattened child rows) into the canonical edit-surface text.
//! - [`text_edit`] computes and applies the minimal textual edits for a
//!   value replacement, insertion, or removal at a path.
//! - [`session`] owns the view → edit → commit lifecycle and propagates a
//!   successful commit to the document store and its source mirror.
//!
//! # Example
//!
//! ```
//! use json_lens::{commit_text, PathSegment};
//!
//! let doc = r#"{"name": "Alice", "age": 5}"#;
//! let out = commit_text(doc, &[PathSegment::key("name")], "\"Bob\"").unwrap();
//! assert_eq!(out, r#"{"name": "Bob", "age": 5}"#);
//! ```

pub mod render;
pub mod session;
pub mod text_edit;

pub use json_lens_path::{format_path, get, resolve, Path, PathSegment, Resolution};
pub use render::{render, RowKind, RowSummary};
pub use session::{
    commit_text, parse_edited_value, DocumentStore, EditSession, SessionState, SourceMirror,
};
pub use text_edit::{apply_edits, modify, Edit, EditError, FormatOptions};
