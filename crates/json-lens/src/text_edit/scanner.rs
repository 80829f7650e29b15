//! Position-tracking scanner over JSON document text.
//!
//! Locates the byte spans of values, object members, and array elements so
//! edits can be computed against the original text instead of re-serializing
//! the whole document. Callers validate the text as JSON before scanning,
//! so the scanner only has to walk well-formed input; anything structurally
//! inconsistent still surfaces as an error rather than a panic.

use json_lens_path::PathSegment;

use super::EditError;

/// Half-open byte range into the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContainerKind {
    Object,
    Array,
}

/// One member of a container: a keyed property for objects, an element for
/// arrays. `span` covers the key through the value; `value` the value alone.
#[derive(Debug, Clone)]
pub(crate) struct MemberSpan {
    pub key: Option<String>,
    pub span: Span,
    pub value: Span,
}

/// A scanned container: bracket offsets plus the spans of every member.
#[derive(Debug, Clone)]
pub(crate) struct ContainerSpans {
    pub kind: ContainerKind,
    pub open: usize,
    pub close: usize,
    pub members: Vec<MemberSpan>,
}

/// Where a path landed in the text.
#[derive(Debug, Clone)]
pub(crate) enum Target {
    /// Empty path: the span of the root value.
    Root(Span),
    /// The parent container of the addressed member. `position` is the
    /// member's index when it exists, `None` when the final segment names
    /// an absent key or the one-past-the-end array index.
    Member {
        container: ContainerSpans,
        position: Option<usize>,
    },
}

/// Walk `path` through the document text.
///
/// Intermediate segments must land on existing members; a kind mismatch
/// (key into array, index into object, any segment into a scalar) is
/// `INVALID_TARGET`, an absent intermediate member is `NOT_FOUND`. The
/// final segment may be absent — the caller decides whether that means an
/// insertion or a failure.
pub(crate) fn locate(text: &str, path: &[PathSegment]) -> Result<Target, EditError> {
    let mut scanner = Scanner::new(text);
    if path.is_empty() {
        return Ok(Target::Root(scanner.skip_value()?));
    }
    for (depth, segment) in path.iter().enumerate() {
        let container = scanner.scan_container()?;
        let position = match (segment, container.kind) {
            (PathSegment::Key(key), ContainerKind::Object) => container
                .members
                .iter()
                .position(|m| m.key.as_deref() == Some(key.as_str())),
            (PathSegment::Index(index), ContainerKind::Array) => {
                if *index < container.members.len() {
                    Some(*index)
                } else {
                    None
                }
            }
            _ => return Err(EditError::InvalidTarget),
        };
        if depth + 1 == path.len() {
            return Ok(Target::Member {
                container,
                position,
            });
        }
        match position {
            Some(index) => scanner.pos = container.members[index].value.start,
            None => return Err(EditError::NotFound),
        }
    }
    Err(EditError::NotFound)
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Scanner { src, pos: 0 }
    }

    fn byte(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.byte() {
            self.pos += 1;
        }
    }

    /// Span of the value starting at the cursor, leading whitespace skipped.
    /// Leaves the cursor just past the value.
    fn skip_value(&mut self) -> Result<Span, EditError> {
        self.skip_ws();
        let start = self.pos;
        match self.byte().ok_or(EditError::MalformedDocument)? {
            b'{' => self.skip_balanced(b'{', b'}')?,
            b'[' => self.skip_balanced(b'[', b']')?,
            b'"' => {
                self.skip_string()?;
            }
            _ => self.skip_scalar()?,
        }
        Ok(Span {
            start,
            end: self.pos,
        })
    }

    /// Skip a container without recording members. Brackets of the same
    /// kind nest properly in valid JSON, so a depth counter suffices once
    /// strings are stepped over.
    fn skip_balanced(&mut self, open: u8, close: u8) -> Result<(), EditError> {
        let mut depth = 0usize;
        while let Some(b) = self.byte() {
            if b == b'"' {
                self.skip_string()?;
                continue;
            }
            self.pos += 1;
            if b == open {
                depth += 1;
            } else if b == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
        }
        Err(EditError::MalformedDocument)
    }

    /// Span of a string token, quotes included.
    fn skip_string(&mut self) -> Result<Span, EditError> {
        let start = self.pos;
        if self.byte() != Some(b'"') {
            return Err(EditError::MalformedDocument);
        }
        self.pos += 1;
        while let Some(b) = self.byte() {
            self.pos += 1;
            match b {
                b'\\' => self.pos += 1,
                b'"' => {
                    return Ok(Span {
                        start,
                        end: self.pos,
                    })
                }
                _ => {}
            }
        }
        Err(EditError::MalformedDocument)
    }

    /// Numbers, `true`, `false`, `null`: anything up to a structural byte.
    fn skip_scalar(&mut self) -> Result<(), EditError> {
        let start = self.pos;
        while let Some(b) = self.byte() {
            match b {
                b',' | b'}' | b']' | b' ' | b'\t' | b'\n' | b'\r' => break,
                _ => self.pos += 1,
            }
        }
        if self.pos == start {
            Err(EditError::MalformedDocument)
        } else {
            Ok(())
        }
    }

    /// Scan the container at the cursor, recording every member's spans.
    fn scan_container(&mut self) -> Result<ContainerSpans, EditError> {
        self.skip_ws();
        let open = self.pos;
        let kind = match self.byte() {
            Some(b'{') => ContainerKind::Object,
            Some(b'[') => ContainerKind::Array,
            _ => return Err(EditError::InvalidTarget),
        };
        self.pos += 1;
        let mut members = Vec::new();
        loop {
            self.skip_ws();
            match self.byte().ok_or(EditError::MalformedDocument)? {
                b'}' | b']' => {
                    let close = self.pos;
                    self.pos += 1;
                    return Ok(ContainerSpans {
                        kind,
                        open,
                        close,
                        members,
                    });
                }
                b',' => self.pos += 1,
                _ => members.push(self.scan_member(kind)?),
            }
        }
    }

    fn scan_member(&mut self, kind: ContainerKind) -> Result<MemberSpan, EditError> {
        match kind {
            ContainerKind::Object => {
                let key_span = self.skip_string()?;
                let key = decode_string(&self.src[key_span.start..key_span.end])?;
                self.skip_ws();
                if self.byte() != Some(b':') {
                    return Err(EditError::MalformedDocument);
                }
                self.pos += 1;
                let value = self.skip_value()?;
                Ok(MemberSpan {
                    key: Some(key),
                    span: Span {
                        start: key_span.start,
                        end: value.end,
                    },
                    value,
                })
            }
            ContainerKind::Array => {
                let value = self.skip_value()?;
                Ok(MemberSpan {
                    key: None,
                    span: value,
                    value,
                })
            }
        }
    }
}

/// Decode a JSON string token (quotes included) into its text.
fn decode_string(token: &str) -> Result<String, EditError> {
    serde_json::from_str(token).map_err(|_| EditError::MalformedDocument)
}
