//! Span-based source editing on top of [`string_wizard::MagicString`].
//!
//! The rewriter never re-prints the syntax tree. Edits are recorded against
//! byte spans of the original text, checked for overlaps, and then applied to
//! a `MagicString`, which produces the output text and its source map.

use oxc_sourcemap::SourceMap;
use oxc_span::Span;
use string_wizard::{MagicString, SourceMapOptions, UpdateOptions};

use crate::error::{Result, TranspileError};

/// A generated position mapped back to the original source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub generated_line: u32,
    pub generated_column: u32,
    pub original_line: u32,
    pub original_column: u32,
    /// Original identifier name, set for rewritten references
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditKind {
    Replace,
    /// Replacement whose original text is kept as the mapping name
    Rename,
    Remove,
    Insert,
}

#[derive(Debug, Clone)]
struct Edit {
    start: u32,
    end: u32,
    text: String,
    kind: EditKind,
}

/// Records edits against one source text
#[derive(Debug)]
pub struct SourceEditor<'s> {
    source: &'s str,
    edits: Vec<Edit>,
}

impl<'s> SourceEditor<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            edits: Vec::new(),
        }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    /// Text of the original source inside `span`.
    pub fn slice(&self, span: Span) -> &'s str {
        self.source
            .get(span.start as usize..span.end as usize)
            .unwrap_or_default()
    }

    /// Replace `span` with `text`; the replacement maps to the start of `span`.
    pub fn replace(&mut self, span: Span, text: impl Into<String>) {
        self.push(span, text.into(), EditKind::Replace);
    }

    /// Replace a single identifier occurrence, keeping its original name in the map.
    pub fn replace_identifier(&mut self, span: Span, text: impl Into<String>) {
        self.push(span, text.into(), EditKind::Rename);
    }

    pub fn remove(&mut self, span: Span) {
        self.push(span, String::new(), EditKind::Remove);
    }

    /// Insert synthesized text at a byte offset.
    pub fn insert(&mut self, offset: u32, text: impl Into<String>) {
        self.push(Span::new(offset, offset), text.into(), EditKind::Insert);
    }

    fn push(&mut self, span: Span, text: String, kind: EditKind) {
        self.edits.push(Edit {
            start: span.start,
            end: span.end,
            text,
            kind,
        });
    }

    /// Apply all edits, surrounded by `header` and `footer`. The map lists
    /// `source_name` as its only source.
    pub fn render(mut self, header: &str, footer: &str, source_name: &str) -> Result<Rendered> {
        self.edits.sort_by_key(|edit| (edit.start, edit.end));

        let len = self.source.len() as u32;
        let mut cursor = 0u32;
        for edit in &self.edits {
            if edit.start < cursor || edit.end > len {
                return Err(TranspileError::ConflictingEdit { offset: edit.start });
            }
            cursor = cursor.max(edit.end);
        }

        let mut magic = MagicString::new(self.source);
        for edit in &self.edits {
            let (start, end) = (edit.start as usize, edit.end as usize);
            match edit.kind {
                // Inserts attach to the chunk ending at the offset, so they
                // land in front of an edit starting there.
                _ if start == end => {
                    if !edit.text.is_empty() {
                        magic.append_left(start, edit.text.clone());
                    }
                }
                EditKind::Remove => {
                    magic.remove(start, end);
                }
                _ if edit.text.is_empty() => {
                    magic.remove(start, end);
                }
                EditKind::Rename => {
                    magic.update_with(start, end, edit.text.clone(), UpdateOptions {
                        keep_original: true,
                        ..Default::default()
                    });
                }
                EditKind::Replace | EditKind::Insert => {
                    magic.update(start, end, edit.text.clone());
                }
            }
        }
        magic.prepend(header.to_string());
        magic.append(footer.to_string());

        let code = magic.to_string();
        let map = magic.source_map(SourceMapOptions {
            include_content: true,
            source: source_name.into(),
            ..Default::default()
        });
        // string_wizard may pin its own oxc_sourcemap release
        let map = SourceMap::from_json_string(&map.to_json_string())
            .map_err(|err| TranspileError::source_map(err.to_string()))?;
        let mappings = decode_mappings(&map);

        Ok(Rendered {
            code,
            map,
            mappings,
        })
    }
}

/// Output text of a [`SourceEditor`] with its source map
#[derive(Debug)]
pub struct Rendered {
    pub code: String,
    pub map: SourceMap,
    pub mappings: Vec<Mapping>,
}

/// Flatten the tokens of `map` into [`Mapping`]s. Tokens without a source
/// are skipped.
pub fn decode_mappings(map: &SourceMap) -> Vec<Mapping> {
    map.get_tokens()
        .filter(|token| token.get_source_id().is_some())
        .map(|token| Mapping {
            generated_line: token.get_dst_line(),
            generated_column: token.get_dst_col(),
            original_line: token.get_src_line(),
            original_column: token.get_src_col(),
            name: token
                .get_name_id()
                .and_then(|id| map.get_name(id))
                .map(|name| name.to_string()),
        })
        .collect()
}
