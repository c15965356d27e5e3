//! Fragment folding for the virtual program.
//!
//! Code is assembled from an ordered list of segments, each either generated
//! text or a verbatim copy of a block range. The builder tracks the running
//! length of the output and records one mapping per copied range.

use crate::ir::TextRange;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "camelCase")]
pub enum BlockKind {
    Script,
    ScriptSetup,
    Template,
    Style(u32),
}

/// A virtual range that is a verbatim copy of `original_range` in `block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    pub virtual_range: TextRange,
    pub block: BlockKind,
    pub original_range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    /// Block and block-relative start offset the text was copied from.
    pub source: Option<(BlockKind, u32)>,
}

impl Segment {
    pub fn generated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: None,
        }
    }

    pub fn mapped(text: impl Into<String>, block: BlockKind, start: u32) -> Self {
        Self {
            text: text.into(),
            source: Some((block, start)),
        }
    }
}

#[derive(Debug, Default)]
pub struct CodeBuilder {
    text: String,
    mappings: Vec<Mapping>,
}

impl CodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> u32 {
        self.text.len() as u32
    }

    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn push_mapped(&mut self, text: &str, block: BlockKind, start: u32) {
        if text.is_empty() {
            return;
        }
        let len = text.len() as u32;
        let virtual_start = self.len();
        self.text.push_str(text);

        if let Some(last) = self.mappings.last_mut() {
            if last.block == block
                && last.virtual_range.end == virtual_start
                && last.original_range.end == start
            {
                last.virtual_range.end += len;
                last.original_range.end += len;
                return;
            }
        }
        self.mappings.push(Mapping {
            virtual_range: TextRange::new(virtual_start, virtual_start + len),
            block,
            original_range: TextRange::new(start, start + len),
        });
    }

    pub fn push(&mut self, segment: Segment) {
        match segment.source {
            Some((block, start)) => self.push_mapped(&segment.text, block, start),
            None => self.push_str(&segment.text),
        }
    }

    pub fn extend(&mut self, segments: impl IntoIterator<Item = Segment>) {
        for segment in segments {
            self.push(segment);
        }
    }

    /// Append another builder's output, shifting its mappings.
    pub fn append(&mut self, other: CodeBuilder) {
        let shift = self.len();
        self.text.push_str(&other.text);
        self.mappings.extend(other.mappings.into_iter().map(|m| Mapping {
            virtual_range: m.virtual_range.shift(shift),
            ..m
        }));
    }

    pub fn finish(self) -> (String, Vec<Mapping>) {
        (self.text, self.mappings)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EDITS
// ═══════════════════════════════════════════════════════════════════════════════

/// Replace `range` (block-relative) with generated `text`. An empty range inserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: TextRange,
    pub text: String,
}

impl Edit {
    pub fn insert(at: u32, text: impl Into<String>) -> Self {
        Self {
            range: TextRange::new(at, at),
            text: text.into(),
        }
    }

    pub fn replace(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }
}

/// Split `content` (which starts at block offset `base`) into mapped copies and
/// generated edit text. Edits overlapping an earlier replacement are dropped.
pub fn splice(content: &str, base: u32, block: BlockKind, mut edits: Vec<Edit>) -> Vec<Segment> {
    edits.sort_by_key(|e| (e.range.start, e.range.end));
    let end = base + content.len() as u32;
    let mut segments = Vec::with_capacity(edits.len() * 2 + 1);
    let mut cursor = base;

    for edit in edits {
        if edit.range.start < cursor || edit.range.end > end {
            continue;
        }
        if edit.range.start > cursor {
            let piece = &content[(cursor - base) as usize..(edit.range.start - base) as usize];
            segments.push(Segment::mapped(piece, block, cursor));
        }
        segments.push(Segment::generated(edit.text));
        cursor = edit.range.end;
    }
    if cursor < end {
        segments.push(Segment::mapped(
            &content[(cursor - base) as usize..],
            block,
            cursor,
        ));
    }
    segments
}
