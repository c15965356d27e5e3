//! Component IR handed over by the host parser.
//!
//! Every block is described by its byte range inside [`SfcIr::source`]; block
//! content and all substrings are sliced on demand. Ranges stored inside a
//! block (template nodes, directive expressions) are relative to that block's
//! content and never cross its boundaries.

use crate::error::{CompilerError, E_IR};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// RANGES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    pub start: u32,
    pub end: u32,
}

impl TextRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn shift(&self, by: u32) -> Self {
        Self::new(self.start + by, self.end + by)
    }

    /// Slice `text`, or `None` when the range is inverted, out of bounds, or
    /// splits a UTF-8 sequence.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self.start > self.end {
            return None;
        }
        text.get(self.start as usize..self.end as usize)
    }
}

impl From<oxc_span::Span> for TextRange {
    fn from(span: oxc_span::Span) -> Self {
        Self::new(span.start, span.end)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPONENT FILE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SfcIr {
    pub file_name: String,
    /// Full original file text.
    pub source: String,
    #[serde(default)]
    pub script: Option<ScriptBlock>,
    #[serde(default)]
    pub script_setup: Option<ScriptBlock>,
    #[serde(default)]
    pub template: Option<TemplateBlock>,
    #[serde(default)]
    pub styles: Vec<StyleBlock>,
    /// Leading `@key value` comment lines, in file order.
    #[serde(default)]
    pub directive_comments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptBlock {
    pub loc: TextRange,
    #[serde(default = "default_lang")]
    pub lang: String,
    /// `generic="T extends X"` attribute text on `<script setup>`.
    #[serde(default)]
    pub generic: Option<String>,
}

fn default_lang() -> String {
    "ts".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TemplateBlock {
    pub loc: TextRange,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleBlock {
    pub loc: TextRange,
    #[serde(default)]
    pub lang: Option<String>,
    /// `module` attribute: `Some("$style")` for a bare `module`, or the given name.
    #[serde(default)]
    pub module: Option<String>,
}

impl SfcIr {
    pub fn block_text<'a>(&'a self, loc: TextRange, block: &str) -> Result<&'a str, CompilerError> {
        loc.slice(&self.source).ok_or_else(|| {
            CompilerError::new(
                E_IR,
                &format!(
                    "Block range {}..{} is outside the {} byte source",
                    loc.start,
                    loc.end,
                    self.source.len()
                ),
                &self.file_name,
                1,
                1,
            )
            .in_block(block)
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TEMPLATE AST
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TemplateNode {
    Element(ElementNode),
    Text(TextNode),
    Interpolation(InterpolationNode),
    Comment(TextNode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ElementType {
    #[default]
    Element,
    Component,
    Slot,
    Template,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    pub tag: String,
    #[serde(default)]
    pub tag_type: ElementType,
    #[serde(default)]
    pub props: Vec<PropNode>,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
    pub loc: TextRange,
}

impl ElementNode {
    pub fn directive(&self, name: &str) -> Option<&DirectiveProp> {
        self.props.iter().find_map(|p| match p {
            PropNode::Directive(d) if d.name == name => Some(d),
            _ => None,
        })
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeProp> {
        self.props.iter().find_map(|p| match p {
            PropNode::Attribute(a) if a.name == name => Some(a),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    pub loc: TextRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpolationNode {
    /// The expression between the braces.
    pub content: TextRange,
    pub loc: TextRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PropNode {
    Attribute(AttributeProp),
    Directive(DirectiveProp),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeProp {
    pub name: String,
    /// Value without quotes.
    #[serde(default)]
    pub value: Option<TextRange>,
    pub loc: TextRange,
}

/// `v-name:arg.mod="exp"`, including the `:`, `@` and `#` shorthands, which
/// the host normalises to `bind`, `on` and `slot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveProp {
    pub name: String,
    #[serde(default)]
    pub arg: Option<DirectiveArg>,
    #[serde(default)]
    pub exp: Option<TextRange>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub loc: TextRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveArg {
    pub loc: TextRange,
    #[serde(default = "default_true")]
    pub is_static: bool,
}

fn default_true() -> bool {
    true
}
