#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

/// Script, template expression or IR range could not be parsed. Fatal.
pub const E_PARSE: &str = "E-PARSE";
/// The host handed over an IR or options payload that does not deserialize. Fatal.
pub const E_IR: &str = "E-IR";
/// A `@key value` directive comment was malformed. The line is skipped.
pub const W_OPTION_DIRECTIVE: &str = "W-OPTION-DIRECTIVE";
/// A macro call had a shape codegen does not understand. The feature is omitted.
pub const W_MACRO_SHAPE: &str = "W-MACRO-SHAPE";
/// An identifier sat below a node the classifier could not place. Treated as a value.
pub const W_CLASSIFY_AMBIGUOUS: &str = "W-CLASSIFY-AMBIGUOUS";

pub fn get_guarantee(code: &str) -> &'static str {
    match code {
        E_PARSE => "Every script block and template expression parses before codegen starts.",
        E_IR => "The component IR is well formed and every range stays inside its block.",
        W_OPTION_DIRECTIVE => "Directive comments are `@<option> <json value>` lines.",
        W_MACRO_SHAPE => "Macro calls take a type argument, a runtime argument, or nothing.",
        W_CLASSIFY_AMBIGUOUS => "Identifiers in unrecognised syntax resolve as runtime values.",
        _ => "Unknown guarantee.",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILER ERROR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
#[error("[{code}] {file}:{line}:{column}: {message}")]
pub struct CompilerError {
    pub code: String,
    pub error_type: String,
    pub message: String,
    pub guarantee: String,
    pub file: String,
    /// Which block the position refers to (`script`, `scriptSetup`, `template`, `style`).
    pub block: Option<String>,
    pub line: u32,
    pub column: u32,
    pub context: Option<String>,
    pub hints: Vec<String>,
}

impl CompilerError {
    pub fn new(code: &str, message: &str, file: &str, line: u32, column: u32) -> Self {
        Self::with_details(code, message, file, line, column, None, vec![])
    }

    pub fn with_details(
        code: &str,
        message: &str,
        file: &str,
        line: u32,
        column: u32,
        context: Option<String>,
        hints: Vec<String>,
    ) -> Self {
        CompilerError {
            code: code.to_string(),
            error_type: error_type(code).to_string(),
            message: message.to_string(),
            guarantee: get_guarantee(code).to_string(),
            file: file.to_string(),
            block: None,
            line,
            column,
            context,
            hints,
        }
    }

    /// Parse failure at `offset` inside `text`, the content of `block`.
    pub fn parse(file: &str, block: &str, text: &str, offset: u32, message: &str) -> Self {
        let (line, column) = line_col(text, offset as usize);
        let mut err = Self::with_details(
            E_PARSE,
            message,
            file,
            line,
            column,
            snippet(text, offset as usize),
            vec![],
        );
        err.block = Some(block.to_string());
        err
    }

    pub fn in_block(mut self, block: &str) -> Self {
        self.block = Some(block.to_string());
        self
    }
}

fn error_type(code: &str) -> &'static str {
    match code {
        E_PARSE => "PARSE_ERROR",
        E_IR => "INVALID_IR",
        W_OPTION_DIRECTIVE => "OPTION_DIRECTIVE_ERROR",
        W_MACRO_SHAPE => "UNSUPPORTED_MACRO_SHAPE",
        W_CLASSIFY_AMBIGUOUS => "CLASSIFICATION_AMBIGUOUS",
        _ => "COMPILER_ERROR",
    }
}

/// 1-based line and column of a byte offset. Offsets past the end clamp to the end.
pub fn line_col(text: &str, offset: usize) -> (u32, u32) {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &text[..offset];
    let line = before.matches('\n').count() as u32 + 1;
    let column = match before.rfind('\n') {
        Some(nl) => before[nl + 1..].chars().count() as u32 + 1,
        None => before.chars().count() as u32 + 1,
    };
    (line, column)
}

fn snippet(text: &str, offset: usize) -> Option<String> {
    let (line, _) = line_col(text, offset);
    text.lines()
        .nth(line as usize - 1)
        .map(|l| l.trim_end().to_string())
        .filter(|l| !l.is_empty())
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECOVERABLE DIAGNOSTICS
// ═══════════════════════════════════════════════════════════════════════════════

/// A degradation that did not stop generation. Always logged through `tracing` as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerWarning {
    pub code: String,
    pub message: String,
}

impl CompilerWarning {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::warn!(code, %message, "degraded codegen");
        Self {
            code: code.to_string(),
            message,
        }
    }
}
