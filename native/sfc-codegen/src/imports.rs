//! Module specifier scan over raw script text.
//!
//! Used for dependency tracking before (or without) a full parse, so it works
//! on text that may not even be valid syntax. Re-exports count as edges.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    /// Strings are matched so comment markers inside them survive.
    static ref COMMENT_RE: Regex = Regex::new(
        r#"(?s)('(?:\\.|[^'\\\n])*'|"(?:\\.|[^"\\\n])*"|`(?:\\.|[^`\\])*`)|/\*.*?\*/|//[^\n]*"#
    )
    .unwrap();
    static ref SPECIFIER_RE: Regex = Regex::new(concat!(
        r#"\bimport\s*\(\s*['"](?P<dynamic>[^'"\n]+)['"]\s*\)"#,
        r#"|\bimport\s*['"](?P<bare>[^'"\n]+)['"]"#,
        r#"|\bimport\s+[^'";]*?\bfrom\s*['"](?P<import>[^'"\n]+)['"]"#,
        r#"|\bexport\s+(?:type\s+)?(?:\*(?:\s+as\s+[\w$]+)?|\{[^}]*\})\s*from\s*['"](?P<export>[^'"\n]+)['"]"#,
    ))
    .unwrap();
}

fn strip_comments(text: &str) -> String {
    COMMENT_RE
        .replace_all(text, |caps: &Captures| match caps.get(1) {
            Some(string) => string.as_str().to_string(),
            None => " ".to_string(),
        })
        .into_owned()
}

/// Every module specifier the text imports from or re-exports, in first
/// occurrence order without duplicates.
pub fn scan_imports(text: &str) -> Vec<String> {
    let stripped = strip_comments(text);
    let mut out: Vec<String> = Vec::new();
    for caps in SPECIFIER_RE.captures_iter(&stripped) {
        let specifier = ["dynamic", "bare", "import", "export"]
            .iter()
            .find_map(|group| caps.name(group));
        if let Some(specifier) = specifier {
            let specifier = specifier.as_str();
            if !out.iter().any(|s| s == specifier) {
                out.push(specifier.to_string());
            }
        }
    }
    tracing::trace!(count = out.len(), "scanned module specifiers");
    out
}
