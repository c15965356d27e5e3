//! Style block fragments: `v-bind()` expressions in CSS and `<style module>` bindings.

use crate::builder::{splice, BlockKind, CodeBuilder};
use crate::classify::classify;
use crate::error::{CompilerError, CompilerWarning, W_CLASSIFY_AMBIGUOUS};
use crate::ir::SfcIr;
use crate::scope::ScopeResolver;
use crate::syntax::parse_expression;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CSS_COMMENT_RE: Regex = Regex::new(r"(?s)/\*.*?\*/").unwrap();
    static ref V_BIND_RE: Regex =
        Regex::new(r#"v-bind\(\s*(?:'([^']*)'|"([^"]*)"|([^'"\s)][^)]*?))\s*\)"#).unwrap();
}

#[derive(Debug, Default)]
pub struct StyleCodegen {
    pub code: CodeBuilder,
    pub accessed: Vec<String>,
    pub warnings: Vec<CompilerWarning>,
}

/// Names `<style module>` blocks expose to the template.
pub fn module_names(ir: &SfcIr) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for style in &ir.styles {
        let Some(module) = &style.module else {
            continue;
        };
        let name = if module.is_empty() || module == "true" {
            "$style".to_string()
        } else {
            module.clone()
        };
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

pub fn generate_styles(ir: &SfcIr, scope: &mut ScopeResolver) -> Result<StyleCodegen, CompilerError> {
    let mut out = StyleCodegen::default();
    for (index, style) in ir.styles.iter().enumerate() {
        let block = format!("style[{}]", index);
        let css = ir.block_text(style.loc, &block)?;
        // Blank out comments so offsets stay put.
        let scrubbed = CSS_COMMENT_RE.replace_all(css, |caps: &regex::Captures| " ".repeat(caps[0].len()));

        for caps in V_BIND_RE.captures_iter(&scrubbed) {
            let Some(m) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) else {
                continue;
            };
            let code = &css[m.start()..m.end()];
            if code.trim().is_empty() {
                continue;
            }
            let tree = parse_expression(code, m.start() as u32)
                .map_err(|e| CompilerError::parse(&ir.file_name, &block, css, e.offset, &e.message))?;
            let classified = classify(&tree, scope);
            for name in &classified.accessed {
                if !out.accessed.contains(name) {
                    out.accessed.push(name.clone());
                }
            }
            if classified.ambiguous {
                out.warnings.push(CompilerWarning::new(
                    W_CLASSIFY_AMBIGUOUS,
                    format!("Unrecognised syntax in v-bind({})", code.trim()),
                ));
            }
            out.code.push_str("(");
            out.code.extend(splice(
                code,
                m.start() as u32,
                BlockKind::Style(index as u32),
                classified.edits,
            ));
            out.code.push_str(");\n");
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{StyleBlock, TextRange};
    use crate::scope::BindingSet;

    fn ir_with_styles(blocks: &[(&str, Option<&str>)]) -> SfcIr {
        let mut source = String::new();
        let mut styles = Vec::new();
        for (css, module) in blocks {
            source.push_str("<style>");
            let start = source.len() as u32;
            source.push_str(css);
            styles.push(StyleBlock {
                loc: TextRange::new(start, source.len() as u32),
                lang: None,
                module: module.map(str::to_string),
            });
            source.push_str("</style>\n");
        }
        SfcIr {
            file_name: "Styled.vue".to_string(),
            source,
            styles,
            ..Default::default()
        }
    }

    #[test]
    fn test_v_bind_expressions_are_classified_and_mapped() {
        let ir = ir_with_styles(&[
            (".a { color: v-bind(color); }", None),
            (".b { width: v-bind('size.w + \"px\"'); /* v-bind(ignored) */ }", None),
        ]);
        let mut set = BindingSet::new();
        set.extend(["color", "size", "ignored"]);
        let mut scope = ScopeResolver::new(set);
        let out = generate_styles(&ir, &mut scope).unwrap();
        let (text, mappings) = out.code.finish();
        assert_eq!(text, "(__VLS_ctx.color);\n(__VLS_ctx.size.w + \"px\");\n");
        assert_eq!(out.accessed, vec!["color", "size"]);
        assert_eq!(mappings[0].block, BlockKind::Style(0));
        assert_eq!(mappings[1].block, BlockKind::Style(1));
        assert_eq!(mappings[0].original_range.start, 19);
    }

    #[test]
    fn test_module_names() {
        let ir = ir_with_styles(&[("", Some("$style")), ("", Some("classes")), ("", None), ("", Some(""))]);
        assert_eq!(module_names(&ir), vec!["$style", "classes"]);
    }
}
