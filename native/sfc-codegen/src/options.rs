use crate::error::{CompilerWarning, W_OPTION_DIRECTIVE};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

lazy_static! {
    static ref DIRECTIVE_RE: Regex =
        Regex::new(r"^\s*(?:<!--)?\s*@([A-Za-z_$][\w$]*)(?:\s+(.*?))?\s*(?:-->)?\s*$").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
    /// File extensions that get a virtual program. Everything else passes through.
    pub extensions: Vec<String>,
    /// Unknown component tags become errors in the checker instead of `any`.
    pub strict_templates: bool,
    pub macros: MacroNames,
    /// Host plugin entries. Carried through untouched for the host to act on.
    pub plugins: Vec<Value>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            extensions: vec![".vue".to_string()],
            strict_templates: false,
            macros: MacroNames::default(),
            plugins: Vec::new(),
        }
    }
}

/// Callee names recognised as compile-time macros in `<script setup>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MacroNames {
    pub define_props: Vec<String>,
    pub define_slots: Vec<String>,
    pub define_emits: Vec<String>,
    pub define_expose: Vec<String>,
    pub define_model: Vec<String>,
    pub define_options: Vec<String>,
    pub with_defaults: Vec<String>,
    pub template_ref: Vec<String>,
}

impl Default for MacroNames {
    fn default() -> Self {
        let one = |s: &str| vec![s.to_string()];
        Self {
            define_props: one("defineProps"),
            define_slots: one("defineSlots"),
            define_emits: one("defineEmits"),
            define_expose: one("defineExpose"),
            define_model: one("defineModel"),
            define_options: one("defineOptions"),
            with_defaults: one("withDefaults"),
            template_ref: one("useTemplateRef"),
        }
    }
}

impl MacroNames {
    pub fn is(list: &[String], name: &str) -> bool {
        list.iter().any(|n| n == name)
    }
}

impl CompilerOptions {
    pub fn handles(&self, file_name: &str) -> bool {
        self.extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
    }

    /// Overlay per-file `@key value` directive comments on top of these options.
    ///
    /// Scalars are replaced (last writer wins), arrays and objects are merged
    /// additively. Lines that are malformed, name an unknown option, or carry a
    /// value of the wrong type are skipped and reported.
    pub fn with_directives(&self, lines: &[String]) -> (CompilerOptions, Vec<CompilerWarning>) {
        let mut warnings = Vec::new();
        let mut current = match serde_json::to_value(self) {
            Ok(v) => v,
            Err(e) => {
                warnings.push(CompilerWarning::new(W_OPTION_DIRECTIVE, e.to_string()));
                return (self.clone(), warnings);
            }
        };
        let mut resolved = self.clone();

        for line in lines {
            let Some(caps) = DIRECTIVE_RE.captures(line) else {
                warnings.push(CompilerWarning::new(
                    W_OPTION_DIRECTIVE,
                    format!("Malformed directive comment `{}`", line.trim()),
                ));
                continue;
            };
            let key = &caps[1];
            let raw = caps.get(2).map(|m| m.as_str()).unwrap_or("");

            let incoming = if raw.is_empty() {
                Value::Bool(true)
            } else {
                match serde_json::from_str::<Value>(raw) {
                    Ok(v) => v,
                    Err(e) => {
                        warnings.push(CompilerWarning::new(
                            W_OPTION_DIRECTIVE,
                            format!("Invalid value for @{}: {}", key, e),
                        ));
                        continue;
                    }
                }
            };

            let mut candidate = current.clone();
            let Some(slot) = candidate.get_mut(key) else {
                warnings.push(CompilerWarning::new(
                    W_OPTION_DIRECTIVE,
                    format!("Unknown option @{}", key),
                ));
                continue;
            };
            merge_value(slot, incoming);

            match serde_json::from_value::<CompilerOptions>(candidate.clone()) {
                Ok(opts) => {
                    current = candidate;
                    resolved = opts;
                }
                Err(e) => warnings.push(CompilerWarning::new(
                    W_OPTION_DIRECTIVE,
                    format!("Option @{} has the wrong type: {}", key, e),
                )),
            }
        }

        (resolved, warnings)
    }
}

fn merge_value(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Array(items), Value::Array(more)) => {
            for item in more {
                if !items.contains(&item) {
                    items.push(item);
                }
            }
        }
        (Value::Array(items), scalar) => {
            if !items.contains(&scalar) {
                items.push(scalar);
            }
        }
        (Value::Object(fields), Value::Object(more)) => {
            for (k, v) in more {
                match fields.get_mut(&k) {
                    Some(existing) => merge_value(existing, v),
                    None => {
                        fields.insert(k, v);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
