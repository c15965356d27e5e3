//! # SFC Virtual Code
//!
//! Turns a single-file component, handed over by the host as an [`SfcIr`],
//! into a type-checkable virtual TypeScript program plus a mapping table that
//! translates positions in that program back to the original file.
//!
//! ## Identifier Invariants
//!
//! 1. **Context Access**: a template identifier that names a setup binding and
//!    is not shadowed by a loop, slot or handler scope is emitted as
//!    `__VLS_ctx.<name>`. Everything else is emitted as written.
//!
//! 2. **Type Positions**: identifiers inside type annotations, type arguments,
//!    type queries and type literals are never prefixed. A computed property
//!    key is value context again, however deeply it is nested in a type.
//!
//! 3. **Verbatim Mappings**: every mapped virtual range is a byte-for-byte copy
//!    of its original range. Mappings never overlap in virtual space.
//!
//! 4. **No Hidden State**: every [`generate`] call recomputes everything, so
//!    files can be generated concurrently ([`generate_all`]).

#[cfg(feature = "napi")]
use napi_derive::napi;
use rayon::prelude::*;

mod builder;
mod classify;
mod collect;
mod error;
mod imports;
mod ir;
mod merge;
mod options;
mod scope;
mod style;
mod syntax;
mod template;
mod visitor;

#[cfg(test)]
mod classify_tests;
#[cfg(test)]
mod template_tests;

pub use builder::{BlockKind, Mapping};
pub use classify::{classify, Classification, ClassifiedExpression, ClassifiedIdentifier, CTX_PREFIX};
pub use error::{CompilerError, CompilerWarning, E_IR, E_PARSE, W_CLASSIFY_AMBIGUOUS, W_MACRO_SHAPE, W_OPTION_DIRECTIVE};
pub use imports::scan_imports;
pub use ir::*;
pub use merge::{SourceFile, VirtualFile};
pub use options::{CompilerOptions, MacroNames};
pub use scope::{BindingSet, Resolution, ScopeResolver};
pub use syntax::{parse_expression, SyntaxElement, SyntaxKind, SyntaxNode};

/// Generate the virtual program for one component file.
///
/// Directive comments in the IR are applied on top of `options` first; a file
/// whose extension the resulting options do not handle is passed through.
#[tracing::instrument(skip_all, fields(file = %ir.file_name))]
pub fn generate(ir: &SfcIr, options: &CompilerOptions) -> Result<SourceFile, CompilerError> {
    let (options, warnings) = options.with_directives(&ir.directive_comments);
    if !options.handles(&ir.file_name) {
        tracing::debug!("not a component file, passing through");
        return Ok(SourceFile::Passthrough {
            file_name: ir.file_name.clone(),
        });
    }
    merge::merge(ir, &options, warnings).map(SourceFile::Virtual)
}

/// [`generate`] over many files in parallel. Results are in input order.
pub fn generate_all(irs: &[SfcIr], options: &CompilerOptions) -> Vec<Result<SourceFile, CompilerError>> {
    irs.par_iter().map(|ir| generate(ir, options)).collect()
}

/// JSON in, JSON out: the host-facing form of [`generate`].
pub fn generate_json(ir_json: &str, options_json: Option<&str>) -> Result<String, CompilerError> {
    let ir: SfcIr = serde_json::from_str(ir_json).map_err(|e| invalid_payload("IR", &e))?;
    let options = match options_json {
        Some(json) => serde_json::from_str(json).map_err(|e| invalid_payload("options", &e))?,
        None => CompilerOptions::default(),
    };
    let file = generate(&ir, &options)?;
    serde_json::to_string(&file).map_err(|e| invalid_payload("output", &e))
}

fn invalid_payload(what: &str, err: &serde_json::Error) -> CompilerError {
    CompilerError::new(
        E_IR,
        &format!("Invalid {}: {}", what, err),
        "<input>",
        err.line() as u32,
        err.column() as u32,
    )
}

#[cfg(feature = "napi")]
#[napi]
pub fn generate_virtual_code_native(ir_json: String, options_json: Option<String>) -> napi::Result<String> {
    generate_json(&ir_json, options_json.as_deref()).map_err(|e| napi::Error::from_reason(e.to_string()))
}

#[cfg(feature = "napi")]
#[napi]
pub fn scan_imports_native(text: String) -> Vec<String> {
    scan_imports(&text)
}
