//! Script merger.
//!
//! Assembles one virtual TypeScript program per component file in a fixed
//! order: the `<script>` block, the hoisted `<script setup>` imports and the
//! setup body wrapped in `__VLS_setup`, the synthesized component types, the
//! template code, the style code, then the default export and the helper
//! declarations the template code used. Every copied range is recorded in a
//! single flattened mapping table.

use crate::builder::{splice, BlockKind, CodeBuilder, Edit, Mapping};
use crate::collect::{collect_script, collect_script_setup, MacroCall, ScriptRanges, ScriptSetupRanges};
use crate::error::{CompilerError, CompilerWarning, W_MACRO_SHAPE};
use crate::imports::scan_imports;
use crate::ir::{ScriptBlock, SfcIr};
use crate::options::CompilerOptions;
use crate::scope::{camelize, capitalize, BindingSet, ScopeResolver};
use crate::style::{generate_styles, module_names, StyleCodegen};
use crate::template::{generate_template, quoted, Helper, TemplateCodegen};
use serde::Serialize;

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualFile {
    pub file_name: String,
    /// The original file text.
    pub content: String,
    pub virtual_text: String,
    pub mappings: Vec<Mapping>,
    /// Module specifiers the script blocks depend on.
    pub imports: Vec<String>,
    pub warnings: Vec<CompilerWarning>,
    #[serde(skip)]
    block_starts: Vec<(BlockKind, u32)>,
}

impl VirtualFile {
    /// Absolute offset in [`VirtualFile::content`] of a virtual offset, when it
    /// falls inside (or at the end of) a mapped range.
    pub fn to_source_offset(&self, virtual_offset: u32) -> Option<u32> {
        let mapping = self
            .mappings
            .iter()
            .find(|m| m.virtual_range.start <= virtual_offset && virtual_offset < m.virtual_range.end)
            .or_else(|| self.mappings.iter().find(|m| m.virtual_range.end == virtual_offset))?;
        let base = self
            .block_starts
            .iter()
            .find(|(block, _)| *block == mapping.block)?
            .1;
        Some(base + mapping.original_range.start + (virtual_offset - mapping.virtual_range.start))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SourceFile {
    Virtual(VirtualFile),
    /// Not a component file under the current options.
    Passthrough {
        #[serde(rename = "fileName")]
        file_name: String,
    },
}

impl SourceFile {
    pub fn file_name(&self) -> &str {
        match self {
            SourceFile::Virtual(file) => &file.file_name,
            SourceFile::Passthrough { file_name } => file_name,
        }
    }

    pub fn as_virtual(&self) -> Option<&VirtualFile> {
        match self {
            SourceFile::Virtual(file) => Some(file),
            SourceFile::Passthrough { .. } => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MERGE
// ═══════════════════════════════════════════════════════════════════════════════

struct Block<'a, R> {
    ir: &'a ScriptBlock,
    text: &'a str,
    ranges: R,
}

/// Variables the setup body was rewritten to capture macro results into.
#[derive(Default)]
struct Captures {
    props: Option<String>,
    emit: Option<String>,
    exposed: Option<String>,
}

pub fn merge(
    ir: &SfcIr,
    options: &CompilerOptions,
    mut warnings: Vec<CompilerWarning>,
) -> Result<VirtualFile, CompilerError> {
    let file = ir.file_name.as_str();

    let script = match &ir.script {
        Some(block) => {
            let text = ir.block_text(block.loc, "script")?;
            let ranges = collect_script(text, &block.lang, file)?;
            Some(Block { ir: block, text, ranges })
        }
        None => None,
    };
    let setup = match &ir.script_setup {
        Some(block) => {
            let text = ir.block_text(block.loc, "scriptSetup")?;
            let ranges = collect_script_setup(text, &block.lang, file, &options.macros)?;
            warnings.extend(ranges.warnings.iter().cloned());
            Some(Block { ir: block, text, ranges })
        }
        None => None,
    };

    let style_modules = module_names(ir);
    let mut scope = ScopeResolver::new(setup_bindings(
        script.as_ref().map(|b| &b.ranges),
        setup.as_ref().map(|b| &b.ranges),
        &style_modules,
    ));

    let template = match &ir.template {
        Some(block) => {
            let text = ir.block_text(block.loc, "template")?;
            Some(generate_template(text, &block.children, &mut scope, file)?)
        }
        None => None,
    };
    let styles = generate_styles(ir, &mut scope)?;

    let mut code = CodeBuilder::new();
    let mut block_starts = Vec::new();

    // 1. <script>
    if let Some(block) = &script {
        block_starts.push((BlockKind::Script, block.ir.loc.start));
        let edits = block
            .ranges
            .export_default
            .map(|range| Edit::replace(range, "const __VLS_componentOptions = "))
            .into_iter()
            .collect();
        code.extend(splice(block.text, 0, BlockKind::Script, edits));
        code.push_str("\n");
    }
    let has_options = script.as_ref().is_some_and(|b| b.ranges.export_default.is_some());
    let has_default_export = script.as_ref().is_some_and(|b| b.ranges.has_default_export);

    let template_helpers = template.as_ref().map(|t| t.helpers.clone()).unwrap_or_default();
    let exposed = exposed_bindings(
        script.as_ref().map(|b| &b.ranges),
        setup.as_ref().map(|b| &b.ranges),
        template.as_ref(),
        &styles,
    );
    let components = local_components(
        script.as_ref().map(|b| &b.ranges),
        setup.as_ref().map(|b| &b.ranges),
        options.strict_templates,
    );

    if let Some(block) = &setup {
        // 2. <script setup>
        block_starts.push((BlockKind::ScriptSetup, block.ir.loc.start));
        for import in &block.ranges.imports {
            if let Some(text) = import.slice(block.text) {
                code.push_mapped(text, BlockKind::ScriptSetup, import.start);
                code.push_str("\n");
            }
        }
        let generic = block
            .ir
            .generic
            .as_deref()
            .map(|g| format!("<{}>", g))
            .unwrap_or_default();
        code.push_str(&format!("async function __VLS_setup{}() {{\n", generic));
        let (edits, captures) = setup_edits(block.text, &block.ranges);
        code.extend(splice(block.text, 0, BlockKind::ScriptSetup, edits));
        code.push_str("\n");

        // 3. synthesized declarations
        let setup_types = SetupTypes::new(block.text, &block.ranges, &captures, template.as_ref(), &mut warnings);
        code.push_str(&setup_types.declarations());
        code.push_str(
            "type __VLS_PublicInstance = Omit<import('vue').ComponentPublicInstance, '$props' | '$emit' | '$slots'> & __VLS_Props & { $props: __VLS_Props; $emit: __VLS_Emit; $slots: __VLS_Slots };\n",
        );
        let inherit_attrs = block
            .ranges
            .options
            .inherit_attrs
            .or_else(|| script.as_ref().and_then(|s| s.ranges.options.inherit_attrs))
            .unwrap_or(true);
        let inherited = match template.as_ref().and_then(|t| t.root_attrs.as_deref()) {
            Some(attrs) if inherit_attrs => attrs,
            _ => "{}",
        };
        code.push_str(&format!("type __VLS_InheritedAttrs = {};\n", inherited));
        code.push_str(&context_declarations(&exposed, &style_modules, &components, &template_helpers, template.as_ref()));

        // 4. template, 5. styles
        append_generated(&mut code, &mut block_starts, ir, template, styles, &mut warnings);

        // 6. closing and default export
        code.push_str(
            "return {} as { props: __VLS_Props; emit: __VLS_Emit; slots: __VLS_Slots; exposed: __VLS_Exposed; attrs: __VLS_InheritedAttrs };\n}\n",
        );
        code.push_str("type __VLS_Setup = Awaited<ReturnType<typeof __VLS_setup>>;\n");
        code.push_str(
            "export default {} as import('vue').DefineComponent<__VLS_Setup['props'] & Partial<__VLS_Setup['attrs']>>;\n",
        );
    } else {
        code.push_str("function __VLS_template() {\n");
        let instance = if has_options {
            "typeof __VLS_componentOptions extends new (...args: any) => infer I ? I : import('vue').ComponentPublicInstance & Record<string, any>"
        } else {
            "import('vue').ComponentPublicInstance"
        };
        code.push_str(&format!("type __VLS_PublicInstance = {};\n", instance));
        code.push_str(&context_declarations(&exposed, &style_modules, &components, &template_helpers, template.as_ref()));
        append_generated(&mut code, &mut block_starts, ir, template, styles, &mut warnings);
        code.push_str("}\n");
        if has_options {
            code.push_str("export default __VLS_componentOptions;\n");
        } else if !has_default_export {
            code.push_str("export default {} as import('vue').DefineComponent;\n");
        }
    }

    for helper in &template_helpers {
        if let Some(declaration) = helper.declaration() {
            code.push_str(declaration);
        }
    }

    let (virtual_text, mappings) = code.finish();

    let mut imports = Vec::new();
    for text in [script.as_ref().map(|b| b.text), setup.as_ref().map(|b| b.text)]
        .into_iter()
        .flatten()
    {
        for specifier in scan_imports(text) {
            if !imports.contains(&specifier) {
                imports.push(specifier);
            }
        }
    }

    tracing::debug!(
        file,
        bytes = virtual_text.len(),
        mappings = mappings.len(),
        exposed = exposed.len(),
        warnings = warnings.len(),
        "merged virtual file"
    );

    Ok(VirtualFile {
        file_name: ir.file_name.clone(),
        content: ir.source.clone(),
        virtual_text,
        mappings,
        imports,
        warnings,
        block_starts,
    })
}

fn append_generated(
    code: &mut CodeBuilder,
    block_starts: &mut Vec<(BlockKind, u32)>,
    ir: &SfcIr,
    template: Option<TemplateCodegen>,
    styles: StyleCodegen,
    warnings: &mut Vec<CompilerWarning>,
) {
    if let (Some(block), Some(template)) = (&ir.template, template) {
        block_starts.push((BlockKind::Template, block.loc.start));
        warnings.extend(template.warnings);
        code.append(template.code);
    }
    for (index, style) in ir.styles.iter().enumerate() {
        block_starts.push((BlockKind::Style(index as u32), style.loc.start));
    }
    warnings.extend(styles.warnings);
    code.append(styles.code);
}

// ═══════════════════════════════════════════════════════════════════════════════
// BINDINGS & EXPOSURE
// ═══════════════════════════════════════════════════════════════════════════════

fn setup_bindings(
    script: Option<&ScriptRanges>,
    setup: Option<&ScriptSetupRanges>,
    style_modules: &[String],
) -> BindingSet {
    let mut set = BindingSet::with_instance_properties();
    if let Some(ranges) = script {
        set.extend(ranges.value_names());
        set.extend(ranges.options.members.iter());
    }
    if let Some(ranges) = setup {
        set.extend(ranges.value_names());
        set.extend(ranges.prop_names.iter());
        set.extend(ranges.models.iter().map(|m| m.name.as_str()));
        set.extend(ranges.options.members.iter());
        if let Some(destructure) = &ranges.props_destructure {
            set.extend(destructure.names.iter());
            set.extend(destructure.rest.iter());
        }
        set.extend(ranges.template_refs.iter().filter_map(|r| r.assigned_to.as_deref()));
    }
    set.extend(style_modules.iter());

    let registered = script
        .into_iter()
        .map(|r| &r.options)
        .chain(setup.into_iter().map(|r| &r.options))
        .flat_map(|o| o.components.iter());
    let mut matched = Vec::new();
    for name in registered {
        let camel = camelize(name);
        let pascal = capitalize(&camel);
        if set.contains(name) || set.contains(&camel) || set.contains(&pascal) {
            matched.push(name.as_str());
        }
    }
    set.extend(matched);
    set
}

/// Declared value bindings the template context must carry: those the
/// template or styles read, reserved `$` names the template used, and those
/// matching a component tag.
fn exposed_bindings(
    script: Option<&ScriptRanges>,
    setup: Option<&ScriptSetupRanges>,
    template: Option<&TemplateCodegen>,
    styles: &StyleCodegen,
) -> Vec<String> {
    let declared = script
        .into_iter()
        .flat_map(|r| r.value_names())
        .chain(setup.into_iter().flat_map(|r| r.value_names()));

    let mut exposed: Vec<String> = Vec::new();
    for name in declared {
        if exposed.iter().any(|n| n == name) {
            continue;
        }
        let used = template.is_some_and(|t| {
            t.accessed.iter().any(|n| n == name)
                || t.dollar.iter().any(|n| n == name)
                || t
                    .component_tags
                    .iter()
                    .any(|tag| tag.replace('-', "").eq_ignore_ascii_case(name))
        }) || styles.accessed.iter().any(|n| n == name);
        if used {
            exposed.push(name.to_string());
        }
    }
    exposed
}

/// Type of the `__VLS_components` registry: global components, locally
/// registered ones, and in non-strict mode anything else.
fn local_components(script: Option<&ScriptRanges>, setup: Option<&ScriptSetupRanges>, strict: bool) -> String {
    let mut parts = vec!["import('vue').GlobalComponents".to_string()];

    let mut entries = Vec::new();
    let registered = script
        .into_iter()
        .flat_map(|r| r.options.components.iter().map(move |c| (c, r.value_names().any(|n| n == c))))
        .chain(
            setup
                .into_iter()
                .flat_map(|r| r.options.components.iter().map(move |c| (c, r.value_names().any(|n| n == c)))),
        );
    for (name, bound) in registered {
        if bound {
            entries.push(format!("{}: typeof {}", quoted(name), name));
        }
    }
    if !entries.is_empty() {
        parts.push(format!("{{ {} }}", entries.join("; ")));
    }
    if !strict {
        parts.push("Record<string, any>".to_string());
    }
    parts.join(" & ")
}

// ═══════════════════════════════════════════════════════════════════════════════
// SETUP REWRITES
// ═══════════════════════════════════════════════════════════════════════════════

fn setup_edits(text: &str, ranges: &ScriptSetupRanges) -> (Vec<Edit>, Captures) {
    let mut edits: Vec<Edit> = ranges
        .imports
        .iter()
        .chain(ranges.exports.iter())
        .map(|r| Edit::replace(*r, ""))
        .collect();
    let mut captures = Captures::default();

    if let Some(props) = ranges.props.as_ref().filter(|p| p.type_arg.is_none()) {
        captures.props = capture(text, props, "__VLS_props", &mut edits);
    }
    if let Some(emits) = ranges.emits.as_ref().filter(|e| e.type_arg.is_none()) {
        captures.emit = capture(text, emits, "__VLS_emit", &mut edits);
    }
    if let Some(expose) = &ranges.expose {
        if let Some(arg) = expose.runtime_arg.and_then(|r| r.slice(text)) {
            edits.push(Edit::insert(
                expose.statement_start,
                format!("const __VLS_exposed = {};\n", arg),
            ));
            captures.exposed = Some("__VLS_exposed".to_string());
        }
    }

    for call in &ranges.template_refs {
        let Some(name) = &call.name else {
            continue;
        };
        if call.has_type_args {
            continue;
        }
        edits.push(Edit::insert(call.call.start, "("));
        edits.push(Edit::insert(
            call.call.end,
            format!(
                " as Readonly<import('vue').ShallowRef<__VLS_TemplateRefLookup<'{}'> | null>>)",
                name.replace('\\', "\\\\").replace('\'', "\\'")
            ),
        ));
    }
    (edits, captures)
}

/// Make the macro's result nameable. Only runtime-argument forms need it.
fn capture(text: &str, call: &MacroCall, name: &str, edits: &mut Vec<Edit>) -> Option<String> {
    if call.runtime_arg.is_none() {
        return None;
    }
    if let Some(var) = &call.assigned_to {
        return Some(var.clone());
    }
    if call.is_statement {
        edits.push(Edit::insert(call.call.start, format!("const {} = ", name)));
    } else {
        let call_text = call.call.slice(text)?;
        edits.push(Edit::insert(
            call.statement_start,
            format!("const {} = {};\n", name, call_text),
        ));
    }
    Some(name.to_string())
}

// ═══════════════════════════════════════════════════════════════════════════════
// SYNTHESIZED DECLARATIONS
// ═══════════════════════════════════════════════════════════════════════════════

struct SetupTypes {
    props: String,
    emit: String,
    slots: String,
    exposed: String,
}

impl SetupTypes {
    fn new(
        text: &str,
        ranges: &ScriptSetupRanges,
        captures: &Captures,
        template: Option<&TemplateCodegen>,
        warnings: &mut Vec<CompilerWarning>,
    ) -> Self {
        let mut props = macro_type(text, ranges.props.as_ref(), captures.props.as_deref(), warnings)
            .unwrap_or_else(|| "{}".to_string());
        if let Some(call) = ranges.props.as_ref().filter(|p| p.type_arg.is_some() && !p.defaults.is_empty()) {
            let keys: Vec<String> = call.defaults.iter().map(|k| quoted(k)).collect();
            let keys = keys.join(" | ");
            props = format!(
                "Omit<{props}, {keys}> & Required<Pick<{props}, Extract<keyof {props}, {keys}>>>",
                props = props,
                keys = keys
            );
        }
        for model in &ranges.models {
            let value = model
                .call
                .type_arg
                .and_then(|t| t.slice(text))
                .unwrap_or("any");
            props.push_str(&format!(
                " & {{ {name}?: {value}; 'onUpdate:{raw}'?: (value: {value}) => void }}",
                name = quoted(&model.name),
                raw = model.name,
                value = value
            ));
        }

        let emit = macro_type(text, ranges.emits.as_ref(), captures.emit.as_deref(), warnings)
            .unwrap_or_else(|| "{}".to_string());

        let slots = match &ranges.slots {
            Some(call) => macro_type(text, Some(call), None, warnings).unwrap_or_else(|| "{}".to_string()),
            None => {
                let outlets: Vec<String> = template
                    .map(|t| {
                        t.slots
                            .iter()
                            .map(|s| format!("{}?: (props: typeof {}) => any", quoted(&s.name), s.var))
                            .collect()
                    })
                    .unwrap_or_default();
                format!("{{ {} }}", outlets.join("; "))
            }
        };

        let exposed = match &captures.exposed {
            Some(var) => format!("typeof {}", var),
            None => "{}".to_string(),
        };

        Self {
            props,
            emit,
            slots,
            exposed,
        }
    }

    fn declarations(&self) -> String {
        format!(
            "type __VLS_Props = {};\ntype __VLS_Emit = {};\ntype __VLS_Slots = {};\ntype __VLS_Exposed = {};\n",
            self.props, self.emit, self.slots, self.exposed
        )
    }
}

/// Type argument text, `typeof` the captured result, or `None` with a warning.
fn macro_type(
    text: &str,
    call: Option<&MacroCall>,
    capture: Option<&str>,
    warnings: &mut Vec<CompilerWarning>,
) -> Option<String> {
    let call = call?;
    if let Some(type_text) = call.type_arg.and_then(|t| t.slice(text)) {
        return Some(format!("({})", type_text));
    }
    if let Some(var) = capture {
        return Some(format!("typeof {}", var));
    }
    warnings.push(CompilerWarning::new(
        W_MACRO_SHAPE,
        format!("{}() has neither a type nor a runtime argument; its type is omitted", call.callee),
    ));
    None
}

fn context_declarations(
    exposed: &[String],
    style_modules: &[String],
    components: &str,
    helpers: &[Helper],
    template: Option<&TemplateCodegen>,
) -> String {
    let mut out = String::new();

    let members: Vec<String> = exposed
        .iter()
        .map(|name| format!("{}: typeof {}", quoted(name), name))
        .collect();
    out.push_str(&format!("type __VLS_SetupExposed = {{ {} }};\n", members.join("; ")));

    let mut ctx = "__VLS_PublicInstance & __VLS_SetupExposed".to_string();
    if !style_modules.is_empty() {
        let modules: Vec<String> = style_modules
            .iter()
            .map(|name| format!("{}: Record<string, string>", quoted(name)))
            .collect();
        ctx.push_str(&format!(" & {{ {} }}", modules.join("; ")));
    }
    out.push_str(&format!("const __VLS_ctx = {{}} as {};\n", ctx));

    if helpers.contains(&Helper::Components) {
        out.push_str(&format!("const __VLS_components = {{}} as {};\n", components));
    }

    let refs: Vec<String> = template
        .map(|t| {
            t.template_refs
                .iter()
                .map(|r| format!("{}: {}", quoted(&r.name), r.type_text))
                .collect()
        })
        .unwrap_or_default();
    out.push_str(&format!("type __VLS_TemplateRefs = {{ {} }};\n", refs.join("; ")));
    out.push_str(
        "type __VLS_TemplateRefLookup<K extends string> = K extends keyof __VLS_TemplateRefs ? __VLS_TemplateRefs[K] : unknown;\n",
    );
    out
}
