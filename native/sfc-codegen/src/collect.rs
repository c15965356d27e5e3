//! Range collection for `<script>` and `<script setup>` blocks.
//!
//! Each collector parses the block content once and records what codegen needs
//! as byte ranges into that content: top-level bindings, import statements,
//! macro calls, template-ref calls and component option fields.

use crate::error::{CompilerError, CompilerWarning, W_MACRO_SHAPE};
use crate::ir::TextRange;
use crate::options::MacroNames;
use crate::syntax::first_error;
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::Visit;
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Value,
    Type,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub kind: BindingKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroCall {
    pub callee: String,
    /// The whole call, including a `withDefaults(...)` wrapper.
    pub call: TextRange,
    pub statement_start: u32,
    /// The call is the whole expression statement (`defineEmits(...)`).
    pub is_statement: bool,
    /// Text between `<` and `>`.
    pub type_arg: Option<TextRange>,
    pub runtime_arg: Option<TextRange>,
    /// Keys of the `withDefaults` defaults object.
    pub defaults: Vec<String>,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropsDestructure {
    pub names: Vec<String>,
    pub rest: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCall {
    /// Prop name, `modelValue` unless a string literal is passed first.
    pub name: String,
    pub call: MacroCall,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRefCall {
    pub call: TextRange,
    /// The string literal passed as the ref name.
    pub name: Option<String>,
    pub has_type_args: bool,
    pub assigned_to: Option<String>,
}

/// Fields read from `export default {...}` or `defineOptions({...})`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentOptionFields {
    pub inherit_attrs: Option<bool>,
    /// Keys of the `components` option.
    pub components: Vec<String>,
    /// Instance members declared through `props`, `data`, `computed`, `methods`, `setup`.
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptRanges {
    pub bindings: Vec<Binding>,
    pub imports: Vec<TextRange>,
    /// `export default ` up to the start of the exported expression.
    pub export_default: Option<TextRange>,
    /// Any `export default`, including function and class declarations.
    pub has_default_export: bool,
    pub options: ComponentOptionFields,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptSetupRanges {
    pub bindings: Vec<Binding>,
    pub imports: Vec<TextRange>,
    pub props: Option<MacroCall>,
    pub props_destructure: Option<PropsDestructure>,
    /// Prop names readable from a type-literal or runtime `defineProps` argument.
    pub prop_names: Vec<String>,
    pub emits: Option<MacroCall>,
    pub slots: Option<MacroCall>,
    pub expose: Option<MacroCall>,
    /// `export ` in front of a declaration, or a whole `export { .. }` statement.
    pub exports: Vec<TextRange>,
    pub models: Vec<ModelCall>,
    pub template_refs: Vec<TemplateRefCall>,
    pub options: ComponentOptionFields,
    pub warnings: Vec<CompilerWarning>,
}

impl ScriptRanges {
    pub fn value_names(&self) -> impl Iterator<Item = &str> {
        value_names(&self.bindings)
    }
}

impl ScriptSetupRanges {
    pub fn value_names(&self) -> impl Iterator<Item = &str> {
        value_names(&self.bindings)
    }
}

fn value_names(bindings: &[Binding]) -> impl Iterator<Item = &str> {
    bindings
        .iter()
        .filter(|b| b.kind == BindingKind::Value)
        .map(|b| b.name.as_str())
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARSING
// ═══════════════════════════════════════════════════════════════════════════════

fn source_type(lang: &str) -> SourceType {
    match lang {
        "js" => SourceType::mjs(),
        "jsx" => SourceType::mjs().with_jsx(true),
        "tsx" => SourceType::tsx(),
        _ => SourceType::ts(),
    }
}

fn parse_program<'a>(
    allocator: &'a Allocator,
    content: &'a str,
    lang: &str,
    file: &str,
    block: &str,
) -> Result<Program<'a>, CompilerError> {
    let ret = Parser::new(allocator, content, source_type(lang)).parse();
    if ret.panicked || !ret.errors.is_empty() {
        let err = first_error(&ret.errors, 0);
        return Err(CompilerError::parse(file, block, content, err.offset, &err.message));
    }
    Ok(ret.program)
}

// ═══════════════════════════════════════════════════════════════════════════════
// BINDINGS
// ═══════════════════════════════════════════════════════════════════════════════

fn push_binding(out: &mut Vec<Binding>, id: &BindingIdentifier, kind: BindingKind) {
    out.push(Binding {
        name: id.name.to_string(),
        kind,
    });
}

fn declaration_bindings(decl: &Declaration, out: &mut Vec<Binding>) {
    match decl {
        Declaration::VariableDeclaration(var) => {
            for declarator in &var.declarations {
                for id in declarator.id.get_binding_identifiers() {
                    push_binding(out, id, BindingKind::Value);
                }
            }
        }
        Declaration::FunctionDeclaration(func) => {
            if let Some(id) = &func.id {
                push_binding(out, id, BindingKind::Value);
            }
        }
        Declaration::ClassDeclaration(class) => {
            if let Some(id) = &class.id {
                push_binding(out, id, BindingKind::Value);
            }
        }
        Declaration::TSEnumDeclaration(decl) => push_binding(out, &decl.id, BindingKind::Value),
        Declaration::TSTypeAliasDeclaration(decl) => push_binding(out, &decl.id, BindingKind::Type),
        Declaration::TSInterfaceDeclaration(decl) => push_binding(out, &decl.id, BindingKind::Type),
        _ => {}
    }
}

fn import_bindings(import: &ImportDeclaration, out: &mut Vec<Binding>) {
    let Some(specifiers) = &import.specifiers else {
        return;
    };
    for specifier in specifiers {
        let type_only = import.import_kind.is_type()
            || matches!(specifier, ImportDeclarationSpecifier::ImportSpecifier(s) if s.import_kind.is_type());
        let kind = if type_only {
            BindingKind::Type
        } else {
            BindingKind::Value
        };
        push_binding(out, specifier.local(), kind);
    }
}

/// Bindings and import ranges shared by both script kinds.
fn top_level(program: &Program, bindings: &mut Vec<Binding>, imports: &mut Vec<TextRange>) {
    for statement in &program.body {
        match statement {
            Statement::ImportDeclaration(import) => {
                imports.push(import.span.into());
                import_bindings(import, bindings);
            }
            Statement::ExportNamedDeclaration(export) => {
                if let Some(decl) = &export.declaration {
                    declaration_bindings(decl, bindings);
                }
            }
            other => {
                if let Some(decl) = other.as_declaration() {
                    declaration_bindings(decl, bindings);
                }
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// <script>
// ═══════════════════════════════════════════════════════════════════════════════

pub fn collect_script(content: &str, lang: &str, file: &str) -> Result<ScriptRanges, CompilerError> {
    let allocator = Allocator::default();
    let program = parse_program(&allocator, content, lang, file, "script")?;

    let mut ranges = ScriptRanges::default();
    top_level(&program, &mut ranges.bindings, &mut ranges.imports);

    for statement in &program.body {
        let Statement::ExportDefaultDeclaration(export) = statement else {
            continue;
        };
        ranges.has_default_export = true;
        let Some(expr) = export.declaration.as_expression() else {
            continue;
        };
        let expr_span = expr.span();
        ranges.export_default = Some(TextRange::new(export.span.start, expr_span.start));
        if let Some(obj) = options_object(expr) {
            read_option_fields(obj, &mut ranges.options);
        }
    }

    tracing::debug!(
        bindings = ranges.bindings.len(),
        imports = ranges.imports.len(),
        has_default_export = ranges.export_default.is_some(),
        "collected script ranges"
    );
    Ok(ranges)
}

/// `{...}`, or the first argument of `defineComponent({...})`.
fn options_object<'b, 'a>(expr: &'b Expression<'a>) -> Option<&'b ObjectExpression<'a>> {
    match expr.get_inner_expression() {
        Expression::ObjectExpression(obj) => Some(&**obj),
        Expression::CallExpression(call) => call
            .arguments
            .first()
            .and_then(|arg| arg.as_expression())
            .and_then(options_object),
        _ => None,
    }
}

fn object_keys(obj: &ObjectExpression, out: &mut Vec<String>) {
    for prop in &obj.properties {
        if let ObjectPropertyKind::ObjectProperty(p) = prop {
            if let Some(name) = p.key.static_name() {
                if !out.iter().any(|n| n.as_str() == name.as_ref()) {
                    out.push(name.to_string());
                }
            }
        }
    }
}

/// The object literal a `data()` / `setup()` style function returns.
fn returned_object<'b, 'a>(expr: &'b Expression<'a>) -> Option<&'b ObjectExpression<'a>> {
    let body = match expr.get_inner_expression() {
        Expression::FunctionExpression(func) => func.body.as_ref()?,
        Expression::ArrowFunctionExpression(arrow) => {
            if arrow.expression {
                if let Some(Statement::ExpressionStatement(es)) = arrow.body.statements.first() {
                    if let Expression::ObjectExpression(obj) = es.expression.get_inner_expression() {
                        return Some(&**obj);
                    }
                }
                return None;
            }
            &arrow.body
        }
        _ => return None,
    };
    body.statements.iter().rev().find_map(|statement| match statement {
        Statement::ReturnStatement(ret) => match ret.argument.as_ref()?.get_inner_expression() {
            Expression::ObjectExpression(obj) => Some(&**obj),
            _ => None,
        },
        _ => None,
    })
}

fn read_option_fields(obj: &ObjectExpression, fields: &mut ComponentOptionFields) {
    for prop in &obj.properties {
        let ObjectPropertyKind::ObjectProperty(p) = prop else {
            continue;
        };
        let Some(key) = p.key.static_name() else {
            continue;
        };
        let value = p.value.get_inner_expression();
        match (key.as_ref(), value) {
            ("inheritAttrs", Expression::BooleanLiteral(b)) => fields.inherit_attrs = Some(b.value),
            ("components", Expression::ObjectExpression(o)) => object_keys(o, &mut fields.components),
            ("props", Expression::ArrayExpression(arr)) => {
                for element in &arr.elements {
                    if let Some(Expression::StringLiteral(s)) = element.as_expression() {
                        fields.members.push(s.value.to_string());
                    }
                }
            }
            ("props" | "computed" | "methods" | "inject", Expression::ObjectExpression(o)) => {
                object_keys(o, &mut fields.members)
            }
            ("data" | "setup", _) => {
                if let Some(o) = returned_object(value) {
                    object_keys(o, &mut fields.members);
                }
            }
            _ => {}
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// <script setup>
// ═══════════════════════════════════════════════════════════════════════════════

pub fn collect_script_setup(
    content: &str,
    lang: &str,
    file: &str,
    macros: &MacroNames,
) -> Result<ScriptSetupRanges, CompilerError> {
    let allocator = Allocator::default();
    let program = parse_program(&allocator, content, lang, file, "scriptSetup")?;

    let mut collector = MacroCollector {
        macros,
        ranges: ScriptSetupRanges::default(),
    };
    top_level(
        &program,
        &mut collector.ranges.bindings,
        &mut collector.ranges.imports,
    );

    for statement in &program.body {
        match statement {
            Statement::ExpressionStatement(es) => {
                collector.expression(&es.expression, None, es.span.start, true)
            }
            Statement::VariableDeclaration(var) => {
                for declarator in &var.declarations {
                    if let Some(init) = &declarator.init {
                        collector.expression(init, Some(&declarator.id), var.span.start, false);
                    }
                }
            }
            Statement::ExportNamedDeclaration(export) => {
                let end = match &export.declaration {
                    Some(decl) => decl.span().start,
                    None => export.span.end,
                };
                collector.ranges.exports.push(TextRange::new(export.span.start, end));
            }
            _ => {}
        }
    }

    if collector.ranges.prop_names.is_empty() {
        let reference = collector
            .ranges
            .props
            .as_ref()
            .and_then(|p| p.type_arg)
            .and_then(|r| r.slice(content))
            .map(str::trim);
        if let Some(name) = reference {
            collector.ranges.prop_names = local_type_members(&program, name);
        }
    }

    let mut refs = TemplateRefCollector {
        names: &macros.template_ref,
        targets: HashMap::new(),
        calls: Vec::new(),
        warnings: Vec::new(),
    };
    refs.visit_program(&program);
    collector.ranges.template_refs = refs.calls;
    collector.ranges.warnings.extend(refs.warnings);

    let ranges = collector.ranges;
    tracing::debug!(
        bindings = ranges.bindings.len(),
        has_props = ranges.props.is_some(),
        models = ranges.models.len(),
        template_refs = ranges.template_refs.len(),
        "collected script setup ranges"
    );
    Ok(ranges)
}

struct MacroCollector<'m> {
    macros: &'m MacroNames,
    ranges: ScriptSetupRanges,
}

impl MacroCollector<'_> {
    fn warn(&mut self, message: String) {
        self.ranges.warnings.push(CompilerWarning::new(W_MACRO_SHAPE, message));
    }

    fn expression(
        &mut self,
        expr: &Expression,
        target: Option<&BindingPattern>,
        statement_start: u32,
        is_statement: bool,
    ) {
        let Expression::CallExpression(call) = expr.get_inner_expression() else {
            return;
        };
        let Expression::Identifier(callee) = &call.callee else {
            return;
        };
        let callee = callee.name.as_str();
        let assigned_to = match target {
            Some(BindingPattern::BindingIdentifier(id)) => Some(id.name.to_string()),
            _ => None,
        };
        let base = |call: &CallExpression, callee: &str| MacroCall {
            callee: callee.to_string(),
            call: call.span.into(),
            statement_start,
            is_statement,
            type_arg: call
                .type_arguments
                .as_ref()
                .map(|t| TextRange::new(t.span.start + 1, t.span.end - 1)),
            runtime_arg: call.arguments.first().map(|a| a.span().into()),
            defaults: Vec::new(),
            assigned_to: assigned_to.clone(),
        };
        let macros = self.macros;

        if MacroNames::is(&macros.with_defaults, callee) {
            let inner = call
                .arguments
                .first()
                .and_then(|a| a.as_expression())
                .map(|e| e.get_inner_expression());
            match inner {
                Some(Expression::CallExpression(inner_call))
                    if matches!(&inner_call.callee, Expression::Identifier(id)
                        if MacroNames::is(&macros.define_props, id.name.as_str())) =>
                {
                    let inner_name = match &inner_call.callee {
                        Expression::Identifier(id) => id.name.as_str(),
                        _ => "defineProps",
                    };
                    let mut props = base(inner_call, inner_name);
                    props.call = call.span.into();
                    let defaults = call
                        .arguments
                        .get(1)
                        .and_then(|a| a.as_expression())
                        .map(|e| e.get_inner_expression());
                    if let Some(Expression::ObjectExpression(obj)) = defaults {
                        object_keys(obj, &mut props.defaults);
                    }
                    self.set_props(props, declared_prop_names(inner_call), target);
                }
                _ => self.warn(format!("{}() must wrap a defineProps() call", callee)),
            }
        } else if MacroNames::is(&macros.define_props, callee) {
            self.set_props(base(call, callee), declared_prop_names(call), target);
        } else if MacroNames::is(&macros.define_emits, callee) {
            let emits = base(call, callee);
            self.set_once(emits, |r| &mut r.emits);
        } else if MacroNames::is(&macros.define_slots, callee) {
            let slots = base(call, callee);
            self.set_once(slots, |r| &mut r.slots);
        } else if MacroNames::is(&macros.define_expose, callee) {
            let expose = base(call, callee);
            self.set_once(expose, |r| &mut r.expose);
        } else if MacroNames::is(&macros.define_options, callee) {
            if let Some(obj) = call
                .arguments
                .first()
                .and_then(|a| a.as_expression())
                .and_then(options_object)
            {
                read_option_fields(obj, &mut self.ranges.options);
            }
        } else if MacroNames::is(&macros.define_model, callee) {
            let mut model = base(call, callee);
            let name = match call.arguments.first().and_then(|a| a.as_expression()) {
                Some(Expression::StringLiteral(s)) => {
                    model.runtime_arg = call.arguments.get(1).map(|a| a.span().into());
                    s.value.to_string()
                }
                Some(Expression::ObjectExpression(_)) | None => "modelValue".to_string(),
                Some(_) => {
                    self.warn(format!("{}() name must be a string literal", callee));
                    return;
                }
            };
            if self.ranges.models.iter().any(|m| m.name == name) {
                self.warn(format!("Duplicate {}('{}') call ignored", callee, name));
                return;
            }
            self.ranges.models.push(ModelCall { name, call: model });
        }
    }

    fn set_once(
        &mut self,
        call: MacroCall,
        slot: impl FnOnce(&mut ScriptSetupRanges) -> &mut Option<MacroCall>,
    ) {
        let callee = call.callee.clone();
        let slot = slot(&mut self.ranges);
        if slot.is_some() {
            self.warn(format!("Duplicate {}() call ignored", callee));
        } else {
            *slot = Some(call);
        }
    }

    fn set_props(&mut self, props: MacroCall, names: Vec<String>, target: Option<&BindingPattern>) {
        if props.type_arg.is_some() && props.runtime_arg.is_some() {
            self.warn(format!(
                "{}() takes a type argument or a runtime argument, not both; using the type argument",
                props.callee
            ));
        }
        if let Some(BindingPattern::ObjectPattern(pattern)) = target {
            let mut destructure = PropsDestructure::default();
            for property in &pattern.properties {
                for id in property.value.get_binding_identifiers() {
                    destructure.names.push(id.name.to_string());
                }
            }
            if let Some(rest) = &pattern.rest {
                if let BindingPattern::BindingIdentifier(id) = &rest.argument {
                    destructure.rest = Some(id.name.to_string());
                }
            }
            if self.ranges.props.is_none() {
                self.ranges.props_destructure = Some(destructure);
            }
        }
        if self.ranges.props.is_none() {
            self.ranges.prop_names = names;
        }
        self.set_once(props, |r| &mut r.props);
    }
}

fn declared_prop_names(call: &CallExpression) -> Vec<String> {
    let mut names = Vec::new();
    if let Some(type_args) = &call.type_arguments {
        if let Some(TSType::TSTypeLiteral(literal)) = type_args.params.first() {
            signature_names(&literal.members, &mut names);
        }
        return names;
    }
    let runtime = call
        .arguments
        .first()
        .and_then(|a| a.as_expression())
        .map(|e| e.get_inner_expression());
    match runtime {
        Some(Expression::ArrayExpression(arr)) => {
            for element in &arr.elements {
                if let Some(Expression::StringLiteral(s)) = element.as_expression() {
                    names.push(s.value.to_string());
                }
            }
        }
        Some(Expression::ObjectExpression(obj)) => object_keys(obj, &mut names),
        _ => {}
    }
    names
}

fn signature_names(signatures: &[TSSignature], names: &mut Vec<String>) {
    for member in signatures {
        let key = match member {
            TSSignature::TSPropertySignature(sig) => &sig.key,
            TSSignature::TSMethodSignature(sig) => &sig.key,
            _ => continue,
        };
        if let Some(name) = key.static_name() {
            names.push(name.to_string());
        }
    }
}

/// Member names of a top-level interface, or object type alias, called `name`.
fn local_type_members(program: &Program, name: &str) -> Vec<String> {
    let mut names = Vec::new();
    for statement in &program.body {
        let decl = match statement {
            Statement::ExportNamedDeclaration(export) => export.declaration.as_ref(),
            other => other.as_declaration(),
        };
        match decl {
            Some(Declaration::TSInterfaceDeclaration(interface)) if interface.id.name.as_str() == name => {
                signature_names(&interface.body.body, &mut names)
            }
            Some(Declaration::TSTypeAliasDeclaration(alias)) if alias.id.name.as_str() == name => {
                if let TSType::TSTypeLiteral(literal) = &alias.type_annotation {
                    signature_names(&literal.members, &mut names);
                }
            }
            _ => {}
        }
    }
    names
}

struct TemplateRefCollector<'m> {
    names: &'m [String],
    /// Call start offset to the variable it initialises.
    targets: HashMap<u32, String>,
    calls: Vec<TemplateRefCall>,
    warnings: Vec<CompilerWarning>,
}

impl<'a> Visit<'a> for TemplateRefCollector<'_> {
    fn visit_variable_declarator(&mut self, declarator: &VariableDeclarator<'a>) {
        if let (BindingPattern::BindingIdentifier(id), Some(init)) = (&declarator.id, &declarator.init) {
            if let Expression::CallExpression(call) = init.get_inner_expression() {
                self.targets.insert(call.span.start, id.name.to_string());
            }
        }
        oxc_ast_visit::walk::walk_variable_declarator(self, declarator);
    }

    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if let Expression::Identifier(callee) = &call.callee {
            if MacroNames::is(self.names, callee.name.as_str()) {
                let name = match call.arguments.first().and_then(|a| a.as_expression()) {
                    Some(Expression::StringLiteral(s)) => Some(s.value.to_string()),
                    _ => {
                        self.warnings.push(CompilerWarning::new(
                            W_MACRO_SHAPE,
                            format!("{}() without a string literal name is left as written", callee.name),
                        ));
                        None
                    }
                };
                self.calls.push(TemplateRefCall {
                    call: call.span.into(),
                    name,
                    has_type_args: call.type_arguments.is_some(),
                    assigned_to: self.targets.get(&call.span.start).cloned(),
                });
            }
        }
        oxc_ast_visit::walk::walk_call_expression(self, call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(code: &str) -> ScriptSetupRanges {
        collect_script_setup(code, "ts", "Comp.vue", &MacroNames::default()).unwrap()
    }

    fn slice(code: &str, range: TextRange) -> &str {
        range.slice(code).unwrap()
    }

    #[test]
    fn test_top_level_bindings_and_kinds() {
        let code = r#"
import { ref, type Ref } from 'vue'
import type { Item } from './types'
import Child from './Child.vue'
const count = ref(0), { a, b: [c] } = useThing()
function inc() {}
class Store {}
enum Color { Red }
type Alias = string
interface Shape {}
export const exported = 1
"#;
        let ranges = setup(code);
        let values: Vec<&str> = ranges.value_names().collect();
        assert_eq!(
            values,
            vec!["ref", "Child", "count", "a", "c", "inc", "Store", "Color", "exported"]
        );
        let types: Vec<&str> = ranges
            .bindings
            .iter()
            .filter(|b| b.kind == BindingKind::Type)
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(types, vec!["Ref", "Item", "Alias", "Shape"]);
        assert_eq!(ranges.imports.len(), 3);
        assert!(slice(code, ranges.imports[2]).starts_with("import Child"));
    }

    #[test]
    fn test_define_props_type_argument_and_assignment() {
        let code = "const props = defineProps<{ msg: string }>()\n";
        let ranges = setup(code);
        let props = ranges.props.unwrap();
        assert_eq!(slice(code, props.type_arg.unwrap()), "{ msg: string }");
        assert_eq!(props.runtime_arg, None);
        assert_eq!(props.assigned_to.as_deref(), Some("props"));
        assert_eq!(slice(code, props.call), "defineProps<{ msg: string }>()");
        assert_eq!(ranges.prop_names, vec!["msg"]);
    }

    #[test]
    fn test_with_defaults_wraps_the_props_call() {
        let code = "withDefaults(defineProps<Props>(), { size: 1 })";
        let ranges = setup(code);
        let props = ranges.props.unwrap();
        assert!(props.is_statement);
        assert_eq!(props.callee, "defineProps");
        assert_eq!(slice(code, props.call), code);
        assert_eq!(slice(code, props.type_arg.unwrap()), "Props");
        assert_eq!(props.defaults, vec!["size"]);
    }

    #[test]
    fn test_destructured_props_with_rest() {
        let code = "const { title, count: n = 0, ...others } = defineProps(['title', 'count'])";
        let ranges = setup(code);
        let destructure = ranges.props_destructure.unwrap();
        assert_eq!(destructure.names, vec!["title", "n"]);
        assert_eq!(destructure.rest.as_deref(), Some("others"));
        let props = ranges.props.unwrap();
        assert!(!props.is_statement);
        assert_eq!(props.assigned_to, None);
        assert_eq!(slice(code, props.runtime_arg.unwrap()), "['title', 'count']");
        assert_eq!(ranges.prop_names, vec!["title", "count"]);
    }

    #[test]
    fn test_models_emits_and_duplicates() {
        let code = r#"
const emit = defineEmits<{ change: [id: number] }>()
defineEmits(['other'])
const model = defineModel<string>()
const checked = defineModel<boolean>('checked', { required: true })
defineSlots<{ default(): any }>()
defineExpose({ model })
"#;
        let ranges = setup(code);
        assert_eq!(ranges.emits.as_ref().unwrap().assigned_to.as_deref(), Some("emit"));
        assert_eq!(ranges.warnings.len(), 1);
        assert_eq!(ranges.warnings[0].code, W_MACRO_SHAPE);
        let names: Vec<&str> = ranges.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["modelValue", "checked"]);
        assert_eq!(slice(code, ranges.models[1].call.type_arg.unwrap()), "boolean");
        assert!(ranges.slots.is_some());
        assert!(ranges.expose.unwrap().is_statement);
    }

    #[test]
    fn test_template_ref_calls_anywhere_in_the_block() {
        let code = r#"
const root = useTemplateRef('rootRef')
const typed = useTemplateRef<HTMLInputElement>('input')
function later() { return useTemplateRef(dynamicName) }
"#;
        let ranges = setup(code);
        let refs = &ranges.template_refs;
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0].name.as_deref(), Some("rootRef"));
        assert_eq!(refs[0].assigned_to.as_deref(), Some("root"));
        assert!(!refs[0].has_type_args);
        assert!(refs[1].has_type_args);
        assert_eq!(refs[2].name, None);
        assert_eq!(ranges.warnings.len(), 1);
    }

    #[test]
    fn test_define_options_fields() {
        let ranges = setup("defineOptions({ name: 'Fancy', inheritAttrs: false, components: { Icon } })");
        assert_eq!(ranges.options.inherit_attrs, Some(false));
        assert_eq!(ranges.options.components, vec!["Icon"]);
    }

    #[test]
    fn test_script_export_default_options() {
        let code = r#"
import Child from './Child.vue'
export default defineComponent({
  name: 'Legacy',
  components: { Child, 'other-thing': Other },
  props: ['title'],
  data() { return { count: 0 } },
  computed: { doubled() { return this.count * 2 } },
  methods: { inc() {} },
})
"#;
        let ranges = collect_script(code, "ts", "Legacy.vue").unwrap();
        assert_eq!(slice(code, ranges.export_default.unwrap()), "export default ");
        assert!(ranges.has_default_export);
        assert_eq!(ranges.options.components, vec!["Child", "other-thing"]);
        assert_eq!(ranges.options.members, vec!["title", "count", "doubled", "inc"]);
    }

    #[test]
    fn test_exports_in_setup_are_recorded() {
        let code = "export interface Props { msg: string }\nexport type { Other }\nconst a = 1\n";
        let ranges = setup(code);
        assert_eq!(ranges.exports.len(), 2);
        assert_eq!(slice(code, ranges.exports[0]), "export ");
        assert_eq!(slice(code, ranges.exports[1]), "export type { Other }");
        let types: Vec<&str> = ranges
            .bindings
            .iter()
            .filter(|b| b.kind == BindingKind::Type)
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(types, vec!["Props"]);
    }

    #[test]
    fn test_prop_names_from_a_local_interface() {
        let ranges = setup("export interface Props { msg: string; onPick(): void }\ndefineProps<Props>()\n");
        assert_eq!(ranges.prop_names, vec!["msg", "onPick"]);
        let ranges = setup("type Props = { size?: number }\nwithDefaults(defineProps<Props>(), { size: 2 })\n");
        assert_eq!(ranges.prop_names, vec!["size"]);
        assert!(setup("defineProps<Missing>()").prop_names.is_empty());
    }

    #[test]
    fn test_parse_error_is_fatal() {
        let err = collect_script_setup("const = 1", "ts", "Bad.vue", &MacroNames::default()).unwrap_err();
        assert_eq!(err.code, crate::error::E_PARSE);
        assert_eq!(err.block.as_deref(), Some("scriptSetup"));
        assert_eq!(err.line, 1);
    }
}
