//! Template code generation.
//!
//! Walks the template AST in document order and emits type-checkable code:
//! every element becomes a call checked against its props type, every
//! expression is copied verbatim (with the context prefix inserted) and
//! mapped back to the template, and loops, conditionals and slots become
//! real `for` / `if` / block scopes so narrowing and scoping carry over.

use crate::builder::{splice, BlockKind, CodeBuilder};
use crate::classify::{classify, ClassifiedExpression, CTX_PREFIX};
use crate::error::{CompilerError, CompilerWarning, E_IR, W_CLASSIFY_AMBIGUOUS};
use crate::ir::{DirectiveProp, ElementNode, ElementType, InterpolationNode, PropNode, TemplateNode, TextRange};
use crate::scope::{camelize, capitalize, is_instance_property, Resolution, ScopeResolver};
use crate::syntax::{
    bound_names, is_callable_reference, parse_expression, parse_pattern, parse_statements, SyntaxError,
};
use crate::visitor::TemplateVisitor;
use lazy_static::lazy_static;
use oxc_syntax::identifier::is_identifier_name;
use regex::Regex;

lazy_static! {
    static ref FOR_ALIAS_RE: Regex = Regex::new(r"(?s)^\s*(.*?)\s+(?:in|of)\s+(.*?)\s*$").unwrap();
}

const BUILTIN_DIRECTIVES: &[&str] = &["show", "html", "text", "memo", "once", "cloak", "pre", "is"];
const STRUCTURAL_DIRECTIVES: &[&str] = &["bind", "on", "model", "if", "else-if", "else", "for", "slot"];

/// Declarations the generated template code relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Helper {
    Intrinsics,
    Elements,
    AsComponent,
    Instance,
    Components,
    VFor,
    SlotProps,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRef {
    pub name: String,
    pub type_text: String,
}

/// A `<slot>` outlet and the variable holding its props.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotOutlet {
    pub name: String,
    pub var: String,
}

#[derive(Debug, Default)]
pub struct TemplateCodegen {
    pub code: CodeBuilder,
    pub accessed: Vec<String>,
    pub dollar: Vec<String>,
    pub helpers: Vec<Helper>,
    pub template_refs: Vec<TemplateRef>,
    pub slots: Vec<SlotOutlet>,
    pub component_tags: Vec<String>,
    /// Props type of the single root element, the target of attribute fallthrough.
    pub root_attrs: Option<String>,
    pub warnings: Vec<CompilerWarning>,
}

pub fn generate_template(
    text: &str,
    children: &[TemplateNode],
    scope: &mut ScopeResolver,
    file: &str,
) -> Result<TemplateCodegen, CompilerError> {
    let mut generator = Generator {
        text,
        file,
        scope,
        out: TemplateCodegen::default(),
        counter: 0,
        slot_owners: Vec::new(),
        loop_depth: 0,
        root: single_root(text, children),
    };
    generator.visit_children(children)?;

    let mut out = generator.out;
    out.helpers.sort_unstable();
    tracing::debug!(
        accessed = out.accessed.len(),
        refs = out.template_refs.len(),
        slots = out.slots.len(),
        "generated template code"
    );
    Ok(out)
}

struct Generator<'t, 's> {
    text: &'t str,
    file: &'t str,
    scope: &'s mut ScopeResolver,
    out: TemplateCodegen,
    counter: usize,
    /// Variables of the components whose direct children are being generated.
    slot_owners: Vec<String>,
    loop_depth: usize,
    root: Option<TextRange>,
}

impl TemplateVisitor for Generator<'_, '_> {
    type Error = CompilerError;

    fn visit_children(&mut self, children: &[TemplateNode]) -> Result<(), CompilerError> {
        let mut i = 0;
        while i < children.len() {
            if let TemplateNode::Element(el) = &children[i] {
                if el.directive("if").is_some() {
                    i = self.conditional_chain(children, i)?;
                    continue;
                }
            }
            self.visit_node(&children[i])?;
            i += 1;
        }
        Ok(())
    }

    fn visit_element(&mut self, element: &ElementNode) -> Result<(), CompilerError> {
        self.element(element)
    }

    fn visit_interpolation(&mut self, node: &InterpolationNode) -> Result<(), CompilerError> {
        self.push("(");
        self.expression(node.content)?;
        self.push(");\n");
        Ok(())
    }
}

impl<'t> Generator<'t, '_> {
    // ═══════════════════════════════════════════════════════════════════════════
    // PRIMITIVES
    // ═══════════════════════════════════════════════════════════════════════════

    fn push(&mut self, text: &str) {
        self.out.code.push_str(text);
    }

    fn next_id(&mut self) -> usize {
        let id = self.counter;
        self.counter += 1;
        id
    }

    fn helper(&mut self, helper: Helper) {
        if !self.out.helpers.contains(&helper) {
            self.out.helpers.push(helper);
        }
    }

    fn access(&mut self, name: &str) {
        if !self.out.accessed.iter().any(|n| n == name) {
            self.out.accessed.push(name.to_string());
        }
        if is_instance_property(name) && !self.out.dollar.iter().any(|n| n == name) {
            self.out.dollar.push(name.to_string());
        }
    }

    fn slice(&self, range: TextRange) -> Result<&'t str, CompilerError> {
        range.slice(self.text).ok_or_else(|| {
            CompilerError::new(
                E_IR,
                &format!("Template range {}..{} is outside the template", range.start, range.end),
                self.file,
                1,
                1,
            )
            .in_block("template")
        })
    }

    fn syntax_error(&self, err: SyntaxError) -> CompilerError {
        CompilerError::parse(self.file, "template", self.text, err.offset, &err.message)
    }

    /// Text copied from the template when it is still there verbatim, generated otherwise.
    fn push_source_or(&mut self, text: &str, at: u32) {
        let end = at as usize + text.len();
        if self.text.get(at as usize..end) == Some(text) {
            self.out.code.push_mapped(text, BlockKind::Template, at);
        } else {
            self.push(text);
        }
    }

    fn emit_classified(&mut self, code: &str, start: u32, classified: ClassifiedExpression) {
        for name in &classified.accessed {
            self.access(name);
        }
        if classified.ambiguous {
            self.out.warnings.push(CompilerWarning::new(
                W_CLASSIFY_AMBIGUOUS,
                format!("Unrecognised syntax in `{}`; identifiers treated as values", code.trim()),
            ));
        }
        self.out
            .code
            .extend(splice(code, start, BlockKind::Template, classified.edits));
    }

    fn expression(&mut self, range: TextRange) -> Result<(), CompilerError> {
        let code = self.slice(range)?;
        let tree = parse_expression(code, range.start).map_err(|e| self.syntax_error(e))?;
        let classified = classify(&tree, &mut *self.scope);
        self.emit_classified(code, range.start, classified);
        Ok(())
    }

    /// Emit a binding pattern and return the names it binds.
    fn pattern(&mut self, range: TextRange) -> Result<Vec<String>, CompilerError> {
        let code = self.slice(range)?;
        let tree = parse_pattern(code, range.start).map_err(|e| self.syntax_error(e))?;
        let names = tree.children.first().map(bound_names).unwrap_or_default();
        let classified = classify(&tree, &mut *self.scope);
        self.emit_classified(code, range.start, classified);
        Ok(names)
    }

    fn is_blank(&self, node: &TemplateNode) -> bool {
        is_blank(self.text, node)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STRUCTURE
    // ═══════════════════════════════════════════════════════════════════════════

    /// `v-if` / `v-else-if` / `v-else` siblings. Returns the index after the chain.
    fn conditional_chain(&mut self, children: &[TemplateNode], start: usize) -> Result<usize, CompilerError> {
        let mut i = start;
        let mut first = true;
        while let Some(TemplateNode::Element(el)) = children.get(i) {
            let condition = if first {
                el.directive("if")
            } else if let Some(d) = el.directive("else-if") {
                Some(d)
            } else if el.directive("else").is_some() {
                None
            } else {
                break;
            };

            match (first, condition) {
                (true, _) => self.push("if ("),
                (false, Some(_)) => self.push(" else if ("),
                (false, None) => self.push(" else "),
            }
            if let Some(d) = condition {
                match d.exp {
                    Some(exp) => self.expression(exp)?,
                    None => self.push("true"),
                }
                self.push(") ");
            }
            self.push("{\n");
            self.element(el)?;
            self.push("}");
            first = false;
            i += 1;

            if condition.is_none() {
                break;
            }
            let mut next = i;
            while children.get(next).is_some_and(|n| self.is_blank(n)) {
                next += 1;
            }
            match children.get(next) {
                Some(TemplateNode::Element(n))
                    if n.directive("else-if").is_some() || n.directive("else").is_some() =>
                {
                    i = next
                }
                _ => break,
            }
        }
        self.push("\n");
        Ok(i)
    }

    fn element(&mut self, el: &ElementNode) -> Result<(), CompilerError> {
        if let Some(d) = el.directive("for") {
            return self.for_loop(el, d);
        }
        self.element_inner(el)
    }

    fn element_inner(&mut self, el: &ElementNode) -> Result<(), CompilerError> {
        match el.tag_type {
            ElementType::Template => self.template_element(el),
            ElementType::Slot => self.slot_outlet(el),
            ElementType::Component => self.component(el),
            ElementType::Element => self.intrinsic(el),
        }
    }

    fn for_loop(&mut self, el: &ElementNode, d: &DirectiveProp) -> Result<(), CompilerError> {
        let Some(exp) = d.exp else {
            return Err(CompilerError::parse(
                self.file,
                "template",
                self.text,
                d.loc.start,
                "v-for requires an expression",
            ));
        };
        let code = self.slice(exp)?;
        let Some(caps) = FOR_ALIAS_RE.captures(code) else {
            return Err(CompilerError::parse(
                self.file,
                "template",
                self.text,
                exp.start,
                "v-for expects `alias in source`",
            ));
        };
        let (Some(alias), Some(source)) = (caps.get(1), caps.get(2)) else {
            return Err(CompilerError::parse(self.file, "template", self.text, exp.start, "Invalid v-for"));
        };
        let alias = strip_parens(alias.as_str(), exp.start + alias.start() as u32);
        let source = TextRange::new(exp.start + source.start() as u32, exp.start + source.end() as u32);

        self.helper(Helper::VFor);
        self.push("for (const [");
        let names = match alias {
            Some(range) => self.pattern(range)?,
            None => Vec::new(),
        };
        self.push("] of __VLS_vFor((");
        self.expression(source)?;
        self.push("))) {\n");

        self.scope.push_frame(names);
        self.loop_depth += 1;
        let result = self.element_inner(el);
        self.loop_depth -= 1;
        self.scope.pop_frame();
        result?;

        self.push("}\n");
        Ok(())
    }

    fn template_element(&mut self, el: &ElementNode) -> Result<(), CompilerError> {
        let owner = self.slot_owners.last().cloned();
        match (el.directive("slot"), owner) {
            (Some(d), Some(owner)) => self.slot_block(&owner, d, &el.children),
            _ => {
                self.directive_statements(el)?;
                self.visit_children(&el.children)
            }
        }
    }

    fn slot_block(&mut self, owner: &str, d: &DirectiveProp, children: &[TemplateNode]) -> Result<(), CompilerError> {
        self.helper(Helper::SlotProps);
        self.push("{\n");
        let names = match d.exp {
            Some(exp) => {
                self.push("const ");
                let names = self.pattern(exp)?;
                self.push(" = __VLS_slotProps(");
                self.push(owner);
                self.push(", ");
                self.slot_name(d)?;
                self.push(");\n");
                names
            }
            None => {
                self.push("__VLS_slotProps(");
                self.push(owner);
                self.push(", ");
                self.slot_name(d)?;
                self.push(");\n");
                Vec::new()
            }
        };
        self.scope.push_frame(names);
        let result = self.visit_children(children);
        self.scope.pop_frame();
        result?;
        self.push("}\n");
        Ok(())
    }

    fn slot_name(&mut self, d: &DirectiveProp) -> Result<(), CompilerError> {
        match &d.arg {
            Some(arg) if arg.is_static => {
                let name = self.slice(arg.loc)?;
                self.push("'");
                self.out.code.push_mapped(name, BlockKind::Template, arg.loc.start);
                self.push("'");
            }
            Some(arg) => {
                self.push("(");
                self.expression(arg.loc)?;
                self.push(")");
            }
            None => self.push("'default'"),
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ELEMENTS
    // ═══════════════════════════════════════════════════════════════════════════

    fn intrinsic(&mut self, el: &ElementNode) -> Result<(), CompilerError> {
        self.helper(Helper::Intrinsics);
        self.push("__VLS_intrinsics['");
        self.push_source_or(&el.tag, el.loc.start + 1);
        self.push("'](");
        self.props_object(el, false, &[])?;
        self.push(");\n");
        self.directive_statements(el)?;
        if self.root == Some(el.loc) {
            self.out.root_attrs = Some(format!("__VLS_IntrinsicElements[{}]", quoted(&el.tag)));
        }

        self.helper(Helper::Elements);
        self.record_ref(el, format!("__VLS_Elements[{}]", quoted(&el.tag)))?;
        self.visit_children(&el.children)
    }

    fn component(&mut self, el: &ElementNode) -> Result<(), CompilerError> {
        let var = format!("__VLS_{}", self.next_id());
        if !self.out.component_tags.contains(&el.tag) {
            self.out.component_tags.push(el.tag.clone());
        }
        self.helper(Helper::AsComponent);
        self.push("{\n");
        self.push(&format!("const {} = __VLS_asComponent(", var));

        let dynamic = match el.tag.as_str() {
            "component" | "Component" => el.props.iter().find_map(|p| match p {
                PropNode::Directive(d)
                    if d.name == "bind"
                        && d.arg.as_ref().is_some_and(|a| a.is_static && self.slice(a.loc).ok() == Some("is")) =>
                {
                    d.exp
                }
                _ => None,
            }),
            _ => None,
        };

        let resolver = if let Some(exp) = dynamic {
            self.push("(");
            self.expression(exp)?;
            self.push(")");
            None
        } else if let Some(binding) = self.scope.resolve_component(&el.tag) {
            self.push(CTX_PREFIX);
            if binding == el.tag {
                self.push_source_or(&binding, el.loc.start + 1);
            } else {
                self.push(&binding);
            }
            self.access(&binding);
            Some(format!("{}{}", CTX_PREFIX, binding))
        } else {
            self.helper(Helper::Components);
            let text = format!("__VLS_components[{}]", quoted(&el.tag));
            self.push(&text);
            Some(text)
        };
        self.push(");\n");
        if let (Some(text), true) = (&resolver, self.root == Some(el.loc)) {
            self.out.root_attrs = Some(format!("__VLS_PropsOf<typeof {}>", text));
        }

        self.push(&var);
        self.push("(");
        self.props_object(el, true, &[])?;
        self.push(");\n");
        self.directive_statements(el)?;

        self.helper(Helper::Instance);
        let instance = match resolver {
            Some(text) => format!("__VLS_Instance<typeof {}>", text),
            None => "import('vue').ComponentPublicInstance".to_string(),
        };
        self.record_ref(el, instance)?;

        self.slot_owners.push(var.clone());
        let result = match el.directive("slot") {
            Some(d) => self.slot_block(&var, d, &el.children),
            None => self.visit_children(&el.children),
        };
        self.slot_owners.pop();
        result?;

        self.push("}\n");
        Ok(())
    }

    fn slot_outlet(&mut self, el: &ElementNode) -> Result<(), CompilerError> {
        let var = format!("__VLS_slot_{}", self.next_id());
        let name = match el.attribute("name") {
            Some(attr) => match attr.value {
                Some(v) => Some(self.slice(v)?.to_string()),
                None => Some("default".to_string()),
            },
            None if has_bound(el, "name", self) => None,
            None => Some("default".to_string()),
        };

        self.push(&format!("var {} = ", var));
        self.props_object(el, false, &["name"])?;
        self.push(";\n");
        if let Some(name) = name {
            if !self.out.slots.iter().any(|s| s.name == name) {
                self.out.slots.push(SlotOutlet { name, var });
            }
        }
        self.visit_children(&el.children)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PROPS & DIRECTIVES
    // ═══════════════════════════════════════════════════════════════════════════

    fn prop_key(&mut self, name: &str, at: u32, camel: bool) {
        let key = if camel && !name.starts_with("data-") && !name.starts_with("aria-") {
            camelize(name)
        } else {
            name.to_string()
        };
        self.push("'");
        self.push_source_or(&key, at);
        self.push("'");
    }

    fn props_object(&mut self, el: &ElementNode, is_component: bool, skip: &[&str]) -> Result<(), CompilerError> {
        let dynamic_component = matches!(el.tag.as_str(), "component" | "Component");
        self.push("{ ");
        for prop in &el.props {
            match prop {
                PropNode::Attribute(attr) => {
                    if attr.name == "ref" || skip.contains(&attr.name.as_str()) {
                        continue;
                    }
                    self.prop_key(&attr.name, attr.loc.start, is_component);
                    self.push(": ");
                    match attr.value {
                        Some(v) => {
                            let value = self.slice(v)?;
                            self.push(&quoted(value));
                        }
                        None => self.push("true"),
                    }
                }
                PropNode::Directive(d) => match d.name.as_str() {
                    "bind" => match &d.arg {
                        None => {
                            self.push("...(");
                            match d.exp {
                                Some(exp) => self.expression(exp)?,
                                None => self.push("{}"),
                            }
                            self.push(")");
                        }
                        Some(arg) if arg.is_static => {
                            let name = self.slice(arg.loc)?;
                            if skip.contains(&name) || (dynamic_component && name == "is") {
                                continue;
                            }
                            let camel = is_component || d.modifiers.iter().any(|m| m == "camel");
                            self.prop_key(name, arg.loc.start, camel);
                            self.push(": (");
                            match d.exp {
                                Some(exp) => self.expression(exp)?,
                                None => self.same_name_value(name, arg.loc)?,
                            }
                            self.push(")");
                        }
                        Some(arg) => {
                            self.push("[");
                            self.expression(arg.loc)?;
                            self.push("]: (");
                            match d.exp {
                                Some(exp) => self.expression(exp)?,
                                None => self.push("undefined"),
                            }
                            self.push(")");
                        }
                    },
                    "on" => {
                        match &d.arg {
                            None => {
                                self.push("...(");
                                match d.exp {
                                    Some(exp) => self.expression(exp)?,
                                    None => self.push("{}"),
                                }
                                self.push(")");
                                self.push(", ");
                                continue;
                            }
                            Some(arg) if arg.is_static => {
                                let event = self.slice(arg.loc)?;
                                self.push(&format!("'on{}'", capitalize(&camelize(event))));
                            }
                            Some(arg) => {
                                self.push("['on' + (");
                                self.expression(arg.loc)?;
                                self.push(")]");
                            }
                        }
                        self.push(": ");
                        self.handler(d)?;
                    }
                    "model" => {
                        match &d.arg {
                            Some(arg) if arg.is_static => {
                                let name = self.slice(arg.loc)?;
                                self.prop_key(name, arg.loc.start, true);
                            }
                            Some(arg) => {
                                self.push("[");
                                self.expression(arg.loc)?;
                                self.push("]");
                            }
                            None if is_component => self.push("'modelValue'"),
                            None => self.push("'value'"),
                        }
                        self.push(": (");
                        match d.exp {
                            Some(exp) => self.expression(exp)?,
                            None => self.push("undefined"),
                        }
                        self.push(")");
                    }
                    _ => continue,
                },
            }
            self.push(", ");
        }
        self.push("}");
        Ok(())
    }

    /// `:foo` with no value means `:foo="foo"`.
    fn same_name_value(&mut self, name: &str, at: TextRange) -> Result<(), CompilerError> {
        let camel = camelize(name);
        if !is_identifier_name(&camel) {
            return Err(CompilerError::parse(
                self.file,
                "template",
                self.text,
                at.start,
                &format!("`:{}` without a value needs an identifier-like name", name),
            ));
        }
        if camel == name {
            return self.expression(at);
        }
        if self.scope.resolve(&camel) == Resolution::Setup {
            self.push(CTX_PREFIX);
            self.access(&camel);
        }
        self.push(&camel);
        Ok(())
    }

    fn handler(&mut self, d: &DirectiveProp) -> Result<(), CompilerError> {
        let Some(exp) = d.exp else {
            self.push("() => {}");
            return Ok(());
        };
        let code = self.slice(exp)?;
        if is_callable_reference(code) {
            self.push("(");
            self.expression(exp)?;
            self.push(")");
            return Ok(());
        }

        self.push("(...[$event]) => {\n");
        self.scope.push_frame(["$event"]);
        let result = match parse_statements(code, exp.start) {
            Ok(tree) => {
                let classified = classify(&tree, &mut *self.scope);
                self.emit_classified(code, exp.start, classified);
                Ok(())
            }
            Err(e) => Err(self.syntax_error(e)),
        };
        self.scope.pop_frame();
        result?;
        self.push("\n}");
        Ok(())
    }

    /// Directives that do not become props: `v-show`, `v-html`, custom directives.
    fn directive_statements(&mut self, el: &ElementNode) -> Result<(), CompilerError> {
        for prop in &el.props {
            let PropNode::Directive(d) = prop else {
                continue;
            };
            if STRUCTURAL_DIRECTIVES.contains(&d.name.as_str()) {
                continue;
            }
            if !BUILTIN_DIRECTIVES.contains(&d.name.as_str()) {
                let binding = format!("v{}", capitalize(&camelize(&d.name)));
                if self.scope.resolve(&binding) == Resolution::Setup {
                    self.push(CTX_PREFIX);
                    self.push(&binding);
                    self.push(";\n");
                    self.access(&binding);
                }
            }
            if let Some(exp) = d.exp {
                self.push("(");
                self.expression(exp)?;
                self.push(");\n");
            }
        }
        Ok(())
    }

    fn record_ref(&mut self, el: &ElementNode, type_text: String) -> Result<(), CompilerError> {
        let Some(value) = el.attribute("ref").and_then(|a| a.value) else {
            return Ok(());
        };
        let name = self.slice(value)?.to_string();
        if self.out.template_refs.iter().any(|r| r.name == name) {
            return Ok(());
        }
        let type_text = if self.loop_depth > 0 {
            format!("({})[]", type_text)
        } else {
            type_text
        };
        self.out.template_refs.push(TemplateRef { name, type_text });
        Ok(())
    }
}

fn is_blank(text: &str, node: &TemplateNode) -> bool {
    match node {
        TemplateNode::Comment(_) => true,
        TemplateNode::Text(t) => t.loc.slice(text).is_some_and(|t| t.trim().is_empty()),
        _ => false,
    }
}

/// The element a component's fallthrough attributes land on: the only
/// non-blank top-level node, when it is a plain element or component.
fn single_root(text: &str, children: &[TemplateNode]) -> Option<TextRange> {
    let mut nodes = children.iter().filter(|n| !is_blank(text, n));
    match (nodes.next(), nodes.next()) {
        (Some(TemplateNode::Element(el)), None)
            if matches!(el.tag_type, ElementType::Element | ElementType::Component)
                && el.directive("for").is_none() =>
        {
            Some(el.loc)
        }
        _ => None,
    }
}

fn has_bound(el: &ElementNode, name: &str, generator: &Generator<'_, '_>) -> bool {
    el.props.iter().any(|p| match p {
        PropNode::Directive(d) if d.name == "bind" => d
            .arg
            .as_ref()
            .is_some_and(|a| a.is_static && generator.slice(a.loc).ok() == Some(name)),
        _ => false,
    })
}

/// `(a, b)` → range of `a, b`; `a` → range of `a`. `None` for an empty alias.
fn strip_parens(alias: &str, start: u32) -> Option<TextRange> {
    let lead = alias.len() - alias.trim_start().len();
    let trimmed = alias.trim();
    let (offset, inner) = match trimmed.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (lead + 1, inner),
        None => (lead, trimmed),
    };
    let inner_lead = inner.len() - inner.trim_start().len();
    let inner = inner.trim();
    if inner.is_empty() {
        return None;
    }
    let begin = start + (offset + inner_lead) as u32;
    Some(TextRange::new(begin, begin + inner.len() as u32))
}

pub fn quoted(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_default()
}

impl Helper {
    /// Declaration text. `Components` depends on options and is emitted by the merger.
    pub fn declaration(&self) -> Option<&'static str> {
        match self {
            Helper::Intrinsics => Some(
                "type __VLS_IntrinsicElements = import('vue/jsx-runtime').JSX.IntrinsicElements;\n\
                 declare const __VLS_intrinsics: { [K in keyof __VLS_IntrinsicElements]: (props: __VLS_IntrinsicElements[K]) => void };\n",
            ),
            Helper::Elements => Some(
                "type __VLS_Elements = HTMLElementTagNameMap & Omit<SVGElementTagNameMap, keyof HTMLElementTagNameMap>;\n",
            ),
            Helper::AsComponent => Some(
                "type __VLS_PropsOf<T> = T extends new (...args: any) => { $props: infer P } ? P : T extends (props: infer P, ...args: any) => any ? P : {};\n\
                 type __VLS_SlotsOf<T> = T extends new (...args: any) => { $slots: infer S } ? S : T extends (props: any, ctx: { slots: infer S }, ...args: any) => any ? S : {};\n\
                 declare function __VLS_asComponent<T>(component: T): ((props: __VLS_PropsOf<T> & Record<string, unknown>) => void) & { readonly __VLS_slots: __VLS_SlotsOf<T> };\n",
            ),
            Helper::Instance => Some(
                "type __VLS_Instance<T> = T extends new (...args: any) => infer I ? I : import('vue').ComponentPublicInstance;\n",
            ),
            Helper::VFor => Some(
                "declare function __VLS_vFor<T>(source: T): T extends number ? [number, number, number][] : T extends string ? [string, number, number][] : T extends readonly (infer V)[] ? [V, number, number][] : T extends Iterable<infer V> ? [V, number, number][] : [T[keyof T], keyof T, number][];\n",
            ),
            Helper::SlotProps => Some(
                "declare function __VLS_slotProps<S, K extends PropertyKey>(component: { readonly __VLS_slots: S }, name: K): K extends keyof S ? NonNullable<S[K]> extends (props: infer P, ...args: any) => any ? P : any : any;\n",
            ),
            Helper::Components => None,
        }
    }
}
