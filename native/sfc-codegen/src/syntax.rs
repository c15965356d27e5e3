//! Minimal syntax-tree capability the classifier runs on.
//!
//! The classifier only needs to know, for each node, its coarse kind, its
//! children, its span and (for identifiers) its name. [`SyntaxElement`] is an
//! owned tree lowered from the oxc AST; tests can build trees by hand.

use crate::ir::TextRange;
use oxc_allocator::Allocator;
use oxc_ast::ast::{Expression, PropertyKey};
use oxc_ast::{AstKind, AstType};
use oxc_ast_visit::Visit;
use oxc_diagnostics::OxcDiagnostic;
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentRole {
    /// Read of a variable (`foo` in `foo + 1`, `Foo` in `x as Foo`).
    Reference,
    /// Non-binding property name (`bar` in `foo.bar` or `{ bar: 1 }`).
    Name,
    /// Declaration of a name (parameters, pattern targets).
    Binding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    Identifier(IdentRole),
    PropertyKey,
    ComputedKey,
    ObjectProperty { shorthand: bool },
    TypeArguments,
    TypeQuery,
    TypeOperator,
    TypeLiteral,
    MethodSignature,
    PropertySignature,
    IndexSignature,
    /// Any other type-level node: annotations, references, unions, keywords.
    TypeNode,
    /// Introduces names visible only in its subtree (functions, statement lists).
    Scope,
    Other,
    /// Produced by a degraded parse; transparent to classification.
    Unknown,
}

pub trait SyntaxNode: Sized {
    fn kind(&self) -> SyntaxKind;
    fn span(&self) -> TextRange;
    fn name(&self) -> Option<&str>;
    fn children(&self) -> &[Self];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxElement {
    pub kind: SyntaxKind,
    pub span: TextRange,
    pub name: Option<String>,
    pub children: Vec<SyntaxElement>,
}

impl SyntaxElement {
    pub fn new(kind: SyntaxKind, span: TextRange) -> Self {
        Self {
            kind,
            span,
            name: None,
            children: Vec::new(),
        }
    }

    pub fn ident(role: IdentRole, name: &str, start: u32) -> Self {
        Self {
            kind: SyntaxKind::Identifier(role),
            span: TextRange::new(start, start + name.len() as u32),
            name: Some(name.to_string()),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<SyntaxElement>) -> Self {
        self.children = children;
        self
    }
}

impl SyntaxNode for SyntaxElement {
    fn kind(&self) -> SyntaxKind {
        self.kind
    }

    fn span(&self) -> TextRange {
        self.span
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// Names bound anywhere below `node`, not looking into nested scopes.
pub fn bound_names<N: SyntaxNode>(node: &N) -> Vec<String> {
    let mut names = Vec::new();
    collect_bound(node, &mut names);
    names
}

fn collect_bound<N: SyntaxNode>(node: &N, names: &mut Vec<String>) {
    for child in node.children() {
        match child.kind() {
            SyntaxKind::Identifier(IdentRole::Binding) => {
                if let Some(name) = child.name() {
                    if !names.iter().any(|n| n == name) {
                        names.push(name.to_string());
                    }
                }
            }
            SyntaxKind::Scope => {}
            _ => collect_bound(child, names),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LOWERING FROM OXC
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    /// Offset in the same coordinates as the lowered spans.
    pub offset: u32,
}

struct Frame {
    element: SyntaxElement,
    /// The node owns a property key written as `[expr]`.
    computed_key: bool,
}

struct TreeBuilder {
    stack: Vec<Frame>,
    shift: i64,
}

impl TreeBuilder {
    fn new(root_kind: SyntaxKind, shift: i64) -> Self {
        Self {
            stack: vec![Frame {
                element: SyntaxElement::new(root_kind, TextRange::default()),
                computed_key: false,
            }],
            shift,
        }
    }

    fn range(&self, span: Span) -> TextRange {
        let at = |pos: u32| (pos as i64 + self.shift).max(0) as u32;
        TextRange::new(at(span.start), at(span.end))
    }

    fn open(&mut self, kind: SyntaxKind, span: Span, name: Option<String>, computed_key: bool) {
        let mut element = SyntaxElement::new(kind, self.range(span));
        element.name = name;
        self.stack.push(Frame {
            element,
            computed_key,
        });
    }

    fn close(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        if let Some(frame) = self.stack.pop() {
            if let Some(parent) = self.stack.last_mut() {
                parent.element.children.push(frame.element);
            }
        }
    }

    fn finish(mut self, span: TextRange) -> SyntaxElement {
        while self.stack.len() > 1 {
            self.close();
        }
        let mut root = match self.stack.pop() {
            Some(frame) => frame.element,
            None => SyntaxElement::new(SyntaxKind::Other, span),
        };
        root.span = span;
        root
    }
}

fn lower_kind(kind: &AstKind<'_>) -> (SyntaxKind, Option<String>, bool) {
    use SyntaxKind as K;
    match kind {
        AstKind::IdentifierReference(id) => {
            (K::Identifier(IdentRole::Reference), Some(id.name.to_string()), false)
        }
        AstKind::IdentifierName(id) => (K::Identifier(IdentRole::Name), Some(id.name.to_string()), false),
        AstKind::BindingIdentifier(id) => {
            (K::Identifier(IdentRole::Binding), Some(id.name.to_string()), false)
        }
        AstKind::ObjectProperty(p) => (K::ObjectProperty { shorthand: p.shorthand }, None, p.computed),
        AstKind::AssignmentTargetPropertyIdentifier(_) => (K::ObjectProperty { shorthand: true }, None, false),
        AstKind::BindingProperty(p) => (K::Other, None, p.computed),
        AstKind::MethodDefinition(m) => (K::Other, None, m.computed),
        AstKind::PropertyDefinition(p) => (K::Other, None, p.computed),
        AstKind::TSPropertySignature(p) => (K::PropertySignature, None, p.computed),
        AstKind::TSMethodSignature(m) => (K::MethodSignature, None, m.computed),
        AstKind::TSIndexSignature(_) => (K::IndexSignature, None, false),
        AstKind::TSTypeLiteral(_) => (K::TypeLiteral, None, false),
        AstKind::TSTypeParameterInstantiation(_) => (K::TypeArguments, None, false),
        AstKind::TSTypeQuery(_) => (K::TypeQuery, None, false),
        AstKind::TSTypeOperator(_) => (K::TypeOperator, None, false),
        AstKind::ArrowFunctionExpression(_) | AstKind::Function(_) => (K::Scope, None, false),
        other if is_type_node(other.ty()) => (K::TypeNode, None, false),
        _ => (K::Other, None, false),
    }
}

fn is_type_node(ty: AstType) -> bool {
    use AstType::*;
    matches!(
        ty,
        TSTypeAnnotation
            | TSTypeReference
            | TSQualifiedName
            | TSUnionType
            | TSIntersectionType
            | TSArrayType
            | TSTupleType
            | TSNamedTupleMember
            | TSOptionalType
            | TSRestType
            | TSIndexedAccessType
            | TSConditionalType
            | TSInferType
            | TSMappedType
            | TSLiteralType
            | TSTemplateLiteralType
            | TSFunctionType
            | TSConstructorType
            | TSImportType
            | TSParenthesizedType
            | TSTypePredicate
            | TSThisType
            | TSTypeParameter
            | TSTypeParameterDeclaration
            | TSCallSignatureDeclaration
            | TSConstructSignatureDeclaration
            | TSThisParameter
            | TSAnyKeyword
            | TSUnknownKeyword
            | TSNeverKeyword
            | TSVoidKeyword
            | TSNullKeyword
            | TSUndefinedKeyword
            | TSStringKeyword
            | TSNumberKeyword
            | TSBigIntKeyword
            | TSBooleanKeyword
            | TSSymbolKeyword
            | TSObjectKeyword
            | TSIntrinsicKeyword
    )
}

impl<'a> Visit<'a> for TreeBuilder {
    fn enter_node(&mut self, kind: AstKind<'a>) {
        let (syntax_kind, name, computed_key) = lower_kind(&kind);
        self.open(syntax_kind, kind.span(), name, computed_key);
    }

    fn leave_node(&mut self, _kind: AstKind<'a>) {
        self.close();
    }

    fn visit_property_key(&mut self, it: &PropertyKey<'a>) {
        let computed = self.stack.last().is_some_and(|f| f.computed_key);
        let kind = if computed {
            SyntaxKind::ComputedKey
        } else {
            SyntaxKind::PropertyKey
        };
        self.open(kind, it.span(), None, false);
        oxc_ast_visit::walk::walk_property_key(self, it);
        self.close();
    }
}

fn source_type() -> SourceType {
    SourceType::ts()
}

pub(crate) fn first_error(errors: &[OxcDiagnostic], shift: i64) -> SyntaxError {
    let Some(first) = errors.first() else {
        return SyntaxError {
            message: "Unknown syntax error".to_string(),
            offset: shift.max(0) as u32,
        };
    };
    let at = first
        .labels
        .as_ref()
        .and_then(|labels| labels.first())
        .map(|label| label.offset() as i64)
        .unwrap_or(0);
    SyntaxError {
        message: first.to_string(),
        offset: (at + shift).max(0) as u32,
    }
}

/// Parse a single template expression. Spans are shifted by `offset`.
pub fn parse_expression(code: &str, offset: u32) -> Result<SyntaxElement, SyntaxError> {
    let allocator = Allocator::default();
    let shift = offset as i64;
    let expr: Expression = Parser::new(&allocator, code, source_type())
        .parse_expression()
        .map_err(|errors| first_error(&errors, shift))?;

    let mut builder = TreeBuilder::new(SyntaxKind::Other, shift);
    builder.visit_expression(&expr);
    Ok(builder.finish(TextRange::new(offset, offset + code.len() as u32)))
}

/// A handler written as a function (`(e) => go(e)`, `function () {}`) or as a
/// reference to one (`save`, `store.actions[name]`). Anything else, including
/// text that is not a single expression, is a statement list.
pub fn is_callable_reference(code: &str) -> bool {
    let allocator = Allocator::default();
    match Parser::new(&allocator, code, source_type()).parse_expression() {
        Ok(expr) => matches!(
            expr.get_inner_expression(),
            Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_)
        ) || is_member_path(&expr),
        Err(_) => false,
    }
}

fn is_member_path(expr: &Expression) -> bool {
    match expr.get_inner_expression() {
        Expression::Identifier(_) => true,
        Expression::StaticMemberExpression(member) => !member.optional && is_member_path(&member.object),
        Expression::ComputedMemberExpression(member) => !member.optional && is_member_path(&member.object),
        _ => false,
    }
}

/// Parse an event handler body as a statement list. The root is a scope node,
/// since the generated handler is wrapped in a function.
pub fn parse_statements(code: &str, offset: u32) -> Result<SyntaxElement, SyntaxError> {
    let allocator = Allocator::default();
    let shift = offset as i64;
    let ret = Parser::new(&allocator, code, source_type()).parse();
    if ret.panicked || !ret.errors.is_empty() {
        return Err(first_error(&ret.errors, shift));
    }

    let mut builder = TreeBuilder::new(SyntaxKind::Scope, shift);
    for statement in &ret.program.body {
        builder.visit_statement(statement);
    }
    Ok(builder.finish(TextRange::new(offset, offset + code.len() as u32)))
}

/// Parse a binding pattern (loop aliases, slot props) as the parameter list of
/// an arrow function, so default values are classified in value position and
/// the bound names come back as the scope's bindings.
pub fn parse_pattern(pattern: &str, offset: u32) -> Result<SyntaxElement, SyntaxError> {
    let wrapped = format!("({}) => 0", pattern);
    let allocator = Allocator::default();
    let shift = offset as i64 - 1;
    let expr: Expression = Parser::new(&allocator, &wrapped, source_type())
        .parse_expression()
        .map_err(|errors| first_error(&errors, shift))?;

    let mut builder = TreeBuilder::new(SyntaxKind::Other, shift);
    builder.visit_expression(&expr);
    Ok(builder.finish(TextRange::new(offset, offset + pattern.len() as u32)))
}
