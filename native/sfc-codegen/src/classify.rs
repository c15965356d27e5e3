//! Value / type-name classification of identifiers in template expressions.
//!
//! Classification is purely structural: a single flag tracks whether the walk
//! is inside a type position. Type nodes set it, computed property keys clear
//! it for their own subtree. Identifier references found in value position
//! that resolve to a setup binding get the context-access prefix.

use crate::builder::Edit;
use crate::scope::{is_instance_property, Resolution, ScopeResolver};
use crate::syntax::{bound_names, IdentRole, SyntaxKind, SyntaxNode};
use crate::ir::TextRange;
use serde::Serialize;

pub const CTX_PREFIX: &str = "__VLS_ctx.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    Value,
    TypeName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedIdentifier {
    pub name: String,
    pub span: TextRange,
    pub class: Classification,
    pub resolution: Resolution,
    pub prefixed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ClassifiedExpression {
    pub identifiers: Vec<ClassifiedIdentifier>,
    /// Insertions that apply the prefix, in source order.
    pub edits: Vec<Edit>,
    /// Setup bindings read in value position, first occurrence order.
    pub accessed: Vec<String>,
    /// Public-instance `$` properties among `accessed`.
    pub dollar: Vec<String>,
    /// Some identifier was classified below a node of unknown shape.
    pub ambiguous: bool,
}

impl ClassifiedExpression {
    fn access(&mut self, name: &str) {
        if !self.accessed.iter().any(|n| n == name) {
            self.accessed.push(name.to_string());
        }
        if is_instance_property(name) && !self.dollar.iter().any(|n| n == name) {
            self.dollar.push(name.to_string());
        }
    }
}

/// Classify every identifier below `root`. Frames pushed for nested functions
/// are popped again before returning.
pub fn classify<N: SyntaxNode>(root: &N, scope: &mut ScopeResolver) -> ClassifiedExpression {
    let mut walker = Classifier {
        scope,
        out: ClassifiedExpression::default(),
    };
    walker.walk(root, false, false);
    walker.out
}

struct Classifier<'s> {
    scope: &'s mut ScopeResolver,
    out: ClassifiedExpression,
}

impl Classifier<'_> {
    fn walk<N: SyntaxNode>(&mut self, node: &N, type_ctx: bool, degraded: bool) {
        match node.kind() {
            SyntaxKind::Identifier(role) => self.identifier(node, role, type_ctx, degraded, false),

            SyntaxKind::ObjectProperty { shorthand: true } if !type_ctx => {
                for child in node.children() {
                    match child.kind() {
                        SyntaxKind::PropertyKey => {}
                        SyntaxKind::Identifier(role) => {
                            self.identifier(child, role, false, degraded, true)
                        }
                        _ => self.walk(child, false, degraded),
                    }
                }
            }

            SyntaxKind::ComputedKey => self.walk_children(node, false, degraded),

            SyntaxKind::TypeArguments
            | SyntaxKind::TypeQuery
            | SyntaxKind::TypeOperator
            | SyntaxKind::TypeLiteral
            | SyntaxKind::MethodSignature
            | SyntaxKind::PropertySignature
            | SyntaxKind::IndexSignature
            | SyntaxKind::TypeNode => self.walk_children(node, true, degraded),

            SyntaxKind::Scope => {
                self.scope.push_frame(bound_names(node));
                self.walk_children(node, type_ctx, degraded);
                self.scope.pop_frame();
            }

            SyntaxKind::Unknown => self.walk_children(node, type_ctx, true),

            SyntaxKind::PropertyKey | SyntaxKind::ObjectProperty { .. } | SyntaxKind::Other => {
                self.walk_children(node, type_ctx, degraded)
            }
        }
    }

    fn walk_children<N: SyntaxNode>(&mut self, node: &N, type_ctx: bool, degraded: bool) {
        for child in node.children() {
            self.walk(child, type_ctx, degraded);
        }
    }

    fn identifier<N: SyntaxNode>(
        &mut self,
        node: &N,
        role: IdentRole,
        type_ctx: bool,
        degraded: bool,
        shorthand: bool,
    ) {
        let Some(name) = node.name() else {
            return;
        };
        let span = node.span();

        if type_ctx {
            self.out.identifiers.push(ClassifiedIdentifier {
                name: name.to_string(),
                span,
                class: Classification::TypeName,
                resolution: self.scope.resolve(name),
                prefixed: false,
            });
            return;
        }
        if role != IdentRole::Reference {
            return;
        }

        let resolution = self.scope.resolve(name);
        let prefixed = resolution == Resolution::Setup;
        if prefixed {
            let text = if shorthand {
                format!("{}: {}", name, CTX_PREFIX)
            } else {
                CTX_PREFIX.to_string()
            };
            self.out.edits.push(Edit::insert(span.start, text));
            self.out.access(name);
        }
        if degraded {
            self.out.ambiguous = true;
        }
        self.out.identifiers.push(ClassifiedIdentifier {
            name: name.to_string(),
            span,
            class: Classification::Value,
            resolution,
            prefixed,
        });
    }
}
