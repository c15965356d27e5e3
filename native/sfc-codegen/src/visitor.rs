use crate::ir::{ElementNode, InterpolationNode, TemplateNode, TextNode};

/// The TemplateVisitor trait defines the single traversal mechanism for the template AST.
///
/// Rules:
/// 1. Traversal is in document order.
/// 2. Implementers override `visit_*` methods to add behavior.
/// 3. Implementers MUST call `walk_*` functions to continue traversal unless pruning is intended.
pub trait TemplateVisitor {
    type Error;

    fn visit_children(&mut self, children: &[TemplateNode]) -> Result<(), Self::Error> {
        walk_children(self, children)
    }

    fn visit_node(&mut self, node: &TemplateNode) -> Result<(), Self::Error> {
        walk_node(self, node)
    }

    fn visit_element(&mut self, element: &ElementNode) -> Result<(), Self::Error> {
        walk_element(self, element)
    }

    fn visit_interpolation(&mut self, _node: &InterpolationNode) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_text(&mut self, _text: &TextNode) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_comment(&mut self, _comment: &TextNode) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub fn walk_children<V: TemplateVisitor + ?Sized>(
    visitor: &mut V,
    children: &[TemplateNode],
) -> Result<(), V::Error> {
    for child in children {
        visitor.visit_node(child)?;
    }
    Ok(())
}

pub fn walk_node<V: TemplateVisitor + ?Sized>(
    visitor: &mut V,
    node: &TemplateNode,
) -> Result<(), V::Error> {
    match node {
        TemplateNode::Element(el) => visitor.visit_element(el),
        TemplateNode::Text(text) => visitor.visit_text(text),
        TemplateNode::Interpolation(interp) => visitor.visit_interpolation(interp),
        TemplateNode::Comment(comment) => visitor.visit_comment(comment),
    }
}

pub fn walk_element<V: TemplateVisitor + ?Sized>(
    visitor: &mut V,
    element: &ElementNode,
) -> Result<(), V::Error> {
    visitor.visit_children(&element.children)
}
