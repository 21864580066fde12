//! Hover resolution: the most specific node strictly containing an offset.

use serde::Serialize;

use crate::nodes::{Node, NodeKind, Scope};
use crate::parser::{default_parser, ClassParser};
use crate::token::Token;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverResult<'a> {
    pub target: Token<'a>,
    pub kind: NodeKind,
    /// Enclosing variants, outermost first. A hovered variant is not part of
    /// its own stack.
    pub variants: Vec<Token<'a>>,
    pub important: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prop: Option<Token<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Token<'a>>,
}

impl ClassParser {
    /// Resolve the element under `position`. Whitespace, comments and
    /// offsets past the end resolve to `None`.
    pub fn hover<'a>(&self, text: &'a str, position: usize) -> Option<HoverResult<'a>> {
        if position >= text.len() {
            return None;
        }
        let tree = self.parse_range(text, 0, text.len(), Some(position));
        resolve(&tree, position, Scope::default())
    }
}

/// [`ClassParser::hover`] with the default separator.
pub fn hover(text: &str, position: usize) -> Option<HoverResult<'_>> {
    default_parser().hover(text, position)
}

fn resolve<'a>(node: &Node<'a>, position: usize, scope: Scope<'a>) -> Option<HoverResult<'a>> {
    if !node.range().contains(position) {
        return None;
    }

    match node {
        Node::Declaration(declaration) => declaration
            .children
            .iter()
            .find(|child| child.range().contains(position))
            .and_then(|child| resolve(child, position, scope)),
        Node::VariantSpan(span) => {
            let variant = &span.variant;
            if variant.range().contains(position) {
                return Some(HoverResult {
                    target: variant.identifier(),
                    kind: variant.kind(),
                    variants: scope.variants,
                    important: scope.important,
                    prop: None,
                    value: None,
                });
            }
            let child = span.child.as_deref()?;
            resolve(child, position, scope.with_variant(variant.identifier()))
        }
        Node::Group(group) => {
            let inner = scope.with_important(group.important);
            if let Some(found) = resolve(&group.child, position, inner.clone()) {
                return Some(found);
            }
            // on the delimiters or blank interior
            Some(HoverResult {
                target: group.range,
                kind: NodeKind::Group,
                variants: inner.variants,
                important: inner.important,
                prop: None,
                value: None,
            })
        }
        _ => {
            let leaf = node.leaf()?;
            Some(HoverResult {
                target: leaf.target,
                kind: leaf.kind,
                variants: scope.variants,
                important: scope.important || leaf.important,
                prop: leaf.prop,
                value: leaf.content,
            })
        }
    }
}
