//! Depth-first flatten of a whole expression into resolved items plus the
//! structurally broken regions found along the way.

use serde::Serialize;

use crate::nodes::{Node, NodeKind, Scope};
use crate::parser::{default_parser, ClassParser};
use crate::token::Token;

/// One terminal item with its resolved variant stack and importance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpreadItem<'a> {
    pub target: Token<'a>,
    pub kind: NodeKind,
    pub variants: Vec<Token<'a>>,
    pub important: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prop: Option<Token<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Token<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<Token<'a>>,
}

/// A region diverted into one of the error buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorSpan<'a> {
    pub target: Token<'a>,
    pub kind: NodeKind,
    pub variants: Vec<Token<'a>>,
    pub important: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadResult<'a> {
    pub items: Vec<SpreadItem<'a>>,
    pub empty_group: Vec<ErrorSpan<'a>>,
    pub empty_variants: Vec<ErrorSpan<'a>>,
    pub not_closed: Vec<ErrorSpan<'a>>,
}

impl<'a> SpreadResult<'a> {
    /// True when any error bucket is non-empty.
    pub fn has_errors(&self) -> bool {
        !self.empty_group.is_empty() || !self.empty_variants.is_empty() || !self.not_closed.is_empty()
    }

    /// Items the scanner could not classify.
    pub fn unknown(&self) -> impl Iterator<Item = &SpreadItem<'a>> + '_ {
        self.items.iter().filter(|item| item.kind == NodeKind::Unknown)
    }
}

impl ClassParser {
    pub fn spread<'a>(&self, text: &'a str) -> SpreadResult<'a> {
        let tree = self.parse(text);
        let mut result = SpreadResult::default();
        walk(&tree, &Scope::default(), &mut result);
        result
    }
}

/// [`ClassParser::spread`] with the default separator.
pub fn spread(text: &str) -> SpreadResult<'_> {
    default_parser().spread(text)
}

fn error_span<'a>(target: Token<'a>, kind: NodeKind, scope: &Scope<'a>) -> ErrorSpan<'a> {
    ErrorSpan {
        target,
        kind,
        variants: scope.variants.clone(),
        important: scope.important,
    }
}

fn walk<'a>(node: &Node<'a>, scope: &Scope<'a>, out: &mut SpreadResult<'a>) {
    match node {
        Node::Declaration(declaration) => {
            for child in &declaration.children {
                walk(child, scope, out);
            }
        }
        Node::VariantSpan(span) => {
            let variant = &span.variant;
            if !variant.closed() {
                out.not_closed.push(error_span(span.range, variant.kind(), scope));
                return;
            }
            match span.child.as_deref() {
                Some(child) if !child.is_blank() => {
                    walk(child, &scope.with_variant(variant.identifier()), out)
                }
                _ => out
                    .empty_variants
                    .push(error_span(variant.range(), variant.kind(), scope)),
            }
        }
        Node::Group(group) => {
            let inner = scope.with_important(group.important);
            if !group.closed {
                out.not_closed.push(error_span(group.range, NodeKind::Group, &inner));
            } else if group.child.is_blank() {
                out.empty_group.push(error_span(group.range, NodeKind::Group, &inner));
            } else {
                walk(&group.child, &inner, out);
            }
        }
        _ => {
            let Some(leaf) = node.leaf() else {
                return;
            };
            let important = scope.important || leaf.important;
            let opacity_open = match node {
                Node::ArbitraryStyle(style) => style.opacity.as_ref().is_some_and(|o| !o.closed),
                _ => false,
            };
            if !leaf.closed || opacity_open {
                let mut span = error_span(leaf.target, leaf.kind, scope);
                span.important = important;
                out.not_closed.push(span);
                return;
            }
            out.items.push(SpreadItem {
                target: leaf.target,
                kind: leaf.kind,
                variants: scope.variants.clone(),
                important,
                prop: leaf.prop,
                content: leaf.content,
                opacity: leaf.opacity,
            });
        }
    }
}
