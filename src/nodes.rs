//! Syntax tree produced by [`crate::parser`].
//!
//! Every node owns its children outright; there are no parent links. Derived
//! flags such as `important` are computed once by the parser and stored.

use serde::Serialize;

use crate::token::Token;

/// A bare name: variant name, class body, CSS property name.
pub type Identifier<'a> = Token<'a>;

/// Kind tag shared by nodes, query results and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Declaration,
    Variant,
    ArbitraryVariant,
    VariantSpan,
    Group,
    ClassName,
    CssProperty,
    ArbitraryStyle,
    ArbitraryProperty,
    Unknown,
}

impl NodeKind {
    /// Terminal nodes that name one concrete utility or declaration.
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            NodeKind::ClassName
                | NodeKind::CssProperty
                | NodeKind::ArbitraryStyle
                | NodeKind::ArbitraryProperty
                | NodeKind::Unknown
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Declaration => "Declaration",
            NodeKind::Variant => "Variant",
            NodeKind::ArbitraryVariant => "ArbitraryVariant",
            NodeKind::VariantSpan => "VariantSpan",
            NodeKind::Group => "Group",
            NodeKind::ClassName => "ClassName",
            NodeKind::CssProperty => "CssProperty",
            NodeKind::ArbitraryStyle => "ArbitraryStyle",
            NodeKind::ArbitraryProperty => "ArbitraryProperty",
            NodeKind::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Node<'a> {
    Declaration(Declaration<'a>),
    VariantSpan(VariantSpan<'a>),
    Group(Group<'a>),
    ClassName(ClassName<'a>),
    CssProperty(CssProperty<'a>),
    ArbitraryStyle(ArbitraryStyle<'a>),
    ArbitraryProperty(ArbitraryProperty<'a>),
    Unknown(Unknown<'a>),
}

impl<'a> Node<'a> {
    pub fn range(&self) -> Token<'a> {
        match self {
            Node::Declaration(node) => node.range,
            Node::VariantSpan(node) => node.range,
            Node::Group(node) => node.range,
            Node::ClassName(node) => node.range,
            Node::CssProperty(node) => node.range,
            Node::ArbitraryStyle(node) => node.range,
            Node::ArbitraryProperty(node) => node.range,
            Node::Unknown(node) => node.range,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Declaration(_) => NodeKind::Declaration,
            Node::VariantSpan(_) => NodeKind::VariantSpan,
            Node::Group(_) => NodeKind::Group,
            Node::ClassName(_) => NodeKind::ClassName,
            Node::CssProperty(_) => NodeKind::CssProperty,
            Node::ArbitraryStyle(_) => NodeKind::ArbitraryStyle,
            Node::ArbitraryProperty(_) => NodeKind::ArbitraryProperty,
            Node::Unknown(_) => NodeKind::Unknown,
        }
    }

    /// A sequence with nothing in it, e.g. the interior of `()` or `( /* x */ )`.
    pub fn is_blank(&self) -> bool {
        match self {
            Node::Declaration(node) => node.children.is_empty(),
            _ => false,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Node<'a>> {
        match self {
            Node::Declaration(node) => node.children.iter().collect(),
            Node::VariantSpan(node) => node.child.iter().map(|child| &**child).collect(),
            Node::Group(node) => vec![&*node.child],
            _ => Vec::new(),
        }
    }

    /// Resolved leaf view, `None` for structural nodes.
    pub fn leaf(&self) -> Option<Leaf<'a>> {
        match self {
            Node::ClassName(node) => Some(Leaf {
                kind: NodeKind::ClassName,
                target: node.target,
                important: node.important,
                closed: true,
                prop: None,
                content: None,
                opacity: None,
            }),
            Node::CssProperty(node) => Some(Leaf {
                kind: NodeKind::CssProperty,
                target: node.target,
                important: node.important,
                closed: node.closed,
                prop: Some(node.prop),
                content: Some(node.content),
                opacity: None,
            }),
            Node::ArbitraryStyle(node) => Some(Leaf {
                kind: NodeKind::ArbitraryStyle,
                target: node.target,
                important: node.important,
                closed: node.closed,
                prop: Some(node.prop),
                content: Some(node.content),
                opacity: node.opacity.as_ref().map(|opacity| opacity.value),
            }),
            Node::ArbitraryProperty(node) => Some(Leaf {
                kind: NodeKind::ArbitraryProperty,
                target: node.target,
                important: node.important,
                closed: node.closed,
                prop: None,
                content: Some(node.content),
                opacity: None,
            }),
            Node::Unknown(node) => Some(Leaf {
                kind: NodeKind::Unknown,
                target: node.range,
                important: false,
                closed: true,
                prop: None,
                content: None,
                opacity: None,
            }),
            _ => None,
        }
    }
}

/// Flattened view over any terminal node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leaf<'a> {
    pub kind: NodeKind,
    pub target: Token<'a>,
    pub important: bool,
    pub closed: bool,
    pub prop: Option<Token<'a>>,
    pub content: Option<Token<'a>>,
    pub opacity: Option<Token<'a>>,
}

/// Top-level sequence produced by one parse call when it yields anything
/// other than exactly one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration<'a> {
    pub range: Token<'a>,
    pub children: Vec<Node<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Variant<'a> {
    #[serde(rename = "Variant")]
    Simple(SimpleVariant<'a>),
    #[serde(rename = "ArbitraryVariant")]
    Arbitrary(ArbitraryVariant<'a>),
}

impl<'a> Variant<'a> {
    /// Extent including the separator.
    pub fn range(&self) -> Token<'a> {
        match self {
            Variant::Simple(variant) => variant.range,
            Variant::Arbitrary(variant) => variant.range,
        }
    }

    /// The name pushed onto the variant stack: `hover` for `hover:`,
    /// `[&>*]` for `[&>*]:`.
    pub fn identifier(&self) -> Token<'a> {
        match self {
            Variant::Simple(variant) => variant.child,
            Variant::Arbitrary(variant) => variant.child,
        }
    }

    pub fn closed(&self) -> bool {
        match self {
            Variant::Simple(_) => true,
            Variant::Arbitrary(variant) => variant.closed,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Variant::Simple(_) => NodeKind::Variant,
            Variant::Arbitrary(_) => NodeKind::ArbitraryVariant,
        }
    }
}

/// `identifier` followed by the separator, e.g. `md:`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleVariant<'a> {
    pub range: Token<'a>,
    pub child: Identifier<'a>,
    pub separator: Token<'a>,
}

/// Bracketed variant such as `[&>*]:` or `data-[state=open]:`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbitraryVariant<'a> {
    pub range: Token<'a>,
    /// Prefix plus the bracketed part, without the separator.
    pub child: Identifier<'a>,
    pub prefix: Token<'a>,
    pub content: Token<'a>,
    pub separator: Option<Token<'a>>,
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantSpan<'a> {
    pub range: Token<'a>,
    pub variant: Variant<'a>,
    /// `None` for an empty variant such as a trailing `hover:`.
    pub child: Option<Box<Node<'a>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group<'a> {
    pub range: Token<'a>,
    pub child: Box<Node<'a>>,
    pub closed: bool,
    pub important: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassName<'a> {
    pub range: Token<'a>,
    /// Class body without `!` markers.
    pub target: Identifier<'a>,
    pub important: bool,
}

/// `prop[value]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CssProperty<'a> {
    pub range: Token<'a>,
    pub target: Token<'a>,
    pub prop: Identifier<'a>,
    pub content: Token<'a>,
    pub closed: bool,
    pub important: bool,
}

/// `prop-[value]` or `prop/[value]`, optionally followed by an opacity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbitraryStyle<'a> {
    pub range: Token<'a>,
    pub target: Token<'a>,
    pub prop: Identifier<'a>,
    pub content: Token<'a>,
    pub closed: bool,
    pub important: bool,
    pub opacity: Option<Opacity<'a>>,
}

/// `/50` or `/[0.5]` after an arbitrary style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opacity<'a> {
    pub range: Token<'a>,
    pub value: Token<'a>,
    pub bracketed: bool,
    pub closed: bool,
}

/// `[prop:value]` with no prefix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbitraryProperty<'a> {
    pub range: Token<'a>,
    pub target: Token<'a>,
    pub content: Token<'a>,
    pub closed: bool,
    pub important: bool,
}

/// A run of characters the scanner could not classify.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unknown<'a> {
    pub range: Token<'a>,
}

/// Variant stack and importance accumulated on the way down to a node.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Scope<'a> {
    pub variants: Vec<Identifier<'a>>,
    pub important: bool,
}

impl<'a> Scope<'a> {
    pub fn with_variant(&self, variant: Identifier<'a>) -> Self {
        let mut variants = self.variants.clone();
        variants.push(variant);
        Self {
            variants,
            important: self.important,
        }
    }

    pub fn with_important(&self, important: bool) -> Self {
        Self {
            variants: self.variants.clone(),
            important: self.important || important,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_kinds() {
        assert!(NodeKind::ClassName.is_leaf());
        assert!(NodeKind::Unknown.is_leaf());
        assert!(!NodeKind::Group.is_leaf());
        assert!(!NodeKind::VariantSpan.is_leaf());
    }

    #[test]
    fn test_blank_declaration() {
        let source = "()";
        let node = Node::Declaration(Declaration {
            range: Token::new(source, 1, 1),
            children: Vec::new(),
        });
        assert!(node.is_blank());
        assert!(node.leaf().is_none());
        assert_eq!(node.kind(), NodeKind::Declaration);
    }

    #[test]
    fn test_variant_identifier() {
        let source = "hover:underline";
        let variant = Variant::Simple(SimpleVariant {
            range: Token::new(source, 0, 6),
            child: Token::new(source, 0, 5),
            separator: Token::new(source, 5, 6),
        });
        assert_eq!(variant.identifier().text, "hover");
        assert_eq!(variant.range().text, "hover:");
        assert!(variant.closed());
        assert_eq!(variant.kind(), NodeKind::Variant);
    }

    #[test]
    fn test_node_serializes_with_kind_tag() {
        let source = "flex";
        let node = Node::ClassName(ClassName {
            range: Token::new(source, 0, 4),
            target: Token::new(source, 0, 4),
            important: false,
        });
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["kind"], "ClassName");
        assert_eq!(json["target"]["text"], "flex");
    }
}
