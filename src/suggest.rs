//! Completion context at a cursor offset.
//!
//! Unlike hover, a node is selected when the cursor is inside it or sits
//! right after its last character (`start < position <= end`), since a
//! completion cursor lives between characters.

use serde::Serialize;

use crate::nodes::{Group, Node, NodeKind, Scope, VariantSpan};
use crate::parser::{default_parser, ClassParser};
use crate::token::{floor_boundary, Token};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestResult<'a> {
    /// The token being completed, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Token<'a>>,
    /// The part of `target` before the cursor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<Token<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    pub variants: Vec<Token<'a>>,
    pub important: bool,
    pub in_comment: bool,
    pub in_string: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prop: Option<Token<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Token<'a>>,
}

impl<'a> SuggestResult<'a> {
    fn context(scope: Scope<'a>) -> Self {
        Self {
            variants: scope.variants,
            important: scope.important,
            ..Self::default()
        }
    }
}

impl ClassParser {
    pub fn suggest<'a>(&self, text: &'a str, position: usize) -> SuggestResult<'a> {
        let position = floor_boundary(text, position);
        let lexical = classify(text, position);
        if lexical == Lexical::Comment {
            return SuggestResult {
                in_comment: true,
                ..SuggestResult::default()
            };
        }

        let tree = self.parse_range(text, 0, text.len(), Some(position));
        let mut result = locate(&tree, position, Scope::default());
        result.in_string = lexical == Lexical::String;
        result
    }
}

/// [`ClassParser::suggest`] with the default separator.
pub fn suggest(text: &str, position: usize) -> SuggestResult<'_> {
    default_parser().suggest(text, position)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexical {
    Code,
    Comment,
    String,
}

/// Classify `position` by scanning the raw text from the start. Comments are
/// only recognised outside brackets; quotes only inside them.
fn classify(text: &str, position: usize) -> Lexical {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        LineComment,
        BlockComment,
        Quoted(u8),
    }

    let bytes = text.as_bytes();
    let end = position.min(bytes.len());
    let mut state = State::Code;
    let mut depth = 0usize;
    let mut i = 0;

    while i < end {
        let byte = bytes[i];
        let next = bytes.get(i + 1).copied();
        match state {
            State::Code => match byte {
                b'/' if depth == 0 && next == Some(b'/') => {
                    state = State::LineComment;
                    i += 1;
                }
                b'/' if depth == 0 && next == Some(b'*') => {
                    state = State::BlockComment;
                    i += 1;
                }
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'\'' | b'"' if depth > 0 => state = State::Quoted(byte),
                _ => {}
            },
            State::LineComment => {
                if byte == b'\n' {
                    state = State::Code;
                }
            }
            State::BlockComment => {
                if byte == b'*' && next == Some(b'/') {
                    state = State::Code;
                    i += 1;
                }
            }
            State::Quoted(quote) => {
                if byte == b'\\' {
                    i += 1;
                } else if byte == quote {
                    state = State::Code;
                }
            }
        }
        i += 1;
    }

    match state {
        State::Code => Lexical::Code,
        State::LineComment | State::BlockComment => Lexical::Comment,
        State::Quoted(_) => Lexical::String,
    }
}

fn locate<'a>(node: &Node<'a>, position: usize, scope: Scope<'a>) -> SuggestResult<'a> {
    match node {
        Node::Declaration(declaration) => {
            match declaration.children.iter().find(|child| child.range().touches(position)) {
                Some(child) => locate(child, position, scope),
                None => SuggestResult::context(scope),
            }
        }
        // a lone top-level span or group is not wrapped in a declaration
        Node::VariantSpan(_) | Node::Group(_) if !node.range().touches(position) => {
            SuggestResult::context(scope)
        }
        Node::VariantSpan(span) => locate_in_span(span, position, scope),
        Node::Group(group) => locate_in_group(group, position, scope),
        _ => match node.leaf() {
            Some(leaf) if node.range().touches(position) => SuggestResult {
                target: Some(leaf.target),
                word: Some(leaf.target.prefix_to(position)),
                kind: Some(leaf.kind),
                variants: scope.variants,
                important: scope.important || leaf.important,
                in_comment: false,
                in_string: false,
                prop: leaf.prop,
                value: leaf.content,
            },
            _ => SuggestResult::context(scope),
        },
    }
}

fn locate_in_span<'a>(span: &VariantSpan<'a>, position: usize, scope: Scope<'a>) -> SuggestResult<'a> {
    let variant = &span.variant;
    let range = variant.range();
    let identifier = variant.identifier();

    if position <= range.start || position > span.range.end {
        return SuggestResult::context(scope);
    }
    if position < range.end {
        return SuggestResult {
            target: Some(identifier),
            word: Some(identifier.prefix_to(position)),
            kind: Some(variant.kind()),
            ..SuggestResult::context(scope)
        };
    }

    let inner = scope.with_variant(identifier);
    match span.child.as_deref() {
        Some(child) if position > range.end && child.range().touches(position) => {
            locate(child, position, inner)
        }
        _ => SuggestResult::context(inner),
    }
}

fn locate_in_group<'a>(group: &Group<'a>, position: usize, scope: Scope<'a>) -> SuggestResult<'a> {
    let range = group.range;
    let open = range.start + usize::from(range.text.starts_with('!'));
    if position <= open {
        return SuggestResult::context(scope);
    }

    let close = if !group.closed {
        None
    } else if range.text.ends_with(")!") {
        Some(range.end - 2)
    } else {
        Some(range.end - 1)
    };

    match close {
        // past `)`: a new item starts here, outside the group
        Some(close) if position > close => SuggestResult::context(scope),
        _ => {
            let inner = scope.with_important(group.important);
            if group.child.range().touches(position) {
                locate(&group.child, position, inner)
            } else {
                SuggestResult::context(inner)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(tokens: &[Token<'a>]) -> Vec<&'a str> {
        tokens.iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_empty_and_start_positions() {
        let result = suggest("", 0);
        assert!(result.target.is_none());
        assert!(result.variants.is_empty());
        assert!(!result.in_comment);

        let result = suggest("hover:underline", 0);
        assert!(result.target.is_none());
        assert!(result.variants.is_empty());
    }

    #[test]
    fn test_partial_word() {
        let result = suggest("hover:under", 11);
        assert_eq!(result.target.map(|t| t.text), Some("under"));
        assert_eq!(result.word.map(|t| t.text), Some("under"));
        assert_eq!(names(&result.variants), vec!["hover"]);

        let result = suggest("hover:underline", 8);
        assert_eq!(result.word.map(|t| t.text), Some("un"));
    }

    #[test]
    fn test_right_after_separator() {
        let result = suggest("md:hover:", 9);
        assert!(result.target.is_none());
        assert_eq!(names(&result.variants), vec!["md", "hover"]);
    }

    #[test]
    fn test_inside_variant_name() {
        let result = suggest("hov:flex", 2);
        assert_eq!(result.kind, Some(NodeKind::Variant));
        assert_eq!(result.word.map(|t| t.text), Some("ho"));
        assert!(result.variants.is_empty());
    }

    #[test]
    fn test_inside_empty_group() {
        let result = suggest("lg:!()", 5);
        assert!(result.target.is_none());
        assert_eq!(names(&result.variants), vec!["lg"]);
        assert!(result.important);
    }

    #[test]
    fn test_after_group_close_drops_group_context() {
        let result = suggest("lg:(a)! ", 7);
        assert!(result.target.is_none());
        assert!(!result.important);
    }

    #[test]
    fn test_after_lone_span_has_no_context() {
        let result = suggest("hover:a ", 8);
        assert!(result.target.is_none());
        assert!(result.variants.is_empty());

        let result = suggest("lg:(a) ", 7);
        assert!(result.target.is_none());
        assert!(result.variants.is_empty());
        assert!(!result.important);

        assert!(suggest("x hover:a ", 10).variants.is_empty());
    }

    #[test]
    fn test_in_comment() {
        let text = "a /* hover: */ b";
        let result = suggest(text, 8);
        assert!(result.in_comment);
        assert!(result.target.is_none());
        assert!(result.variants.is_empty());

        assert!(!suggest(text, 16).in_comment);
        assert!(suggest("flex // hov", 11).in_comment);
    }

    #[test]
    fn test_in_string() {
        let result = suggest("content-['a b']", 11);
        assert!(result.in_string);
        assert_eq!(result.kind, Some(NodeKind::ArbitraryStyle));
        assert!(!suggest("content-['a b']", 15).in_string);
    }
}
