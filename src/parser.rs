//! Recursive tree builder for class expressions.
//!
//! `parse` accepts every input: unbalanced brackets become `closed: false`
//! nodes and anything the scanner cannot classify becomes an `Unknown` leaf.
//! The scan position is a local threaded through the loop, so a
//! [`ClassParser`] can be shared freely between threads.

use std::sync::OnceLock;

use tracing::debug;

use crate::brackets::{find_block_comment_end, find_match, PARENS, SQUARE};
use crate::config::ParserConfig;
use crate::errors::Result;
use crate::nodes::{
    ArbitraryProperty, ArbitraryStyle, ArbitraryVariant, ClassName, CssProperty, Declaration,
    Group, Node, Opacity, SimpleVariant, Unknown, Variant, VariantSpan,
};
use crate::scanner::{skip_whitespace, Lexeme, Scanner};
use crate::terminal::find_terminal;
use crate::token::{floor_boundary, Token};

/// A compiled scanner for one separator plus the nesting limit.
#[derive(Debug, Clone)]
pub struct ClassParser {
    scanner: Scanner,
    max_depth: usize,
}

impl ClassParser {
    pub fn new(config: &ParserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scanner: Scanner::new(&config.separator)?,
            max_depth: config.max_depth,
        })
    }

    pub fn separator(&self) -> &str {
        self.scanner.separator()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse the whole text.
    pub fn parse<'a>(&self, text: &'a str) -> Node<'a> {
        self.parse_range(text, 0, text.len(), None)
    }

    /// Parse `text[start..end]`. With `breac`, scanning stops after the first
    /// lexeme whose end lies past that offset, at every nesting level.
    pub fn parse_range<'a>(
        &self,
        text: &'a str,
        start: usize,
        end: usize,
        breac: Option<usize>,
    ) -> Node<'a> {
        let end = floor_boundary(text, end);
        let start = floor_boundary(text, start).min(end);
        let builder = TreeBuilder {
            parser: self,
            text,
            breac: breac.unwrap_or(usize::MAX),
        };
        builder.sequence(start, end, 0)
    }
}

impl Default for ClassParser {
    fn default() -> Self {
        Self::new(&ParserConfig::default()).expect("default parser configuration is valid")
    }
}

/// Shared parser for the default `:` separator.
pub fn default_parser() -> &'static ClassParser {
    static PARSER: OnceLock<ClassParser> = OnceLock::new();
    PARSER.get_or_init(ClassParser::default)
}

/// Parse `text` with the default separator.
pub fn parse(text: &str) -> Node<'_> {
    default_parser().parse(text)
}

struct TreeBuilder<'p, 'a> {
    parser: &'p ClassParser,
    text: &'a str,
    breac: usize,
}

impl<'p, 'a> TreeBuilder<'p, 'a> {
    fn token(&self, start: usize, end: usize) -> Token<'a> {
        Token::new(self.text, start, end)
    }

    fn byte(&self, offset: usize, end: usize) -> Option<u8> {
        if offset < end {
            self.text.as_bytes().get(offset).copied()
        } else {
            None
        }
    }

    /// One item is returned as itself, anything else as a `Declaration`.
    fn sequence(&self, start: usize, end: usize, depth: usize) -> Node<'a> {
        let mut children = self.expressions(start, end, depth);
        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return only;
            }
        }
        Node::Declaration(Declaration {
            range: self.token(start, end),
            children,
        })
    }

    fn expressions(&self, start: usize, end: usize, depth: usize) -> Vec<Node<'a>> {
        if depth > self.parser.max_depth {
            return self.truncated(start, end, depth);
        }

        let scanner = &self.parser.scanner;
        let mut nodes = Vec::new();
        let mut position = start;

        loop {
            position = skip_whitespace(self.text, position, end);
            let Some(lexeme) = scanner.scan(self.text, position, end) else {
                break;
            };

            let scanned = lexeme.end();
            position = match lexeme {
                Lexeme::LineComment(_) => scanned,
                Lexeme::BlockComment(_) => {
                    find_block_comment_end(self.text, scanned, end).unwrap_or(end)
                }
                Lexeme::Variant {
                    identifier,
                    separator,
                } => {
                    let variant = Variant::Simple(SimpleVariant {
                        range: self.token(identifier.start, separator.end),
                        child: identifier,
                        separator,
                    });
                    self.push(&mut nodes, self.variant_span(variant, end, depth))
                }
                Lexeme::BracketPrefix {
                    start,
                    important,
                    prefix,
                    open,
                } => self.push(&mut nodes, self.bracket(start, important, prefix, open, end, depth)),
                Lexeme::ClassName {
                    range,
                    body,
                    important,
                } => self.push(
                    &mut nodes,
                    Node::ClassName(ClassName {
                        range,
                        target: body,
                        important,
                    }),
                ),
                Lexeme::Group {
                    start,
                    important,
                    open,
                } => self.push(&mut nodes, self.group(start, important, open, end, depth)),
                Lexeme::Unhandled(range) => self.push(&mut nodes, Node::Unknown(Unknown { range })),
            };

            if position > self.breac {
                break;
            }
        }

        nodes
    }

    fn push(&self, nodes: &mut Vec<Node<'a>>, node: Node<'a>) -> usize {
        let end = node.range().end;
        nodes.push(node);
        end
    }

    /// Past the nesting limit the interior is kept as one opaque token.
    fn truncated(&self, start: usize, end: usize, depth: usize) -> Vec<Node<'a>> {
        let first = skip_whitespace(self.text, start, end);
        let last = start + self.text[start..end].trim_end().len();
        debug!(start, end, depth, "nesting limit reached, keeping interior as one token");
        if first >= last {
            return Vec::new();
        }
        vec![Node::Unknown(Unknown {
            range: self.token(first, last),
        })]
    }

    /// Nothing attached: end of input, whitespace or a comment right after
    /// the separator.
    fn is_empty_body(&self, at: usize, end: usize) -> bool {
        let rest = &self.text[at.min(end)..end];
        match rest.chars().next() {
            None => true,
            Some(c) if c.is_whitespace() => true,
            Some(_) => rest.starts_with("//") || rest.starts_with("/*"),
        }
    }

    fn variant_span(&self, variant: Variant<'a>, end: usize, depth: usize) -> Node<'a> {
        let range = variant.range();
        let after = range.end;

        if self.is_empty_body(after, end) {
            return Node::VariantSpan(VariantSpan {
                range,
                variant,
                child: None,
            });
        }

        let child = match (self.byte(after, end), self.byte(after + 1, end)) {
            (Some(b'('), _) => self.group(after, false, after, end, depth),
            (Some(b'!'), Some(b'(')) => self.group(after, true, after + 1, end, depth),
            _ => {
                let terminal = find_terminal(self.text, after, end, self.parser.separator());
                self.sequence(after, terminal, depth + 1)
            }
        };

        Node::VariantSpan(VariantSpan {
            range: self.token(range.start, child.range().end.max(after)),
            variant,
            child: Some(Box::new(child)),
        })
    }

    fn group(&self, start: usize, important: bool, open: usize, end: usize, depth: usize) -> Node<'a> {
        let close = find_match(self.text, open, end, PARENS);
        let child = self.sequence(open + 1, close.unwrap_or(end), depth + 1);

        let mut after = close.map_or(end, |close| close + 1);
        let mut important = important;
        if close.is_some() && self.byte(after, end) == Some(b'!') {
            important = true;
            after += 1;
        }

        Node::Group(Group {
            range: self.token(start, after),
            child: Box::new(child),
            closed: close.is_some(),
            important,
        })
    }

    /// `prefix[` forms: arbitrary variant, arbitrary property, arbitrary
    /// style or CSS property, depending on the prefix and what follows `]`.
    fn bracket(
        &self,
        start: usize,
        lead: bool,
        prefix: Token<'a>,
        open: usize,
        end: usize,
        depth: usize,
    ) -> Node<'a> {
        let separator = self.parser.separator();

        let Some(close) = find_match(self.text, open, end, SQUARE) else {
            let content = self.token(open + 1, end);
            let range = self.token(start, end);
            if prefix.is_empty() && !lead {
                let variant = Variant::Arbitrary(ArbitraryVariant {
                    range,
                    child: range,
                    prefix,
                    content,
                    separator: None,
                    closed: false,
                });
                return Node::VariantSpan(VariantSpan {
                    range,
                    variant,
                    child: None,
                });
            }
            let target = self.token(start + usize::from(lead), end);
            return bracket_leaf(range, target, lead, prefix, content, false, None);
        };

        let after = close + 1;
        let content = self.token(open + 1, close);

        if !lead && self.text[after..end].starts_with(separator) {
            let separator_end = after + separator.len();
            let variant = Variant::Arbitrary(ArbitraryVariant {
                range: self.token(start, separator_end),
                child: self.token(start, after),
                prefix,
                content,
                separator: Some(self.token(after, separator_end)),
                closed: true,
            });
            return self.variant_span(variant, end, depth);
        }

        let mut cursor = after;
        let opacity = if prefix.text.ends_with('-') {
            self.opacity(after, end)
        } else {
            None
        };
        if let Some(opacity) = &opacity {
            cursor = opacity.range.end;
        }

        let target_end = cursor;
        let trail = self.byte(cursor, end) == Some(b'!');
        if trail {
            cursor += 1;
        }

        let range = self.token(start, cursor);
        let target = self.token(start + usize::from(lead), target_end);
        bracket_leaf(range, target, lead || trail, prefix, content, true, opacity)
    }

    /// `/50` or `/[0.5]` right after a closed arbitrary value.
    fn opacity(&self, at: usize, end: usize) -> Option<Opacity<'a>> {
        if self.byte(at, end) != Some(b'/') {
            return None;
        }

        if self.byte(at + 1, end) == Some(b'[') {
            let open = at + 1;
            return Some(match find_match(self.text, open, end, SQUARE) {
                Some(close) => Opacity {
                    range: self.token(at, close + 1),
                    value: self.token(open + 1, close),
                    bracketed: true,
                    closed: true,
                },
                None => Opacity {
                    range: self.token(at, end),
                    value: self.token(open + 1, end),
                    bracketed: true,
                    closed: false,
                },
            });
        }

        let digits = self.text.as_bytes()[at + 1..end]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count();
        if digits == 0 {
            return None;
        }
        Some(Opacity {
            range: self.token(at, at + 1 + digits),
            value: self.token(at + 1, at + 1 + digits),
            bracketed: false,
            closed: true,
        })
    }
}

fn bracket_leaf<'a>(
    range: Token<'a>,
    target: Token<'a>,
    important: bool,
    prefix: Token<'a>,
    content: Token<'a>,
    closed: bool,
    opacity: Option<Opacity<'a>>,
) -> Node<'a> {
    if prefix.is_empty() {
        Node::ArbitraryProperty(ArbitraryProperty {
            range,
            target,
            content,
            closed,
            important,
        })
    } else if prefix.text.ends_with('-') || prefix.text.ends_with('/') {
        Node::ArbitraryStyle(ArbitraryStyle {
            range,
            target,
            prop: prefix,
            content,
            closed,
            important,
            opacity,
        })
    } else {
        Node::CssProperty(CssProperty {
            range,
            target,
            prop: prefix,
            content,
            closed,
            important,
        })
    }
}
