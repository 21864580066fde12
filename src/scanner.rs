//! One-lexeme-at-a-time scanner built on a single composite pattern.
//!
//! The alternatives are tried in priority order: line comment, block-comment
//! open, variant (`name` + separator), bracket prefix (`name[`), plain class
//! token, group open, and finally any other non-space run. The scanner holds
//! no cursor; callers pass the position in and resume from [`Lexeme::end`].

use regex::{Captures, Regex};

use crate::token::Token;

const LINE_COMMENT: usize = 1;
const BLOCK_COMMENT: usize = 2;
const VARIANT_NAME: usize = 3;
const VARIANT_SEPARATOR: usize = 4;
const BRACKET_BANG: usize = 5;
const BRACKET_PREFIX: usize = 6;
const CLASS_LEAD: usize = 7;
const CLASS_BODY: usize = 8;
const CLASS_TRAIL: usize = 9;
const GROUP_BANG: usize = 10;
const UNHANDLED: usize = 11;

/// Class-token characters. A `/` only counts when a word character follows,
/// which keeps `//` and `/*` out of class names.
const BODY: &str = r"(?:[\w\-.]|/[\w\-.])";

#[derive(Debug, Clone, PartialEq)]
pub enum Lexeme<'a> {
    LineComment(Token<'a>),
    /// The `/*` opener; the caller finds the close.
    BlockComment(Token<'a>),
    Variant {
        identifier: Token<'a>,
        separator: Token<'a>,
    },
    /// `name[`, `!name[` or a bare `[`. `open` is the offset of the `[`.
    BracketPrefix {
        start: usize,
        important: bool,
        prefix: Token<'a>,
        open: usize,
    },
    ClassName {
        range: Token<'a>,
        body: Token<'a>,
        important: bool,
    },
    /// `(` or `!(`. `open` is the offset of the `(`.
    Group {
        start: usize,
        important: bool,
        open: usize,
    },
    Unhandled(Token<'a>),
}

impl Lexeme<'_> {
    /// Offset just past the matched text.
    pub fn end(&self) -> usize {
        match self {
            Lexeme::LineComment(token) | Lexeme::BlockComment(token) | Lexeme::Unhandled(token) => {
                token.end
            }
            Lexeme::Variant { separator, .. } => separator.end,
            Lexeme::BracketPrefix { open, .. } | Lexeme::Group { open, .. } => open + 1,
            Lexeme::ClassName { range, .. } => range.end,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scanner {
    pattern: Regex,
    separator: String,
}

impl Scanner {
    /// Compile the composite pattern for `separator`. The separator is
    /// escaped before it is spliced in, and a variant name ends at the first
    /// separator occurrence.
    pub fn new(separator: &str) -> Result<Self, regex::Error> {
        let separator_pattern = regex::escape(separator);
        let source = format!(
            r"^(?:(//[^\n]*)|(/\*)|([\w-]+?)({separator_pattern})|(!?)({BODY}*/?)\[|(!?)({BODY}+)(!?)|(!?)\(|(\S+))"
        );
        Ok(Self {
            pattern: Regex::new(&source)?,
            separator: separator.to_string(),
        })
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Classify the lexeme starting exactly at `position`, looking no further
    /// than `end`. Returns `None` only when `position` is at or past `end` or
    /// sits on whitespace.
    pub fn scan<'a>(&self, text: &'a str, position: usize, end: usize) -> Option<Lexeme<'a>> {
        if position >= end {
            return None;
        }
        let window = &text[position..end];
        let caps = self.pattern.captures(window)?;
        let token = |group: usize| -> Option<Token<'a>> {
            caps.get(group)
                .map(|m| Token::new(text, position + m.start(), position + m.end()))
        };

        if let Some(comment) = token(LINE_COMMENT) {
            return Some(Lexeme::LineComment(comment));
        }
        if let Some(open) = token(BLOCK_COMMENT) {
            return Some(Lexeme::BlockComment(open));
        }
        if let (Some(identifier), Some(separator)) = (token(VARIANT_NAME), token(VARIANT_SEPARATOR)) {
            return Some(Lexeme::Variant {
                identifier,
                separator,
            });
        }
        if let (Some(bang), Some(prefix)) = (token(BRACKET_BANG), token(BRACKET_PREFIX)) {
            return Some(Lexeme::BracketPrefix {
                start: bang.start,
                important: !bang.is_empty(),
                prefix,
                open: prefix.end,
            });
        }
        if let Some(body) = token(CLASS_BODY) {
            let lead = token(CLASS_LEAD).map_or(false, |t| !t.is_empty());
            let trail = token(CLASS_TRAIL).map_or(false, |t| !t.is_empty());
            let range = whole_match(text, position, &caps);
            return Some(Lexeme::ClassName {
                range,
                body,
                important: lead || trail,
            });
        }
        if let Some(bang) = token(GROUP_BANG) {
            return Some(Lexeme::Group {
                start: bang.start,
                important: !bang.is_empty(),
                open: bang.end,
            });
        }
        token(UNHANDLED).map(Lexeme::Unhandled)
    }
}

fn whole_match<'a>(text: &'a str, position: usize, caps: &Captures<'_>) -> Token<'a> {
    let m = caps.get(0).map_or(0..0, |m| m.range());
    Token::new(text, position + m.start, position + m.end)
}

/// First non-whitespace offset in `[position, end)`, or `end`.
pub fn skip_whitespace(text: &str, position: usize, end: usize) -> usize {
    if position >= end {
        return end;
    }
    text[position..end]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(end, |(offset, _)| position + offset)
}
