//! Bracket matching over raw class-expression text.
//!
//! Nesting is only counted outside quoted strings, comments and the argument
//! list of `url(...)`, so that `bg-[url(a)b)]` or `content-[')']` close where
//! a reader expects them to.

pub const PARENS: (u8, u8) = (b'(', b')');
pub const SQUARE: (u8, u8) = (b'[', b']');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comment {
    None,
    Line,
    Block,
}

pub(crate) fn is_word(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Tracks the literal `url(` and reports when its argument list is open.
///
/// States: 0 idle, 1 saw `u` after a non-word byte, 2 saw `ur`, 3 saw `url`,
/// 4 inside the argument list.
#[derive(Debug, Default, Clone, Copy)]
struct UrlState(u8);

impl UrlState {
    fn inside(self) -> bool {
        self.0 == 4
    }

    fn step(&mut self, previous: Option<u8>, byte: u8) -> bool {
        self.0 = match (self.0, byte) {
            (0, b'u') if previous.map_or(true, |p| !is_word(p)) => 1,
            (1, b'r') => 2,
            (2, b'l') => 3,
            (3, b'(') => 4,
            (4, b')') => 0,
            (4, _) => 4,
            (_, b'u') if previous.map_or(true, |p| !is_word(p)) => 1,
            _ => 0,
        };
        self.0 == 4 && byte == b'('
    }
}

/// Offset of the bracket closing the one at `open`, searching no further
/// than `end`. `text[open]` must be `pair.0`.
pub fn find_match(text: &str, open: usize, end: usize, pair: (u8, u8)) -> Option<usize> {
    let bytes = text.as_bytes();
    let end = end.min(bytes.len());
    if open >= end || bytes[open] != pair.0 {
        return None;
    }

    let mut depth = 0usize;
    let mut quote = Quote::None;
    let mut comment = Comment::None;
    let mut url = UrlState::default();
    let mut i = open;

    while i < end {
        let byte = bytes[i];
        let next = bytes.get(i + 1).copied().filter(|_| i + 1 < end);

        match quote {
            Quote::Single | Quote::Double => {
                if byte == b'\\' {
                    i += 2;
                    continue;
                }
                if (quote == Quote::Single && byte == b'\'')
                    || (quote == Quote::Double && byte == b'"')
                {
                    quote = Quote::None;
                }
                i += 1;
                continue;
            }
            Quote::None => {}
        }

        match comment {
            Comment::Line => {
                if byte == b'\n' {
                    comment = Comment::None;
                }
                i += 1;
                continue;
            }
            Comment::Block => {
                if byte == b'*' && next == Some(b'/') {
                    comment = Comment::None;
                    i += 2;
                } else {
                    i += 1;
                }
                continue;
            }
            Comment::None => {}
        }

        if url.inside() {
            match byte {
                b'\'' => quote = Quote::Single,
                b'"' => quote = Quote::Double,
                _ => {
                    url.step(None, byte);
                }
            }
            i += 1;
            continue;
        }

        match byte {
            b'\'' => quote = Quote::Single,
            b'"' => quote = Quote::Double,
            b'/' if next == Some(b'/') => {
                comment = Comment::Line;
                i += 2;
                continue;
            }
            b'/' if next == Some(b'*') => {
                comment = Comment::Block;
                i += 2;
                continue;
            }
            _ => {}
        }

        let previous = if i > 0 { Some(bytes[i - 1]) } else { None };
        let opened_url = url.step(previous, byte);

        if !opened_url {
            if byte == pair.0 {
                depth += 1;
            } else if byte == pair.1 {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
        }
        i += 1;
    }

    None
}

/// Offset just past the `*/` that closes a block comment whose body starts
/// at `from`, or `None` when the comment runs past `end`.
pub fn find_block_comment_end(text: &str, from: usize, end: usize) -> Option<usize> {
    let end = end.min(text.len());
    if from > end {
        return None;
    }
    text.as_bytes()[from..end]
        .windows(2)
        .position(|window| window == b"*/")
        .map(|offset| from + offset + 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(text: &str, pair: (u8, u8)) -> Option<usize> {
        let open = text.find(pair.0 as char).unwrap();
        find_match(text, open, text.len(), pair)
    }

    #[test]
    fn test_simple_parens() {
        assert_eq!(close("(a b)", PARENS), Some(4));
        assert_eq!(close("x:(a (b) c) d", PARENS), Some(10));
    }

    #[test]
    fn test_unbalanced_returns_none() {
        assert_eq!(close("(a (b)", PARENS), None);
        assert_eq!(close("[abc", SQUARE), None);
    }

    #[test]
    fn test_respects_end_bound() {
        let text = "(abc)";
        assert_eq!(find_match(text, 0, 4, PARENS), None);
        assert_eq!(find_match(text, 0, 5, PARENS), Some(4));
    }

    #[test]
    fn test_quotes_suppress_counting() {
        assert_eq!(close("content-[']']", SQUARE), Some(12));
        assert_eq!(close(r#"content-["a\"]"]"#, SQUARE), Some(15));
        assert_eq!(close("(a ')' b)", PARENS), Some(8));
    }

    #[test]
    fn test_comments_suppress_counting() {
        assert_eq!(close("(a /* ) */ b)", PARENS), Some(12));
        assert_eq!(close("(a // )\n b)", PARENS), Some(10));
    }

    #[test]
    fn test_url_arguments_are_opaque() {
        let text = "bg-[url(//x.png)]";
        assert_eq!(close(text, SQUARE), Some(16));
        let text = "bg-[url(a]b)]";
        assert_eq!(close(text, SQUARE), Some(12));
    }

    #[test]
    fn test_url_parens_do_not_unbalance_groups() {
        let text = "(bg-[url(a.png)] p-4)";
        assert_eq!(close(text, PARENS), Some(20));
    }

    #[test]
    fn test_url_needs_non_word_prefix() {
        // `curl(` is an ordinary call, its parens count
        let text = "(curl(a) b)";
        assert_eq!(close(text, PARENS), Some(10));
    }

    #[test]
    fn test_wrong_opening_byte() {
        assert_eq!(find_match("abc", 0, 3, PARENS), None);
        assert_eq!(find_match("", 0, 0, PARENS), None);
    }

    #[test]
    fn test_block_comment_end() {
        let text = "a /* b */ c";
        assert_eq!(find_block_comment_end(text, 4, text.len()), Some(9));
        assert_eq!(find_block_comment_end("/* open", 2, 7), None);
        assert_eq!(find_block_comment_end("/**/", 2, 4), Some(4));
    }
}
