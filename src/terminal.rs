//! Extent of the single token attached to a variant that is not directly
//! followed by a group, e.g. `underline` in `hover:underline` or
//! `dark:(a b)` in `md:dark:(a b)`.

use crate::brackets::find_block_comment_end;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Plain,
    Bracket,
    SingleQuoted,
    DoubleQuoted,
    AfterValue,
    Paren,
}

/// Offset where the variant body starting at `start` ends, bounded by `end`.
pub fn find_terminal(text: &str, start: usize, end: usize, separator: &str) -> usize {
    let bytes = text.as_bytes();
    let end = end.min(bytes.len());
    let mut state = State::Plain;
    let mut depth = 0usize;
    let mut i = start;

    while i < end {
        let byte = bytes[i];
        let next = if i + 1 < end { Some(bytes[i + 1]) } else { None };
        match state {
            State::Plain => {
                if byte.is_ascii_whitespace() {
                    return i;
                }
                match byte {
                    b'[' => {
                        state = State::Bracket;
                        depth = 1;
                    }
                    b'(' if opens_group(bytes, start, i, separator.as_bytes()) => {
                        state = State::Paren;
                        depth = 1;
                    }
                    b'/' if next == Some(b'/') => return i,
                    b'/' if next == Some(b'*') => {
                        match find_block_comment_end(text, i + 2, end) {
                            Some(after) => {
                                i = after;
                                continue;
                            }
                            None => return end,
                        }
                    }
                    _ => {}
                }
            }
            State::Bracket => match byte {
                b'[' => depth += 1,
                b']' => {
                    depth -= 1;
                    if depth == 0 {
                        state = State::AfterValue;
                    }
                }
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                _ => {}
            },
            State::SingleQuoted | State::DoubleQuoted => {
                let quote = if state == State::SingleQuoted { b'\'' } else { b'"' };
                if byte == b'\\' {
                    i += 2;
                    continue;
                }
                if byte == quote {
                    state = State::Bracket;
                }
            }
            State::AfterValue => {
                if byte == b'!' {
                    return i + 1;
                }
                if byte.is_ascii_whitespace() {
                    return i;
                }
                state = State::Plain;
                continue;
            }
            State::Paren => match byte {
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        state = State::AfterValue;
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }

    end
}

/// A `(` starts a nested group when it directly follows a separator (or the
/// start of the body), optionally with one `!` in between.
fn opens_group(bytes: &[u8], start: usize, at: usize, separator: &[u8]) -> bool {
    let at = if at > start && bytes[at - 1] == b'!' { at - 1 } else { at };
    at == start || (at >= start + separator.len() && &bytes[at - separator.len()..at] == separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal(text: &str, start: usize) -> &str {
        let end = find_terminal(text, start, text.len(), ":");
        &text[start..end]
    }

    #[test]
    fn test_plain_token_stops_at_whitespace() {
        assert_eq!(terminal("hover:underline flex", 6), "underline");
        assert_eq!(terminal("hover:underline", 6), "underline");
    }

    #[test]
    fn test_variant_chain() {
        assert_eq!(terminal("md:dark:hover:text-gray-500 p-2", 3), "dark:hover:text-gray-500");
    }

    #[test]
    fn test_nested_group_after_separator() {
        let text = "md:dark:(hover:(a b) c)! next";
        assert_eq!(terminal(text, 3), "dark:(hover:(a b) c)!");
    }

    #[test]
    fn test_paren_inside_class_is_not_a_group() {
        assert_eq!(terminal("hover:foo(bar baz)", 6), "foo(bar");
    }

    #[test]
    fn test_important_group_after_separator() {
        assert_eq!(terminal("md:!(a b) c", 3), "!(a b)");
    }

    #[test]
    fn test_bracket_value_with_spaces_and_quotes() {
        assert_eq!(terminal("hover:content-['a b'] x", 6), "content-['a b']");
        assert_eq!(terminal("hover:grid-cols-[1fr_auto] x", 6), "grid-cols-[1fr_auto]");
        assert_eq!(terminal("lg:w-[calc(100% - 2px)]! x", 3), "w-[calc(100% - 2px)]!");
    }

    #[test]
    fn test_value_followed_by_opacity() {
        assert_eq!(terminal("hover:bg-[red]/50 x", 6), "bg-[red]/50");
    }

    #[test]
    fn test_unterminated_runs_to_end() {
        assert_eq!(terminal("lg:w-[10px", 3), "w-[10px");
        assert_eq!(terminal("lg:dark:(a b", 3), "dark:(a b");
    }

    #[test]
    fn test_comments_end_or_are_skipped() {
        assert_eq!(terminal("lg:flex// note", 3), "flex");
        assert_eq!(terminal("lg:flex/* a b */ x", 3), "flex/* a b */");
    }

    #[test]
    fn test_respects_bound() {
        let text = "lg:underline";
        assert_eq!(find_terminal(text, 3, 7, ":"), 7);
    }
}
