use serde::Serialize;

/// A half-open byte range `[start, end)` over the source text together with
/// the exact substring it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Token<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    /// Build a token over `source[start..end]`.
    ///
    /// Both offsets must lie on character boundaries; every caller in this
    /// crate derives them from ASCII delimiters or regex match bounds.
    pub fn new(source: &'a str, start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            text: &source[start..end],
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Strict containment, `start <= position < end`.
    pub fn contains(&self, position: usize) -> bool {
        self.start <= position && position < self.end
    }

    /// Cursor containment for completion, `start < position <= end`: the
    /// cursor is inside the token or sits right after its last character.
    pub fn touches(&self, position: usize) -> bool {
        self.start < position && position <= self.end
    }

    /// Sub-token by absolute offsets. Offsets outside this token are clamped.
    pub fn slice(&self, start: usize, end: usize) -> Token<'a> {
        let start = start.clamp(self.start, self.end);
        let end = end.clamp(start, self.end);
        let from = floor_boundary(self.text, start - self.start);
        let to = floor_boundary(self.text, end - self.start).max(from);
        Token {
            start: self.start + from,
            end: self.start + to,
            text: &self.text[from..to],
        }
    }

    /// The part of this token that precedes `position`.
    pub fn prefix_to(&self, position: usize) -> Token<'a> {
        self.slice(self.start, position)
    }
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text)
    }
}

/// Largest character boundary in `text` that is `<= offset`.
pub(crate) fn floor_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
