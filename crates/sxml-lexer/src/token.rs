use std::fmt;

/// A position in the input stream, tracking line and column for error reporting.
///
/// Lines and columns are zero-based. The cursor points just past the most
/// recently consumed character, so a token's cursor marks where it ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub position: usize,
    pub line: usize,
    pub column: usize,
}

impl Cursor {
    pub fn new(position: usize, line: usize, column: usize) -> Self {
        Self {
            position,
            line,
            column,
        }
    }

    /// Move past `ch`. A newline starts a new line at column 0; every other
    /// character, tabs included, advances the column by one.
    pub fn advance(&mut self, ch: char) {
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A run of character data, or the body of a CDATA section.
    Text,
    /// `<name` of a start tag or an empty-element tag.
    OpeningTag,
    /// `</name>`, or the `/>` that ends an empty-element tag.
    ClosingTag,
    AttributeName,
    AttributeValue,
}

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub cursor: Cursor,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, cursor: Cursor) -> Self {
        Self {
            kind,
            value: value.into(),
            cursor,
        }
    }
}

/// Short markup-like rendering used in diagnostics.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::OpeningTag => write!(f, "<{}>", self.value),
            TokenKind::ClosingTag => write!(f, "</{}>", self.value),
            TokenKind::AttributeName => f.write_str(&self.value),
            TokenKind::AttributeValue => write!(f, "\"{}\"", self.value),
            TokenKind::Text => f.write_str(&self.value),
        }
    }
}
