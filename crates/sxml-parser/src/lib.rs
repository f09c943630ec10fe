//! sxml Parser
//!
//! Builds a [`Document`] tree from the token stream produced by `sxml-lexer`.
//! Like the lexer, the parser is incremental: tokens may be fed in any number
//! of `write` calls, and `end` hands back the finished document.
//!
//! # Example
//!
//! ```
//! use sxml_parser::Parser;
//!
//! let doc = Parser::parse("<a k=\"v\"><b>x</b></a>").unwrap();
//! assert_eq!(doc.root_element().name, "a");
//! assert_eq!(doc.text_content(doc.root()), "x");
//! ```

pub mod document;
pub mod parser;

pub use document::{Attributes, Document, Element, Node, NodeId, NodeKind};
pub use parser::Parser;

use sxml_lexer::{Cursor, LexError};

/// Parser error with optional position and expected/actual context.
///
/// Fatal for the current session: the parser must be reset before reuse.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Parse error{}: {message}{}", location(.cursor), context(.expected, .got))]
pub struct ParseError {
    pub message: String,
    pub cursor: Option<Cursor>,
    pub expected: Option<String>,
    pub got: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cursor: None,
            expected: None,
            got: None,
        }
    }

    pub fn at(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::new(err.message).at(err.cursor)
    }
}

fn location(cursor: &Option<Cursor>) -> String {
    match cursor {
        Some(cursor) => format!(" at {cursor}"),
        None => String::new(),
    }
}

fn context(expected: &Option<String>, got: &Option<String>) -> String {
    match (expected, got) {
        (Some(expected), Some(got)) => format!(" (expected \"{expected}\", got \"{got}\")"),
        (Some(expected), None) => format!(" (expected \"{expected}\")"),
        (None, Some(got)) => format!(" (got \"{got}\")"),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_bare_message() {
        assert_eq!(
            ParseError::new("document incomplete").to_string(),
            "Parse error: document incomplete"
        );
    }

    #[test]
    fn test_display_with_cursor_and_context() {
        let err = ParseError::new("closing tag does not match opening tag")
            .at(Cursor::new(7, 0, 7))
            .expected("a")
            .got("b");
        assert_eq!(
            err.to_string(),
            "Parse error at line 0, column 7: closing tag does not match opening tag \
             (expected \"a\", got \"b\")"
        );
    }

    #[test]
    fn test_display_got_only() {
        let err = ParseError::new("expected attribute value").got("<b>");
        assert_eq!(
            err.to_string(),
            "Parse error: expected attribute value (got \"<b>\")"
        );
    }

    #[test]
    fn test_from_lex_error_keeps_cursor() {
        let lex = LexError {
            message: "expected '>' to close the tag".into(),
            cursor: Cursor::new(4, 0, 4),
        };
        let err = ParseError::from(lex);
        assert_eq!(err.message, "expected '>' to close the tag");
        assert_eq!(err.cursor, Some(Cursor::new(4, 0, 4)));
    }
}
