//! sxml Lexer
//!
//! Tokenizes XML-style markup incrementally. Input may arrive in chunks of any
//! size; buffers, flags and the cursor persist between `write` calls, so the
//! token stream does not depend on where the input was split.
//!
//! # Example
//!
//! ```
//! use sxml_lexer::{Lexer, TokenKind};
//!
//! let mut lexer = Lexer::new();
//! let mut tokens = lexer.write("<gre").unwrap();
//! tokens.extend(lexer.end(Some("eting>hi</greeting>")).unwrap());
//!
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [TokenKind::OpeningTag, TokenKind::Text, TokenKind::ClosingTag]
//! );
//! ```

pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{Cursor, Token, TokenKind};

/// Lexer error with position information.
///
/// Fatal for the current session: the lexer must be reset before reuse.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Lexer error at {cursor}: {message}")]
pub struct LexError {
    pub message: String,
    pub cursor: Cursor,
}
