use crate::token::{Cursor, Token, TokenKind};
use crate::LexError;
use tracing::{debug, trace};

/// Opens a CDATA section when it is the complete content of a tag name.
const CDATA_OPEN: &str = "![CDATA[";
/// Closes a CDATA section.
const CDATA_CLOSE: &str = "]]>";

/// Lexer state between two characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Data,
    CData,
    TagBegin,
    TagName,
    TagEnd,
    AttributeNameStart,
    AttributeName,
    AttributeNameEnd,
    AttributeValueBegin,
    AttributeValue,
}

/// Character class used to pick a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    LessThan,
    GreaterThan,
    Space,
    Equal,
    Quote,
    Slash,
    Char,
}

impl Action {
    fn classify(ch: char) -> Self {
        match ch {
            '<' => Action::LessThan,
            '>' => Action::GreaterThan,
            ' ' | '\t' | '\n' | '\r' => Action::Space,
            '=' => Action::Equal,
            '"' | '\'' => Action::Quote,
            '/' => Action::Slash,
            _ => Action::Char,
        }
    }
}

/// Incremental markup tokenizer.
///
/// A finite-state machine that consumes one character at a time and emits a
/// token whenever a lexical unit completes. All session state (the current
/// state, the `tag` and `value` buffers, the closing-tag flag, the opening
/// quote and the cursor) survives between calls to [`Lexer::write`], which is
/// what makes chunk boundaries irrelevant.
///
/// A fatal [`LexError`] leaves the session as it was at the failing
/// character. Call [`Lexer::reset`] before feeding another document.
#[derive(Debug, Clone)]
pub struct Lexer {
    state: State,
    tag: String,
    value: String,
    is_closing_tag: bool,
    opening_quote: Option<char>,
    cursor: Cursor,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    /// Create a lexer positioned at the start of a document.
    pub fn new() -> Self {
        Self {
            state: State::Data,
            tag: String::new(),
            value: String::new(),
            is_closing_tag: false,
            opening_quote: None,
            cursor: Cursor::default(),
        }
    }

    /// Tokenize a complete document in one call.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
        Lexer::new().end(Some(source))
    }

    /// Feed a chunk of input and return the tokens it completed, in order.
    pub fn write(&mut self, chunk: &str) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        for ch in chunk.chars() {
            if let Some(token) = self.step(ch)? {
                tokens.push(token);
            }
        }

        Ok(tokens)
    }

    /// Feed an optional final chunk, then reset for the next document.
    ///
    /// Input still buffered when the session ends (trailing text, an
    /// unterminated tag) is discarded without a token.
    pub fn end(&mut self, chunk: Option<&str>) -> Result<Vec<Token>, LexError> {
        let tokens = match chunk {
            Some(chunk) => self.write(chunk)?,
            None => Vec::new(),
        };

        debug!(position = self.cursor.position, "lexer session ended");
        self.reset();

        Ok(tokens)
    }

    /// Discard all session state and return to the start of a document.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Position just past the last consumed character.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Consume a single character.
    fn step(&mut self, ch: char) -> Result<Option<Token>, LexError> {
        self.cursor.advance(ch);

        let action = Action::classify(ch);

        match (self.state, action) {
            // --- Character data ---
            (State::Data, Action::LessThan) => {
                self.is_closing_tag = false;
                self.state = State::TagBegin;

                let text = std::mem::take(&mut self.value);
                if text.trim().is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(self.emit(TokenKind::Text, text)))
                }
            }
            (State::Data, _) => {
                self.value.push(ch);
                Ok(None)
            }

            (State::CData, _) => {
                self.value.push(ch);
                if !self.value.ends_with(CDATA_CLOSE) {
                    return Ok(None);
                }

                self.value.truncate(self.value.len() - CDATA_CLOSE.len());
                self.state = State::Data;

                let text = std::mem::take(&mut self.value);
                Ok(Some(self.emit(TokenKind::Text, text)))
            }

            // --- Tags ---
            (State::TagBegin, Action::Space) => Ok(None),
            (State::TagBegin, Action::Slash) => {
                self.is_closing_tag = true;
                Ok(None)
            }
            (State::TagBegin, Action::Char) => {
                self.tag.clear();
                self.tag.push(ch);
                self.state = State::TagName;
                Ok(None)
            }
            (
                State::TagBegin,
                Action::LessThan | Action::GreaterThan | Action::Equal | Action::Quote,
            ) => Err(self.error("expected '/' or tag name")),

            (State::TagName, Action::Space) => {
                if self.is_closing_tag {
                    self.state = State::TagEnd;
                    Ok(None)
                } else {
                    self.state = State::AttributeNameStart;
                    Ok(Some(self.emit(TokenKind::OpeningTag, self.tag.clone())))
                }
            }
            (State::TagName, Action::GreaterThan) => {
                self.state = State::Data;
                if self.is_closing_tag {
                    let tag = std::mem::take(&mut self.tag);
                    Ok(Some(self.emit(TokenKind::ClosingTag, tag)))
                } else {
                    Ok(Some(self.emit(TokenKind::OpeningTag, self.tag.clone())))
                }
            }
            // Empty-element tag: the name stays buffered for the closing token.
            (State::TagName, Action::Slash) => {
                self.state = State::TagEnd;
                Ok(Some(self.emit(TokenKind::OpeningTag, self.tag.clone())))
            }
            (State::TagName, Action::Char) => {
                self.tag.push(ch);
                if self.tag == CDATA_OPEN {
                    self.tag.clear();
                    self.state = State::CData;
                }
                Ok(None)
            }
            (State::TagName, Action::LessThan | Action::Equal | Action::Quote) => {
                Err(self.error("markup characters must be escaped in a tag name"))
            }

            (State::TagEnd, Action::GreaterThan) => {
                self.state = State::Data;
                let tag = std::mem::take(&mut self.tag);
                Ok(Some(self.emit(TokenKind::ClosingTag, tag)))
            }
            (State::TagEnd, _) => Err(self.error("expected '>' to close the tag")),

            // --- Attribute names ---
            (State::AttributeNameStart, Action::Space) => Ok(None),
            // `<a >` is tolerated: nothing is pending, so just leave the tag.
            (State::AttributeNameStart, Action::GreaterThan) => {
                self.value.clear();
                self.state = State::Data;
                Ok(None)
            }
            (State::AttributeNameStart, Action::Slash) => {
                self.is_closing_tag = true;
                self.state = State::TagEnd;
                Ok(None)
            }
            (State::AttributeNameStart, _) => {
                self.value.clear();
                self.value.push(ch);
                self.state = State::AttributeName;
                Ok(None)
            }

            (State::AttributeName, Action::Space) => {
                self.state = State::AttributeNameEnd;
                Ok(None)
            }
            (State::AttributeNameEnd, Action::Space) => Ok(None),
            (State::AttributeName | State::AttributeNameEnd, Action::Equal) => {
                Ok(Some(self.attribute_name(State::AttributeValueBegin)))
            }
            (State::AttributeName | State::AttributeNameEnd, Action::GreaterThan) => {
                Ok(Some(self.attribute_name(State::Data)))
            }
            (State::AttributeName | State::AttributeNameEnd, Action::Slash) => {
                self.is_closing_tag = true;
                Ok(Some(self.attribute_name(State::TagEnd)))
            }
            (State::AttributeName, _) => {
                self.value.push(ch);
                Ok(None)
            }
            // Whitespace-separated value-less attributes: `<input a b>`.
            (State::AttributeNameEnd, _) => {
                let token = self.attribute_name(State::AttributeName);
                self.value.push(ch);
                Ok(Some(token))
            }

            // --- Attribute values ---
            (State::AttributeValueBegin, Action::Space) => Ok(None),
            (State::AttributeValueBegin, Action::Quote) => {
                self.opening_quote = Some(ch);
                self.value.clear();
                self.state = State::AttributeValue;
                Ok(None)
            }
            // `<a k=>` is tolerated: the name is left without a value.
            (State::AttributeValueBegin, Action::GreaterThan) => {
                self.state = State::Data;
                Ok(None)
            }
            (State::AttributeValueBegin, _) => {
                self.opening_quote = None;
                self.value.clear();
                self.value.push(ch);
                self.state = State::AttributeValue;
                Ok(None)
            }

            (State::AttributeValue, Action::Quote) if self.opening_quote == Some(ch) => {
                Ok(Some(self.attribute_value(State::AttributeNameStart)))
            }
            (State::AttributeValue, Action::Space) if self.opening_quote.is_none() => {
                Ok(Some(self.attribute_value(State::AttributeNameStart)))
            }
            (State::AttributeValue, Action::GreaterThan) if self.opening_quote.is_none() => {
                Ok(Some(self.attribute_value(State::Data)))
            }
            (State::AttributeValue, Action::Slash) if self.opening_quote.is_none() => {
                self.is_closing_tag = true;
                Ok(Some(self.attribute_value(State::TagEnd)))
            }
            (State::AttributeValue, _) => {
                self.value.push(ch);
                Ok(None)
            }
        }
    }

    // --- Helpers ---

    fn attribute_name(&mut self, next: State) -> Token {
        self.state = next;
        let name = std::mem::take(&mut self.value);
        self.emit(TokenKind::AttributeName, name)
    }

    fn attribute_value(&mut self, next: State) -> Token {
        self.state = next;
        let value = std::mem::take(&mut self.value);
        self.emit(TokenKind::AttributeValue, value)
    }

    fn emit(&self, kind: TokenKind, value: String) -> Token {
        trace!(?kind, %value, position = self.cursor.position, "token");
        Token::new(kind, value, self.cursor)
    }

    fn error(&self, message: &str) -> LexError {
        debug!(state = ?self.state, cursor = %self.cursor, reason = message, "lexer error");
        LexError {
            message: message.to_string(),
            cursor: self.cursor,
        }
    }
}
