//! Tree builder.
//!
//! Consumes tokens one at a time, keeping a pointer to the innermost open
//! element and the name of an attribute still waiting for its value.

use crate::document::{Document, Element, Node, NodeId, NodeKind};
use crate::ParseError;
use sxml_lexer::{Lexer, Token, TokenKind};
use tracing::{debug, trace};

/// Incremental document parser.
///
/// One parser holds one document session. [`Parser::end`] returns the
/// finished [`Document`] and leaves the parser ready for the next one.
#[derive(Debug)]
pub struct Parser {
    document: Document,
    /// Set once the first opening tag has been seen.
    root: Option<NodeId>,
    /// Innermost open element; `None` before the root opens and after it closes.
    last: Option<NodeId>,
    attribute_name: Option<String>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            root: None,
            last: None,
            attribute_name: None,
        }
    }

    /// Parse a complete source document in one call.
    pub fn parse(source: &str) -> Result<Document, ParseError> {
        let tokens = Lexer::tokenize(source)?;

        let mut parser = Parser::new();
        parser.end(Some(tokens))
    }

    /// Process tokens in order and return the ids of the nodes they created.
    ///
    /// Attribute tokens create no nodes.
    pub fn write(
        &mut self,
        tokens: impl IntoIterator<Item = Token>,
    ) -> Result<Vec<NodeId>, ParseError> {
        let mut created = Vec::new();

        for token in tokens {
            if let Some(id) = self.handle(token)? {
                created.push(id);
            }
        }

        Ok(created)
    }

    /// Process optional final tokens and return the finished document.
    ///
    /// Fails with "document incomplete" while an element is still open or
    /// when no root element was ever opened.
    pub fn end(&mut self, tokens: Option<Vec<Token>>) -> Result<Document, ParseError> {
        if let Some(tokens) = tokens {
            self.write(tokens)?;
        }

        if self.root.is_none() || self.last.is_some() {
            debug!(open = ?self.last, "document incomplete");
            return Err(ParseError::new("document incomplete"));
        }

        let document = std::mem::replace(&mut self.document, Document::new());
        debug!(nodes = document.len(), "parser session ended");
        self.reset();

        Ok(document)
    }

    /// Discard the current session.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Look up a node created so far in this session.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.document.get(id)
    }

    fn handle(&mut self, token: Token) -> Result<Option<NodeId>, ParseError> {
        match token.kind {
            TokenKind::OpeningTag => {
                self.expect_no_pending_attribute(&token)?;

                let parent = match (self.root, self.last) {
                    (None, _) => None,
                    (Some(_), Some(last)) => Some(last),
                    (Some(_), None) => {
                        return Err(Self::error(
                            "unexpected content after document end",
                            &token,
                        ))
                    }
                };

                let id = self
                    .document
                    .append(parent, NodeKind::Element(Element::new(token.value)));
                trace!(?id, ?parent, "element opened");

                self.root.get_or_insert(id);
                self.last = Some(id);

                Ok(Some(id))
            }

            TokenKind::ClosingTag => {
                let Some(last) = self.last else {
                    return Err(Self::error(
                        "unexpected content after document end",
                        &token,
                    ));
                };

                let open = self.open_element(last);
                if open.name != token.value {
                    let expected = open.name.clone();
                    debug!(%expected, got = %token.value, "mismatched closing tag");
                    return Err(
                        ParseError::new("closing tag does not match opening tag")
                            .at(token.cursor)
                            .expected(expected)
                            .got(token.value),
                    );
                }

                self.last = self.document.parent(last);
                trace!(id = ?last, "element closed");

                Ok(None)
            }

            TokenKind::AttributeName => {
                self.expect_no_pending_attribute(&token)?;

                let Some(last) = self.last else {
                    return Err(Self::error("attribute outside of an element", &token));
                };

                self.open_element_mut(last)
                    .attributes
                    .set(token.value.clone(), None);
                self.attribute_name = Some(token.value);

                Ok(None)
            }

            TokenKind::AttributeValue => {
                let (Some(last), Some(name)) = (self.last, self.attribute_name.take()) else {
                    return Err(Self::error("attribute value without a name", &token));
                };

                self.open_element_mut(last)
                    .attributes
                    .set(name, Some(token.value));

                Ok(None)
            }

            TokenKind::Text => {
                self.expect_no_pending_attribute(&token)?;

                let Some(last) = self.last else {
                    let message = if self.root.is_some() {
                        "unexpected content after document end"
                    } else {
                        "unexpected text before the document element"
                    };
                    return Err(Self::error(message, &token));
                };

                let id = self
                    .document
                    .append(Some(last), NodeKind::Text(token.value));
                trace!(?id, parent = ?last, "text appended");

                Ok(Some(id))
            }
        }
    }

    // --- Helpers ---

    fn expect_no_pending_attribute(&self, token: &Token) -> Result<(), ParseError> {
        match self.attribute_name {
            Some(_) => Err(Self::error("expected attribute value", token)),
            None => Ok(()),
        }
    }

    fn open_element(&self, id: NodeId) -> &Element {
        self.document
            .element(id)
            .expect("open node is always an element")
    }

    fn open_element_mut(&mut self, id: NodeId) -> &mut Element {
        self.document
            .element_mut(id)
            .expect("open node is always an element")
    }

    fn error(message: &str, token: &Token) -> ParseError {
        debug!(reason = message, %token, cursor = %token.cursor, "parse error");
        ParseError::new(message)
            .at(token.cursor)
            .got(token.to_string())
    }
}
