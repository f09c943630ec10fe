//! sxml Serializer
//!
//! Renders a parsed [`Document`] back to markup text, and renders single
//! tokens for diagnostics.
//!
//! Nested elements are placed on their own line, indented with one tab per
//! level. Text is written verbatim; nothing is escaped.
//!
//! ```text
//! Document → serialize() → "<a>\n\t<b>x</b>\t\n</a>"
//! ```

use sxml_lexer::Token;
use sxml_parser::{Document, Element, NodeId, NodeKind};

/// Serialize a whole document, starting from its root element.
pub fn serialize(doc: &Document) -> String {
    serialize_node(doc, doc.root(), 0)
}

/// Serialize the subtree at `id` as if it sat `depth` levels deep.
///
/// Unknown ids serialize to an empty string.
pub fn serialize_node(doc: &Document, id: NodeId, depth: usize) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out, depth);
    out
}

/// Short rendering of a token for error messages.
pub fn serialize_token(token: &Token) -> String {
    token.to_string()
}

fn write_node(doc: &Document, id: NodeId, out: &mut String, depth: usize) {
    match doc.get(id).map(|node| &node.kind) {
        Some(NodeKind::Element(el)) => write_element(doc, el, out, depth),
        Some(NodeKind::Text(text)) => out.push_str(text),
        None => {}
    }
}

fn write_element(doc: &Document, el: &Element, out: &mut String, depth: usize) {
    let indent = "\t".repeat(depth);

    if depth > 0 {
        out.push('\n');
    }

    // Opening tag
    out.push_str(&indent);
    out.push('<');
    out.push_str(&el.name);
    for (name, value) in el.attributes.iter() {
        write_attribute(name, value, out);
    }
    out.push('>');

    for child in &el.children {
        write_node(doc, *child, out, depth + 1);
    }

    // Closing tag
    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
    out.push_str(&indent);

    if depth > 0 {
        out.push('\n');
    }
}

/// Value-less attributes are written as a bare name. A value containing a
/// double quote but no single quote is single-quoted.
fn write_attribute(name: &str, value: Option<&str>, out: &mut String) {
    out.push(' ');
    out.push_str(name);

    let Some(value) = value else {
        return;
    };

    let quote = if value.contains('"') && !value.contains('\'') {
        '\''
    } else {
        '"'
    };
    out.push('=');
    out.push(quote);
    out.push_str(value);
    out.push(quote);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sxml_lexer::{Cursor, TokenKind};
    use sxml_parser::Parser;

    fn round(source: &str) -> String {
        serialize(&Parser::parse(source).unwrap())
    }

    // =========================================================================
    // Elements
    // =========================================================================

    #[test]
    fn test_single_element() {
        assert_eq!(round("<a/>"), "<a></a>");
    }

    #[test]
    fn test_nested_elements_are_indented() {
        assert_eq!(round("<a><b>x</b></a>"), "<a>\n\t<b>x</b>\t\n</a>");
    }

    #[test]
    fn test_two_levels_of_nesting() {
        assert_eq!(
            round("<a><b><c/></b></a>"),
            "<a>\n\t<b>\n\t\t<c></c>\t\t\n</b>\t\n</a>"
        );
    }

    #[test]
    fn test_text_is_verbatim() {
        assert_eq!(round("<a> x = 'y' / z </a>"), "<a> x = 'y' / z </a>");
    }

    #[test]
    fn test_serialize_node_at_depth() {
        let doc = Parser::parse("<a><b k=\"v\"/></a>").unwrap();
        let b = doc.children(doc.root())[0];
        assert_eq!(serialize_node(&doc, b, 0), "<b k=\"v\"></b>");
        assert_eq!(serialize_node(&doc, b, 2), "\n\t\t<b k=\"v\"></b>\t\t\n");
    }

    #[test]
    fn test_serialize_text_node() {
        let doc = Parser::parse("<a>hi</a>").unwrap();
        let text = doc.children(doc.root())[0];
        assert_eq!(serialize_node(&doc, text, 3), "hi");
    }

    #[test]
    fn test_unknown_node_is_empty() {
        let doc = Parser::parse("<a/>").unwrap();
        assert_eq!(serialize_node(&doc, NodeId(42), 0), "");
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    #[test]
    fn test_attributes_in_order() {
        assert_eq!(round("<a z=\"1\" b='2'/>"), "<a z=\"1\" b=\"2\"></a>");
    }

    #[test]
    fn test_valueless_attribute_is_bare() {
        assert_eq!(
            round("<input k=\"\" disabled/>"),
            "<input k=\"\" disabled></input>"
        );
    }

    #[test]
    fn test_value_with_double_quote_uses_single_quotes() {
        assert_eq!(round("<a k='say \"hi\"'/>"), "<a k='say \"hi\"'></a>");
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    #[test]
    fn test_serialize_token() {
        let at = Cursor::default();
        let render = |kind, value| serialize_token(&Token::new(kind, value, at));
        assert_eq!(render(TokenKind::OpeningTag, "a"), "<a>");
        assert_eq!(render(TokenKind::ClosingTag, "a"), "</a>");
        assert_eq!(render(TokenKind::AttributeName, "k"), "k");
        assert_eq!(render(TokenKind::AttributeValue, "v"), "\"v\"");
        assert_eq!(render(TokenKind::Text, "raw"), "raw");
    }
}
