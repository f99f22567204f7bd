//! XML parser implementation

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::xml::cursor::Cursor;
use crate::xml::model::{Content, Document, Element};

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(input),
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        self.cursor.skip_whitespace();
        let root = self.parse_element()?;
        self.cursor.skip_whitespace();

        if !self.cursor.is_eof() {
            return Err(self.error_here(ErrorKind::InvalidToken, "trailing content after root"));
        }

        Ok(Document { root })
    }

    fn parse_element(&mut self) -> Result<Element> {
        self.expect_byte(b'<')?;

        if self.cursor.current() == Some(b'?') {
            self.skip_processing_instruction()?;
            self.cursor.skip_whitespace();
            return self.parse_element();
        }

        if self.cursor.current() == Some(b'!') {
            self.skip_declaration_or_comment()?;
            self.cursor.skip_whitespace();
            return self.parse_element();
        }

        if self.cursor.current() == Some(b'/') {
            return Err(self.error_here(ErrorKind::MismatchedTag, "unexpected closing tag"));
        }

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        if self.cursor.current() == Some(b'/') {
            self.cursor.advance();
            self.expect_byte(b'>')?;
            return Ok(Element {
                name,
                attributes,
                children: Vec::new(),
            });
        }

        self.expect_byte(b'>')?;

        let mut children = Vec::new();
        loop {
            if self.cursor.current() == Some(b'<') && self.cursor.peek(1) == Some(b'/') {
                self.cursor.advance_by(2);
                let close_name = self.parse_name()?;
                if close_name != name {
                    return Err(self.error_here(
                        ErrorKind::MismatchedTag,
                        format!("expected </{name}>, found </{close_name}>"),
                    ));
                }
                self.cursor.skip_whitespace();
                self.expect_byte(b'>')?;
                break;
            }

            if self.cursor.peek_bytes(9) == Some(b"<![CDATA[".as_slice()) {
                self.cursor.advance_by(9);
                let text = self.parse_cdata()?;
                children.push(Content::Text(text));
                continue;
            }

            if self.cursor.current() == Some(b'<') && self.cursor.peek(1) == Some(b'!') {
                self.cursor.advance();
                self.skip_declaration_or_comment()?;
                continue;
            }

            if self.cursor.current() == Some(b'<') {
                let child = self.parse_element()?;
                children.push(Content::Element(child));
                continue;
            }

            if self.cursor.is_eof() {
                return Err(self.error_here(ErrorKind::UnterminatedMarkup, "unterminated element"));
            }

            if let Some(text) = self.parse_text()? {
                children.push(Content::Text(text));
            }
        }

        Ok(Element {
            name,
            attributes,
            children,
        })
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) => {}
                None => {
                    return Err(
                        self.error_here(ErrorKind::UnterminatedMarkup, "unexpected end of input")
                    )
                }
            }

            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(self.error_here(
                    ErrorKind::DuplicateAttribute { name: name.clone() },
                    format!("duplicate attribute: {name}"),
                ));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => {
                return Err(
                    self.error_here(ErrorKind::InvalidToken, "expected quoted attribute value")
                )
            }
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = bytes_to_string(raw)?;
                return decode_entities(&text);
            }
            self.cursor.advance();
        }

        Err(self.error_here(ErrorKind::UnterminatedMarkup, "unterminated attribute value"))
    }

    fn parse_text(&mut self) -> Result<Option<String>> {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = bytes_to_string(raw)?;
        let text = decode_entities(&text)?;

        // Whitespace between elements is formatting, not content.
        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.cursor.pos();

        let Some(first) = self.cursor.current() else {
            return Err(self.error_here(ErrorKind::InvalidToken, "expected name"));
        };
        if !is_name_start(first) {
            return Err(self.error_here(ErrorKind::InvalidToken, "invalid name start"));
        }

        self.cursor.advance();
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        let raw = self.cursor.slice_from(start);
        bytes_to_string(raw)
    }

    /// Content of a CDATA section, taken verbatim with no entity decoding;
    /// the cursor is already past the `<![CDATA[` marker
    fn parse_cdata(&mut self) -> Result<String> {
        let start = self.cursor.pos();
        while self.cursor.current().is_some() {
            if self.cursor.peek_bytes(3) == Some(b"]]>".as_slice()) {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance_by(3);
                return bytes_to_string(raw);
            }
            self.cursor.advance();
        }
        Err(self.error_here(ErrorKind::UnterminatedMarkup, "unterminated CDATA section"))
    }

    fn skip_declaration_or_comment(&mut self) -> Result<()> {
        // cursor currently at '!'
        if self.cursor.peek(1) == Some(b'-') && self.cursor.peek(2) == Some(b'-') {
            self.cursor.advance_by(3);
            self.skip_until(b"-->")?;
            return Ok(());
        }

        self.skip_until(b">")
    }

    fn skip_processing_instruction(&mut self) -> Result<()> {
        // cursor currently at '?'
        self.cursor.advance();
        self.skip_until(b"?>")
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while self.cursor.current().is_some() {
            if self.cursor.peek_bytes(pattern.len()) == Some(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(self.error_here(ErrorKind::UnterminatedMarkup, "unterminated markup"))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else {
            Err(self.error_here(
                ErrorKind::InvalidToken,
                format!("expected {:?}", char::from(expected)),
            ))
        }
    }

    fn error_here(&self, kind: ErrorKind, message: impl Into<String>) -> Error {
        let pos = self.cursor.position();
        Error::with_message(
            kind,
            Span::new(Pos::new(pos.offset, pos.line, pos.col), pos),
            message,
        )
    }
}

fn bytes_to_string(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(|s| s.to_string())
        .map_err(|_| Error::with_message(ErrorKind::InvalidToken, Span::empty(), "invalid utf-8"))
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':')
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str) -> Result<String> {
    let mut result = String::new();
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        for next in chars.by_ref() {
            if next == ';' {
                break;
            }
            entity.push(next);
        }

        let decoded = match entity.as_str() {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(&entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                return Err(Error::with_message(
                    ErrorKind::InvalidEntity,
                    Span::empty(),
                    format!("invalid xml entity: &{entity};"),
                ));
            }
        }
    }

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &[u8]) -> Result<Document> {
        Parser::new(input).parse()
    }

    #[test]
    fn test_parse_simple_element() -> Result<()> {
        let doc = parse(b"<root></root>")?;
        assert_eq!(doc.root.name, "root");
        assert!(doc.root.children.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_with_attributes() -> Result<()> {
        let doc = parse(b"<root id=\"1\" name='test'></root>")?;
        assert_eq!(doc.root.attributes.get("id"), Some(&"1".to_string()));
        assert_eq!(doc.root.attributes.get("name"), Some(&"test".to_string()));
        Ok(())
    }

    #[test]
    fn test_parse_nested() -> Result<()> {
        let doc = parse(b"<root><child>text</child></root>")?;
        let Some(Content::Element(child)) = doc.root.children.first() else {
            return Err(Error::with_message(
                ErrorKind::InvalidToken,
                Span::empty(),
                "expected child element",
            ));
        };
        assert_eq!(child.name, "child");
        assert_eq!(child.text(), "text");
        Ok(())
    }

    #[test]
    fn test_parse_self_closing() -> Result<()> {
        let doc = parse(b"<root><child /></root>")?;
        let Some(Content::Element(child)) = doc.root.children.first() else {
            return Err(Error::with_message(
                ErrorKind::InvalidToken,
                Span::empty(),
                "expected child element",
            ));
        };
        assert_eq!(child.name, "child");
        assert!(child.children.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_declaration_and_comment() -> Result<()> {
        let doc = parse(b"<?xml version=\"1.0\"?><!-- note --><root/>")?;
        assert_eq!(doc.root.name, "root");
        Ok(())
    }

    #[test]
    fn test_parse_entities() -> Result<()> {
        let doc = parse(b"<root attr=\"a&amp;b\">x &lt; y &#x41;</root>")?;
        assert_eq!(doc.root.attributes.get("attr"), Some(&"a&b".to_string()));
        assert_eq!(doc.root.text(), "x < y A");
        Ok(())
    }

    #[test]
    fn test_cdata_preserved_verbatim() -> Result<()> {
        let doc = parse(b"<root><![CDATA[a & b < c]]></root>")?;
        assert_eq!(doc.root.text(), "a & b < c");
        Ok(())
    }

    #[test]
    fn test_cdata_mixed_with_text() -> Result<()> {
        let doc = parse(b"<root>x<![CDATA[&amp;]]>y</root>")?;
        assert_eq!(doc.root.text(), "x&amp;y");
        Ok(())
    }

    #[test]
    fn test_unterminated_cdata() {
        let err = parse(b"<root><![CDATA[oops</root>").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnterminatedMarkup));
    }

    #[test]
    fn test_mismatched_tag() {
        let err = parse(b"<root><a></b></root>").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MismatchedTag));
    }

    #[test]
    fn test_duplicate_attribute() {
        let err = parse(b"<root a=\"1\" a=\"2\"/>").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::DuplicateAttribute { .. }));
    }

    #[test]
    fn test_trailing_content() {
        let err = parse(b"<root/><extra/>").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidToken));
    }

    #[test]
    fn test_whitespace_only_text_dropped() -> Result<()> {
        let doc = parse(b"<root>\n  <child/>\n</root>")?;
        assert_eq!(doc.root.children.len(), 1);
        Ok(())
    }
}
