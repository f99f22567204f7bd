//! XML serialization of a document tree

use crate::xml::model::{Content, Document, Element};

/// Configuration for the XML writer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Spaces per indentation level (0 writes everything on one line)
    pub indent: usize,
    /// Emit an `<?xml version="1.0" encoding="UTF-8"?>` declaration
    pub declaration: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent: 2,
            declaration: true,
        }
    }
}

impl Config {
    /// Compact output: no declaration, no indentation
    pub const fn compact() -> Self {
        Self {
            indent: 0,
            declaration: false,
        }
    }
}

/// XML writer
#[derive(Clone, Copy, Debug, Default)]
pub struct Writer {
    config: Config,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Serialize a document to XML text
    pub fn write(&self, doc: &Document) -> String {
        let mut output = String::new();
        if self.config.declaration {
            output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        }
        self.write_element(&doc.root, 0, &mut output);
        if self.config.indent > 0 {
            output.push('\n');
        }
        output
    }

    fn write_element(&self, element: &Element, depth: usize, output: &mut String) {
        self.push_indent(depth, output);
        output.push('<');
        output.push_str(&element.name);

        for (key, value) in element.attributes.iter() {
            output.push(' ');
            output.push_str(key);
            output.push_str("=\"");
            output.push_str(&escape_attr(value));
            output.push('"');
        }

        if element.children.is_empty() {
            output.push_str("/>");
            return;
        }

        output.push('>');

        // Elements with text content are written inline so that the text
        // survives a re-parse unchanged.
        let inline = self.config.indent == 0
            || element
                .children
                .iter()
                .any(|c| matches!(c, Content::Text(_)));

        for child in &element.children {
            match child {
                Content::Element(child) => {
                    if inline {
                        let flat = Self::with_config(Config::compact());
                        flat.write_element(child, 0, output);
                    } else {
                        output.push('\n');
                        self.write_element(child, depth + 1, output);
                    }
                }
                Content::Text(text) => output.push_str(&escape_text(text)),
            }
        }

        if !inline {
            output.push('\n');
            self.push_indent(depth, output);
        }
        output.push_str("</");
        output.push_str(&element.name);
        output.push('>');
    }

    fn push_indent(&self, depth: usize, output: &mut String) {
        if self.config.indent > 0 {
            for _ in 0..depth * self.config.indent {
                output.push(' ');
            }
        }
    }
}

fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(input: &str) -> String {
    escape_text(input)
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
