//! XML document tree

use indexmap::IndexMap;

/// XML document
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

/// XML element
///
/// The name is kept exactly as written in the source, prefix included.
/// Namespace resolution happens in the mapper, which tracks `xmlns`
/// declarations while walking the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Content>,
}

impl Element {
    /// Create an element with no attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Concatenated text content of all direct text children
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            if let Content::Text(t) = child {
                out.push_str(t);
            }
        }
        out
    }

    /// Iterator over direct child elements
    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|c| match c {
            Content::Element(e) => Some(e),
            Content::Text(_) => None,
        })
    }

    /// True if any direct child is an element
    pub fn has_element_children(&self) -> bool {
        self.child_elements().next().is_some()
    }

    /// Local part of the element name (after any `prefix:`)
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// Prefix of the element name, if any
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }
}

/// XML content node
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    Element(Element),
    Text(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name_and_prefix() {
        let el = Element::new("amd:fileData");
        assert_eq!(el.local_name(), "fileData");
        assert_eq!(el.prefix(), Some("amd"));

        let el = Element::new("fileData");
        assert_eq!(el.local_name(), "fileData");
        assert_eq!(el.prefix(), None);
    }

    #[test]
    fn test_text_concatenation() {
        let mut el = Element::new("note");
        el.children.push(Content::Text("a".to_string()));
        el.children.push(Content::Element(Element::new("x")));
        el.children.push(Content::Text("b".to_string()));
        assert_eq!(el.text(), "ab");
        assert!(el.has_element_children());
    }
}
