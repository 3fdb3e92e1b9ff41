//! Immutable XML element tree and its pretty-printer
//!
//! Structural files are small and flat (one root, one line per child), so they are
//! built as values and written in one pass instead of going through a streaming writer.
//!
//! ## Example
//!
//! ```text
//! <?xml version="1.0"?>
//! <vertical display_name="Intro">
//!     <html url_name="ironhack-course-chapter-sequential-vertical-html"/>
//! </vertical>
//! ```

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Serialize as a standalone document with an XML declaration.
    pub fn to_document(&self, indent: &str) -> String {
        let mut output = String::from("<?xml version=\"1.0\"?>\n");
        write_element(self, 0, indent, &mut output);
        output
    }
}

fn write_element(element: &XmlElement, depth: usize, indent: &str, output: &mut String) {
    let padding = indent.repeat(depth);
    output.push_str(&padding);
    output.push('<');
    output.push_str(&element.name);
    for (key, value) in &element.attributes {
        output.push_str(&format!(" {key}=\"{}\"", escape_xml(value)));
    }

    if element.children.is_empty() {
        output.push_str("/>\n");
        return;
    }

    output.push_str(">\n");
    for child in &element.children {
        write_element(child, depth + 1, indent, output);
    }
    output.push_str(&format!("{padding}</{}>\n", element.name));
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\"', "&quot;")
        .replace('\'', "&apos;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;")
}
