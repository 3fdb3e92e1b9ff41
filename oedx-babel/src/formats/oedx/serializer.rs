//! OEDX serialization (course-index → structural XML files)
//!
//! Pipeline: CourseIndex → recursive descent over [`NodeRef`] → one [`XmlElement`] per
//! structural node → FileMap of pretty-printed documents.

use super::element::XmlElement;
use crate::error::Result;
use crate::filemap::FileMap;
use crate::ids::{file_identifier, structural_path, synthesize_id};
use crate::model::{CourseIndex, NodeRef, NodeType};
use crate::settings::Settings;

/// Build every structural file of the package, plus the root `course.xml`.
pub fn build_tree(index: &CourseIndex, settings: &Settings) -> Result<FileMap> {
    let mut files = FileMap::new();
    let prefix = &settings.package.url_prefix;
    let indent = &settings.xml.indent;

    let root = XmlElement::new("course")
        .with_attribute("url_name", synthesize_id(prefix, NodeType::Course, 0))
        .with_attribute("org", &settings.package.org)
        .with_attribute("course", &index.course.number);
    files.insert("course.xml", root.to_document(indent))?;

    build_node(&mut files, prefix, NodeRef::Course(&index.course), 0, indent)?;

    tracing::debug!(files = files.len(), "built structural tree");
    Ok(files)
}

fn build_node(
    files: &mut FileMap,
    parent_stem: &str,
    node: NodeRef<'_>,
    index: usize,
    indent: &str,
) -> Result<()> {
    let node_type = node.node_type();

    // Deliverables live inline on the parent's child element
    if node_type == NodeType::Deliverable {
        return Ok(());
    }

    let stem = synthesize_id(parent_stem, node_type, index);
    let children = node.children();
    let element = node_element(node, &stem, &children);
    files.insert(structural_path(node_type, &stem), element.to_document(indent))?;

    for (child_index, child) in children.into_iter().enumerate() {
        build_node(files, &stem, child, child_index, indent)?;
    }
    Ok(())
}

/// The XML element for one node: its own attributes plus one reference per child.
pub fn node_element(node: NodeRef<'_>, stem: &str, children: &[NodeRef<'_>]) -> XmlElement {
    let mut element = XmlElement::new(node.node_type().as_str());

    if let Some(name) = node.name() {
        element = element.with_attribute("display_name", name);
    }
    if let Some(file) = node.file() {
        element = element.with_attribute("filename", file_identifier(file));
    }

    for (index, child) in children.iter().enumerate() {
        let child_type = child.node_type();
        let mut reference = XmlElement::new(child_type.as_str())
            .with_attribute("url_name", synthesize_id(stem, child_type, index));
        if let Some(deliverable) = child.as_deliverable() {
            for (key, value) in deliverable.attributes() {
                reference = reference.with_attribute(key, value);
            }
        }
        element = element.with_child(reference);
    }

    element
}
