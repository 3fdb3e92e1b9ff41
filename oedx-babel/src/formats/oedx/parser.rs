//! OEDX parsing (structural XML files → course-index)
//!
//! Starts at `course.xml`, follows each `url_name` into `<type>/<url_name>.xml` using the
//! level-successor table, and stops at html leaves. Leaf content is not read here: each
//! html leaf is reported as a [`LeafRef`] so the bridge can resolve it afterwards.

use crate::error::{ConvertError, Result};
use crate::ids::{is_plain_identifier, structural_path};
use crate::model::{
    Chapter, Course, CourseIndex, Component, Deliverable, NodeType, Sequential, Vertical,
};
use roxmltree::{Node, NodeType as XmlNodeType};
use std::fs;
use std::path::{Path, PathBuf};

/// An html leaf found during the walk, with the ancestor context needed to name its
/// Markdown output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafRef {
    pub chapter: usize,
    pub sequential: usize,
    pub vertical: usize,
    pub component: usize,
    pub chapter_name: String,
    pub sequential_name: String,
    pub vertical_name: String,
    /// `filename` attribute of the html leaf; content lives in `html/<filename>.html`
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTree {
    pub index: CourseIndex,
    pub leaves: Vec<LeafRef>,
}

/// Rebuild the course-index from an unpacked OEDX directory.
///
/// Fails with [`ConvertError::NotAnOedxTree`] before reading anything else when the
/// root marker is unusable, so it doubles as a package probe.
pub fn parse_tree(source_dir: &Path) -> Result<ParsedTree> {
    let (course_url_name, number) = read_root(source_dir)?;
    let mut reader = TreeReader {
        root: source_dir,
        leaves: Vec::new(),
    };
    let mut course = reader.read_course(&course_url_name)?;
    course.number = number;

    tracing::debug!(
        chapters = course.chapter.len(),
        leaves = reader.leaves.len(),
        "parsed structural tree"
    );
    Ok(ParsedTree {
        index: CourseIndex { course },
        leaves: reader.leaves,
    })
}

/// Returns the course `url_name` and course number from `course.xml`.
fn read_root(source_dir: &Path) -> Result<(String, String)> {
    let not_a_tree = || ConvertError::NotAnOedxTree(source_dir.to_path_buf());
    let root_path = source_dir.join("course.xml");
    if !root_path.is_file() {
        return Err(not_a_tree());
    }

    let text = fs::read_to_string(&root_path).map_err(|_| not_a_tree())?;
    let doc = roxmltree::Document::parse(&text).map_err(|_| not_a_tree())?;
    let root = doc.root_element();
    if root.tag_name().name() != NodeType::Course.as_str() {
        return Err(not_a_tree());
    }
    let url_name = root
        .attribute("url_name")
        .filter(|value| is_plain_identifier(value))
        .ok_or_else(not_a_tree)?;
    let number = root.attribute("course").unwrap_or_default();
    Ok((url_name.to_string(), number.to_string()))
}

/// A parsed structural file: own attributes plus the child references it lists.
#[derive(Debug)]
struct LevelXml {
    display_name: Option<String>,
    filename: Option<String>,
    children: Vec<ChildElement>,
}

#[derive(Debug)]
struct ChildElement {
    node_type: NodeType,
    attributes: Vec<(String, String)>,
}

impl ChildElement {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

struct TreeReader<'a> {
    root: &'a Path,
    leaves: Vec<LeafRef>,
}

impl TreeReader<'_> {
    fn read_course(&mut self, url_name: &str) -> Result<Course> {
        let path = self.level_path(NodeType::Course, url_name);
        let level = self.load_level(NodeType::Course, url_name)?;
        let mut course = Course {
            name: level.display_name.unwrap_or_default(),
            ..Course::default()
        };
        for child in &level.children {
            let position = course.chapter.len();
            let chapter = self.read_chapter(child_url_name(child, &path)?, position)?;
            course.chapter.push(chapter);
        }
        Ok(course)
    }

    fn read_chapter(&mut self, url_name: &str, position: usize) -> Result<Chapter> {
        let path = self.level_path(NodeType::Chapter, url_name);
        let level = self.load_level(NodeType::Chapter, url_name)?;
        let mut chapter = Chapter {
            name: level.display_name.unwrap_or_default(),
            sequential: Vec::new(),
        };
        for child in &level.children {
            let context = LeafContext {
                chapter: position,
                chapter_name: chapter.name.clone(),
                sequential: chapter.sequential.len(),
                ..LeafContext::default()
            };
            let sequential = self.read_sequential(child_url_name(child, &path)?, context)?;
            chapter.sequential.push(sequential);
        }
        Ok(chapter)
    }

    fn read_sequential(&mut self, url_name: &str, context: LeafContext) -> Result<Sequential> {
        let path = self.level_path(NodeType::Sequential, url_name);
        let level = self.load_level(NodeType::Sequential, url_name)?;
        let mut sequential = Sequential {
            name: level.display_name.unwrap_or_default(),
            vertical: Vec::new(),
        };
        for child in &level.children {
            let context = LeafContext {
                sequential_name: sequential.name.clone(),
                vertical: sequential.vertical.len(),
                ..context.clone()
            };
            let vertical = self.read_vertical(child_url_name(child, &path)?, context)?;
            sequential.vertical.push(vertical);
        }
        Ok(sequential)
    }

    fn read_vertical(&mut self, url_name: &str, context: LeafContext) -> Result<Vertical> {
        let path = self.level_path(NodeType::Vertical, url_name);
        let level = self.load_level(NodeType::Vertical, url_name)?;
        let mut vertical = Vertical {
            name: level.display_name.unwrap_or_default(),
            component: Vec::new(),
        };

        // Document order is sibling order; html and deliverable children share it
        for child in &level.children {
            let component = match child.node_type {
                NodeType::Deliverable => Component::Deliverable(Deliverable::from_attributes(
                    |key| child.attribute(key),
                )),
                _ => {
                    let filename = self.read_html_leaf(child_url_name(child, &path)?)?;
                    self.leaves.push(LeafRef {
                        chapter: context.chapter,
                        sequential: context.sequential,
                        vertical: context.vertical,
                        component: vertical.component.len(),
                        chapter_name: context.chapter_name.clone(),
                        sequential_name: context.sequential_name.clone(),
                        vertical_name: vertical.name.clone(),
                        filename: filename.clone(),
                    });
                    Component::Html { file: filename }
                }
            };
            vertical.component.push(component);
        }
        Ok(vertical)
    }

    fn read_html_leaf(&mut self, url_name: &str) -> Result<String> {
        let path = self.level_path(NodeType::Html, url_name);
        let level = self.load_level(NodeType::Html, url_name)?;
        let filename = level.filename.ok_or_else(|| ConvertError::Xml {
            path: path.clone(),
            message: "html leaf has no `filename` attribute".to_string(),
        })?;
        checked_reference(&filename, "filename", &path)?;
        Ok(filename)
    }

    fn level_path(&self, node_type: NodeType, url_name: &str) -> PathBuf {
        self.root.join(structural_path(node_type, url_name))
    }

    fn load_level(&self, node_type: NodeType, url_name: &str) -> Result<LevelXml> {
        let path = self.level_path(node_type, url_name);
        if !path.is_file() {
            return Err(ConvertError::MissingStructuralFile(path));
        }

        let text = fs::read_to_string(&path)?;
        let doc = roxmltree::Document::parse(&text).map_err(|e| ConvertError::Xml {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let root = doc.root_element();
        if root.tag_name().name() != node_type.as_str() {
            return Err(ConvertError::Xml {
                path,
                message: format!(
                    "root element is <{}>, expected <{node_type}>",
                    root.tag_name().name()
                ),
            });
        }

        tracing::debug!(path = %path.display(), "parsed structural file");
        Ok(LevelXml {
            display_name: root.attribute("display_name").map(str::to_string),
            filename: root.attribute("filename").map(str::to_string),
            children: child_elements(root, node_type),
        })
    }
}

/// Ancestor context threaded down to the leaves.
#[derive(Debug, Clone, Default)]
struct LeafContext {
    chapter: usize,
    sequential: usize,
    vertical: usize,
    chapter_name: String,
    sequential_name: String,
}

fn child_elements(root: Node<'_, '_>, parent_type: NodeType) -> Vec<ChildElement> {
    let Some(slot) = parent_type.successor() else {
        return Vec::new();
    };

    root.children()
        .filter(|node| node.node_type() == XmlNodeType::Element)
        .filter_map(|node| {
            let tag = node.tag_name().name();
            match NodeType::from_tag(tag) {
                Some(node_type) if slot.accepts(node_type) => Some(ChildElement {
                    node_type,
                    attributes: node
                        .attributes()
                        .map(|attr| (attr.name().to_string(), attr.value().to_string()))
                        .collect(),
                }),
                _ => {
                    tracing::warn!(element = tag, parent = %parent_type, "skipping unsupported element");
                    None
                }
            }
        })
        .collect()
}

fn child_url_name<'c>(child: &'c ChildElement, parent_path: &Path) -> Result<&'c str> {
    child
        .attribute("url_name")
        .ok_or_else(|| ConvertError::Xml {
            path: parent_path.to_path_buf(),
            message: format!("<{}> reference without `url_name`", child.node_type),
        })
        .and_then(|value| checked_reference(value, "url_name", parent_path))
}

/// Reject reference values that would resolve outside the package root.
fn checked_reference<'v>(value: &'v str, attribute: &str, path: &Path) -> Result<&'v str> {
    if is_plain_identifier(value) {
        Ok(value)
    } else {
        Err(ConvertError::Xml {
            path: path.to_path_buf(),
            message: format!("`{attribute}` value '{value}' is not a plain file name"),
        })
    }
}
