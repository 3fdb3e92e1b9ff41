//! Course model
//!
//! The course-index is a fixed five-level tree:
//!
//! ```text
//! course ─► chapter ─► sequential ─► vertical ─► component (html | deliverable)
//! ```
//!
//! The serde types below are the JSON/YAML shape of `index.json`. [`NodeType`] and
//! [`NodeRef`] give the builders a typed view over that tree, so level dispatch is done
//! with an enum and [`NodeType::successor`] rather than string keys.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Effective type of a node in the course tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Course,
    Chapter,
    Sequential,
    Vertical,
    Html,
    Deliverable,
}

/// Where the children of a node live.
///
/// Structural levels have homogeneous children. The `component` slot under a vertical is
/// resolved per child to [`NodeType::Html`] or [`NodeType::Deliverable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildSlot {
    Node(NodeType),
    Component,
}

impl NodeType {
    /// Tag used for XML element names and output directories.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Course => "course",
            NodeType::Chapter => "chapter",
            NodeType::Sequential => "sequential",
            NodeType::Vertical => "vertical",
            NodeType::Html => "html",
            NodeType::Deliverable => "deliverable",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "course" => Some(NodeType::Course),
            "chapter" => Some(NodeType::Chapter),
            "sequential" => Some(NodeType::Sequential),
            "vertical" => Some(NodeType::Vertical),
            "html" => Some(NodeType::Html),
            "deliverable" => Some(NodeType::Deliverable),
            _ => None,
        }
    }

    /// Level-successor table: course → chapter → sequential → vertical → component.
    pub fn successor(self) -> Option<ChildSlot> {
        match self {
            NodeType::Course => Some(ChildSlot::Node(NodeType::Chapter)),
            NodeType::Chapter => Some(ChildSlot::Node(NodeType::Sequential)),
            NodeType::Sequential => Some(ChildSlot::Node(NodeType::Vertical)),
            NodeType::Vertical => Some(ChildSlot::Component),
            NodeType::Html | NodeType::Deliverable => None,
        }
    }

    pub fn is_leaf(self) -> bool {
        matches!(self, NodeType::Html | NodeType::Deliverable)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ChildSlot {
    /// Key under which the children are listed in the course-index.
    pub fn index_key(self) -> &'static str {
        match self {
            ChildSlot::Node(node_type) => node_type.as_str(),
            ChildSlot::Component => "component",
        }
    }

    /// Whether an element of type `node_type` may appear in this slot.
    pub fn accepts(self, node_type: NodeType) -> bool {
        match self {
            ChildSlot::Node(expected) => expected == node_type,
            ChildSlot::Component => node_type.is_leaf(),
        }
    }
}

/// Root of an `index.json` / `index.yaml` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseIndex {
    pub course: Course,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Course {
    #[serde(default, deserialize_with = "string_or_number")]
    pub number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub chapter: Vec<Chapter>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sequential: Vec<Sequential>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sequential {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vertical: Vec<Vertical>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertical {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub component: Vec<Component>,
}

/// A leaf under a vertical.
///
/// Serialized with a `type` tag; a missing tag means `html`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawComponent", into = "RawComponent")]
pub enum Component {
    Html { file: String },
    Deliverable(Deliverable),
}

/// An assignment inlined on its parent vertical instead of getting its own file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Deliverable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deliverable_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deliverable_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deliverable_duedate: Option<String>,
}

/// Attribute keys carried by a deliverable, in emission order.
pub const DELIVERABLE_KEYS: [&str; 4] = [
    "display_name",
    "deliverable_identifier",
    "deliverable_description",
    "deliverable_duedate",
];

impl Deliverable {
    /// Present attributes as `(key, value)` pairs in [`DELIVERABLE_KEYS`] order.
    pub fn attributes(&self) -> Vec<(&'static str, &str)> {
        [
            &self.display_name,
            &self.deliverable_identifier,
            &self.deliverable_description,
            &self.deliverable_duedate,
        ]
        .into_iter()
        .zip(DELIVERABLE_KEYS)
        .filter_map(|(value, key)| value.as_deref().map(|v| (key, v)))
        .collect()
    }

    /// Build a deliverable from an attribute lookup (used when reading XML).
    pub fn from_attributes<'a>(lookup: impl Fn(&str) -> Option<&'a str>) -> Self {
        let get = |key: &str| lookup(key).map(str::to_string);
        Deliverable {
            display_name: get("display_name"),
            deliverable_identifier: get("deliverable_identifier"),
            deliverable_description: get("deliverable_description"),
            deliverable_duedate: get("deliverable_duedate"),
        }
    }
}

impl Component {
    pub fn html(file: impl Into<String>) -> Self {
        Component::Html { file: file.into() }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Component::Html { .. } => NodeType::Html,
            Component::Deliverable(_) => NodeType::Deliverable,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawComponent {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    #[serde(flatten)]
    deliverable: Deliverable,
}

impl TryFrom<RawComponent> for Component {
    type Error = String;

    fn try_from(raw: RawComponent) -> Result<Self, Self::Error> {
        match raw.kind.as_deref() {
            None | Some("html") => raw
                .file
                .map(|file| Component::Html { file })
                .ok_or_else(|| "html component is missing `file`".to_string()),
            Some("deliverable") => Ok(Component::Deliverable(raw.deliverable)),
            Some(other) => Err(format!("unknown component type '{other}'")),
        }
    }
}

impl From<Component> for RawComponent {
    fn from(component: Component) -> Self {
        match component {
            Component::Html { file } => RawComponent {
                kind: Some("html".to_string()),
                file: Some(file),
                deliverable: Deliverable::default(),
            },
            Component::Deliverable(deliverable) => RawComponent {
                kind: Some("deliverable".to_string()),
                file: None,
                deliverable,
            },
        }
    }
}

/// Course numbers show up as `"101"` in JSON and as `101` in hand-written YAML.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Text(text) => text,
        StringOrNumber::Integer(n) => n.to_string(),
        StringOrNumber::Float(n) => n.to_string(),
    })
}

/// Borrowed, typed view over any node of the course tree.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Course(&'a Course),
    Chapter(&'a Chapter),
    Sequential(&'a Sequential),
    Vertical(&'a Vertical),
    Component(&'a Component),
}

impl<'a> NodeRef<'a> {
    /// Effective type; components resolve to their declared subtype.
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeRef::Course(_) => NodeType::Course,
            NodeRef::Chapter(_) => NodeType::Chapter,
            NodeRef::Sequential(_) => NodeType::Sequential,
            NodeRef::Vertical(_) => NodeType::Vertical,
            NodeRef::Component(component) => component.node_type(),
        }
    }

    /// Display name, when the level carries one.
    pub fn name(&self) -> Option<&'a str> {
        match self {
            NodeRef::Course(c) => Some(&c.name),
            NodeRef::Chapter(c) => Some(&c.name),
            NodeRef::Sequential(s) => Some(&s.name),
            NodeRef::Vertical(v) => Some(&v.name),
            NodeRef::Component(_) => None,
        }
    }

    /// Source path of an html leaf.
    pub fn file(&self) -> Option<&'a str> {
        match self {
            NodeRef::Component(Component::Html { file }) => Some(file),
            _ => None,
        }
    }

    /// Ordered children, in declaration order.
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        match self {
            NodeRef::Course(c) => c.chapter.iter().map(NodeRef::Chapter).collect(),
            NodeRef::Chapter(c) => c.sequential.iter().map(NodeRef::Sequential).collect(),
            NodeRef::Sequential(s) => s.vertical.iter().map(NodeRef::Vertical).collect(),
            NodeRef::Vertical(v) => v.component.iter().map(NodeRef::Component).collect(),
            NodeRef::Component(_) => Vec::new(),
        }
    }

    pub fn as_deliverable(&self) -> Option<&'a Deliverable> {
        match self {
            NodeRef::Component(Component::Deliverable(d)) => Some(d),
            _ => None,
        }
    }
}
