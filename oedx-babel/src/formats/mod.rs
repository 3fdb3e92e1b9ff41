//! Format implementations
//!
//! The two structured formats (the course-index and the OEDX package) and the two
//! content converters the bridge delegates to.

pub mod html;
pub mod index;
pub mod markdown;
pub mod oedx;

pub use index::IndexFormat;
pub use markdown::{ComrakRenderer, MarkdownRenderer};
pub use oedx::{build_tree, parse_tree, LeafRef, ParsedTree, XmlElement};
