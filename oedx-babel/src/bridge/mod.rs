//! Markdown/HTML bridge
//!
//! Moves leaf content between the two sides:
//!
//! - forward: every Markdown file under the source root is rendered to an HTML fragment
//!   named after its relative path ([`collect_markdown`]);
//! - reverse: the fragment of every html leaf is converted back to Markdown at a path
//!   synthesized from its ancestors, relocating CDN images on the way
//!   ([`convert_leaves`]).

pub mod forward;
pub mod images;
pub mod paths;
pub mod reverse;

pub use forward::collect_markdown;
pub use images::{ImageRewriter, PendingUpload};
pub use paths::{kebab_case, leaf_title, markdown_path};
pub use reverse::{convert_leaves, ConvertedContent};
