//! Identifier synthesis
//!
//! Every structural file is named `<parent-stem>-<type>_<index>`, with the `_0` suffix
//! elided for the first sibling. The same function names the file on disk and the
//! `url_name` reference in the parent, on both the forward and reverse paths, so the
//! two must never diverge.

use crate::model::NodeType;

/// Build the `url_name` of the `index`-th child of type `node_type` under `parent_stem`.
///
/// ```text
/// synthesize_id("ironhack-course", Chapter, 0) == "ironhack-course-chapter"
/// synthesize_id("ironhack-course", Chapter, 1) == "ironhack-course-chapter_1"
/// ```
pub fn synthesize_id(parent_stem: &str, node_type: NodeType, index: usize) -> String {
    if index == 0 {
        format!("{parent_stem}-{node_type}")
    } else {
        format!("{parent_stem}-{node_type}_{index}")
    }
}

/// Turn a relative source path into a flat identifier: `a/b.md` → `a-b`.
pub fn file_identifier(file: &str) -> String {
    let normalized = file.replace('\\', "/");
    let trimmed = normalized.trim_start_matches("./").trim_start_matches('/');
    strip_extension(trimmed).replace('/', "-")
}

/// Path of the XML file describing a structural node.
pub fn structural_path(node_type: NodeType, stem: &str) -> String {
    format!("{node_type}/{stem}.xml")
}

/// Path of the HTML fragment holding an html leaf's content.
pub fn html_fragment_path(identifier: &str) -> String {
    format!("html/{identifier}.html")
}

/// Drop the extension of the last path segment, if any.
fn strip_extension(path: &str) -> &str {
    let segment_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match path[segment_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..segment_start + dot],
        _ => path,
    }
}

/// True when `path` is relative and stays below its root.
pub fn is_safe_relative_path(path: &str) -> bool {
    !path.is_empty()
        && !path.starts_with('/')
        && !path.contains('\\')
        && !path.contains(':')
        && path.split('/').all(|segment| !segment.is_empty() && segment != "..")
}

/// True when `value` names a single file: no separators and not `.` or `..`.
///
/// `url_name` and `filename` values read from a package must pass this before they
/// are joined onto the package root.
pub fn is_plain_identifier(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && !value.contains(['/', '\\', '\0'])
}
