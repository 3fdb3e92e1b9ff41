//! HTML fragments → Markdown files

use super::images::{ImageRewriter, PendingUpload};
use super::paths::{markdown_path, MarkdownPaths};
use crate::error::{ConvertError, Result};
use crate::filemap::FileMap;
use crate::formats::html::{html_to_markdown, image_markdown, ElementView, Overrides};
use crate::formats::oedx::{LeafRef, ParsedTree};
use crate::ids::{html_fragment_path, is_plain_identifier};
use crate::model::{Component, CourseIndex};
use crate::settings::ImageSettings;
use std::fs;
use std::path::Path;

/// Everything the reverse direction writes or uploads.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedContent {
    /// The index with every html `file` pointing at its synthesized Markdown path
    pub index: CourseIndex,
    pub markdown: FileMap,
    pub uploads: Vec<PendingUpload>,
}

/// Convert the html fragment of every leaf in `tree` to Markdown.
pub fn convert_leaves(
    source_dir: &Path,
    tree: ParsedTree,
    images: &ImageSettings,
) -> Result<ConvertedContent> {
    let ParsedTree { mut index, leaves } = tree;
    let mut rewriter = ImageRewriter::new(images);
    let mut paths = MarkdownPaths::new();
    let mut markdown = FileMap::new();

    for leaf in &leaves {
        if !is_plain_identifier(&leaf.filename) {
            return Err(ConvertError::UnsafePath(leaf.filename.clone()));
        }
        let fragment = source_dir.join(html_fragment_path(&leaf.filename));
        if !fragment.is_file() {
            return Err(ConvertError::MissingStructuralFile(fragment));
        }
        let html = fs::read_to_string(&fragment)?;
        let text = leaf_markdown(&html, &mut rewriter);

        let path = paths.assign(markdown_path(
            &leaf.chapter_name,
            &leaf.sequential_name,
            &leaf.vertical_name,
        ));
        point_leaf_at(&mut index, leaf, &path)?;
        tracing::debug!(fragment = %leaf.filename, markdown = %path, "converted html leaf");
        markdown.insert(path, text)?;
    }

    Ok(ConvertedContent {
        index,
        markdown,
        uploads: rewriter.into_pending(),
    })
}

fn leaf_markdown(html: &str, rewriter: &mut ImageRewriter<'_>) -> String {
    let mut overrides = Overrides::new()
        .with("iframe", |element: &ElementView| Some(iframe_passthrough(element)))
        .with("img", |element: &ElementView| {
            let target = rewriter.rewrite(element.attribute("src")?)?;
            Some(image_markdown(
                element.attribute("alt").unwrap_or_default(),
                &target,
                element.attribute("title"),
            ))
        });
    html_to_markdown(html, &mut overrides)
}

/// Iframes have no Markdown form, so they are written back as literal HTML.
fn iframe_passthrough(element: &ElementView) -> String {
    let attributes: String = element
        .attributes
        .iter()
        .map(|(key, value)| format!(" {key}=\"{}\"", value.replace('&', "&amp;").replace('"', "&quot;")))
        .collect();
    format!("<iframe{attributes}></iframe>")
}

fn point_leaf_at(index: &mut CourseIndex, leaf: &LeafRef, path: &str) -> Result<()> {
    let component = index
        .course
        .chapter
        .get_mut(leaf.chapter)
        .and_then(|chapter| chapter.sequential.get_mut(leaf.sequential))
        .and_then(|sequential| sequential.vertical.get_mut(leaf.vertical))
        .and_then(|vertical| vertical.component.get_mut(leaf.component));
    match component {
        Some(Component::Html { file }) => {
            *file = path.to_string();
            Ok(())
        }
        _ => Err(ConvertError::Index(format!(
            "no html component at {}/{}/{}/{} for '{}'",
            leaf.chapter, leaf.sequential, leaf.vertical, leaf.component, leaf.filename
        ))),
    }
}
