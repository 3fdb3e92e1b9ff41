//! Markdown rendering (Markdown → HTML fragment)
//!
//! # Library Choice
//!
//! We use the `comrak` crate for Markdown rendering:
//! - CommonMark compliant with GFM extensions (tables, strikethrough, task lists, autolinks)
//! - Raw HTML passthrough, which course material relies on for embeds (`<iframe>`)
//! - Front matter is recognised and dropped from the rendered output
//!
//! Rendering sits behind [`MarkdownRenderer`] so the bridge can be exercised with a fake
//! renderer and the engine swapped without touching the tree builders.

use crate::settings::MarkdownSettings;
use comrak::{markdown_to_html, ComrakOptions};

/// Converts Markdown source into an HTML fragment.
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

/// [`MarkdownRenderer`] backed by comrak.
pub struct ComrakRenderer {
    options: ComrakOptions<'static>,
}

impl ComrakRenderer {
    pub fn new(settings: &MarkdownSettings) -> Self {
        let mut options = default_comrak_options();
        options.render.hardbreaks = settings.hard_breaks;
        Self { options }
    }
}

impl Default for ComrakRenderer {
    fn default() -> Self {
        Self {
            options: default_comrak_options(),
        }
    }
}

impl MarkdownRenderer for ComrakRenderer {
    fn render(&self, markdown: &str) -> String {
        markdown_to_html(markdown, &self.options)
    }
}

fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.superscript = true;
    options.extension.front_matter_delimiter = Some("---".to_string());
    options.render.unsafe_ = true;
    options
}
