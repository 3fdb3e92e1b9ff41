//! HTML conversion (HTML fragment → Markdown)
//!
//! # Library Choice
//!
//! We use the `html5ever` + `markup5ever_rcdom` pair for parsing:
//! - Browser-grade HTML5 parser from the Servo project
//! - Handles the malformed fragments that platform editors tend to produce
//!
//! The Markdown is emitted by walking the resulting DOM.
//!
//! # Element Mapping Table
//!
//! | HTML                         | Markdown                         |
//! |------------------------------|----------------------------------|
//! | `<h1>`..`<h6>`               | `#`..`######` headings           |
//! | `<p>`, `<div>`, `<section>`  | Paragraph blocks                 |
//! | `<strong>`/`<b>`             | `**bold**`                       |
//! | `<em>`/`<i>`                 | `*italic*`                       |
//! | `<del>`/`<s>`                | `~~strike~~`                     |
//! | `<code>`                     | `` `code` ``                     |
//! | `<pre><code class=lang-x>`   | Fenced code block with language  |
//! | `<a href>`                   | `[text](href)`                   |
//! | `<img>`                      | `![alt](src)`                    |
//! | `<ul>`/`<ol>`/`<li>`         | `-` / `1.` lists, nested         |
//! | `<blockquote>`               | `>` quotes                       |
//! | `<table>`                    | GFM pipe table                   |
//! | `<hr>` / `<br>`              | `---` / hard line break          |
//! | anything else                | Children only                    |
//!
//! # Overrides
//!
//! Callers can replace the rendering of any tag with an [`Overrides`] hook. A hook that
//! returns `None` falls back to the default rendering above.

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::collections::HashMap;

/// The tag name and attributes of an element, as seen by an override hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementView {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
}

impl ElementView {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

type OverrideFn<'h> = Box<dyn FnMut(&ElementView) -> Option<String> + 'h>;

/// Per-tag rendering hooks.
#[derive(Default)]
pub struct Overrides<'h> {
    handlers: HashMap<String, OverrideFn<'h>>,
}

impl<'h> Overrides<'h> {
    pub fn new() -> Self {
        Overrides {
            handlers: HashMap::new(),
        }
    }

    /// Register a hook for `tag`, replacing any previous one.
    pub fn with(
        mut self,
        tag: &str,
        handler: impl FnMut(&ElementView) -> Option<String> + 'h,
    ) -> Self {
        self.handlers.insert(tag.to_string(), Box::new(handler));
        self
    }

    fn apply(&mut self, element: &ElementView) -> Option<String> {
        self.handlers
            .get_mut(&element.tag)
            .and_then(|handler| handler(element))
    }
}

/// Convert an HTML fragment (or document) to Markdown.
pub fn html_to_markdown(html: &str, overrides: &mut Overrides<'_>) -> String {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    let mut writer = MarkdownWriter { overrides };
    let raw = writer.children(&dom.document, Context::block());
    tidy(&raw)
}

#[derive(Debug, Clone, Copy, Default)]
struct Context {
    in_pre: bool,
    /// The parent only holds blocks, so whitespace-only text between them is noise
    block_parent: bool,
}

impl Context {
    fn block() -> Self {
        Context {
            in_pre: false,
            block_parent: true,
        }
    }

    fn for_children_of(self, tag: &str) -> Self {
        Context {
            in_pre: self.in_pre || tag == "pre",
            block_parent: is_block_container(tag),
        }
    }
}

struct MarkdownWriter<'o, 'h> {
    overrides: &'o mut Overrides<'h>,
}

impl MarkdownWriter<'_, '_> {
    fn children(&mut self, node: &Handle, ctx: Context) -> String {
        let mut output = String::new();
        for child in node.children.borrow().iter() {
            output.push_str(&self.node(child, ctx));
        }
        output
    }

    /// Children of a paragraph-like element. Leading whitespace is dropped from inline
    /// runs only; rendered child blocks (code fences, nested lists) are kept verbatim.
    fn block_children(&mut self, node: &Handle, ctx: Context) -> String {
        let mut output = String::new();
        let mut inline = String::new();
        for child in node.children.borrow().iter() {
            let rendered = self.node(child, ctx);
            if rendered.starts_with("\n\n") {
                output.push_str(&trim_line_starts(&inline));
                inline.clear();
                output.push_str(&rendered);
            } else {
                inline.push_str(&rendered);
            }
        }
        output.push_str(&trim_line_starts(&inline));
        output
    }

    fn node(&mut self, node: &Handle, ctx: Context) -> String {
        match &node.data {
            NodeData::Document => self.children(node, Context::block()),
            NodeData::Text { contents } => {
                let text = contents.borrow();
                if ctx.in_pre {
                    text.to_string()
                } else if ctx.block_parent && text.trim().is_empty() {
                    String::new()
                } else {
                    collapse_whitespace(&text)
                }
            }
            NodeData::Element { name, attrs, .. } => {
                let view = ElementView {
                    tag: name.local.to_string(),
                    attributes: attrs
                        .borrow()
                        .iter()
                        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                        .collect(),
                };
                match self.overrides.apply(&view) {
                    Some(replacement) if ctx.block_parent => block(&replacement),
                    Some(replacement) => replacement,
                    None => self.element(node, &view, ctx),
                }
            }
            _ => String::new(),
        }
    }

    fn element(&mut self, node: &Handle, view: &ElementView, ctx: Context) -> String {
        let tag = view.tag.as_str();
        let inner = ctx.for_children_of(tag);
        match tag {
            "head" | "script" | "style" | "title" | "meta" | "link" | "template" => String::new(),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = usize::from(tag.as_bytes()[1] - b'0');
                let text = collapse_whitespace(self.children(node, inner).trim());
                block(&format!("{} {text}", "#".repeat(level)))
            }
            "p" | "div" | "section" | "article" | "main" | "header" | "footer" | "figure"
            | "figcaption" | "aside" | "nav" | "details" | "summary" => {
                let content = self.block_children(node, inner);
                block(&content)
            }
            "br" => "  \n".to_string(),
            "hr" => block("---"),
            "strong" | "b" => wrap_inline("**", &self.children(node, inner)),
            "em" | "i" => wrap_inline("*", &self.children(node, inner)),
            "del" | "s" | "strike" => wrap_inline("~~", &self.children(node, inner)),
            "code" if !ctx.in_pre => inline_code(&text_content(node)),
            "pre" => fenced_code(node),
            "a" => {
                let text = self.children(node, inner);
                let text = text.trim();
                match (view.attribute("href"), view.attribute("title")) {
                    (Some(href), Some(title)) => format!("[{text}]({href} \"{title}\")"),
                    (Some(href), None) => format!("[{text}]({href})"),
                    (None, _) => text.to_string(),
                }
            }
            "img" => image_markdown(
                view.attribute("alt").unwrap_or_default(),
                view.attribute("src").unwrap_or_default(),
                view.attribute("title"),
            ),
            "input" if view.attribute("type") == Some("checkbox") => {
                if view.attribute("checked").is_some() {
                    "[x] ".to_string()
                } else {
                    "[ ] ".to_string()
                }
            }
            "ul" | "ol" => self.list(node, view, inner),
            "blockquote" => {
                let content = tidy(&self.children(node, inner));
                let quoted: Vec<String> = content
                    .lines()
                    .map(|line| {
                        if line.is_empty() {
                            ">".to_string()
                        } else {
                            format!("> {line}")
                        }
                    })
                    .collect();
                block(&quoted.join("\n"))
            }
            "table" => self.table(node, inner),
            _ => self.children(node, inner),
        }
    }

    fn list(&mut self, node: &Handle, view: &ElementView, ctx: Context) -> String {
        let ordered = view.tag == "ol";
        let start = view
            .attribute("start")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(1);

        let mut items = Vec::new();
        for child in node.children.borrow().iter() {
            if element_tag(child).as_deref() != Some("li") {
                continue;
            }
            let marker = if ordered {
                format!("{}. ", start + items.len())
            } else {
                "- ".to_string()
            };
            let mut content = tidy(&self.children(child, ctx.for_children_of("li")));
            if !has_child_element(child, "p") {
                content = content.replace("\n\n", "\n");
            }
            let indent = " ".repeat(marker.len());
            let body: Vec<String> = content
                .lines()
                .enumerate()
                .map(|(i, line)| match (i, line.is_empty()) {
                    (0, _) => format!("{marker}{line}"),
                    (_, true) => String::new(),
                    _ => format!("{indent}{line}"),
                })
                .collect();
            items.push(if body.is_empty() {
                marker.trim_end().to_string()
            } else {
                body.join("\n")
            });
        }
        block(&items.join("\n"))
    }

    fn table(&mut self, node: &Handle, ctx: Context) -> String {
        let mut rows: Vec<Vec<String>> = Vec::new();
        self.collect_rows(node, ctx, &mut rows);
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return String::new();
        }

        let render_row = |cells: &[String]| {
            let padded: Vec<&str> = (0..columns)
                .map(|i| cells.get(i).map(String::as_str).unwrap_or(""))
                .collect();
            format!("| {} |", padded.join(" | "))
        };

        let mut lines = vec![render_row(&rows[0])];
        lines.push(format!("|{}", " --- |".repeat(columns)));
        lines.extend(rows[1..].iter().map(|row| render_row(row)));
        block(&lines.join("\n"))
    }

    fn collect_rows(&mut self, node: &Handle, ctx: Context, rows: &mut Vec<Vec<String>>) {
        for child in node.children.borrow().iter() {
            match element_tag(child).as_deref() {
                Some("tr") => {
                    let mut cells = Vec::new();
                    for cell in child.children.borrow().iter() {
                        if matches!(element_tag(cell).as_deref(), Some("td") | Some("th")) {
                            let text = self.children(cell, ctx.for_children_of("td"));
                            cells.push(
                                collapse_whitespace(text.trim()).replace('|', "\\|"),
                            );
                        }
                    }
                    rows.push(cells);
                }
                Some("thead") | Some("tbody") | Some("tfoot") => {
                    self.collect_rows(child, ctx, rows)
                }
                _ => {}
            }
        }
    }
}

/// Markdown for an image reference.
pub fn image_markdown(alt: &str, src: &str, title: Option<&str>) -> String {
    match title {
        Some(title) => format!("![{alt}]({src} \"{title}\")"),
        None => format!("![{alt}]({src})"),
    }
}

fn fenced_code(node: &Handle) -> String {
    let language = node
        .children
        .borrow()
        .iter()
        .find(|child| element_tag(child).as_deref() == Some("code"))
        .and_then(|code| element_attribute(code, "class"))
        .and_then(|class| {
            class.split_whitespace().find_map(|name| {
                name.strip_prefix("language-")
                    .or_else(|| name.strip_prefix("lang-"))
                    .map(str::to_string)
            })
        })
        .unwrap_or_default();
    let code = text_content(node);
    block(&format!("```{language}\n{}\n```", code.trim_end_matches('\n')))
}

fn inline_code(code: &str) -> String {
    if code.contains('`') {
        format!("`` {code} ``")
    } else {
        format!("`{code}`")
    }
}

fn wrap_inline(marker: &str, content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return content.to_string();
    }
    let lead = if content.starts_with(char::is_whitespace) { " " } else { "" };
    let trail = if content.ends_with(char::is_whitespace) { " " } else { "" };
    format!("{lead}{marker}{trimmed}{marker}{trail}")
}

fn block(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n\n{trimmed}\n\n")
    }
}

fn is_block_container(tag: &str) -> bool {
    matches!(
        tag,
        "html"
            | "body"
            | "div"
            | "section"
            | "article"
            | "main"
            | "header"
            | "footer"
            | "aside"
            | "nav"
            | "ul"
            | "ol"
            | "blockquote"
            | "table"
            | "thead"
            | "tbody"
            | "tfoot"
            | "tr"
            | "figure"
    )
}

fn trim_line_starts(inline: &str) -> String {
    inline
        .split('\n')
        .map(str::trim_start)
        .collect::<Vec<_>>()
        .join("\n")
}

fn collapse_whitespace(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_ascii_whitespace() {
            if !in_space {
                output.push(' ');
            }
            in_space = true;
        } else {
            output.push(ch);
            in_space = false;
        }
    }
    output
}

fn element_tag(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

fn element_attribute(node: &Handle, key: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == key)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

fn has_child_element(node: &Handle, tag: &str) -> bool {
    node.children
        .borrow()
        .iter()
        .any(|child| element_tag(child).as_deref() == Some(tag))
}

fn text_content(node: &Handle) -> String {
    let mut output = String::new();
    collect_text(node, &mut output);
    output
}

fn collect_text(node: &Handle, output: &mut String) {
    match &node.data {
        NodeData::Text { contents } => output.push_str(&contents.borrow()),
        _ => {
            for child in node.children.borrow().iter() {
                collect_text(child, output);
            }
        }
    }
}

/// Normalize blank lines outside fenced code and end with a single newline.
fn tidy(raw: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut in_fence = false;
    let mut previous_blank = true;

    for line in raw.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            lines.push(line);
            previous_blank = false;
            continue;
        }
        if in_fence {
            lines.push(line);
            continue;
        }
        if line.trim().is_empty() {
            if !previous_blank {
                lines.push("");
            }
            previous_blank = true;
            continue;
        }
        lines.push(line);
        previous_blank = false;
    }

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n", lines.join("\n"))
    }
}
