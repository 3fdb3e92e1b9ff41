//! Markdown path synthesis for the reverse direction
//!
//! An html leaf's Markdown path is not stored in the package. It is rebuilt from the
//! names of its ancestors: `kebab(chapter)/kebab(sequential)/kebab(title).md`, where the
//! title is recovered from the containing vertical's name.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Strips a leading `!` and a bracketed tag such as `[LAB]` from a vertical name.
static TITLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^!?(?:\[.+\])?(?P<title>.+)$").expect("title pattern is a valid regex")
});

/// Title part of a vertical name; empty when nothing is left after the prefixes.
pub fn leaf_title(vertical_name: &str) -> String {
    TITLE_PATTERN
        .captures(vertical_name)
        .and_then(|caps| caps.name("title"))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Lower-case words joined by `-`.
///
/// Words break on any non-alphanumeric character, on lower→upper case changes, before
/// the last capital of an acronym (`XMLParser` → `xml-parser`) and between letters and
/// digits. Apostrophes are dropped rather than treated as separators.
pub fn kebab_case(text: &str) -> String {
    let chars: Vec<char> = text
        .chars()
        .filter(|ch| !matches!(ch, '\'' | '\u{2019}'))
        .collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if !current.is_empty() {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let boundary = (prev.is_lowercase() && ch.is_uppercase())
                || (prev.is_alphabetic() && ch.is_numeric())
                || (prev.is_numeric() && ch.is_alphabetic())
                || (prev.is_uppercase()
                    && ch.is_uppercase()
                    && next.is_some_and(char::is_lowercase));
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(ch.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words.join("-")
}

/// `kebab(chapter)/kebab(sequential)/kebab(title).md`.
///
/// A segment that slugs to nothing falls back to its level name, so the path never
/// contains an empty component.
pub fn markdown_path(chapter_name: &str, sequential_name: &str, vertical_name: &str) -> String {
    let segment = |name: &str, fallback: &str| {
        let slug = kebab_case(name);
        if slug.is_empty() {
            fallback.to_string()
        } else {
            slug
        }
    };
    format!(
        "{}/{}/{}.md",
        segment(chapter_name, "chapter"),
        segment(sequential_name, "sequential"),
        segment(&leaf_title(vertical_name), "vertical"),
    )
}

/// Hands out Markdown paths, suffixing `-2`, `-3`, … when a path is already taken.
#[derive(Debug, Default)]
pub struct MarkdownPaths {
    taken: HashSet<String>,
}

impl MarkdownPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, candidate: String) -> String {
        if self.taken.insert(candidate.clone()) {
            return candidate;
        }
        let stem = candidate.strip_suffix(".md").unwrap_or(&candidate);
        let mut n = 2;
        loop {
            let path = format!("{stem}-{n}.md");
            if self.taken.insert(path.clone()) {
                tracing::debug!(original = %candidate, assigned = %path, "de-duplicated Markdown path");
                return path;
            }
            n += 1;
        }
    }
}
