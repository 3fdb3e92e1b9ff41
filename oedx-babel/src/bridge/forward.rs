//! Markdown sources → rendered HTML fragments

use crate::error::Result;
use crate::filemap::FileMap;
use crate::formats::markdown::MarkdownRenderer;
use crate::ids::{file_identifier, html_fragment_path};
use std::fs;
use std::path::{Path, PathBuf};

/// Render every `*.md` file below `source_root` into `html/<identifier>.html`.
///
/// Hidden files and directories are skipped and symlinks are not followed. Enumeration
/// order does not matter: fragment names derive from each file's relative path.
pub fn collect_markdown(source_root: &Path, renderer: &dyn MarkdownRenderer) -> Result<FileMap> {
    let mut sources = Vec::new();
    find_markdown_files(source_root, &mut sources)?;

    let mut fragments = FileMap::new();
    for source in sources {
        let relative = pathdiff::diff_paths(&source, source_root).unwrap_or_else(|| source.clone());
        let relative = relative.to_string_lossy().replace('\\', "/");
        let markdown = fs::read_to_string(&source)?;
        let target = html_fragment_path(&file_identifier(&relative));
        tracing::debug!(source = %relative, target = %target, "rendered Markdown");
        fragments.insert(target, renderer.render(&markdown))?;
    }
    Ok(fragments)
}

fn find_markdown_files(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let file_type = entry.file_type()?;
        let path = entry.path();
        if file_type.is_dir() {
            find_markdown_files(&path, found)?;
        } else if file_type.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            found.push(path);
        }
    }
    Ok(())
}
