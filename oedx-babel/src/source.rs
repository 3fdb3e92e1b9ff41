//! Input resolution for the forward direction
//!
//! A source is either an index file (`*.json`, `*.yaml`, `*.yml`) or a directory that
//! contains one. The directory holding the index is the content root that Markdown
//! files are looked up in.

use crate::error::{ConvertError, Result};
use crate::formats::index::IndexFormat;
use crate::model::CourseIndex;
use std::fs;
use std::path::{Path, PathBuf};

/// Fallback index names tried when a directory has no `index_file_name`.
const FALLBACK_INDEX_NAMES: [&str; 3] = ["index.json", "index.yaml", "index.yml"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub index_path: PathBuf,
    pub format: IndexFormat,
    pub content_root: PathBuf,
}

impl ResolvedSource {
    pub fn load_index(&self) -> Result<CourseIndex> {
        let text = fs::read_to_string(&self.index_path).map_err(|e| unreadable(&self.index_path, e))?;
        self.format.parse(&text)
    }
}

/// Find the index document and content root for `path`.
pub fn resolve_source(path: &Path, index_file_name: &str) -> Result<ResolvedSource> {
    if path.is_file() {
        let format = IndexFormat::detect_from_filename(path).ok_or_else(|| ConvertError::UnreadableSource {
            path: path.to_path_buf(),
            reason: "expected a .json, .yaml or .yml index file".to_string(),
        })?;
        let content_root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        return Ok(ResolvedSource {
            index_path: path.to_path_buf(),
            format,
            content_root,
        });
    }

    if path.is_dir() {
        let candidates = std::iter::once(index_file_name).chain(FALLBACK_INDEX_NAMES);
        for name in candidates {
            let candidate = path.join(name);
            if !candidate.is_file() {
                continue;
            }
            if let Some(format) = IndexFormat::detect_from_filename(&candidate) {
                return Ok(ResolvedSource {
                    index_path: candidate,
                    format,
                    content_root: path.to_path_buf(),
                });
            }
        }
        return Err(ConvertError::UnreadableSource {
            path: path.to_path_buf(),
            reason: format!("no {index_file_name} (or index.yaml) in directory"),
        });
    }

    Err(ConvertError::UnreadableSource {
        path: path.to_path_buf(),
        reason: "no such file or directory".to_string(),
    })
}

fn unreadable(path: &Path, err: std::io::Error) -> ConvertError {
    ConvertError::UnreadableSource {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
