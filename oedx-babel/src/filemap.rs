//! Output-path → content mapping
//!
//! Both directions produce their outputs as a [`FileMap`] before anything touches the
//! disk. Keys are relative, `/`-separated paths; inserting a key twice is an
//! identifier collision.

use crate::error::{ConvertError, Result};
use crate::ids::is_safe_relative_path;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMap {
    entries: BTreeMap<String, String>,
}

impl FileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file, failing if the path is already taken.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) -> Result<()> {
        let path = path.into();
        if self.entries.contains_key(&path) {
            return Err(ConvertError::IdentifierCollision(path));
        }
        self.entries.insert(path, content.into());
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(path, content)| (path.as_str(), content.as_str()))
    }

    /// Merge `other` into `self`. The two maps must be disjoint.
    pub fn merge(mut self, other: FileMap) -> Result<FileMap> {
        for (path, content) in other.entries {
            self.insert(path, content)?;
        }
        Ok(self)
    }

    /// Write every entry below `root`, creating parent directories as needed.
    ///
    /// Returns the written paths. Every key is validated before the first write.
    pub fn materialize(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if let Some(bad) = self.paths().find(|path| !is_safe_relative_path(path)) {
            return Err(ConvertError::UnsafePath(bad.to_string()));
        }

        let mut written = Vec::with_capacity(self.entries.len());
        for (path, content) in &self.entries {
            let target = root.join(path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, content)?;
            tracing::debug!(path = %target.display(), "wrote file");
            written.push(target);
        }
        Ok(written)
    }
}

impl IntoIterator for FileMap {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
