//! Course-index format (`index.json` / `index.yaml`)
//!
//! The index is read as either JSON or YAML and always written back as pretty-printed
//! JSON with two-space indentation.

use crate::error::Result;
use crate::model::CourseIndex;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    Json,
    Yaml,
}

impl IndexFormat {
    pub fn name(self) -> &'static str {
        match self {
            IndexFormat::Json => "json",
            IndexFormat::Yaml => "yaml",
        }
    }

    /// File extensions associated with this format, without the leading dot.
    pub fn file_extensions(self) -> &'static [&'static str] {
        match self {
            IndexFormat::Json => &["json"],
            IndexFormat::Yaml => &["yaml", "yml"],
        }
    }

    /// Detect the format from a file name's extension.
    pub fn detect_from_filename(path: &Path) -> Option<Self> {
        let extension = path.extension().and_then(|ext| ext.to_str())?;
        [IndexFormat::Json, IndexFormat::Yaml]
            .into_iter()
            .find(|format| format.file_extensions().contains(&extension))
    }

    pub fn parse(self, source: &str) -> Result<CourseIndex> {
        match self {
            IndexFormat::Json => Ok(serde_json::from_str(source)?),
            IndexFormat::Yaml => Ok(serde_yaml::from_str(source)?),
        }
    }

    pub fn serialize(self, index: &CourseIndex) -> Result<String> {
        match self {
            IndexFormat::Json => {
                let mut text = serde_json::to_string_pretty(index)?;
                text.push('\n');
                Ok(text)
            }
            IndexFormat::Yaml => Ok(serde_yaml::to_string(index)?),
        }
    }
}
