//! Package archives (`.tar.gz`)
//!
//! The forward direction packs the materialized working directory into a gzip-compressed
//! tarball. The reverse direction accepts either an unpacked directory or such a
//! tarball, which is unpacked into a scratch directory for the duration of the run.

use crate::error::{ConvertError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Pack every file under `source_dir` into `destination`, below `root_dir`.
///
/// Entries are added in sorted order with normalized headers, so the same input tree
/// always produces the same archive.
pub fn write_tarball(source_dir: &Path, destination: &Path, root_dir: &str) -> Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut files = Vec::new();
    collect_files(source_dir, &mut files)?;
    files.sort();

    let root = if root_dir.is_empty() { "." } else { root_dir };
    let encoder = GzEncoder::new(File::create(destination)?, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.mode(tar::HeaderMode::Deterministic);
    for file in &files {
        let relative = file
            .strip_prefix(source_dir)
            .map_err(|_| ConvertError::UnsafePath(file.display().to_string()))?;
        builder.append_path_with_name(file, Path::new(root).join(relative))?;
    }
    builder.into_inner()?.finish()?;

    tracing::debug!(
        archive = %destination.display(),
        entries = files.len(),
        "wrote tarball"
    );
    Ok(())
}

/// Unpack a `.tar.gz` archive into `destination`.
pub fn unpack_tarball(archive: &Path, destination: &Path) -> Result<()> {
    let decoder = GzDecoder::new(File::open(archive)?);
    tar::Archive::new(decoder).unpack(destination)?;
    Ok(())
}

/// An OEDX tree on disk, possibly unpacked from an archive.
///
/// The scratch directory of an unpacked archive is removed when this is dropped.
#[derive(Debug)]
pub struct PackageSource {
    root: PathBuf,
    _scratch: Option<TempDir>,
}

impl PackageSource {
    /// Directory holding `course.xml`.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

pub fn is_tarball(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    name.ends_with(".tar.gz") || name.ends_with(".tgz")
}

/// Open a reverse-conversion input: an OEDX directory or a `.tar.gz` package.
pub fn open_package(path: &Path) -> Result<PackageSource> {
    if path.is_dir() {
        return Ok(PackageSource {
            root: path.to_path_buf(),
            _scratch: None,
        });
    }

    if path.is_file() && is_tarball(path) {
        let scratch = tempfile::Builder::new().prefix("oedx2md-").tempdir()?;
        unpack_tarball(path, scratch.path())?;
        let root = find_course_root(scratch.path())?
            .ok_or_else(|| ConvertError::NotAnOedxTree(path.to_path_buf()))?;
        tracing::debug!(archive = %path.display(), root = %root.display(), "unpacked package");
        return Ok(PackageSource {
            root,
            _scratch: Some(scratch),
        });
    }

    Err(ConvertError::UnreadableSource {
        path: path.to_path_buf(),
        reason: "expected an OEDX directory or a .tar.gz package".to_string(),
    })
}

/// Shallowest directory containing `course.xml`, siblings visited in name order.
fn find_course_root(dir: &Path) -> Result<Option<PathBuf>> {
    let mut level = vec![dir.to_path_buf()];
    while !level.is_empty() {
        let mut next = Vec::new();
        for candidate in level {
            if candidate.join("course.xml").is_file() {
                return Ok(Some(candidate));
            }
            for entry in fs::read_dir(&candidate)? {
                let entry = entry?;
                if entry.file_type()?.is_dir() {
                    next.push(entry.path());
                }
            }
        }
        next.sort();
        level = next;
    }
    Ok(None)
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&entry.path(), files)?;
        } else if file_type.is_file() {
            files.push(entry.path());
        }
    }
    Ok(())
}
