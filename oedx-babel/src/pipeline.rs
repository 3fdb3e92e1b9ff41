//! Conversion pipeline.
//!
//! Provides the two end-to-end conversions used by the CLI:
//!
//! - [`md_to_oedx`]: course-index + Markdown folder → `course.tar.gz`
//! - [`oedx_to_md`]: OEDX directory or tarball → `index.json` + Markdown tree
//!
//! and [`probe`], which checks whether a path holds a readable OEDX tree.
//!
//! Both directions build their complete output as [`FileMap`]s before touching the
//! destination, so a failure while building leaves the destination untouched. Image
//! uploads are not performed here: [`ReverseOutcome::pending_uploads`] is handed to
//! [`crate::upload::upload_sequentially`] by the caller, after the files are written.

use crate::archive::{open_package, write_tarball};
use crate::bridge::{collect_markdown, convert_leaves, PendingUpload};
use crate::error::Result;
use crate::filemap::FileMap;
use crate::formats::index::IndexFormat;
use crate::formats::markdown::ComrakRenderer;
use crate::formats::oedx::{build_tree, parse_tree};
use crate::ids::{file_identifier, html_fragment_path};
use crate::model::{Component, CourseIndex};
use crate::settings::Settings;
use crate::source::resolve_source;
use std::path::{Path, PathBuf};

/// Specifies one conversion run.
///
/// ```ignore
/// let spec = ConvertSpec::new("course/index.json", "dist/").with_settings(settings);
/// let outcome = md_to_oedx(&spec)?;
/// ```
#[derive(Debug, Clone)]
pub struct ConvertSpec {
    /// Index file, course folder, OEDX directory or package, depending on direction.
    pub source: PathBuf,
    /// Directory that receives the output.
    pub destination: PathBuf,
    pub settings: Settings,
}

impl ConvertSpec {
    pub fn new(source: impl AsRef<Path>, destination: impl AsRef<Path>) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            destination: destination.as_ref().to_path_buf(),
            settings: Settings::default(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }
}

/// Result of a forward run.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardOutcome {
    pub archive_path: PathBuf,
    /// Number of files packed (structural XML plus HTML fragments).
    pub file_count: usize,
}

/// Result of a reverse run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseOutcome {
    pub index_path: PathBuf,
    pub markdown_files: Vec<PathBuf>,
    /// CDN images referenced by the written Markdown, not yet copied to storage.
    pub pending_uploads: Vec<PendingUpload>,
}

/// Summary of a readable OEDX tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    pub course_name: String,
    pub course_number: String,
    pub chapters: usize,
    pub html_leaves: usize,
    pub deliverables: usize,
}

/// Convert a course-index and its Markdown sources into an OEDX tarball.
///
/// # Errors
///
/// - [`crate::ConvertError::UnreadableSource`] when no index can be found or read
/// - [`crate::ConvertError::IdentifierCollision`] when two outputs claim one path
/// - I/O errors from materialization or archiving
pub fn md_to_oedx(spec: &ConvertSpec) -> Result<ForwardOutcome> {
    let settings = &spec.settings;
    let source = resolve_source(&spec.source, &settings.index_file_name)?;
    let index = source.load_index()?;
    tracing::info!(
        index = %source.index_path.display(),
        format = source.format.name(),
        "loaded course index"
    );

    let structure = build_tree(&index, settings)?;
    let renderer = ComrakRenderer::new(&settings.markdown);
    let fragments = collect_markdown(&source.content_root, &renderer)?;
    warn_unresolved_leaves(&index, &fragments);
    let files = structure.merge(fragments)?;

    let work_dir = tempfile::Builder::new().prefix("md2oedx-").tempdir()?;
    files.materialize(work_dir.path())?;
    tracing::info!(files = files.len(), "materialized package");

    let archive_path = spec.destination.join(&settings.archive.file_name);
    write_tarball(work_dir.path(), &archive_path, &settings.archive.root_dir)?;
    tracing::info!(archive = %archive_path.display(), "wrote package");

    Ok(ForwardOutcome {
        archive_path,
        file_count: files.len(),
    })
}

/// Convert an OEDX directory or tarball into a course-index plus Markdown files.
///
/// # Errors
///
/// - [`crate::ConvertError::NotAnOedxTree`] when there is no usable `course.xml`
/// - [`crate::ConvertError::MissingStructuralFile`] for dangling references
/// - [`crate::ConvertError::Xml`] for malformed structural files
pub fn oedx_to_md(spec: &ConvertSpec) -> Result<ReverseOutcome> {
    let settings = &spec.settings;
    let package = open_package(&spec.source)?;
    let tree = parse_tree(package.root())?;
    let converted = convert_leaves(package.root(), tree, &settings.images)?;

    let index_format =
        IndexFormat::detect_from_filename(Path::new(&settings.index_file_name)).unwrap_or(IndexFormat::Json);
    let mut output = FileMap::new();
    output.insert(
        settings.index_file_name.as_str(),
        index_format.serialize(&converted.index)?,
    )?;
    let output = output.merge(converted.markdown)?;

    let written = output.materialize(&spec.destination)?;
    let index_path = spec.destination.join(&settings.index_file_name);
    let markdown_files: Vec<PathBuf> = written.into_iter().filter(|path| *path != index_path).collect();
    tracing::info!(
        markdown = markdown_files.len(),
        uploads = converted.uploads.len(),
        destination = %spec.destination.display(),
        "wrote course folder"
    );

    Ok(ReverseOutcome {
        index_path,
        markdown_files,
        pending_uploads: converted.uploads,
    })
}

/// Parse the OEDX tree at `path` (directory or tarball) without writing anything.
pub fn probe(path: &Path) -> Result<ProbeReport> {
    let package = open_package(path)?;
    let tree = parse_tree(package.root())?;
    let course = &tree.index.course;
    let deliverables = components(&tree.index)
        .filter(|component| matches!(component, Component::Deliverable(_)))
        .count();

    Ok(ProbeReport {
        course_name: course.name.clone(),
        course_number: course.number.clone(),
        chapters: course.chapter.len(),
        html_leaves: tree.leaves.len(),
        deliverables,
    })
}

fn components(index: &CourseIndex) -> impl Iterator<Item = &Component> {
    index
        .course
        .chapter
        .iter()
        .flat_map(|chapter| &chapter.sequential)
        .flat_map(|sequential| &sequential.vertical)
        .flat_map(|vertical| &vertical.component)
}

/// An html leaf whose Markdown file was not found still gets its structural file, but
/// its fragment will be missing from the package.
fn warn_unresolved_leaves(index: &CourseIndex, fragments: &FileMap) {
    for component in components(index) {
        if let Component::Html { file } = component {
            if !fragments.contains(&html_fragment_path(&file_identifier(file))) {
                tracing::warn!(file = %file, "html leaf references a missing Markdown file");
            }
        }
    }
}
