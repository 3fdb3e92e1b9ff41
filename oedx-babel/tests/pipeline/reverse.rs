//! Reverse pipeline tests (OEDX package → course folder)

use crate::common::{fixture, list_files, snapshot_dir};
use oedx_babel::archive::write_tarball;
use oedx_babel::model::{Component, CourseIndex};
use oedx_babel::{
    oedx_to_md, probe, upload_sequentially, ConvertError, ConvertSpec, ImageUploader,
    PendingUpload,
};
use std::fs;
use std::future::Future;
use std::sync::Mutex;
use tempfile::tempdir;

const LISTS_MD: &str = r#"# Lists and Tuples

Lists are *mutable*, tuples are not.

```python
numbers = [1, 2, 3]
point = (4, 5)
```

![Lists diagram](https://ih-materials.s3-eu-west-1.amazonaws.com/java/lists-diagram.png)

<iframe src="https://player.vimeo.com/video/42" width="640" height="360" allowfullscreen=""></iframe>
"#;

#[test]
fn test_package_becomes_course_folder() {
    let destination = tempdir().unwrap();
    let outcome = oedx_to_md(&ConvertSpec::new(fixture("package"), destination.path())).unwrap();

    assert_eq!(
        list_files(destination.path()),
        vec![
            "index.json",
            "module-1/python-basics/data-cleaning.md",
            "module-1/python-basics/lists-and-tuples.md",
        ]
    );
    assert_eq!(outcome.markdown_files.len(), 2);
    assert_eq!(
        fs::read_to_string(destination.path().join("module-1/python-basics/lists-and-tuples.md"))
            .unwrap(),
        LISTS_MD
    );

    let lab = fs::read_to_string(destination.path().join("module-1/python-basics/data-cleaning.md"))
        .unwrap();
    assert!(lab.contains(
        "Start from the [lab repository](https://github.com/ironhack-labs/lab-data-cleaning)."
    ));
    assert!(lab.contains("1. Drop duplicates\n2. Fill missing values"));
    assert!(lab.contains("![Logo](https://example.com/logo.png)"));
}

#[test]
fn test_written_index_points_at_markdown() {
    let destination = tempdir().unwrap();
    let outcome = oedx_to_md(&ConvertSpec::new(fixture("package"), destination.path())).unwrap();

    let text = fs::read_to_string(&outcome.index_path).unwrap();
    assert!(text.starts_with("{\n  \"course\": {\n    \"number\": \"300\",\n"));
    let index: CourseIndex = serde_json::from_str(&text).unwrap();
    let verticals = &index.course.chapter[0].sequential[0].vertical;
    assert_eq!(
        verticals[0].component,
        vec![Component::html("module-1/python-basics/lists-and-tuples.md")]
    );
    match &verticals[1].component[1] {
        Component::Deliverable(deliverable) => {
            assert_eq!(
                deliverable.deliverable_description.as_deref(),
                Some("Clean the dataset & push it")
            );
        }
        other => panic!("expected a deliverable, got {other:?}"),
    }
}

#[test]
fn test_cdn_images_are_collected_once() {
    let destination = tempdir().unwrap();
    let outcome = oedx_to_md(&ConvertSpec::new(fixture("package"), destination.path())).unwrap();
    assert_eq!(
        outcome.pending_uploads,
        vec![PendingUpload {
            source_url: "https://cdn.ironhack.school/content/1680000000@lists-diagram.png"
                .to_string(),
            key: "java/lists-diagram.png".to_string(),
        }]
    );
}

#[test]
fn test_two_runs_are_byte_identical() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    oedx_to_md(&ConvertSpec::new(fixture("package"), first.path())).unwrap();
    oedx_to_md(&ConvertSpec::new(fixture("package"), second.path())).unwrap();
    assert_eq!(snapshot_dir(first.path()), snapshot_dir(second.path()));
}

#[derive(Default)]
struct CountingUploader {
    keys: Mutex<Vec<String>>,
}

impl ImageUploader for CountingUploader {
    type Error = String;

    fn upload(
        &self,
        upload: &PendingUpload,
    ) -> impl Future<Output = Result<(), String>> + Send {
        self.keys.lock().unwrap().push(upload.key.clone());
        async { Ok(()) }
    }
}

struct FailingUploader;

impl ImageUploader for FailingUploader {
    type Error = &'static str;

    fn upload(
        &self,
        _upload: &PendingUpload,
    ) -> impl Future<Output = Result<(), &'static str>> + Send {
        async { Err("bucket unavailable") }
    }
}

#[tokio::test]
async fn test_uploading_does_not_change_written_files() {
    let destination = tempdir().unwrap();
    let outcome = oedx_to_md(&ConvertSpec::new(fixture("package"), destination.path())).unwrap();
    let before = snapshot_dir(destination.path());

    let uploader = CountingUploader::default();
    let uploaded = upload_sequentially(&uploader, &outcome.pending_uploads)
        .await
        .unwrap();

    assert_eq!(uploaded, 1);
    assert_eq!(*uploader.keys.lock().unwrap(), vec!["java/lists-diagram.png"]);
    assert_eq!(snapshot_dir(destination.path()), before);
}

#[tokio::test]
async fn test_upload_failure_leaves_files_written() {
    let destination = tempdir().unwrap();
    let outcome = oedx_to_md(&ConvertSpec::new(fixture("package"), destination.path())).unwrap();

    let err = upload_sequentially(&FailingUploader, &outcome.pending_uploads)
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::UploadFailure { .. }));
    assert!(outcome.index_path.is_file());
}

#[test]
fn test_tarball_package_is_accepted() {
    let packages = tempdir().unwrap();
    let archive = packages.path().join("course.tar.gz");
    write_tarball(&fixture("package"), &archive, "course").unwrap();

    let from_archive = tempdir().unwrap();
    let from_dir = tempdir().unwrap();
    oedx_to_md(&ConvertSpec::new(&archive, from_archive.path())).unwrap();
    oedx_to_md(&ConvertSpec::new(fixture("package"), from_dir.path())).unwrap();
    assert_eq!(snapshot_dir(from_archive.path()), snapshot_dir(from_dir.path()));
}

#[test]
fn test_probe_summarizes_package() {
    let report = probe(&fixture("package")).unwrap();
    assert_eq!(report.course_name, "Data Analytics");
    assert_eq!(report.course_number, "300");
    assert_eq!(report.chapters, 1);
    assert_eq!(report.html_leaves, 2);
    assert_eq!(report.deliverables, 1);
}

#[test]
fn test_dangling_reference_is_reported() {
    let package = tempdir().unwrap();
    for relative in list_files(&fixture("package")) {
        if relative.starts_with("vertical/") && relative.contains("vertical_1") {
            continue;
        }
        let target = package.path().join(&relative);
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::copy(fixture("package").join(&relative), target).unwrap();
    }

    let destination = tempdir().unwrap();
    let err = oedx_to_md(&ConvertSpec::new(package.path(), destination.path())).unwrap_err();
    match err {
        ConvertError::MissingStructuralFile(path) => {
            assert!(path.ends_with("vertical/ironhack-course-chapter-sequential-vertical_1.xml"))
        }
        other => panic!("expected MissingStructuralFile, got {other:?}"),
    }
    assert!(list_files(destination.path()).is_empty());
}
