//! Forward pipeline tests (course folder → course.tar.gz)

use crate::common::{fixture, list_files};
use oedx_babel::archive::unpack_tarball;
use oedx_babel::formats::markdown::{ComrakRenderer, MarkdownRenderer};
use oedx_babel::formats::oedx::parse_tree;
use oedx_babel::model::Component;
use oedx_babel::{md_to_oedx, ConvertError, ConvertSpec};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_bootcamp_packs_every_level() {
    let destination = tempdir().unwrap();
    let outcome = md_to_oedx(&ConvertSpec::new(fixture("bootcamp"), destination.path())).unwrap();
    assert_eq!(outcome.archive_path, destination.path().join("course.tar.gz"));

    let unpacked = tempdir().unwrap();
    unpack_tarball(&outcome.archive_path, unpacked.path()).unwrap();
    let files = list_files(unpacked.path());
    assert_eq!(
        files,
        vec![
            "course/chapter/ironhack-course-chapter.xml",
            "course/chapter/ironhack-course-chapter_1.xml",
            "course/course.xml",
            "course/course/ironhack-course.xml",
            "course/html/ironhack-course-chapter-sequential-vertical-html.xml",
            "course/html/ironhack-course-chapter-sequential-vertical_1-html.xml",
            "course/html/week-1-lab-hello.html",
            "course/html/week-1-variables.html",
            "course/sequential/ironhack-course-chapter-sequential.xml",
            "course/vertical/ironhack-course-chapter-sequential-vertical.xml",
            "course/vertical/ironhack-course-chapter-sequential-vertical_1.xml",
        ]
    );
    assert_eq!(outcome.file_count, files.len());
}

#[test]
fn test_fragments_hold_rendered_markdown() {
    let destination = tempdir().unwrap();
    let outcome = md_to_oedx(&ConvertSpec::new(fixture("bootcamp"), destination.path())).unwrap();
    let unpacked = tempdir().unwrap();
    unpack_tarball(&outcome.archive_path, unpacked.path()).unwrap();

    let source = fs::read_to_string(fixture("bootcamp/week-1/variables.md")).unwrap();
    let fragment =
        fs::read_to_string(unpacked.path().join("course/html/week-1-variables.html")).unwrap();
    assert_eq!(fragment, ComrakRenderer::default().render(&source));
    assert!(fragment.contains("<strong>statically typed</strong>"));

    let lab = fs::read_to_string(unpacked.path().join("course/html/week-1-lab-hello.html")).unwrap();
    assert!(lab.contains(r#"<iframe src="https://www.youtube.com/embed/abc123""#));
}

#[test]
fn test_packed_structure_reads_back() {
    let destination = tempdir().unwrap();
    let outcome = md_to_oedx(&ConvertSpec::new(fixture("bootcamp"), destination.path())).unwrap();
    let unpacked = tempdir().unwrap();
    unpack_tarball(&outcome.archive_path, unpacked.path()).unwrap();

    let parsed = parse_tree(&unpacked.path().join("course")).unwrap();
    let course = &parsed.index.course;
    assert_eq!(course.number, "2024");
    assert_eq!(course.name, "Java Backend");
    assert_eq!(course.chapter.len(), 2);
    assert!(course.chapter[1].sequential.is_empty());

    let lab = &course.chapter[0].sequential[0].vertical[1];
    assert_eq!(lab.name, "[LAB] Hello World");
    assert_eq!(lab.component[0], Component::html("week-1-lab-hello"));
    match &lab.component[1] {
        Component::Deliverable(deliverable) => {
            assert_eq!(deliverable.deliverable_identifier.as_deref(), Some("lab-hello-world"));
            assert_eq!(deliverable.deliverable_duedate.as_deref(), Some("2024-09-06"));
        }
        other => panic!("expected a deliverable, got {other:?}"),
    }
}

#[test]
fn test_index_file_can_be_named_directly() {
    let destination = tempdir().unwrap();
    let outcome = md_to_oedx(&ConvertSpec::new(
        fixture("bootcamp/index.yaml"),
        destination.path(),
    ))
    .unwrap();
    assert!(outcome.archive_path.is_file());
}

#[test]
fn test_missing_source_is_unreadable() {
    let destination = tempdir().unwrap();
    let err = md_to_oedx(&ConvertSpec::new(fixture("no-such-course"), destination.path())).unwrap_err();
    assert!(matches!(err, ConvertError::UnreadableSource { .. }));
    assert_eq!(fs::read_dir(destination.path()).unwrap().count(), 0);
}
