//! Forward → reverse round trips
//!
//! Structure survives a trip through the package unchanged. The one expected difference
//! is the html `file`, which comes back as its flattened identifier.

use crate::common::scenario_index;
use oedx_babel::formats::oedx::{build_tree, parse_tree};
use oedx_babel::ids::file_identifier;
use oedx_babel::model::{Chapter, Component, Course, CourseIndex, Deliverable, Sequential, Vertical};
use oedx_babel::Settings;
use proptest::prelude::*;
use tempfile::tempdir;

/// The index as the reverse builder reports it: html files flattened.
fn normalized(index: &CourseIndex) -> CourseIndex {
    let mut index = index.clone();
    for chapter in &mut index.course.chapter {
        for sequential in &mut chapter.sequential {
            for vertical in &mut sequential.vertical {
                for component in &mut vertical.component {
                    if let Component::Html { file } = component {
                        *file = file_identifier(file);
                    }
                }
            }
        }
    }
    index
}

fn round_trip(index: &CourseIndex) -> CourseIndex {
    let dir = tempdir().unwrap();
    build_tree(index, &Settings::default())
        .unwrap()
        .materialize(dir.path())
        .unwrap();
    parse_tree(dir.path()).unwrap().index
}

#[test]
fn test_scenario_round_trip() {
    let index = scenario_index();
    let restored = round_trip(&index);
    assert_eq!(restored, normalized(&index));
    assert_eq!(
        restored.course.chapter[0].sequential[0].vertical[0].component[0],
        Component::html("a-b")
    );
}

#[test]
fn test_deliverables_survive_in_document_order() {
    let mut index = scenario_index();
    let components = &mut index.course.chapter[0].sequential[0].vertical[0].component;
    components.insert(
        0,
        Component::Deliverable(Deliverable {
            display_name: Some("Warm-up & quiz".to_string()),
            deliverable_identifier: Some("warm-up".to_string()),
            deliverable_description: Some("Answer \"all\" questions".to_string()),
            deliverable_duedate: None,
        }),
    );
    components.push(Component::html("c/d.md"));

    let restored = round_trip(&index);
    assert_eq!(restored, normalized(&index));
}

#[test]
fn test_line_breaks_in_names_survive() {
    let mut index = scenario_index();
    index.course.chapter[0].name = "Week 1\nIntro".to_string();
    index.course.chapter[0].sequential[0].vertical[0]
        .component
        .push(Component::Deliverable(Deliverable {
            display_name: Some("Lab\tone".to_string()),
            deliverable_description: Some("Step 1\r\nStep 2".to_string()),
            ..Deliverable::default()
        }));

    let restored = round_trip(&index);
    assert_eq!(restored, normalized(&index));
    assert_eq!(restored.course.chapter[0].name, "Week 1\nIntro");
}

#[test]
fn test_leaves_report_their_position() {
    let mut index = scenario_index();
    index.course.chapter.insert(0, Chapter::default());

    let dir = tempdir().unwrap();
    build_tree(&index, &Settings::default())
        .unwrap()
        .materialize(dir.path())
        .unwrap();
    let parsed = parse_tree(dir.path()).unwrap();

    assert_eq!(parsed.leaves.len(), 1);
    let leaf = &parsed.leaves[0];
    assert_eq!((leaf.chapter, leaf.sequential, leaf.vertical, leaf.component), (1, 0, 0, 0));
    assert_eq!(leaf.chapter_name, "C1");
    assert_eq!(leaf.filename, "a-b");
}

fn name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 &<>\"'\n\t-]{0,12}"
}

fn file() -> impl Strategy<Value = String> {
    "[a-z]{1,6}(/[a-z]{1,6}){0,2}\\.md"
}

fn index() -> impl Strategy<Value = CourseIndex> {
    let vertical = (name(), prop::collection::vec(file(), 0..3)).prop_map(|(name, files)| Vertical {
        name,
        component: files.into_iter().map(Component::html).collect(),
    });
    let sequential = (name(), prop::collection::vec(vertical, 0..3))
        .prop_map(|(name, vertical)| Sequential { name, vertical });
    let chapter = (name(), prop::collection::vec(sequential, 0..3))
        .prop_map(|(name, sequential)| Chapter { name, sequential });
    ("[0-9]{1,4}", name(), prop::collection::vec(chapter, 0..3)).prop_map(
        |(number, name, chapter)| CourseIndex {
            course: Course {
                number,
                name,
                chapter,
            },
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_round_trip_preserves_structure(index in index()) {
        prop_assert_eq!(round_trip(&index), normalized(&index));
    }
}
