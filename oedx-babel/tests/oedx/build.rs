//! Forward tree builder tests (course-index → structural XML files)

use crate::common::{dump, scenario_index};
use insta::assert_snapshot;
use oedx_babel::formats::oedx::build_tree;
use oedx_babel::ids::is_safe_relative_path;
use oedx_babel::model::{Chapter, Component, Deliverable, Sequential, Vertical};
use oedx_babel::Settings;

#[test]
fn test_scenario_package_layout() {
    let files = build_tree(&scenario_index(), &Settings::default()).unwrap();

    assert_snapshot!(dump(&files), @r#"
    --- chapter/ironhack-course-chapter.xml
    <?xml version="1.0"?>
    <chapter display_name="C1">
        <sequential url_name="ironhack-course-chapter-sequential"/>
    </chapter>
    --- course.xml
    <?xml version="1.0"?>
    <course url_name="ironhack-course" org="IRONHACK" course="101"/>
    --- course/ironhack-course.xml
    <?xml version="1.0"?>
    <course display_name="X">
        <chapter url_name="ironhack-course-chapter"/>
    </course>
    --- html/ironhack-course-chapter-sequential-vertical-html.xml
    <?xml version="1.0"?>
    <html filename="a-b"/>
    --- sequential/ironhack-course-chapter-sequential.xml
    <?xml version="1.0"?>
    <sequential display_name="S1">
        <vertical url_name="ironhack-course-chapter-sequential-vertical"/>
    </sequential>
    --- vertical/ironhack-course-chapter-sequential-vertical.xml
    <?xml version="1.0"?>
    <vertical display_name="V1">
        <html url_name="ironhack-course-chapter-sequential-vertical-html"/>
    </vertical>
    "#);
}

#[test]
fn test_vertical_reference_matches_leaf_file_stem() {
    let files = build_tree(&scenario_index(), &Settings::default()).unwrap();
    let vertical = files
        .get("vertical/ironhack-course-chapter-sequential-vertical.xml")
        .unwrap();

    let doc = roxmltree::Document::parse(vertical).unwrap();
    let url_name = doc
        .root_element()
        .children()
        .find(|node| node.has_tag_name("html"))
        .and_then(|node| node.attribute("url_name"))
        .unwrap();
    assert!(files.contains(&format!("html/{url_name}.xml")));
}

#[test]
fn test_configured_prefix_and_org() {
    let mut settings = Settings::default();
    settings.package.org = "ACME".to_string();
    settings.package.url_prefix = "acme".to_string();
    settings.xml.indent = "  ".to_string();

    let files = build_tree(&scenario_index(), &settings).unwrap();
    assert_eq!(
        files.get("course.xml"),
        Some("<?xml version=\"1.0\"?>\n<course url_name=\"acme-course\" org=\"ACME\" course=\"101\"/>\n")
    );
    assert_eq!(
        files.get("course/acme-course.xml"),
        Some("<?xml version=\"1.0\"?>\n<course display_name=\"X\">\n  <chapter url_name=\"acme-course-chapter\"/>\n</course>\n")
    );
}

#[test]
fn test_deliverables_never_get_files() {
    let mut index = scenario_index();
    let vertical = &mut index.course.chapter[0].sequential[0].vertical[0];
    vertical.component.insert(
        0,
        Component::Deliverable(Deliverable {
            display_name: Some("Lab".to_string()),
            ..Deliverable::default()
        }),
    );

    let files = build_tree(&index, &Settings::default()).unwrap();
    assert_eq!(files.paths().filter(|p| p.contains("deliverable")).count(), 0);

    // The html leaf is now the second component
    let stem = "ironhack-course-chapter-sequential-vertical";
    let vertical = files.get(&format!("vertical/{stem}.xml")).unwrap();
    assert!(vertical.contains(&format!(
        r#"<deliverable url_name="{stem}-deliverable" display_name="Lab"/>"#
    )));
    assert!(files.contains(&format!("html/{stem}-html_1.xml")));
}

#[test]
fn test_hostile_names_stay_out_of_paths() {
    let mut index = scenario_index();
    index.course.chapter.push(Chapter {
        name: "../../etc".to_string(),
        sequential: vec![Sequential {
            name: "a/b\\c".to_string(),
            vertical: vec![Vertical {
                name: "<script>".to_string(),
                component: vec![Component::html("../outside.md")],
            }],
        }],
    });

    let files = build_tree(&index, &Settings::default()).unwrap();
    assert!(files.paths().all(is_safe_relative_path));
    let chapter = files.get("chapter/ironhack-course-chapter_1.xml").unwrap();
    assert!(chapter.contains(r#"display_name="../../etc""#));
    let vertical = files
        .get("vertical/ironhack-course-chapter_1-sequential-vertical.xml")
        .unwrap();
    assert!(vertical.contains(r#"display_name="&lt;script&gt;""#));
}

#[test]
fn test_empty_subtrees_produce_childless_files() {
    let mut index = scenario_index();
    index.course.chapter.push(Chapter {
        name: "Later".to_string(),
        sequential: vec![],
    });
    index.course.chapter[0].sequential[0].vertical.push(Vertical {
        name: "Nothing yet".to_string(),
        component: vec![],
    });

    let files = build_tree(&index, &Settings::default()).unwrap();
    assert_eq!(
        files.get("chapter/ironhack-course-chapter_1.xml"),
        Some("<?xml version=\"1.0\"?>\n<chapter display_name=\"Later\"/>\n")
    );
    assert_eq!(
        files.get("vertical/ironhack-course-chapter-sequential-vertical_1.xml"),
        Some("<?xml version=\"1.0\"?>\n<vertical display_name=\"Nothing yet\"/>\n")
    );
}
