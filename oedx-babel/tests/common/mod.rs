//! Shared helpers for the integration tests.

use oedx_babel::model::{Chapter, Component, Course, CourseIndex, Sequential, Vertical};
use oedx_babel::FileMap;
use std::fs;
use std::path::{Path, PathBuf};

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// One chapter, one sequential, one vertical, one html leaf at `a/b.md`.
pub fn scenario_index() -> CourseIndex {
    CourseIndex {
        course: Course {
            number: "101".to_string(),
            name: "X".to_string(),
            chapter: vec![Chapter {
                name: "C1".to_string(),
                sequential: vec![Sequential {
                    name: "S1".to_string(),
                    vertical: vec![Vertical {
                        name: "V1".to_string(),
                        component: vec![Component::html("a/b.md")],
                    }],
                }],
            }],
        },
    }
}

/// Every entry as `--- <path>` followed by its content, in path order.
pub fn dump(files: &FileMap) -> String {
    files
        .iter()
        .map(|(path, content)| format!("--- {path}\n{content}"))
        .collect()
}

/// Every file below `root` as a sorted list of relative paths.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut found = Vec::new();
    walk(root, root, &mut found);
    found.sort();
    found
}

fn walk(root: &Path, dir: &Path, found: &mut Vec<String>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            walk(root, &path, found);
        } else {
            let relative = path.strip_prefix(root).unwrap();
            found.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }
}

/// Read every file below `root` into memory, keyed by relative path.
pub fn snapshot_dir(root: &Path) -> Vec<(String, Vec<u8>)> {
    list_files(root)
        .into_iter()
        .map(|relative| {
            let bytes = fs::read(root.join(&relative)).unwrap();
            (relative, bytes)
        })
        .collect()
}
