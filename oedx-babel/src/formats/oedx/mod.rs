//! OEDX package format
//!
//! An OEDX package is a directory with one small XML file per structural node, linked by
//! `url_name` references:
//!
//! ```text
//! course.xml                                   <course url_name="ironhack-course" org=.. course=../>
//! course/ironhack-course.xml                   <course display_name=..><chapter url_name=../>..
//! chapter/ironhack-course-chapter.xml          <chapter display_name=..><sequential url_name=../>..
//! sequential/...-sequential.xml                <sequential display_name=..><vertical url_name=../>..
//! vertical/...-vertical.xml                    <vertical display_name=..><html url_name=../><deliverable ../>
//! html/...-html.xml                            <html filename="a-b"/>
//! html/a-b.html                                rendered content
//! ```
//!
//! # Element Mapping Table
//!
//! | Index node    | XML file                   | Attributes                         | Child references                   |
//! |---------------|----------------------------|------------------------------------|------------------------------------|
//! | course        | `course/<id>.xml`          | `display_name`                     | `<chapter url_name>`               |
//! | chapter       | `chapter/<id>.xml`         | `display_name`                     | `<sequential url_name>`            |
//! | sequential    | `sequential/<id>.xml`      | `display_name`                     | `<vertical url_name>`              |
//! | vertical      | `vertical/<id>.xml`        | `display_name`                     | `<html url_name>`, `<deliverable>` |
//! | html          | `html/<id>.xml`            | `filename`                         | none                               |
//! | deliverable   | no file                    | inlined on the vertical's element  | none                               |
//!
//! # Lossy Conversions
//!
//! - The `file` of an html leaf is stored as a flat identifier (`a/b.md` → `a-b`); the
//!   reverse direction synthesizes a new Markdown path from ancestor names instead.
//! - Elements other than the known levels are skipped on import.
//!
//! # Schema Variant
//!
//! The deliverable-aware variant is implemented: verticals list `component` children that
//! are either `html` or `deliverable`.

pub mod element;
pub mod parser;
pub mod serializer;

pub use element::XmlElement;
pub use parser::{parse_tree, LeafRef, ParsedTree};
pub use serializer::build_tree;
