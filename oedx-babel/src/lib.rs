//! Conversion between Markdown course folders and OEDX course packages
//!
//!     This crate converts a course described by a course-index (`index.json` / `index.yaml`)
//!     plus a folder of Markdown files into an OEDX package (a tree of small XML files linked
//!     by `url_name` references, with HTML fragments for content), and back.
//!
//!     TLDR: For contributors:
//!         - Babel never renders Markdown or parses HTML itself, it relies on comrak and html5ever
//!         - Both directions build a FileMap (path → text) first and only then touch the disk
//!         - Identifiers come from ./ids.rs and nowhere else; forward and reverse must agree
//!         - Level dispatch goes through NodeType::successor, never through string keys
//!
//! Architecture
//!
//!     The structural tree mapping is the core: the course model (./model.rs) is a fixed
//!     five-level tree, course → chapter → sequential → vertical → component. The forward
//!     builder (./formats/oedx/serializer.rs) walks it depth first and emits one XML file per
//!     structural node. The reverse builder (./formats/oedx/parser.rs) starts at `course.xml`
//!     and follows `url_name` references back into the same model.
//!
//!     Leaf content travels separately through the bridge (./bridge): Markdown is rendered
//!     to fragments named after the source path, and fragments are converted back to Markdown
//!     at paths synthesized from ancestor names.
//!
//!     This is a pure lib, that is, it powers oedx-cli but is shell agnostic: no code here
//!     prints to stdout, reads env vars or exits the process. Uploads are described here and
//!     performed through the ImageUploader trait by the caller.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # ConvertError
//!     ├── model.rs                # Course-index types, NodeType, NodeRef
//!     ├── ids.rs                  # url_name / path synthesis
//!     ├── filemap.rs              # Output path → content map
//!     ├── settings.rs             # Conversion settings
//!     ├── formats
//!     │   ├── index               # index.json / index.yaml
//!     │   ├── oedx                # XML writer, forward and reverse tree builders
//!     │   ├── markdown            # Markdown → HTML (comrak)
//!     │   └── html                # HTML → Markdown (html5ever)
//!     ├── bridge                  # Leaf content, image relocation, Markdown paths
//!     ├── source.rs               # Forward input resolution
//!     ├── archive.rs              # .tar.gz packing and unpacking
//!     ├── upload.rs               # Sequential upload driver
//!     └── pipeline.rs             # End-to-end conversions
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     └── <area>
//!         ├── <testname>.rs
//!         └── fixtures
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Lossy Conversions
//!
//!     The round trip is asymmetric. Forward flattens each html leaf's `file` into an identifier
//!     (`a/b.md` → `a-b`), so reverse cannot recover the original path and synthesizes a new one
//!     from the chapter, sequential and vertical names. Everything structural (names, order,
//!     deliverables, the course number) survives.
//!
pub mod archive;
pub mod bridge;
pub mod error;
pub mod filemap;
pub mod formats;
pub mod ids;
pub mod model;
pub mod pipeline;
pub mod settings;
pub mod source;
pub mod upload;

pub use bridge::PendingUpload;
pub use error::{ConvertError, Result};
pub use filemap::FileMap;
pub use model::{Chapter, Component, Course, CourseIndex, Deliverable, NodeType, Sequential, Vertical};
pub use pipeline::{md_to_oedx, oedx_to_md, probe, ConvertSpec, ForwardOutcome, ProbeReport, ReverseOutcome};
pub use settings::Settings;
pub use upload::{upload_sequentially, ImageUploader};
