//! End-to-end conversion tests over the fixture course and package.

mod forward;
mod reverse;
