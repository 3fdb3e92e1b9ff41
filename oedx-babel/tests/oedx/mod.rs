//! OEDX tree builder tests
//!
//! Forward output shape, and forward → reverse round trips through a real directory.

mod build;
mod roundtrip;
