//! Content aggregation for tutorial-llms.
//!
//! This crate scans the tutorial content tree, renders per-tutorial text
//! files, and writes the `llms.txt` index and `llms-full.txt` dump
//! (`generate_all`). It also provides the single-flight regeneration guard
//! and the host build-tool adapter.

pub mod assembler;
pub mod discovery;
pub mod flight;
pub mod hooks;
pub mod pipeline;
pub mod render;

#[cfg(test)]
pub(crate) mod testing;
