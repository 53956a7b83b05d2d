//! markscan-core — Comment-stripping scanner, predicate library, and scoring.
//!
//! This crate defines the rubric data model, the scanner that turns raw
//! source into cleaned text, the predicates evaluated over it, and the
//! proportional scoring and aggregation that produce a grading report.
//! Finding files on disk and rendering reports live in sibling crates.

pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod predicate;
pub mod report;
pub mod results;
pub mod scanner;
pub mod timing;
pub mod traits;
