//! markscan-report — Rendering a grading report for people and tools.
//!
//! Markdown summary and feedback, the CSV grade sheet, and SARIF 2.1.0.
//! JSON persistence lives on `GradingReport` itself.

pub mod csv;
pub mod markdown;
pub mod sarif;
