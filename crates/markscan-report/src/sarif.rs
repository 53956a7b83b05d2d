//! SARIF (Static Analysis Results Interchange Format) output.
//!
//! Generates SARIF 2.1.0 documents for GitHub Code Scanning integration.
//! Each task is a rule; each failed check or failed task is a result.

use std::path::Path;

use anyhow::Result;
use serde_json::json;

use markscan_core::report::{ArtifactStatus, GradingReport};

const MISSING_ARTIFACT_RULE: &str = "missing-artifact";

/// Generate a SARIF 2.1.0 JSON document from a grading report.
pub fn generate_sarif(report: &GradingReport) -> serde_json::Value {
    let mut rules = Vec::new();
    let mut results = Vec::new();

    for task in &report.tasks {
        rules.push(json!({
            "id": task.id,
            "name": task.name,
            "shortDescription": { "text": task.name },
            "properties": { "marks": task.max },
        }));
    }
    rules.push(json!({
        "id": MISSING_ARTIFACT_RULE,
        "name": "Missing Artifact",
        "shortDescription": { "text": "A required source file was not found or could not be read" },
    }));

    for artifact in report.missing_artifacts() {
        let text = match artifact.status {
            ArtifactStatus::Unreadable => format!("{} could not be read", artifact.name),
            _ => format!("{} not found", artifact.name),
        };
        let uri = artifact.path.clone().unwrap_or_else(|| artifact.name.clone());
        results.push(json!({
            "ruleId": MISSING_ARTIFACT_RULE,
            "level": "error",
            "message": { "text": text },
            "locations": [{
                "physicalLocation": { "artifactLocation": { "uri": uri } }
            }]
        }));
    }

    for task in &report.tasks {
        if task.failed_outright() {
            for reason in &task.deductions {
                results.push(json!({
                    "ruleId": task.id,
                    "level": "error",
                    "message": { "text": format!("{}: {reason}", task.name) },
                }));
            }
            continue;
        }
        for check in task.missed() {
            results.push(json!({
                "ruleId": task.id,
                "level": "warning",
                "message": { "text": format!("{}: Missing: {}", task.name, check.label) },
            }));
        }
    }

    json!({
        "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/main/sarif-2.1/schema/sarif-schema-2.1.0.json",
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "markscan",
                    "version": env!("CARGO_PKG_VERSION"),
                    "informationUri": "https://github.com/MysterionRise/markscan",
                    "rules": rules
                }
            },
            "results": results,
            "properties": {
                "rubric": report.rubric.id,
                "total": report.total,
                "totalMax": report.total_max,
            }
        }]
    })
}

/// Write a SARIF report to a file.
pub fn write_sarif_report(report: &GradingReport, path: &Path) -> Result<()> {
    let sarif = generate_sarif(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&sarif)?;
    std::fs::write(path, json)?;
    Ok(())
}
