use std::path::PathBuf;

use serde::Serialize;

use crate::diagnostics::Warning;
use crate::diff::{DiffCounts, DiffResult};
use crate::error::ErrorPayload;
use crate::pipeline::CompileReport;

/// Schema version for output payloads.
pub const FIGRBX_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum CliOutput {
    Compile(CompileOutput),
    Diff(DiffOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOutput {
    pub version: String,
    pub manifest: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
    pub root_name: String,
    pub instances: usize,
    pub required_assets: usize,
    pub uploaded: usize,
    pub cache_hits: usize,
    pub reused: usize,
    pub stroke_groups: usize,
    pub diff: DiffCounts,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
    /// The document itself, only when no output path was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
}

impl CompileOutput {
    pub fn from_report(
        manifest: PathBuf,
        report: CompileReport,
        diff: &DiffResult,
    ) -> Self {
        Self {
            version: FIGRBX_OUTPUT_VERSION.to_string(),
            manifest,
            output_path: None,
            snapshot_path: None,
            root_name: report.root_name,
            instances: report.instances,
            required_assets: report.required_assets,
            uploaded: report.uploaded.len(),
            cache_hits: report.cache_hits,
            reused: report.reused,
            stroke_groups: report.stroke_groups,
            diff: diff.summary(),
            warnings: report.warnings,
            document: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffOutput {
    pub version: String,
    pub manifest: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<PathBuf>,
    pub counts: DiffCounts,
    pub changed: Vec<String>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl DiffOutput {
    pub fn new(manifest: PathBuf, previous: Option<PathBuf>, diff: &DiffResult) -> Self {
        Self {
            version: FIGRBX_OUTPUT_VERSION.to_string(),
            manifest,
            previous,
            counts: diff.summary(),
            changed: diff.changed.iter().cloned().collect(),
            added: diff.added.iter().cloned().collect(),
            removed: diff.removed.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    pub error: ErrorPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::WarningKind;
    use crate::error::ErrorCategory;
    use std::collections::BTreeSet;

    #[test]
    fn compile_output_serializes_with_mode_tag() {
        let report = CompileReport {
            root_name: "Shop".into(),
            instances: 12,
            required_assets: 3,
            uploaded: vec!["h1".into()],
            cache_hits: 2,
            reused: 0,
            stroke_groups: 1,
            stroke_duplicates: 8,
            warnings: vec![Warning {
                kind: WarningKind::UnmappedFont,
                node_id: None,
                message: "font".into(),
            }],
        };
        let output = CliOutput::Compile(CompileOutput::from_report(
            PathBuf::from("shop.json"),
            report,
            &DiffResult::default(),
        ));

        let json = serde_json::to_string(&output).expect("serialize compile output");
        assert!(json.contains("\"mode\":\"compile\""));
        assert!(json.contains("\"uploaded\":1"));
        assert!(json.contains("\"kind\":\"unmapped-font\""));
        assert!(!json.contains("\"document\""));
    }

    #[test]
    fn diff_output_lists_ids() {
        let diff = DiffResult {
            added: BTreeSet::from(["B".to_string()]),
            removed: BTreeSet::from(["C".to_string()]),
            ..DiffResult::default()
        };
        let output = CliOutput::Diff(DiffOutput::new(PathBuf::from("m.json"), None, &diff));
        let json = serde_json::to_string(&output).expect("serialize diff output");
        assert!(json.contains("\"mode\":\"diff\""));
        assert!(json.contains("\"added\":[\"B\"]"));
        assert!(json.contains("\"removed\":[\"C\"]"));
    }

    #[test]
    fn error_output_carries_category() {
        let output = CliOutput::Error(ErrorOutput {
            version: FIGRBX_OUTPUT_VERSION.to_string(),
            error: ErrorPayload::new(ErrorCategory::Config, "bad".into(), "fix it"),
        });
        let json = serde_json::to_string(&output).expect("serialize error output");
        assert!(json.contains("\"mode\":\"error\""));
        assert!(json.contains("\"remediation\":\"fix it\""));
    }
}
