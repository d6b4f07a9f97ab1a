//! Approximation and advisory warnings collected during a run.
//!
//! Warnings never interrupt compilation. Each one is logged through `tracing`
//! when raised and kept for the bulk report at the end of the run.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    UnmappedFont,
    NonUniformCorner,
    UnsupportedGradient,
    UnsupportedAlignment,
    CustomEasing,
    UnsupportedTextStyle,
    DegenerateParent,
    Overflow,
    PromotionSkipped,
    ShadowSkipped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    pub kind: WarningKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
    seen: HashSet<(WarningKind, String)>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning about a specific node.
    pub fn warn(&mut self, kind: WarningKind, node_id: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(kind = ?kind, node = node_id, "{message}");
        self.warnings.push(Warning {
            kind,
            node_id: Some(node_id.to_string()),
            message,
        });
    }

    /// Record a warning only the first time `key` is seen for this kind.
    pub fn warn_once(&mut self, kind: WarningKind, key: &str, message: impl Into<String>) {
        if !self.seen.insert((kind, key.to_string())) {
            return;
        }
        let message = message.into();
        tracing::warn!(kind = ?kind, key, "{message}");
        self.warnings.push(Warning {
            kind,
            node_id: None,
            message,
        });
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }
}
