//! Structural diff against the previous export's snapshot.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::hashing::{content_hash, round2};
use crate::plan::primary_asset;
use crate::types::{CornerRadius, DesignNode, Effect, Paint, Snapshot, SnapshotEntry};
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiffResult {
    pub changed: BTreeSet<String>,
    pub unchanged: BTreeSet<String>,
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
    /// Node id → asset id carried over from the previous export.
    pub reuse: BTreeMap<String, String>,
}

impl DiffResult {
    pub fn summary(&self) -> DiffCounts {
        DiffCounts {
            changed: self.changed.len(),
            unchanged: self.unchanged.len(),
            added: self.added.len(),
            removed: self.removed.len(),
            reused: self.reuse.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiffCounts {
    pub changed: usize,
    pub unchanged: usize,
    pub added: usize,
    pub removed: usize,
    pub reused: usize,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum PaintSummary {
    Solid { color: String, alpha: f64 },
    Gradient { stops: Vec<(f64, String, f64)> },
    Image { hash: Option<String> },
    Other,
}

impl PaintSummary {
    fn of(paint: &Paint) -> Self {
        match paint {
            Paint::Solid(s) => PaintSummary::Solid {
                color: s.color.to_hex(),
                alpha: round2(s.color.a * s.opacity),
            },
            Paint::Image(i) => PaintSummary::Image {
                hash: i.image_hash.clone(),
            },
            other => match other.as_gradient() {
                Some((_, g)) => PaintSummary::Gradient {
                    stops: g
                        .gradient_stops
                        .iter()
                        .map(|s| (round2(s.position), s.color.to_hex(), round2(s.color.a)))
                        .collect(),
                },
                None => PaintSummary::Other,
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Fingerprint<'a> {
    name: &'a str,
    width: f64,
    height: f64,
    fills: Vec<PaintSummary>,
    strokes: Vec<PaintSummary>,
    stroke_weight: f64,
    effects: Vec<&'a Effect>,
    opacity: f64,
    corner_radius: &'a CornerRadius,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    /// Planned content hashes, so a re-rendered image never matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    raster: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    background: Option<&'a str>,
    child_count: usize,
    child_names: Vec<&'a str>,
}

/// Hash of the visually relevant subset of a node. Position, ids and
/// metadata are deliberately left out. Expects planning to have run so
/// raster and background hashes are set.
pub fn fingerprint(node: &DesignNode) -> Result<String> {
    let children: Vec<&DesignNode> = node.live_children().collect();
    let print = Fingerprint {
        name: &node.name,
        width: round2(node.width),
        height: round2(node.height),
        fills: node.visible_fills().map(PaintSummary::of).collect(),
        strokes: node
            .strokes
            .iter()
            .filter(|p| p.is_visible())
            .map(PaintSummary::of)
            .collect(),
        stroke_weight: round2(node.stroke_weight),
        effects: node.effects.iter().filter(|e| e.is_visible()).collect(),
        opacity: round2(node.opacity),
        corner_radius: &node.corner_radius,
        text: node.text().map(|t| t.characters.as_str()),
        raster: node.annotations.raster.as_ref().map(|r| r.hash.as_str()),
        background: node.annotations.background.as_ref().map(|r| r.hash.as_str()),
        child_count: children.len(),
        child_names: children.iter().map(|c| c.name.as_str()).collect(),
    };
    Ok(content_hash(&print)?)
}

/// Classify every live node against the previous snapshot.
pub fn diff(root: &DesignNode, previous: Option<&Snapshot>) -> Result<DiffResult> {
    let mut result = DiffResult::default();
    let mut current_ids = BTreeSet::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        current_ids.insert(node.id.clone());
        let print = fingerprint(node)?;
        match previous.and_then(|p| p.entries.get(&node.id)) {
            None => {
                result.added.insert(node.id.clone());
            }
            Some(entry) if entry.structural_hash == print => {
                result.unchanged.insert(node.id.clone());
                if let Some(asset_id) = &entry.asset_id {
                    result.reuse.insert(node.id.clone(), asset_id.clone());
                }
            }
            Some(_) => {
                result.changed.insert(node.id.clone());
            }
        }
        stack.extend(node.live_children());
    }
    if let Some(previous) = previous {
        result.removed = previous
            .entries
            .keys()
            .filter(|id| !current_ids.contains(*id))
            .cloned()
            .collect();
    }
    Ok(result)
}

/// Carry previous asset ids onto unchanged nodes so they skip the cache.
/// Returns how many references were filled.
pub fn apply_reuse(root: &mut DesignNode, reuse: &BTreeMap<String, String>) -> usize {
    let mut applied = 0;
    if let Some(asset_id) = reuse.get(&root.id) {
        let target = match (&mut root.annotations.raster, &mut root.annotations.background) {
            (Some(raster), _) => Some(raster),
            (None, Some(background)) => Some(background),
            (None, None) => None,
        };
        if let Some(target) = target {
            if target.asset_id.is_none() {
                target.asset_id = Some(asset_id.clone());
                applied += 1;
            }
        }
    }
    if let Some(children) = root.children_mut() {
        for child in children.iter_mut().filter(|c| c.is_live()) {
            applied += apply_reuse(child, reuse);
        }
    }
    applied
}

/// Snapshot of the current tree for the next run.
pub fn build_snapshot(root: &DesignNode) -> Result<Snapshot> {
    let mut snapshot = Snapshot::default();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        snapshot.entries.insert(
            node.id.clone(),
            SnapshotEntry {
                name: node.name.clone(),
                structural_hash: fingerprint(node)?,
                asset_id: primary_asset(node).map(str::to_string),
                width: node.width,
                height: node.height,
            },
        );
        stack.extend(node.live_children());
    }
    Ok(snapshot)
}
