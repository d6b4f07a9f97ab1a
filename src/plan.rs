//! Annotate the tree with what each node needs from the asset store.
//!
//! Runs after the stroke pass and before any I/O. Each live node gets its
//! raster, background and shadow references (hash only), and the distinct
//! hashes are collected in first-seen order.

use crate::assets::{background_hash, content_hash_for, UploadJob};
use crate::classify::{classify, needs_background_underlay, Strategy};
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::overrides::RuleSet;
use crate::types::{DesignNode, RasterRef};
use crate::Result;

/// Annotate `root` in place.
pub fn annotate(root: &mut DesignNode, rules: &RuleSet, diag: &mut Diagnostics) -> Result<()> {
    annotate_node(root, false, true, rules, diag)
}

fn annotate_node(
    node: &mut DesignNode,
    parent_flow: bool,
    is_root: bool,
    rules: &RuleSet,
    diag: &mut Diagnostics,
) -> Result<()> {
    let class = classify(node, rules);
    let flattened = rules.is_flattened(node);

    node.annotations.native_fill = class.native_fill.is_some();
    node.annotations.render_bounds = node.effect_bounds();
    node.annotations.raster = if class.needs_raster() {
        Some(RasterRef::new(content_hash_for(node, flattened)?))
    } else {
        None
    };
    node.annotations.background = if needs_background_underlay(node, &class) {
        Some(RasterRef::new(background_hash(node)?))
    } else {
        None
    };
    node.annotations.shadow = match node.shadow_content_hash.as_deref() {
        Some(hash) if !hash.is_empty() && !is_root => {
            if parent_flow {
                diag.warn(
                    WarningKind::ShadowSkipped,
                    &node.id,
                    format!(
                        "detached shadow for '{}' skipped: parent layout owns sibling positions",
                        node.name
                    ),
                );
                None
            } else {
                Some(RasterRef::new(hash))
            }
        }
        _ => None,
    };

    if class.strategy == Strategy::Container {
        let flow = node.layout().is_some();
        if let Some(children) = node.children_mut() {
            for child in children.iter_mut().filter(|c| c.is_live()) {
                annotate_node(child, flow, false, rules, diag)?;
            }
        }
    }
    Ok(())
}

/// Every raster reference still lacking an asset id, one job per distinct hash.
pub fn pending_jobs(root: &DesignNode) -> Vec<UploadJob> {
    let mut jobs: Vec<UploadJob> = Vec::new();
    visit_emitted(root, &mut |node| {
        for raster in raster_refs(node) {
            if raster.asset_id.is_none() && !jobs.iter().any(|j| j.hash == raster.hash) {
                jobs.push(UploadJob {
                    hash: raster.hash.clone(),
                    node_id: node.id.clone(),
                    node_name: node.name.clone(),
                });
            }
        }
    });
    jobs
}

/// Distinct hashes the tree refers to, resolved or not.
pub fn required_hashes(root: &DesignNode) -> Vec<String> {
    let mut hashes: Vec<String> = Vec::new();
    visit_emitted(root, &mut |node| {
        for raster in raster_refs(node) {
            if !hashes.contains(&raster.hash) {
                hashes.push(raster.hash.clone());
            }
        }
    });
    hashes
}

/// Fill asset ids from a hash → id lookup.
pub fn apply_assets(root: &mut DesignNode, lookup: &dyn Fn(&str) -> Option<String>) {
    for raster in [
        &mut root.annotations.shadow,
        &mut root.annotations.background,
        &mut root.annotations.raster,
    ]
    .into_iter()
    .flatten()
    {
        if raster.asset_id.is_none() {
            raster.asset_id = lookup(&raster.hash);
        }
    }
    if let Some(children) = root.children_mut() {
        for child in children.iter_mut().filter(|c| c.is_live()) {
            apply_assets(child, lookup);
        }
    }
}

/// The asset that stands for a node as a whole: its raster, else its underlay.
pub fn primary_asset(node: &DesignNode) -> Option<&str> {
    node.annotations
        .raster
        .as_ref()
        .or(node.annotations.background.as_ref())
        .and_then(|r| r.asset_id.as_deref())
}

fn raster_refs(node: &DesignNode) -> impl Iterator<Item = &RasterRef> {
    [
        node.annotations.shadow.as_ref(),
        node.annotations.background.as_ref(),
        node.annotations.raster.as_ref(),
    ]
    .into_iter()
    .flatten()
}

/// Live nodes in emission order. Baked subtrees are not annotated, so their
/// descendants carry no references and are harmless to visit.
fn visit_emitted<'a>(node: &'a DesignNode, visit: &mut impl FnMut(&'a DesignNode)) {
    visit(node);
    for child in node.live_children() {
        visit_emitted(child, visit);
    }
}
