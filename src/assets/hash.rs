//! Content hashes for rasters.
//!
//! The export sandbox's own hash always wins. A lone image fill reuses the
//! design tool's image hash. Anything else is hashed from its visual
//! signature, so identical paint shares one upload.

use serde::Serialize;

use crate::hashing::{content_hash, round2};
use crate::types::{CornerRadius, DesignNode, Effect, Paint, TextPayload};
use crate::Result;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VisualSignature<'a> {
    variant: &'static str,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<(f64, f64)>,
    width: f64,
    height: f64,
    rotation: f64,
    corner_radius: &'a CornerRadius,
    fills: &'a [Paint],
    strokes: &'a [Paint],
    stroke_weight: f64,
    effects: &'a [Effect],
    opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a TextPayload>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<VisualSignature<'a>>,
}

fn signature<'a>(
    node: &'a DesignNode,
    variant: &'static str,
    offset: Option<(f64, f64)>,
    with_children: bool,
) -> VisualSignature<'a> {
    let children = if with_children {
        node.live_children()
            .map(|c| signature(c, "child", Some((round2(c.x), round2(c.y))), true))
            .collect()
    } else {
        Vec::new()
    };
    VisualSignature {
        variant,
        kind: node.kind.tag(),
        offset,
        width: round2(node.width),
        height: round2(node.height),
        rotation: round2(node.rotation),
        corner_radius: &node.corner_radius,
        fills: &node.fills,
        strokes: &node.strokes,
        stroke_weight: round2(node.stroke_weight),
        effects: &node.effects,
        opacity: round2(node.opacity),
        text: node.text(),
        children,
    }
}

/// Hash for a node's primary raster. `flattened` folds descendants in.
pub fn content_hash_for(node: &DesignNode, flattened: bool) -> Result<String> {
    if let Some(hash) = node.content_hash.as_deref().filter(|h| !h.is_empty()) {
        return Ok(hash.to_string());
    }
    if let Some(hash) = lone_image_hash(node, flattened) {
        return Ok(hash.to_string());
    }
    Ok(content_hash(&signature(node, "node", None, flattened))?)
}

/// Hash for a container's background underlay; children never contribute.
pub fn background_hash(node: &DesignNode) -> Result<String> {
    Ok(content_hash(&signature(node, "background", None, false))?)
}

fn lone_image_hash(node: &DesignNode, flattened: bool) -> Option<&str> {
    if (flattened && !node.children().is_empty())
        || node.has_visible_stroke()
        || node.has_visible_effect()
    {
        return None;
    }
    let mut fills = node.visible_fills();
    let only = fills.next()?;
    if fills.next().is_some() {
        return None;
    }
    match only {
        Paint::Image(image) => image.image_hash.as_deref().filter(|h| !h.is_empty()),
        _ => None,
    }
}
