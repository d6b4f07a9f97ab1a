//! Collapse text layers duplicated to fake an outline.
//!
//! Tools without native text strokes are often worked around by stacking many
//! copies of one text layer at small offsets under a styled copy. Each such
//! group is reduced to one survivor carrying an inferred stroke.
//!
//! The thresholds are tuned against one tool's exports and are configurable.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::StrokeThresholds;
use crate::types::{DesignNode, InferredStroke};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeReport {
    pub groups_collapsed: usize,
    pub duplicates_marked: usize,
}

type GroupKey = (String, u64, String);

/// Resolve every sibling list in the tree, bottom-up safe and idempotent.
pub fn resolve(root: &mut DesignNode, thresholds: &StrokeThresholds) -> StrokeReport {
    let mut report = StrokeReport::default();
    resolve_level(root, thresholds, &mut report);
    if report.groups_collapsed > 0 {
        tracing::debug!(
            groups = report.groups_collapsed,
            duplicates = report.duplicates_marked,
            "collapsed stroke-simulation groups"
        );
    }
    report
}

fn resolve_level(node: &mut DesignNode, thresholds: &StrokeThresholds, report: &mut StrokeReport) {
    let Some(children) = node.children_mut() else {
        return;
    };

    for group in candidate_groups(children, thresholds.min_group) {
        if let Some(collapse) = evaluate_group(children, &group, thresholds) {
            for &idx in &collapse.duplicates {
                children[idx].annotations.stroke_duplicate = true;
            }
            children[collapse.survivor].annotations.inferred_stroke = Some(collapse.stroke);
            report.groups_collapsed += 1;
            report.duplicates_marked += collapse.duplicates.len();
        }
    }

    for child in children.iter_mut().filter(|c| c.is_live()) {
        resolve_level(child, thresholds, report);
    }
}

/// Indices of live text siblings sharing content, font size and family.
fn candidate_groups(children: &[DesignNode], min_group: usize) -> Vec<Vec<usize>> {
    let mut order: Vec<GroupKey> = Vec::new();
    let mut groups: HashMap<GroupKey, Vec<usize>> = HashMap::new();
    for (idx, child) in children.iter().enumerate() {
        if !child.is_live() {
            continue;
        }
        let Some(text) = child.text() else {
            continue;
        };
        let key = (
            text.characters.clone(),
            text.style.font_size.to_bits(),
            text.style.font_family.clone(),
        );
        let members = groups.entry(key.clone()).or_default();
        if members.is_empty() {
            order.push(key);
        }
        members.push(idx);
    }
    order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .filter(|members| members.len() >= min_group)
        .collect()
}

struct Collapse {
    survivor: usize,
    duplicates: Vec<usize>,
    stroke: InferredStroke,
}

fn evaluate_group(
    children: &[DesignNode],
    group: &[usize],
    thresholds: &StrokeThresholds,
) -> Option<Collapse> {
    let median_x = median(group.iter().map(|&i| children[i].x).collect());
    let median_y = median(group.iter().map(|&i| children[i].y).collect());

    let (core, outliers): (Vec<usize>, Vec<usize>) = group.iter().partition(|&&i| {
        (children[i].x - median_x).abs() <= thresholds.cluster_radius
            && (children[i].y - median_y).abs() <= thresholds.cluster_radius
    });

    if core.len() < thresholds.min_group {
        return None;
    }
    let spread_x = spread(core.iter().map(|&i| children[i].x));
    let spread_y = spread(core.iter().map(|&i| children[i].y));
    if spread_x > thresholds.max_spread || spread_y > thresholds.max_spread {
        return None;
    }

    let survivor = outliers
        .iter()
        .copied()
        .find(|&i| children[i].has_gradient_fill() || children[i].has_visible_effect())
        .or_else(|| outliers.last().copied())
        .or_else(|| core.last().copied())?;

    let max_spread = spread_x.max(spread_y);
    let thickness = if max_spread == 0.0 {
        2.0
    } else {
        (max_spread / 2.0).ceil()
    };
    let color = core
        .iter()
        .filter(|&&i| i != survivor)
        .find_map(|&i| children[i].first_solid_color());

    let duplicates = group.iter().copied().filter(|&i| i != survivor).collect();
    Some(Collapse {
        survivor,
        duplicates,
        stroke: InferredStroke { thickness, color },
    })
}

fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

fn spread(values: impl Iterator<Item = f64>) -> f64 {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min.is_finite() {
        max - min
    } else {
        0.0
    }
}
