//! Decoration child instances: corners, strokes, gradients, list layout,
//! padding, interaction records and click targets.

use serde::Serialize;

use crate::diagnostics::{Diagnostics, WarningKind};
use crate::geometry::{Geometry, UDim, UDim2, Vector2};
use crate::rbxmx::{Arena, Property, Referent};
use crate::types::{
    AxisAlign, Color, DesignNode, Easing, FlowLayout, GradientShape, InferredStroke, LayoutAxis,
    Paint, Trigger,
};

pub fn apply_geometry(arena: &mut Arena, own: Referent, geometry: &Geometry) {
    arena.set(own, "Position", Property::UDim2(geometry.position));
    arena.set(own, "Size", Property::UDim2(geometry.size));
    arena.set(own, "AnchorPoint", Property::Vector2(geometry.anchor));
}

/// Full-size, transparent geometry covering the parent.
pub fn fill_parent(arena: &mut Arena, own: Referent) {
    apply_geometry(
        arena,
        own,
        &Geometry {
            position: UDim2::default(),
            size: UDim2::from_scale(1.0, 1.0),
            anchor: Vector2::default(),
        },
    );
    arena.set(own, "BackgroundTransparency", Property::Float(1.0));
    arena.set(own, "BorderSizePixel", Property::Int(0));
}

pub fn corner(arena: &mut Arena, own: Referent, node: &DesignNode, diag: &mut Diagnostics) {
    let radius = node.corner_radius.max();
    if radius <= 0.0 {
        return;
    }
    if !node.corner_radius.is_uniform() {
        diag.warn(
            WarningKind::NonUniformCorner,
            &node.id,
            format!("per-corner radii approximated by the largest ({radius}px)"),
        );
    }
    let ui = arena.insert("UICorner", "UICorner", Some(own));
    arena.set(ui, "CornerRadius", Property::UDim(UDim::offset(radius)));
}

pub fn text_stroke(arena: &mut Arena, own: Referent, stroke: InferredStroke) {
    let ui = arena.insert("UIStroke", "UIStroke", Some(own));
    arena.set(ui, "Thickness", Property::Float(stroke.thickness));
    arena.set(
        ui,
        "Color",
        Property::Color3(stroke.color.unwrap_or(Color::BLACK)),
    );
    // Contextual: outlines the glyphs, not the label box.
    arena.set(ui, "ApplyStrokeMode", Property::Token(0));
    if let Some(color) = stroke.color {
        if color.a < 1.0 {
            arena.set(ui, "Transparency", Property::Float(1.0 - color.a));
        }
    }
}

pub fn gradient(
    arena: &mut Arena,
    own: Referent,
    paint: &Paint,
    node_id: &str,
    diag: &mut Diagnostics,
) {
    let Some((shape, grad)) = paint.as_gradient() else {
        return;
    };
    if shape != GradientShape::Linear {
        diag.warn(
            WarningKind::UnsupportedGradient,
            node_id,
            format!("{shape:?} gradient approximated as linear"),
        );
    }
    let mut stops: Vec<(f64, Color)> = grad
        .gradient_stops
        .iter()
        .map(|s| (s.position.clamp(0.0, 1.0), s.color))
        .collect();
    stops.sort_by(|a, b| a.0.total_cmp(&b.0));
    if stops.is_empty() {
        return;
    }
    // The engine requires keypoints at both ends.
    if let Some(&(t, c)) = stops.first() {
        if t > 0.0 {
            stops.insert(0, (0.0, c));
        }
    }
    if let Some(&(t, c)) = stops.last() {
        if t < 1.0 {
            stops.push((1.0, c));
        }
    }

    let ui = arena.insert("UIGradient", "UIGradient", Some(own));
    arena.set(ui, "Color", Property::ColorSequence(stops.clone()));
    if stops.iter().any(|(_, c)| c.a < 1.0) || grad.opacity < 1.0 {
        arena.set(
            ui,
            "Transparency",
            Property::NumberSequence(
                stops
                    .iter()
                    .map(|(t, c)| (*t, 1.0 - (c.a * grad.opacity).clamp(0.0, 1.0)))
                    .collect(),
            ),
        );
    }
    if let [from, to, ..] = grad.gradient_handle_positions.as_slice() {
        let angle = (to.y - from.y).atan2(to.x - from.x).to_degrees();
        if angle.abs() > f64::EPSILON {
            arena.set(ui, "Rotation", Property::Float(angle));
        }
    }
}

fn alignment(align: AxisAlign, node_id: &str, diag: &mut Diagnostics) -> u32 {
    match align {
        AxisAlign::Min => 1,
        AxisAlign::Center => 0,
        AxisAlign::Max => 2,
        AxisAlign::SpaceBetween | AxisAlign::Baseline => {
            diag.warn(
                WarningKind::UnsupportedAlignment,
                node_id,
                format!("{align:?} alignment approximated as center"),
            );
            0
        }
    }
}

pub fn list_layout(
    arena: &mut Arena,
    own: Referent,
    layout: &FlowLayout,
    node_id: &str,
    diag: &mut Diagnostics,
) {
    let ui = arena.insert("UIListLayout", "UIListLayout", Some(own));
    let (direction, horizontal, vertical) = match layout.mode {
        LayoutAxis::Horizontal => (
            0,
            alignment(layout.primary_axis_align_items, node_id, diag),
            alignment(layout.counter_axis_align_items, node_id, diag),
        ),
        LayoutAxis::Vertical => (
            1,
            alignment(layout.counter_axis_align_items, node_id, diag),
            alignment(layout.primary_axis_align_items, node_id, diag),
        ),
    };
    arena.set(ui, "FillDirection", Property::Token(direction));
    arena.set(ui, "HorizontalAlignment", Property::Token(horizontal));
    arena.set(ui, "VerticalAlignment", Property::Token(vertical));
    // LayoutOrder
    arena.set(ui, "SortOrder", Property::Token(2));
    arena.set(ui, "Padding", Property::UDim(UDim::offset(layout.item_spacing)));
    if layout.wrap {
        arena.set(ui, "Wraps", Property::Bool(true));
    }

    if layout.has_padding() {
        let pad = arena.insert("UIPadding", "UIPadding", Some(own));
        arena.set(pad, "PaddingLeft", Property::UDim(UDim::offset(layout.padding_left)));
        arena.set(pad, "PaddingRight", Property::UDim(UDim::offset(layout.padding_right)));
        arena.set(pad, "PaddingTop", Property::UDim(UDim::offset(layout.padding_top)));
        arena.set(pad, "PaddingBottom", Property::UDim(UDim::offset(layout.padding_bottom)));
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InteractionRecord<'a> {
    trigger: Trigger,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transition: Option<TransitionRecord<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransitionRecord<'a> {
    kind: &'a str,
    duration: f64,
    easing_style: &'static str,
    easing_direction: &'static str,
}

/// Engine tween style and direction for a design easing. The flag marks
/// approximations.
fn tween_easing(easing: Easing) -> (&'static str, &'static str, bool) {
    match easing {
        Easing::Linear => ("Linear", "In", false),
        Easing::EaseIn => ("Quad", "In", false),
        Easing::EaseOut => ("Quad", "Out", false),
        Easing::EaseInAndOut => ("Quad", "InOut", false),
        Easing::EaseInBack => ("Back", "In", false),
        Easing::EaseOutBack => ("Back", "Out", false),
        Easing::EaseInAndOutBack => ("Back", "InOut", false),
        Easing::Gentle | Easing::Slow => ("Sine", "InOut", false),
        Easing::Quick => ("Quad", "Out", false),
        Easing::Bouncy => ("Bounce", "Out", false),
        Easing::CustomCubicBezier => ("Cubic", "InOut", true),
        Easing::CustomSpring => ("Elastic", "Out", true),
        Easing::Other => ("Linear", "In", true),
    }
}

/// One `StringValue` per reaction, holding a JSON record for downstream tooling.
pub fn interactions(
    arena: &mut Arena,
    own: Referent,
    node: &DesignNode,
    diag: &mut Diagnostics,
) -> crate::Result<()> {
    for reaction in &node.reactions {
        let transition = reaction.transition.as_ref().map(|t| {
            let (style, direction, approximated) = tween_easing(t.easing);
            if approximated {
                diag.warn(
                    WarningKind::CustomEasing,
                    &node.id,
                    format!("{:?} easing approximated as {style} {direction}", t.easing),
                );
            }
            TransitionRecord {
                kind: &t.kind,
                duration: t.duration,
                easing_style: style,
                easing_direction: direction,
            }
        });
        let record = InteractionRecord {
            trigger: reaction.trigger,
            destination_id: reaction.destination_id.as_deref(),
            transition,
        };
        let value = arena.insert("StringValue", "Interaction", Some(own));
        arena.set(value, "Value", Property::String(serde_json::to_string(&record)?));
    }
    Ok(())
}

pub fn click_target(arena: &mut Arena, own: Referent, z_index: i64) -> Referent {
    let button = arena.insert("TextButton", "ClickTarget", Some(own));
    fill_parent(arena, button);
    arena.set(button, "Text", Property::String(String::new()));
    arena.set(button, "AutoButtonColor", Property::Bool(false));
    arena.set(button, "ZIndex", Property::Int(z_index));
    button
}
