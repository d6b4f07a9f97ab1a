//! Translate design geometry into scale+offset positioning.
//!
//! Three regimes, checked in order: flow-managed children (the parent's list
//! layout owns position), the root (centered on screen), and free-floating
//! nodes (per-axis constraints against the parent's box).

use serde::Serialize;

use crate::diagnostics::{Diagnostics, WarningKind};
use crate::overrides::RuleSet;
use crate::types::{Constraint, DesignNode, Sizing};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct UDim {
    pub scale: f64,
    pub offset: f64,
}

impl UDim {
    pub const fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }

    pub const fn offset(offset: f64) -> Self {
        Self { scale: 0.0, offset }
    }

    pub const fn scale(scale: f64) -> Self {
        Self { scale, offset: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct UDim2 {
    pub x: UDim,
    pub y: UDim,
}

impl UDim2 {
    pub const fn new(x: UDim, y: UDim) -> Self {
        Self { x, y }
    }

    pub const fn from_offset(x: f64, y: f64) -> Self {
        Self::new(UDim::offset(x), UDim::offset(y))
    }

    pub const fn from_scale(x: f64, y: f64) -> Self {
        Self::new(UDim::scale(x), UDim::scale(y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Geometry {
    pub position: UDim2,
    pub size: UDim2,
    pub anchor: Vector2,
}

/// What a child needs to know about the box it is placed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentFrame {
    pub flow_managed: bool,
    pub width: f64,
    pub height: f64,
}

impl ParentFrame {
    pub fn of(node: &DesignNode) -> Self {
        Self {
            flow_managed: node.layout().is_some(),
            width: node.width,
            height: node.height,
        }
    }

    /// A free-floating box, for synthetic siblings placed by hand.
    pub fn free(width: f64, height: f64) -> Self {
        Self {
            flow_managed: false,
            width,
            height,
        }
    }
}

struct AxisPlacement {
    position: UDim,
    size: UDim,
    anchor: f64,
}

/// Compute position, size and anchor for `node` inside `parent`.
pub fn translate(
    node: &DesignNode,
    parent: ParentFrame,
    is_root: bool,
    rules: &RuleSet,
    diag: &mut Diagnostics,
) -> Geometry {
    if parent.flow_managed && !is_root {
        return Geometry {
            position: UDim2::default(),
            size: UDim2::new(
                flow_size(node.layout_sizing_horizontal, node.width),
                flow_size(node.layout_sizing_vertical, node.height),
            ),
            anchor: Vector2::default(),
        };
    }

    if is_root {
        return Geometry {
            position: UDim2::from_scale(0.5, 0.5),
            size: UDim2::from_offset(node.width, node.height),
            anchor: Vector2 { x: 0.5, y: 0.5 },
        };
    }

    let (horizontal, vertical) = if rules.forces_stretch(node) {
        (Constraint::Stretch, Constraint::Stretch)
    } else {
        (node.constraints.horizontal, node.constraints.vertical)
    };
    let x = place_axis(horizontal, node.x, node.width, parent.width, &node.id, diag);
    let y = place_axis(vertical, node.y, node.height, parent.height, &node.id, diag);
    Geometry {
        position: UDim2::new(x.position, y.position),
        size: UDim2::new(x.size, y.size),
        anchor: Vector2 {
            x: x.anchor,
            y: y.anchor,
        },
    }
}

fn flow_size(sizing: Sizing, extent: f64) -> UDim {
    match sizing {
        Sizing::Fill => UDim::scale(1.0),
        Sizing::Hug | Sizing::Fixed => UDim::offset(extent),
    }
}

fn place_axis(
    constraint: Constraint,
    pos: f64,
    size: f64,
    parent: f64,
    node_id: &str,
    diag: &mut Diagnostics,
) -> AxisPlacement {
    match constraint {
        Constraint::Min => AxisPlacement {
            position: UDim::offset(pos),
            size: UDim::offset(size),
            anchor: 0.0,
        },
        Constraint::Max => AxisPlacement {
            position: UDim::new(1.0, pos + size - parent),
            size: UDim::offset(size),
            anchor: 1.0,
        },
        Constraint::Center => AxisPlacement {
            position: UDim::new(0.5, pos + size / 2.0 - parent / 2.0),
            size: UDim::offset(size),
            anchor: 0.5,
        },
        Constraint::Stretch => AxisPlacement {
            position: UDim::offset(pos),
            size: UDim::new(1.0, size - parent),
            anchor: 0.0,
        },
        Constraint::Scale if parent > 0.0 => AxisPlacement {
            position: UDim::scale(pos / parent),
            size: UDim::scale(size / parent),
            anchor: 0.0,
        },
        Constraint::Scale => {
            diag.warn(
                WarningKind::DegenerateParent,
                node_id,
                "scale constraint against a zero-sized parent; using fixed offsets",
            );
            place_axis(Constraint::Min, pos, size, parent, node_id, diag)
        }
    }
}

/// Whether a child's declared box reaches outside its parent's box.
pub fn overflows(child: &DesignNode, parent_width: f64, parent_height: f64) -> bool {
    child.x < 0.0
        || child.y < 0.0
        || child.x + child.width > parent_width
        || child.y + child.height > parent_height
}
