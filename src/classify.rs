//! Output strategy for a single design node.

use crate::overrides::RuleSet;
use crate::types::{Color, DesignNode, NodeKind, Paint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Rendered from an uploaded image (or a native fill, see [`Classification`]).
    Raster,
    /// Native text label; never rasterized so its string stays mutable.
    Text,
    /// Native frame whose children are emitted recursively.
    Container,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub strategy: Strategy,
    /// Set when the whole paint is one flat color the engine can draw itself.
    pub native_fill: Option<Color>,
    /// A leaf with nothing to draw; emitted as a transparent frame.
    pub paintless: bool,
}

impl Classification {
    /// Whether this node's own paint has to go through the asset cache.
    pub fn needs_raster(&self) -> bool {
        self.strategy == Strategy::Raster && self.native_fill.is_none() && !self.paintless
    }
}

/// Classify a node. Depends only on the node itself and the rule table.
pub fn classify(node: &DesignNode, rules: &RuleSet) -> Classification {
    let flattened = rules.is_flattened(node);
    let strategy = if flattened {
        Strategy::Raster
    } else {
        match &node.kind {
            NodeKind::Text(_) => Strategy::Text,
            NodeKind::Frame(c)
            | NodeKind::Group(c)
            | NodeKind::Component(c)
            | NodeKind::ComponentSet(c)
            | NodeKind::Instance(c)
            | NodeKind::Section(c)
            | NodeKind::BooleanOperation(c) => {
                if c.children.is_empty() {
                    Strategy::Raster
                } else {
                    Strategy::Container
                }
            }
            NodeKind::Rectangle
            | NodeKind::Ellipse
            | NodeKind::Vector
            | NodeKind::Line
            | NodeKind::Star
            | NodeKind::Polygon => Strategy::Raster,
        }
    };

    let native_fill = if flattened || strategy == Strategy::Text {
        None
    } else {
        native_solid_fill(node)
    };

    let paintless = !flattened
        && strategy == Strategy::Raster
        && node.children().is_empty()
        && node.visible_fills().next().is_none()
        && !node.has_visible_stroke()
        && !node.has_visible_effect();

    Classification {
        strategy,
        native_fill,
        paintless,
    }
}

/// Exactly one visible fill, flat solid, and no visible stroke.
pub fn native_solid_fill(node: &DesignNode) -> Option<Color> {
    if node.has_visible_stroke() {
        return None;
    }
    let mut fills = node.visible_fills();
    let only = fills.next()?;
    if fills.next().is_some() {
        return None;
    }
    match only {
        Paint::Solid(solid) => Some(Color {
            a: solid.color.a * solid.opacity,
            ..solid.color
        }),
        _ => None,
    }
}

/// Containers keep a native background unless their own paint needs an underlay.
pub fn needs_background_underlay(node: &DesignNode, classification: &Classification) -> bool {
    classification.strategy == Strategy::Container
        && classification.native_fill.is_none()
        && (node.visible_fills().next().is_some() || node.has_visible_stroke())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        ColorStop, ContainerProps, GradientPaint, ImagePaint, SolidPaint, TextPayload, TextStyle,
    };

    fn solid(r: f64) -> Paint {
        Paint::Solid(SolidPaint {
            visible: true,
            opacity: 1.0,
            color: Color {
                r,
                g: 0.0,
                b: 0.0,
                a: 1.0,
            },
        })
    }

    fn frame(children: Vec<DesignNode>) -> DesignNode {
        DesignNode::new(
            "f",
            "Frame",
            NodeKind::Frame(ContainerProps {
                children,
                ..ContainerProps::default()
            }),
        )
    }

    fn text_node() -> DesignNode {
        DesignNode::new(
            "t",
            "Label",
            NodeKind::Text(TextPayload {
                characters: "Hi".into(),
                style: TextStyle::default(),
            }),
        )
    }

    #[test]
    fn priority_order_is_flatten_text_leaf_container() {
        let rules = RuleSet::default();

        let mut flattened = frame(vec![text_node()]);
        flattened.name = "Logo [flatten]".into();
        assert_eq!(classify(&flattened, &rules).strategy, Strategy::Raster);

        let mut flat_text = text_node();
        flat_text.name = "Fancy [flatten]".into();
        assert_eq!(classify(&flat_text, &rules).strategy, Strategy::Raster);

        assert_eq!(classify(&text_node(), &rules).strategy, Strategy::Text);
        assert_eq!(classify(&frame(vec![]), &rules).strategy, Strategy::Raster);
        assert_eq!(
            classify(&DesignNode::new("r", "Rect", NodeKind::Rectangle), &rules).strategy,
            Strategy::Raster
        );
        assert_eq!(classify(&frame(vec![text_node()]), &rules).strategy, Strategy::Container);
    }

    #[test]
    fn classify_is_deterministic() {
        let rules = RuleSet::default();
        let nodes = vec![
            frame(vec![text_node()]),
            frame(vec![]),
            text_node(),
            DesignNode::new("e", "Dot", NodeKind::Ellipse),
        ];
        for node in &nodes {
            assert_eq!(classify(node, &rules), classify(node, &rules));
        }
    }

    #[test]
    fn single_solid_fill_without_stroke_is_native() {
        let rules = RuleSet::default();
        let mut rect = DesignNode::new("r", "Rect", NodeKind::Rectangle);
        rect.fills.push(solid(1.0));
        let class = classify(&rect, &rules);
        assert_eq!(class.strategy, Strategy::Raster);
        assert!(class.native_fill.is_some());
        assert!(!class.needs_raster());

        rect.strokes.push(solid(0.0));
        rect.stroke_weight = 1.0;
        assert!(classify(&rect, &rules).needs_raster());
    }

    #[test]
    fn hidden_fills_do_not_count() {
        let rules = RuleSet::default();
        let mut rect = DesignNode::new("r", "Rect", NodeKind::Rectangle);
        rect.fills.push(solid(1.0));
        rect.fills.push(Paint::Image(ImagePaint {
            visible: false,
            opacity: 1.0,
            image_hash: Some("img".into()),
            scale_mode: None,
        }));
        assert!(classify(&rect, &rules).native_fill.is_some());
    }

    #[test]
    fn gradient_or_multiple_fills_are_not_native() {
        let rules = RuleSet::default();
        let mut rect = DesignNode::new("r", "Rect", NodeKind::Rectangle);
        rect.fills.push(Paint::GradientLinear(GradientPaint {
            visible: true,
            opacity: 1.0,
            gradient_stops: vec![ColorStop {
                position: 0.0,
                color: Color::BLACK,
            }],
            gradient_handle_positions: vec![],
        }));
        assert!(classify(&rect, &rules).needs_raster());

        let mut two = DesignNode::new("r2", "Rect", NodeKind::Rectangle);
        two.fills = vec![solid(1.0), solid(0.5)];
        assert!(classify(&two, &rules).needs_raster());
    }

    #[test]
    fn empty_leaf_needs_no_raster() {
        let rules = RuleSet::default();
        let spacer = frame(vec![]);
        let class = classify(&spacer, &rules);
        assert_eq!(class.strategy, Strategy::Raster);
        assert!(class.paintless);
        assert!(!class.needs_raster());
    }

    #[test]
    fn flattened_solid_node_is_not_native() {
        let rules = RuleSet::default();
        let mut rect = DesignNode::new("r", "Swatch [flatten]", NodeKind::Rectangle);
        rect.fills.push(solid(1.0));
        assert!(classify(&rect, &rules).needs_raster());
    }

    #[test]
    fn container_underlay_only_for_non_solid_paint() {
        let rules = RuleSet::default();
        let mut solid_frame = frame(vec![text_node()]);
        solid_frame.fills.push(solid(1.0));
        let class = classify(&solid_frame, &rules);
        assert!(!needs_background_underlay(&solid_frame, &class));

        let mut bare = frame(vec![text_node()]);
        let class = classify(&bare, &rules);
        assert!(!needs_background_underlay(&bare, &class));

        bare.fills = vec![solid(1.0), solid(0.2)];
        let class = classify(&bare, &rules);
        assert!(needs_background_underlay(&bare, &class));
    }
}
