//! Design nodes as exported by the design-tool plugin sandbox.
//!
//! The node kind is a tagged union on the JSON `type` field, so every pass
//! matches exhaustively on [`NodeKind`] instead of probing optional fields.
//! Values computed while compiling live in [`Annotations`], which is never
//! read from or written to JSON.

use palette::Srgb;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_one() -> f64 {
    1.0
}

/// RGBA color with components in the 0.0-1.0 range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "default_one")]
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    pub fn to_srgb8(&self) -> Srgb<u8> {
        Srgb::new(
            self.r.clamp(0.0, 1.0) as f32,
            self.g.clamp(0.0, 1.0) as f32,
            self.b.clamp(0.0, 1.0) as f32,
        )
        .into_format::<u8>()
    }

    /// Convert to hex color string (e.g., "#ff3300").
    pub fn to_hex(&self) -> String {
        let rgb = self.to_srgb8();
        format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned rectangle in a node's local space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CornerRadius {
    Uniform(f64),
    /// Top-left, top-right, bottom-right, bottom-left.
    PerCorner([f64; 4]),
}

impl Default for CornerRadius {
    fn default() -> Self {
        CornerRadius::Uniform(0.0)
    }
}

impl CornerRadius {
    pub fn is_uniform(&self) -> bool {
        match self {
            CornerRadius::Uniform(_) => true,
            CornerRadius::PerCorner(c) => c.iter().all(|r| (r - c[0]).abs() < f64::EPSILON),
        }
    }

    pub fn max(&self) -> f64 {
        match self {
            CornerRadius::Uniform(r) => *r,
            CornerRadius::PerCorner(c) => c.iter().copied().fold(0.0, f64::max),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolidPaint {
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_one")]
    pub opacity: f64,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientPaint {
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_one")]
    pub opacity: f64,
    #[serde(default)]
    pub gradient_stops: Vec<ColorStop>,
    #[serde(default)]
    pub gradient_handle_positions: Vec<Vector>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePaint {
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_one")]
    pub opacity: f64,
    #[serde(default)]
    pub image_hash: Option<String>,
    #[serde(default)]
    pub scale_mode: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientShape {
    Linear,
    Radial,
    Angular,
    Diamond,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Paint {
    Solid(SolidPaint),
    GradientLinear(GradientPaint),
    GradientRadial(GradientPaint),
    GradientAngular(GradientPaint),
    GradientDiamond(GradientPaint),
    Image(ImagePaint),
    #[serde(other)]
    Unsupported,
}

impl Paint {
    pub fn is_visible(&self) -> bool {
        match self {
            Paint::Solid(p) => p.visible,
            Paint::GradientLinear(p)
            | Paint::GradientRadial(p)
            | Paint::GradientAngular(p)
            | Paint::GradientDiamond(p) => p.visible,
            Paint::Image(p) => p.visible,
            Paint::Unsupported => true,
        }
    }

    pub fn as_solid(&self) -> Option<&SolidPaint> {
        match self {
            Paint::Solid(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_gradient(&self) -> Option<(GradientShape, &GradientPaint)> {
        match self {
            Paint::GradientLinear(p) => Some((GradientShape::Linear, p)),
            Paint::GradientRadial(p) => Some((GradientShape::Radial, p)),
            Paint::GradientAngular(p) => Some((GradientShape::Angular, p)),
            Paint::GradientDiamond(p) => Some((GradientShape::Diamond, p)),
            _ => None,
        }
    }

    pub fn is_gradient(&self) -> bool {
        self.as_gradient().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowEffect {
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_shadow_color")]
    pub color: Color,
    #[serde(default)]
    pub offset: Vector,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub spread: f64,
}

fn default_shadow_color() -> Color {
    Color {
        a: 0.25,
        ..Color::BLACK
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlurEffect {
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    DropShadow(ShadowEffect),
    InnerShadow(ShadowEffect),
    LayerBlur(BlurEffect),
    BackgroundBlur(BlurEffect),
    #[serde(other)]
    Unsupported,
}

impl Effect {
    pub fn is_visible(&self) -> bool {
        match self {
            Effect::DropShadow(e) | Effect::InnerShadow(e) => e.visible,
            Effect::LayerBlur(e) | Effect::BackgroundBlur(e) => e.visible,
            Effect::Unsupported => false,
        }
    }
}

/// Per-axis anchoring rule for free-floating nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Constraint {
    #[default]
    #[serde(alias = "LEFT", alias = "TOP")]
    Min,
    #[serde(alias = "RIGHT", alias = "BOTTOM")]
    Max,
    Center,
    #[serde(alias = "LEFT_RIGHT", alias = "TOP_BOTTOM")]
    Stretch,
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default)]
    pub horizontal: Constraint,
    #[serde(default)]
    pub vertical: Constraint,
}

/// Child sizing mode inside a flow-managed parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sizing {
    #[default]
    Fixed,
    Fill,
    Hug,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutAxis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxisAlign {
    #[default]
    Min,
    Center,
    Max,
    SpaceBetween,
    Baseline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowLayout {
    pub mode: LayoutAxis,
    #[serde(default)]
    pub item_spacing: f64,
    #[serde(default)]
    pub padding_left: f64,
    #[serde(default)]
    pub padding_right: f64,
    #[serde(default)]
    pub padding_top: f64,
    #[serde(default)]
    pub padding_bottom: f64,
    #[serde(default)]
    pub primary_axis_align_items: AxisAlign,
    #[serde(default)]
    pub counter_axis_align_items: AxisAlign,
    #[serde(default)]
    pub wrap: bool,
}

impl FlowLayout {
    pub fn has_padding(&self) -> bool {
        [
            self.padding_left,
            self.padding_right,
            self.padding_top,
            self.padding_bottom,
        ]
        .iter()
        .any(|p| *p != 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlignHorizontal {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlignVertical {
    #[default]
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextCase {
    #[default]
    Original,
    Upper,
    Lower,
    Title,
    SmallCaps,
    SmallCapsForced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    Strikethrough,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub font_family: String,
    pub font_weight: f64,
    pub font_size: f64,
    pub text_align_horizontal: TextAlignHorizontal,
    pub text_align_vertical: TextAlignVertical,
    pub line_height_px: Option<f64>,
    pub letter_spacing: f64,
    pub text_case: TextCase,
    pub text_decoration: TextDecoration,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: String::new(),
            font_weight: 400.0,
            font_size: 14.0,
            text_align_horizontal: TextAlignHorizontal::default(),
            text_align_vertical: TextAlignVertical::default(),
            line_height_px: None,
            letter_spacing: 0.0,
            text_case: TextCase::default(),
            text_decoration: TextDecoration::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPayload {
    pub characters: String,
    #[serde(default)]
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerProps {
    #[serde(default)]
    pub children: Vec<DesignNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<FlowLayout>,
    #[serde(default)]
    pub clips_content: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trigger {
    OnClick,
    OnPress,
    OnHover,
    OnDrag,
    MouseEnter,
    MouseLeave,
    AfterTimeout,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInAndOut,
    EaseInBack,
    EaseOutBack,
    EaseInAndOutBack,
    CustomCubicBezier,
    CustomSpring,
    Gentle,
    Quick,
    Bouncy,
    Slow,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub easing: Easing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub trigger: Trigger,
    #[serde(default)]
    pub destination_id: Option<String>,
    #[serde(default)]
    pub transition: Option<Transition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Text(TextPayload),
    Frame(ContainerProps),
    Group(ContainerProps),
    Component(ContainerProps),
    ComponentSet(ContainerProps),
    Instance(ContainerProps),
    Section(ContainerProps),
    BooleanOperation(ContainerProps),
    Rectangle,
    Ellipse,
    Vector,
    Line,
    Star,
    Polygon,
}

impl NodeKind {
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::Text(_) => "TEXT",
            NodeKind::Frame(_) => "FRAME",
            NodeKind::Group(_) => "GROUP",
            NodeKind::Component(_) => "COMPONENT",
            NodeKind::ComponentSet(_) => "COMPONENT_SET",
            NodeKind::Instance(_) => "INSTANCE",
            NodeKind::Section(_) => "SECTION",
            NodeKind::BooleanOperation(_) => "BOOLEAN_OPERATION",
            NodeKind::Rectangle => "RECTANGLE",
            NodeKind::Ellipse => "ELLIPSE",
            NodeKind::Vector => "VECTOR",
            NodeKind::Line => "LINE",
            NodeKind::Star => "STAR",
            NodeKind::Polygon => "POLYGON",
        }
    }

    pub fn container(&self) -> Option<&ContainerProps> {
        match self {
            NodeKind::Frame(c)
            | NodeKind::Group(c)
            | NodeKind::Component(c)
            | NodeKind::ComponentSet(c)
            | NodeKind::Instance(c)
            | NodeKind::Section(c)
            | NodeKind::BooleanOperation(c) => Some(c),
            NodeKind::Text(_)
            | NodeKind::Rectangle
            | NodeKind::Ellipse
            | NodeKind::Vector
            | NodeKind::Line
            | NodeKind::Star
            | NodeKind::Polygon => None,
        }
    }

    pub fn container_mut(&mut self) -> Option<&mut ContainerProps> {
        match self {
            NodeKind::Frame(c)
            | NodeKind::Group(c)
            | NodeKind::Component(c)
            | NodeKind::ComponentSet(c)
            | NodeKind::Instance(c)
            | NodeKind::Section(c)
            | NodeKind::BooleanOperation(c) => Some(c),
            NodeKind::Text(_)
            | NodeKind::Rectangle
            | NodeKind::Ellipse
            | NodeKind::Vector
            | NodeKind::Line
            | NodeKind::Star
            | NodeKind::Polygon => None,
        }
    }
}

/// Inferred outline for a text node that absorbed a stroke-simulation group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferredStroke {
    pub thickness: f64,
    pub color: Option<Color>,
}

/// A raster the node needs in the output, keyed by content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterRef {
    pub hash: String,
    pub asset_id: Option<String>,
}

impl RasterRef {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            asset_id: None,
        }
    }
}

/// Values computed by the compiler. Never authoritative design intent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    pub stroke_duplicate: bool,
    pub inferred_stroke: Option<InferredStroke>,
    /// Primary raster for RASTER nodes.
    pub raster: Option<RasterRef>,
    /// Underlay raster for containers with a non-solid background.
    pub background: Option<RasterRef>,
    /// Detached drop-shadow raster.
    pub shadow: Option<RasterRef>,
    pub native_fill: bool,
    pub render_bounds: Option<Rect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub corner_radius: CornerRadius,
    #[serde(default)]
    pub fills: Vec<Paint>,
    #[serde(default)]
    pub strokes: Vec<Paint>,
    #[serde(default)]
    pub stroke_weight: f64,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default = "default_one")]
    pub opacity: f64,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub layout_sizing_horizontal: Sizing,
    #[serde(default)]
    pub layout_sizing_vertical: Sizing,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Reaction>,
    /// Rasterization hash declared by the export sandbox.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_content_hash: Option<String>,
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(skip)]
    pub annotations: Annotations,
}

impl DesignNode {
    /// Minimal node of the given kind; used by tests and synthetic instances.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            visible: true,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            corner_radius: CornerRadius::default(),
            fills: Vec::new(),
            strokes: Vec::new(),
            stroke_weight: 0.0,
            effects: Vec::new(),
            opacity: 1.0,
            constraints: Constraints::default(),
            layout_sizing_horizontal: Sizing::default(),
            layout_sizing_vertical: Sizing::default(),
            reactions: Vec::new(),
            content_hash: None,
            shadow_content_hash: None,
            kind,
            annotations: Annotations::default(),
        }
    }

    pub fn with_bounds(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    pub fn children(&self) -> &[DesignNode] {
        self.kind
            .container()
            .map(|c| c.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<DesignNode>> {
        self.kind.container_mut().map(|c| &mut c.children)
    }

    /// Children that survive into emission: visible and not stroke duplicates.
    pub fn live_children(&self) -> impl Iterator<Item = &DesignNode> {
        self.children().iter().filter(|c| c.is_live())
    }

    pub fn is_live(&self) -> bool {
        self.visible && !self.annotations.stroke_duplicate
    }

    pub fn text(&self) -> Option<&TextPayload> {
        match &self.kind {
            NodeKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut TextPayload> {
        match &mut self.kind {
            NodeKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn layout(&self) -> Option<&FlowLayout> {
        self.kind.container().and_then(|c| c.layout.as_ref())
    }

    pub fn clips_content(&self) -> bool {
        self.kind.container().is_some_and(|c| c.clips_content)
    }

    pub fn visible_fills(&self) -> impl Iterator<Item = &Paint> {
        self.fills.iter().filter(|p| p.is_visible())
    }

    pub fn has_visible_stroke(&self) -> bool {
        self.stroke_weight > 0.0 && self.strokes.iter().any(Paint::is_visible)
    }

    pub fn has_visible_effect(&self) -> bool {
        self.effects.iter().any(Effect::is_visible)
    }

    pub fn has_gradient_fill(&self) -> bool {
        self.visible_fills().any(Paint::is_gradient)
    }

    /// First visible solid fill, with paint opacity folded into alpha.
    pub fn first_solid_color(&self) -> Option<Color> {
        self.visible_fills().find_map(Paint::as_solid).map(|p| Color {
            a: p.color.a * p.opacity,
            ..p.color
        })
    }

    /// Expanded bounds when visible effects reach past the logical box,
    /// relative to the node's own origin.
    pub fn effect_bounds(&self) -> Option<Rect> {
        let (mut left, mut top) = (0.0_f64, 0.0_f64);
        let (mut right, mut bottom) = (self.width, self.height);
        for effect in self.effects.iter().filter(|e| e.is_visible()) {
            match effect {
                Effect::DropShadow(s) => {
                    let reach = s.radius + s.spread;
                    left = left.min(s.offset.x - reach);
                    top = top.min(s.offset.y - reach);
                    right = right.max(self.width + s.offset.x + reach);
                    bottom = bottom.max(self.height + s.offset.y + reach);
                }
                Effect::LayerBlur(b) => {
                    left = left.min(-b.radius);
                    top = top.min(-b.radius);
                    right = right.max(self.width + b.radius);
                    bottom = bottom.max(self.height + b.radius);
                }
                Effect::InnerShadow(_) | Effect::BackgroundBlur(_) | Effect::Unsupported => {}
            }
        }
        let expanded = left < 0.0 || top < 0.0 || right > self.width || bottom > self.height;
        expanded.then(|| Rect {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_tagged_node_kinds() {
        let json = r#"{
            "id": "1:1",
            "name": "Card",
            "type": "FRAME",
            "width": 200,
            "height": 100,
            "clipsContent": true,
            "layout": { "mode": "VERTICAL", "itemSpacing": 8 },
            "children": [
                { "id": "1:2", "name": "Title", "type": "TEXT", "characters": "Hello",
                  "style": { "fontFamily": "Roboto", "fontSize": 18 } },
                { "id": "1:3", "name": "Dot", "type": "ELLIPSE", "width": 4, "height": 4,
                  "fills": [{ "type": "SOLID", "color": { "r": 1, "g": 0, "b": 0 } }] }
            ]
        }"#;
        let node: DesignNode = serde_json::from_str(json).expect("parse node");

        assert_eq!(node.kind.tag(), "FRAME");
        assert!(node.clips_content());
        assert_eq!(node.layout().map(|l| l.mode), Some(LayoutAxis::Vertical));
        assert_eq!(node.children().len(), 2);
        let title = node.children()[0].text().expect("text payload");
        assert_eq!(title.characters, "Hello");
        assert_eq!(title.style.font_family, "Roboto");
        assert_eq!(title.style.font_weight, 400.0);
        assert!(matches!(node.children()[1].kind, NodeKind::Ellipse));
        assert_eq!(node.children()[1].fills.len(), 1);
    }

    #[test]
    fn accepts_figma_constraint_aliases_and_corner_tuples() {
        let json = r#"{
            "id": "2", "type": "RECTANGLE",
            "constraints": { "horizontal": "LEFT_RIGHT", "vertical": "BOTTOM" },
            "cornerRadius": [4, 8, 8, 4],
            "fills": [{ "type": "VIDEO" }]
        }"#;
        let node: DesignNode = serde_json::from_str(json).expect("parse node");
        assert_eq!(node.constraints.horizontal, Constraint::Stretch);
        assert_eq!(node.constraints.vertical, Constraint::Max);
        assert!(!node.corner_radius.is_uniform());
        assert_eq!(node.corner_radius.max(), 8.0);
        assert_eq!(node.fills, vec![Paint::Unsupported]);
    }

    #[test]
    fn color_to_hex_rounds_components() {
        let color = Color {
            r: 1.0,
            g: 0.2,
            b: 0.0,
            a: 1.0,
        };
        assert_eq!(color.to_hex(), "#ff3300");
        assert_eq!(Color::BLACK.to_hex(), "#000000");
    }

    #[test]
    fn effect_bounds_expand_for_drop_shadow_only_when_visible() {
        let mut node = DesignNode::new("1", "Card", NodeKind::Rectangle).with_bounds(0.0, 0.0, 100.0, 50.0);
        node.effects.push(Effect::DropShadow(ShadowEffect {
            visible: true,
            color: Color::BLACK,
            offset: Vector { x: 0.0, y: 4.0 },
            radius: 8.0,
            spread: 0.0,
        }));
        let bounds = node.effect_bounds().expect("expanded");
        assert_eq!(bounds.x, -8.0);
        assert_eq!(bounds.y, -4.0);
        assert_eq!(bounds.width, 116.0);
        assert_eq!(bounds.height, 66.0);

        if let Effect::DropShadow(s) = &mut node.effects[0] {
            s.visible = false;
        }
        assert!(node.effect_bounds().is_none());
    }
}
