//! Compose the annotated design tree into an instance arena.
//!
//! The output root is a `ScreenGui` wrapping the design root. Sibling order
//! is z-order: each emitted sibling takes the next `ZIndex`, a container's
//! background underlay sits at 0 and its click target on top of everything.
//!
//! A flow-managed container that also needs an underlay or a click target
//! gets an inner transparent "Content" frame holding the list layout and the
//! design children, since the layout would otherwise arrange those too.

mod decor;
mod text;

pub use text::{map_font, transform_case};

use std::collections::VecDeque;

use crate::classify::{classify, Classification, Strategy};
use crate::config::TextConfig;
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::geometry::{overflows, translate, ParentFrame, UDim2};
use crate::overrides::RuleSet;
use crate::rbxmx::{Arena, Property, Referent};
use crate::types::{DesignNode, NodeKind, Paint, RasterRef, Rect};
use crate::{CompileError, Result};

/// Where a node lands among its siblings.
#[derive(Debug, Clone, Copy)]
struct Slot {
    parent: Referent,
    frame: ParentFrame,
    is_root: bool,
    z_index: i64,
    layout_order: Option<i64>,
}

struct Assembler<'a> {
    arena: Arena,
    rules: &'a RuleSet,
    text: &'a TextConfig,
    diag: &'a mut Diagnostics,
}

/// Build the instance arena for an annotated, fully resolved tree.
pub fn assemble(
    root: &DesignNode,
    rules: &RuleSet,
    text: &TextConfig,
    diag: &mut Diagnostics,
) -> Result<Arena> {
    let mut assembler = Assembler {
        arena: Arena::new(),
        rules,
        text,
        diag,
    };
    let gui = assembler.arena.insert("ScreenGui", root.name.clone(), None);
    // Sibling: ZIndex orders siblings within one parent
    assembler.arena.set(gui, "ZIndexBehavior", Property::Token(1));
    assembler.arena.set(gui, "ResetOnSpawn", Property::Bool(false));

    let slot = Slot {
        parent: gui,
        frame: ParentFrame::free(root.width, root.height),
        is_root: true,
        z_index: 1,
        layout_order: None,
    };
    assembler.emit(root, slot)?;
    tracing::debug!(instances = assembler.arena.len(), "assembled instance tree");
    Ok(assembler.arena)
}

fn asset_url(raster: &RasterRef, node: &DesignNode) -> Result<Property> {
    let asset_id = raster
        .asset_id
        .as_deref()
        .ok_or_else(|| CompileError::MissingRawContent {
            hash: raster.hash.clone(),
            node: node.id.clone(),
        })?;
    Ok(Property::Content(format!("rbxassetid://{asset_id}")))
}

/// Stand-in node with the owner's constraints but different bounds.
fn ghost(owner: &DesignNode, bounds: Rect) -> DesignNode {
    let mut ghost = DesignNode::new(owner.id.clone(), owner.name.clone(), NodeKind::Rectangle)
        .with_bounds(
            owner.x + bounds.x,
            owner.y + bounds.y,
            bounds.width,
            bounds.height,
        );
    ghost.constraints = owner.constraints;
    ghost.layout_sizing_horizontal = owner.layout_sizing_horizontal;
    ghost.layout_sizing_vertical = owner.layout_sizing_vertical;
    ghost
}

impl Assembler<'_> {
    /// Emit `node` and its subtree. Returns children lifted out of a clipping
    /// container, already translated into this node's parent space.
    fn emit(&mut self, node: &DesignNode, slot: Slot) -> Result<Vec<DesignNode>> {
        let class = classify(node, self.rules);
        let image = class.needs_raster();
        let class_name = match class.strategy {
            Strategy::Container => "Frame",
            Strategy::Text => "TextLabel",
            Strategy::Raster if image => "ImageLabel",
            Strategy::Raster => "Frame",
        };
        let own = self.arena.insert(class_name, node.name.clone(), Some(slot.parent));

        let expanded = node
            .annotations
            .render_bounds
            .filter(|_| image && !slot.is_root && !slot.frame.flow_managed);
        let geometry = match expanded {
            Some(bounds) => translate(&ghost(node, bounds), slot.frame, false, self.rules, self.diag),
            None => translate(node, slot.frame, slot.is_root, self.rules, self.diag),
        };
        decor::apply_geometry(&mut self.arena, own, &geometry);
        self.arena.set(own, "ZIndex", Property::Int(slot.z_index));
        if let Some(order) = slot.layout_order {
            self.arena.set(own, "LayoutOrder", Property::Int(order));
        }
        if node.rotation != 0.0 {
            self.arena.set(own, "Rotation", Property::Float(-node.rotation));
        }
        self.arena.set(own, "BorderSizePixel", Property::Int(0));

        self.paint(node, own, &class)?;

        let mut lifted = Vec::new();
        let interactive = self.rules.is_interactive(node);
        let mut top_z = 1;
        if class.strategy == Strategy::Container {
            if let Some(background) = &node.annotations.background {
                self.underlay(node, background, own, slot.is_root)?;
            }
            if node.clips_content() {
                self.arena.set(own, "ClipsDescendants", Property::Bool(true));
            }

            let content = match node.layout() {
                Some(_) if interactive || node.annotations.background.is_some() => {
                    let inner = self.arena.insert("Frame", "Content", Some(own));
                    decor::fill_parent(&mut self.arena, inner);
                    self.arena.set(inner, "ZIndex", Property::Int(1));
                    top_z = 2;
                    inner
                }
                _ => own,
            };
            if let Some(layout) = node.layout() {
                decor::list_layout(&mut self.arena, content, layout, &node.id, self.diag);
            }

            let can_lift = !slot.is_root && !slot.frame.flow_managed;
            let (next_z, promoted) = self.emit_children(node, content, can_lift)?;
            if content == own {
                top_z = next_z;
            }
            lifted = promoted
                .into_iter()
                .map(|mut child| {
                    child.x += node.x;
                    child.y += node.y;
                    child
                })
                .collect();
        }

        decor::interactions(&mut self.arena, own, node, self.diag)?;
        if interactive {
            decor::click_target(&mut self.arena, own, top_z);
        }
        Ok(lifted)
    }

    /// Background and decoration for the node's own paint.
    fn paint(&mut self, node: &DesignNode, own: Referent, class: &Classification) -> Result<()> {
        match class.strategy {
            Strategy::Text => {
                if let Some(text) = node.text() {
                    text::emit_text(&mut self.arena, own, node, text, self.text, self.diag);
                }
            }
            Strategy::Raster if class.needs_raster() => {
                let raster = node.annotations.raster.as_ref().ok_or_else(|| {
                    CompileError::Config(format!("node {} was not planned for a raster", node.id))
                })?;
                self.arena.set(own, "Image", asset_url(raster, node)?);
                self.arena.set(own, "BackgroundTransparency", Property::Float(1.0));
                let fit = node.visible_fills().any(|p| {
                    matches!(p, Paint::Image(i) if i.scale_mode.as_deref() == Some("FIT"))
                });
                // Stretch 0, Fit 3
                self.arena.set(own, "ScaleType", Property::Token(if fit { 3 } else { 0 }));
                if node.opacity < 1.0 {
                    self.arena.set(
                        own,
                        "ImageTransparency",
                        Property::Float(1.0 - node.opacity.clamp(0.0, 1.0)),
                    );
                }
            }
            Strategy::Raster | Strategy::Container => match class.native_fill {
                Some(color) => {
                    self.arena.set(own, "BackgroundColor3", Property::Color3(color));
                    self.arena.set(
                        own,
                        "BackgroundTransparency",
                        Property::Float(1.0 - (color.a * node.opacity).clamp(0.0, 1.0)),
                    );
                    decor::corner(&mut self.arena, own, node, self.diag);
                }
                None => {
                    self.arena.set(own, "BackgroundTransparency", Property::Float(1.0));
                }
            },
        }
        Ok(())
    }

    /// Image underlay for a container whose own paint is not a flat color.
    fn underlay(
        &mut self,
        node: &DesignNode,
        background: &RasterRef,
        own: Referent,
        is_root: bool,
    ) -> Result<()> {
        let under = self.arena.insert("ImageLabel", "Background", Some(own));
        decor::fill_parent(&mut self.arena, under);
        // The root never grows past its own box.
        if let Some(bounds) = node.annotations.render_bounds.filter(|_| !is_root) {
            self.arena.set(
                under,
                "Position",
                Property::UDim2(UDim2::from_offset(bounds.x, bounds.y)),
            );
            self.arena.set(
                under,
                "Size",
                Property::UDim2(UDim2::from_offset(bounds.width, bounds.height)),
            );
        }
        self.arena.set(under, "Image", asset_url(background, node)?);
        self.arena.set(under, "ZIndex", Property::Int(0));
        if node.opacity < 1.0 {
            self.arena.set(
                under,
                "ImageTransparency",
                Property::Float(1.0 - node.opacity.clamp(0.0, 1.0)),
            );
        }
        Ok(())
    }

    /// Emit the live children of `node` under `content`. Returns the next
    /// free z-index and the children to lift into the grandparent.
    fn emit_children(
        &mut self,
        node: &DesignNode,
        content: Referent,
        can_lift: bool,
    ) -> Result<(i64, Vec<DesignNode>)> {
        let frame = ParentFrame::of(node);
        let mut z = 1;
        let mut order = 0;
        let mut promoted = Vec::new();
        let mut queue: VecDeque<DesignNode> = VecDeque::new();

        for child in node.live_children() {
            if self.clipped_for_lift(node, frame, child, can_lift) {
                promoted.push(child.clone());
                continue;
            }
            z = self.emit_sibling(child, content, frame, z, &mut order, &mut queue)?;
            // Lifted grandchildren get the same overflow check against this node.
            while let Some(lifted) = queue.pop_front() {
                if self.clipped_for_lift(node, frame, &lifted, can_lift) {
                    promoted.push(lifted);
                    continue;
                }
                z = self.emit_sibling(&lifted, content, frame, z, &mut order, &mut queue)?;
            }
        }
        Ok((z, promoted))
    }

    /// True when `child` overflows the clipping `node` and should be lifted
    /// further up. Overflow that cannot be lifted is warned about here.
    fn clipped_for_lift(
        &mut self,
        node: &DesignNode,
        frame: ParentFrame,
        child: &DesignNode,
        can_lift: bool,
    ) -> bool {
        if !node.clips_content() || frame.flow_managed || !overflows(child, node.width, node.height) {
            return false;
        }
        if self.rules.is_interactive(child) {
            if can_lift {
                tracing::debug!(node = %child.id, parent = %node.id, "lifting clipped interactive child");
                return true;
            }
            self.diag.warn(
                WarningKind::PromotionSkipped,
                &child.id,
                format!(
                    "interactive '{}' overflows clipping '{}' but cannot be lifted",
                    child.name, node.name
                ),
            );
        } else {
            self.diag.warn(
                WarningKind::Overflow,
                &child.id,
                format!("'{}' overflows clipping '{}' and will be cut off", child.name, node.name),
            );
        }
        false
    }

    fn emit_sibling(
        &mut self,
        child: &DesignNode,
        content: Referent,
        frame: ParentFrame,
        mut z: i64,
        order: &mut i64,
        queue: &mut VecDeque<DesignNode>,
    ) -> Result<i64> {
        if let Some(shadow) = &child.annotations.shadow {
            self.shadow(child, shadow, content, frame, z)?;
            z += 1;
        }
        let layout_order = frame.flow_managed.then(|| {
            *order += 1;
            *order
        });
        let lifted = self.emit(
            child,
            Slot {
                parent: content,
                frame,
                is_root: false,
                z_index: z,
                layout_order,
            },
        )?;
        queue.extend(lifted);
        Ok(z + 1)
    }

    /// Detached drop shadow, emitted just below its owner.
    fn shadow(
        &mut self,
        owner: &DesignNode,
        shadow: &RasterRef,
        parent: Referent,
        frame: ParentFrame,
        z: i64,
    ) -> Result<()> {
        let bounds = owner.annotations.render_bounds.unwrap_or(Rect {
            x: 0.0,
            y: 0.0,
            width: owner.width,
            height: owner.height,
        });
        let geometry = translate(&ghost(owner, bounds), frame, false, self.rules, self.diag);
        let inst = self
            .arena
            .insert("ImageLabel", format!("{}_Shadow", owner.name), Some(parent));
        decor::apply_geometry(&mut self.arena, inst, &geometry);
        self.arena.set(inst, "Image", asset_url(shadow, owner)?);
        self.arena.set(inst, "BackgroundTransparency", Property::Float(1.0));
        self.arena.set(inst, "BorderSizePixel", Property::Int(0));
        self.arena.set(inst, "ZIndex", Property::Int(z));
        if owner.rotation != 0.0 {
            self.arena.set(inst, "Rotation", Property::Float(-owner.rotation));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{UDim, Vector2};
    use crate::plan;
    use crate::types::{
        Color, ContainerProps, Effect, FlowLayout, ImagePaint, LayoutAxis, ShadowEffect,
        SolidPaint, TextPayload, TextStyle, Vector,
    };

    fn container(id: &str, name: &str, children: Vec<DesignNode>) -> DesignNode {
        DesignNode::new(
            id,
            name,
            NodeKind::Frame(ContainerProps {
                children,
                ..ContainerProps::default()
            }),
        )
    }

    fn image_leaf(id: &str, name: &str, hash: &str) -> DesignNode {
        let mut node = DesignNode::new(id, name, NodeKind::Rectangle);
        node.fills.push(Paint::Image(ImagePaint {
            visible: true,
            opacity: 1.0,
            image_hash: Some(hash.into()),
            scale_mode: None,
        }));
        node
    }

    fn gradient_fill() -> Paint {
        Paint::GradientLinear(crate::types::GradientPaint {
            visible: true,
            opacity: 1.0,
            gradient_stops: vec![],
            gradient_handle_positions: vec![],
        })
    }

    fn build(mut root: DesignNode) -> (Arena, Diagnostics) {
        let rules = RuleSet::default();
        let mut diag = Diagnostics::new();
        plan::annotate(&mut root, &rules, &mut diag).expect("annotate");
        plan::apply_assets(&mut root, &|hash| Some(format!("id-{hash}")));
        let arena = assemble(&root, &rules, &TextConfig::default(), &mut diag).expect("assemble");
        (arena, diag)
    }

    fn child<'a>(arena: &'a Arena, parent: Referent, name: &str) -> (Referent, &'a crate::rbxmx::Instance) {
        let r = arena
            .find_child(parent, name)
            .unwrap_or_else(|| panic!("missing child {name}"));
        (r, arena.get(r).expect("instance"))
    }

    #[test]
    fn wraps_root_in_screen_gui_and_centers_it() {
        let root = container("0", "Menu", vec![image_leaf("1", "Logo", "img")]).with_bounds(0.0, 0.0, 800.0, 600.0);
        let (arena, _) = build(root);
        let gui = arena.roots()[0];
        assert_eq!(arena.get(gui).map(|i| i.class), Some("ScreenGui"));
        let (_, menu) = child(&arena, gui, "Menu");
        assert_eq!(menu.class, "Frame");
        assert_eq!(
            menu.property("AnchorPoint"),
            Some(&Property::Vector2(Vector2 { x: 0.5, y: 0.5 }))
        );
        assert_eq!(
            menu.property("Position"),
            Some(&Property::UDim2(UDim2::from_scale(0.5, 0.5)))
        );
    }

    #[test]
    fn referents_are_unique_and_xml_mentions_each_once() {
        let root = container(
            "0",
            "Menu",
            vec![image_leaf("1", "A", "a"), image_leaf("2", "B", "b")],
        )
        .with_bounds(0.0, 0.0, 100.0, 100.0);
        let (arena, _) = build(root);
        let xml = arena.to_rbxmx();
        for i in 0..arena.len() {
            assert_eq!(xml.matches(&format!("referent=\"RBX{i}\"")).count(), 1);
        }
    }

    #[test]
    fn siblings_stack_in_order_with_native_and_image_paint() {
        let mut solid = DesignNode::new("1", "Panel", NodeKind::Rectangle).with_bounds(0.0, 0.0, 50.0, 50.0);
        solid.fills.push(Paint::Solid(SolidPaint {
            visible: true,
            opacity: 0.5,
            color: Color::BLACK,
        }));
        let root = container("0", "Menu", vec![solid, image_leaf("2", "Logo", "img")])
            .with_bounds(0.0, 0.0, 100.0, 100.0);
        let (arena, _) = build(root);
        let menu = arena.find_child(arena.roots()[0], "Menu").expect("menu");

        let (_, panel) = child(&arena, menu, "Panel");
        assert_eq!(panel.class, "Frame");
        assert_eq!(panel.property("ZIndex"), Some(&Property::Int(1)));
        assert_eq!(panel.property("BackgroundTransparency"), Some(&Property::Float(0.5)));

        let (_, logo) = child(&arena, menu, "Logo");
        assert_eq!(logo.class, "ImageLabel");
        assert_eq!(logo.property("ZIndex"), Some(&Property::Int(2)));
        assert_eq!(
            logo.property("Image"),
            Some(&Property::Content("rbxassetid://id-img".into()))
        );
    }

    #[test]
    fn click_target_is_last_child_with_top_z() {
        let button = container(
            "1",
            "PlayButton",
            vec![
                image_leaf("2", "Icon", "icon"),
                DesignNode::new(
                    "3",
                    "Label",
                    NodeKind::Text(TextPayload {
                        characters: "Play".into(),
                        style: TextStyle::default(),
                    }),
                ),
            ],
        )
        .with_bounds(10.0, 10.0, 120.0, 40.0);
        let root = container("0", "Menu", vec![button]).with_bounds(0.0, 0.0, 400.0, 300.0);
        let (arena, _) = build(root);
        let menu = arena.find_child(arena.roots()[0], "Menu").expect("menu");
        let button = arena.find_child(menu, "PlayButton").expect("button");

        let last = arena.children(button).last().expect("children");
        assert_eq!(last.class, "TextButton");
        assert_eq!(last.name, "ClickTarget");
        assert_eq!(last.property("ZIndex"), Some(&Property::Int(3)));
    }

    #[test]
    fn container_underlay_is_first_child_and_root_is_not_expanded() {
        let shadow = Effect::DropShadow(ShadowEffect {
            visible: true,
            color: Color::BLACK,
            offset: Vector { x: 0.0, y: 4.0 },
            radius: 8.0,
            spread: 0.0,
        });
        let mut card = container("1", "Card", vec![image_leaf("2", "Icon", "icon")])
            .with_bounds(20.0, 20.0, 100.0, 100.0);
        card.fills.push(gradient_fill());
        card.effects.push(shadow.clone());
        let mut root = container("0", "Menu", vec![card]).with_bounds(0.0, 0.0, 400.0, 300.0);
        root.fills.push(gradient_fill());
        root.effects.push(shadow);

        let (arena, _) = build(root);
        let menu = arena.find_child(arena.roots()[0], "Menu").expect("menu");

        let first = arena.children(menu).next().expect("first child");
        assert_eq!(first.name, "Background");
        assert_eq!(first.property("ZIndex"), Some(&Property::Int(0)));
        assert_eq!(
            first.property("Size"),
            Some(&Property::UDim2(UDim2::from_scale(1.0, 1.0)))
        );

        let card = arena.find_child(menu, "Card").expect("card");
        let (_, under) = child(&arena, card, "Background");
        assert_eq!(
            under.property("Size"),
            Some(&Property::UDim2(UDim2::from_offset(116.0, 116.0)))
        );
        assert_eq!(
            under.property("Position"),
            Some(&Property::UDim2(UDim2::from_offset(-8.0, -4.0)))
        );
    }

    #[test]
    fn clipped_interactive_child_is_lifted_with_translated_position() {
        let close = image_leaf("3", "CloseButton", "x").with_bounds(180.0, -10.0, 30.0, 30.0);
        let mut panel = container("2", "Panel", vec![image_leaf("4", "Body", "body").with_bounds(0.0, 0.0, 200.0, 100.0), close])
            .with_bounds(50.0, 40.0, 200.0, 100.0);
        if let NodeKind::Frame(props) = &mut panel.kind {
            props.clips_content = true;
        }
        let root = container("0", "Menu", vec![panel]).with_bounds(0.0, 0.0, 400.0, 300.0);
        let (arena, _) = build(root);
        let menu = arena.find_child(arena.roots()[0], "Menu").expect("menu");
        let panel = arena.find_child(menu, "Panel").expect("panel");

        assert!(arena.find_child(panel, "CloseButton").is_none());
        let (_, lifted) = child(&arena, menu, "CloseButton");
        assert_eq!(
            lifted.property("Position"),
            Some(&Property::UDim2(UDim2::from_offset(230.0, 30.0)))
        );
        assert_eq!(lifted.property("ZIndex"), Some(&Property::Int(2)));
    }

    #[test]
    fn clipping_root_cannot_lift_and_warns() {
        let close = image_leaf("3", "CloseButton", "x").with_bounds(390.0, -10.0, 30.0, 30.0);
        let deco = image_leaf("4", "Sparkle", "s").with_bounds(-20.0, 0.0, 40.0, 40.0);
        let mut root = container("0", "Menu", vec![close, deco]).with_bounds(0.0, 0.0, 400.0, 300.0);
        if let NodeKind::Frame(props) = &mut root.kind {
            props.clips_content = true;
        }
        let (arena, diag) = build(root);
        let menu = arena.find_child(arena.roots()[0], "Menu").expect("menu");
        assert!(arena.find_child(menu, "CloseButton").is_some());
        assert_eq!(diag.count(WarningKind::PromotionSkipped), 1);
        assert_eq!(diag.count(WarningKind::Overflow), 1);
    }

    fn clipping(mut node: DesignNode) -> DesignNode {
        if let NodeKind::Frame(props) = &mut node.kind {
            props.clips_content = true;
        }
        node
    }

    #[test]
    fn lifted_child_overflowing_grandparent_is_lifted_again() {
        let close = image_leaf("3", "CloseButton", "x").with_bounds(90.0, -20.0, 30.0, 30.0);
        let inner = clipping(container("2", "Inner", vec![close]).with_bounds(10.0, 10.0, 100.0, 80.0));
        let outer = clipping(container("1", "Outer", vec![inner]).with_bounds(20.0, 20.0, 200.0, 150.0));
        let root = container("0", "Menu", vec![outer]).with_bounds(0.0, 0.0, 400.0, 300.0);
        let (arena, diag) = build(root);
        let menu = arena.find_child(arena.roots()[0], "Menu").expect("menu");
        let outer = arena.find_child(menu, "Outer").expect("outer");

        assert!(arena.find_child(outer, "CloseButton").is_none());
        let (_, lifted) = child(&arena, menu, "CloseButton");
        assert_eq!(
            lifted.property("Position"),
            Some(&Property::UDim2(UDim2::from_offset(120.0, 10.0)))
        );
        assert_eq!(diag.count(WarningKind::PromotionSkipped), 0);
    }

    #[test]
    fn lifted_child_overflowing_clipping_root_warns() {
        let close = image_leaf("3", "CloseButton", "x").with_bounds(90.0, -20.0, 30.0, 30.0);
        let inner = clipping(container("2", "Inner", vec![close]).with_bounds(10.0, 10.0, 100.0, 80.0));
        let root = clipping(container("0", "Menu", vec![inner]).with_bounds(0.0, 0.0, 400.0, 300.0));
        let (arena, diag) = build(root);
        let menu = arena.find_child(arena.roots()[0], "Menu").expect("menu");

        assert!(arena.find_child(menu, "CloseButton").is_some());
        assert_eq!(diag.count(WarningKind::PromotionSkipped), 1);
    }

    #[test]
    fn detached_shadow_precedes_its_owner() {
        let mut card = image_leaf("1", "Card", "card").with_bounds(10.0, 10.0, 100.0, 50.0);
        card.shadow_content_hash = Some("card-shadow".into());
        card.effects.push(Effect::DropShadow(ShadowEffect {
            visible: true,
            color: Color::BLACK,
            offset: Vector { x: 0.0, y: 0.0 },
            radius: 10.0,
            spread: 0.0,
        }));
        let root = container("0", "Menu", vec![card]).with_bounds(0.0, 0.0, 400.0, 300.0);
        let (arena, _) = build(root);
        let menu = arena.find_child(arena.roots()[0], "Menu").expect("menu");

        let names: Vec<&str> = arena.children(menu).map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Card_Shadow", "Card"]);
        let (_, shadow) = child(&arena, menu, "Card_Shadow");
        assert_eq!(
            shadow.property("Size"),
            Some(&Property::UDim2(UDim2::from_offset(120.0, 70.0)))
        );
        assert_eq!(shadow.property("ZIndex"), Some(&Property::Int(1)));
    }

    #[test]
    fn flow_children_get_layout_order_and_fill_sizing() {
        let mut a = image_leaf("1", "A", "a").with_bounds(0.0, 0.0, 40.0, 40.0);
        a.layout_sizing_horizontal = crate::types::Sizing::Fill;
        let b = image_leaf("2", "B", "b").with_bounds(48.0, 0.0, 40.0, 40.0);
        let mut row = container("0", "Row", vec![a, b]).with_bounds(0.0, 0.0, 200.0, 40.0);
        if let NodeKind::Frame(props) = &mut row.kind {
            props.layout = Some(FlowLayout {
                mode: LayoutAxis::Horizontal,
                item_spacing: 8.0,
                padding_left: 0.0,
                padding_right: 0.0,
                padding_top: 0.0,
                padding_bottom: 0.0,
                primary_axis_align_items: Default::default(),
                counter_axis_align_items: Default::default(),
                wrap: false,
            });
        }
        let (arena, _) = build(row);
        let frame = arena.find_child(arena.roots()[0], "Row").expect("row");
        assert!(arena.find_child(frame, "UIListLayout").is_some());
        let (_, b) = child(&arena, frame, "B");
        assert_eq!(b.property("LayoutOrder"), Some(&Property::Int(2)));
        let (_, a) = child(&arena, frame, "A");
        assert_eq!(
            a.property("Size"),
            Some(&Property::UDim2(UDim2::new(UDim::scale(1.0), UDim::offset(40.0))))
        );
    }

    #[test]
    fn rotation_is_negated() {
        let mut leaf = image_leaf("1", "Star", "star").with_bounds(0.0, 0.0, 10.0, 10.0);
        leaf.rotation = 30.0;
        let root = container("0", "Menu", vec![leaf]).with_bounds(0.0, 0.0, 100.0, 100.0);
        let (arena, _) = build(root);
        let menu = arena.find_child(arena.roots()[0], "Menu").expect("menu");
        let (_, star) = child(&arena, menu, "Star");
        assert_eq!(star.property("Rotation"), Some(&Property::Float(-30.0)));
    }

    #[test]
    fn unresolved_raster_is_an_error() {
        let mut root = container("0", "Menu", vec![image_leaf("1", "Logo", "img")]);
        let rules = RuleSet::default();
        let mut diag = Diagnostics::new();
        plan::annotate(&mut root, &rules, &mut diag).expect("annotate");
        let err = assemble(&root, &rules, &TextConfig::default(), &mut diag).unwrap_err();
        assert!(matches!(err, CompileError::MissingRawContent { hash, .. } if hash == "img"));
    }
}
