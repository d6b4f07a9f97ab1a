//! Instance arena and `.rbxmx` XML serialization.
//!
//! Referents are arena indices, so uniqueness holds by construction and a
//! run never shares numbering state with another run.

use std::fmt::Write as _;

use crate::geometry::{UDim, UDim2, Vector2};
use crate::types::Color;

pub type Referent = usize;

#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Token(u32),
    UDim(UDim),
    UDim2(UDim2),
    Vector2(Vector2),
    Color3(Color),
    Content(String),
    Font {
        family: String,
        weight: u32,
        italic: bool,
    },
    ColorSequence(Vec<(f64, Color)>),
    NumberSequence(Vec<(f64, f64)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub class: &'static str,
    pub name: String,
    pub properties: Vec<(&'static str, Property)>,
    pub children: Vec<Referent>,
    pub parent: Option<Referent>,
}

impl Instance {
    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Arena {
    instances: Vec<Instance>,
    roots: Vec<Referent>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        class: &'static str,
        name: impl Into<String>,
        parent: Option<Referent>,
    ) -> Referent {
        let referent = self.instances.len();
        self.instances.push(Instance {
            class,
            name: name.into(),
            properties: Vec::new(),
            children: Vec::new(),
            parent,
        });
        match parent {
            Some(p) => self.instances[p].children.push(referent),
            None => self.roots.push(referent),
        }
        referent
    }

    /// Set a property, replacing an earlier value for the same key.
    pub fn set(&mut self, referent: Referent, key: &'static str, value: Property) {
        let props = &mut self.instances[referent].properties;
        match props.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => props.push((key, value)),
        }
    }

    pub fn get(&self, referent: Referent) -> Option<&Instance> {
        self.instances.get(referent)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn roots(&self) -> &[Referent] {
        &self.roots
    }

    pub fn children(&self, referent: Referent) -> impl Iterator<Item = &Instance> {
        self.instances[referent]
            .children
            .iter()
            .map(move |&c| &self.instances[c])
    }

    /// First direct child with the given name.
    pub fn find_child(&self, referent: Referent, name: &str) -> Option<Referent> {
        self.instances[referent]
            .children
            .iter()
            .copied()
            .find(|&c| self.instances[c].name == name)
    }

    /// Every instance, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Referent, &Instance)> {
        self.instances.iter().enumerate()
    }

    pub fn to_rbxmx(&self) -> String {
        let mut out = String::from(
            "<roblox xmlns:xmime=\"http://www.w3.org/2005/05/xmlmime\" \
             xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
             xsi:noNamespaceSchemaLocation=\"http://www.roblox.com/roblox.xsd\" version=\"4\">\n\
             \t<External>null</External>\n\
             \t<External>nil</External>\n",
        );
        for &root in &self.roots {
            self.write_item(&mut out, root, 1);
        }
        out.push_str("</roblox>\n");
        out
    }

    fn write_item(&self, out: &mut String, referent: Referent, depth: usize) {
        let inst = &self.instances[referent];
        let pad = "\t".repeat(depth);
        let _ = writeln!(
            out,
            "{pad}<Item class=\"{}\" referent=\"RBX{referent}\">",
            inst.class
        );
        let _ = writeln!(out, "{pad}\t<Properties>");
        let _ = writeln!(
            out,
            "{pad}\t\t<string name=\"Name\">{}</string>",
            escape(&inst.name)
        );
        for (key, value) in &inst.properties {
            let _ = writeln!(out, "{pad}\t\t{}", render_property(key, value));
        }
        let _ = writeln!(out, "{pad}\t</Properties>");
        for &child in &inst.children {
            self.write_item(out, child, depth + 1);
        }
        let _ = writeln!(out, "{pad}</Item>");
    }
}

fn render_property(key: &str, value: &Property) -> String {
    match value {
        Property::String(s) => format!("<string name=\"{key}\">{}</string>", escape(s)),
        Property::Bool(b) => format!("<bool name=\"{key}\">{b}</bool>"),
        Property::Int(i) => format!("<int name=\"{key}\">{i}</int>"),
        Property::Float(f) => format!("<float name=\"{key}\">{}</float>", num(*f)),
        Property::Token(t) => format!("<token name=\"{key}\">{t}</token>"),
        Property::UDim(u) => format!(
            "<UDim name=\"{key}\"><S>{}</S><O>{}</O></UDim>",
            num(u.scale),
            offset(u.offset)
        ),
        Property::UDim2(u) => format!(
            "<UDim2 name=\"{key}\"><XS>{}</XS><XO>{}</XO><YS>{}</YS><YO>{}</YO></UDim2>",
            num(u.x.scale),
            offset(u.x.offset),
            num(u.y.scale),
            offset(u.y.offset)
        ),
        Property::Vector2(v) => format!(
            "<Vector2 name=\"{key}\"><X>{}</X><Y>{}</Y></Vector2>",
            num(v.x),
            num(v.y)
        ),
        Property::Color3(c) => format!(
            "<Color3 name=\"{key}\"><R>{}</R><G>{}</G><B>{}</B></Color3>",
            num(c.r),
            num(c.g),
            num(c.b)
        ),
        Property::Content(url) => {
            format!("<Content name=\"{key}\"><url>{}</url></Content>", escape(url))
        }
        Property::Font {
            family,
            weight,
            italic,
        } => format!(
            "<Font name=\"{key}\"><Family><url>rbxasset://fonts/families/{}.json</url></Family>\
             <Weight>{weight}</Weight><Style>{}</Style></Font>",
            escape(family),
            if *italic { "Italic" } else { "Normal" }
        ),
        Property::ColorSequence(stops) => {
            let body: String = stops
                .iter()
                .map(|(t, c)| format!("{} {} {} {} 0 ", num(*t), num(c.r), num(c.g), num(c.b)))
                .collect();
            format!("<ColorSequence name=\"{key}\">{body}</ColorSequence>")
        }
        Property::NumberSequence(points) => {
            let body: String = points
                .iter()
                .map(|(t, v)| format!("{} {} 0 ", num(*t), num(*v)))
                .collect();
            format!("<NumberSequence name=\"{key}\">{body}</NumberSequence>")
        }
    }
}

/// Offsets are whole pixels in the engine.
fn offset(v: f64) -> i64 {
    v.round() as i64
}

fn num(v: f64) -> String {
    let rounded = (v * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
