//! Text label properties: font mapping, case transforms, decorations.

use crate::config::{TextConfig, TextExportMode};
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::rbxmx::{Arena, Property, Referent};
use crate::types::{
    Color, DesignNode, TextAlignHorizontal, TextAlignVertical, TextCase, TextDecoration,
    TextPayload,
};

use super::decor;

/// Design family (lowercased, spaces removed) → built-in engine family.
const BUILTIN_FONTS: &[(&str, &str)] = &[
    ("roboto", "Roboto"),
    ("robotomono", "RobotoMono"),
    ("robotocondensed", "RobotoCondensed"),
    ("montserrat", "Montserrat"),
    ("sourcesanspro", "SourceSansPro"),
    ("sourcesans3", "SourceSansPro"),
    ("gotham", "GothamSSm"),
    ("gothamssm", "GothamSSm"),
    ("arial", "Arimo"),
    ("arimo", "Arimo"),
    ("helvetica", "Arimo"),
    ("ubuntu", "Ubuntu"),
    ("oswald", "Oswald"),
    ("nunito", "Nunito"),
    ("merriweather", "Merriweather"),
    ("bangers", "Bangers"),
    ("fredokaone", "FredokaOne"),
    ("fredoka", "FredokaOne"),
    ("luckiestguy", "LuckiestGuy"),
    ("permanentmarker", "PermanentMarker"),
    ("pressstart2p", "PressStart2P"),
    ("creepster", "Creepster"),
    ("josefinsans", "JosefinSans"),
    ("titilliumweb", "TitilliumWeb"),
    ("sarpanch", "Sarpanch"),
    ("specialelite", "SpecialElite"),
    ("kalam", "Kalam"),
    ("indieflower", "IndieFlower"),
    ("patrickhand", "PatrickHand"),
    ("amaticsc", "AmaticSC"),
    ("denkone", "DenkOne"),
    ("michroma", "Michroma"),
    ("grenzegotisch", "GrenzeGotisch"),
    ("jura", "Jura"),
    ("builder", "BuilderSans"),
    ("buildersans", "BuilderSans"),
];

fn normalize(family: &str) -> String {
    family
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Map a design family to an engine family. Unknown families fall back to
/// the configured default, warned once per family.
pub fn map_font(family: &str, config: &TextConfig, diag: &mut Diagnostics) -> String {
    if family.trim().is_empty() {
        return config.default_font.clone();
    }
    if let Some(mapped) = config.fonts.get(family) {
        return mapped.clone();
    }
    let key = normalize(family);
    if let Some((_, mapped)) = BUILTIN_FONTS.iter().find(|(k, _)| *k == key) {
        return (*mapped).to_string();
    }
    diag.warn_once(
        WarningKind::UnmappedFont,
        family,
        format!(
            "font family '{}' has no engine equivalent; using {}",
            family, config.default_font
        ),
    );
    config.default_font.clone()
}

/// Engine weights are multiples of 100 in 100..=900.
fn font_weight(weight: f64) -> u32 {
    ((weight / 100.0).round().clamp(1.0, 9.0) as u32) * 100
}

pub fn transform_case(text: &str, case: TextCase) -> String {
    match case {
        TextCase::Original => text.to_string(),
        TextCase::Upper | TextCase::SmallCaps | TextCase::SmallCapsForced => text.to_uppercase(),
        TextCase::Lower => text.to_lowercase(),
        TextCase::Title => {
            let mut out = String::with_capacity(text.len());
            let mut at_word_start = true;
            for ch in text.chars() {
                if at_word_start && ch.is_alphabetic() {
                    out.extend(ch.to_uppercase());
                } else {
                    out.push(ch);
                }
                at_word_start = ch.is_whitespace();
            }
            out
        }
    }
}

fn escape_rich(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Fill the TextLabel properties and decorations for a TEXT node.
pub fn emit_text(
    arena: &mut Arena,
    own: Referent,
    node: &DesignNode,
    text: &TextPayload,
    config: &TextConfig,
    diag: &mut Diagnostics,
) {
    let style = &text.style;
    let mut content = transform_case(&text.characters, style.text_case);
    if matches!(style.text_case, TextCase::SmallCaps | TextCase::SmallCapsForced) {
        diag.warn(
            WarningKind::UnsupportedTextStyle,
            &node.id,
            "small caps approximated as upper case",
        );
    }

    let mut rich = false;
    if style.text_decoration != TextDecoration::None {
        match config.mode {
            TextExportMode::Rich => {
                let tag = match style.text_decoration {
                    TextDecoration::Underline => "u",
                    _ => "s",
                };
                content = format!("<{tag}>{}</{tag}>", escape_rich(&content));
                rich = true;
            }
            TextExportMode::Plain => diag.warn(
                WarningKind::UnsupportedTextStyle,
                &node.id,
                format!(
                    "text decoration {:?} dropped in plain text mode",
                    style.text_decoration
                ),
            ),
        }
    }
    if style.letter_spacing != 0.0 {
        diag.warn(
            WarningKind::UnsupportedTextStyle,
            &node.id,
            format!("letter spacing {} is not supported", style.letter_spacing),
        );
    }

    arena.set(own, "Text", Property::String(content));
    arena.set(own, "RichText", Property::Bool(rich));
    arena.set(own, "BackgroundTransparency", Property::Float(1.0));
    arena.set(own, "TextSize", Property::Float(style.font_size));
    arena.set(own, "TextWrapped", Property::Bool(true));
    arena.set(own, "TextScaled", Property::Bool(false));
    arena.set(
        own,
        "FontFace",
        Property::Font {
            family: map_font(&style.font_family, config, diag),
            weight: font_weight(style.font_weight),
            italic: false,
        },
    );

    let x_align = match style.text_align_horizontal {
        TextAlignHorizontal::Left => 0,
        TextAlignHorizontal::Right => 1,
        TextAlignHorizontal::Center => 2,
        TextAlignHorizontal::Justified => {
            diag.warn(
                WarningKind::UnsupportedTextStyle,
                &node.id,
                "justified text approximated as left aligned",
            );
            0
        }
    };
    let y_align = match style.text_align_vertical {
        TextAlignVertical::Top => 0,
        TextAlignVertical::Center => 1,
        TextAlignVertical::Bottom => 2,
    };
    arena.set(own, "TextXAlignment", Property::Token(x_align));
    arena.set(own, "TextYAlignment", Property::Token(y_align));

    if let Some(line_height) = style.line_height_px {
        if style.font_size > 0.0 && line_height > 0.0 {
            arena.set(
                own,
                "LineHeight",
                Property::Float(line_height / style.font_size),
            );
        }
    }

    let gradient = node.visible_fills().find(|p| p.is_gradient());
    let color = match gradient {
        Some(_) => Color {
            r: 1.0,
            g: 1.0,
            b: 1.0,
            a: 1.0,
        },
        None => node.first_solid_color().unwrap_or(Color::BLACK),
    };
    arena.set(own, "TextColor3", Property::Color3(color));
    let transparency = 1.0 - (color.a * node.opacity).clamp(0.0, 1.0);
    if transparency > 0.0 {
        arena.set(own, "TextTransparency", Property::Float(transparency));
    }

    if let Some(paint) = gradient {
        decor::gradient(arena, own, paint, &node.id, diag);
    }
    if let Some(stroke) = node.annotations.inferred_stroke {
        decor::text_stroke(arena, own, stroke);
    }
}
