//! GDI objects of the SVG backend and their CSS rendering
//!
//! Brushes, pens and fonts with identical fields share one style rule. Rules
//! are named `brushN`, `penN` and `fontN` in the order the objects were first
//! created and are written into the document's `<style>` element.

use crate::charset;
use crate::gdi::{
    LogFont, BS_HATCHED, BS_SOLID, FF_DECORATIVE, FF_MODERN, FF_ROMAN, FF_SCRIPT, FF_SWISS,
    FIXED_PITCH, FW_BOLD, FW_NORMAL, HS_BDIAGONAL, HS_CROSS, HS_DIAGCROSS, HS_FDIAGONAL,
    HS_HORIZONTAL, HS_VERTICAL, OPAQUE, PS_DASH, PS_DASHDOT, PS_DASHDOTDOT, PS_DOT, PS_NULL,
    PS_STYLE_MASK,
};
use crate::svg_dc::SvgDc;
use crate::svg_writer::SvgNode;
use std::collections::HashMap;

/// Index of a style in the [`StyleRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleId(pub usize);

/// Handle stored in the parser's object table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvgObject {
    Brush(StyleId),
    /// Index into the backend's DIB pattern brushes
    PatternBrush(usize),
    Pen(StyleId),
    Font(StyleId),
    /// Index into the backend's regions
    Region(usize),
    Palette,
    /// Legacy bitmap pattern brush, kept for the object table only
    Bitmap,
}

/// `rgb(r,g,b)` for a COLORREF.
pub fn rgb(color: u32) -> String {
    format!(
        "rgb({},{},{})",
        color & 0xFF,
        (color >> 8) & 0xFF,
        (color >> 16) & 0xFF
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SvgBrush {
    pub style: u16,
    pub color: u32,
    pub hatch: u16,
}

impl SvgBrush {
    pub fn css(&self) -> String {
        match self.style {
            BS_SOLID => format!("fill: {};", rgb(self.color)),
            // filled through a pattern reference on the element
            BS_HATCHED => String::new(),
            _ => "fill: none;".to_string(),
        }
    }

    /// Hatch pattern definition, drawn with the DC's background state.
    pub fn hatch_pattern(&self, id: &str, dc: &SvgDc) -> SvgNode {
        let size = dc.to_real_size(8);
        let half = size / 2;
        let mut pattern = SvgNode::new("pattern")
            .set("id", id)
            .set("patternUnits", "userSpaceOnUse")
            .set("x", 0)
            .set("y", 0)
            .set("width", size)
            .set("height", size);

        if dc.bk_mode == OPAQUE {
            pattern.append(
                SvgNode::new("rect")
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", size)
                    .set("height", size)
                    .set("fill", rgb(dc.bk_color)),
            );
        }

        let horizontal = format!("M 0,{h} L {s},{h}", h = half, s = size);
        let vertical = format!("M {h},0 L {h},{s}", h = half, s = size);
        let fdiagonal = format!("M 0,0 L {s},{s}", s = size);
        let bdiagonal = format!("M 0,{s} L {s},0", s = size);
        let paths = match self.hatch {
            HS_HORIZONTAL => vec![horizontal],
            HS_VERTICAL => vec![vertical],
            HS_FDIAGONAL => vec![fdiagonal],
            HS_BDIAGONAL => vec![bdiagonal],
            HS_CROSS => vec![horizontal, vertical],
            HS_DIAGCROSS => vec![fdiagonal, bdiagonal],
            _ => Vec::new(),
        };
        for d in paths {
            pattern.append(
                SvgNode::new("path")
                    .set("d", d)
                    .set("fill", "none")
                    .set("stroke", rgb(self.color)),
            );
        }
        pattern
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SvgPen {
    pub style: u16,
    pub width: i32,
    pub color: u32,
}

impl SvgPen {
    pub fn css(&self, dc: &SvgDc) -> String {
        let style = self.style & PS_STYLE_MASK;
        if style == PS_NULL {
            return "stroke: none;".to_string();
        }

        let width = dc.to_relative_x(self.width).abs().max(1);
        let mut css = format!(
            "stroke: {}; stroke-width: {}; stroke-linejoin: round;",
            rgb(self.color),
            width
        );

        let dash = dc.to_real_size(18);
        let dot = dc.to_real_size(3);
        let sep = dc.to_real_size(6);
        let dasharray = match style {
            PS_DASH => Some(format!("{},{}", dash, sep)),
            PS_DOT => Some(format!("{},{}", dot, sep)),
            PS_DASHDOT => Some(format!("{},{},{},{}", dash, sep, dot, sep)),
            PS_DASHDOTDOT => Some(format!("{},{},{},{},{},{}", dash, sep, dot, sep, dot, sep)),
            _ => None,
        };
        if let Some(dasharray) = dasharray {
            css.push_str(&format!(" stroke-dasharray: {};", dasharray));
        }
        css
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SvgFont {
    pub font: LogFont,
}

impl SvgFont {
    /// Face name decoded with the font's charset, vertical-font `@` removed.
    pub fn face_name(&self) -> String {
        let name = charset::decode_text(self.font.charset, &self.font.face_name, false);
        name.trim_start_matches('@').to_string()
    }

    pub fn lang(&self) -> Option<&'static str> {
        charset::charset_info(self.font.charset).lang
    }

    pub fn font_size(&self, dc: &SvgDc) -> i32 {
        dc.to_relative_y(self.font.height).abs()
    }

    fn family_list(&self, replace_symbol: bool) -> Vec<String> {
        let mut families = Vec::new();
        let face = self.face_name();
        let replacement = if replace_symbol {
            charset::symbol_replacement_family(&face)
        } else {
            None
        };
        match replacement {
            Some(family) => families.push(family.to_string()),
            None if !face.is_empty() => families.push(face.clone()),
            None => {}
        }

        if let Some(fallback) = charset::charset_info(self.font.charset).fallback_font {
            if !fallback.eq_ignore_ascii_case(&face) {
                families.push(fallback.to_string());
            }
        }

        let generic = if self.font.pitch_and_family & 0x03 == FIXED_PITCH {
            Some("monospace")
        } else {
            match self.font.pitch_and_family & 0xF0 {
                FF_ROMAN => Some("serif"),
                FF_SWISS => Some("sans-serif"),
                FF_MODERN => Some("monospace"),
                FF_SCRIPT => Some("cursive"),
                FF_DECORATIVE => Some("fantasy"),
                _ => None,
            }
        };
        if let Some(generic) = generic {
            if !families.iter().any(|f| f == generic) {
                families.push(generic.to_string());
            }
        }
        families
    }

    pub fn css(&self, dc: &SvgDc, replace_symbol: bool) -> String {
        let mut css = String::new();
        if self.font.italic {
            css.push_str("font-style: italic; ");
        }

        let weight = self.font.weight;
        if weight != 0 && weight != FW_NORMAL {
            let weight = (weight.clamp(100, 900) / 100) * 100;
            if weight == FW_BOLD {
                css.push_str("font-weight: bold; ");
            } else {
                css.push_str(&format!("font-weight: {}; ", weight));
            }
        }

        let size = self.font_size(dc);
        if size != 0 {
            css.push_str(&format!("font-size: {}px; ", size));
        }

        let families = self.family_list(replace_symbol);
        if !families.is_empty() {
            css.push_str("font-family:");
            let quoted: Vec<String> = families
                .iter()
                .map(|family| {
                    if family.contains(' ') {
                        format!(" \"{}\"", family)
                    } else {
                        format!(" {}", family)
                    }
                })
                .collect();
            css.push_str(&quoted.join(","));
            css.push_str("; ");
        }

        if self.font.underline || self.font.strikeout {
            css.push_str("text-decoration:");
            if self.font.underline {
                css.push_str(" underline");
            }
            if self.font.strikeout {
                css.push_str(" line-through");
            }
            css.push_str("; ");
        }

        css.trim_end().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StyleObject {
    Brush(SvgBrush),
    Pen(SvgPen),
    Font(SvgFont),
}

#[derive(Debug, Clone)]
pub struct StyleEntry {
    pub name: String,
    pub object: StyleObject,
    /// Defaults are written only once an element references them.
    emit: bool,
}

/// Deduplicating, insertion-ordered style table.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    entries: Vec<StyleEntry>,
    index: HashMap<StyleObject, StyleId>,
    brushes: usize,
    pens: usize,
    fonts: usize,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, object: StyleObject, emit: bool) -> StyleId {
        if let Some(&id) = self.index.get(&object) {
            if emit {
                self.entries[id.0].emit = true;
            }
            return id;
        }

        let name = match &object {
            StyleObject::Brush(_) => {
                self.brushes += 1;
                format!("brush{}", self.brushes - 1)
            }
            StyleObject::Pen(_) => {
                self.pens += 1;
                format!("pen{}", self.pens - 1)
            }
            StyleObject::Font(_) => {
                self.fonts += 1;
                format!("font{}", self.fonts - 1)
            }
        };
        let id = StyleId(self.entries.len());
        self.index.insert(object.clone(), id);
        self.entries.push(StyleEntry { name, object, emit });
        id
    }

    /// Registers an object created by the metafile.
    pub fn register(&mut self, object: StyleObject) -> StyleId {
        self.insert(object, true)
    }

    /// Registers a stock object of the device context.
    pub fn register_default(&mut self, object: StyleObject) -> StyleId {
        self.insert(object, false)
    }

    pub fn entry(&self, id: StyleId) -> &StyleEntry {
        &self.entries[id.0]
    }

    pub fn name(&self, id: StyleId) -> &str {
        &self.entries[id.0].name
    }

    pub fn brush(&self, id: StyleId) -> Option<&SvgBrush> {
        match &self.entries[id.0].object {
            StyleObject::Brush(brush) => Some(brush),
            _ => None,
        }
    }

    pub fn font(&self, id: StyleId) -> Option<&SvgFont> {
        match &self.entries[id.0].object {
            StyleObject::Font(font) => Some(font),
            _ => None,
        }
    }

    /// Marks a style as referenced by an element and returns its class name.
    pub fn use_class(&mut self, id: StyleId) -> String {
        let entry = &mut self.entries[id.0];
        entry.emit = true;
        entry.name.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Style sheet text, one rule per line in registration order. Empty
    /// when no rule is written.
    pub fn render_rules(&self, dc: &SvgDc, replace_symbol: bool) -> String {
        let mut css = String::new();
        for entry in self.entries.iter().filter(|entry| entry.emit) {
            let body = match &entry.object {
                StyleObject::Brush(brush) => brush.css(),
                StyleObject::Pen(pen) => pen.css(dc),
                StyleObject::Font(font) => font.css(dc, replace_symbol),
            };
            css.push_str(&format!(".{} {{{}}}\n", entry.name, body));
        }
        if css.is_empty() {
            css
        } else {
            format!("\n{}", css)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdi::{BS_NULL, FF_SWISS, PS_SOLID, VARIABLE_PITCH};

    fn dc() -> SvgDc {
        let mut dc = SvgDc::new(SvgObject::Brush(StyleId(0)), StyleId(0));
        dc.set_window_ext(1000, 1000);
        dc
    }

    fn arial() -> LogFont {
        LogFont {
            height: -24,
            weight: FW_BOLD,
            italic: true,
            underline: true,
            charset: 0,
            pitch_and_family: VARIABLE_PITCH | FF_SWISS,
            face_name: b"Arial\0\0\0".to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn test_rgb_byte_order() {
        assert_eq!(rgb(0x00FF8000), "rgb(0,128,255)");
    }

    #[test]
    fn test_brush_css() {
        let solid = SvgBrush { style: BS_SOLID, color: 0x0000FF, hatch: 0 };
        assert_eq!(solid.css(), "fill: rgb(255,0,0);");
        let null = SvgBrush { style: BS_NULL, color: 0, hatch: 0 };
        assert_eq!(null.css(), "fill: none;");
    }

    #[test]
    fn test_pen_css() {
        let dc = dc();
        let pen = SvgPen { style: PS_SOLID, width: 0, color: 0 };
        assert_eq!(
            pen.css(&dc),
            "stroke: rgb(0,0,0); stroke-width: 1; stroke-linejoin: round;"
        );
        let dashed = SvgPen { style: PS_DASH, width: 3, color: 0 };
        assert!(dashed.css(&dc).ends_with("stroke-dasharray: 288,96;"));
        let null = SvgPen { style: PS_NULL, width: 3, color: 0 };
        assert_eq!(null.css(&dc), "stroke: none;");
    }

    #[test]
    fn test_font_css() {
        let font = SvgFont { font: arial() };
        assert_eq!(
            font.css(&dc(), false),
            "font-style: italic; font-weight: bold; font-size: 24px; \
             font-family: Arial, sans-serif; text-decoration: underline;"
        );
    }

    #[test]
    fn test_font_weight_rounding_and_quoting() {
        let mut font = arial();
        font.weight = 650;
        font.italic = false;
        font.underline = false;
        font.strikeout = true;
        font.face_name = b"@Times New Roman\0".to_vec();
        font.pitch_and_family = 0;
        let css = SvgFont { font }.css(&dc(), false);
        assert_eq!(
            css,
            "font-weight: 600; font-size: 24px; font-family: \"Times New Roman\"; \
             text-decoration: line-through;"
        );
    }

    #[test]
    fn test_registry_dedups_and_names_in_order() {
        let mut registry = StyleRegistry::new();
        let black = StyleObject::Brush(SvgBrush { style: BS_SOLID, color: 0, hatch: 0 });
        let red = StyleObject::Brush(SvgBrush { style: BS_SOLID, color: 0xFF, hatch: 0 });
        let pen = StyleObject::Pen(SvgPen { style: PS_SOLID, width: 1, color: 0 });

        let a = registry.register(black.clone());
        let b = registry.register(pen);
        let c = registry.register(black);
        let d = registry.register(red);
        assert_eq!(a, c);
        assert_eq!(registry.name(a), "brush0");
        assert_eq!(registry.name(b), "pen0");
        assert_eq!(registry.name(d), "brush1");
        assert_eq!(registry.len(), 3);

        let rules = registry.render_rules(&dc(), false);
        assert_eq!(
            rules,
            "\n.brush0 {fill: rgb(0,0,0);}\n\
             .pen0 {stroke: rgb(0,0,0); stroke-width: 1; stroke-linejoin: round;}\n\
             .brush1 {fill: rgb(255,0,0);}\n"
        );
    }

    #[test]
    fn test_defaults_written_only_when_used() {
        let mut registry = StyleRegistry::new();
        let white = registry.register_default(StyleObject::Brush(SvgBrush {
            style: BS_SOLID,
            color: 0xFFFFFF,
            hatch: 0,
        }));
        assert_eq!(registry.render_rules(&dc(), false), "");
        assert_eq!(registry.use_class(white), "brush0");
        assert!(registry.render_rules(&dc(), false).contains(".brush0 "));
    }

    #[test]
    fn test_hatch_pattern() {
        let mut dc = dc();
        dc.bk_mode = crate::gdi::TRANSPARENT;
        let brush = SvgBrush { style: BS_HATCHED, color: 0xFF, hatch: HS_CROSS };
        let pattern = brush.hatch_pattern("pattern0", &dc);
        assert_eq!(pattern.attr("width"), Some("128"));
        let paths = pattern.children();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].attr("d"), Some("M 0,64 L 128,64"));
        assert_eq!(paths[1].attr("stroke"), Some("rgb(255,0,0)"));
    }
}
