//! SVG rendering backend
//!
//! Interprets the GDI call sequence against a device context and emits SVG
//! nodes into an [`SvgDocument`]. Brushes, pens and fonts become CSS classes,
//! clip regions become masks and raster operations become filters.

use crate::charset;
use crate::error::ConvertResult;
use crate::gdi::*;
use crate::image_utils;
use crate::rop;
use crate::svg_dc::SvgDc;
use crate::svg_style::{
    rgb, StyleId, StyleObject, StyleRegistry, SvgBrush, SvgFont, SvgObject, SvgPen,
};
use crate::svg_writer::{SvgDocument, SvgNode};
use log::{debug, warn};
use std::f64::consts::PI;

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

#[derive(Debug)]
struct Region {
    rect: Rect,
    id: Option<String>,
}

#[derive(Debug)]
struct PatternBrush {
    href: String,
    width: u32,
    height: u32,
    id: Option<String>,
}

/// Bounding box, radii and end points of an arc in output coordinates.
#[derive(Debug)]
struct ArcGeometry {
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    start: (f64, f64),
    end: (f64, f64),
    large: bool,
    closed: bool,
}

/// Formats an output coordinate with at most three decimals.
fn num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0 + 0.0;
    format!("{}", rounded)
}

/// Distance between two output coordinates, saturating at `i32::MAX`.
fn span(a: i32, b: i32) -> i32 {
    (b as i64 - a as i64).abs().min(i32::MAX as i64) as i32
}

fn url(id: &str) -> String {
    format!("url(#{})", id)
}

fn next_id(counter: &mut usize, prefix: &str) -> String {
    let id = format!("{}{}", prefix, counter);
    *counter += 1;
    id
}

pub struct SvgGdi {
    replace_symbol_font: bool,
    doc: SvgDocument,
    styles: StyleRegistry,
    dc: SvgDc,
    saved_dc: Vec<SvgDc>,
    default_brush: StyleId,
    default_pen: StyleId,
    regions: Vec<Region>,
    pattern_brushes: Vec<PatternBrush>,
    filters: Vec<&'static str>,
    placeable_size: Option<(String, String)>,
    pattern_count: usize,
    mask_count: usize,
    clip_count: usize,
}

impl Default for SvgGdi {
    fn default() -> Self {
        Self::new(false)
    }
}

impl SvgGdi {
    pub fn new(replace_symbol_font: bool) -> Self {
        let mut styles = StyleRegistry::new();
        let default_brush = styles.register_default(StyleObject::Brush(SvgBrush {
            style: BS_SOLID,
            color: 0x00FF_FFFF,
            hatch: 0,
        }));
        let default_pen = styles.register_default(StyleObject::Pen(SvgPen {
            style: PS_SOLID,
            width: 1,
            color: 0,
        }));

        let mut doc = SvgDocument::new();
        doc.set_root_attr("xmlns:xlink", XLINK_NS);

        Self {
            replace_symbol_font,
            doc,
            styles,
            dc: SvgDc::new(SvgObject::Brush(default_brush), default_pen),
            saved_dc: Vec::new(),
            default_brush,
            default_pen,
            regions: Vec::new(),
            pattern_brushes: Vec::new(),
            filters: Vec::new(),
            placeable_size: None,
            pattern_count: 0,
            mask_count: 0,
            clip_count: 0,
        }
    }

    pub fn dc(&self) -> &SvgDc {
        &self.dc
    }

    pub fn document(&self) -> &SvgDocument {
        &self.doc
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// Serializes the document built so far.
    pub fn to_svg(&self) -> String {
        self.doc.render()
    }

    fn emit(&mut self, node: SvgNode) -> GdiResult {
        self.doc.append(node);
        Ok(Outcome::Handled)
    }

    fn abs_x(&self, x: i32) -> i32 {
        self.dc.to_absolute_x(x)
    }

    fn abs_y(&self, y: i32) -> i32 {
        self.dc.to_absolute_y(y)
    }

    /// Output box `(x, y, width, height)` spanned by two logical corners.
    fn device_box(&self, sx: i32, sy: i32, ex: i32, ey: i32) -> (i32, i32, i32, i32) {
        let (x1, x2) = (self.abs_x(sx), self.abs_x(ex));
        let (y1, y2) = (self.abs_y(sy), self.abs_y(ey));
        (x1.min(x2), y1.min(y2), span(x1, x2), span(y1, y2))
    }

    fn rect_node(&self, sx: i32, sy: i32, ex: i32, ey: i32) -> SvgNode {
        let (x, y, width, height) = self.device_box(sx, sy, ex, ey);
        SvgNode::new("rect")
            .set("x", x)
            .set("y", y)
            .set("width", width)
            .set("height", height)
    }

    fn points_attr(&self, points: &[Point]) -> String {
        points
            .iter()
            .map(|p| format!("{},{}", self.abs_x(p.x), self.abs_y(p.y)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Class and fill for a brush; hatched brushes add a pattern each time.
    fn brush_paint(&mut self, brush: SvgObject) -> (Option<String>, Option<String>) {
        match brush {
            SvgObject::Brush(id) => {
                let class = self.styles.use_class(id);
                let fill = match self.styles.brush(id) {
                    Some(brush) if brush.style == BS_HATCHED => {
                        let pattern_id = next_id(&mut self.pattern_count, "pattern");
                        self.doc.add_def(brush.hatch_pattern(&pattern_id, &self.dc));
                        Some(url(&pattern_id))
                    }
                    _ => None,
                };
                (Some(class), fill)
            }
            SvgObject::PatternBrush(index) => (None, self.image_pattern(index)),
            _ => (None, None),
        }
    }

    /// Image pattern for a DIB pattern brush, defined on first use.
    fn image_pattern(&mut self, index: usize) -> Option<String> {
        let brush = self.pattern_brushes.get_mut(index)?;
        if let Some(id) = &brush.id {
            return Some(url(id));
        }
        let id = next_id(&mut self.pattern_count, "pattern");
        let pattern = SvgNode::new("pattern")
            .set("id", &id)
            .set("patternUnits", "userSpaceOnUse")
            .set("x", 0)
            .set("y", 0)
            .set("width", brush.width)
            .set("height", brush.height)
            .add(
                SvgNode::new("image")
                    .set("width", brush.width)
                    .set("height", brush.height)
                    .set("xlink:href", &brush.href),
            );
        self.doc.add_def(pattern);
        brush.id = Some(id.clone());
        Some(url(&id))
    }

    /// Pen and brush classes of a closed figure.
    fn fill_and_stroke(&mut self, node: SvgNode) -> SvgNode {
        let pen = self.styles.use_class(self.dc.pen);
        let (brush_class, fill) = self.brush_paint(self.dc.brush);
        let class = match brush_class {
            Some(brush_class) => format!("{} {}", pen, brush_class),
            None => pen,
        };
        let node = node.set("class", class);
        match fill {
            Some(fill) => node.set("fill", fill),
            None => node,
        }
    }

    /// Pen class of an open figure.
    fn stroke_only(&mut self, node: SvgNode) -> SvgNode {
        let pen = self.styles.use_class(self.dc.pen);
        node.set("class", pen).set("fill", "none")
    }

    /// Reference to the filter of a ROP code, registering it on first use.
    fn rop_filter(&mut self, rop: u32) -> Option<String> {
        let name = rop::filter_name(rop)?;
        if !self.filters.contains(&name) {
            self.doc.add_def(rop::filter_node(rop)?);
            self.filters.push(name);
            self.doc.set_root_attr("enable-background", "new");
        }
        Some(url(name))
    }

    /// Fills a destination rectangle with the current brush under a ROP.
    fn rop_fill(&mut self, x: i32, y: i32, width: i32, height: i32, rop: u32) -> GdiResult {
        let mut node = self.rect_node(x, y, x + width, y + height).set("stroke", "none");
        let (class, fill) = self.brush_paint(self.dc.brush);
        if let Some(class) = class {
            node.assign("class", class);
        }
        if let Some(fill) = fill {
            node.assign("fill", fill);
        }
        if let Some(filter) = self.rop_filter(rop) {
            node.assign("filter", filter);
        }
        self.emit(node)
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_dib(
        &mut self,
        image: &[u8],
        dx: i32,
        dy: i32,
        dw: i32,
        dh: i32,
        sx: i32,
        sy: i32,
        sw: i32,
        sh: i32,
        rop: u32,
    ) -> GdiResult {
        let (png, _, _) = image_utils::dib_to_png(image, dh < 0)?;

        let (top, bottom) = if dh < 0 { (dy + dh, dy) } else { (dy, dy + dh) };
        let (x, y, width, height) = self.device_box(dx, top, dx + dw, bottom);
        let mut node = SvgNode::new("image")
            .set("x", x)
            .set("y", y)
            .set("width", width)
            .set("height", height)
            .set("xlink:href", image_utils::png_data_uri(&png));

        if sx != 0 || sy != 0 || sw != dw.abs() || sh != dh.abs() {
            node.assign("viewBox", format!("{} {} {} {}", sx, sy, sw, sh));
            node.assign("preserveAspectRatio", "none");
        }
        if rop != SRCCOPY {
            if let Some(filter) = self.rop_filter(rop) {
                node.assign("filter", filter);
            }
        }
        self.emit(node)
    }

    #[allow(clippy::too_many_arguments)]
    fn arc_geometry(
        &self,
        sxr: i32,
        syr: i32,
        exr: i32,
        eyr: i32,
        sxa: i32,
        sya: i32,
        exa: i32,
        eya: i32,
    ) -> ArcGeometry {
        let (x1, x2) = (self.abs_x(sxr) as f64, self.abs_x(exr) as f64);
        let (y1, y2) = (self.abs_y(syr) as f64, self.abs_y(eyr) as f64);
        let cx = (x1 + x2) / 2.0;
        let cy = (y1 + y2) / 2.0;
        let rx = (x2 - x1).abs() / 2.0;
        let ry = (y2 - y1).abs() / 2.0;

        let angle = |x: i32, y: i32| -> f64 {
            let vx = (self.abs_x(x) as f64 - cx) / if rx > 0.0 { rx } else { 1.0 };
            let vy = (self.abs_y(y) as f64 - cy) / if ry > 0.0 { ry } else { 1.0 };
            vy.atan2(vx)
        };
        let sa = angle(sxa, sya);
        let ea = angle(exa, eya);
        let on_ellipse = |a: f64| (cx + rx * a.cos(), cy + ry * a.sin());

        // GDI draws arcs counterclockwise on the output surface, which is the
        // decreasing-angle direction with y pointing down.
        let span = (sa - ea).rem_euclid(2.0 * PI);
        ArcGeometry {
            cx,
            cy,
            rx,
            ry,
            start: on_ellipse(sa),
            end: on_ellipse(ea),
            large: span > PI,
            closed: (sxa == exa && sya == eya) || span.abs() < 1e-9,
        }
    }

    /// Circle or ellipse covering the whole bounding box of an arc.
    fn full_ellipse(geometry: &ArcGeometry) -> SvgNode {
        if geometry.rx == geometry.ry {
            SvgNode::new("circle")
                .set("cx", num(geometry.cx))
                .set("cy", num(geometry.cy))
                .set("r", num(geometry.rx))
        } else {
            SvgNode::new("ellipse")
                .set("cx", num(geometry.cx))
                .set("cy", num(geometry.cy))
                .set("rx", num(geometry.rx))
                .set("ry", num(geometry.ry))
        }
    }

    fn arc_command(geometry: &ArcGeometry) -> String {
        format!(
            "A {},{} 0 {} 0 {},{}",
            num(geometry.rx),
            num(geometry.ry),
            if geometry.large { 1 } else { 0 },
            num(geometry.end.0),
            num(geometry.end.1)
        )
    }

    /// Region `rect` in defs, created the first time the region is used.
    fn region_ref(&mut self, rgn: &SvgObject) -> Option<String> {
        let index = match rgn {
            SvgObject::Region(index) => *index,
            _ => return None,
        };
        let rect = self.regions.get(index)?.rect;
        if let Some(id) = &self.regions[index].id {
            return Some(id.clone());
        }
        let id = format!("rgn{}", index);
        let node = self
            .rect_node(rect.left, rect.top, rect.right, rect.bottom)
            .set("id", &id);
        self.doc.add_def(node);
        self.regions[index].id = Some(id.clone());
        Some(id)
    }

    fn use_region(id: &str) -> SvgNode {
        SvgNode::new("use").set("xlink:href", format!("#{}", id))
    }

    /// Makes `content` the active clip mask and opens a group drawn under it.
    fn set_clip_mask(&mut self, content: Vec<SvgNode>) {
        let id = next_id(&mut self.mask_count, "mask");
        let mut mask = SvgNode::new("mask").set("id", &id);
        for node in content {
            mask.append(node);
        }
        self.doc.add_def(mask);
        self.doc.open_group(SvgNode::new("g").set("mask", url(&id)));
        self.dc.mask = Some(id);
    }

    fn active_mask_content(&self) -> Option<Vec<SvgNode>> {
        let id = self.dc.mask.as_deref()?;
        self.doc.find_def(id).map(|mask| mask.children().to_vec())
    }

    /// Estimated background box of a text run when no rectangle is given.
    fn text_extent_rect(&self, ax: i32, ay: i32, advance: i32, size: i32) -> Option<SvgNode> {
        let width = self.dc.to_relative_x(advance).saturating_abs();
        if width == 0 || size == 0 {
            return None;
        }
        let align = self.dc.text_align;
        let x = match align & TA_CENTER {
            TA_RIGHT => ax.saturating_sub(width),
            TA_CENTER => ax.saturating_sub(width / 2),
            _ => ax,
        };
        let y = match align & TA_BASELINE {
            TA_BOTTOM | TA_BASELINE => ay.saturating_sub(size),
            _ => ay,
        };
        Some(
            SvgNode::new("rect")
                .set("x", x)
                .set("y", y)
                .set("width", width)
                .set("height", size),
        )
    }

    fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        options: u16,
        rect: Option<Rect>,
        text: &[u8],
        dx: &[i32],
    ) -> GdiResult {
        let font = self.dc.font.and_then(|id| self.styles.font(id).cloned());
        let charset_id = font
            .as_ref()
            .map(|f| f.font.charset)
            .unwrap_or(charset::ANSI_CHARSET);
        let content = charset::decode_text(charset_id, text, self.replace_symbol_font);
        let glyphs = content.chars().count();
        let widths = if dx.is_empty() {
            Vec::new()
        } else {
            charset::merge_dx(charset_id, text, dx)
        };

        let align = self.dc.text_align;
        let update_cp = align & TA_UPDATECP != 0;
        let origin = if update_cp {
            self.dc.current_position()
        } else {
            Point::new(x, y)
        };
        let ax = self.abs_x(origin.x);
        let ay = self.abs_y(origin.y);

        let font_size = font.as_ref().map(|f| f.font_size(&self.dc)).unwrap_or(0);
        let advance: i32 = if widths.is_empty() {
            let height = font.as_ref().map(|f| f.font.height.abs()).unwrap_or(0);
            glyphs as i32 * height / 2
        } else {
            widths.iter().sum()
        };

        let opaque_rect = options & ETO_OPAQUE != 0;
        let background = match rect {
            Some(r) if opaque_rect => Some(self.rect_node(r.left, r.top, r.right, r.bottom)),
            _ if opaque_rect || self.dc.bk_mode == OPAQUE => {
                self.text_extent_rect(ax, ay, advance, font_size)
            }
            _ => None,
        };
        if let Some(background) = background {
            let background = background
                .set("fill", rgb(self.dc.bk_color))
                .set("stroke", "none");
            self.doc.append(background);
        }
        if glyphs == 0 {
            return Ok(Outcome::Handled);
        }

        let mut node = SvgNode::new("text");
        if widths.is_empty() {
            node.assign("x", ax);
        } else {
            let mut position = origin.x;
            let mut xs = Vec::with_capacity(widths.len());
            for width in widths.iter().take(glyphs) {
                xs.push(self.abs_x(position).to_string());
                position += width;
            }
            node.assign("x", xs.join(" "));
        }
        node.assign("y", ay);

        if widths.is_empty() && self.dc.text_char_extra != 0 && glyphs > 1 {
            let extra = self.dc.to_relative_x(self.dc.text_char_extra).to_string();
            let mut shifts = vec!["0".to_string()];
            shifts.extend(std::iter::repeat(extra).take(glyphs - 1));
            node.assign("dx", shifts.join(" "));
        }

        if let Some(id) = self.dc.font {
            node.assign("class", self.styles.use_class(id));
        }
        node.assign("fill", rgb(self.dc.text_color));

        let mut style = String::new();
        match align & TA_CENTER {
            TA_RIGHT => style.push_str(" text-anchor: end;"),
            TA_CENTER => style.push_str(" text-anchor: middle;"),
            _ => {}
        }
        match align & TA_BASELINE {
            TA_TOP => style.push_str(" dominant-baseline: text-before-edge;"),
            TA_BOTTOM => style.push_str(" dominant-baseline: text-after-edge;"),
            TA_BASELINE => style.push_str(" dominant-baseline: alphabetic;"),
            _ => {}
        }
        if align & TA_RTLREADING != 0 {
            style.push_str(" unicode-bidi: bidi-override; direction: rtl;");
        }
        if self.dc.text_space > 0 {
            style.push_str(&format!(" word-spacing: {};", self.dc.text_space));
        }
        if !style.is_empty() {
            node.assign("style", style.trim());
        }

        if let Some(font) = &font {
            if font.font.escapement != 0 {
                node.assign(
                    "transform",
                    format!(
                        "rotate({}, {}, {})",
                        num(-(font.font.escapement as f64) / 10.0),
                        ax,
                        ay
                    ),
                );
            }
            if font.font.orientation != 0 {
                let angle = num(-(font.font.orientation as f64) / 10.0);
                node.assign("rotate", vec![angle; glyphs].join(" "));
            }
            if let Some(lang) = font.lang() {
                node.assign("xml:lang", lang);
            }
        }

        if options & ETO_CLIPPED != 0 {
            if let Some(r) = rect {
                let id = next_id(&mut self.clip_count, "clip");
                let clip = SvgNode::new("clipPath")
                    .set("id", &id)
                    .add(self.rect_node(r.left, r.top, r.right, r.bottom));
                self.doc.add_def(clip);
                node.assign("clip-path", url(&id));
            }
        }

        self.doc.append(node.with_text(content));

        if update_cp {
            self.dc.move_to(origin.x + advance, origin.y);
        }
        Ok(Outcome::Handled)
    }
}

impl Gdi for SvgGdi {
    type Object = SvgObject;

    fn placeable_header(&mut self, vsx: i32, vsy: i32, vex: i32, vey: i32, dpi: u32) -> GdiResult {
        self.dc.set_dpi(dpi as i64);
        let dpi = self.dc.dpi() as f64;
        self.placeable_size = Some((
            format!("{}in", (vex - vsx).abs() as f64 / dpi),
            format!("{}in", (vey - vsy).abs() as f64 / dpi),
        ));
        Ok(Outcome::Handled)
    }

    fn header(&mut self) -> GdiResult {
        Ok(Outcome::Handled)
    }

    fn animate_palette(&mut self, start: u16, entries: &[u32]) -> GdiResult {
        debug!("animate_palette: {} entries from {} ignored", entries.len(), start);
        Ok(Outcome::Handled)
    }

    fn arc(
        &mut self,
        sxr: i32,
        syr: i32,
        exr: i32,
        eyr: i32,
        sxa: i32,
        sya: i32,
        exa: i32,
        eya: i32,
    ) -> GdiResult {
        let geometry = self.arc_geometry(sxr, syr, exr, eyr, sxa, sya, exa, eya);
        let node = if geometry.closed {
            Self::full_ellipse(&geometry)
        } else {
            SvgNode::new("path").set(
                "d",
                format!(
                    "M {},{} {}",
                    num(geometry.start.0),
                    num(geometry.start.1),
                    Self::arc_command(&geometry)
                ),
            )
        };
        let node = self.stroke_only(node);
        self.emit(node)
    }

    fn bit_blt(
        &mut self,
        image: Option<&[u8]>,
        dx: i32,
        dy: i32,
        dw: i32,
        dh: i32,
        _sx: i32,
        _sy: i32,
        rop: u32,
    ) -> GdiResult {
        match image {
            None => self.rop_fill(dx, dy, dw, dh, rop),
            Some(bitmap) => {
                debug!("bit_blt: device-dependent bitmap ({} bytes) not rendered", bitmap.len());
                Ok(Outcome::Unsupported)
            }
        }
    }

    fn chord(
        &mut self,
        sxr: i32,
        syr: i32,
        exr: i32,
        eyr: i32,
        sxa: i32,
        sya: i32,
        exa: i32,
        eya: i32,
    ) -> GdiResult {
        let geometry = self.arc_geometry(sxr, syr, exr, eyr, sxa, sya, exa, eya);
        let node = if geometry.closed {
            Self::full_ellipse(&geometry)
        } else {
            SvgNode::new("path").set(
                "d",
                format!(
                    "M {},{} {} z",
                    num(geometry.start.0),
                    num(geometry.start.1),
                    Self::arc_command(&geometry)
                ),
            )
        };
        let node = self.fill_and_stroke(node);
        self.emit(node)
    }

    fn create_brush_indirect(
        &mut self,
        style: u16,
        color: u32,
        hatch: u16,
    ) -> ConvertResult<SvgObject> {
        let hatch = if style == BS_HATCHED { hatch } else { 0 };
        let id = self
            .styles
            .register(StyleObject::Brush(SvgBrush { style, color, hatch }));
        Ok(SvgObject::Brush(id))
    }

    fn create_font_indirect(&mut self, font: &LogFont) -> ConvertResult<SvgObject> {
        let id = self
            .styles
            .register(StyleObject::Font(SvgFont { font: font.clone() }));
        Ok(SvgObject::Font(id))
    }

    fn create_palette(&mut self, _version: u16, entries: &[u32]) -> ConvertResult<SvgObject> {
        debug!("create_palette: {} entries", entries.len());
        Ok(SvgObject::Palette)
    }

    fn create_pattern_brush(&mut self, image: &[u8]) -> ConvertResult<SvgObject> {
        debug!(
            "create_pattern_brush: device-dependent bitmap ({} bytes) not rendered",
            image.len()
        );
        Ok(SvgObject::Bitmap)
    }

    fn create_pen_indirect(
        &mut self,
        style: u16,
        width: i32,
        color: u32,
    ) -> ConvertResult<SvgObject> {
        let id = self
            .styles
            .register(StyleObject::Pen(SvgPen { style, width, color }));
        Ok(SvgObject::Pen(id))
    }

    fn create_rect_rgn(
        &mut self,
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    ) -> ConvertResult<SvgObject> {
        self.regions.push(Region {
            rect: Rect::new(left, top, right, bottom),
            id: None,
        });
        Ok(SvgObject::Region(self.regions.len() - 1))
    }

    fn delete_object(&mut self, obj: &SvgObject) -> GdiResult {
        match *obj {
            SvgObject::Brush(_) | SvgObject::PatternBrush(_) if self.dc.brush == *obj => {
                self.dc.brush = SvgObject::Brush(self.default_brush);
            }
            SvgObject::Pen(id) if self.dc.pen == id => {
                self.dc.pen = self.default_pen;
            }
            SvgObject::Font(id) if self.dc.font == Some(id) => {
                self.dc.font = None;
            }
            _ => {}
        }
        Ok(Outcome::Handled)
    }

    fn dib_bit_blt(
        &mut self,
        image: Option<&[u8]>,
        dx: i32,
        dy: i32,
        dw: i32,
        dh: i32,
        sx: i32,
        sy: i32,
        rop: u32,
    ) -> GdiResult {
        match image {
            Some(image) => self.draw_dib(image, dx, dy, dw, dh, sx, sy, dw.abs(), dh.abs(), rop),
            None => self.rop_fill(dx, dy, dw, dh, rop),
        }
    }

    fn dib_create_pattern_brush(&mut self, image: &[u8], usage: u16) -> ConvertResult<SvgObject> {
        if usage == DIB_PAL_COLORS {
            debug!("dib_create_pattern_brush: palette indices read as colors");
        }
        let (png, width, height) = image_utils::dib_to_png(image, false)?;
        self.pattern_brushes.push(PatternBrush {
            href: image_utils::png_data_uri(&png),
            width,
            height,
            id: None,
        });
        Ok(SvgObject::PatternBrush(self.pattern_brushes.len() - 1))
    }

    fn dib_stretch_blt(
        &mut self,
        image: Option<&[u8]>,
        dx: i32,
        dy: i32,
        dw: i32,
        dh: i32,
        sx: i32,
        sy: i32,
        sw: i32,
        sh: i32,
        rop: u32,
    ) -> GdiResult {
        match image {
            Some(image) => self.draw_dib(image, dx, dy, dw, dh, sx, sy, sw, sh, rop),
            None => self.rop_fill(dx, dy, dw, dh, rop),
        }
    }

    fn ellipse(&mut self, sx: i32, sy: i32, ex: i32, ey: i32) -> GdiResult {
        let (x1, x2) = (self.abs_x(sx) as f64, self.abs_x(ex) as f64);
        let (y1, y2) = (self.abs_y(sy) as f64, self.abs_y(ey) as f64);
        let node = SvgNode::new("ellipse")
            .set("cx", num((x1 + x2) / 2.0))
            .set("cy", num((y1 + y2) / 2.0))
            .set("rx", num((x2 - x1).abs() / 2.0))
            .set("ry", num((y2 - y1).abs() / 2.0));
        let node = self.fill_and_stroke(node);
        self.emit(node)
    }

    fn escape(&mut self, data: &[u8]) -> GdiResult {
        debug!("escape: {} bytes ignored", data.len());
        Ok(Outcome::Unsupported)
    }

    fn exclude_clip_rect(&mut self, left: i32, top: i32, right: i32, bottom: i32) -> GdiResult {
        let mut content = match self.active_mask_content() {
            Some(content) => content,
            None => vec![SvgNode::new("rect")
                .set("x", 0)
                .set("y", 0)
                .set("width", self.dc.window_width().abs())
                .set("height", self.dc.window_height().abs())
                .set("fill", "white")],
        };
        content.push(self.rect_node(left, top, right, bottom).set("fill", "black"));
        self.set_clip_mask(content);
        Ok(Outcome::Handled)
    }

    fn ext_flood_fill(&mut self, x: i32, y: i32, color: u32, fill_type: u16) -> GdiResult {
        debug!("ext_flood_fill({}, {}, {:06X}, {}) not rendered", x, y, color, fill_type);
        Ok(Outcome::Unsupported)
    }

    fn ext_text_out(
        &mut self,
        x: i32,
        y: i32,
        options: u16,
        rect: Option<Rect>,
        text: &[u8],
        dx: &[i32],
    ) -> GdiResult {
        self.draw_text(x, y, options, rect, text, dx)
    }

    fn fill_rgn(&mut self, rgn: &SvgObject, brush: &SvgObject) -> GdiResult {
        let id = match self.region_ref(rgn) {
            Some(id) => id,
            None => return Ok(Outcome::Unsupported),
        };
        let mut node = Self::use_region(&id);
        let (class, fill) = self.brush_paint(*brush);
        if let Some(class) = class {
            node.assign("class", class);
        }
        if let Some(fill) = fill {
            node.assign("fill", fill);
        }
        self.emit(node)
    }

    fn flood_fill(&mut self, x: i32, y: i32, color: u32) -> GdiResult {
        debug!("flood_fill({}, {}, {:06X}) not rendered", x, y, color);
        Ok(Outcome::Unsupported)
    }

    fn frame_rgn(
        &mut self,
        rgn: &SvgObject,
        brush: &SvgObject,
        width: i32,
        height: i32,
    ) -> GdiResult {
        let id = match self.region_ref(rgn) {
            Some(id) => id,
            None => return Ok(Outcome::Unsupported),
        };
        let color = match brush {
            SvgObject::Brush(style) => self.styles.brush(*style).map(|b| b.color).unwrap_or(0),
            _ => 0,
        };
        let stroke_width = self
            .dc
            .to_relative_x(width)
            .saturating_abs()
            .max(self.dc.to_relative_y(height).saturating_abs())
            .max(1);
        let node = Self::use_region(&id)
            .set("fill", "none")
            .set("stroke", rgb(color))
            .set("stroke-width", stroke_width);
        self.emit(node)
    }

    fn intersect_clip_rect(&mut self, left: i32, top: i32, right: i32, bottom: i32) -> GdiResult {
        let rect = self.rect_node(left, top, right, bottom).set("fill", "white");
        let content = match &self.dc.mask {
            Some(mask) => SvgNode::new("g").set("mask", url(mask)).add(rect),
            None => rect,
        };
        self.set_clip_mask(vec![content]);
        Ok(Outcome::Handled)
    }

    fn invert_rgn(&mut self, rgn: &SvgObject) -> GdiResult {
        let id = match self.region_ref(rgn) {
            Some(id) => id,
            None => return Ok(Outcome::Unsupported),
        };
        let mut node = Self::use_region(&id);
        if let Some(filter) = self.rop_filter(DSTINVERT) {
            node.assign("filter", filter);
        }
        self.emit(node)
    }

    fn line_to(&mut self, ex: i32, ey: i32) -> GdiResult {
        let from = self.dc.current_position();
        let node = SvgNode::new("line")
            .set("x1", self.abs_x(from.x))
            .set("y1", self.abs_y(from.y))
            .set("x2", self.abs_x(ex))
            .set("y2", self.abs_y(ey));
        let node = self.stroke_only(node);
        self.dc.move_to(ex, ey);
        self.emit(node)
    }

    fn move_to_ex(&mut self, x: i32, y: i32) -> GdiResult {
        self.dc.move_to(x, y);
        Ok(Outcome::Handled)
    }

    fn offset_clip_rgn(&mut self, x: i32, y: i32) -> GdiResult {
        let content = match self.active_mask_content() {
            Some(content) => content,
            None => return Ok(Outcome::Handled),
        };
        let mut group = SvgNode::new("g").set(
            "transform",
            format!(
                "translate({}, {})",
                self.dc.to_relative_x(x),
                self.dc.to_relative_y(y)
            ),
        );
        for node in content {
            group.append(node);
        }
        self.set_clip_mask(vec![group]);
        Ok(Outcome::Handled)
    }

    fn offset_viewport_org_ex(&mut self, x: i32, y: i32) -> GdiResult {
        self.dc.offset_viewport_org(x, y);
        Ok(Outcome::Handled)
    }

    fn offset_window_org_ex(&mut self, x: i32, y: i32) -> GdiResult {
        self.dc.offset_window_org(x, y);
        Ok(Outcome::Handled)
    }

    fn paint_rgn(&mut self, rgn: &SvgObject) -> GdiResult {
        let brush = self.dc.brush;
        self.fill_rgn(rgn, &brush)
    }

    fn pat_blt(&mut self, x: i32, y: i32, width: i32, height: i32, rop: u32) -> GdiResult {
        self.rop_fill(x, y, width, height, rop)
    }

    fn pie(
        &mut self,
        sxr: i32,
        syr: i32,
        exr: i32,
        eyr: i32,
        sxa: i32,
        sya: i32,
        exa: i32,
        eya: i32,
    ) -> GdiResult {
        let geometry = self.arc_geometry(sxr, syr, exr, eyr, sxa, sya, exa, eya);
        let node = if geometry.closed {
            Self::full_ellipse(&geometry)
        } else {
            SvgNode::new("path").set(
                "d",
                format!(
                    "M {},{} L {},{} {} z",
                    num(geometry.cx),
                    num(geometry.cy),
                    num(geometry.start.0),
                    num(geometry.start.1),
                    Self::arc_command(&geometry)
                ),
            )
        };
        let node = self.fill_and_stroke(node);
        self.emit(node)
    }

    fn polygon(&mut self, points: &[Point]) -> GdiResult {
        let mut node = SvgNode::new("polygon").set("points", self.points_attr(points));
        if self.dc.poly_fill_mode == WINDING {
            node.assign("fill-rule", "nonzero");
        }
        let node = self.fill_and_stroke(node);
        self.emit(node)
    }

    fn polyline(&mut self, points: &[Point]) -> GdiResult {
        let node = SvgNode::new("polyline").set("points", self.points_attr(points));
        let node = self.stroke_only(node);
        self.emit(node)
    }

    fn poly_polygon(&mut self, polygons: &[Vec<Point>]) -> GdiResult {
        let mut d = Vec::new();
        for ring in polygons.iter().filter(|ring| !ring.is_empty()) {
            let mut subpath = format!("M {},{}", self.abs_x(ring[0].x), self.abs_y(ring[0].y));
            if ring.len() > 1 {
                subpath.push_str(" L ");
                subpath.push_str(&self.points_attr(&ring[1..]));
            }
            subpath.push_str(" z");
            d.push(subpath);
        }
        let mut node = SvgNode::new("path").set("d", d.join(" "));
        if self.dc.poly_fill_mode == WINDING {
            node.assign("fill-rule", "nonzero");
        }
        let node = self.fill_and_stroke(node);
        self.emit(node)
    }

    fn realize_palette(&mut self) -> GdiResult {
        debug!("realize_palette ignored");
        Ok(Outcome::Handled)
    }

    fn restore_dc(&mut self, saved_dc: i32) -> GdiResult {
        let depth = self.saved_dc.len() as i32;
        let target = if saved_dc < 0 { depth + saved_dc } else { saved_dc - 1 };
        if target < 0 || target >= depth {
            warn!("restore_dc({}) with {} saved states ignored", saved_dc, depth);
            return Ok(Outcome::Handled);
        }
        self.saved_dc.truncate(target as usize + 1);
        if let Some(dc) = self.saved_dc.pop() {
            self.dc = dc;
        }
        match self.dc.mask.clone() {
            Some(mask) => self.doc.open_group(SvgNode::new("g").set("mask", url(&mask))),
            None => self.doc.close_group(),
        }
        Ok(Outcome::Handled)
    }

    fn rectangle(&mut self, sx: i32, sy: i32, ex: i32, ey: i32) -> GdiResult {
        let node = self.rect_node(sx, sy, ex, ey);
        let node = self.fill_and_stroke(node);
        self.emit(node)
    }

    fn resize_palette(&mut self, entries: u16) -> GdiResult {
        debug!("resize_palette({}) ignored", entries);
        Ok(Outcome::Handled)
    }

    fn round_rect(&mut self, sx: i32, sy: i32, ex: i32, ey: i32, rw: i32, rh: i32) -> GdiResult {
        let node = self
            .rect_node(sx, sy, ex, ey)
            .set("rx", num(self.dc.to_relative_x(rw).saturating_abs() as f64 / 2.0))
            .set("ry", num(self.dc.to_relative_y(rh).saturating_abs() as f64 / 2.0));
        let node = self.fill_and_stroke(node);
        self.emit(node)
    }

    fn save_dc(&mut self) -> GdiResult {
        self.saved_dc.push(self.dc.clone());
        Ok(Outcome::Handled)
    }

    fn scale_viewport_ext_ex(&mut self, x: i32, xd: i32, y: i32, yd: i32) -> GdiResult {
        self.dc.scale_viewport_ext(x, xd, y, yd);
        Ok(Outcome::Handled)
    }

    fn scale_window_ext_ex(&mut self, x: i32, xd: i32, y: i32, yd: i32) -> GdiResult {
        self.dc.scale_window_ext(x, xd, y, yd);
        Ok(Outcome::Handled)
    }

    fn select_clip_rgn(&mut self, rgn: Option<&SvgObject>) -> GdiResult {
        let rgn = match rgn {
            Some(rgn) => rgn,
            None => {
                self.dc.mask = None;
                self.doc.close_group();
                return Ok(Outcome::Handled);
            }
        };
        let id = match self.region_ref(rgn) {
            Some(id) => id,
            None => return Ok(Outcome::Unsupported),
        };
        self.set_clip_mask(vec![Self::use_region(&id).set("fill", "white")]);
        Ok(Outcome::Handled)
    }

    fn select_object(&mut self, obj: &SvgObject) -> GdiResult {
        match *obj {
            SvgObject::Brush(_) | SvgObject::PatternBrush(_) => self.dc.brush = *obj,
            SvgObject::Pen(id) => self.dc.pen = id,
            SvgObject::Font(id) => self.dc.font = Some(id),
            SvgObject::Region(_) => return self.select_clip_rgn(Some(obj)),
            SvgObject::Palette | SvgObject::Bitmap => {
                debug!("select_object({:?}) not rendered", obj);
                return Ok(Outcome::Unsupported);
            }
        }
        Ok(Outcome::Handled)
    }

    fn select_palette(&mut self, palette: &SvgObject, background: bool) -> GdiResult {
        debug!("select_palette({:?}, {}) ignored", palette, background);
        Ok(Outcome::Handled)
    }

    fn set_bk_color(&mut self, color: u32) -> GdiResult {
        self.dc.bk_color = color;
        Ok(Outcome::Handled)
    }

    fn set_bk_mode(&mut self, mode: i16) -> GdiResult {
        self.dc.bk_mode = mode;
        Ok(Outcome::Handled)
    }

    fn set_dibits_to_device(
        &mut self,
        dx: i32,
        dy: i32,
        dw: i32,
        dh: i32,
        sx: i32,
        sy: i32,
        _start_scan: u16,
        _scan_lines: u16,
        image: &[u8],
        _color_use: u16,
    ) -> GdiResult {
        self.draw_dib(image, dx, dy, dw, dh, sx, sy, dw.abs(), dh.abs(), SRCCOPY)
    }

    fn set_map_mode(&mut self, mode: i16) -> GdiResult {
        self.dc.set_map_mode(mode);
        Ok(Outcome::Handled)
    }

    fn set_mapper_flags(&mut self, flags: u32) -> GdiResult {
        self.dc.set_mapper_flags(flags);
        Ok(Outcome::Handled)
    }

    fn set_palette_entries(&mut self, start: u16, entries: &[u32]) -> GdiResult {
        debug!("set_palette_entries: {} entries from {} ignored", entries.len(), start);
        Ok(Outcome::Handled)
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) -> GdiResult {
        let node = SvgNode::new("rect")
            .set("x", self.abs_x(x))
            .set("y", self.abs_y(y))
            .set("width", self.dc.to_relative_x(1).saturating_abs().max(1))
            .set("height", self.dc.to_relative_y(1).saturating_abs().max(1))
            .set("fill", rgb(color))
            .set("stroke", "none");
        self.emit(node)
    }

    fn set_poly_fill_mode(&mut self, mode: i16) -> GdiResult {
        self.dc.poly_fill_mode = mode;
        Ok(Outcome::Handled)
    }

    fn set_rel_abs(&mut self, mode: i16) -> GdiResult {
        self.dc.rel_abs_mode = mode;
        Ok(Outcome::Handled)
    }

    fn set_rop2(&mut self, mode: i16) -> GdiResult {
        self.dc.rop2 = mode;
        Ok(Outcome::Handled)
    }

    fn set_stretch_blt_mode(&mut self, mode: i16) -> GdiResult {
        self.dc.stretch_blt_mode = mode;
        Ok(Outcome::Handled)
    }

    fn set_text_align(&mut self, align: u16) -> GdiResult {
        self.dc.text_align = align;
        Ok(Outcome::Handled)
    }

    fn set_text_character_extra(&mut self, extra: i32) -> GdiResult {
        self.dc.text_char_extra = extra;
        Ok(Outcome::Handled)
    }

    fn set_text_color(&mut self, color: u32) -> GdiResult {
        self.dc.text_color = color;
        Ok(Outcome::Handled)
    }

    fn set_text_justification(&mut self, break_extra: i32, break_count: i32) -> GdiResult {
        self.dc.text_space = if break_count > 0 {
            self.dc.to_relative_x(break_extra).saturating_abs() / break_count
        } else {
            0
        };
        Ok(Outcome::Handled)
    }

    fn set_viewport_ext_ex(&mut self, x: i32, y: i32) -> GdiResult {
        self.dc.set_viewport_ext(x, y);
        Ok(Outcome::Handled)
    }

    fn set_viewport_org_ex(&mut self, x: i32, y: i32) -> GdiResult {
        self.dc.set_viewport_org(x, y);
        Ok(Outcome::Handled)
    }

    fn set_window_ext_ex(&mut self, width: i32, height: i32) -> GdiResult {
        self.dc.set_window_ext(width, height);
        Ok(Outcome::Handled)
    }

    fn set_window_org_ex(&mut self, x: i32, y: i32) -> GdiResult {
        self.dc.set_window_org(x, y);
        Ok(Outcome::Handled)
    }

    fn stretch_blt(
        &mut self,
        image: Option<&[u8]>,
        dx: i32,
        dy: i32,
        dw: i32,
        dh: i32,
        _sx: i32,
        _sy: i32,
        _sw: i32,
        _sh: i32,
        rop: u32,
    ) -> GdiResult {
        match image {
            None => self.rop_fill(dx, dy, dw, dh, rop),
            Some(bitmap) => {
                debug!(
                    "stretch_blt: device-dependent bitmap ({} bytes) not rendered",
                    bitmap.len()
                );
                Ok(Outcome::Unsupported)
            }
        }
    }

    fn stretch_dibits(
        &mut self,
        dx: i32,
        dy: i32,
        dw: i32,
        dh: i32,
        sx: i32,
        sy: i32,
        sw: i32,
        sh: i32,
        image: &[u8],
        _usage: u16,
        rop: u32,
    ) -> GdiResult {
        self.draw_dib(image, dx, dy, dw, dh, sx, sy, sw, sh, rop)
    }

    fn text_out(&mut self, x: i32, y: i32, text: &[u8]) -> GdiResult {
        self.draw_text(x, y, 0, None, text, &[])
    }

    fn footer(&mut self) -> GdiResult {
        let width = self.dc.window_width().abs();
        let height = self.dc.window_height().abs();
        let (svg_width, svg_height) = self
            .placeable_size
            .clone()
            .unwrap_or_else(|| (width.to_string(), height.to_string()));

        self.doc.set_root_attr("width", svg_width);
        self.doc.set_root_attr("height", svg_height);
        self.doc
            .set_root_attr("viewBox", format!("0 0 {} {}", width, height));
        self.doc.set_root_attr("stroke-linecap", "round");
        self.doc.set_root_attr("fill-rule", "evenodd");

        let css = self.styles.render_rules(&self.dc, self.replace_symbol_font);
        self.doc.set_style(css);
        Ok(Outcome::Handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::SHIFTJIS_CHARSET;
    use crate::image_utils::sample_dib;

    fn gdi() -> SvgGdi {
        let mut gdi = SvgGdi::new(false);
        gdi.header().unwrap();
        gdi.set_window_ext_ex(1000, 1000).unwrap();
        gdi
    }

    fn finish(mut gdi: SvgGdi) -> String {
        gdi.footer().unwrap();
        gdi.to_svg()
    }

    fn last(gdi: &SvgGdi) -> &SvgNode {
        gdi.document().content().last().unwrap()
    }

    #[test]
    fn test_rectangle_uses_pen_and_brush_classes() {
        let mut gdi = gdi();
        let brush = gdi.create_brush_indirect(BS_SOLID, 0, 0).unwrap();
        gdi.select_object(&brush).unwrap();
        gdi.rectangle(100, 80, 10, 20).unwrap();

        let rect = last(&gdi);
        assert_eq!(rect.name(), "rect");
        assert_eq!(rect.attr("x"), Some("10"));
        assert_eq!(rect.attr("y"), Some("20"));
        assert_eq!(rect.attr("width"), Some("90"));
        assert_eq!(rect.attr("height"), Some("60"));
        assert_eq!(rect.attr("class"), Some("pen0 brush1"));

        let svg = finish(gdi);
        assert!(svg.contains(".brush1 {fill: rgb(0,0,0);}"));
        assert!(!svg.contains(".brush0 "));
        assert!(svg.contains(".pen0 {"));
    }

    #[test]
    fn test_degenerate_window_scale() {
        let mut gdi = SvgGdi::new(false);
        gdi.set_window_ext_ex(100, 100).unwrap();
        gdi.scale_window_ext_ex(0, 1, 1, 1).unwrap();
        gdi.rectangle(-10, 0, 10, 10).unwrap();
        assert_eq!(last(&gdi).attr("x"), Some("-10"));
        assert_eq!(last(&gdi).attr("width"), Some("20"));

        gdi.scale_window_ext_ex(1, i32::MAX, 1, i32::MAX).unwrap();
        gdi.scale_window_ext_ex(1, i32::MAX, 1, i32::MAX).unwrap();
        gdi.rectangle(-10, 0, 10, 10).unwrap();
        gdi.round_rect(-10, 0, 10, 10, 4, 4).unwrap();
        let node = last(&gdi);
        assert_eq!(node.attr("x"), Some(i32::MIN.to_string().as_str()));
        assert_eq!(node.attr("width"), Some(i32::MAX.to_string().as_str()));
    }

    #[test]
    fn test_identical_brushes_share_a_rule() {
        let mut gdi = gdi();
        let a = gdi.create_brush_indirect(BS_SOLID, 0x0000FF, 0).unwrap();
        let b = gdi.create_brush_indirect(BS_SOLID, 0x0000FF, 0).unwrap();
        let c = gdi.create_brush_indirect(BS_SOLID, 0x00FF00, 0).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let svg = finish(gdi);
        assert_eq!(svg.matches(".brush1 ").count(), 1);
        assert!(svg.contains(".brush2 {fill: rgb(0,255,0);}"));
        assert!(!svg.contains(".brush3"));
    }

    #[test]
    fn test_deleting_selection_reverts_to_defaults() {
        let mut gdi = gdi();
        let brush = gdi.create_brush_indirect(BS_SOLID, 0, 0).unwrap();
        let pen = gdi.create_pen_indirect(PS_DASH, 2, 0xFF).unwrap();
        let font = gdi.create_font_indirect(&LogFont::default()).unwrap();
        for obj in [&brush, &pen, &font] {
            gdi.select_object(obj).unwrap();
        }
        assert_eq!(gdi.dc().brush, brush);
        assert!(gdi.dc().font.is_some());

        for obj in [&brush, &pen, &font] {
            gdi.delete_object(obj).unwrap();
        }
        assert_eq!(gdi.dc().brush, SvgObject::Brush(gdi.default_brush));
        assert_eq!(gdi.dc().pen, gdi.default_pen);
        assert_eq!(gdi.dc().font, None);
    }

    #[test]
    fn test_hatched_brush_adds_pattern_per_use() {
        let mut gdi = gdi();
        let brush = gdi.create_brush_indirect(BS_HATCHED, 0xFF, HS_CROSS).unwrap();
        gdi.select_object(&brush).unwrap();
        gdi.rectangle(0, 0, 10, 10).unwrap();
        gdi.ellipse(0, 0, 10, 20).unwrap();

        assert_eq!(last(&gdi).attr("fill"), Some("url(#pattern1)"));
        let defs = gdi.document().defs();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].attr("id"), Some("pattern0"));
        assert_eq!(defs[0].name(), "pattern");
    }

    #[test]
    fn test_poly_fill_mode() {
        let mut gdi = gdi();
        let triangle = [Point::new(0, 0), Point::new(10, 0), Point::new(5, 8)];
        gdi.polygon(&triangle).unwrap();
        assert_eq!(last(&gdi).attr("fill-rule"), None);
        assert_eq!(last(&gdi).attr("points"), Some("0,0 10,0 5,8"));

        gdi.set_poly_fill_mode(WINDING).unwrap();
        gdi.polygon(&triangle).unwrap();
        assert_eq!(last(&gdi).attr("fill-rule"), Some("nonzero"));

        gdi.poly_polygon(&[triangle.to_vec(), vec![Point::new(1, 1), Point::new(2, 2)]])
            .unwrap();
        let path = last(&gdi);
        assert_eq!(path.attr("d"), Some("M 0,0 L 10,0 5,8 z M 1,1 L 2,2 z"));
        assert_eq!(path.attr("fill-rule"), Some("nonzero"));
    }

    #[test]
    fn test_polyline_and_line_are_unfilled() {
        let mut gdi = gdi();
        gdi.polyline(&[Point::new(0, 0), Point::new(4, 4)]).unwrap();
        assert_eq!(last(&gdi).attr("fill"), Some("none"));
        assert_eq!(last(&gdi).attr("class"), Some("pen0"));

        gdi.move_to_ex(5, 6).unwrap();
        gdi.line_to(50, 60).unwrap();
        let line = last(&gdi);
        assert_eq!(line.attr("x1"), Some("5"));
        assert_eq!(line.attr("y2"), Some("60"));
        assert_eq!(gdi.dc().current_position(), Point::new(50, 60));
    }

    #[test]
    fn test_arc_with_coincident_points_is_closed_shape() {
        let mut gdi = gdi();
        gdi.arc(0, 0, 100, 100, 100, 50, 100, 50).unwrap();
        let circle = last(&gdi);
        assert_eq!(circle.name(), "circle");
        assert_eq!(circle.attr("r"), Some("50"));
        assert_eq!(circle.attr("fill"), Some("none"));

        gdi.pie(0, 0, 100, 50, 7, 3, 7, 3).unwrap();
        assert_eq!(last(&gdi).name(), "ellipse");
        assert_eq!(last(&gdi).attr("ry"), Some("25"));
    }

    #[test]
    fn test_arc_paths() {
        let mut gdi = gdi();
        // quarter from the right point up to the top point
        gdi.arc(0, 0, 100, 100, 100, 50, 50, 0).unwrap();
        assert_eq!(last(&gdi).attr("d"), Some("M 100,50 A 50,50 0 0 0 50,0"));

        // the long way round from the top point to the right point
        gdi.chord(0, 0, 100, 100, 50, 0, 100, 50).unwrap();
        assert_eq!(last(&gdi).attr("d"), Some("M 50,0 A 50,50 0 1 0 100,50 z"));

        gdi.pie(0, 0, 100, 100, 100, 50, 50, 0).unwrap();
        assert_eq!(
            last(&gdi).attr("d"),
            Some("M 50,50 L 100,50 A 50,50 0 0 0 50,0 z")
        );
    }

    #[test]
    fn test_round_rect_and_pixel() {
        let mut gdi = gdi();
        gdi.round_rect(0, 0, 40, 30, 10, 6).unwrap();
        assert_eq!(last(&gdi).attr("rx"), Some("5"));
        assert_eq!(last(&gdi).attr("ry"), Some("3"));

        gdi.set_pixel(3, 4, 0x0000FF).unwrap();
        let pixel = last(&gdi);
        assert_eq!(pixel.attr("width"), Some("1"));
        assert_eq!(pixel.attr("fill"), Some("rgb(255,0,0)"));
    }

    #[test]
    fn test_text_out_alignment_and_language() {
        let mut gdi = gdi();
        let font = gdi
            .create_font_indirect(&LogFont {
                height: -20,
                escapement: 900,
                charset: SHIFTJIS_CHARSET,
                face_name: b"MS Mincho\0".to_vec(),
                ..Default::default()
            })
            .unwrap();
        gdi.select_object(&font).unwrap();
        gdi.set_bk_mode(TRANSPARENT).unwrap();
        gdi.set_text_align(TA_CENTER | TA_BASELINE).unwrap();
        gdi.set_text_color(0x00FF00).unwrap();
        gdi.text_out(10, 20, &[0x93, 0xFA, 0x96, 0x7B]).unwrap();

        let text = last(&gdi);
        assert_eq!(text.name(), "text");
        assert_eq!(text.text(), Some("日本"));
        assert_eq!(text.attr("class"), Some("font0"));
        assert_eq!(text.attr("fill"), Some("rgb(0,255,0)"));
        assert_eq!(
            text.attr("style"),
            Some("text-anchor: middle; dominant-baseline: alphabetic;")
        );
        assert_eq!(text.attr("xml:lang"), Some("ja"));
        assert_eq!(text.attr("transform"), Some("rotate(-90, 10, 20)"));
        assert_eq!(gdi.document().content().len(), 1);

        let svg = finish(gdi);
        assert!(svg.contains(".font0 {font-size: 20px; font-family:"));
        assert!(svg.contains("MS Gothic"));
    }

    #[test]
    fn test_ext_text_out_positions_and_update_cp() {
        let mut gdi = gdi();
        let font = gdi
            .create_font_indirect(&LogFont {
                height: 10,
                charset: SHIFTJIS_CHARSET,
                ..Default::default()
            })
            .unwrap();
        gdi.select_object(&font).unwrap();
        gdi.set_bk_mode(TRANSPARENT).unwrap();
        gdi.set_text_align(TA_UPDATECP).unwrap();
        gdi.move_to_ex(100, 40).unwrap();

        let text = [0x93, 0xFA, b'A'];
        gdi.ext_text_out(0, 0, 0, None, &text, &[8, 8, 5]).unwrap();
        let node = last(&gdi);
        assert_eq!(node.attr("x"), Some("100 116"));
        assert_eq!(node.attr("y"), Some("40"));
        assert_eq!(gdi.dc().current_position(), Point::new(121, 40));
    }

    #[test]
    fn test_ext_text_out_opaque_and_clipped() {
        let mut gdi = gdi();
        gdi.set_bk_color(0x00FFFF).unwrap();
        let rect = Rect::new(0, 0, 50, 12);
        gdi.ext_text_out(2, 10, ETO_OPAQUE | ETO_CLIPPED, Some(rect), b"Hi", &[])
            .unwrap();

        let content = gdi.document().content();
        assert_eq!(content.len(), 2);
        assert_eq!(content[0].name(), "rect");
        assert_eq!(content[0].attr("width"), Some("50"));
        assert_eq!(content[0].attr("fill"), Some("rgb(255,255,0)"));
        assert_eq!(content[1].attr("clip-path"), Some("url(#clip0)"));
        assert_eq!(gdi.document().defs()[0].name(), "clipPath");
    }

    #[test]
    fn test_empty_opaque_text_fills_rectangle() {
        let mut gdi = gdi();
        gdi.set_bk_color(0x0000FF).unwrap();
        gdi.ext_text_out(0, 0, ETO_OPAQUE, Some(Rect::new(10, 10, 50, 50)), b"", &[])
            .unwrap();

        let content = gdi.document().content();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0].name(), "rect");
        assert_eq!(content[0].attr("x"), Some("10"));
        assert_eq!(content[0].attr("width"), Some("40"));
        assert_eq!(content[0].attr("fill"), Some("rgb(255,0,0)"));
    }

    #[test]
    fn test_character_extra_and_justification() {
        let mut gdi = gdi();
        gdi.set_bk_mode(TRANSPARENT).unwrap();
        gdi.set_text_character_extra(3).unwrap();
        gdi.set_text_justification(20, 4).unwrap();
        gdi.text_out(0, 0, b"abc").unwrap();
        let node = last(&gdi);
        assert_eq!(node.attr("dx"), Some("0 3 3"));
        assert!(node.attr("style").unwrap().contains("word-spacing: 5;"));
    }

    #[test]
    fn test_rop_filter_registered_once() {
        let mut gdi = gdi();
        gdi.pat_blt(0, 0, 10, 10, DSTINVERT).unwrap();
        gdi.dib_bit_blt(None, 5, 5, 10, 10, 0, 0, DSTINVERT).unwrap();
        gdi.pat_blt(0, 0, 10, 10, PATCOPY).unwrap();

        let filters: Vec<&SvgNode> = gdi
            .document()
            .defs()
            .iter()
            .filter(|def| def.name() == "filter")
            .collect();
        assert_eq!(filters.len(), 1);
        let content = gdi.document().content();
        assert_eq!(content[0].attr("filter"), Some("url(#DSTINVERT_FILTER)"));
        assert_eq!(content[1].attr("filter"), Some("url(#DSTINVERT_FILTER)"));
        assert_eq!(content[2].attr("filter"), None);
        assert_eq!(gdi.document().root_attr("enable-background"), Some("new"));
    }

    #[test]
    fn test_stretch_dibits_embeds_png() {
        let mut gdi = gdi();
        gdi.stretch_dibits(10, 50, 20, -20, 0, 0, 2, 2, &sample_dib(), DIB_RGB_COLORS, SRCCOPY)
            .unwrap();
        let image = last(&gdi);
        assert_eq!(image.name(), "image");
        assert_eq!(image.attr("y"), Some("30"));
        assert_eq!(image.attr("height"), Some("20"));
        assert_eq!(image.attr("viewBox"), Some("0 0 2 2"));
        assert_eq!(image.attr("preserveAspectRatio"), Some("none"));
        assert!(image
            .attr("xlink:href")
            .unwrap()
            .starts_with("data:image/png;base64,"));

        gdi.dib_bit_blt(Some(&sample_dib()), 0, 0, 2, 2, 0, 0, SRCCOPY).unwrap();
        assert_eq!(last(&gdi).attr("viewBox"), None);
    }

    #[test]
    fn test_undecodable_dib_is_an_error() {
        let mut gdi = gdi();
        let result = gdi.stretch_dibits(0, 0, 2, 2, 0, 0, 2, 2, &[1, 2, 3], 0, SRCCOPY);
        assert!(matches!(
            result,
            Err(crate::error::ConvertError::UnsupportedRasterEncoding(_))
        ));
    }

    #[test]
    fn test_dib_pattern_brush() {
        let mut gdi = gdi();
        let brush = gdi.dib_create_pattern_brush(&sample_dib(), DIB_RGB_COLORS).unwrap();
        gdi.select_object(&brush).unwrap();
        gdi.rectangle(0, 0, 10, 10).unwrap();
        gdi.rectangle(0, 0, 20, 20).unwrap();
        assert_eq!(last(&gdi).attr("fill"), Some("url(#pattern0)"));
        assert_eq!(last(&gdi).attr("class"), Some("pen0"));
        assert_eq!(gdi.document().defs().len(), 1);
    }

    #[test]
    fn test_clip_region_masks_following_content() {
        let mut gdi = gdi();
        let rgn = gdi.create_rect_rgn(10, 10, 60, 60).unwrap();
        gdi.rectangle(0, 0, 5, 5).unwrap();
        gdi.select_clip_rgn(Some(&rgn)).unwrap();
        gdi.rectangle(0, 0, 100, 100).unwrap();

        let doc = gdi.document();
        assert_eq!(doc.find_def("rgn0").unwrap().attr("width"), Some("50"));
        let mask = doc.find_def("mask0").unwrap();
        assert_eq!(mask.children()[0].attr("xlink:href"), Some("#rgn0"));
        assert_eq!(mask.children()[0].attr("fill"), Some("white"));

        let content = doc.content();
        assert_eq!(content.len(), 2);
        assert_eq!(content[1].attr("mask"), Some("url(#mask0)"));
        assert_eq!(content[1].children()[0].name(), "rect");

        gdi.select_clip_rgn(None).unwrap();
        gdi.rectangle(0, 0, 1, 1).unwrap();
        assert_eq!(gdi.document().content().len(), 3);
        assert_eq!(gdi.dc().mask, None);
    }

    #[test]
    fn test_exclude_intersect_and_offset_clip() {
        let mut gdi = gdi();
        gdi.exclude_clip_rect(10, 10, 20, 20).unwrap();
        let mask = gdi.document().find_def("mask0").unwrap();
        assert_eq!(mask.children().len(), 2);
        assert_eq!(mask.children()[0].attr("width"), Some("1000"));
        assert_eq!(mask.children()[1].attr("fill"), Some("black"));

        gdi.exclude_clip_rect(30, 30, 40, 40).unwrap();
        assert_eq!(gdi.document().find_def("mask1").unwrap().children().len(), 3);

        gdi.intersect_clip_rect(0, 0, 500, 500).unwrap();
        let mask = gdi.document().find_def("mask2").unwrap();
        assert_eq!(mask.children()[0].attr("mask"), Some("url(#mask1)"));

        gdi.offset_clip_rgn(5, -5).unwrap();
        let mask = gdi.document().find_def("mask3").unwrap();
        assert_eq!(mask.children()[0].attr("transform"), Some("translate(5, -5)"));
        assert_eq!(gdi.dc().mask.as_deref(), Some("mask3"));
        assert_eq!(gdi.document().content().len(), 4);
    }

    #[test]
    fn test_region_painting_uses_references() {
        let mut gdi = gdi();
        let rgn = gdi.create_rect_rgn(0, 0, 10, 10).unwrap();
        let brush = gdi.create_brush_indirect(BS_SOLID, 0xFF0000, 0).unwrap();
        gdi.fill_rgn(&rgn, &brush).unwrap();
        gdi.frame_rgn(&rgn, &brush, 2, 2).unwrap();
        gdi.invert_rgn(&rgn).unwrap();
        gdi.paint_rgn(&rgn).unwrap();

        let content = gdi.document().content();
        assert!(content.iter().all(|n| n.attr("xlink:href") == Some("#rgn0")));
        assert_eq!(content[0].attr("class"), Some("brush1"));
        assert_eq!(content[1].attr("stroke"), Some("rgb(0,0,255)"));
        assert_eq!(content[2].attr("filter"), Some("url(#DSTINVERT_FILTER)"));
        assert_eq!(content[3].attr("class"), Some("brush0"));
        assert_eq!(gdi.document().defs().iter().filter(|d| d.name() == "rect").count(), 1);
        assert_eq!(gdi.fill_rgn(&brush, &brush).unwrap(), Outcome::Unsupported);
    }

    #[test]
    fn test_save_restore_stack() {
        let mut gdi = gdi();
        gdi.set_text_color(1).unwrap();
        gdi.save_dc().unwrap();
        gdi.set_text_color(2).unwrap();
        gdi.save_dc().unwrap();
        gdi.set_text_color(3).unwrap();
        gdi.save_dc().unwrap();
        gdi.set_text_color(4).unwrap();

        gdi.restore_dc(-1).unwrap();
        assert_eq!(gdi.dc().text_color, 3);
        gdi.restore_dc(1).unwrap();
        assert_eq!(gdi.dc().text_color, 1);
        assert!(gdi.saved_dc.is_empty());

        assert_eq!(gdi.restore_dc(-1).unwrap(), Outcome::Handled);
        assert_eq!(gdi.dc().text_color, 1);
    }

    #[test]
    fn test_restore_reopens_clip_group() {
        let mut gdi = gdi();
        gdi.save_dc().unwrap();
        gdi.intersect_clip_rect(0, 0, 10, 10).unwrap();
        gdi.rectangle(0, 0, 5, 5).unwrap();
        gdi.restore_dc(-1).unwrap();
        gdi.rectangle(0, 0, 5, 5).unwrap();

        let content = gdi.document().content();
        assert_eq!(content.len(), 2);
        assert_eq!(content[0].name(), "g");
        assert_eq!(content[1].name(), "rect");
    }

    #[test]
    fn test_footer_sizes() {
        let mut gdi = SvgGdi::new(false);
        gdi.placeable_header(0, 0, 9000, 4493, 1440).unwrap();
        gdi.set_window_ext_ex(9000, -4493).unwrap();
        let svg = finish(gdi);
        assert!(svg.contains("width=\"6.25in\""));
        assert!(svg.contains("height=\"3.1201"));
        assert!(svg.contains("viewBox=\"0 0 9000 4493\""));
        assert!(svg.contains("stroke-linecap=\"round\""));
        assert!(svg.contains("fill-rule=\"evenodd\""));
        assert!(svg.contains("xmlns:xlink=\"http://www.w3.org/1999/xlink\""));
        assert!(!svg.contains("<style"));

        let mut gdi = SvgGdi::new(false);
        gdi.set_window_ext_ex(-300, 200).unwrap();
        let svg = finish(gdi);
        assert!(svg.contains("width=\"300\""));
        assert!(svg.contains("height=\"200\""));
    }

    #[test]
    fn test_unsupported_operations() {
        let mut gdi = gdi();
        assert_eq!(gdi.flood_fill(0, 0, 0).unwrap(), Outcome::Unsupported);
        assert_eq!(gdi.escape(&[1, 2]).unwrap(), Outcome::Unsupported);
        assert_eq!(
            gdi.bit_blt(Some(&[0; 10]), 0, 0, 1, 1, 0, 0, SRCCOPY).unwrap(),
            Outcome::Unsupported
        );
        let palette = gdi.create_palette(0x300, &[0]).unwrap();
        assert_eq!(gdi.select_object(&palette).unwrap(), Outcome::Unsupported);
        assert!(gdi.document().content().is_empty());
    }
}
