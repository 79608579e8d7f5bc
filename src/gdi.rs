//! GDI operation set shared by the WMF parser and its backends
//!
//! The parser decodes each record into exactly one call on a [`Gdi`]
//! implementation. Backends: the SVG interpreter (`SvgGdi`), the call tracer
//! (`TracingGdi`) and the record writer (`WmfWriter`).

use crate::error::ConvertResult;
use std::fmt;

// Background modes
pub const TRANSPARENT: i16 = 1;
pub const OPAQUE: i16 = 2;

// Mapping modes
pub const MM_TEXT: i16 = 1;
pub const MM_LOMETRIC: i16 = 2;
pub const MM_HIMETRIC: i16 = 3;
pub const MM_LOENGLISH: i16 = 4;
pub const MM_HIENGLISH: i16 = 5;
pub const MM_TWIPS: i16 = 6;
pub const MM_ISOTROPIC: i16 = 7;
pub const MM_ANISOTROPIC: i16 = 8;

// Poly-fill modes
pub const ALTERNATE: i16 = 1;
pub const WINDING: i16 = 2;

// Binary raster operations (ROP2)
pub const R2_BLACK: i16 = 1;
pub const R2_COPYPEN: i16 = 13;
pub const R2_WHITE: i16 = 16;

// Stretch modes
pub const STRETCH_ANDSCANS: i16 = 1;
pub const STRETCH_ORSCANS: i16 = 2;
pub const STRETCH_DELETESCANS: i16 = 3;
pub const STRETCH_HALFTONE: i16 = 4;

// Text alignment
pub const TA_NOUPDATECP: u16 = 0x0000;
pub const TA_UPDATECP: u16 = 0x0001;
pub const TA_LEFT: u16 = 0x0000;
pub const TA_RIGHT: u16 = 0x0002;
pub const TA_CENTER: u16 = 0x0006;
pub const TA_TOP: u16 = 0x0000;
pub const TA_BOTTOM: u16 = 0x0008;
pub const TA_BASELINE: u16 = 0x0018;
pub const TA_RTLREADING: u16 = 0x0100;

// ExtTextOut options
pub const ETO_OPAQUE: u16 = 0x0002;
pub const ETO_CLIPPED: u16 = 0x0004;

// Ternary raster operations
pub const SRCCOPY: u32 = 0x00CC0020;
pub const SRCPAINT: u32 = 0x00EE0086;
pub const SRCAND: u32 = 0x008800C6;
pub const SRCINVERT: u32 = 0x00660046;
pub const SRCERASE: u32 = 0x00440328;
pub const NOTSRCCOPY: u32 = 0x00330008;
pub const NOTSRCERASE: u32 = 0x001100A6;
pub const MERGECOPY: u32 = 0x00C000CA;
pub const MERGEPAINT: u32 = 0x00BB0226;
pub const PATCOPY: u32 = 0x00F00021;
pub const PATPAINT: u32 = 0x00FB0A09;
pub const PATINVERT: u32 = 0x005A0049;
pub const DSTINVERT: u32 = 0x00550009;
pub const BLACKNESS: u32 = 0x00000042;
pub const WHITENESS: u32 = 0x00FF0062;

// Brush styles
pub const BS_SOLID: u16 = 0;
pub const BS_NULL: u16 = 1;
pub const BS_HATCHED: u16 = 2;
pub const BS_PATTERN: u16 = 3;
pub const BS_DIBPATTERN: u16 = 5;

// Hatch styles
pub const HS_HORIZONTAL: u16 = 0;
pub const HS_VERTICAL: u16 = 1;
pub const HS_FDIAGONAL: u16 = 2;
pub const HS_BDIAGONAL: u16 = 3;
pub const HS_CROSS: u16 = 4;
pub const HS_DIAGCROSS: u16 = 5;

// Pen styles
pub const PS_SOLID: u16 = 0;
pub const PS_DASH: u16 = 1;
pub const PS_DOT: u16 = 2;
pub const PS_DASHDOT: u16 = 3;
pub const PS_DASHDOTDOT: u16 = 4;
pub const PS_NULL: u16 = 5;
pub const PS_INSIDEFRAME: u16 = 6;
pub const PS_STYLE_MASK: u16 = 0x000F;

// Font weights
pub const FW_DONTCARE: i32 = 0;
pub const FW_NORMAL: i32 = 400;
pub const FW_BOLD: i32 = 700;

// Pitch and family
pub const DEFAULT_PITCH: u8 = 0x00;
pub const FIXED_PITCH: u8 = 0x01;
pub const VARIABLE_PITCH: u8 = 0x02;
pub const FF_DONTCARE: u8 = 0x00;
pub const FF_ROMAN: u8 = 0x10;
pub const FF_SWISS: u8 = 0x20;
pub const FF_MODERN: u8 = 0x30;
pub const FF_SCRIPT: u8 = 0x40;
pub const FF_DECORATIVE: u8 = 0x50;

// DIB color usage
pub const DIB_RGB_COLORS: u16 = 0;
pub const DIB_PAL_COLORS: u16 = 1;

/// Logical point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Logical extent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Logical rectangle as stored in records (left, top, right, bottom)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Font description carried by CREATEFONTINDIRECT
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LogFont {
    pub height: i32,
    pub width: i32,
    pub escapement: i32,
    pub orientation: i32,
    pub weight: i32,
    pub italic: bool,
    pub underline: bool,
    pub strikeout: bool,
    pub charset: u8,
    pub out_precision: u8,
    pub clip_precision: u8,
    pub quality: u8,
    pub pitch_and_family: u8,
    /// Face name bytes as stored, NUL padding included
    pub face_name: Vec<u8>,
}

/// How a backend dealt with an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    /// Recognized but not rendered; the conversion continues.
    Unsupported,
}

pub type GdiResult = ConvertResult<Outcome>;

/// The drawing operation set of a Windows metafile.
///
/// Coordinates are logical units, already widened from the record's 16-bit
/// fields. Object-creating calls return a backend-specific handle that the
/// parser stores in its object table and hands back on select/delete.
pub trait Gdi {
    type Object: Clone + fmt::Debug;

    fn placeable_header(&mut self, vsx: i32, vsy: i32, vex: i32, vey: i32, dpi: u32) -> GdiResult;
    fn header(&mut self) -> GdiResult;

    fn animate_palette(&mut self, start: u16, entries: &[u32]) -> GdiResult;
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
    ) -> GdiResult;
    #[allow(clippy::too_many_arguments)]
    fn bit_blt(
        &mut self,
        image: Option<&[u8]>,
        dx: i32,
        dy: i32,
        dw: i32,
        dh: i32,
        sx: i32,
        sy: i32,
        rop: u32,
    ) -> GdiResult;
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
    ) -> GdiResult;

    fn create_brush_indirect(
        &mut self,
        style: u16,
        color: u32,
        hatch: u16,
    ) -> ConvertResult<Self::Object>;
    fn create_font_indirect(&mut self, font: &LogFont) -> ConvertResult<Self::Object>;
    fn create_palette(&mut self, version: u16, entries: &[u32]) -> ConvertResult<Self::Object>;
    fn create_pattern_brush(&mut self, image: &[u8]) -> ConvertResult<Self::Object>;
    fn create_pen_indirect(
        &mut self,
        style: u16,
        width: i32,
        color: u32,
    ) -> ConvertResult<Self::Object>;
    fn create_rect_rgn(
        &mut self,
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    ) -> ConvertResult<Self::Object>;
    fn delete_object(&mut self, obj: &Self::Object) -> GdiResult;

    #[allow(clippy::too_many_arguments)]
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
    ) -> GdiResult;
    fn dib_create_pattern_brush(&mut self, image: &[u8], usage: u16) -> ConvertResult<Self::Object>;
    #[allow(clippy::too_many_arguments)]
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
    ) -> GdiResult;

    fn ellipse(&mut self, sx: i32, sy: i32, ex: i32, ey: i32) -> GdiResult;
    fn escape(&mut self, data: &[u8]) -> GdiResult;
    fn exclude_clip_rect(&mut self, left: i32, top: i32, right: i32, bottom: i32) -> GdiResult;
    fn ext_flood_fill(&mut self, x: i32, y: i32, color: u32, fill_type: u16) -> GdiResult;
    fn ext_text_out(
        &mut self,
        x: i32,
        y: i32,
        options: u16,
        rect: Option<Rect>,
        text: &[u8],
        dx: &[i32],
    ) -> GdiResult;
    fn fill_rgn(&mut self, rgn: &Self::Object, brush: &Self::Object) -> GdiResult;
    fn flood_fill(&mut self, x: i32, y: i32, color: u32) -> GdiResult;
    fn frame_rgn(
        &mut self,
        rgn: &Self::Object,
        brush: &Self::Object,
        width: i32,
        height: i32,
    ) -> GdiResult;
    fn intersect_clip_rect(&mut self, left: i32, top: i32, right: i32, bottom: i32) -> GdiResult;
    fn invert_rgn(&mut self, rgn: &Self::Object) -> GdiResult;
    fn line_to(&mut self, ex: i32, ey: i32) -> GdiResult;
    fn move_to_ex(&mut self, x: i32, y: i32) -> GdiResult;
    fn offset_clip_rgn(&mut self, x: i32, y: i32) -> GdiResult;
    fn offset_viewport_org_ex(&mut self, x: i32, y: i32) -> GdiResult;
    fn offset_window_org_ex(&mut self, x: i32, y: i32) -> GdiResult;
    fn paint_rgn(&mut self, rgn: &Self::Object) -> GdiResult;
    fn pat_blt(&mut self, x: i32, y: i32, width: i32, height: i32, rop: u32) -> GdiResult;
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
    ) -> GdiResult;
    fn polygon(&mut self, points: &[Point]) -> GdiResult;
    fn polyline(&mut self, points: &[Point]) -> GdiResult;
    fn poly_polygon(&mut self, polygons: &[Vec<Point>]) -> GdiResult;
    fn realize_palette(&mut self) -> GdiResult;
    fn restore_dc(&mut self, saved_dc: i32) -> GdiResult;
    fn rectangle(&mut self, sx: i32, sy: i32, ex: i32, ey: i32) -> GdiResult;
    fn resize_palette(&mut self, entries: u16) -> GdiResult;
    fn round_rect(&mut self, sx: i32, sy: i32, ex: i32, ey: i32, rw: i32, rh: i32) -> GdiResult;
    fn save_dc(&mut self) -> GdiResult;
    fn scale_viewport_ext_ex(&mut self, x: i32, xd: i32, y: i32, yd: i32) -> GdiResult;
    fn scale_window_ext_ex(&mut self, x: i32, xd: i32, y: i32, yd: i32) -> GdiResult;
    /// `None` removes the clip region.
    fn select_clip_rgn(&mut self, rgn: Option<&Self::Object>) -> GdiResult;
    fn select_object(&mut self, obj: &Self::Object) -> GdiResult;
    fn select_palette(&mut self, palette: &Self::Object, background: bool) -> GdiResult;
    fn set_bk_color(&mut self, color: u32) -> GdiResult;
    fn set_bk_mode(&mut self, mode: i16) -> GdiResult;
    #[allow(clippy::too_many_arguments)]
    fn set_dibits_to_device(
        &mut self,
        dx: i32,
        dy: i32,
        dw: i32,
        dh: i32,
        sx: i32,
        sy: i32,
        start_scan: u16,
        scan_lines: u16,
        image: &[u8],
        color_use: u16,
    ) -> GdiResult;
    fn set_map_mode(&mut self, mode: i16) -> GdiResult;
    fn set_mapper_flags(&mut self, flags: u32) -> GdiResult;
    fn set_palette_entries(&mut self, start: u16, entries: &[u32]) -> GdiResult;
    fn set_pixel(&mut self, x: i32, y: i32, color: u32) -> GdiResult;
    fn set_poly_fill_mode(&mut self, mode: i16) -> GdiResult;
    fn set_rel_abs(&mut self, mode: i16) -> GdiResult;
    fn set_rop2(&mut self, mode: i16) -> GdiResult;
    fn set_stretch_blt_mode(&mut self, mode: i16) -> GdiResult;
    fn set_text_align(&mut self, align: u16) -> GdiResult;
    fn set_text_character_extra(&mut self, extra: i32) -> GdiResult;
    fn set_text_color(&mut self, color: u32) -> GdiResult;
    fn set_text_justification(&mut self, break_extra: i32, break_count: i32) -> GdiResult;
    fn set_viewport_ext_ex(&mut self, x: i32, y: i32) -> GdiResult;
    fn set_viewport_org_ex(&mut self, x: i32, y: i32) -> GdiResult;
    fn set_window_ext_ex(&mut self, width: i32, height: i32) -> GdiResult;
    fn set_window_org_ex(&mut self, x: i32, y: i32) -> GdiResult;
    #[allow(clippy::too_many_arguments)]
    fn stretch_blt(
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
    ) -> GdiResult;
    #[allow(clippy::too_many_arguments)]
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
        usage: u16,
        rop: u32,
    ) -> GdiResult;
    fn text_out(&mut self, x: i32, y: i32, text: &[u8]) -> GdiResult;

    fn footer(&mut self) -> GdiResult;
}
