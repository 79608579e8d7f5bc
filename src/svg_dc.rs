//! Device context state for the SVG backend

use crate::gdi::{
    Point, Size, ALTERNATE, MM_HIENGLISH, MM_HIMETRIC, MM_LOENGLISH, MM_LOMETRIC, MM_TEXT,
    MM_TWIPS, OPAQUE, R2_COPYPEN, STRETCH_ANDSCANS,
};
use crate::svg_style::{StyleId, SvgObject};

pub const DEFAULT_DPI: u32 = 1440;

fn axis_sign(extent: i32) -> f64 {
    if extent >= 0 {
        1.0
    } else {
        -1.0
    }
}

/// Drawing state saved and restored by SaveDC/RestoreDC.
#[derive(Debug, Clone)]
pub struct SvgDc {
    dpi: u32,

    // window
    wx: i32,
    wy: i32,
    ww: i32,
    wh: i32,
    wox: i32,
    woy: i32,
    wsx: f64,
    wsy: f64,
    mx: f64,
    my: f64,

    // viewport, tracked only
    vx: i32,
    vy: i32,
    vw: i32,
    vh: i32,

    // current position
    cx: i32,
    cy: i32,

    map_mode: i16,
    mapper_flags: u32,
    pub bk_color: u32,
    pub bk_mode: i16,
    pub text_color: u32,
    pub text_space: i32,
    pub text_align: u16,
    pub text_char_extra: i32,
    pub poly_fill_mode: i16,
    pub rel_abs_mode: i16,
    pub rop2: i16,
    pub stretch_blt_mode: i16,

    pub brush: SvgObject,
    pub pen: StyleId,
    pub font: Option<StyleId>,
    /// Mask id applied to content drawn under the current clip.
    pub mask: Option<String>,
}

impl SvgDc {
    pub fn new(brush: SvgObject, pen: StyleId) -> Self {
        Self {
            dpi: DEFAULT_DPI,
            wx: 0,
            wy: 0,
            ww: 0,
            wh: 0,
            wox: 0,
            woy: 0,
            wsx: 1.0,
            wsy: 1.0,
            mx: 1.0,
            my: 1.0,
            vx: 0,
            vy: 0,
            vw: 0,
            vh: 0,
            cx: 0,
            cy: 0,
            map_mode: MM_TEXT,
            mapper_flags: 0,
            bk_color: 0x00FF_FFFF,
            bk_mode: OPAQUE,
            text_color: 0,
            text_space: 0,
            text_align: 0,
            text_char_extra: 0,
            poly_fill_mode: ALTERNATE,
            rel_abs_mode: 0,
            rop2: R2_COPYPEN,
            stretch_blt_mode: STRETCH_ANDSCANS,
            brush,
            pen,
            font: None,
            mask: None,
        }
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Non-positive values fall back to the default resolution.
    pub fn set_dpi(&mut self, dpi: i64) {
        self.dpi = if dpi > 0 { dpi as u32 } else { DEFAULT_DPI };
    }

    pub fn window_width(&self) -> i32 {
        self.ww
    }

    pub fn window_height(&self) -> i32 {
        self.wh
    }

    pub fn set_window_org(&mut self, x: i32, y: i32) -> Point {
        let old = Point::new(self.wx, self.wy);
        self.wx = x;
        self.wy = y;
        old
    }

    pub fn set_window_ext(&mut self, width: i32, height: i32) -> Size {
        let old = Size::new(self.ww, self.wh);
        self.ww = width;
        self.wh = height;
        old
    }

    pub fn offset_window_org(&mut self, x: i32, y: i32) -> Point {
        let old = Point::new(self.wox, self.woy);
        self.wox = self.wox.saturating_add(x);
        self.woy = self.woy.saturating_add(y);
        old
    }

    /// A zero numerator or divisor leaves the corresponding axis unchanged.
    pub fn scale_window_ext(&mut self, x: i32, xd: i32, y: i32, yd: i32) {
        if x != 0 && xd != 0 {
            self.wsx = self.wsx * x as f64 / xd as f64;
        }
        if y != 0 && yd != 0 {
            self.wsy = self.wsy * y as f64 / yd as f64;
        }
    }

    pub fn set_viewport_org(&mut self, x: i32, y: i32) -> Point {
        let old = Point::new(self.vx, self.vy);
        self.vx = x;
        self.vy = y;
        old
    }

    pub fn set_viewport_ext(&mut self, width: i32, height: i32) -> Size {
        let old = Size::new(self.vw, self.vh);
        self.vw = width;
        self.vh = height;
        old
    }

    pub fn offset_viewport_org(&mut self, x: i32, y: i32) -> Point {
        let old = Point::new(self.vx, self.vy);
        self.vx = self.vx.saturating_add(x);
        self.vy = self.vy.saturating_add(y);
        old
    }

    pub fn scale_viewport_ext(&mut self, x: i32, xd: i32, y: i32, yd: i32) {
        if xd != 0 {
            self.vw = (self.vw as i64 * x as i64 / xd as i64) as i32;
        }
        if yd != 0 {
            self.vh = (self.vh as i64 * y as i64 / yd as i64) as i32;
        }
    }

    pub fn map_mode(&self) -> i16 {
        self.map_mode
    }

    pub fn set_map_mode(&mut self, mode: i16) {
        self.map_mode = mode;
        let (mx, my) = match mode {
            MM_HIENGLISH => (0.09, -0.09),
            MM_LOENGLISH => (0.9, -0.9),
            MM_HIMETRIC => (0.035_433_07, -0.035_433_07),
            MM_LOMETRIC => (0.354_330_7, -0.354_330_7),
            MM_TWIPS => (0.0625, -0.0625),
            _ => (1.0, 1.0),
        };
        self.mx = mx;
        self.my = my;
    }

    pub fn mapper_flags(&self) -> u32 {
        self.mapper_flags
    }

    pub fn set_mapper_flags(&mut self, flags: u32) {
        self.mapper_flags = flags;
    }

    pub fn current_position(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    pub fn move_to(&mut self, x: i32, y: i32) -> Point {
        let old = Point::new(self.cx, self.cy);
        self.cx = x;
        self.cy = y;
        old
    }

    // Sign and truncation are applied in f64; the final cast saturates.
    pub fn to_absolute_x(&self, x: i32) -> i32 {
        let origin = self.wx as f64 + self.wox as f64;
        (axis_sign(self.ww) * ((self.mx * x as f64 - origin) / self.wsx).trunc()) as i32
    }

    pub fn to_absolute_y(&self, y: i32) -> i32 {
        let origin = self.wy as f64 + self.woy as f64;
        (axis_sign(self.wh) * ((self.my * y as f64 - origin) / self.wsy).trunc()) as i32
    }

    pub fn to_relative_x(&self, x: i32) -> i32 {
        (axis_sign(self.ww) * (self.mx * x as f64 / self.wsx).trunc()) as i32
    }

    pub fn to_relative_y(&self, y: i32) -> i32 {
        (axis_sign(self.wh) * (self.my * y as f64 / self.wsy).trunc()) as i32
    }

    /// Converts a length given in 1/90 inch to output units.
    pub fn to_real_size(&self, px: i32) -> i32 {
        (self.dpi as i64 * px as i64 / 90) as i32
    }
}
