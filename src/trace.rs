//! Call tracing for any GDI backend

use crate::error::ConvertResult;
use crate::gdi::{Gdi, GdiResult, LogFont, Point, Rect};
use log::debug;

/// Wraps a backend and logs every call at debug level before forwarding it.
pub struct TracingGdi<G> {
    inner: G,
}

impl<G: Gdi> TracingGdi<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    pub fn into_inner(self) -> G {
        self.inner
    }
}

fn bytes_summary(data: &[u8]) -> String {
    format!("[{} bytes]", data.len())
}

impl<G: Gdi> Gdi for TracingGdi<G> {
    type Object = G::Object;

    fn placeable_header(&mut self, vsx: i32, vsy: i32, vex: i32, vey: i32, dpi: u32) -> GdiResult {
        debug!("placeable_header({}, {}, {}, {}, {})", vsx, vsy, vex, vey, dpi);
        self.inner.placeable_header(vsx, vsy, vex, vey, dpi)
    }

    fn header(&mut self) -> GdiResult {
        debug!("header()");
        self.inner.header()
    }

    fn animate_palette(&mut self, start: u16, entries: &[u32]) -> GdiResult {
        debug!("animate_palette({}, {:?})", start, entries);
        self.inner.animate_palette(start, entries)
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
        debug!("arc({}, {}, {}, {}, {}, {}, {}, {})", sxr, syr, exr, eyr, sxa, sya, exa, eya);
        self.inner.arc(sxr, syr, exr, eyr, sxa, sya, exa, eya)
    }

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
    ) -> GdiResult {
        debug!(
            "bit_blt({:?}, {}, {}, {}, {}, {}, {}, 0x{:08X})",
            image.map(bytes_summary), dx, dy, dw, dh, sx, sy, rop
        );
        self.inner.bit_blt(image, dx, dy, dw, dh, sx, sy, rop)
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
        debug!("chord({}, {}, {}, {}, {}, {}, {}, {})", sxr, syr, exr, eyr, sxa, sya, exa, eya);
        self.inner.chord(sxr, syr, exr, eyr, sxa, sya, exa, eya)
    }

    fn create_brush_indirect(
        &mut self,
        style: u16,
        color: u32,
        hatch: u16,
    ) -> ConvertResult<Self::Object> {
        debug!("create_brush_indirect({}, 0x{:06X}, {})", style, color, hatch);
        self.inner.create_brush_indirect(style, color, hatch)
    }

    fn create_font_indirect(&mut self, font: &LogFont) -> ConvertResult<Self::Object> {
        debug!("create_font_indirect({:?})", font);
        self.inner.create_font_indirect(font)
    }

    fn create_palette(&mut self, version: u16, entries: &[u32]) -> ConvertResult<Self::Object> {
        debug!("create_palette(0x{:04X}, {} entries)", version, entries.len());
        self.inner.create_palette(version, entries)
    }

    fn create_pattern_brush(&mut self, image: &[u8]) -> ConvertResult<Self::Object> {
        debug!("create_pattern_brush({})", bytes_summary(image));
        self.inner.create_pattern_brush(image)
    }

    fn create_pen_indirect(
        &mut self,
        style: u16,
        width: i32,
        color: u32,
    ) -> ConvertResult<Self::Object> {
        debug!("create_pen_indirect({}, {}, 0x{:06X})", style, width, color);
        self.inner.create_pen_indirect(style, width, color)
    }

    fn create_rect_rgn(
        &mut self,
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    ) -> ConvertResult<Self::Object> {
        debug!("create_rect_rgn({}, {}, {}, {})", left, top, right, bottom);
        self.inner.create_rect_rgn(left, top, right, bottom)
    }

    fn delete_object(&mut self, obj: &Self::Object) -> GdiResult {
        debug!("delete_object({:?})", obj);
        self.inner.delete_object(obj)
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
        debug!(
            "dib_bit_blt({:?}, {}, {}, {}, {}, {}, {}, 0x{:08X})",
            image.map(bytes_summary), dx, dy, dw, dh, sx, sy, rop
        );
        self.inner.dib_bit_blt(image, dx, dy, dw, dh, sx, sy, rop)
    }

    fn dib_create_pattern_brush(
        &mut self,
        image: &[u8],
        usage: u16,
    ) -> ConvertResult<Self::Object> {
        debug!("dib_create_pattern_brush({}, {})", bytes_summary(image), usage);
        self.inner.dib_create_pattern_brush(image, usage)
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
        debug!(
            "dib_stretch_blt({:?}, {}, {}, {}, {}, {}, {}, {}, {}, 0x{:08X})",
            image.map(bytes_summary), dx, dy, dw, dh, sx, sy, sw, sh, rop
        );
        self.inner.dib_stretch_blt(image, dx, dy, dw, dh, sx, sy, sw, sh, rop)
    }

    fn ellipse(&mut self, sx: i32, sy: i32, ex: i32, ey: i32) -> GdiResult {
        debug!("ellipse({}, {}, {}, {})", sx, sy, ex, ey);
        self.inner.ellipse(sx, sy, ex, ey)
    }

    fn escape(&mut self, data: &[u8]) -> GdiResult {
        debug!("escape({})", bytes_summary(data));
        self.inner.escape(data)
    }

    fn exclude_clip_rect(&mut self, left: i32, top: i32, right: i32, bottom: i32) -> GdiResult {
        debug!("exclude_clip_rect({}, {}, {}, {})", left, top, right, bottom);
        self.inner.exclude_clip_rect(left, top, right, bottom)
    }

    fn ext_flood_fill(&mut self, x: i32, y: i32, color: u32, fill_type: u16) -> GdiResult {
        debug!("ext_flood_fill({}, {}, 0x{:06X}, {})", x, y, color, fill_type);
        self.inner.ext_flood_fill(x, y, color, fill_type)
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
        debug!(
            "ext_text_out({}, {}, 0x{:04X}, {:?}, {}, {:?})",
            x, y, options, rect, bytes_summary(text), dx
        );
        self.inner.ext_text_out(x, y, options, rect, text, dx)
    }

    fn fill_rgn(&mut self, rgn: &Self::Object, brush: &Self::Object) -> GdiResult {
        debug!("fill_rgn({:?}, {:?})", rgn, brush);
        self.inner.fill_rgn(rgn, brush)
    }

    fn flood_fill(&mut self, x: i32, y: i32, color: u32) -> GdiResult {
        debug!("flood_fill({}, {}, 0x{:06X})", x, y, color);
        self.inner.flood_fill(x, y, color)
    }

    fn frame_rgn(
        &mut self,
        rgn: &Self::Object,
        brush: &Self::Object,
        width: i32,
        height: i32,
    ) -> GdiResult {
        debug!("frame_rgn({:?}, {:?}, {}, {})", rgn, brush, width, height);
        self.inner.frame_rgn(rgn, brush, width, height)
    }

    fn intersect_clip_rect(&mut self, left: i32, top: i32, right: i32, bottom: i32) -> GdiResult {
        debug!("intersect_clip_rect({}, {}, {}, {})", left, top, right, bottom);
        self.inner.intersect_clip_rect(left, top, right, bottom)
    }

    fn invert_rgn(&mut self, rgn: &Self::Object) -> GdiResult {
        debug!("invert_rgn({:?})", rgn);
        self.inner.invert_rgn(rgn)
    }

    fn line_to(&mut self, ex: i32, ey: i32) -> GdiResult {
        debug!("line_to({}, {})", ex, ey);
        self.inner.line_to(ex, ey)
    }

    fn move_to_ex(&mut self, x: i32, y: i32) -> GdiResult {
        debug!("move_to_ex({}, {})", x, y);
        self.inner.move_to_ex(x, y)
    }

    fn offset_clip_rgn(&mut self, x: i32, y: i32) -> GdiResult {
        debug!("offset_clip_rgn({}, {})", x, y);
        self.inner.offset_clip_rgn(x, y)
    }

    fn offset_viewport_org_ex(&mut self, x: i32, y: i32) -> GdiResult {
        debug!("offset_viewport_org_ex({}, {})", x, y);
        self.inner.offset_viewport_org_ex(x, y)
    }

    fn offset_window_org_ex(&mut self, x: i32, y: i32) -> GdiResult {
        debug!("offset_window_org_ex({}, {})", x, y);
        self.inner.offset_window_org_ex(x, y)
    }

    fn paint_rgn(&mut self, rgn: &Self::Object) -> GdiResult {
        debug!("paint_rgn({:?})", rgn);
        self.inner.paint_rgn(rgn)
    }

    fn pat_blt(&mut self, x: i32, y: i32, width: i32, height: i32, rop: u32) -> GdiResult {
        debug!("pat_blt({}, {}, {}, {}, 0x{:08X})", x, y, width, height, rop);
        self.inner.pat_blt(x, y, width, height, rop)
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
        debug!("pie({}, {}, {}, {}, {}, {}, {}, {})", sxr, syr, exr, eyr, sxa, sya, exa, eya);
        self.inner.pie(sxr, syr, exr, eyr, sxa, sya, exa, eya)
    }

    fn polygon(&mut self, points: &[Point]) -> GdiResult {
        debug!("polygon({} points)", points.len());
        self.inner.polygon(points)
    }

    fn polyline(&mut self, points: &[Point]) -> GdiResult {
        debug!("polyline({} points)", points.len());
        self.inner.polyline(points)
    }

    fn poly_polygon(&mut self, polygons: &[Vec<Point>]) -> GdiResult {
        debug!("poly_polygon({} rings)", polygons.len());
        self.inner.poly_polygon(polygons)
    }

    fn realize_palette(&mut self) -> GdiResult {
        debug!("realize_palette()");
        self.inner.realize_palette()
    }

    fn restore_dc(&mut self, saved_dc: i32) -> GdiResult {
        debug!("restore_dc({})", saved_dc);
        self.inner.restore_dc(saved_dc)
    }

    fn rectangle(&mut self, sx: i32, sy: i32, ex: i32, ey: i32) -> GdiResult {
        debug!("rectangle({}, {}, {}, {})", sx, sy, ex, ey);
        self.inner.rectangle(sx, sy, ex, ey)
    }

    fn resize_palette(&mut self, entries: u16) -> GdiResult {
        debug!("resize_palette({})", entries);
        self.inner.resize_palette(entries)
    }

    fn round_rect(&mut self, sx: i32, sy: i32, ex: i32, ey: i32, rw: i32, rh: i32) -> GdiResult {
        debug!("round_rect({}, {}, {}, {}, {}, {})", sx, sy, ex, ey, rw, rh);
        self.inner.round_rect(sx, sy, ex, ey, rw, rh)
    }

    fn save_dc(&mut self) -> GdiResult {
        debug!("save_dc()");
        self.inner.save_dc()
    }

    fn scale_viewport_ext_ex(&mut self, x: i32, xd: i32, y: i32, yd: i32) -> GdiResult {
        debug!("scale_viewport_ext_ex({}, {}, {}, {})", x, xd, y, yd);
        self.inner.scale_viewport_ext_ex(x, xd, y, yd)
    }

    fn scale_window_ext_ex(&mut self, x: i32, xd: i32, y: i32, yd: i32) -> GdiResult {
        debug!("scale_window_ext_ex({}, {}, {}, {})", x, xd, y, yd);
        self.inner.scale_window_ext_ex(x, xd, y, yd)
    }

    fn select_clip_rgn(&mut self, rgn: Option<&Self::Object>) -> GdiResult {
        debug!("select_clip_rgn({:?})", rgn);
        self.inner.select_clip_rgn(rgn)
    }

    fn select_object(&mut self, obj: &Self::Object) -> GdiResult {
        debug!("select_object({:?})", obj);
        self.inner.select_object(obj)
    }

    fn select_palette(&mut self, palette: &Self::Object, background: bool) -> GdiResult {
        debug!("select_palette({:?}, {})", palette, background);
        self.inner.select_palette(palette, background)
    }

    fn set_bk_color(&mut self, color: u32) -> GdiResult {
        debug!("set_bk_color(0x{:06X})", color);
        self.inner.set_bk_color(color)
    }

    fn set_bk_mode(&mut self, mode: i16) -> GdiResult {
        debug!("set_bk_mode({})", mode);
        self.inner.set_bk_mode(mode)
    }

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
    ) -> GdiResult {
        debug!(
            "set_dibits_to_device({}, {}, {}, {}, {}, {}, {}, {}, {}, {})",
            dx, dy, dw, dh, sx, sy, start_scan, scan_lines, bytes_summary(image), color_use
        );
        self.inner
            .set_dibits_to_device(dx, dy, dw, dh, sx, sy, start_scan, scan_lines, image, color_use)
    }

    fn set_map_mode(&mut self, mode: i16) -> GdiResult {
        debug!("set_map_mode({})", mode);
        self.inner.set_map_mode(mode)
    }

    fn set_mapper_flags(&mut self, flags: u32) -> GdiResult {
        debug!("set_mapper_flags(0x{:08X})", flags);
        self.inner.set_mapper_flags(flags)
    }

    fn set_palette_entries(&mut self, start: u16, entries: &[u32]) -> GdiResult {
        debug!("set_palette_entries({}, {:?})", start, entries);
        self.inner.set_palette_entries(start, entries)
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) -> GdiResult {
        debug!("set_pixel({}, {}, 0x{:06X})", x, y, color);
        self.inner.set_pixel(x, y, color)
    }

    fn set_poly_fill_mode(&mut self, mode: i16) -> GdiResult {
        debug!("set_poly_fill_mode({})", mode);
        self.inner.set_poly_fill_mode(mode)
    }

    fn set_rel_abs(&mut self, mode: i16) -> GdiResult {
        debug!("set_rel_abs({})", mode);
        self.inner.set_rel_abs(mode)
    }

    fn set_rop2(&mut self, mode: i16) -> GdiResult {
        debug!("set_rop2({})", mode);
        self.inner.set_rop2(mode)
    }

    fn set_stretch_blt_mode(&mut self, mode: i16) -> GdiResult {
        debug!("set_stretch_blt_mode({})", mode);
        self.inner.set_stretch_blt_mode(mode)
    }

    fn set_text_align(&mut self, align: u16) -> GdiResult {
        debug!("set_text_align(0x{:04X})", align);
        self.inner.set_text_align(align)
    }

    fn set_text_character_extra(&mut self, extra: i32) -> GdiResult {
        debug!("set_text_character_extra({})", extra);
        self.inner.set_text_character_extra(extra)
    }

    fn set_text_color(&mut self, color: u32) -> GdiResult {
        debug!("set_text_color(0x{:06X})", color);
        self.inner.set_text_color(color)
    }

    fn set_text_justification(&mut self, break_extra: i32, break_count: i32) -> GdiResult {
        debug!("set_text_justification({}, {})", break_extra, break_count);
        self.inner.set_text_justification(break_extra, break_count)
    }

    fn set_viewport_ext_ex(&mut self, x: i32, y: i32) -> GdiResult {
        debug!("set_viewport_ext_ex({}, {})", x, y);
        self.inner.set_viewport_ext_ex(x, y)
    }

    fn set_viewport_org_ex(&mut self, x: i32, y: i32) -> GdiResult {
        debug!("set_viewport_org_ex({}, {})", x, y);
        self.inner.set_viewport_org_ex(x, y)
    }

    fn set_window_ext_ex(&mut self, width: i32, height: i32) -> GdiResult {
        debug!("set_window_ext_ex({}, {})", width, height);
        self.inner.set_window_ext_ex(width, height)
    }

    fn set_window_org_ex(&mut self, x: i32, y: i32) -> GdiResult {
        debug!("set_window_org_ex({}, {})", x, y);
        self.inner.set_window_org_ex(x, y)
    }

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
    ) -> GdiResult {
        debug!(
            "stretch_blt({:?}, {}, {}, {}, {}, {}, {}, {}, {}, 0x{:08X})",
            image.map(bytes_summary), dx, dy, dw, dh, sx, sy, sw, sh, rop
        );
        self.inner.stretch_blt(image, dx, dy, dw, dh, sx, sy, sw, sh, rop)
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
        usage: u16,
        rop: u32,
    ) -> GdiResult {
        debug!(
            "stretch_dibits({}, {}, {}, {}, {}, {}, {}, {}, {}, {}, 0x{:08X})",
            dx, dy, dw, dh, sx, sy, sw, sh, bytes_summary(image), usage, rop
        );
        self.inner.stretch_dibits(dx, dy, dw, dh, sx, sy, sw, sh, image, usage, rop)
    }

    fn text_out(&mut self, x: i32, y: i32, text: &[u8]) -> GdiResult {
        debug!("text_out({}, {}, {})", x, y, bytes_summary(text));
        self.inner.text_out(x, y, text)
    }

    fn footer(&mut self) -> GdiResult {
        debug!("footer()");
        self.inner.footer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdi::{BS_SOLID, OPAQUE};
    use crate::wmf_writer::WmfWriter;

    #[test]
    fn test_forwards_calls_unchanged() {
        let mut direct = WmfWriter::new();
        direct.header().unwrap();
        let brush = direct.create_brush_indirect(BS_SOLID, 0x112233, 0).unwrap();
        direct.select_object(&brush).unwrap();
        direct.set_bk_mode(OPAQUE).unwrap();
        direct.rectangle(0, 0, 10, 10).unwrap();
        direct.footer().unwrap();

        let mut traced = TracingGdi::new(WmfWriter::new());
        traced.header().unwrap();
        let brush = traced.create_brush_indirect(BS_SOLID, 0x112233, 0).unwrap();
        traced.select_object(&brush).unwrap();
        traced.set_bk_mode(OPAQUE).unwrap();
        traced.rectangle(0, 0, 10, 10).unwrap();
        traced.footer().unwrap();

        assert_eq!(direct.into_bytes(), traced.into_inner().into_bytes());
    }
}
