//! WMF record writer
//!
//! A [`Gdi`] backend that serializes every call back into WMF records. The
//! object table mirrors the parser's first-empty-slot allocation, so a
//! stream written here parses back into the same call sequence.

use crate::error::ConvertResult;
use crate::gdi::*;
use crate::wmf::PLACEABLE_KEY;
use crate::wmf_records::*;
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

/// Object table index handed out by [`WmfWriter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WmfHandle(pub u16);

#[derive(Default)]
struct Params(Vec<u8>);

impl Params {
    fn i16(&mut self, value: i32) -> ConvertResult<&mut Self> {
        self.0.write_i16::<LittleEndian>(value as i16)?;
        Ok(self)
    }

    fn u16(&mut self, value: u16) -> ConvertResult<&mut Self> {
        self.0.write_u16::<LittleEndian>(value)?;
        Ok(self)
    }

    fn u32(&mut self, value: u32) -> ConvertResult<&mut Self> {
        self.0.write_u32::<LittleEndian>(value)?;
        Ok(self)
    }

    fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.0.extend_from_slice(data);
        self
    }

    fn shorts(values: &[i32]) -> ConvertResult<Self> {
        let mut params = Params::default();
        for value in values {
            params.i16(*value)?;
        }
        Ok(params)
    }
}

#[derive(Debug, Clone, Copy)]
struct Placeable {
    vsx: i32,
    vsy: i32,
    vex: i32,
    vey: i32,
    dpi: u32,
}

/// Serializes GDI calls into a WMF byte stream.
#[derive(Default)]
pub struct WmfWriter {
    placeable: Option<Placeable>,
    records: Vec<u8>,
    max_record: u32,
    slots: Vec<bool>,
    terminated: bool,
}

impl WmfWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_record(&mut self, opcode: u16, params: &[u8]) -> GdiResult {
        let words = 3 + (params.len() + 1) / 2;
        self.records.write_u32::<LittleEndian>(words as u32)?;
        self.records.write_u16::<LittleEndian>(opcode)?;
        self.records.extend_from_slice(params);
        if params.len() % 2 == 1 {
            self.records.push(0);
        }
        self.max_record = self.max_record.max(words as u32);
        Ok(Outcome::Handled)
    }

    fn allocate(&mut self) -> WmfHandle {
        match self.slots.iter().position(|used| !used) {
            Some(index) => {
                self.slots[index] = true;
                WmfHandle(index as u16)
            }
            None => {
                self.slots.push(true);
                WmfHandle((self.slots.len() - 1) as u16)
            }
        }
    }

    fn create(&mut self, opcode: u16, params: &[u8]) -> ConvertResult<WmfHandle> {
        self.write_record(opcode, params)?;
        Ok(self.allocate())
    }

    fn handle_record(&mut self, opcode: u16, handle: &WmfHandle) -> GdiResult {
        let mut params = Params::default();
        params.u16(handle.0)?;
        self.write_record(opcode, &params.0)
    }

    fn palette_record(&mut self, opcode: u16, start: u16, entries: &[u32]) -> GdiResult {
        let mut params = Params::default();
        params.u16(start)?.u16(entries.len() as u16)?;
        for entry in entries {
            params.u32(*entry)?;
        }
        self.write_record(opcode, &params.0)
    }

    #[allow(clippy::too_many_arguments)]
    fn blt_record(
        &mut self,
        opcode: u16,
        image: Option<&[u8]>,
        dx: i32,
        dy: i32,
        dw: i32,
        dh: i32,
        sx: i32,
        sy: i32,
        source_size: Option<(i32, i32)>,
        rop: u32,
    ) -> GdiResult {
        let mut params = Params::default();
        params.u32(rop)?;
        if let Some((sw, sh)) = source_size {
            params.i16(sh)?.i16(sw)?;
        }
        params.i16(sy)?.i16(sx)?;
        if image.is_none() {
            params.u16(0)?;
        }
        params.i16(dh)?.i16(dw)?.i16(dy)?.i16(dx)?;
        if let Some(image) = image {
            params.bytes(image);
        }
        self.write_record(opcode, &params.0)
    }

    /// The complete metafile: optional placeable header, standard header,
    /// records and the terminator.
    pub fn into_bytes(mut self) -> Vec<u8> {
        if !self.terminated {
            self.records.extend_from_slice(&[3, 0, 0, 0, 0, 0]);
            self.max_record = self.max_record.max(3);
        }

        let mut out = Vec::with_capacity(22 + 18 + self.records.len());

        if let Some(p) = self.placeable {
            let mut header = [0u8; 22];
            LittleEndian::write_u32(&mut header[0..4], PLACEABLE_KEY);
            LittleEndian::write_i16(&mut header[6..8], p.vsx as i16);
            LittleEndian::write_i16(&mut header[8..10], p.vsy as i16);
            LittleEndian::write_i16(&mut header[10..12], p.vex as i16);
            LittleEndian::write_i16(&mut header[12..14], p.vey as i16);
            LittleEndian::write_u16(&mut header[14..16], p.dpi as u16);
            let checksum = header[0..20]
                .chunks(2)
                .fold(0u16, |acc, word| acc ^ LittleEndian::read_u16(word));
            LittleEndian::write_u16(&mut header[20..22], checksum);
            out.extend_from_slice(&header);
        }

        let mut header = [0u8; 18];
        LittleEndian::write_u16(&mut header[0..2], 1);
        LittleEndian::write_u16(&mut header[2..4], 9);
        LittleEndian::write_u16(&mut header[4..6], 0x0300);
        LittleEndian::write_u32(&mut header[6..10], ((18 + self.records.len()) / 2) as u32);
        LittleEndian::write_u16(&mut header[10..12], self.slots.len() as u16);
        LittleEndian::write_u32(&mut header[12..16], self.max_record);
        out.extend_from_slice(&header);

        out.extend_from_slice(&self.records);
        out
    }
}

impl Gdi for WmfWriter {
    type Object = WmfHandle;

    fn placeable_header(&mut self, vsx: i32, vsy: i32, vex: i32, vey: i32, dpi: u32) -> GdiResult {
        self.placeable = Some(Placeable {
            vsx,
            vsy,
            vex,
            vey,
            dpi,
        });
        Ok(Outcome::Handled)
    }

    fn header(&mut self) -> GdiResult {
        Ok(Outcome::Handled)
    }

    fn animate_palette(&mut self, start: u16, entries: &[u32]) -> GdiResult {
        self.palette_record(META_ANIMATEPALETTE, start, entries)
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
        let params = Params::shorts(&[eya, exa, sya, sxa, eyr, exr, syr, sxr])?;
        self.write_record(META_ARC, &params.0)
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
        self.blt_record(META_BITBLT, image, dx, dy, dw, dh, sx, sy, None, rop)
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
        let params = Params::shorts(&[eya, exa, sya, sxa, eyr, exr, syr, sxr])?;
        self.write_record(META_CHORD, &params.0)
    }

    fn create_brush_indirect(
        &mut self,
        style: u16,
        color: u32,
        hatch: u16,
    ) -> ConvertResult<WmfHandle> {
        let mut params = Params::default();
        params.u16(style)?.u32(color)?.u16(hatch)?;
        self.create(META_CREATEBRUSHINDIRECT, &params.0)
    }

    fn create_font_indirect(&mut self, font: &LogFont) -> ConvertResult<WmfHandle> {
        let mut params = Params::shorts(&[
            font.height,
            font.width,
            font.escapement,
            font.orientation,
            font.weight,
        ])?;
        params.bytes(&[
            font.italic as u8,
            font.underline as u8,
            font.strikeout as u8,
            font.charset,
            font.out_precision,
            font.clip_precision,
            font.quality,
            font.pitch_and_family,
        ]);
        params.bytes(&font.face_name);
        self.create(META_CREATEFONTINDIRECT, &params.0)
    }

    fn create_palette(&mut self, version: u16, entries: &[u32]) -> ConvertResult<WmfHandle> {
        self.palette_record(META_CREATEPALETTE, version, entries)?;
        Ok(self.allocate())
    }

    fn create_pattern_brush(&mut self, image: &[u8]) -> ConvertResult<WmfHandle> {
        self.create(META_CREATEPATTERNBRUSH, image)
    }

    fn create_pen_indirect(
        &mut self,
        style: u16,
        width: i32,
        color: u32,
    ) -> ConvertResult<WmfHandle> {
        let mut params = Params::default();
        params.u16(style)?.i16(width)?.i16(0)?.u32(color)?;
        self.create(META_CREATEPENINDIRECT, &params.0)
    }

    fn create_rect_rgn(
        &mut self,
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    ) -> ConvertResult<WmfHandle> {
        let params = Params::shorts(&[bottom, right, top, left])?;
        self.create(META_CREATERECTRGN, &params.0)
    }

    fn delete_object(&mut self, obj: &WmfHandle) -> GdiResult {
        if let Some(slot) = self.slots.get_mut(obj.0 as usize) {
            *slot = false;
        }
        self.handle_record(META_DELETEOBJECT, obj)
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
        self.blt_record(META_DIBBITBLT, image, dx, dy, dw, dh, sx, sy, None, rop)
    }

    fn dib_create_pattern_brush(&mut self, image: &[u8], usage: u16) -> ConvertResult<WmfHandle> {
        let mut params = Params::default();
        params.u16(BS_DIBPATTERN)?.u16(usage)?.bytes(image);
        self.create(META_DIBCREATEPATTERNBRUSH, &params.0)
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
        self.blt_record(META_DIBSTRETCHBLT, image, dx, dy, dw, dh, sx, sy, Some((sw, sh)), rop)
    }

    fn ellipse(&mut self, sx: i32, sy: i32, ex: i32, ey: i32) -> GdiResult {
        let params = Params::shorts(&[ey, ex, sy, sx])?;
        self.write_record(META_ELLIPSE, &params.0)
    }

    fn escape(&mut self, data: &[u8]) -> GdiResult {
        self.write_record(META_ESCAPE, data)
    }

    fn exclude_clip_rect(&mut self, left: i32, top: i32, right: i32, bottom: i32) -> GdiResult {
        let params = Params::shorts(&[bottom, right, top, left])?;
        self.write_record(META_EXCLUDECLIPRECT, &params.0)
    }

    fn ext_flood_fill(&mut self, x: i32, y: i32, color: u32, fill_type: u16) -> GdiResult {
        let mut params = Params::default();
        params.u16(fill_type)?.u32(color)?.i16(y)?.i16(x)?;
        self.write_record(META_EXTFLOODFILL, &params.0)
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
        let mut params = Params::default();
        params.i16(y)?.i16(x)?.i16(text.len() as i32)?.u16(options)?;
        if let Some(rect) = rect {
            params.i16(rect.left)?.i16(rect.top)?.i16(rect.right)?.i16(rect.bottom)?;
        }
        params.bytes(text);
        if text.len() % 2 == 1 {
            params.bytes(&[0]);
        }
        for advance in dx {
            params.i16(*advance)?;
        }
        self.write_record(META_EXTTEXTOUT, &params.0)
    }

    fn fill_rgn(&mut self, rgn: &WmfHandle, brush: &WmfHandle) -> GdiResult {
        let mut params = Params::default();
        params.u16(brush.0)?.u16(rgn.0)?;
        self.write_record(META_FILLREGION, &params.0)
    }

    fn flood_fill(&mut self, x: i32, y: i32, color: u32) -> GdiResult {
        let mut params = Params::default();
        params.u32(color)?.i16(y)?.i16(x)?;
        self.write_record(META_FLOODFILL, &params.0)
    }

    fn frame_rgn(
        &mut self,
        rgn: &WmfHandle,
        brush: &WmfHandle,
        width: i32,
        height: i32,
    ) -> GdiResult {
        let mut params = Params::default();
        params.i16(height)?.i16(width)?.u16(brush.0)?.u16(rgn.0)?;
        self.write_record(META_FRAMEREGION, &params.0)
    }

    fn intersect_clip_rect(&mut self, left: i32, top: i32, right: i32, bottom: i32) -> GdiResult {
        let params = Params::shorts(&[bottom, right, top, left])?;
        self.write_record(META_INTERSECTCLIPRECT, &params.0)
    }

    fn invert_rgn(&mut self, rgn: &WmfHandle) -> GdiResult {
        self.handle_record(META_INVERTREGION, rgn)
    }

    fn line_to(&mut self, ex: i32, ey: i32) -> GdiResult {
        let params = Params::shorts(&[ey, ex])?;
        self.write_record(META_LINETO, &params.0)
    }

    fn move_to_ex(&mut self, x: i32, y: i32) -> GdiResult {
        let params = Params::shorts(&[y, x])?;
        self.write_record(META_MOVETO, &params.0)
    }

    fn offset_clip_rgn(&mut self, x: i32, y: i32) -> GdiResult {
        let params = Params::shorts(&[y, x])?;
        self.write_record(META_OFFSETCLIPRGN, &params.0)
    }

    fn offset_viewport_org_ex(&mut self, x: i32, y: i32) -> GdiResult {
        let params = Params::shorts(&[y, x])?;
        self.write_record(META_OFFSETVIEWPORTORG, &params.0)
    }

    fn offset_window_org_ex(&mut self, x: i32, y: i32) -> GdiResult {
        let params = Params::shorts(&[y, x])?;
        self.write_record(META_OFFSETWINDOWORG, &params.0)
    }

    fn paint_rgn(&mut self, rgn: &WmfHandle) -> GdiResult {
        self.handle_record(META_PAINTREGION, rgn)
    }

    fn pat_blt(&mut self, x: i32, y: i32, width: i32, height: i32, rop: u32) -> GdiResult {
        let mut params = Params::default();
        params.u32(rop)?.i16(height)?.i16(width)?.i16(y)?.i16(x)?;
        self.write_record(META_PATBLT, &params.0)
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
        let params = Params::shorts(&[eya, exa, sya, sxa, eyr, exr, syr, sxr])?;
        self.write_record(META_PIE, &params.0)
    }

    fn polygon(&mut self, points: &[Point]) -> GdiResult {
        let mut params = Params::default();
        params.i16(points.len() as i32)?;
        for p in points {
            params.i16(p.x)?.i16(p.y)?;
        }
        self.write_record(META_POLYGON, &params.0)
    }

    fn polyline(&mut self, points: &[Point]) -> GdiResult {
        let mut params = Params::default();
        params.i16(points.len() as i32)?;
        for p in points {
            params.i16(p.x)?.i16(p.y)?;
        }
        self.write_record(META_POLYLINE, &params.0)
    }

    fn poly_polygon(&mut self, polygons: &[Vec<Point>]) -> GdiResult {
        let mut params = Params::default();
        params.i16(polygons.len() as i32)?;
        for ring in polygons {
            params.i16(ring.len() as i32)?;
        }
        for p in polygons.iter().flatten() {
            params.i16(p.x)?.i16(p.y)?;
        }
        self.write_record(META_POLYPOLYGON, &params.0)
    }

    fn realize_palette(&mut self) -> GdiResult {
        self.write_record(META_REALIZEPALETTE, &[])
    }

    fn restore_dc(&mut self, saved_dc: i32) -> GdiResult {
        let params = Params::shorts(&[saved_dc])?;
        self.write_record(META_RESTOREDC, &params.0)
    }

    fn rectangle(&mut self, sx: i32, sy: i32, ex: i32, ey: i32) -> GdiResult {
        let params = Params::shorts(&[ey, ex, sy, sx])?;
        self.write_record(META_RECTANGLE, &params.0)
    }

    fn resize_palette(&mut self, entries: u16) -> GdiResult {
        let mut params = Params::default();
        params.u16(entries)?;
        self.write_record(META_RESIZEPALETTE, &params.0)
    }

    fn round_rect(&mut self, sx: i32, sy: i32, ex: i32, ey: i32, rw: i32, rh: i32) -> GdiResult {
        let params = Params::shorts(&[rh, rw, ey, ex, sy, sx])?;
        self.write_record(META_ROUNDRECT, &params.0)
    }

    fn save_dc(&mut self) -> GdiResult {
        self.write_record(META_SAVEDC, &[])
    }

    fn scale_viewport_ext_ex(&mut self, x: i32, xd: i32, y: i32, yd: i32) -> GdiResult {
        let params = Params::shorts(&[yd, y, xd, x])?;
        self.write_record(META_SCALEVIEWPORTEXT, &params.0)
    }

    fn scale_window_ext_ex(&mut self, x: i32, xd: i32, y: i32, yd: i32) -> GdiResult {
        let params = Params::shorts(&[yd, y, xd, x])?;
        self.write_record(META_SCALEWINDOWEXT, &params.0)
    }

    fn select_clip_rgn(&mut self, rgn: Option<&WmfHandle>) -> GdiResult {
        match rgn {
            Some(rgn) => self.handle_record(META_SELECTCLIPREGION, rgn),
            // a WMF record always names a region object
            None => Ok(Outcome::Unsupported),
        }
    }

    fn select_object(&mut self, obj: &WmfHandle) -> GdiResult {
        self.handle_record(META_SELECTOBJECT, obj)
    }

    fn select_palette(&mut self, palette: &WmfHandle, background: bool) -> GdiResult {
        let mut params = Params::default();
        if background {
            params.i16(1)?;
        }
        params.u16(palette.0)?;
        self.write_record(META_SELECTPALETTE, &params.0)
    }

    fn set_bk_color(&mut self, color: u32) -> GdiResult {
        let mut params = Params::default();
        params.u32(color)?;
        self.write_record(META_SETBKCOLOR, &params.0)
    }

    fn set_bk_mode(&mut self, mode: i16) -> GdiResult {
        let params = Params::shorts(&[mode as i32])?;
        self.write_record(META_SETBKMODE, &params.0)
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
        let mut params = Params::default();
        params.u16(color_use)?.u16(scan_lines)?.u16(start_scan)?;
        params.i16(sy)?.i16(sx)?.i16(dh)?.i16(dw)?.i16(dy)?.i16(dx)?;
        params.bytes(image);
        self.write_record(META_SETDIBTODEV, &params.0)
    }

    fn set_map_mode(&mut self, mode: i16) -> GdiResult {
        let params = Params::shorts(&[mode as i32])?;
        self.write_record(META_SETMAPMODE, &params.0)
    }

    fn set_mapper_flags(&mut self, flags: u32) -> GdiResult {
        let mut params = Params::default();
        params.u32(flags)?;
        self.write_record(META_SETMAPPERFLAGS, &params.0)
    }

    fn set_palette_entries(&mut self, start: u16, entries: &[u32]) -> GdiResult {
        self.palette_record(META_SETPALENTRIES, start, entries)
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) -> GdiResult {
        let mut params = Params::default();
        params.u32(color)?.i16(y)?.i16(x)?;
        self.write_record(META_SETPIXEL, &params.0)
    }

    fn set_poly_fill_mode(&mut self, mode: i16) -> GdiResult {
        let params = Params::shorts(&[mode as i32])?;
        self.write_record(META_SETPOLYFILLMODE, &params.0)
    }

    fn set_rel_abs(&mut self, mode: i16) -> GdiResult {
        let params = Params::shorts(&[mode as i32])?;
        self.write_record(META_SETRELABS, &params.0)
    }

    fn set_rop2(&mut self, mode: i16) -> GdiResult {
        let params = Params::shorts(&[mode as i32])?;
        self.write_record(META_SETROP2, &params.0)
    }

    fn set_stretch_blt_mode(&mut self, mode: i16) -> GdiResult {
        let params = Params::shorts(&[mode as i32])?;
        self.write_record(META_SETSTRETCHBLTMODE, &params.0)
    }

    fn set_text_align(&mut self, align: u16) -> GdiResult {
        let mut params = Params::default();
        params.u16(align)?;
        self.write_record(META_SETTEXTALIGN, &params.0)
    }

    fn set_text_character_extra(&mut self, extra: i32) -> GdiResult {
        let params = Params::shorts(&[extra])?;
        self.write_record(META_SETTEXTCHAREXTRA, &params.0)
    }

    fn set_text_color(&mut self, color: u32) -> GdiResult {
        let mut params = Params::default();
        params.u32(color)?;
        self.write_record(META_SETTEXTCOLOR, &params.0)
    }

    fn set_text_justification(&mut self, break_extra: i32, break_count: i32) -> GdiResult {
        let params = Params::shorts(&[break_count, break_extra])?;
        self.write_record(META_SETTEXTJUSTIFICATION, &params.0)
    }

    fn set_viewport_ext_ex(&mut self, x: i32, y: i32) -> GdiResult {
        let params = Params::shorts(&[y, x])?;
        self.write_record(META_SETVIEWPORTEXT, &params.0)
    }

    fn set_viewport_org_ex(&mut self, x: i32, y: i32) -> GdiResult {
        let params = Params::shorts(&[y, x])?;
        self.write_record(META_SETVIEWPORTORG, &params.0)
    }

    fn set_window_ext_ex(&mut self, width: i32, height: i32) -> GdiResult {
        let params = Params::shorts(&[height, width])?;
        self.write_record(META_SETWINDOWEXT, &params.0)
    }

    fn set_window_org_ex(&mut self, x: i32, y: i32) -> GdiResult {
        let params = Params::shorts(&[y, x])?;
        self.write_record(META_SETWINDOWORG, &params.0)
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
        self.blt_record(META_STRETCHBLT, image, dx, dy, dw, dh, sx, sy, Some((sw, sh)), rop)
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
        let mut params = Params::default();
        params.u32(rop)?.u16(usage)?;
        params.i16(sh)?.i16(sw)?.i16(sy)?.i16(sx)?.i16(dh)?.i16(dw)?.i16(dy)?.i16(dx)?;
        params.bytes(image);
        self.write_record(META_STRETCHDIB, &params.0)
    }

    fn text_out(&mut self, x: i32, y: i32, text: &[u8]) -> GdiResult {
        let mut params = Params::default();
        params.i16(text.len() as i32)?.bytes(text);
        if text.len() % 2 == 1 {
            params.bytes(&[0]);
        }
        params.i16(y)?.i16(x)?;
        self.write_record(META_TEXTOUT, &params.0)
    }

    fn footer(&mut self) -> GdiResult {
        if !self.terminated {
            self.write_record(META_EOF, &[])?;
            self.terminated = true;
        }
        Ok(Outcome::Handled)
    }
}
