//! WMF format parser
//!
//! Walks the record stream once and turns every record into one call on a
//! [`Gdi`] backend, keeping the metafile's object table along the way.

use crate::data_input::DataInput;
use crate::error::{ConvertError, ConvertResult};
use crate::gdi::{Gdi, Outcome, Point, Rect, ETO_CLIPPED, ETO_OPAQUE};
use crate::wmf_records::*;
use log::{debug, info, warn};
use std::io::Read;

/// Placeable header signature (little-endian u32)
pub const PLACEABLE_KEY: u32 = 0x9AC6_CDD7;

/// Check if data looks like a WMF stream (placeable or standard header)
pub fn is_wmf_format(data: &[u8]) -> bool {
    if data.len() >= 4 {
        let sig = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        if sig == PLACEABLE_KEY {
            return true;
        }
    }

    // Standard header: type 1 or 2, header size 9 words
    if data.len() >= 4 {
        let mt_type = u16::from_le_bytes([data[0], data[1]]);
        let header_size = u16::from_le_bytes([data[2], data[3]]);
        return (mt_type == 1 || mt_type == 2) && header_size == 9;
    }

    false
}

/// Counters reported after a successful parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseSummary {
    pub records: usize,
    pub unsupported: usize,
    pub unknown: usize,
}

/// Record-stream decoder generic over the receiving backend.
pub struct WmfParser<G: Gdi> {
    objects: Vec<Option<G::Object>>,
}

impl<G: Gdi> Default for WmfParser<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Gdi> WmfParser<G> {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Parse a complete metafile, driving `gdi` from `header` to `footer`.
    pub fn parse<R: Read>(&mut self, reader: R, gdi: &mut G) -> ConvertResult<ParseSummary> {
        let mut input = DataInput::new(reader);

        let key = match input.read_u32() {
            Ok(key) => key,
            Err(ConvertError::TruncatedInput { .. }) => return Err(ConvertError::EmptyInput),
            Err(e) => return Err(e),
        };

        let (mt_type, mt_header_size) = if key == PLACEABLE_KEY {
            self.read_placeable_header(&mut input, key, gdi)?;
            (input.read_u16()?, input.read_u16()?)
        } else {
            ((key & 0xFFFF) as u16, (key >> 16) as u16)
        };

        let mt_version = input.read_u16()?;
        let mt_size = input.read_u32()?;
        let mt_no_objects = input.read_u16()?;
        let mt_max_record = input.read_u32()?;
        let _mt_no_parameters = input.read_u16()?;

        if (mt_type != 1 && mt_type != 2) || mt_header_size != 9 {
            return Err(ConvertError::InvalidFormat(format!(
                "unexpected metafile header (type {}, header size {})",
                mt_type, mt_header_size
            )));
        }

        debug!(
            "WMF header: version=0x{:04X} size={} words objects={} max_record={}",
            mt_version, mt_size, mt_no_objects, mt_max_record
        );

        gdi.header()?;

        self.objects = vec![None; mt_no_objects as usize];
        let mut summary = ParseSummary::default();

        loop {
            let size_words = input.read_u32()?;
            let opcode = input.read_u16()?;

            if opcode == META_EOF {
                break;
            }

            if size_words < 3 {
                return Err(ConvertError::malformed(
                    opcode,
                    format!("declared size of {} words is below the record header", size_words),
                ));
            }

            let payload = (size_words as usize - 3) * 2;
            let required = min_payload_bytes(opcode);
            if payload < required {
                return Err(ConvertError::malformed(
                    opcode,
                    format!("payload of {} bytes, at least {} required", payload, required),
                ));
            }

            input.reset_count();
            input.set_limit(Some(payload));

            let outcome = self
                .dispatch(&mut input, gdi, opcode, payload)
                .map_err(|e| e.in_record(opcode))?;

            match outcome {
                Some(Outcome::Handled) => {}
                Some(Outcome::Unsupported) => {
                    debug!("unsupported record: {}", get_record_type_name(opcode));
                    summary.unsupported += 1;
                }
                None => {
                    debug!("unknown record 0x{:04X} ({} bytes), skipped", opcode, payload);
                    summary.unknown += 1;
                }
            }
            summary.records += 1;

            let rest = input.remaining();
            input.skip(rest)?;
            input.set_limit(None);
        }

        gdi.footer()?;

        info!(
            "Parsed {} WMF records ({} unsupported, {} unknown)",
            summary.records, summary.unsupported, summary.unknown
        );

        Ok(summary)
    }

    fn read_placeable_header<R: Read>(
        &mut self,
        input: &mut DataInput<R>,
        key: u32,
        gdi: &mut G,
    ) -> ConvertResult<()> {
        let hmf = input.read_u16()?;
        let vsx = input.read_i16()?;
        let vsy = input.read_i16()?;
        let vex = input.read_i16()?;
        let vey = input.read_i16()?;
        let dpi = input.read_u16()?;
        let reserved = input.read_u32()?;
        let checksum = input.read_u16()?;

        let words = [
            (key & 0xFFFF) as u16,
            (key >> 16) as u16,
            hmf,
            vsx as u16,
            vsy as u16,
            vex as u16,
            vey as u16,
            dpi,
            (reserved & 0xFFFF) as u16,
            (reserved >> 16) as u16,
        ];
        let expected = words.iter().fold(0u16, |acc, w| acc ^ w);
        if expected != checksum {
            warn!(
                "placeable header checksum mismatch: stored 0x{:04X}, computed 0x{:04X}",
                checksum, expected
            );
        }

        gdi.placeable_header(vsx as i32, vsy as i32, vex as i32, vey as i32, dpi as u32)?;
        Ok(())
    }

    fn store(&mut self, obj: G::Object) -> ConvertResult<()> {
        let capacity = self.objects.len();
        match self.objects.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(obj);
                Ok(())
            }
            None => Err(ConvertError::ObjectTableFull { capacity }),
        }
    }

    fn object(&self, index: u16) -> ConvertResult<&G::Object> {
        self.objects
            .get(index as usize)
            .and_then(|slot| slot.as_ref())
            .ok_or(ConvertError::InvalidObjectReference {
                index: index as usize,
                capacity: self.objects.len(),
            })
    }

    fn take(&mut self, index: u16) -> ConvertResult<G::Object> {
        let capacity = self.objects.len();
        self.objects
            .get_mut(index as usize)
            .and_then(|slot| slot.take())
            .ok_or(ConvertError::InvalidObjectReference {
                index: index as usize,
                capacity,
            })
    }

    /// Decode one record body. `None` means the opcode is not a WMF record we know.
    fn dispatch<R: Read>(
        &mut self,
        input: &mut DataInput<R>,
        gdi: &mut G,
        opcode: u16,
        payload: usize,
    ) -> ConvertResult<Option<Outcome>> {
        let outcome = match opcode {
            META_ANIMATEPALETTE => {
                let (start, entries) = read_palette(input)?;
                gdi.animate_palette(start, &entries)?
            }
            META_ARC | META_CHORD | META_PIE => {
                let eya = read_coord(input)?;
                let exa = read_coord(input)?;
                let sya = read_coord(input)?;
                let sxa = read_coord(input)?;
                let eyr = read_coord(input)?;
                let exr = read_coord(input)?;
                let syr = read_coord(input)?;
                let sxr = read_coord(input)?;
                match opcode {
                    META_ARC => gdi.arc(sxr, syr, exr, eyr, sxa, sya, exa, eya)?,
                    META_CHORD => gdi.chord(sxr, syr, exr, eyr, sxa, sya, exa, eya)?,
                    _ => gdi.pie(sxr, syr, exr, eyr, sxa, sya, exa, eya)?,
                }
            }
            META_BITBLT | META_DIBBITBLT => {
                // The form without a bitmap carries a reserved word after xSrc.
                let rop_only = payload == 18;
                let rop = input.read_u32()?;
                let sy = read_coord(input)?;
                let sx = read_coord(input)?;
                if rop_only {
                    input.read_u16()?;
                }
                let height = read_coord(input)?;
                let width = read_coord(input)?;
                let dy = read_coord(input)?;
                let dx = read_coord(input)?;
                let image = if rop_only {
                    None
                } else {
                    Some(input.read_bytes(input.remaining())?)
                };
                if opcode == META_BITBLT {
                    gdi.bit_blt(image.as_deref(), dx, dy, width, height, sx, sy, rop)?
                } else {
                    gdi.dib_bit_blt(image.as_deref(), dx, dy, width, height, sx, sy, rop)?
                }
            }
            META_STRETCHBLT | META_DIBSTRETCHBLT => {
                let rop_only = payload == 22;
                let rop = input.read_u32()?;
                let sh = read_coord(input)?;
                let sw = read_coord(input)?;
                let sy = read_coord(input)?;
                let sx = read_coord(input)?;
                if rop_only {
                    input.read_u16()?;
                }
                let dh = read_coord(input)?;
                let dw = read_coord(input)?;
                let dy = read_coord(input)?;
                let dx = read_coord(input)?;
                let image = if rop_only {
                    None
                } else {
                    Some(input.read_bytes(input.remaining())?)
                };
                if opcode == META_STRETCHBLT {
                    gdi.stretch_blt(image.as_deref(), dx, dy, dw, dh, sx, sy, sw, sh, rop)?
                } else {
                    gdi.dib_stretch_blt(image.as_deref(), dx, dy, dw, dh, sx, sy, sw, sh, rop)?
                }
            }
            META_CREATEBRUSHINDIRECT => {
                let style = input.read_u16()?;
                let color = input.read_u32()?;
                let hatch = input.read_u16()?;
                let obj = gdi.create_brush_indirect(style, color, hatch)?;
                self.store(obj)?;
                Outcome::Handled
            }
            META_CREATEFONTINDIRECT => {
                let font = crate::gdi::LogFont {
                    height: read_coord(input)?,
                    width: read_coord(input)?,
                    escapement: read_coord(input)?,
                    orientation: read_coord(input)?,
                    weight: read_coord(input)?,
                    italic: input.read_u8()? == 1,
                    underline: input.read_u8()? == 1,
                    strikeout: input.read_u8()? == 1,
                    charset: input.read_u8()?,
                    out_precision: input.read_u8()?,
                    clip_precision: input.read_u8()?,
                    quality: input.read_u8()?,
                    pitch_and_family: input.read_u8()?,
                    face_name: input.read_bytes(input.remaining())?,
                };
                let obj = gdi.create_font_indirect(&font)?;
                self.store(obj)?;
                Outcome::Handled
            }
            META_CREATEPALETTE => {
                let (version, entries) = read_palette(input)?;
                let obj = gdi.create_palette(version, &entries)?;
                self.store(obj)?;
                Outcome::Handled
            }
            META_CREATEPATTERNBRUSH => {
                let image = input.read_bytes(input.remaining())?;
                let obj = gdi.create_pattern_brush(&image)?;
                self.store(obj)?;
                Outcome::Handled
            }
            META_CREATEPENINDIRECT => {
                let style = input.read_u16()?;
                let width = read_coord(input)?;
                input.read_i16()?;
                let color = input.read_u32()?;
                let obj = gdi.create_pen_indirect(style, width, color)?;
                self.store(obj)?;
                Outcome::Handled
            }
            META_CREATERECTRGN => {
                let ey = read_coord(input)?;
                let ex = read_coord(input)?;
                let sy = read_coord(input)?;
                let sx = read_coord(input)?;
                let obj = gdi.create_rect_rgn(sx, sy, ex, ey)?;
                self.store(obj)?;
                Outcome::Handled
            }
            META_CREATEREGION => {
                // nextInChain, objectType, objectCount, regionSize, scanCount, maxScan
                input.skip(14)?;
                let left = read_coord(input)?;
                let top = read_coord(input)?;
                let right = read_coord(input)?;
                let bottom = read_coord(input)?;
                let obj = gdi.create_rect_rgn(left, top, right, bottom)?;
                self.store(obj)?;
                Outcome::Handled
            }
            META_DELETEOBJECT => {
                let index = input.read_u16()?;
                let obj = self.take(index)?;
                gdi.delete_object(&obj)?
            }
            META_DIBCREATEPATTERNBRUSH => {
                let _style = input.read_u16()?;
                let usage = input.read_u16()?;
                let image = input.read_bytes(input.remaining())?;
                let obj = gdi.dib_create_pattern_brush(&image, usage)?;
                self.store(obj)?;
                Outcome::Handled
            }
            META_ELLIPSE => {
                let [sx, sy, ex, ey] = read_rect_reversed(input)?;
                gdi.ellipse(sx, sy, ex, ey)?
            }
            META_ESCAPE => {
                let data = input.read_bytes(input.remaining())?;
                gdi.escape(&data)?
            }
            META_EXCLUDECLIPRECT => {
                let [sx, sy, ex, ey] = read_rect_reversed(input)?;
                gdi.exclude_clip_rect(sx, sy, ex, ey)?
            }
            META_EXTFLOODFILL => {
                let fill_type = input.read_u16()?;
                let color = input.read_u32()?;
                let y = read_coord(input)?;
                let x = read_coord(input)?;
                gdi.ext_flood_fill(x, y, color, fill_type)?
            }
            META_EXTTEXTOUT => {
                let y = read_coord(input)?;
                let x = read_coord(input)?;
                let count = read_count(input)?;
                let options = input.read_u16()?;
                let padded = count + count % 2;

                let rect = if options & (ETO_OPAQUE | ETO_CLIPPED) != 0
                    && input.remaining() >= 8 + padded
                {
                    let left = read_coord(input)?;
                    let top = read_coord(input)?;
                    let right = read_coord(input)?;
                    let bottom = read_coord(input)?;
                    Some(Rect::new(left, top, right, bottom))
                } else {
                    None
                };

                let text = input.read_bytes(count)?;
                if count % 2 == 1 {
                    input.read_u8()?;
                }

                let mut dx = Vec::new();
                while input.remaining() >= 2 {
                    dx.push(read_coord(input)?);
                }
                gdi.ext_text_out(x, y, options, rect, &text, &dx)?
            }
            META_FILLREGION => {
                let brush = input.read_u16()?;
                let rgn = input.read_u16()?;
                gdi.fill_rgn(self.object(rgn)?, self.object(brush)?)?
            }
            META_FLOODFILL => {
                let color = input.read_u32()?;
                let y = read_coord(input)?;
                let x = read_coord(input)?;
                gdi.flood_fill(x, y, color)?
            }
            META_FRAMEREGION => {
                let height = read_coord(input)?;
                let width = read_coord(input)?;
                let brush = input.read_u16()?;
                let rgn = input.read_u16()?;
                gdi.frame_rgn(self.object(rgn)?, self.object(brush)?, width, height)?
            }
            META_INTERSECTCLIPRECT => {
                let [sx, sy, ex, ey] = read_rect_reversed(input)?;
                gdi.intersect_clip_rect(sx, sy, ex, ey)?
            }
            META_INVERTREGION => {
                let rgn = input.read_u16()?;
                gdi.invert_rgn(self.object(rgn)?)?
            }
            META_LINETO => {
                let (x, y) = read_point_reversed(input)?;
                gdi.line_to(x, y)?
            }
            META_MOVETO => {
                let (x, y) = read_point_reversed(input)?;
                gdi.move_to_ex(x, y)?
            }
            META_OFFSETCLIPRGN => {
                let (x, y) = read_point_reversed(input)?;
                gdi.offset_clip_rgn(x, y)?
            }
            META_OFFSETVIEWPORTORG => {
                let (x, y) = read_point_reversed(input)?;
                gdi.offset_viewport_org_ex(x, y)?
            }
            META_OFFSETWINDOWORG => {
                let (x, y) = read_point_reversed(input)?;
                gdi.offset_window_org_ex(x, y)?
            }
            META_PAINTREGION => {
                let rgn = input.read_u16()?;
                gdi.paint_rgn(self.object(rgn)?)?
            }
            META_PATBLT => {
                let rop = input.read_u32()?;
                let height = read_coord(input)?;
                let width = read_coord(input)?;
                let y = read_coord(input)?;
                let x = read_coord(input)?;
                gdi.pat_blt(x, y, width, height, rop)?
            }
            META_POLYGON => {
                let count = read_count(input)?;
                let points = read_points(input, count)?;
                gdi.polygon(&points)?
            }
            META_POLYLINE => {
                let count = read_count(input)?;
                let points = read_points(input, count)?;
                gdi.polyline(&points)?
            }
            META_POLYPOLYGON => {
                let rings = read_count(input)?;
                let mut counts = Vec::with_capacity(rings);
                for _ in 0..rings {
                    counts.push(read_count(input)?);
                }
                let mut polygons = Vec::with_capacity(rings);
                for count in counts {
                    polygons.push(read_points(input, count)?);
                }
                gdi.poly_polygon(&polygons)?
            }
            META_REALIZEPALETTE => gdi.realize_palette()?,
            META_RECTANGLE => {
                let [sx, sy, ex, ey] = read_rect_reversed(input)?;
                gdi.rectangle(sx, sy, ex, ey)?
            }
            META_RESIZEPALETTE => {
                let entries = input.read_u16()?;
                gdi.resize_palette(entries)?
            }
            META_RESTOREDC => {
                let saved = read_coord(input)?;
                gdi.restore_dc(saved)?
            }
            META_ROUNDRECT => {
                let rh = read_coord(input)?;
                let rw = read_coord(input)?;
                let [sx, sy, ex, ey] = read_rect_reversed(input)?;
                gdi.round_rect(sx, sy, ex, ey, rw, rh)?
            }
            META_SAVEDC => gdi.save_dc()?,
            META_SCALEVIEWPORTEXT | META_SCALEWINDOWEXT => {
                let yd = read_coord(input)?;
                let y = read_coord(input)?;
                let xd = read_coord(input)?;
                let x = read_coord(input)?;
                if opcode == META_SCALEVIEWPORTEXT {
                    gdi.scale_viewport_ext_ex(x, xd, y, yd)?
                } else {
                    gdi.scale_window_ext_ex(x, xd, y, yd)?
                }
            }
            META_SELECTCLIPREGION => {
                let rgn = input.read_u16()?;
                gdi.select_clip_rgn(Some(self.object(rgn)?))?
            }
            META_SELECTOBJECT => {
                let index = input.read_u16()?;
                gdi.select_object(self.object(index)?)?
            }
            META_SELECTPALETTE => {
                let background = if input.remaining() >= 4 {
                    input.read_i16()? != 0
                } else {
                    false
                };
                let index = input.read_u16()?;
                gdi.select_palette(self.object(index)?, background)?
            }
            META_SETBKCOLOR => gdi.set_bk_color(input.read_u32()?)?,
            META_SETBKMODE => gdi.set_bk_mode(input.read_i16()?)?,
            META_SETDIBTODEV => {
                let color_use = input.read_u16()?;
                let scan_lines = input.read_u16()?;
                let start_scan = input.read_u16()?;
                let sy = read_coord(input)?;
                let sx = read_coord(input)?;
                let dh = read_coord(input)?;
                let dw = read_coord(input)?;
                let dy = read_coord(input)?;
                let dx = read_coord(input)?;
                let image = input.read_bytes(input.remaining())?;
                gdi.set_dibits_to_device(
                    dx, dy, dw, dh, sx, sy, start_scan, scan_lines, &image, color_use,
                )?
            }
            META_SETMAPMODE => gdi.set_map_mode(input.read_i16()?)?,
            META_SETMAPPERFLAGS => gdi.set_mapper_flags(input.read_u32()?)?,
            META_SETPALENTRIES => {
                let (start, entries) = read_palette(input)?;
                gdi.set_palette_entries(start, &entries)?
            }
            META_SETPIXEL => {
                let color = input.read_u32()?;
                let (x, y) = read_point_reversed(input)?;
                gdi.set_pixel(x, y, color)?
            }
            META_SETPOLYFILLMODE => gdi.set_poly_fill_mode(input.read_i16()?)?,
            META_SETRELABS => gdi.set_rel_abs(input.read_i16()?)?,
            META_SETROP2 => gdi.set_rop2(input.read_i16()?)?,
            META_SETSTRETCHBLTMODE => gdi.set_stretch_blt_mode(input.read_i16()?)?,
            META_SETTEXTALIGN => gdi.set_text_align(input.read_u16()?)?,
            META_SETTEXTCHAREXTRA => gdi.set_text_character_extra(read_coord(input)?)?,
            META_SETTEXTCOLOR => gdi.set_text_color(input.read_u32()?)?,
            META_SETTEXTJUSTIFICATION => {
                let break_count = read_coord(input)?;
                let break_extra = read_coord(input)?;
                gdi.set_text_justification(break_extra, break_count)?
            }
            META_SETVIEWPORTEXT => {
                let (x, y) = read_point_reversed(input)?;
                gdi.set_viewport_ext_ex(x, y)?
            }
            META_SETVIEWPORTORG => {
                let (x, y) = read_point_reversed(input)?;
                gdi.set_viewport_org_ex(x, y)?
            }
            META_SETWINDOWEXT => {
                let (width, height) = read_point_reversed(input)?;
                gdi.set_window_ext_ex(width, height)?
            }
            META_SETWINDOWORG => {
                let (x, y) = read_point_reversed(input)?;
                gdi.set_window_org_ex(x, y)?
            }
            META_STRETCHDIB => {
                let rop = input.read_u32()?;
                let usage = input.read_u16()?;
                let sh = read_coord(input)?;
                let sw = read_coord(input)?;
                let sy = read_coord(input)?;
                let sx = read_coord(input)?;
                let dh = read_coord(input)?;
                let dw = read_coord(input)?;
                let dy = read_coord(input)?;
                let dx = read_coord(input)?;
                let image = input.read_bytes(input.remaining())?;
                gdi.stretch_dibits(dx, dy, dw, dh, sx, sy, sw, sh, &image, usage, rop)?
            }
            META_TEXTOUT => {
                let count = read_count(input)?;
                let text = input.read_bytes(count)?;
                if count % 2 == 1 {
                    input.read_u8()?;
                }
                let (x, y) = read_point_reversed(input)?;
                gdi.text_out(x, y, &text)?
            }
            _ => return Ok(None),
        };
        Ok(Some(outcome))
    }
}

fn read_coord<R: Read>(input: &mut DataInput<R>) -> ConvertResult<i32> {
    Ok(input.read_i16()? as i32)
}

/// Signed 16-bit count; negative values are malformed.
fn read_count<R: Read>(input: &mut DataInput<R>) -> ConvertResult<usize> {
    let count = input.read_i16()?;
    if count < 0 {
        return Err(ConvertError::malformed(0, format!("negative count {}", count)));
    }
    Ok(count as usize)
}

/// y then x, as stored for single-point records
fn read_point_reversed<R: Read>(input: &mut DataInput<R>) -> ConvertResult<(i32, i32)> {
    let y = read_coord(input)?;
    let x = read_coord(input)?;
    Ok((x, y))
}

/// bottom, right, top, left; returned as [sx, sy, ex, ey]
fn read_rect_reversed<R: Read>(input: &mut DataInput<R>) -> ConvertResult<[i32; 4]> {
    let ey = read_coord(input)?;
    let ex = read_coord(input)?;
    let sy = read_coord(input)?;
    let sx = read_coord(input)?;
    Ok([sx, sy, ex, ey])
}

fn read_points<R: Read>(input: &mut DataInput<R>, count: usize) -> ConvertResult<Vec<Point>> {
    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        let x = read_coord(input)?;
        let y = read_coord(input)?;
        points.push(Point::new(x, y));
    }
    Ok(points)
}

/// Palette object: start (or version), entry count, entries
fn read_palette<R: Read>(input: &mut DataInput<R>) -> ConvertResult<(u16, Vec<u32>)> {
    let start = input.read_u16()?;
    let count = input.read_u16()? as usize;
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        entries.push(input.read_u32()?);
    }
    Ok((start, entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdi::*;
    use crate::wmf_writer::WmfWriter;

    fn roundtrip(writer: WmfWriter) -> (Vec<u8>, Vec<u8>) {
        let original = writer.into_bytes();
        let mut copy = WmfWriter::new();
        WmfParser::new()
            .parse(original.as_slice(), &mut copy)
            .unwrap();
        (original, copy.into_bytes())
    }

    fn header_only() -> Vec<u8> {
        let mut writer = WmfWriter::new();
        writer.header().unwrap();
        writer.footer().unwrap();
        writer.into_bytes()
    }

    #[test]
    fn test_is_wmf_format() {
        assert!(is_wmf_format(&[0xD7, 0xCD, 0xC6, 0x9A]));
        assert!(is_wmf_format(&[0x01, 0x00, 0x09, 0x00]));
        assert!(!is_wmf_format(&[0x01, 0x00, 0x00, 0x00]));
        assert!(!is_wmf_format(&[0x01]));
    }

    #[test]
    fn test_empty_input() {
        let mut sink = WmfWriter::new();
        let err = WmfParser::new().parse(&[][..], &mut sink).unwrap_err();
        assert!(matches!(err, ConvertError::EmptyInput));
    }

    #[test]
    fn test_invalid_header() {
        let data = [0x05u8, 0x00, 0x09, 0x00, 0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut sink = WmfWriter::new();
        let err = WmfParser::new().parse(&data[..], &mut sink).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidFormat(_)));
    }

    #[test]
    fn test_missing_terminator_is_truncated() {
        let mut data = header_only();
        // drop the EOF record
        data.truncate(data.len() - 6);
        let mut sink = WmfWriter::new();
        let err = WmfParser::new().parse(data.as_slice(), &mut sink).unwrap_err();
        assert!(matches!(err, ConvertError::TruncatedInput { .. }));
    }

    #[test]
    fn test_record_below_minimum_size() {
        let mut data = header_only();
        data.truncate(data.len() - 6);
        // RECTANGLE declaring a 4-word record: only one parameter word
        data.extend_from_slice(&[4, 0, 0, 0, 0x1B, 0x04, 0, 0]);
        data.extend_from_slice(&[3, 0, 0, 0, 0, 0]);
        let mut sink = WmfWriter::new();
        let err = WmfParser::new().parse(data.as_slice(), &mut sink).unwrap_err();
        match err {
            ConvertError::MalformedRecord { opcode, .. } => assert_eq!(opcode, META_RECTANGLE),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_negative_polygon_count() {
        let mut data = header_only();
        data.truncate(data.len() - 6);
        data.extend_from_slice(&[4, 0, 0, 0, 0x24, 0x03, 0xFF, 0xFF]);
        data.extend_from_slice(&[3, 0, 0, 0, 0, 0]);
        let mut sink = WmfWriter::new();
        let err = WmfParser::new().parse(data.as_slice(), &mut sink).unwrap_err();
        match err {
            ConvertError::MalformedRecord { opcode, reason } => {
                assert_eq!(opcode, META_POLYGON);
                assert!(reason.contains("negative"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_huge_declared_size_is_truncated() {
        let mut data = header_only();
        data.truncate(data.len() - 6);
        // EXTTEXTOUT declaring 0xFFFFFFFF words over a 14-byte payload
        data.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF, 0x32, 0x0A]);
        data.extend_from_slice(&[0, 0, 0, 0, 3, 0, 0, 0, b'a', b'b', b'c', 0]);
        let mut sink = WmfWriter::new();
        let err = WmfParser::new().parse(data.as_slice(), &mut sink).unwrap_err();
        assert!(matches!(err, ConvertError::TruncatedInput { .. }));
    }

    #[test]
    fn test_unknown_record_is_skipped() {
        let mut data = header_only();
        data.truncate(data.len() - 6);
        data.extend_from_slice(&[5, 0, 0, 0, 0x77, 0x07, 1, 2, 3, 4]);
        data.extend_from_slice(&[3, 0, 0, 0, 0, 0]);
        let mut sink = WmfWriter::new();
        let summary = WmfParser::new().parse(data.as_slice(), &mut sink).unwrap();
        assert_eq!(summary.records, 1);
        assert_eq!(summary.unknown, 1);
    }

    #[test]
    fn test_padding_is_skipped() {
        let mut data = header_only();
        data.truncate(data.len() - 6);
        // SETBKMODE with an extra reserved word
        data.extend_from_slice(&[5, 0, 0, 0, 0x02, 0x01, 1, 0, 0, 0]);
        data.extend_from_slice(&[3, 0, 0, 0, 0, 0]);
        let mut sink = WmfWriter::new();
        let summary = WmfParser::new().parse(data.as_slice(), &mut sink).unwrap();
        assert_eq!(summary.records, 1);
        assert_eq!(summary.unknown, 0);
    }

    #[test]
    fn test_select_of_freed_object_fails() {
        let mut writer = WmfWriter::new();
        writer.header().unwrap();
        let brush = writer.create_brush_indirect(BS_SOLID, 0, 0).unwrap();
        writer.delete_object(&brush).unwrap();
        writer.select_object(&brush).unwrap();
        writer.footer().unwrap();
        let data = writer.into_bytes();

        let mut sink = WmfWriter::new();
        let err = WmfParser::new().parse(data.as_slice(), &mut sink).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidObjectReference { index: 0, capacity: 1 }));
    }

    #[test]
    fn test_object_table_full() {
        let mut writer = WmfWriter::new();
        writer.header().unwrap();
        writer.create_brush_indirect(BS_SOLID, 0, 0).unwrap();
        writer.footer().unwrap();
        let mut data = writer.into_bytes();
        // second CREATEBRUSHINDIRECT before the terminator
        let eof = data.split_off(data.len() - 6);
        data.extend_from_slice(&[7, 0, 0, 0, 0xFC, 0x02, 0, 0, 0, 0, 0, 0, 0, 0]);
        data.extend_from_slice(&eof);

        let mut sink = WmfWriter::new();
        let err = WmfParser::new().parse(data.as_slice(), &mut sink).unwrap_err();
        assert!(matches!(err, ConvertError::ObjectTableFull { capacity: 1 }));
    }

    #[test]
    fn test_roundtrip_shapes_and_state() {
        let mut writer = WmfWriter::new();
        writer.placeable_header(0, 0, 9000, 4493, 1440).unwrap();
        writer.header().unwrap();
        writer.set_window_org_ex(0, 0).unwrap();
        writer.set_window_ext_ex(9000, 4493).unwrap();
        writer.set_bk_mode(TRANSPARENT).unwrap();
        let brush = writer.create_brush_indirect(BS_HATCHED, 0x0000FF, HS_CROSS).unwrap();
        let pen = writer.create_pen_indirect(PS_DASH, 3, 0x00FF00).unwrap();
        writer.select_object(&brush).unwrap();
        writer.select_object(&pen).unwrap();
        writer.rectangle(10, 20, 300, 400).unwrap();
        writer.round_rect(10, 20, 300, 400, 15, 25).unwrap();
        writer.arc(0, 0, 100, 100, 100, 50, 50, 0).unwrap();
        writer.pie(0, 0, 100, 100, 100, 50, 50, 0).unwrap();
        writer
            .polygon(&[Point::new(0, 0), Point::new(10, 0), Point::new(5, 8)])
            .unwrap();
        writer
            .poly_polygon(&[
                vec![Point::new(0, 0), Point::new(10, 0), Point::new(5, 8)],
                vec![Point::new(20, 20), Point::new(30, 20), Point::new(25, 28)],
            ])
            .unwrap();
        writer.move_to_ex(1, 2).unwrap();
        writer.line_to(3, 4).unwrap();
        writer.save_dc().unwrap();
        writer.restore_dc(-1).unwrap();
        writer.delete_object(&brush).unwrap();
        writer.footer().unwrap();

        let (original, copy) = roundtrip(writer);
        assert_eq!(original, copy);
    }

    #[test]
    fn test_roundtrip_text_and_bitmaps() {
        let mut writer = WmfWriter::new();
        writer.header().unwrap();
        let font = LogFont {
            height: -24,
            weight: FW_BOLD,
            charset: 0,
            face_name: b"Arial\0\0\0".to_vec(),
            ..Default::default()
        };
        let font = writer.create_font_indirect(&font).unwrap();
        writer.select_object(&font).unwrap();
        writer.text_out(10, 20, b"odd").unwrap();
        writer
            .ext_text_out(10, 20, ETO_OPAQUE, Some(Rect::new(0, 0, 50, 30)), b"abcd", &[5, 5, 5, 5])
            .unwrap();
        writer.ext_text_out(10, 20, 0, None, b"abc", &[]).unwrap();
        writer.dib_bit_blt(None, 0, 0, 10, 10, 0, 0, BLACKNESS).unwrap();
        writer
            .dib_stretch_blt(Some(&[1, 2, 3, 4, 5, 6]), 0, 0, 10, 10, 0, 0, 2, 2, SRCCOPY)
            .unwrap();
        writer
            .stretch_dibits(0, 0, 10, 10, 0, 0, 2, 2, &[9, 8, 7, 6], DIB_RGB_COLORS, SRCCOPY)
            .unwrap();
        writer.pat_blt(0, 0, 5, 5, PATCOPY).unwrap();
        let rgn = writer.create_rect_rgn(0, 0, 50, 50).unwrap();
        writer.select_clip_rgn(Some(&rgn)).unwrap();
        writer.footer().unwrap();

        let (original, copy) = roundtrip(writer);
        assert_eq!(original, copy);
    }
}
