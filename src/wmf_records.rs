//! WMF record type constants

pub const META_EOF: u16 = 0x0000;
pub const META_REALIZEPALETTE: u16 = 0x0035;
pub const META_SETPALENTRIES: u16 = 0x0037;
pub const META_SETBKMODE: u16 = 0x0102;
pub const META_SETMAPMODE: u16 = 0x0103;
pub const META_SETROP2: u16 = 0x0104;
pub const META_SETRELABS: u16 = 0x0105;
pub const META_SETPOLYFILLMODE: u16 = 0x0106;
pub const META_SETSTRETCHBLTMODE: u16 = 0x0107;
pub const META_SETTEXTCHAREXTRA: u16 = 0x0108;
pub const META_RESTOREDC: u16 = 0x0127;
pub const META_INVERTREGION: u16 = 0x012A;
pub const META_PAINTREGION: u16 = 0x012B;
pub const META_SELECTCLIPREGION: u16 = 0x012C;
pub const META_SELECTOBJECT: u16 = 0x012D;
pub const META_SETTEXTALIGN: u16 = 0x012E;
pub const META_RESIZEPALETTE: u16 = 0x0139;
pub const META_DIBCREATEPATTERNBRUSH: u16 = 0x0142;
pub const META_CREATERECTRGN: u16 = 0x0149;
pub const META_DELETEOBJECT: u16 = 0x01F0;
pub const META_CREATEPATTERNBRUSH: u16 = 0x01F9;
pub const META_SETBKCOLOR: u16 = 0x0201;
pub const META_SETTEXTCOLOR: u16 = 0x0209;
pub const META_SETTEXTJUSTIFICATION: u16 = 0x020A;
pub const META_SETWINDOWORG: u16 = 0x020B;
pub const META_SETWINDOWEXT: u16 = 0x020C;
pub const META_SETVIEWPORTORG: u16 = 0x020D;
pub const META_SETVIEWPORTEXT: u16 = 0x020E;
pub const META_OFFSETWINDOWORG: u16 = 0x020F;
pub const META_OFFSETVIEWPORTORG: u16 = 0x0211;
pub const META_LINETO: u16 = 0x0213;
pub const META_MOVETO: u16 = 0x0214;
pub const META_OFFSETCLIPRGN: u16 = 0x0220;
pub const META_FILLREGION: u16 = 0x0228;
pub const META_SETMAPPERFLAGS: u16 = 0x0231;
pub const META_SELECTPALETTE: u16 = 0x0234;
pub const META_CREATEPALETTE: u16 = 0x00F7;
pub const META_SAVEDC: u16 = 0x001E;
pub const META_CREATEPENINDIRECT: u16 = 0x02FA;
pub const META_CREATEFONTINDIRECT: u16 = 0x02FB;
pub const META_CREATEBRUSHINDIRECT: u16 = 0x02FC;
pub const META_POLYGON: u16 = 0x0324;
pub const META_POLYLINE: u16 = 0x0325;
pub const META_SCALEWINDOWEXT: u16 = 0x0410;
pub const META_SCALEVIEWPORTEXT: u16 = 0x0412;
pub const META_EXCLUDECLIPRECT: u16 = 0x0415;
pub const META_INTERSECTCLIPRECT: u16 = 0x0416;
pub const META_ELLIPSE: u16 = 0x0418;
pub const META_FLOODFILL: u16 = 0x0419;
pub const META_RECTANGLE: u16 = 0x041B;
pub const META_SETPIXEL: u16 = 0x041F;
pub const META_FRAMEREGION: u16 = 0x0429;
pub const META_ANIMATEPALETTE: u16 = 0x0436;
pub const META_TEXTOUT: u16 = 0x0521;
pub const META_POLYPOLYGON: u16 = 0x0538;
pub const META_EXTFLOODFILL: u16 = 0x0548;
pub const META_ROUNDRECT: u16 = 0x061C;
pub const META_PATBLT: u16 = 0x061D;
pub const META_ESCAPE: u16 = 0x0626;
pub const META_CREATEREGION: u16 = 0x06FF;
pub const META_ARC: u16 = 0x0817;
pub const META_PIE: u16 = 0x081A;
pub const META_CHORD: u16 = 0x0830;
pub const META_BITBLT: u16 = 0x0922;
pub const META_DIBBITBLT: u16 = 0x0940;
pub const META_EXTTEXTOUT: u16 = 0x0A32;
pub const META_STRETCHBLT: u16 = 0x0B23;
pub const META_DIBSTRETCHBLT: u16 = 0x0B41;
pub const META_SETDIBTODEV: u16 = 0x0D33;
pub const META_STRETCHDIB: u16 = 0x0F43;

/// Get human-readable name for a WMF record type
pub fn get_record_type_name(record_type: u16) -> &'static str {
    match record_type {
        META_EOF => "META_EOF",
        META_REALIZEPALETTE => "META_REALIZEPALETTE",
        META_SETPALENTRIES => "META_SETPALENTRIES",
        META_SETBKMODE => "META_SETBKMODE",
        META_SETMAPMODE => "META_SETMAPMODE",
        META_SETROP2 => "META_SETROP2",
        META_SETRELABS => "META_SETRELABS",
        META_SETPOLYFILLMODE => "META_SETPOLYFILLMODE",
        META_SETSTRETCHBLTMODE => "META_SETSTRETCHBLTMODE",
        META_SETTEXTCHAREXTRA => "META_SETTEXTCHAREXTRA",
        META_RESTOREDC => "META_RESTOREDC",
        META_INVERTREGION => "META_INVERTREGION",
        META_PAINTREGION => "META_PAINTREGION",
        META_SELECTCLIPREGION => "META_SELECTCLIPREGION",
        META_SELECTOBJECT => "META_SELECTOBJECT",
        META_SETTEXTALIGN => "META_SETTEXTALIGN",
        META_RESIZEPALETTE => "META_RESIZEPALETTE",
        META_DIBCREATEPATTERNBRUSH => "META_DIBCREATEPATTERNBRUSH",
        META_CREATERECTRGN => "META_CREATERECTRGN",
        META_DELETEOBJECT => "META_DELETEOBJECT",
        META_CREATEPATTERNBRUSH => "META_CREATEPATTERNBRUSH",
        META_SETBKCOLOR => "META_SETBKCOLOR",
        META_SETTEXTCOLOR => "META_SETTEXTCOLOR",
        META_SETTEXTJUSTIFICATION => "META_SETTEXTJUSTIFICATION",
        META_SETWINDOWORG => "META_SETWINDOWORG",
        META_SETWINDOWEXT => "META_SETWINDOWEXT",
        META_SETVIEWPORTORG => "META_SETVIEWPORTORG",
        META_SETVIEWPORTEXT => "META_SETVIEWPORTEXT",
        META_OFFSETWINDOWORG => "META_OFFSETWINDOWORG",
        META_OFFSETVIEWPORTORG => "META_OFFSETVIEWPORTORG",
        META_LINETO => "META_LINETO",
        META_MOVETO => "META_MOVETO",
        META_OFFSETCLIPRGN => "META_OFFSETCLIPRGN",
        META_FILLREGION => "META_FILLREGION",
        META_SETMAPPERFLAGS => "META_SETMAPPERFLAGS",
        META_SELECTPALETTE => "META_SELECTPALETTE",
        META_CREATEPALETTE => "META_CREATEPALETTE",
        META_SAVEDC => "META_SAVEDC",
        META_CREATEPENINDIRECT => "META_CREATEPENINDIRECT",
        META_CREATEFONTINDIRECT => "META_CREATEFONTINDIRECT",
        META_CREATEBRUSHINDIRECT => "META_CREATEBRUSHINDIRECT",
        META_POLYGON => "META_POLYGON",
        META_POLYLINE => "META_POLYLINE",
        META_SCALEWINDOWEXT => "META_SCALEWINDOWEXT",
        META_SCALEVIEWPORTEXT => "META_SCALEVIEWPORTEXT",
        META_EXCLUDECLIPRECT => "META_EXCLUDECLIPRECT",
        META_INTERSECTCLIPRECT => "META_INTERSECTCLIPRECT",
        META_ELLIPSE => "META_ELLIPSE",
        META_FLOODFILL => "META_FLOODFILL",
        META_RECTANGLE => "META_RECTANGLE",
        META_SETPIXEL => "META_SETPIXEL",
        META_FRAMEREGION => "META_FRAMEREGION",
        META_ANIMATEPALETTE => "META_ANIMATEPALETTE",
        META_TEXTOUT => "META_TEXTOUT",
        META_POLYPOLYGON => "META_POLYPOLYGON",
        META_EXTFLOODFILL => "META_EXTFLOODFILL",
        META_ROUNDRECT => "META_ROUNDRECT",
        META_PATBLT => "META_PATBLT",
        META_ESCAPE => "META_ESCAPE",
        META_CREATEREGION => "META_CREATEREGION",
        META_ARC => "META_ARC",
        META_PIE => "META_PIE",
        META_CHORD => "META_CHORD",
        META_BITBLT => "META_BITBLT",
        META_DIBBITBLT => "META_DIBBITBLT",
        META_EXTTEXTOUT => "META_EXTTEXTOUT",
        META_STRETCHBLT => "META_STRETCHBLT",
        META_DIBSTRETCHBLT => "META_DIBSTRETCHBLT",
        META_SETDIBTODEV => "META_SETDIBTODEV",
        META_STRETCHDIB => "META_STRETCHDIB",
        _ => "UNKNOWN",
    }
}

/// Mandatory fixed-field size in bytes for a record's payload.
///
/// Variable-length records report only their leading count fields.
pub fn min_payload_bytes(record_type: u16) -> usize {
    match record_type {
        META_REALIZEPALETTE | META_SAVEDC => 0,
        META_SETBKMODE | META_SETMAPMODE | META_SETROP2 | META_SETRELABS
        | META_SETPOLYFILLMODE | META_SETSTRETCHBLTMODE | META_SETTEXTCHAREXTRA
        | META_RESTOREDC | META_INVERTREGION | META_PAINTREGION | META_SELECTCLIPREGION
        | META_SELECTOBJECT | META_SETTEXTALIGN | META_RESIZEPALETTE | META_DELETEOBJECT
        | META_SELECTPALETTE => 2,
        META_DIBCREATEPATTERNBRUSH | META_SETBKCOLOR | META_SETTEXTCOLOR
        | META_SETTEXTJUSTIFICATION | META_SETWINDOWORG | META_SETWINDOWEXT
        | META_SETVIEWPORTORG | META_SETVIEWPORTEXT | META_OFFSETWINDOWORG
        | META_OFFSETVIEWPORTORG | META_LINETO | META_MOVETO | META_OFFSETCLIPRGN
        | META_FILLREGION | META_SETMAPPERFLAGS => 4,
        META_POLYGON | META_POLYLINE | META_POLYPOLYGON => 2,
        META_ESCAPE => 0,
        META_TEXTOUT => 6,
        META_SETPALENTRIES | META_ANIMATEPALETTE | META_CREATEPALETTE => 4,
        META_CREATEBRUSHINDIRECT => 8,
        META_CREATEPENINDIRECT => 10,
        META_SCALEWINDOWEXT | META_SCALEVIEWPORTEXT | META_EXCLUDECLIPRECT
        | META_INTERSECTCLIPRECT | META_ELLIPSE | META_RECTANGLE | META_SETPIXEL
        | META_FRAMEREGION | META_CREATERECTRGN => 8,
        META_FLOODFILL => 8,
        META_EXTFLOODFILL => 10,
        META_ROUNDRECT | META_PATBLT => 12,
        META_CREATEFONTINDIRECT => 18,
        META_ARC | META_PIE | META_CHORD => 16,
        META_CREATEPATTERNBRUSH => 10,
        META_EXTTEXTOUT => 8,
        META_CREATEREGION => 22,
        META_BITBLT | META_DIBBITBLT => 16,
        META_STRETCHBLT | META_DIBSTRETCHBLT => 20,
        META_SETDIBTODEV => 18,
        META_STRETCHDIB => 22,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_names() {
        assert_eq!(get_record_type_name(META_RECTANGLE), "META_RECTANGLE");
        assert_eq!(get_record_type_name(META_STRETCHDIB), "META_STRETCHDIB");
        assert_eq!(get_record_type_name(0x7777), "UNKNOWN");
    }

    #[test]
    fn test_minimum_sizes() {
        assert_eq!(min_payload_bytes(META_SAVEDC), 0);
        assert_eq!(min_payload_bytes(META_RECTANGLE), 8);
        assert_eq!(min_payload_bytes(META_CREATEFONTINDIRECT), 18);
        assert_eq!(min_payload_bytes(META_STRETCHDIB), 22);
    }
}
