//! Character set tables for WMF fonts.
//!
//! A LOGFONT carries a one-byte charset id. It selects the byte encoding of
//! the face name and of every string drawn with the font, the language tag
//! written on text elements, the DBCS lead-byte ranges used to merge
//! advance widths, and a fallback family name for CJK faces.

use encoding_rs::{
    Encoding, BIG5, EUC_KR, GBK, MACINTOSH, SHIFT_JIS, WINDOWS_1250, WINDOWS_1251,
    WINDOWS_1252, WINDOWS_1253, WINDOWS_1254, WINDOWS_1255, WINDOWS_1256, WINDOWS_1257,
    WINDOWS_1258, WINDOWS_874,
};

pub const ANSI_CHARSET: u8 = 0;
pub const DEFAULT_CHARSET: u8 = 1;
pub const SYMBOL_CHARSET: u8 = 2;
pub const MAC_CHARSET: u8 = 77;
pub const SHIFTJIS_CHARSET: u8 = 128;
pub const HANGUL_CHARSET: u8 = 129;
pub const JOHAB_CHARSET: u8 = 130;
pub const GB2312_CHARSET: u8 = 134;
pub const CHINESEBIG5_CHARSET: u8 = 136;
pub const GREEK_CHARSET: u8 = 161;
pub const TURKISH_CHARSET: u8 = 162;
pub const VIETNAMESE_CHARSET: u8 = 163;
pub const HEBREW_CHARSET: u8 = 177;
pub const ARABIC_CHARSET: u8 = 178;
pub const BALTIC_CHARSET: u8 = 186;
pub const RUSSIAN_CHARSET: u8 = 204;
pub const THAI_CHARSET: u8 = 222;
pub const EASTEUROPE_CHARSET: u8 = 238;
pub const OEM_CHARSET: u8 = 255;

/// Everything the SVG backend needs to know about one charset id.
#[derive(Debug, Clone, Copy)]
pub struct CharsetInfo {
    pub encoding: &'static Encoding,
    pub lang: Option<&'static str>,
    pub lead_bytes: &'static [(u8, u8)],
    pub fallback_font: Option<&'static str>,
}

const NO_LEAD_BYTES: &[(u8, u8)] = &[];
const SHIFTJIS_LEAD_BYTES: &[(u8, u8)] = &[(0x81, 0x9F), (0xE0, 0xFC)];
const HANGUL_LEAD_BYTES: &[(u8, u8)] = &[(0x81, 0xFE)];
const JOHAB_LEAD_BYTES: &[(u8, u8)] = &[(0x84, 0xD3), (0xD8, 0xDE), (0xE0, 0xF9)];
const GB2312_LEAD_BYTES: &[(u8, u8)] = &[(0xA1, 0xFE)];
const BIG5_LEAD_BYTES: &[(u8, u8)] = &[(0xA1, 0xFE)];

pub fn charset_info(charset: u8) -> CharsetInfo {
    let (encoding, lang, lead_bytes, fallback_font): (
        &'static Encoding,
        Option<&'static str>,
        &'static [(u8, u8)],
        Option<&'static str>,
    ) = match charset {
        MAC_CHARSET => (MACINTOSH, None, NO_LEAD_BYTES, None),
        SHIFTJIS_CHARSET => (SHIFT_JIS, Some("ja"), SHIFTJIS_LEAD_BYTES, Some("MS Gothic")),
        HANGUL_CHARSET => (EUC_KR, Some("ko"), HANGUL_LEAD_BYTES, Some("Gulim")),
        // encoding_rs has no Johab decoder; EUC-KR covers the Hangul syllables
        JOHAB_CHARSET => (EUC_KR, Some("ko"), JOHAB_LEAD_BYTES, Some("Gulim")),
        GB2312_CHARSET => (GBK, Some("zh-CN"), GB2312_LEAD_BYTES, Some("SimSun")),
        CHINESEBIG5_CHARSET => (BIG5, Some("zh-TW"), BIG5_LEAD_BYTES, Some("MingLiU")),
        GREEK_CHARSET => (WINDOWS_1253, Some("el"), NO_LEAD_BYTES, None),
        TURKISH_CHARSET => (WINDOWS_1254, Some("tr"), NO_LEAD_BYTES, None),
        VIETNAMESE_CHARSET => (WINDOWS_1258, Some("vi"), NO_LEAD_BYTES, None),
        HEBREW_CHARSET => (WINDOWS_1255, Some("he"), NO_LEAD_BYTES, None),
        ARABIC_CHARSET => (WINDOWS_1256, Some("ar"), NO_LEAD_BYTES, None),
        BALTIC_CHARSET => (WINDOWS_1257, None, NO_LEAD_BYTES, None),
        RUSSIAN_CHARSET => (WINDOWS_1251, Some("ru"), NO_LEAD_BYTES, None),
        THAI_CHARSET => (WINDOWS_874, Some("th"), NO_LEAD_BYTES, None),
        EASTEUROPE_CHARSET => (WINDOWS_1250, None, NO_LEAD_BYTES, None),
        _ => (WINDOWS_1252, None, NO_LEAD_BYTES, None),
    };
    CharsetInfo {
        encoding,
        lang,
        lead_bytes,
        fallback_font,
    }
}

pub fn is_lead_byte(charset: u8, byte: u8) -> bool {
    charset_info(charset)
        .lead_bytes
        .iter()
        .any(|&(lo, hi)| byte >= lo && byte <= hi)
}

/// Decodes `bytes` up to the first NUL.
///
/// With `replace_symbol` set, SYMBOL_CHARSET text is mapped from the Symbol
/// font layout to the matching Unicode characters so it renders without the
/// font installed.
pub fn decode_text(charset: u8, bytes: &[u8], replace_symbol: bool) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let bytes = &bytes[..end];
    if charset == SYMBOL_CHARSET && replace_symbol {
        return bytes.iter().map(|&b| symbol_char(b)).collect();
    }
    let (text, _, had_errors) = charset_info(charset).encoding.decode(bytes);
    if had_errors {
        log::debug!("charset {}: replaced undecodable bytes", charset);
    }
    text.into_owned()
}

/// Folds the advance of each trailing byte of a double-byte character into
/// the advance of its lead byte, so the result has one entry per decoded
/// character.
pub fn merge_dx(charset: u8, text: &[u8], dx: &[i32]) -> Vec<i32> {
    let info = charset_info(charset);
    if info.lead_bytes.is_empty() {
        return dx.to_vec();
    }
    let mut merged = Vec::with_capacity(dx.len());
    let mut i = 0;
    while i < dx.len() {
        let mut advance = dx[i];
        let is_lead = text
            .get(i)
            .map(|&b| info.lead_bytes.iter().any(|&(lo, hi)| b >= lo && b <= hi))
            .unwrap_or(false);
        if is_lead && i + 1 < dx.len() {
            advance += dx[i + 1];
            i += 1;
        }
        merged.push(advance);
        i += 1;
    }
    merged
}

/// Substitute family for faces that rely on the Symbol layout.
pub fn symbol_replacement_family(face_name: &str) -> Option<&'static str> {
    match face_name.to_ascii_lowercase().as_str() {
        "symbol" => Some("serif"),
        "wingdings" | "webdings" => Some("sans-serif"),
        _ => None,
    }
}

fn symbol_char(byte: u8) -> char {
    const UPPER: [char; 26] = [
        'Α', 'Β', 'Χ', 'Δ', 'Ε', 'Φ', 'Γ', 'Η', 'Ι', 'ϑ', 'Κ', 'Λ', 'Μ', 'Ν', 'Ο', 'Π', 'Θ',
        'Ρ', 'Σ', 'Τ', 'Υ', 'ς', 'Ω', 'Ξ', 'Ψ', 'Ζ',
    ];
    const LOWER: [char; 26] = [
        'α', 'β', 'χ', 'δ', 'ε', 'φ', 'γ', 'η', 'ι', 'ϕ', 'κ', 'λ', 'μ', 'ν', 'ο', 'π', 'θ',
        'ρ', 'σ', 'τ', 'υ', 'ϖ', 'ω', 'ξ', 'ψ', 'ζ',
    ];
    match byte {
        b'A'..=b'Z' => UPPER[(byte - b'A') as usize],
        b'a'..=b'z' => LOWER[(byte - b'a') as usize],
        0x22 => '∀',
        0x24 => '∃',
        0x27 => '∋',
        0x2A => '∗',
        0x2D => '−',
        0x40 => '≅',
        0x5C => '∴',
        0x5E => '⊥',
        0xA1 => 'ϒ',
        0xA2 => '′',
        0xA3 => '≤',
        0xA5 => '∞',
        0xAC => '←',
        0xAD => '↑',
        0xAE => '→',
        0xAF => '↓',
        0xB0 => '°',
        0xB1 => '±',
        0xB2 => '″',
        0xB3 => '≥',
        0xB4 => '×',
        0xB5 => '∝',
        0xB6 => '∂',
        0xB7 => '•',
        0xB8 => '÷',
        0xB9 => '≠',
        0xBA => '≡',
        0xBB => '≈',
        0xBC => '…',
        0xC0 => 'ℵ',
        0xC5 => '⊕',
        0xC6 => '∅',
        0xC7 => '∩',
        0xC8 => '∪',
        0xC9 => '⊃',
        0xCA => '⊇',
        0xCB => '⊄',
        0xCC => '⊂',
        0xCD => '⊆',
        0xCE => '∈',
        0xCF => '∉',
        0xD0 => '∠',
        0xD1 => '∇',
        0xD5 => '∏',
        0xD6 => '√',
        0xD7 => '⋅',
        0xD8 => '¬',
        0xD9 => '∧',
        0xDA => '∨',
        0xDB => '⇔',
        0xDC => '⇐',
        0xDD => '⇑',
        0xDE => '⇒',
        0xDF => '⇓',
        0xE0 => '◊',
        0xE1 => '〈',
        0xE5 => '∑',
        0xF1 => '〉',
        0xF2 => '∫',
        _ => byte as char,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_stops_at_nul() {
        assert_eq!(decode_text(ANSI_CHARSET, b"Arial\0junk", false), "Arial");
    }

    #[test]
    fn test_decode_shift_jis() {
        // "日本" in Shift_JIS
        let bytes = [0x93, 0xFA, 0x96, 0x7B];
        assert_eq!(decode_text(SHIFTJIS_CHARSET, &bytes, false), "日本");
        assert_eq!(charset_info(SHIFTJIS_CHARSET).lang, Some("ja"));
    }

    #[test]
    fn test_symbol_replacement() {
        assert_eq!(decode_text(SYMBOL_CHARSET, b"abg", true), "αβγ");
        assert_eq!(decode_text(SYMBOL_CHARSET, b"abg", false), "abg");
        assert_eq!(symbol_replacement_family("Symbol"), Some("serif"));
    }

    #[test]
    fn test_merge_dx_folds_trailing_bytes() {
        let text = [0x93, 0xFA, b'A'];
        assert_eq!(merge_dx(SHIFTJIS_CHARSET, &text, &[5, 6, 7]), vec![11, 7]);
        assert_eq!(merge_dx(ANSI_CHARSET, &text, &[5, 6, 7]), vec![5, 6, 7]);
    }

    #[test]
    fn test_lead_byte_ranges() {
        assert!(is_lead_byte(SHIFTJIS_CHARSET, 0x81));
        assert!(!is_lead_byte(SHIFTJIS_CHARSET, 0xA0));
        assert!(is_lead_byte(JOHAB_CHARSET, 0xD8));
        assert!(!is_lead_byte(JOHAB_CHARSET, 0xD5));
        assert!(!is_lead_byte(ANSI_CHARSET, 0x81));
    }
}
