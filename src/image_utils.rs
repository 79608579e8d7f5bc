//! Device-independent bitmap helpers
//!
//! WMF raster records carry packed DIBs: a BITMAPINFOHEADER (or the older
//! BITMAPCOREHEADER), an optional color table and the pixel rows. The SVG
//! backend embeds them as PNG data URIs.

use crate::error::{ConvertError, ConvertResult};
use base64::{engine::general_purpose, Engine as _};
use byteorder::{ByteOrder, LittleEndian};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

const BITMAP_FILE_HEADER_SIZE: usize = 14;
const BITMAP_CORE_HEADER_SIZE: usize = 12;
const BITMAP_INFO_HEADER_SIZE: usize = 40;

const BI_BITFIELDS: u32 = 3;
const BI_ALPHABITFIELDS: u32 = 6;

/// Offset of the pixel rows counted from the start of the DIB.
fn pixel_data_offset(dib: &[u8]) -> ConvertResult<usize> {
    if dib.len() < 4 {
        return Err(ConvertError::UnsupportedRasterEncoding(
            "DIB header truncated".to_string(),
        ));
    }
    let header_size = LittleEndian::read_u32(&dib[0..4]) as usize;

    if header_size == BITMAP_CORE_HEADER_SIZE {
        if dib.len() < BITMAP_CORE_HEADER_SIZE {
            return Err(ConvertError::UnsupportedRasterEncoding(
                "DIB core header truncated".to_string(),
            ));
        }
        let bit_count = LittleEndian::read_u16(&dib[10..12]);
        let palette = if bit_count <= 8 { (1usize << bit_count) * 3 } else { 0 };
        return Ok(header_size + palette);
    }

    if header_size < BITMAP_INFO_HEADER_SIZE || dib.len() < BITMAP_INFO_HEADER_SIZE {
        return Err(ConvertError::UnsupportedRasterEncoding(format!(
            "unsupported DIB header size {}",
            header_size
        )));
    }

    let bit_count = LittleEndian::read_u16(&dib[14..16]);
    let compression = LittleEndian::read_u32(&dib[16..20]);
    let colors_used = LittleEndian::read_u32(&dib[32..36]) as usize;

    let mut palette = if colors_used > 0 {
        colors_used * 4
    } else if bit_count <= 8 {
        (1usize << bit_count) * 4
    } else {
        0
    };
    if header_size == BITMAP_INFO_HEADER_SIZE {
        match compression {
            BI_BITFIELDS => palette += 12,
            BI_ALPHABITFIELDS => palette += 16,
            _ => {}
        }
    }
    Ok(header_size + palette)
}

/// Prefixes a packed DIB with a BITMAPFILEHEADER, producing a .bmp stream.
pub fn dib_to_bmp(dib: &[u8]) -> ConvertResult<Vec<u8>> {
    let offset = BITMAP_FILE_HEADER_SIZE + pixel_data_offset(dib)?;
    let file_size = BITMAP_FILE_HEADER_SIZE + dib.len();

    let mut bmp = vec![0u8; BITMAP_FILE_HEADER_SIZE];
    bmp[0] = b'B';
    bmp[1] = b'M';
    LittleEndian::write_u32(&mut bmp[2..6], file_size as u32);
    LittleEndian::write_u32(&mut bmp[10..14], offset as u32);
    bmp.extend_from_slice(dib);
    Ok(bmp)
}

/// Decodes a packed DIB to 24-bit RGB and re-encodes it as PNG.
///
/// `flip` mirrors the rows, used when the destination height is negative.
pub fn dib_to_png(dib: &[u8], flip: bool) -> ConvertResult<(Vec<u8>, u32, u32)> {
    let bmp = dib_to_bmp(dib)?;
    let img = image::load_from_memory_with_format(&bmp, ImageFormat::Bmp)?;

    let mut rgb = img.to_rgb8();
    if flip {
        image::imageops::flip_vertical_in_place(&mut rgb);
    }
    let (width, height) = rgb.dimensions();

    let mut png = Vec::new();
    DynamicImage::ImageRgb8(rgb).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok((png, width, height))
}

pub fn png_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(png))
}

/// 2x2 24-bit bottom-up DIB: bottom row red, top row blue.
#[cfg(test)]
pub(crate) fn sample_dib() -> Vec<u8> {
    let mut dib = vec![0u8; 40];
    LittleEndian::write_u32(&mut dib[0..4], 40);
    LittleEndian::write_i32(&mut dib[4..8], 2);
    LittleEndian::write_i32(&mut dib[8..12], 2);
    LittleEndian::write_u16(&mut dib[12..14], 1);
    LittleEndian::write_u16(&mut dib[14..16], 24);
    // rows are BGR padded to 4 bytes
    dib.extend_from_slice(&[0, 0, 255, 0, 0, 255, 0, 0]);
    dib.extend_from_slice(&[255, 0, 0, 255, 0, 0, 0, 0]);
    dib
}
