//! WMF to SVG converter
//!
//! Converts Windows Metafiles (placeable or standard) into SVG documents:
//! - `wmf` - record stream parser driving a [`gdi::Gdi`] backend
//! - `svg_gdi` - backend that renders GDI calls as SVG
//! - `wmf_writer` - backend that writes GDI calls back out as WMF records
//! - `trace` - backend decorator that logs every call
//!
//! ```no_run
//! let data = std::fs::read("drawing.wmf").unwrap();
//! let svg = wmf2svg::convert_wmf_to_svg(&data).unwrap();
//! ```

pub mod charset;
mod data_input;
pub mod error;
pub mod gdi;
pub mod image_utils;
pub mod rop;
pub mod svg_dc;
pub mod svg_gdi;
pub mod svg_style;
pub mod svg_writer;
pub mod trace;
pub mod wmf;
pub mod wmf_records;
pub mod wmf_writer;

#[cfg(feature = "python")]
mod python;

use std::io::Cursor;

pub use error::{ConvertError, ConvertResult};
pub use svg_gdi::SvgGdi;
pub use trace::TracingGdi;
pub use wmf::{is_wmf_format, ParseSummary, WmfParser};
pub use wmf_writer::WmfWriter;

/// Conversion settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Log every GDI call at debug level
    pub debug: bool,
    /// Map SYMBOL_CHARSET text to Unicode and substitute the Symbol face
    pub replace_symbol_font: bool,
}

/// Convert WMF data to an SVG string with default options
pub fn convert_wmf_to_svg(data: &[u8]) -> ConvertResult<String> {
    convert_with_options(data, &ConvertOptions::default())
}

/// Convert WMF data to an SVG string
pub fn convert_with_options(data: &[u8], options: &ConvertOptions) -> ConvertResult<String> {
    let gdi = SvgGdi::new(options.replace_symbol_font);

    let gdi = if options.debug {
        let mut traced = TracingGdi::new(gdi);
        WmfParser::new().parse(Cursor::new(data), &mut traced)?;
        traced.into_inner()
    } else {
        let mut gdi = gdi;
        WmfParser::new().parse(Cursor::new(data), &mut gdi)?;
        gdi
    };

    Ok(gdi.to_svg())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(convert_wmf_to_svg(&[]), Err(ConvertError::EmptyInput)));
    }

    #[test]
    fn test_debug_output_matches_plain_output() {
        use gdi::Gdi;

        let mut writer = WmfWriter::new();
        writer.header().unwrap();
        writer.set_window_ext_ex(100, 100).unwrap();
        writer.ellipse(10, 10, 90, 60).unwrap();
        writer.footer().unwrap();
        let data = writer.into_bytes();

        let plain = convert_wmf_to_svg(&data).unwrap();
        let options = ConvertOptions {
            debug: true,
            ..Default::default()
        };
        assert_eq!(convert_with_options(&data, &options).unwrap(), plain);
        assert!(plain.contains("<ellipse"));
    }
}
