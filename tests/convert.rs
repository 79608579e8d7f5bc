//! End-to-end conversions of metafiles built with `WmfWriter`

use wmf2svg::gdi::*;
use wmf2svg::{
    convert_with_options, convert_wmf_to_svg, is_wmf_format, ConvertError, ConvertOptions,
    WmfWriter,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Placeable header, window setup and the background mode shared by the tests.
fn writer() -> WmfWriter {
    let mut writer = WmfWriter::new();
    writer.placeable_header(0, 0, 9000, 4493, 1440).unwrap();
    writer.header().unwrap();
    writer.set_window_org_ex(0, 0).unwrap();
    writer.set_window_ext_ex(9000, 4493).unwrap();
    writer.set_bk_mode(TRANSPARENT).unwrap();
    writer
}

fn convert(mut writer: WmfWriter) -> String {
    writer.footer().unwrap();
    let data = writer.into_bytes();
    assert!(is_wmf_format(&data));
    convert_wmf_to_svg(&data).unwrap()
}

#[test]
fn test_rectangle_and_line() {
    init_logger();
    let mut w = writer();
    let brush = w.create_brush_indirect(BS_SOLID, 0x000000, 0).unwrap();
    w.select_object(&brush).unwrap();
    w.rectangle(100, 100, 2000, 1500).unwrap();
    w.move_to_ex(0, 0).unwrap();
    w.line_to(9000, 4493).unwrap();

    let svg = convert(w);
    assert_eq!(svg.matches("<rect").count(), 1);
    assert_eq!(svg.matches("<line").count(), 1);
    assert!(svg.contains("width=\"6.25in\""));
    assert!(svg.contains("height=\"3.1201"));
    assert!(svg.contains("viewBox=\"0 0 9000 4493\""));
    assert_eq!(svg.matches("{fill:").count(), 1);
    assert!(svg.contains(".pen0 {"));
    assert!(!svg.contains("<defs"));
}

#[test]
fn test_styles_are_deduplicated() {
    init_logger();
    let mut w = writer();
    let first = w.create_pen_indirect(PS_SOLID, 10, 0x0000FF).unwrap();
    let second = w.create_pen_indirect(PS_SOLID, 10, 0x0000FF).unwrap();
    let third = w.create_pen_indirect(PS_SOLID, 10, 0x00FF00).unwrap();
    for pen in [&first, &second, &third] {
        w.select_object(pen).unwrap();
        w.polyline(&[Point::new(0, 0), Point::new(100, 100)]).unwrap();
    }

    let svg = convert(w);
    assert_eq!(svg.matches("class=\"pen1\"").count(), 2);
    assert_eq!(svg.matches("class=\"pen2\"").count(), 1);
    assert!(svg.contains(".pen1 {stroke: rgb(255,0,0); stroke-width: 10;"));
    assert!(!svg.contains(".pen3"));
}

#[test]
fn test_winding_fill_rule() {
    init_logger();
    let mut w = writer();
    let square = vec![
        Point::new(0, 0),
        Point::new(100, 0),
        Point::new(100, 100),
        Point::new(0, 100),
    ];
    w.polygon(&square).unwrap();
    w.set_poly_fill_mode(WINDING).unwrap();
    w.polygon(&square).unwrap();
    w.poly_polygon(&[square.clone(), square]).unwrap();

    let svg = convert(w);
    assert_eq!(svg.matches("<polygon").count(), 2);
    assert_eq!(svg.matches("fill-rule=\"nonzero\"").count(), 2);
}

#[test]
fn test_repeated_rop_registers_one_filter() {
    init_logger();
    let mut w = writer();
    w.pat_blt(0, 0, 100, 100, SRCAND).unwrap();
    w.dib_bit_blt(None, 50, 50, 100, 100, 0, 0, SRCAND).unwrap();

    let svg = convert(w);
    assert_eq!(svg.matches("<filter").count(), 1);
    assert_eq!(svg.matches("url(#SRCAND_FILTER)").count(), 2);
    assert!(svg.contains("enable-background=\"new\""));
}

#[test]
fn test_coincident_arc_points() {
    init_logger();
    let mut w = writer();
    w.arc(0, 0, 200, 200, 200, 100, 200, 100).unwrap();
    w.chord(0, 0, 400, 200, 10, 10, 10, 10).unwrap();

    let svg = convert(w);
    assert!(svg.contains("<circle"));
    assert!(svg.contains("<ellipse"));
    assert!(!svg.contains("<path"));
}

#[test]
fn test_deleted_brush_reverts_to_default() {
    init_logger();
    let mut w = writer();
    let brush = w.create_brush_indirect(BS_SOLID, 0x0000FF, 0).unwrap();
    w.select_object(&brush).unwrap();
    w.rectangle(0, 0, 10, 10).unwrap();
    w.delete_object(&brush).unwrap();
    w.rectangle(0, 0, 10, 10).unwrap();

    let svg = convert(w);
    assert!(svg.contains("class=\"pen0 brush1\""));
    assert!(svg.contains("class=\"pen0 brush0\""));
    assert!(svg.contains(".brush0 {fill: rgb(255,255,255);}"));
}

#[test]
fn test_clip_and_text() {
    init_logger();
    let mut w = writer();
    let font = w
        .create_font_indirect(&LogFont {
            height: -240,
            weight: FW_BOLD,
            face_name: b"Arial\0".to_vec(),
            ..Default::default()
        })
        .unwrap();
    w.select_object(&font).unwrap();
    w.save_dc().unwrap();
    w.intersect_clip_rect(0, 0, 4500, 2000).unwrap();
    w.text_out(100, 100, b"Hello").unwrap();
    w.restore_dc(-1).unwrap();
    w.text_out(100, 3000, b"World").unwrap();

    let svg = convert(w);
    assert!(svg.contains("<mask"));
    assert!(svg.contains("mask=\"url(#mask0)\""));
    assert!(svg.contains("Hello"));
    assert!(svg.contains("World"));
    assert!(svg.contains("font-weight: bold; font-size: 240px; font-family: Arial;"));
}

#[test]
fn test_symbol_font_replacement() {
    init_logger();
    let mut w = writer();
    let font = w
        .create_font_indirect(&LogFont {
            height: -100,
            charset: wmf2svg::charset::SYMBOL_CHARSET,
            face_name: b"Symbol\0".to_vec(),
            ..Default::default()
        })
        .unwrap();
    w.select_object(&font).unwrap();
    w.text_out(0, 0, b"p").unwrap();
    w.footer().unwrap();
    let data = w.into_bytes();

    let plain = convert_wmf_to_svg(&data).unwrap();
    assert!(!plain.contains('π'));

    let options = ConvertOptions {
        replace_symbol_font: true,
        ..Default::default()
    };
    let replaced = convert_with_options(&data, &options).unwrap();
    assert!(replaced.contains('π'));
    assert!(replaced.contains("font-family: serif;"));
}

#[test]
fn test_truncated_stream_fails() {
    init_logger();
    let mut w = writer();
    w.rectangle(0, 0, 10, 10).unwrap();
    w.footer().unwrap();
    let data = w.into_bytes();

    let result = convert_wmf_to_svg(&data[..data.len() - 4]);
    assert!(matches!(result, Err(ConvertError::TruncatedInput { .. })));
    assert!(matches!(convert_wmf_to_svg(&[]), Err(ConvertError::EmptyInput)));
}

#[test]
fn test_markup_characters_are_escaped() {
    init_logger();
    let mut w = writer();
    w.text_out(1, 1, b"a<b&c").unwrap();

    let svg = convert(w);
    assert!(svg.contains("a&lt;b&amp;c"));
    assert!(!svg.contains("a<b"));
}

#[test]
fn test_empty_opaque_text_paints_background() {
    init_logger();
    let mut w = writer();
    w.set_bk_color(0x00FF00).unwrap();
    w.ext_text_out(0, 0, ETO_OPAQUE, Some(Rect::new(10, 10, 50, 50)), b"", &[])
        .unwrap();

    let svg = convert(w);
    assert_eq!(svg.matches("<rect").count(), 1);
    assert!(svg.contains("fill=\"rgb(0,255,0)\""));
    assert!(!svg.contains("<text"));
}

#[test]
fn test_oversized_record_length_fails_cleanly() {
    init_logger();
    let mut w = writer();
    w.footer().unwrap();
    let mut data = w.into_bytes();
    data.truncate(data.len() - 6);
    data.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF, 0x32, 0x0A]);
    data.extend_from_slice(&[0, 0, 0, 0, 5, 0, 0, 0, b'a', b'b', b'c', b'd', b'e', 0]);

    let result = convert_wmf_to_svg(&data);
    assert!(matches!(result, Err(ConvertError::TruncatedInput { .. })));
}

#[test]
fn test_zero_window_scale_is_ignored() {
    init_logger();
    let mut w = writer();
    w.scale_window_ext_ex(0, 1, 1, 1).unwrap();
    w.rectangle(-10, 0, 10, 10).unwrap();

    let svg = convert(w);
    assert!(svg.contains("x=\"-10\""));
    assert!(svg.contains("width=\"20\""));
}
