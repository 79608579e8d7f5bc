//! Ternary raster operations rendered as SVG filters
//!
//! Each supported ROP code has a fixed filter definition. The filter blends
//! `SourceGraphic` with `BackgroundImage`, which is why using one enables
//! `enable-background` on the root element.

use crate::gdi::{
    BLACKNESS, DSTINVERT, MERGEPAINT, NOTSRCCOPY, NOTSRCERASE, SRCAND, SRCERASE, SRCPAINT,
    WHITENESS,
};
use crate::svg_writer::SvgNode;

const BLACK_MATRIX: &str = "0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 1 0";
const INVERT_MATRIX: &str = "-1 0 0 0 1 0 -1 0 0 1 0 0 -1 0 1 0 0 0 1 0";
const WHITE_MATRIX: &str = "1 0 0 0 1 0 1 0 0 1 0 0 1 0 1 0 0 0 1 0";

/// Filter id used for a ROP code, if the code has a filter.
pub fn filter_name(rop: u32) -> Option<&'static str> {
    let name = match rop {
        BLACKNESS => "BLACKNESS_FILTER",
        NOTSRCERASE => "NOTSRCERASE_FILTER",
        NOTSRCCOPY => "NOTSRCCOPY_FILTER",
        SRCERASE => "SRCERASE_FILTER",
        DSTINVERT => "DSTINVERT_FILTER",
        SRCAND => "SRCAND_FILTER",
        MERGEPAINT => "MERGEPAINT_FILTER",
        SRCPAINT => "SRCPAINT_FILTER",
        WHITENESS => "WHITENESS_FILTER",
        _ => return None,
    };
    Some(name)
}

fn color_matrix(input: &str, values: &str) -> SvgNode {
    SvgNode::new("feColorMatrix")
        .set("in", input)
        .set("type", "matrix")
        .set("values", values)
}

fn composite(input: &str, input2: &str) -> SvgNode {
    SvgNode::new("feComposite")
        .set("in", input)
        .set("in2", input2)
        .set("operator", "arithmetic")
}

/// Builds the `<filter>` definition for a ROP code.
pub fn filter_node(rop: u32) -> Option<SvgNode> {
    let name = filter_name(rop)?;
    let filter = SvgNode::new("filter").set("id", name);
    let filter = match rop {
        BLACKNESS => filter.add(color_matrix("SourceGraphic", BLACK_MATRIX)),
        NOTSRCERASE => filter
            .add(
                composite("SourceGraphic", "BackgroundImage")
                    .set("k1", 1)
                    .set("result", "result0"),
            )
            .add(color_matrix("result0", INVERT_MATRIX)),
        NOTSRCCOPY => filter.add(color_matrix("SourceGraphic", INVERT_MATRIX)),
        SRCERASE => filter
            .add(color_matrix("BackgroundImage", INVERT_MATRIX).set("result", "result0"))
            .add(composite("SourceGraphic", "result0").set("k2", 1).set("k3", 1)),
        DSTINVERT => filter.add(color_matrix("BackgroundImage", INVERT_MATRIX)),
        SRCAND => filter.add(composite("SourceGraphic", "BackgroundImage").set("k1", 1)),
        MERGEPAINT => filter
            .add(color_matrix("SourceGraphic", INVERT_MATRIX).set("result", "result0"))
            .add(composite("result0", "BackgroundImage").set("k1", 1)),
        SRCPAINT => filter.add(
            composite("SourceGraphic", "BackgroundImage")
                .set("k2", 1)
                .set("k3", 1),
        ),
        WHITENESS => filter.add(color_matrix("SourceGraphic", WHITE_MATRIX)),
        _ => return None,
    };
    Some(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdi::{PATCOPY, SRCCOPY};

    #[test]
    fn test_copy_operations_have_no_filter() {
        assert!(filter_node(SRCCOPY).is_none());
        assert!(filter_node(PATCOPY).is_none());
    }

    #[test]
    fn test_srcerase_inverts_background() {
        let filter = filter_node(SRCERASE).unwrap();
        assert_eq!(filter.attr("id"), Some("SRCERASE_FILTER"));
        let steps = filter.children();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].attr("in"), Some("BackgroundImage"));
        assert_eq!(steps[0].attr("values"), Some(INVERT_MATRIX));
        assert_eq!(steps[1].attr("in2"), Some("result0"));
    }

    #[test]
    fn test_every_named_rop_builds() {
        for rop in [
            BLACKNESS, NOTSRCERASE, NOTSRCCOPY, SRCERASE, DSTINVERT, SRCAND, MERGEPAINT,
            SRCPAINT, WHITENESS,
        ] {
            let filter = filter_node(rop).unwrap();
            assert_eq!(filter.attr("id"), filter_name(rop));
            assert!(!filter.children().is_empty());
        }
    }
}
