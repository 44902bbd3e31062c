//! Drawing laid-out text onto images
//!
//! Glyph coverage masks are alpha-blended onto the target one pixel at a time; pixels outside the
//! image are clipped.

use image::{Pixel as _, Rgba, RgbaImage};
use itertools::iproduct;

use crate::fixed::{Fixed, Point};
use crate::font::{Face, Glyph};
use crate::render::TextLayout;

/// Draws every line of `layout` onto `image` in `fill`.
///
/// With an `outline` color, each line is first drawn four times in that color, shifted diagonally
/// by a sixteenth of the line height in each direction, and then once in `fill` on top.
pub fn draw_layout<Fc: Face>(
    image: &mut RgbaImage,
    layout: &TextLayout<Fc>,
    fill: Rgba<u8>,
    outline: Option<Rgba<u8>>,
) {
    let face = layout.face();
    let offset = outline_offset(face.line_height());
    let shifts = [
        Point::new(offset, offset),
        Point::new(-offset, offset),
        Point::new(-offset, -offset),
        Point::new(offset, -offset),
    ];
    for line in layout.lines() {
        if let Some(outline) = outline {
            for shift in shifts {
                let origin = Point::new(
                    line.origin.x.saturating_add(shift.x),
                    line.origin.y.saturating_add(shift.y),
                );
                draw_text(image, face, &line.text, origin, outline);
            }
        }
        draw_text(image, face, &line.text, line.origin, fill);
    }
}

/// Draws `text` with its baseline starting at `origin`, advancing the pen the way
/// [`wrap`](crate::render::wrap) measures it.
pub fn draw_text<Fc: Face + ?Sized>(
    image: &mut RgbaImage,
    face: &Fc,
    text: &str,
    origin: Point,
    color: Rgba<u8>,
) {
    let mut pen = origin;
    let mut prev = None;
    for c in text.chars() {
        let Some(advance) = face.glyph_advance(c) else {
            continue;
        };
        if let Some(prev) = prev {
            pen.x = pen.x.saturating_add(face.kern(prev, c));
        }
        if let Some(glyph) = face.glyph(c) {
            blit(image, &glyph, pen, color);
        }
        pen.x = pen.x.saturating_add(advance);
        prev = Some(c);
    }
}

fn blit(image: &mut RgbaImage, glyph: &Glyph, pen: Point, color: Rgba<u8>) {
    let left = pen.x.round().saturating_add(glyph.left);
    let top = pen.y.round().saturating_add(glyph.top);
    for (row, column) in iproduct!(0..glyph.height, 0..glyph.width) {
        let coverage = glyph.coverage_at(column, row);
        if coverage == 0 {
            continue;
        }
        let (Some(x), Some(y)) = (offset(left, column), offset(top, row)) else {
            continue;
        };
        let Some(pixel) = image.get_pixel_mut_checked(x, y) else {
            continue;
        };
        let mut source = color;
        source[3] = scale_alpha(color[3], coverage);
        pixel.blend(&source);
    }
}

/// `start + step` as an image coordinate, if it is one.
fn offset(start: i32, step: usize) -> Option<u32> {
    let step = i32::try_from(step).ok()?;
    u32::try_from(start.checked_add(step)?).ok()
}

fn scale_alpha(alpha: u8, coverage: u8) -> u8 {
    ((u32::from(alpha) * u32::from(coverage) + 127) / 255) as u8
}

/// The amount by which outline copies are shifted for a given line height.
#[must_use]
pub fn outline_offset(line_height: Fixed) -> Fixed {
    line_height / 16
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::{outline_offset, scale_alpha};
    use crate::fixed::Fixed;
    use crate::font::tests::BoxFont;
    use crate::render::{HorizontalAlignment, Rect, Slot, VerticalAlignment};

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    /// At 20px, `BoxFont` glyphs are 10px wide and 14px tall, and the first baseline of a
    /// top-aligned slot at y = 0 is at y = 25.
    fn slot(font: &BoxFont, x: i32) -> Slot<&BoxFont> {
        Slot::new(Rect::new(x, 0, 100, 40), font)
            .max_font_size(20.0)
            .horizontal_alignment(HorizontalAlignment::Start)
            .vertical_alignment(VerticalAlignment::Start)
    }

    fn canvas() -> RgbaImage {
        RgbaImage::from_pixel(60, 40, WHITE)
    }

    #[test]
    fn fills_glyph_boxes() {
        let font = BoxFont::new();
        let mut image = canvas();
        slot(&font, 0).render(&mut image, "ab").unwrap();
        assert_eq!(image[(0, 11)], BLACK);
        assert_eq!(image[(19, 24)], BLACK);
        assert_eq!(image[(20, 11)], WHITE);
        assert_eq!(image[(0, 10)], WHITE);
        assert_eq!(image[(0, 25)], WHITE);
    }

    #[test]
    fn clips_at_image_edges() {
        let font = BoxFont::new();
        let mut image = canvas();
        slot(&font, -5).render(&mut image, "ab").unwrap();
        assert_eq!(image[(0, 11)], BLACK);
        assert_eq!(image[(14, 11)], BLACK);
        assert_eq!(image[(15, 11)], WHITE);

        let mut image = canvas();
        slot(&font, 50).render(&mut image, "abcdef").unwrap();
        assert_eq!(image[(59, 11)], BLACK);
    }

    #[test]
    fn outline_is_drawn_under_fill() {
        let font = BoxFont::new();
        let mut image = canvas();
        slot(&font, 0)
            .text_color(RED)
            .outline_color(BLUE)
            .render(&mut image, "ab")
            .unwrap();
        // The line height of 25px puts the outline copies 1.5625px away, rounded to 2px.
        assert_eq!(image[(5, 15)], RED);
        assert_eq!(image[(21, 26)], BLUE);
        assert_eq!(image[(0, 9)], BLUE);
        assert_eq!(image[(21, 9)], BLUE);
        assert_eq!(image[(25, 30)], WHITE);
    }

    #[test]
    fn transparent_text_changes_nothing() {
        let font = BoxFont::new();
        let mut image = canvas();
        slot(&font, 0)
            .text_color(Rgba([0, 0, 0, 0]))
            .render(&mut image, "ab")
            .unwrap();
        assert!(image.pixels().all(|pixel| *pixel == WHITE));
    }

    #[test]
    fn coverage_scales_alpha() {
        assert_eq!(scale_alpha(255, 255), 255);
        assert_eq!(scale_alpha(255, 0), 0);
        assert_eq!(scale_alpha(128, 255), 128);
        assert_eq!(scale_alpha(255, 128), 128);
        assert_eq!(
            outline_offset(Fixed::from_px(32, "test").unwrap()),
            Fixed::from_px(2, "test").unwrap()
        );
    }
}
