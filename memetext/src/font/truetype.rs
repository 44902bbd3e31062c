use std::fmt;
use std::fs;
use std::path::Path;

use fontdue::FontSettings;

use super::{Face, Font, FontError, Glyph};
use crate::fixed::Fixed;

/// A parsed TrueType or OpenType font
pub struct TrueTypeFont {
    inner: fontdue::Font,
}

impl TrueTypeFont {
    /// Parses the contents of a `.ttf` or `.otf` file.
    ///
    /// # Errors
    /// Returns [`FontError::Parse`] if `fontdue` rejects the data.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self, FontError> {
        let inner = fontdue::Font::from_bytes(bytes.as_ref(), FontSettings::default())
            .map_err(FontError::Parse)?;
        Ok(Self { inner })
    }

    /// Reads and parses a font file.
    ///
    /// # Errors
    /// Returns [`FontError::Io`] if the file cannot be read and [`FontError::Parse`] if it is not a
    /// font.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FontError> {
        Self::from_bytes(fs::read(path)?)
    }

    /// Number of glyphs in the font.
    #[must_use]
    pub fn glyph_count(&self) -> u16 {
        self.inner.glyph_count()
    }
}

impl fmt::Debug for TrueTypeFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrueTypeFont")
            .field("glyph_count", &self.inner.glyph_count())
            .finish()
    }
}

impl Font for TrueTypeFont {
    type Face<'a> = TrueTypeFace<'a>;

    /// Lines are one em apart, whatever ascent, descent and line gap the font declares.
    fn face(&self, size: f32) -> TrueTypeFace<'_> {
        TrueTypeFace {
            font: &self.inner,
            size,
            line_height: Fixed::from_f32(size),
        }
    }
}

/// A [`TrueTypeFont`] at one size
#[derive(Clone, Copy)]
pub struct TrueTypeFace<'font> {
    font: &'font fontdue::Font,
    size: f32,
    line_height: Fixed,
}

impl TrueTypeFace<'_> {
    /// Glyph index 0 is `.notdef`, which `fontdue` hands out for unmapped characters.
    fn index(&self, c: char) -> Option<u16> {
        let index = self.font.lookup_glyph_index(c);
        (index != 0).then_some(index)
    }
}

impl fmt::Debug for TrueTypeFace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrueTypeFace")
            .field("size", &self.size)
            .field("line_height", &self.line_height)
            .finish_non_exhaustive()
    }
}

impl Face for TrueTypeFace<'_> {
    fn size(&self) -> f32 {
        self.size
    }

    fn line_height(&self) -> Fixed {
        self.line_height
    }

    fn glyph_advance(&self, c: char) -> Option<Fixed> {
        let index = self.index(c)?;
        let metrics = self.font.metrics_indexed(index, self.size);
        Some(Fixed::from_f32(metrics.advance_width))
    }

    fn kern(&self, left: char, right: char) -> Fixed {
        self.index(left)
            .zip(self.index(right))
            .and_then(|(left, right)| self.font.horizontal_kern_indexed(left, right, self.size))
            .map_or(Fixed::ZERO, Fixed::from_f32)
    }

    fn glyph(&self, c: char) -> Option<Glyph> {
        let index = self.index(c)?;
        let (metrics, coverage) = self.font.rasterize_indexed(index, self.size);
        // fontdue measures `ymin` upwards from the baseline to the bottom of the bitmap
        let top = -(metrics.ymin + metrics.height as i32);
        Some(Glyph {
            width: metrics.width,
            height: metrics.height,
            left: metrics.xmin,
            top,
            coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::TrueTypeFont;
    use crate::fixed::Fixed;
    use crate::font::{Face as _, Font as _};
    use crate::render::{Rect, Slot, VerticalAlignment};

    /// DejaVu Sans ExtraLight, 2048 units per em. At 64px one unit is exactly 1/32px.
    const DEJAVU: &[u8] = include_bytes!("../../testdata/DejaVuSans-ExtraLight.ttf");
    const SIZE: f32 = 64.0;

    fn font() -> TrueTypeFont {
        TrueTypeFont::from_bytes(DEJAVU).unwrap()
    }

    #[test]
    fn line_height_is_one_em() {
        let font = font();
        for size in [6.0, 20.0, 64.0, 80.0] {
            assert_eq!(font.face(size).line_height(), Fixed::from_f32(size));
        }
    }

    #[test]
    fn advances_and_kerning() {
        let font = font();
        let face = font.face(SIZE);
        // 1401 and 1212 units
        assert_eq!(face.glyph_advance('A'), Some(Fixed::from_bits(2802)));
        assert_eq!(face.glyph_advance('x'), Some(Fixed::from_bits(2424)));
        // -131 units in the first horizontal kern subtable
        assert_eq!(face.kern('A', 'V'), Fixed::from_bits(-262));
        assert_eq!(face.kern('A', 'x'), Fixed::ZERO);
    }

    #[test]
    fn missing_glyphs() {
        let font = font();
        let face = font.face(SIZE);
        assert_eq!(face.glyph_advance('\u{4e2d}'), None);
        assert_eq!(face.glyph('\u{4e2d}'), None);
        assert_eq!(face.kern('A', '\u{4e2d}'), Fixed::ZERO);
    }

    #[test]
    fn glyphs_hang_from_the_baseline() {
        let font = font();
        let face = font.face(SIZE);
        // 'x' sits on the baseline and is 1120 units (35px) tall.
        let x = face.glyph('x').unwrap();
        assert_eq!(x.top + x.height as i32, 0);
        assert!((34..=36).contains(&-x.top));
        assert!(x.coverage.iter().any(|&coverage| coverage > 0));
        // 'p' descends 426 units (13.3px) below it.
        let p = face.glyph('p').unwrap();
        assert_eq!(p.top + p.height as i32, 14);
        assert!(p.top < -30);
    }

    #[test]
    fn baselines_are_one_size_apart() {
        let font = font();
        let slot = Slot::new(Rect::new(0, 0, 640, 200), &font)
            .vertical_alignment(VerticalAlignment::Start);
        let layout = slot
            .layout("brace yourself. memes are coming.")
            .unwrap()
            .unwrap();
        let em = Fixed::from_f32(layout.font_size());
        assert_eq!(layout.lines()[0].origin.y, em);
        for pair in layout.lines().windows(2) {
            assert_eq!(pair[1].origin.y - pair[0].origin.y, em);
        }
    }
}
