//! Fonts
//!
//! The layout engine only needs a handful of metrics from a font, always at one particular size:
//! the advance width of each character, the kerning between two adjacent characters and the
//! distance between baselines. [`Font`] produces a [`Face`] bound to a size, and the face answers
//! those questions in [`Fixed`] units. Drawing additionally asks the face for a rasterized
//! [`Glyph`].
//!
//! [`TrueTypeFont`] implements these traits for TrueType/OpenType data via `fontdue`, and
//! [`FontLibrary`] keeps a set of parsed fonts by name.

mod library;
mod truetype;

use std::sync::Arc;

use thiserror::Error;

use crate::fixed::Fixed;

pub use library::FontLibrary;
pub use truetype::{TrueTypeFace, TrueTypeFont};

/// A scalable font
///
/// Implemented for references and [`Arc`]s of fonts, so slots can share one parsed font.
pub trait Font {
    /// The metrics of this font at one size.
    type Face<'a>: Face
    where
        Self: 'a;

    /// Returns the face for the given size in pixels per em.
    fn face(&self, size: f32) -> Self::Face<'_>;
}

/// Glyph metrics of a font at a fixed size
pub trait Face {
    /// The size in pixels per em this face was created for.
    fn size(&self) -> f32;

    /// Distance between the baselines of two consecutive lines.
    fn line_height(&self) -> Fixed;

    /// Horizontal advance of `c`, or `None` if the font has no glyph for it.
    fn glyph_advance(&self, c: char) -> Option<Fixed>;

    /// Adjustment to the advance between `left` and `right` when they are adjacent.
    fn kern(&self, left: char, right: char) -> Fixed;

    /// Rasterizes `c`. `None` if the font has no glyph for it.
    fn glyph(&self, c: char) -> Option<Glyph>;
}

impl<T: Font + ?Sized> Font for &T {
    type Face<'a>
        = T::Face<'a>
    where
        Self: 'a;

    fn face(&self, size: f32) -> Self::Face<'_> {
        (**self).face(size)
    }
}

impl<T: Font + ?Sized> Font for Arc<T> {
    type Face<'a>
        = T::Face<'a>
    where
        Self: 'a;

    fn face(&self, size: f32) -> Self::Face<'_> {
        (**self).face(size)
    }
}

/// A rasterized glyph: an 8-bit coverage mask and its placement relative to the pen position
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    /// Width of the mask in pixels.
    pub width: usize,
    /// Height of the mask in pixels.
    pub height: usize,
    /// Offset from the pen position to the left edge of the mask.
    pub left: i32,
    /// Offset from the baseline to the top row of the mask, negative above the baseline.
    pub top: i32,
    /// Row-major coverage, `width * height` values from 0 (empty) to 255 (fully covered).
    pub coverage: Vec<u8>,
}

impl Glyph {
    /// Coverage at a position inside the mask.
    #[must_use]
    pub fn coverage_at(&self, column: usize, row: usize) -> u8 {
        self.coverage[row * self.width + column]
    }
}

/// An error loading a font
#[derive(Debug, Error)]
pub enum FontError {
    /// The data is not a font `fontdue` understands.
    #[error("failed to parse font: {0}")]
    Parse(&'static str),
    /// The font file could not be read.
    #[error("failed to read font: {0}")]
    Io(#[from] std::io::Error),
}
