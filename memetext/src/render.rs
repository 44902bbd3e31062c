//! Fitting text into slots
//!
//! A [`Slot`] is one rectangular text region of a template. [`Slot::layout`] finds the largest
//! font size at which the text, wrapped to the slot's width, has few enough lines to fit its
//! height, and positions those lines; [`Slot::render`] additionally draws them.
mod layout;
mod wrap;

use std::iter;

use image::{Rgba, RgbaImage};
use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::compose;
use crate::fixed::{ConversionError, Fixed, Point};
use crate::font::{Face, Font};

pub use layout::{HorizontalAlignment, VerticalAlignment};
pub use wrap::{WrappedLine, wrap};

/// Font size tried first when a slot does not set one.
pub const DEFAULT_MAX_FONT_SIZE: f32 = 80.0;

/// Below this size text is considered illegible and is not drawn at all.
pub const MIN_FONT_SIZE: f32 = 6.0;

/// An axis-aligned rectangle in whole pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A text region of a template and how text in it is styled
///
/// Use the builder methods to change the defaults set by [`Slot::new`]:
/// ```
/// # use image::Rgba;
/// # use memetext::render::{HorizontalAlignment, Rect, Slot, VerticalAlignment};
/// # fn slot<F: memetext::font::Font>(impact: F) -> Slot<F> {
/// Slot::new(Rect::new(10, 10, 620, 100), impact)
///     .max_font_size(64.0)
///     .vertical_alignment(VerticalAlignment::Start)
///     .text_color(Rgba([255, 255, 255, 255]))
///     .outline_color(Rgba([0, 0, 0, 255]))
///     .uppercase(true)
/// # }
/// ```
#[must_use]
#[derive(Clone, Debug)]
pub struct Slot<F> {
    bounds: Rect,
    font: F,
    max_font_size: f32,
    horizontal_alignment: HorizontalAlignment,
    vertical_alignment: VerticalAlignment,
    text_color: Option<Rgba<u8>>,
    outline_color: Option<Rgba<u8>>,
    uppercase: bool,
}

impl<F> Slot<F> {
    /// Creates a slot with centered black text, no outline and the default maximum font size.
    pub const fn new(bounds: Rect, font: F) -> Self {
        Self {
            bounds,
            font,
            max_font_size: 0.0,
            horizontal_alignment: HorizontalAlignment::Center,
            vertical_alignment: VerticalAlignment::Middle,
            text_color: None,
            outline_color: None,
            uppercase: false,
        }
    }

    /// Sets the largest font size to try. Zero selects [`DEFAULT_MAX_FONT_SIZE`].
    pub fn max_font_size(mut self, size: f32) -> Self {
        self.max_font_size = size;
        self
    }

    /// Sets the horizontal alignment of each line.
    pub fn horizontal_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.horizontal_alignment = alignment;
        self
    }

    /// Sets the vertical alignment of the text block.
    pub fn vertical_alignment(mut self, alignment: VerticalAlignment) -> Self {
        self.vertical_alignment = alignment;
        self
    }

    /// Sets the fill color. Text is opaque black otherwise.
    pub fn text_color(mut self, color: Rgba<u8>) -> Self {
        self.text_color = Some(color);
        self
    }

    /// Draws an outline of this color around the text.
    pub fn outline_color(mut self, color: Rgba<u8>) -> Self {
        self.outline_color = Some(color);
        self
    }

    /// Converts text to upper case before fitting it.
    pub fn uppercase(mut self, uppercase: bool) -> Self {
        self.uppercase = uppercase;
        self
    }

    /// The region text is fitted into.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The font text is set in.
    #[must_use]
    pub const fn font(&self) -> &F {
        &self.font
    }

    /// The fill color, defaulting to opaque black.
    #[must_use]
    pub fn fill(&self) -> Rgba<u8> {
        self.text_color.unwrap_or(Rgba([0, 0, 0, 255]))
    }

    /// The outline color, if text is outlined.
    #[must_use]
    pub const fn outline(&self) -> Option<Rgba<u8>> {
        self.outline_color
    }
}

impl<F: Font> Slot<F> {
    /// Finds the largest font size at which `text` fits and positions its lines.
    ///
    /// Sizes are tried in the order given by [`candidate_sizes`]. A size fits if `text`, wrapped to
    /// the slot width, has at most as many lines as whole line heights fit in the slot height.
    /// Empty text fits at the first size, with no lines.
    ///
    /// The text is used as given; [`Slot::render`] is what applies [`Slot::uppercase`].
    ///
    /// # Errors
    /// Returns [`RenderError::Conversion`] if the slot's geometry cannot be expressed in 26.6
    /// fixed point. Text that does not fit at any size is not an error: the result is `Ok(None)`.
    pub fn layout(&self, text: &str) -> Result<Option<TextLayout<F::Face<'_>>>, RenderError> {
        let width = Fixed::from_px(self.bounds.width, "slot width")?;
        // both dimensions must convert, whether or not anything fits
        Fixed::from_px(self.bounds.height, "slot height")?;
        for size in candidate_sizes(self.max_font_size) {
            let face = self.font.face(size);
            let line_budget = line_budget(self.bounds.height, face.line_height());
            let Some(lines) = wrap(&face, text, width) else {
                debug!("{size}px: a single character is wider than the slot");
                continue;
            };
            if lines.len() > line_budget {
                debug!("{size}px: {} lines > {line_budget}", lines.len());
                continue;
            }
            debug!("{size}px: {} lines fit", lines.len());
            let origins = layout::position(
                self.bounds,
                face.line_height(),
                &lines,
                self.horizontal_alignment,
                self.vertical_alignment,
            )?;
            let lines = lines
                .into_iter()
                .zip(origins)
                .map(|(line, origin)| Line {
                    text: line.text,
                    width: line.width,
                    origin,
                })
                .collect();
            return Ok(Some(TextLayout { face, lines }));
        }
        debug!("{text:?} does not fit at {MIN_FONT_SIZE}px or above");
        Ok(None)
    }

    /// Fits `text` into the slot and draws it onto `image`.
    ///
    /// Draws nothing if the text does not fit at any legible size.
    ///
    /// # Errors
    /// See [`Slot::layout`].
    pub fn render(&self, image: &mut RgbaImage, text: &str) -> Result<(), RenderError> {
        let layout = if self.uppercase {
            self.layout(&text.to_uppercase())?
        } else {
            self.layout(text)?
        };
        if let Some(layout) = layout {
            compose::draw_layout(image, &layout, self.fill(), self.outline_color);
        }
        Ok(())
    }
}

/// The font sizes tried for a slot, largest first.
///
/// Starts at `max_font_size` (or [`DEFAULT_MAX_FONT_SIZE`] if that is zero, negative or NaN) and shrinks
/// by a tenth of the current size, rounded up, until the size drops below [`MIN_FONT_SIZE`].
///
/// ```
/// # use memetext::render::candidate_sizes;
/// let sizes: Vec<f32> = candidate_sizes(30.0).collect();
/// assert_eq!(sizes, [30.0, 27.0, 24.0, 21.0, 18.0, 16.0, 14.0, 12.0, 10.0, 9.0, 8.0, 7.0, 6.0]);
/// ```
pub fn candidate_sizes(max_font_size: f32) -> impl Iterator<Item = f32> {
    let start = if max_font_size > 0.0 {
        max_font_size
    } else {
        DEFAULT_MAX_FONT_SIZE
    };
    iter::successors(Some(start), |size| Some(size - (size / 10.0).ceil()))
        .take_while(|&size| size >= MIN_FONT_SIZE)
}

/// How many lines of `line_height` fit in `height` whole pixels. A line height below one pixel
/// leaves room for no lines at all.
fn line_budget(height: u32, line_height: Fixed) -> usize {
    u32::try_from(line_height.floor())
        .ok()
        .filter(|&line_height| line_height > 0)
        .map_or(0, |line_height| (height / line_height) as usize)
}

/// Text fitted into a slot: the face at the chosen size and the positioned lines
#[derive(Clone, Debug)]
pub struct TextLayout<Fc> {
    face: Fc,
    lines: Vec<Line>,
}

impl<Fc: Face> TextLayout<Fc> {
    /// The face at the chosen size, to draw the lines with.
    pub const fn face(&self) -> &Fc {
        &self.face
    }

    /// The chosen font size.
    pub fn font_size(&self) -> f32 {
        self.face.size()
    }

    /// The lines in reading order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Returns true if there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A line of a [`TextLayout`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    /// The text of the line.
    pub text: String,
    /// Width of the line at the chosen size.
    pub width: Fixed,
    /// The pen position at the start of the baseline.
    pub origin: Point,
}

/// An error fitting text into a slot
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
    /// The slot's geometry does not fit in 26.6 fixed point.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}
