//! Alignment and placement of wrapped lines inside a slot

use serde::Deserialize;

use super::{Rect, WrappedLine};
use crate::fixed::{ConversionError, Fixed, Point};

/// Horizontal placement of each line inside a slot
///
/// The default is [`HorizontalAlignment::Center`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlignment {
    /// Flush with the left edge.
    Start,
    /// Centered; an odd remainder of sub-pixel units goes to the right.
    #[default]
    Center,
    /// Flush with the right edge.
    End,
}

impl HorizontalAlignment {
    /// Offset from the left edge for a line `used` wide in a slot `available` wide.
    const fn offset(self, available: Fixed, used: Fixed) -> Fixed {
        let slack = available.to_bits() - used.to_bits();
        Fixed::from_bits(match self {
            Self::Start => 0,
            Self::Center => slack / 2,
            Self::End => slack,
        })
    }
}

/// Vertical placement of the block of lines inside a slot
///
/// The default is [`VerticalAlignment::Middle`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    /// Against the top edge.
    Start,
    /// Centered.
    #[default]
    Middle,
    /// Against the bottom edge.
    End,
}

impl VerticalAlignment {
    const fn offset(self, available: Fixed, used: Fixed) -> Fixed {
        let slack = available.to_bits() - used.to_bits();
        Fixed::from_bits(match self {
            Self::Start => 0,
            Self::Middle => slack / 2,
            Self::End => slack,
        })
    }
}

/// Computes the baseline origin of every line.
///
/// The block of lines is `line_height` times the line count tall and placed according to
/// `vertical`; the first baseline sits one line height below the top of the block. Each line is
/// then placed inside the slot's width according to `horizontal`.
pub(crate) fn position(
    bounds: Rect,
    line_height: Fixed,
    lines: &[WrappedLine],
    horizontal: HorizontalAlignment,
    vertical: VerticalAlignment,
) -> Result<Vec<Point>, ConversionError> {
    let left = Fixed::from_px(bounds.x, "slot left edge")?;
    let top = Fixed::from_px(bounds.y, "slot top edge")?;
    let width = Fixed::from_px(bounds.width, "slot width")?;
    let height = Fixed::from_px(bounds.height, "slot height")?;
    let line_count = i64::try_from(lines.len()).unwrap_or(i64::MAX);
    let overflow = ConversionError {
        what: "line position",
        px: line_count,
    };
    let block_height = line_height
        .checked_mul(Fixed::from_px(line_count, "line count")?)
        .ok_or(overflow)?;

    let mut y = top
        .checked_add(vertical.offset(height, block_height))
        .ok_or(overflow)?;
    lines
        .iter()
        .map(|line| {
            let x = left
                .checked_add(horizontal.offset(width, line.width))
                .ok_or(overflow)?;
            y = y.checked_add(line_height).ok_or(overflow)?;
            Ok(Point::new(x, y))
        })
        .collect()
}
