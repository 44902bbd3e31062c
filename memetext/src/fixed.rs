//! 26.6 fixed-point arithmetic
//!
//! Every length the layout engine works with (advances, kerning, line heights, slot bounds and
//! draw origins) is a [`Fixed`]: a signed 32-bit integer counting 1/64ths of a pixel. Integer
//! pixel quantities enter this domain only through [`Fixed::from_px`], which refuses values that
//! would not fit instead of wrapping.

use std::fmt::{self, Display};
use std::ops::{Add, AddAssign, Div, Neg, Sub};

use thiserror::Error;

/// Number of sub-pixel units in one pixel.
pub const UNITS_PER_PIXEL: i32 = 64;

/// A signed 26.6 fixed-point number of pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed(i32);

impl Fixed {
    /// Zero pixels.
    pub const ZERO: Self = Self(0);
    /// The smallest representable step, 1/64 of a pixel.
    pub const EPSILON: Self = Self(1);

    /// Wraps a raw count of sub-pixel units.
    #[must_use]
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    /// The raw count of sub-pixel units.
    #[must_use]
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    /// Converts a whole number of pixels, naming the quantity in the error if it does not fit.
    ///
    /// ```
    /// # use memetext::fixed::Fixed;
    /// assert_eq!(Fixed::from_px(640, "width").unwrap().to_bits(), 640 * 64);
    /// assert!(Fixed::from_px(i64::from(i32::MAX), "width").is_err());
    /// ```
    ///
    /// # Errors
    /// Returns [`ConversionError`] if `px * 64` lies outside the `i32` range.
    pub fn from_px(px: impl Into<i64>, what: &'static str) -> Result<Self, ConversionError> {
        let px = px.into();
        px.checked_mul(i64::from(UNITS_PER_PIXEL))
            .and_then(|units| i32::try_from(units).ok())
            .map(Self)
            .ok_or(ConversionError { what, px })
    }

    /// Rounds a fractional pixel length to the nearest sub-pixel unit.
    ///
    /// Out-of-range values saturate and NaN becomes zero; font metrics never get anywhere near
    /// either.
    #[must_use]
    pub fn from_f32(px: f32) -> Self {
        Self((px * UNITS_PER_PIXEL as f32).round() as i32)
    }

    /// Whole pixels, rounding towards negative infinity.
    #[must_use]
    pub const fn floor(self) -> i32 {
        self.0 >> 6
    }

    /// Whole pixels, rounding half-way values up.
    #[must_use]
    pub const fn round(self) -> i32 {
        (self.0 >> 6) + ((self.0 >> 5) & 1)
    }

    /// Fixed-point product, rounded to the nearest unit. `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        let product = i64::from(self.0) * i64::from(rhs.0);
        i32::try_from((product + 32) >> 6).ok().map(Self)
    }

    /// `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(sum) => Some(Self(sum)),
            None => None,
        }
    }

    /// Clamps at the numeric bounds instead of overflowing.
    #[must_use]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Add for Fixed {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Fixed {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Fixed {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// Division by an integer, truncating towards zero.
impl Div<i32> for Fixed {
    type Output = Self;

    fn div(self, rhs: i32) -> Self {
        Self(self.0 / rhs)
    }
}

impl Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}:{:02}", abs >> 6, abs & 63)
    }
}

/// A position in 26.6 fixed-point pixels, `y` growing downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal coordinate
    pub x: Fixed,
    /// Vertical coordinate
    pub y: Fixed,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }
}

/// A pixel quantity that cannot be represented in 26.6 fixed point
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("{what} of {px}px does not fit in 26.6 fixed point")]
pub struct ConversionError {
    /// What was being converted, e.g. `"slot width"`
    pub what: &'static str,
    /// The offending value in pixels (or a count, for line totals)
    pub px: i64,
}
