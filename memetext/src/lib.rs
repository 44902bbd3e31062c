//! A crate for fitting captions into the text slots of image templates and drawing them.
//!
//! # Features
//!
//! - Picks the largest legible font size at which text fits a slot
//!   ([`Slot::layout`](crate::render::Slot::layout))
//! - Greedy line breaking at whitespace, force-breaking words that are too long
//!   ([`wrap`](crate::render::wrap))
//! - Horizontal and vertical alignment ([`HorizontalAlignment`](crate::render::HorizontalAlignment),
//!   [`VerticalAlignment`](crate::render::VerticalAlignment))
//! - Filled and outlined text, alpha-blended onto an [`RgbaImage`](image::RgbaImage)
//!   ([`compose`])
//! - Templates with slot metadata in TOML ([`template`])
//!
//! All layout arithmetic is done in 26.6 fixed point ([`fixed`]); slot geometry that does not fit
//! is reported as an error instead of wrapping around.
//!
//! # Example
//!
//! ```no_run
//! # use image::{Rgba, RgbaImage};
//! # use memetext::font::TrueTypeFont;
//! # use memetext::render::{Rect, Slot};
//! let impact = TrueTypeFont::open("impact.ttf")?;
//! let mut image = RgbaImage::from_pixel(640, 480, Rgba([255, 255, 255, 255]));
//! Slot::new(Rect::new(10, 10, 620, 120), &impact)
//!     .uppercase(true)
//!     .text_color(Rgba([255, 255, 255, 255]))
//!     .outline_color(Rgba([0, 0, 0, 255]))
//!     .render(&mut image, "brace yourself")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod compose;
pub mod fixed;
pub mod font;
pub mod render;
pub mod template;
