//! Templates: a base image and the slots captions go into
//!
//! Slot metadata lives in a TOML file next to the image:
//! ```
//! # use memetext::template::TemplateSpec;
//! let spec = TemplateSpec::from_toml(r#"
//!     aliases = ["winter"]
//!
//!     [[slot]]
//!     font = "impact"
//!     bounds = { x = 10, y = 10, width = 600, height = 120 }
//!     uppercase = true
//!     text_color = [255, 255, 255, 255]
//!     outline_color = [0, 0, 0, 255]
//!
//!     [[slot]]
//!     font = "impact"
//!     bounds = { x = 10, y = 350, width = 600, height = 120 }
//!     vertical_alignment = "end"
//! "#).unwrap();
//! assert_eq!(spec.slots.len(), 2);
//! ```

use std::fs;
use std::iter;
use std::path::Path;
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use crate::font::{Font, FontLibrary};
use crate::render::{HorizontalAlignment, Rect, RenderError, Slot, VerticalAlignment};

/// A base image with an ordered list of text slots
#[derive(Clone, Debug)]
pub struct Template<F> {
    name: String,
    aliases: Vec<String>,
    image: RgbaImage,
    slots: Vec<Slot<F>>,
}

impl<F> Template<F> {
    /// Creates a template without aliases.
    #[must_use]
    pub fn new(name: impl Into<String>, image: RgbaImage, slots: Vec<Slot<F>>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            image,
            slots,
        }
    }

    /// Adds another name the template can be looked up by.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// The primary name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alternative names.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The image text is drawn onto. Rendering never modifies it.
    #[must_use]
    pub const fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// The slots, in the order texts are assigned to them.
    #[must_use]
    pub fn slots(&self) -> &[Slot<F>] {
        &self.slots
    }
}

impl<F: Font> Template<F> {
    /// Draws `texts` onto a copy of the base image, the first text into the first slot and so on.
    ///
    /// Slots without a text stay empty and texts without a slot are ignored.
    ///
    /// # Errors
    /// Fails if any slot's geometry cannot be laid out; see [`Slot::layout`].
    pub fn render<S: AsRef<str>>(&self, texts: &[S]) -> Result<RgbaImage, RenderError> {
        if texts.len() > self.slots.len() {
            debug!(
                "{}: ignoring {} texts beyond its {} slots",
                self.name,
                texts.len() - self.slots.len(),
                self.slots.len()
            );
        }
        let mut image = self.image.clone();
        let texts = texts.iter().map(AsRef::as_ref).chain(iter::repeat(""));
        for (slot, text) in self.slots.iter().zip(texts) {
            slot.render(&mut image, text)?;
        }
        Ok(image)
    }
}

impl<F> Template<Arc<F>> {
    /// Loads a base image and the TOML slot metadata for it. The template is named after the
    /// image's file stem.
    ///
    /// # Errors
    /// Fails if either file cannot be read or parsed, or if the metadata names a font that is
    /// not in `fonts`.
    pub fn open(
        image_path: impl AsRef<Path>,
        metadata_path: impl AsRef<Path>,
        fonts: &FontLibrary<F>,
    ) -> Result<Self, TemplateError> {
        let image_path = image_path.as_ref();
        let name = image_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let image = image::open(image_path)?.into_rgba8();
        let spec = TemplateSpec::from_toml(&fs::read_to_string(metadata_path)?)?;
        let template = spec.build(name, image, fonts)?;
        info!(
            "loaded template {} ({}x{}, {} slots)",
            template.name,
            template.image.width(),
            template.image.height(),
            template.slots.len()
        );
        Ok(template)
    }
}

/// The metadata of a template as stored on disk
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateSpec {
    /// Alternative names for the template.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// The slots, from `[[slot]]` tables.
    #[serde(default, rename = "slot")]
    pub slots: Vec<SlotSpec>,
}

impl TemplateSpec {
    /// Parses template metadata.
    ///
    /// # Errors
    /// Returns [`TemplateError::Metadata`] if `source` is not valid metadata.
    pub fn from_toml(source: &str) -> Result<Self, TemplateError> {
        Ok(toml::from_str(source)?)
    }

    /// Combines the metadata with a base image, looking up slot fonts in `fonts`.
    ///
    /// # Errors
    /// Returns [`TemplateError::UnknownFont`] for the first slot whose font is not in `fonts`.
    pub fn build<F>(
        &self,
        name: impl Into<String>,
        image: RgbaImage,
        fonts: &FontLibrary<F>,
    ) -> Result<Template<Arc<F>>, TemplateError> {
        let slots = self
            .slots
            .iter()
            .map(|slot| slot.resolve(fonts))
            .collect::<Result<_, _>>()?;
        let template = Template::new(name, image, slots);
        Ok(self
            .aliases
            .iter()
            .fold(template, |template, alias| template.alias(alias)))
    }
}

/// One `[[slot]]` table of [`TemplateSpec`]
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotSpec {
    /// Where text goes, in pixels of the base image.
    pub bounds: Rect,
    /// Name of the font in the [`FontLibrary`].
    pub font: String,
    /// Largest font size to try; zero or absent means the default.
    #[serde(default)]
    pub max_font_size: f32,
    /// Defaults to `"center"`.
    #[serde(default)]
    pub horizontal_alignment: HorizontalAlignment,
    /// Defaults to `"middle"`.
    #[serde(default)]
    pub vertical_alignment: VerticalAlignment,
    /// `[r, g, b, a]`; opaque black if absent.
    #[serde(default)]
    pub text_color: Option<[u8; 4]>,
    /// `[r, g, b, a]`; no outline if absent.
    #[serde(default)]
    pub outline_color: Option<[u8; 4]>,
    /// Convert text to upper case.
    #[serde(default)]
    pub uppercase: bool,
}

impl SlotSpec {
    /// Builds the slot, looking up its font in `fonts`.
    ///
    /// # Errors
    /// Returns [`TemplateError::UnknownFont`] if the font is not in `fonts`.
    pub fn resolve<F>(&self, fonts: &FontLibrary<F>) -> Result<Slot<Arc<F>>, TemplateError> {
        let font = fonts
            .get(&self.font)
            .ok_or_else(|| TemplateError::UnknownFont(self.font.clone()))?;
        let mut slot = Slot::new(self.bounds, font)
            .max_font_size(self.max_font_size)
            .horizontal_alignment(self.horizontal_alignment)
            .vertical_alignment(self.vertical_alignment)
            .uppercase(self.uppercase);
        if let Some(color) = self.text_color {
            slot = slot.text_color(Rgba(color));
        }
        if let Some(color) = self.outline_color {
            slot = slot.outline_color(Rgba(color));
        }
        Ok(slot)
    }
}

/// An error loading a template
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A slot names a font that is not in the library.
    #[error("unknown font {0:?}")]
    UnknownFont(String),
    /// The metadata is not valid TOML or does not describe a template.
    #[error("invalid template metadata: {0}")]
    Metadata(#[from] toml::de::Error),
    /// A file could not be read.
    #[error("failed to read template: {0}")]
    Io(#[from] std::io::Error),
    /// The base image could not be decoded.
    #[error("failed to load template image: {0}")]
    Image(#[from] image::ImageError),
}

#[cfg(test)]
mod tests {
    use std::fs;

    use image::{Rgba, RgbaImage};

    use super::{Template, TemplateError, TemplateSpec};
    use crate::font::FontLibrary;
    use crate::font::tests::BoxFont;
    use crate::render::{HorizontalAlignment, Rect, RenderError, Slot, VerticalAlignment};

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    const METADATA: &str = r#"
        aliases = ["brace", "winter"]

        [[slot]]
        font = "impact"
        bounds = { x = 0, y = 0, width = 100, height = 30 }
        uppercase = true
        text_color = [255, 255, 255, 255]
        outline_color = [0, 0, 0, 255]

        [[slot]]
        font = "impact"
        bounds = { x = 0, y = 30, width = 100, height = 30 }
        horizontal_alignment = "start"
        vertical_alignment = "end"
        max_font_size = 40.0
    "#;

    fn library() -> FontLibrary<BoxFont> {
        let mut fonts = FontLibrary::new();
        fonts.insert("impact", BoxFont::new());
        fonts
    }

    fn blank() -> RgbaImage {
        RgbaImage::from_pixel(100, 60, WHITE)
    }

    fn is_blank(image: &RgbaImage, rows: std::ops::Range<u32>) -> bool {
        rows.flat_map(|y| (0..image.width()).map(move |x| (x, y)))
            .all(|(x, y)| image[(x, y)] == WHITE)
    }

    #[test]
    fn parse_metadata() {
        let spec = TemplateSpec::from_toml(METADATA).unwrap();
        assert_eq!(spec.aliases, ["brace", "winter"]);
        let [top, bottom] = &spec.slots[..] else {
            panic!("expected two slots");
        };
        assert_eq!(top.bounds, Rect::new(0, 0, 100, 30));
        assert_eq!(top.max_font_size, 0.0);
        assert_eq!(top.horizontal_alignment, HorizontalAlignment::Center);
        assert_eq!(top.vertical_alignment, VerticalAlignment::Middle);
        assert_eq!(top.outline_color, Some([0, 0, 0, 255]));
        assert!(top.uppercase);
        assert_eq!(bottom.horizontal_alignment, HorizontalAlignment::Start);
        assert_eq!(bottom.vertical_alignment, VerticalAlignment::End);
        assert_eq!(bottom.max_font_size, 40.0);
        assert_eq!(bottom.text_color, None);
        assert!(!bottom.uppercase);
    }

    #[test]
    fn reject_bad_metadata() {
        let typo = "[[slot]]\nfont = \"impact\"\nbounds = { x = 0, y = 0, width = 1, height = 1 }\n\
                    colour = [0, 0, 0, 255]";
        assert!(matches!(
            TemplateSpec::from_toml(typo),
            Err(TemplateError::Metadata(_))
        ));
        let missing_bounds = "[[slot]]\nfont = \"impact\"";
        assert!(TemplateSpec::from_toml(missing_bounds).is_err());
        assert_eq!(TemplateSpec::from_toml("").unwrap(), TemplateSpec::default());
    }

    #[test]
    fn build_resolves_fonts() {
        let spec = TemplateSpec::from_toml(METADATA).unwrap();
        let template = spec.build("brace-yourself", blank(), &library()).unwrap();
        assert_eq!(template.name(), "brace-yourself");
        assert_eq!(template.aliases(), ["brace", "winter"]);
        assert_eq!(template.slots().len(), 2);
        assert_eq!(template.slots()[0].fill(), WHITE);
        assert_eq!(template.slots()[1].fill(), Rgba([0, 0, 0, 255]));
        assert_eq!(template.slots()[1].outline(), None);

        let error = spec.build("x", blank(), &FontLibrary::<BoxFont>::new()).unwrap_err();
        assert!(matches!(error, TemplateError::UnknownFont(name) if name == "impact"));
    }

    #[test]
    fn render_assigns_texts_in_order() {
        let spec = TemplateSpec::from_toml(METADATA).unwrap();
        let template = spec.build("brace-yourself", blank(), &library()).unwrap();

        let top_only = template.render(&["top"]).unwrap();
        assert!(!is_blank(&top_only, 0..30));
        assert!(is_blank(&top_only, 30..60));
        assert!(is_blank(template.image(), 0..60));

        let with_extra = template.render(&["top", "", "ignored"]).unwrap();
        assert_eq!(with_extra, top_only);

        let both = template.render(&[String::from("top"), String::from("bottom")]).unwrap();
        assert!(!is_blank(&both, 30..60));

        let none = template.render::<&str>(&[]).unwrap();
        assert_eq!(&none, template.image());
    }

    #[test]
    fn render_stops_at_unrepresentable_slot() {
        let font = BoxFont::new();
        let slots = vec![
            Slot::new(Rect::new(0, 0, 100, 30), &font),
            Slot::new(Rect::new(0, 30, u32::MAX, 30), &font),
        ];
        let template = Template::new("broken", blank(), slots);
        assert!(matches!(
            template.render(&["a", "b"]),
            Err(RenderError::Conversion(_))
        ));
    }

    #[test]
    fn open_from_files() {
        let dir = std::env::temp_dir().join(format!("memetext-template-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let image_path = dir.join("brace-yourself.png");
        let metadata_path = dir.join("brace-yourself.toml");
        blank().save(&image_path).unwrap();
        fs::write(&metadata_path, METADATA).unwrap();

        let template = Template::open(&image_path, &metadata_path, &library()).unwrap();
        assert_eq!(template.name(), "brace-yourself");
        assert_eq!(template.image().dimensions(), (100, 60));
        assert_eq!(template.slots().len(), 2);

        let missing = Template::open(dir.join("nope.png"), &metadata_path, &library());
        assert!(matches!(missing, Err(TemplateError::Image(_))));
        fs::remove_dir_all(&dir).unwrap();
    }
}
