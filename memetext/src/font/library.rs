use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use itertools::Itertools as _;
use log::{debug, info};

use super::{FontError, TrueTypeFont};

/// Fonts by name
///
/// Built once while loading templates and only read afterwards. Each font is behind an [`Arc`] so
/// the slots that use it can hold on to it independently of the library.
#[derive(Debug)]
pub struct FontLibrary<F = TrueTypeFont> {
    fonts: HashMap<String, Arc<F>>,
}

impl<F> FontLibrary<F> {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fonts: HashMap::new(),
        }
    }

    /// Adds a font, returning the one previously registered under `name`, if any.
    pub fn insert(&mut self, name: impl Into<String>, font: F) -> Option<Arc<F>> {
        self.fonts.insert(name.into(), Arc::new(font))
    }

    /// Looks up a font by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<F>> {
        self.fonts.get(name).cloned()
    }

    /// The registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str).sorted_unstable()
    }

    /// Number of registered fonts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Returns true if no font is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

impl<F> Default for FontLibrary<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLibrary {
    /// Loads every `.ttf` and `.otf` file directly inside `dir`, named by file stem.
    ///
    /// # Errors
    /// Fails on the first file that cannot be read or parsed.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, FontError> {
        let mut library = Self::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_font = path
                .extension()
                .and_then(|extension| extension.to_str())
                .is_some_and(|extension| {
                    extension.eq_ignore_ascii_case("ttf") || extension.eq_ignore_ascii_case("otf")
                });
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if !is_font {
                debug!("skipping {}", path.display());
                continue;
            }
            let font = TrueTypeFont::open(&path)?;
            info!("loaded font {name} ({} glyphs)", font.glyph_count());
            drop(library.insert(name, font));
        }
        Ok(library)
    }
}
