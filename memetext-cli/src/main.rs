//! Renders captions onto a meme template.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use image::DynamicImage;
use log::info;
use memetext::font::{FontLibrary, TrueTypeFont};
use memetext::template::Template;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let fonts = cli.fonts()?;
    let metadata = cli
        .slots
        .clone()
        .unwrap_or_else(|| cli.image.with_extension("toml"));
    let template = Template::open(&cli.image, &metadata, &fonts).with_context(|| {
        format!(
            "failed to load template {} with slots from {}",
            cli.image.display(),
            metadata.display()
        )
    })?;
    let rendered = template
        .render(cli.text.as_slice())
        .with_context(|| format!("failed to render {}", template.name()))?;
    DynamicImage::ImageRgba8(rendered)
        .into_rgb8()
        .save(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!("wrote {}", cli.output.display());
    Ok(())
}

/// Draw captions into the text slots of a template image
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Captions, one per slot in order
    text: Vec<String>,
    /// The template image
    #[arg(long)]
    image: PathBuf,
    /// Slot metadata, defaulting to the image path with a `.toml` extension
    #[arg(long)]
    slots: Option<PathBuf>,
    /// A font to make available to slots, as NAME=PATH
    #[arg(long = "font", value_name = "NAME=PATH", value_parser = parse_font)]
    fonts: Vec<(String, PathBuf)>,
    /// A directory of .ttf/.otf fonts, each named by its file stem
    #[arg(long)]
    font_dir: Option<PathBuf>,
    /// Where to write the result; the format follows the extension
    #[arg(short = 'o', long)]
    output: PathBuf,
}

impl Cli {
    fn fonts(&self) -> Result<FontLibrary> {
        let mut library = if let Some(dir) = &self.font_dir {
            FontLibrary::load_dir(dir)
                .with_context(|| format!("failed to load fonts from {}", dir.display()))?
        } else {
            FontLibrary::new()
        };
        for (name, path) in &self.fonts {
            let font = TrueTypeFont::open(path)
                .with_context(|| format!("failed to load font {name} from {}", path.display()))?;
            if library.insert(name.as_str(), font).is_some() {
                info!("font {name} from {} replaces an earlier one", path.display());
            }
        }
        Ok(library)
    }
}

fn parse_font(arg: &str) -> Result<(String, PathBuf), String> {
    match arg.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_owned(), PathBuf::from(path)))
        }
        _ => Err(format!("expected NAME=PATH, got {arg:?}")),
    }
}
