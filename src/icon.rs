//! Windows icon renderer
//!
//! Rasterises an SVG logo at each standard icon size and packs the images
//! into one `.ico` file. Every size is rendered from the vector source rather
//! than downscaled from the largest bitmap.

use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use crate::utils;
use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Square sizes written into the icon, smallest first
pub const ICON_SIZES: [u32; 7] = [16, 24, 32, 48, 64, 128, 256];

/// Default destination: the SVG path with an `.ico` extension
pub fn default_output(svg: &Path) -> PathBuf {
  svg.with_extension("ico")
}

/// Render `svg` into a multi-size `.ico` at `dest`; returns the sizes written
pub fn render_icon(svg: &Path, dest: &Path) -> ReleaseResult<Vec<u32>> {
  if !svg.is_file() {
    return Err(ReleaseError::missing(svg, "SVG file"));
  }
  let data = fs::read(svg).with_context(|| format!("Failed to read {}", svg.display()))?;
  let tree = usvg::Tree::from_data(&data, &usvg::Options::default()).map_err(|e| {
    ReleaseError::with_help(
      format!("Couldn't parse {} as SVG: {}", svg.display(), e),
      "Export the logo as plain SVG (no compressed .svgz).",
    )
  })?;

  let mut icon = IconDir::new(ResourceType::Icon);
  for size in ICON_SIZES {
    let image = rasterize(&tree, size)?;
    icon.add_entry(IconDirEntry::encode(&image).context(format!("Failed to encode {size}x{size} icon image"))?);
    debug!(size, "icon image rendered");
  }

  let mut encoded = Vec::new();
  icon.write(&mut encoded).context("Failed to encode icon")?;
  utils::write_atomic(dest, &encoded)?;

  Ok(ICON_SIZES.to_vec())
}

/// Fit the drawing into a `size`x`size` square, centred, keeping its aspect ratio
fn rasterize(tree: &usvg::Tree, size: u32) -> ReleaseResult<IconImage> {
  let mut pixmap =
    Pixmap::new(size, size).ok_or_else(|| ReleaseError::message(format!("Cannot allocate a {size}x{size} image")))?;

  let bounds = tree.size();
  let scale = (size as f32 / bounds.width()).min(size as f32 / bounds.height());
  let dx = (size as f32 - bounds.width() * scale) / 2.0;
  let dy = (size as f32 - bounds.height() * scale) / 2.0;
  resvg::render(tree, Transform::from_row(scale, 0.0, 0.0, scale, dx, dy), &mut pixmap.as_mut());

  // ICO wants straight alpha; tiny-skia stores premultiplied pixels
  let rgba = pixmap
    .pixels()
    .iter()
    .flat_map(|p| {
      let c = p.demultiply();
      [c.red(), c.green(), c.blue(), c.alpha()]
    })
    .collect();
  Ok(IconImage::from_rgba_data(size, size, rgba))
}
