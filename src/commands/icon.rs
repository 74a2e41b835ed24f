//! `render-icon` command

use crate::core::error::ReleaseResult;
use crate::icon;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct IconReport {
  svg: PathBuf,
  icon: PathBuf,
  sizes: Vec<u32>,
}

/// Run the render-icon command
pub fn run_render_icon(svg: &Path, output: Option<&Path>, json: bool) -> ReleaseResult<()> {
  let dest = output.map(Path::to_path_buf).unwrap_or_else(|| icon::default_output(svg));
  let sizes = icon::render_icon(svg, &dest)?;

  if json {
    let report = IconReport {
      svg: svg.to_path_buf(),
      icon: dest,
      sizes,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    let sizes = sizes.iter().map(u32::to_string).collect::<Vec<_>>().join(", ");
    println!("🖼️  Wrote {} ({} px)", dest.display(), sizes);
  }
  Ok(())
}
