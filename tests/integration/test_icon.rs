//! Integration tests for `feis-release render-icon`

use crate::helpers::{run_feis_release, run_feis_release_raw};
use anyhow::Result;
use tempfile::TempDir;

const LOGO: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="32" height="32">
  <circle cx="16" cy="16" r="12" fill="#3366ff"/>
</svg>"##;

#[test]
fn test_render_icon_next_to_svg() -> Result<()> {
  let dir = TempDir::new()?;
  std::fs::create_dir_all(dir.path().join("images"))?;
  std::fs::write(dir.path().join("images/feis.svg"), LOGO)?;

  let output = run_feis_release(dir.path(), &["render-icon", "images/feis.svg", "--json"])?;
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(report["icon"], "images/feis.ico");
  assert_eq!(report["sizes"].as_array().map(Vec::len), Some(7));
  let icon = std::fs::read(dir.path().join("images/feis.ico"))?;
  // ICONDIR header: reserved 0, type 1 (icon), 7 images
  assert_eq!(&icon[..6], &[0, 0, 1, 0, 7, 0]);
  Ok(())
}

#[test]
fn test_render_icon_missing_svg() -> Result<()> {
  let dir = TempDir::new()?;

  let output = run_feis_release_raw(dir.path(), &["render-icon", "feis.svg"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("SVG file"));
  Ok(())
}
