//! Integration tests for `feis-release wrap-save`

use crate::helpers::{TestWorkspace, run_feis_release, run_feis_release_raw};
use anyhow::Result;

#[test]
fn test_wrap_save_copies_meson_files() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_file("subprojects/imgui-sfml/meson.build", "project('imgui-sfml')")?;
  ws.write_file("subprojects/imgui-sfml/meson_options.txt", "")?;
  ws.write_file("subprojects/imgui-sfml/imgui-SFML.cpp", "// source")?;

  let output = run_feis_release(&ws.path, &["wrap-save", "imgui-sfml"])?;

  assert!(String::from_utf8_lossy(&output.stdout).contains("Saved 2 file(s)"));
  assert_eq!(
    ws.read_file("subprojects/packagefiles/imgui-sfml/meson.build")?,
    "project('imgui-sfml')"
  );
  assert!(ws.file_exists("subprojects/packagefiles/imgui-sfml/meson_options.txt"));
  assert!(!ws.file_exists("subprojects/packagefiles/imgui-sfml/imgui-SFML.cpp"));
  Ok(())
}

#[test]
fn test_wrap_save_unknown_subproject() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_file("subprojects/sfml.wrap", "[wrap-git]\n")?;

  let output = run_feis_release_raw(&ws.path, &["wrap-save", "nowide"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Subproject not found"));
  Ok(())
}
