//! Integration tests for `feis-release sample-bug`

use crate::helpers::{run_feis_release, run_feis_release_raw};
use anyhow::Result;
use tempfile::TempDir;

#[test]
fn test_sample_bug_chart() -> Result<()> {
  let dir = TempDir::new()?;

  let output = run_feis_release(dir.path(), &["sample-bug", "0,", "1024,", "1000,", "1100,", "1050"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("buffer"));
  assert!(stdout.contains("deoverlapped end"));
  assert!(!stdout.contains("next sample"));
  Ok(())
}

#[test]
fn test_sample_bug_json() -> Result<()> {
  let dir = TempDir::new()?;

  let output = run_feis_release(dir.path(), &["sample-bug", "--json", "0,1024,1000,1100,1050,1200"])?;
  let dump: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(dump["buffer"], serde_json::json!([0, 1024]));
  assert_eq!(dump["next_sample"], 1200);
  Ok(())
}

#[test]
fn test_sample_bug_rejects_wrong_count() -> Result<()> {
  let dir = TempDir::new()?;

  let output = run_feis_release_raw(dir.path(), &["sample-bug", "1,2,3,4"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("expected 5 or 6 values"));
  Ok(())
}

#[test]
fn test_sample_bug_ignores_project_config() -> Result<()> {
  let dir = TempDir::new()?;
  std::fs::write(dir.path().join("release.toml"), "[project\nname = ")?;

  let output = run_feis_release(dir.path(), &["sample-bug", "0,1024,1000,1100,1050"])?;
  assert!(String::from_utf8_lossy(&output.stdout).contains("buffer"));

  // project commands still load the broken config
  let output = run_feis_release_raw(dir.path(), &["wrap-save", "imgui"])?;
  assert_eq!(output.status.code(), Some(1));
  Ok(())
}

#[test]
fn test_sample_bug_extreme_values() -> Result<()> {
  let dir = TempDir::new()?;

  let output = run_feis_release(
    dir.path(),
    &["sample-bug", "-9223372036854775808,9223372036854775807,0,10,9223372036854775807"],
  )?;

  assert!(String::from_utf8_lossy(&output.stdout).contains("deoverlapped end"));
  Ok(())
}
