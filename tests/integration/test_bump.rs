//! Integration tests for `feis-release bump`

use crate::helpers::{TestWorkspace, run_feis_release, run_feis_release_raw};
use anyhow::Result;

#[test]
fn test_bump_rewrites_commits_and_tags() -> Result<()> {
  let ws = TestWorkspace::new()?;

  run_feis_release(&ws.path, &["bump", "1.4.0-beta"])?;

  let control = ws.read_file("debian/control")?;
  assert!(control.contains("Version: 1.4.0-beta\n"));
  assert!(control.contains("Architecture: amd64\n"));

  let manifest = ws.read_file("tools/Cargo.toml")?;
  assert!(manifest.contains("version = \"1.4.0-beta\" # synced by bump"));

  assert_eq!(ws.git_log(1)?, vec!["bump to v1.4.0-beta".to_string()]);
  assert_eq!(ws.tags()?, vec!["v1.4.0-beta".to_string()]);
  Ok(())
}

#[test]
fn test_bump_dry_run_leaves_history_alone() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_feis_release(&ws.path, &["bump", "2.0.0", "--dry-run"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Dry run"));

  assert!(ws.read_file("debian/control")?.contains("Version: 2.0.0\n"));
  assert_eq!(ws.git_log(5)?, vec!["Initial project setup".to_string()]);
  assert!(ws.tags()?.is_empty());
  Ok(())
}

#[test]
fn test_bump_json_report() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_feis_release(&ws.path, &["bump", "1.4.0", "--annotate", "--json"])?;
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(report["version"], "1.4.0");
  assert_eq!(report["commit"]["tag"], "v1.4.0");
  assert_eq!(report["commit"]["annotated"], true);
  assert_eq!(report["files"].as_array().map(Vec::len), Some(2));
  Ok(())
}

#[test]
fn test_malformed_version_changes_nothing() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let before = ws.read_file("debian/control")?;

  for version in ["1.2", "1.2.x", "01.2.3"] {
    let output = run_feis_release_raw(&ws.path, &["bump", version])?;
    assert_eq!(output.status.code(), Some(1), "{version}");
    assert!(String::from_utf8_lossy(&output.stderr).contains("❌"));
  }

  assert_eq!(ws.read_file("debian/control")?, before);
  assert!(ws.tags()?.is_empty());
  Ok(())
}

#[test]
fn test_existing_tag_propagates_git_exit_code() -> Result<()> {
  let ws = TestWorkspace::new()?;
  crate::helpers::git(&ws.path, &["tag", "v1.5.0"])?;

  let output = run_feis_release_raw(&ws.path, &["bump", "1.5.0"])?;

  assert_eq!(output.status.code(), Some(128));
  assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));
  Ok(())
}

#[test]
fn test_missing_target_fails_before_writing() -> Result<()> {
  let ws = TestWorkspace::new()?;
  std::fs::remove_file(ws.path.join("tools/Cargo.toml"))?;
  let before = ws.read_file("debian/control")?;

  let output = run_feis_release_raw(&ws.path, &["bump", "1.4.0"])?;

  assert_eq!(output.status.code(), Some(1));
  assert_eq!(ws.read_file("debian/control")?, before);
  Ok(())
}

#[test]
fn test_root_flag_runs_elsewhere() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let elsewhere = tempfile::TempDir::new()?;
  let root = ws.path.to_string_lossy().to_string();

  run_feis_release(elsewhere.path(), &["--root", &root, "bump", "1.4.1", "--dry-run"])?;

  assert!(ws.read_file("debian/control")?.contains("Version: 1.4.1\n"));
  Ok(())
}
