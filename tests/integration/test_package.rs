//! Integration tests for `feis-release package`

use crate::helpers::{TestWorkspace, git, run_feis_release, run_feis_release_raw};
use anyhow::Result;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use walkdir::WalkDir;

fn archive_entries(path: &Path) -> Result<BTreeSet<String>> {
  let archive = zip::ZipArchive::new(File::open(path)?)?;
  Ok(
    archive
      .file_names()
      .filter(|name| !name.ends_with('/'))
      .map(String::from)
      .collect(),
  )
}

fn staged_files(dir: &Path) -> BTreeSet<String> {
  let prefix = dir.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
  WalkDir::new(dir)
    .into_iter()
    .filter_map(Result::ok)
    .filter(|e| e.file_type().is_file())
    .map(|e| {
      let relative = e.path().strip_prefix(dir).unwrap().to_string_lossy().replace('\\', "/");
      format!("{}/{}", prefix, relative)
    })
    .collect()
}

#[test]
fn test_package_stages_and_archives() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_build_output()?;

  run_feis_release(&ws.path, &["package", "--release-version", "1.4.0", "--deps", "skip"])?;

  let staging = ws.path.join("FEIS-1.4.0");
  let staged = staged_files(&staging);
  assert_eq!(staged.len(), 5);
  assert!(staged.contains("FEIS-1.4.0/FEIS.exe"));
  assert!(staged.contains("FEIS-1.4.0/assets/textures/default/marker/ripple.png"));

  let archive = ws.path.join("FEIS-1.4.0.zip");
  assert_eq!(archive_entries(&archive)?, staged);

  let checksum = ws.read_file("FEIS-1.4.0.zip.sha256")?;
  assert!(checksum.ends_with("  FEIS-1.4.0.zip\n"));
  assert_eq!(checksum.split_whitespace().next().map(str::len), Some(64));
  Ok(())
}

#[test]
fn test_release_version_defaults_to_git_describe() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_build_output()?;
  git(&ws.path, &["tag", "v1.3.0"])?;

  run_feis_release(&ws.path, &["package", "--deps", "skip", "--no-checksum"])?;

  assert!(ws.file_exists("FEIS-v1.3.0.zip"));
  assert!(!ws.file_exists("FEIS-v1.3.0.zip.sha256"));
  Ok(())
}

#[test]
fn test_timestamp_and_clean_staging() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_build_output()?;

  let output = run_feis_release(
    &ws.path,
    &[
      "package",
      "--release-version",
      "1.4.0",
      "--deps",
      "skip",
      "--timestamp",
      "--clean-staging",
      "--output-dir",
      "dist",
      "--json",
    ],
  )?;
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  let archive = report["archive"].as_str().unwrap_or_default().to_string();
  let name = Path::new(&archive).file_name().unwrap().to_string_lossy().to_string();
  assert!(name.starts_with("FEIS-1.4.0+"), "{name}");
  assert!(name.ends_with(".zip"));
  assert_eq!(name.len(), "FEIS-1.4.0+20240131T235959.zip".len());
  assert!(ws.path.join("dist").join(&name).exists());
  assert!(!ws.file_exists("dist/FEIS-1.4.0"));
  assert_eq!(report["dependencies"]["status"], "skipped");
  Ok(())
}

#[test]
fn test_missing_binary_is_user_error() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_build_output()?;
  std::fs::remove_file(ws.path.join("build/FEIS.exe"))?;

  let output = run_feis_release_raw(&ws.path, &["package", "--release-version", "1.4.0"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Binary not found"));
  assert!(!ws.file_exists("FEIS-1.4.0"));
  Ok(())
}

#[test]
fn test_build_dir_override() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_build_output()?;
  std::fs::create_dir_all(ws.path.join("build-release"))?;
  std::fs::rename(ws.path.join("build/FEIS.exe"), ws.path.join("build-release/FEIS.exe"))?;

  run_feis_release(
    &ws.path,
    &["package", "--release-version", "1.4.0", "--build-dir", "build-release", "--deps", "skip"],
  )?;

  assert!(ws.file_exists("FEIS-1.4.0/FEIS.exe"));
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_dependency_script_strict_and_lenient() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_build_output()?;
  ws.write_file("utils/copy_dependencies.py", "echo 'objdump missing' >&2\nexit 3\n")?;
  ws.write_file(
    ".config/release.toml",
    "[tools]\npython = \"sh\"\n",
  )?;

  let strict = run_feis_release_raw(
    &ws.path,
    &["--config", ".config/release.toml", "package", "--release-version", "1.4.0", "--deps", "strict"],
  )?;
  assert_eq!(strict.status.code(), Some(3));
  assert!(!ws.file_exists("FEIS-1.4.0.zip"));

  let lenient = run_feis_release(
    &ws.path,
    &["--config", ".config/release.toml", "package", "--release-version", "1.4.0", "--deps", "lenient"],
  )?;
  assert!(String::from_utf8_lossy(&lenient.stdout).contains("Dependency resolution failed"));
  assert!(ws.file_exists("FEIS-1.4.0.zip"));
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_dependency_script_adds_files_to_archive() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_build_output()?;
  ws.write_file("utils/copy_dependencies.py", "touch \"$2/libwinpthread-1.dll\"\n")?;
  ws.write_file("release.toml", "[tools]\npython = \"sh\"\n\n[package.dependencies]\nmode = \"strict\"\n")?;

  run_feis_release(&ws.path, &["package", "--release-version", "1.4.0"])?;

  let entries = archive_entries(&ws.path.join("FEIS-1.4.0.zip"))?;
  assert!(entries.contains("FEIS-1.4.0/libwinpthread-1.dll"));
  Ok(())
}
