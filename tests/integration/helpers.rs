//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A FEIS-like project checkout with git history
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  /// Create a project with a debian control file and a Cargo manifest, committed
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["config", "commit.gpgsign", "false"])?;
    git(&path, &["config", "tag.gpgsign", "false"])?;

    let ws = Self { _root: root, path };
    ws.write_file(
      "debian/control",
      "Source: feis\nPackage: feis\nVersion: 1.3.0\nArchitecture: amd64\n",
    )?;
    ws.write_file(
      "tools/Cargo.toml",
      "[package]\nname = \"feis-tools\"\nversion = \"1.3.0\" # synced by bump\nedition = \"2021\"\n",
    )?;
    ws.write_file(
      "release.toml",
      r#"[[bump.targets]]
kind = "control"
path = "debian/control"

[[bump.targets]]
kind = "cargo"
path = "tools/Cargo.toml"
"#,
    )?;
    ws.commit("Initial project setup")?;

    Ok(ws)
  }

  /// Write a file relative to the project root, creating parent directories
  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let file_path = self.path.join(path);
    if let Some(parent) = file_path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
  }

  /// Lay out `build/FEIS.exe` and a small asset tree
  pub fn add_build_output(&self) -> Result<()> {
    self.write_file("build/FEIS.exe", "MZ fake binary")?;
    self.write_file("assets/textures/default/note.png", "note")?;
    self.write_file("assets/textures/default/marker/ripple.png", "ripple")?;
    self.write_file("assets/sounds/note.wav", "wav")?;
    self.write_file("assets/fonts/NotoSans-Medium.ttf", "font")?;
    Ok(())
  }

  /// Commit current changes
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;

    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Get git log
  pub fn git_log(&self, n: usize) -> Result<Vec<String>> {
    let output = git(&self.path, &["log", &format!("-{}", n), "--format=%s"])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect(),
    )
  }

  /// All tag names
  pub fn tags(&self) -> Result<Vec<String>> {
    let output = git(&self.path, &["tag", "--list"])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect(),
    )
  }

  /// Check if a file exists
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run feis-release and return its output whatever the exit status
pub fn run_feis_release_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  Command::new(env!("CARGO_BIN_EXE_feis-release"))
    .current_dir(cwd)
    .args(args)
    .env_remove("RUST_LOG")
    .output()
    .context("Failed to run feis-release")
}

/// Run feis-release, failing unless it exits successfully
pub fn run_feis_release(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_feis_release_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "feis-release command failed: feis-release {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}
