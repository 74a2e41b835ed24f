//! Release context - build once, pass everywhere
//!
//! Holds the explicit project root and the loaded configuration. Nothing below
//! the command layer reads the process working directory; every path and every
//! subprocess is resolved against `root`.

use crate::core::config::ReleaseConfig;
use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ReleaseContext {
  /// Project root directory (absolute path)
  pub root: PathBuf,

  /// Configuration (release.toml or defaults)
  pub config: ReleaseConfig,

  /// Draw progress bars for long file operations
  pub progress: bool,
}

impl ReleaseContext {
  /// Build context from a root directory and an optional explicit config file
  pub fn build(root: &Path, config_path: Option<&Path>) -> ReleaseResult<Self> {
    if !root.is_dir() {
      return Err(ReleaseError::missing(root, "Project root"));
    }
    let root = root
      .canonicalize()
      .with_context(|| format!("Failed to resolve project root {}", root.display()))?;
    let config = ReleaseConfig::load(&root, config_path)?;

    Ok(Self {
      root,
      config,
      progress: false,
    })
  }

  /// Context with an already-built config (tests, embedding)
  pub fn with_config(root: impl Into<PathBuf>, config: ReleaseConfig) -> Self {
    Self {
      root: root.into(),
      config,
      progress: false,
    }
  }

  /// Resolve a configured path against the project root
  pub fn resolve(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.root.join(path)
    }
  }

  /// Get project root as Path reference (convenience)
  pub fn root(&self) -> &Path {
    &self.root
  }
}
