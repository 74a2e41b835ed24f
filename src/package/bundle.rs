//! Release bundle: the staging directory that becomes the archive

use crate::core::config::StagingPolicy;
use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use crate::ui::progress::FileProgress;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A staging directory `<output>/<name>` holding everything that ships
#[derive(Debug)]
pub struct ReleaseBundle {
  dir: PathBuf,
  name: String,
}

impl ReleaseBundle {
  /// Create (or reuse) the staging directory
  ///
  /// `Reset` removes an existing directory first; `Reuse` keeps its contents so
  /// later copies overlay them.
  pub fn prepare(output_dir: &Path, name: &str, policy: StagingPolicy) -> ReleaseResult<Self> {
    validate_name(name)?;

    let dir = output_dir.join(name);
    if dir.exists() && policy == StagingPolicy::Reset {
      debug!(dir = %dir.display(), "removing previous bundle");
      fs::remove_dir_all(&dir).with_context(|| format!("Failed to remove {}", dir.display()))?;
    }
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    Ok(Self {
      dir,
      name: name.to_string(),
    })
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Copy a single file into the bundle root
  pub fn add_file(&self, source: &Path) -> ReleaseResult<PathBuf> {
    let file_name = source
      .file_name()
      .ok_or_else(|| ReleaseError::message(format!("Not a file path: {}", source.display())))?;
    let dest = self.dir.join(file_name);
    fs::copy(source, &dest).with_context(|| format!("Failed to copy {}", source.display()))?;
    Ok(dest)
  }

  /// Recursively copy `source` into `<bundle>/<dest_name>`
  ///
  /// Directories are merged and existing files overwritten. Symlinks are
  /// followed, so links in the asset tree ship as regular files. Returns the
  /// number of files copied.
  pub fn add_tree(&self, source: &Path, dest_name: &str, progress: bool) -> ReleaseResult<usize> {
    let dest_root = self.dir.join(dest_name);
    fs::create_dir_all(&dest_root).with_context(|| format!("Failed to create {}", dest_root.display()))?;

    let entries = WalkDir::new(source)
      .min_depth(1)
      .follow_links(true)
      .sort_by_file_name()
      .into_iter()
      .collect::<Result<Vec<_>, _>>()?;

    let total = entries.iter().filter(|e| e.file_type().is_file()).count();
    let mut bar = (progress && total > 0).then(|| FileProgress::new(total, format!("Copying {}", dest_name)));

    let mut copied = 0;
    for entry in entries {
      let relative = entry.path().strip_prefix(source)?;
      let dest = dest_root.join(relative);

      if entry.file_type().is_dir() {
        fs::create_dir_all(&dest).with_context(|| format!("Failed to create {}", dest.display()))?;
      } else if entry.file_type().is_file() {
        if let Some(parent) = dest.parent() {
          fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &dest).with_context(|| format!("Failed to copy {}", entry.path().display()))?;
        copied += 1;
        if let Some(bar) = bar.as_mut() {
          bar.inc();
        }
      }
    }

    Ok(copied)
  }

  /// All files in the bundle, relative to its directory, sorted
  #[cfg(test)]
  pub fn files(&self) -> ReleaseResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(&self.dir).min_depth(1).sort_by_file_name() {
      let entry = entry?;
      if entry.file_type().is_file() {
        files.push(entry.path().strip_prefix(&self.dir)?.to_path_buf());
      }
    }
    Ok(files)
  }

  /// Delete the staging directory
  pub fn remove(self) -> ReleaseResult<()> {
    fs::remove_dir_all(&self.dir).with_context(|| format!("Failed to remove {}", self.dir.display()))?;
    Ok(())
  }
}

/// The bundle name becomes a directory under the output dir; it must stay there
fn validate_name(name: &str) -> ReleaseResult<()> {
  let mut components = Path::new(name).components();
  match (components.next(), components.next()) {
    (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(()),
    _ => Err(ReleaseError::with_help(
      format!("Invalid release bundle name '{}'", name),
      "The release version must not contain path separators.",
    )),
  }
}
