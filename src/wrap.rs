//! Save meson build files of a wrap-git subproject into its packagefiles overlay
//!
//! `meson subprojects packagefiles` has no `--save` for wrap-git packages, so
//! build files edited inside `subprojects/<wrap>/` are copied back to
//! `subprojects/packagefiles/<wrap>/` with their relative layout intact.

use crate::core::config::WrapConfig;
use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use glob::Pattern;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Overlay directory name under the subprojects directory
pub const PACKAGEFILES_DIR: &str = "packagefiles";

/// Copy every file of `subprojects/<wrap>` whose name matches `pattern` into the overlay
///
/// Returns the copied paths relative to the subproject, sorted.
pub fn save_packagefiles(
  ctx: &ReleaseContext,
  config: &WrapConfig,
  wrap: &str,
  pattern: Option<&str>,
) -> ReleaseResult<Vec<PathBuf>> {
  validate_wrap_name(wrap)?;
  let pattern_text = pattern.unwrap_or(&config.pattern);
  let pattern = Pattern::new(pattern_text).context(format!("Invalid file pattern '{}'", pattern_text))?;

  let subprojects = ctx.resolve(&config.subprojects);
  if !subprojects.is_dir() {
    return Err(ReleaseError::missing(subprojects, "Subprojects directory"));
  }
  let source = subprojects.join(wrap);
  if !source.is_dir() {
    return Err(ReleaseError::missing(source, "Subproject"));
  }
  let overlay = subprojects.join(PACKAGEFILES_DIR).join(wrap);

  let mut copied = Vec::new();
  for entry in WalkDir::new(&source).min_depth(1).sort_by_file_name() {
    let entry = entry?;
    if !entry.file_type().is_file() || !pattern.matches(&entry.file_name().to_string_lossy()) {
      continue;
    }

    let relative = entry.path().strip_prefix(&source)?.to_path_buf();
    let dest = overlay.join(&relative);
    if let Some(parent) = dest.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::copy(entry.path(), &dest).with_context(|| format!("Failed to copy {}", entry.path().display()))?;
    debug!(file = %relative.display(), "saved");
    copied.push(relative);
  }

  Ok(copied)
}

fn validate_wrap_name(wrap: &str) -> ReleaseResult<()> {
  let mut components = Path::new(wrap).components();
  match (components.next(), components.next()) {
    (Some(Component::Normal(name)), None) if name.to_str() != Some(PACKAGEFILES_DIR) => Ok(()),
    _ => Err(ReleaseError::with_help(
      format!("Invalid subproject name '{}'", wrap),
      "Pass the directory name of the subproject, e.g. `imgui`.",
    )),
  }
}
