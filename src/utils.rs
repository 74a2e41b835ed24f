//! Filesystem and path helpers shared by the release steps

use crate::core::error::{ReleaseResult, ResultExt};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Convert a path to Git format (always forward slashes)
///
/// Git expects paths with forward slashes, even on Windows.
pub fn path_to_git_format(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}

/// Join the components of a relative path with `/` (zip entry names)
pub fn to_slash(path: &Path) -> String {
  path
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}

/// Replace a file's contents through a temporary file in the same directory
///
/// The file is either fully rewritten or left untouched. Permissions of an
/// existing file are carried over.
pub fn write_atomic(path: &Path, contents: &[u8]) -> ReleaseResult<()> {
  let temp = stage_file(path, contents)?;
  temp
    .persist(path)
    .with_context(|| format!("Failed to replace {}", path.display()))?;
  Ok(())
}

/// Write contents into a temporary sibling of `path`, ready to be persisted
pub fn stage_file(path: &Path, contents: &[u8]) -> ReleaseResult<NamedTempFile> {
  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };

  let mut temp =
    NamedTempFile::new_in(dir).with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
  temp
    .write_all(contents)
    .with_context(|| format!("Failed to write temporary file for {}", path.display()))?;
  temp.flush()?;

  match fs::metadata(path) {
    Ok(metadata) => temp.as_file().set_permissions(metadata.permissions())?,
    Err(_) => set_published_mode(temp.as_file())?,
  }

  Ok(temp)
}

/// Give a new output file the usual world-readable mode
///
/// Temporary files are created 0600; published files are 0644.
#[cfg(unix)]
pub fn set_published_mode(file: &fs::File) -> ReleaseResult<()> {
  use std::os::unix::fs::PermissionsExt;
  file.set_permissions(fs::Permissions::from_mode(0o644))?;
  Ok(())
}

#[cfg(not(unix))]
pub fn set_published_mode(_file: &fs::File) -> ReleaseResult<()> {
  Ok(())
}
