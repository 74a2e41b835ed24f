pub mod system_git;

pub use system_git::SystemGit;

use crate::core::error::ReleaseResult;
use std::path::PathBuf;

/// VCS abstraction for the operations a release performs
///
/// Paths are relative to the repository root.
pub trait Vcs {
  /// Stage files for the next commit
  fn stage(&self, paths: &[PathBuf]) -> ReleaseResult<()>;

  /// Commit staged changes
  fn commit(&self, message: &str) -> ReleaseResult<()>;

  /// Create a tag at HEAD; annotated when a message is given
  fn tag(&self, name: &str, message: Option<&str>) -> ReleaseResult<()>;

  /// Describe HEAD relative to the most recent tag (`v1.4.0-3-gabc1234`)
  fn describe(&self) -> ReleaseResult<String>;
}
