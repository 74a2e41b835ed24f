//! Source-control step of a version bump: stage, commit, tag

use crate::core::config::BumpConfig;
use crate::core::error::ReleaseResult;
use crate::core::vcs::Vcs;
use crate::release::version::Version;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// What the committer did (or would have done in dry-run mode)
#[derive(Debug, Clone, Serialize)]
pub struct CommitOutcome {
  pub message: String,
  pub tag: String,
  pub annotated: bool,
  /// False in dry-run mode
  pub committed: bool,
}

/// Records a version bump in version control
pub struct Committer<'a, V: Vcs> {
  vcs: &'a V,
  config: &'a BumpConfig,
}

impl<'a, V: Vcs> Committer<'a, V> {
  pub fn new(vcs: &'a V, config: &'a BumpConfig) -> Self {
    Self { vcs, config }
  }

  /// Commit message for a version
  pub fn message(&self, version: &Version) -> String {
    self.config.commit_message.replace("{version}", &version.to_string())
  }

  /// Stage `files`, commit and tag
  ///
  /// In dry-run mode no version-control command is issued at all. Any failing
  /// command aborts the remaining steps.
  pub fn record(&self, version: &Version, files: &[PathBuf], dry_run: bool) -> ReleaseResult<CommitOutcome> {
    let message = self.message(version);
    let tag = version.tag_name(&self.config.tag_prefix);
    let annotated = self.config.annotate;

    if dry_run {
      info!(tag = %tag, "dry run, skipping commit and tag");
      return Ok(CommitOutcome {
        message,
        tag,
        annotated,
        committed: false,
      });
    }

    self.vcs.stage(files)?;
    self.vcs.commit(&message)?;
    self.vcs.tag(&tag, annotated.then_some(message.as_str()))?;
    info!(tag = %tag, "version committed and tagged");

    Ok(CommitOutcome {
      message,
      tag,
      annotated,
      committed: true,
    })
  }
}
