//! Version bump pipeline
//!
//! ```text
//! Version::parse  ->  MetadataUpdater::apply  ->  Committer::record
//!   (argument)         (meson.build, control,      (git add, commit,
//!                       Cargo.toml)                 tag v<version>)
//! ```
//!
//! The committer is skipped entirely in dry-run mode; metadata is still
//! rewritten so the result can be inspected.

pub mod commit;
pub mod metadata;
pub mod version;

pub use commit::{CommitOutcome, Committer};
pub use metadata::{MetadataUpdater, UpdatedFile};
pub use version::Version;

use crate::core::context::ReleaseContext;
use crate::core::error::ReleaseResult;
use crate::core::vcs::Vcs;
use serde::Serialize;

/// Result of a version bump
#[derive(Debug, Clone, Serialize)]
pub struct BumpReport {
  pub version: Version,
  pub files: Vec<UpdatedFile>,
  pub commit: CommitOutcome,
  pub dry_run: bool,
}

/// Rewrite every configured metadata target, then commit and tag unless `dry_run`
pub fn bump<V: Vcs>(ctx: &ReleaseContext, vcs: &V, version: &Version, dry_run: bool) -> ReleaseResult<BumpReport> {
  let bump = &ctx.config.bump;

  let files = MetadataUpdater::new(ctx.root(), &ctx.config.tools).apply(version, &bump.targets)?;

  let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
  let commit = Committer::new(vcs, bump).record(version, &paths, dry_run)?;

  Ok(BumpReport {
    version: version.clone(),
    files,
    commit,
    dry_run,
  })
}
