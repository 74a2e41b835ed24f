//! Release packager
//!
//! Builds `<project>-<release>.zip` from a compiled binary:
//!
//! 1. check the binary and asset tree exist (nothing is written otherwise)
//! 2. prepare the staging directory `<output>/<project>-<release>`
//! 3. copy the binary, then the asset tree into `assets/`
//! 4. run the dependency-resolution script (strict, lenient or skipped)
//! 5. zip the staging directory, optionally with a UTC timestamp suffix
//! 6. write a `.sha256` file next to the archive

pub mod archive;
pub mod bundle;
pub mod deps;

pub use bundle::ReleaseBundle;
pub use deps::DependencyOutcome;

use crate::core::config::{DependencyMode, PackageConfig, StagingPolicy};
use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseError, ReleaseResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Name of the asset directory inside the bundle
pub const ASSETS_DIR: &str = "assets";

/// Settings of one packaging run (config values with CLI overrides applied)
#[derive(Debug, Clone)]
pub struct PackageOptions {
  /// Release name, usually the version (`1.4.0`, `v1.4.0-3-gabc1234`)
  pub release: String,
  pub build_dir: PathBuf,
  pub output_dir: PathBuf,
  pub dependencies: DependencyMode,
  pub staging: StagingPolicy,
  pub timestamp: bool,
  pub checksum: bool,
  pub keep_staging: bool,
}

impl PackageOptions {
  pub fn from_config(config: &PackageConfig, release: impl Into<String>) -> Self {
    Self {
      release: release.into(),
      build_dir: config.build_dir.clone(),
      output_dir: config.output_dir.clone(),
      dependencies: config.dependencies.mode,
      staging: config.staging,
      timestamp: config.timestamp,
      checksum: config.checksum,
      keep_staging: config.keep_staging,
    }
  }
}

/// Result of a packaging run
#[derive(Debug, Clone, Serialize)]
pub struct PackageReport {
  pub release: String,
  /// Staging directory (absent afterwards unless kept)
  pub bundle: PathBuf,
  pub kept_staging: bool,
  pub archive: PathBuf,
  /// Files in the archive
  pub files: usize,
  /// Files copied from the asset tree
  pub assets: usize,
  pub dependencies: DependencyOutcome,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sha256: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Stage and archive a release
pub fn package(ctx: &ReleaseContext, options: &PackageOptions) -> ReleaseResult<PackageReport> {
  let config = &ctx.config.package;
  let created_at = Utc::now();

  // Inputs first: a missing binary or asset tree must not leave a half-built bundle
  let binary = ctx.resolve(&options.build_dir).join(&config.binary);
  if !binary.is_file() {
    return Err(ReleaseError::missing(binary, "Binary"));
  }
  let assets = ctx.resolve(&config.assets);
  if !assets.is_dir() {
    return Err(ReleaseError::missing(assets, "Asset directory"));
  }

  let output_dir = ctx.resolve(&options.output_dir);
  let bundle_name = format!("{}-{}", ctx.config.project.name, options.release);
  let bundle = ReleaseBundle::prepare(&output_dir, &bundle_name, options.staging)?;
  info!(bundle = %bundle.dir().display(), "staging release");

  bundle.add_file(&binary)?;
  let asset_count = bundle.add_tree(&assets, ASSETS_DIR, ctx.progress)?;
  info!(files = asset_count, "assets copied");

  let dependencies =
    deps::resolve_dependencies(ctx, &config.dependencies, options.dependencies, bundle.dir(), &config.binary)?;

  let stem = archive::archive_stem(bundle.name(), options.timestamp.then_some(created_at));
  let archive_path = output_dir.join(format!("{}.zip", stem));
  let files = archive::write_zip(bundle.dir(), &archive_path)?;
  info!(archive = %archive_path.display(), files, "archive written");

  let sha256 = if options.checksum {
    let (_, digest) = archive::write_checksum(&archive_path)?;
    Some(digest)
  } else {
    None
  };

  let bundle_dir = bundle.dir().to_path_buf();
  if !options.keep_staging {
    bundle.remove()?;
  }

  Ok(PackageReport {
    release: options.release.clone(),
    bundle: bundle_dir,
    kept_staging: options.keep_staging,
    archive: archive_path,
    files,
    assets: asset_count,
    dependencies,
    sha256,
    created_at,
  })
}
