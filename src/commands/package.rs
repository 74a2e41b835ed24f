//! `package` command: stage the compiled binary and assets, then archive them

use crate::core::config::{DependencyMode, StagingPolicy};
use crate::core::context::ReleaseContext;
use crate::core::error::ReleaseResult;
use crate::core::vcs::{SystemGit, Vcs};
use crate::package::{self, DependencyOutcome, PackageOptions, PackageReport};
use std::path::PathBuf;

/// CLI overrides for the `[package]` config section
#[derive(Debug, Default)]
pub struct PackageArgs {
  pub release_version: Option<String>,
  pub build_dir: Option<PathBuf>,
  pub output_dir: Option<PathBuf>,
  pub deps: Option<DependencyMode>,
  pub timestamp: bool,
  pub reuse_staging: bool,
  pub no_checksum: bool,
  pub clean_staging: bool,
  pub json: bool,
}

/// Run the package command
pub fn run_package(ctx: &ReleaseContext, args: PackageArgs) -> ReleaseResult<()> {
  let release = match args.release_version {
    Some(version) => version,
    None => SystemGit::new(&ctx.config.tools.git, ctx.root()).describe()?,
  };

  let mut options = PackageOptions::from_config(&ctx.config.package, release);
  if let Some(build_dir) = args.build_dir {
    options.build_dir = build_dir;
  }
  if let Some(output_dir) = args.output_dir {
    options.output_dir = output_dir;
  }
  if let Some(mode) = args.deps {
    options.dependencies = mode;
  }
  if args.reuse_staging {
    options.staging = StagingPolicy::Reuse;
  }
  options.timestamp |= args.timestamp;
  options.checksum &= !args.no_checksum;
  options.keep_staging &= !args.clean_staging;

  let mut ctx = ctx.clone();
  ctx.progress &= !args.json;

  if !args.json {
    println!("📦 Packaging {} {}", ctx.config.project.name, options.release);
  }
  let report = package::package(&ctx, &options)?;

  if args.json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_report(&report);
  }

  Ok(())
}

fn print_report(report: &PackageReport) {
  println!("   📁 {} asset file(s) staged", report.assets);
  match &report.dependencies {
    DependencyOutcome::Skipped => println!("   ⏭️  Dependency resolution skipped"),
    DependencyOutcome::Resolved => println!("   🔗 Runtime dependencies copied"),
    DependencyOutcome::Failed { error } => {
      println!("   ⚠️  Dependency resolution failed, archive may be incomplete");
      for line in error.lines() {
        println!("      {}", line);
      }
    }
  }
  println!();
  println!("✅ {} ({} files)", report.archive.display(), report.files);
  if let Some(sha256) = &report.sha256 {
    println!("   sha256 {}", sha256);
  }
  if report.kept_staging {
    println!("   staging kept at {}", report.bundle.display());
  }
}
