//! `bump` command: rewrite version metadata, then commit and tag

use crate::core::context::ReleaseContext;
use crate::core::error::ReleaseResult;
use crate::core::vcs::SystemGit;
use crate::release::{self, BumpReport, Version};

/// Run the bump command
pub fn run_bump(ctx: &ReleaseContext, version: &str, dry_run: bool, annotate: bool, json: bool) -> ReleaseResult<()> {
  let version = Version::parse(version)?;

  let mut ctx = ctx.clone();
  ctx.config.bump.annotate |= annotate;
  let dry_run = dry_run || ctx.config.bump.dry_run;

  let git = SystemGit::new(&ctx.config.tools.git, ctx.root());
  let report = release::bump(&ctx, &git, &version, dry_run)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_report(&report);
  }

  Ok(())
}

fn print_report(report: &BumpReport) {
  println!("🔖 Version {}", report.version);
  for file in &report.files {
    match file.lines {
      Some(lines) => println!("   ✏️  {} ({}, {} line(s))", file.path.display(), file.kind, lines),
      None => println!("   ✏️  {} ({})", file.path.display(), file.kind),
    }
  }

  if report.dry_run {
    println!();
    println!("🔍 Dry run: no commit or tag created");
    println!("   would commit: {}", report.commit.message);
    println!("   would tag:    {}", report.commit.tag);
  } else {
    println!();
    println!("✅ Committed: {}", report.commit.message);
    let kind = if report.commit.annotated { "annotated tag" } else { "tag" };
    println!("🏷️  Created {} {}", kind, report.commit.tag);
  }
}
