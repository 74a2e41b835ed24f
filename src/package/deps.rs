//! Runtime dependency resolution for the packaged binary
//!
//! The actual work (finding DLLs the binary links against and copying them next
//! to it) is done by an external script. Historically its exit status was never
//! checked; the mode makes that choice explicit.

use crate::core::config::{DependencyConfig, DependencyMode};
use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseError, ReleaseResult};
use crate::core::process;
use serde::Serialize;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DependencyOutcome {
  /// Step disabled
  Skipped,
  /// Script ran successfully
  Resolved,
  /// Script failed in lenient mode; packaging went on
  Failed { error: String },
}

/// Run `<python> <script> -d <bundle> -f <bundle>/<binary>` from the project root
pub fn resolve_dependencies(
  ctx: &ReleaseContext,
  config: &DependencyConfig,
  mode: DependencyMode,
  bundle_dir: &Path,
  binary_name: &str,
) -> ReleaseResult<DependencyOutcome> {
  if mode == DependencyMode::Skip {
    return Ok(DependencyOutcome::Skipped);
  }

  match run_script(ctx, config, bundle_dir, binary_name) {
    Ok(()) => Ok(DependencyOutcome::Resolved),
    Err(err) if mode == DependencyMode::Lenient => {
      warn!(error = %err, "dependency resolution failed, continuing");
      Ok(DependencyOutcome::Failed { error: err.to_string() })
    }
    Err(err) => Err(err),
  }
}

fn run_script(ctx: &ReleaseContext, config: &DependencyConfig, bundle_dir: &Path, binary_name: &str) -> ReleaseResult<()> {
  let script = ctx.resolve(&config.script);
  if !script.is_file() {
    return Err(ReleaseError::missing(script, "Dependency script"));
  }

  let mut cmd = process::tool_command(&ctx.config.tools.python, ctx.root());
  cmd
    .arg(&script)
    .arg("-d")
    .arg(bundle_dir)
    .arg("-f")
    .arg(bundle_dir.join(binary_name));
  process::run(&mut cmd)?;
  Ok(())
}
