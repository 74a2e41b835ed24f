//! `wrap-save` command

use crate::core::context::ReleaseContext;
use crate::core::error::ReleaseResult;
use crate::wrap::{self, PACKAGEFILES_DIR};

/// Run the wrap-save command
pub fn run_wrap_save(ctx: &ReleaseContext, wrap_name: &str, pattern: Option<&str>) -> ReleaseResult<()> {
  let copied = wrap::save_packagefiles(ctx, &ctx.config.wrap, wrap_name, pattern)?;

  let overlay = ctx.config.wrap.subprojects.join(PACKAGEFILES_DIR).join(wrap_name);
  if copied.is_empty() {
    println!("⚠️  No matching files in subproject '{}'", wrap_name);
    return Ok(());
  }

  println!("💾 Saved {} file(s) to {}", copied.len(), overlay.display());
  for path in &copied {
    println!("   {}", path.display());
  }
  Ok(())
}
