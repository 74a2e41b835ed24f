//! System git backend
//!
//! Every operation is one `git` subprocess run against the project root with an
//! isolated environment and a few safe configuration overrides.

use super::Vcs;
use crate::core::error::ReleaseResult;
use crate::core::process;
use crate::utils::path_to_git_format;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using the system `git` binary
pub struct SystemGit {
  /// git executable (name resolved through PATH, or a full path)
  program: PathBuf,

  /// Repository working directory
  repo_path: PathBuf,
}

impl SystemGit {
  pub fn new(program: impl Into<PathBuf>, repo_path: &Path) -> Self {
    Self {
      program: program.into(),
      repo_path: repo_path.to_path_buf(),
    }
  }

  /// Create a git command with isolated environment
  ///
  /// - Runs with `-C <repo>` and the repo as working directory
  /// - Forces non-interactive, unescaped output regardless of user config
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = process::tool_command(&self.program, &self.repo_path);

    cmd.arg("-C").arg(&self.repo_path);
    cmd.arg("-c").arg("core.quotePath=false");
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.env("GIT_TERMINAL_PROMPT", "0");

    cmd
  }
}

impl Vcs for SystemGit {
  fn stage(&self, paths: &[PathBuf]) -> ReleaseResult<()> {
    if paths.is_empty() {
      return Ok(());
    }

    let mut cmd = self.git_cmd();
    cmd.arg("add").arg("--");
    for path in paths {
      cmd.arg(path_to_git_format(path));
    }
    process::run(&mut cmd)?;
    Ok(())
  }

  fn commit(&self, message: &str) -> ReleaseResult<()> {
    let mut cmd = self.git_cmd();
    cmd.args(["commit", "-m", message]);
    process::run(&mut cmd)?;
    Ok(())
  }

  fn tag(&self, name: &str, message: Option<&str>) -> ReleaseResult<()> {
    let mut cmd = self.git_cmd();
    cmd.arg("tag");
    if let Some(message) = message {
      cmd.args(["-a", name, "-m", message]);
    } else {
      cmd.arg(name);
    }
    process::run(&mut cmd)?;
    Ok(())
  }

  fn describe(&self) -> ReleaseResult<String> {
    let mut cmd = self.git_cmd();
    cmd.args(["describe", "--tags"]);
    process::run_stdout(&mut cmd)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::process::render_command;

  #[test]
  fn test_git_cmd_targets_repo() {
    let git = SystemGit::new("git", Path::new("/work/feis"));
    let rendered = render_command(&git.git_cmd());
    assert!(rendered.starts_with("git -C /work/feis"));
    assert!(rendered.contains("core.quotePath=false"));
  }

  #[test]
  fn test_stage_nothing_is_noop() {
    // a repo path that does not exist would make any git call fail
    let git = SystemGit::new("git", Path::new("/nonexistent/feis-release-repo"));
    assert!(git.stage(&[]).is_ok());
  }
}
