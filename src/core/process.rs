//! Subprocess execution for external tools (git, meson, the dependency script)
//!
//! Commands run with an explicit working directory and an isolated environment.
//! A non-zero exit is always an error carrying the tool's stderr.

use crate::core::error::{ReleaseError, ReleaseResult, SubprocessError};
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};
use tracing::debug;

/// Environment variables passed through to tools
#[cfg(not(windows))]
const PASSTHROUGH_ENV: &[&str] = &["PATH", "HOME"];

#[cfg(windows)]
const PASSTHROUGH_ENV: &[&str] = &[
  "PATH",
  "PATHEXT",
  "HOME",
  "USERPROFILE",
  "SystemRoot",
  "TEMP",
  "TMP",
];

/// Create a tool command with isolated environment
///
/// - Sets working directory to `cwd`
/// - Clears environment variables
/// - Whitelists only the variables tools need to start
pub fn tool_command(program: impl AsRef<OsStr>, cwd: &Path) -> Command {
  let mut cmd = Command::new(program);
  cmd.current_dir(cwd);

  cmd.env_clear();
  for key in PASSTHROUGH_ENV {
    if let Some(value) = std::env::var_os(key) {
      cmd.env(key, value);
    }
  }

  cmd
}

/// Render a command line for messages and logs
pub fn render_command(cmd: &Command) -> String {
  std::iter::once(cmd.get_program())
    .chain(cmd.get_args())
    .map(|part| {
      let part = part.to_string_lossy();
      if part.is_empty() || part.contains(char::is_whitespace) {
        format!("'{}'", part)
      } else {
        part.into_owned()
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}

/// Run a command to completion, failing on spawn errors and non-zero exits
pub fn run(cmd: &mut Command) -> ReleaseResult<Output> {
  let rendered = render_command(cmd);
  debug!(command = %rendered, "running");

  let output = cmd.output().map_err(|e| {
    ReleaseError::Subprocess(SubprocessError {
      command: rendered.clone(),
      code: None,
      stderr: if e.kind() == std::io::ErrorKind::NotFound {
        format!("program not found: {}", e)
      } else {
        e.to_string()
      },
    })
  })?;

  debug!(command = %rendered, status = %output.status, "finished");

  if !output.status.success() {
    return Err(ReleaseError::Subprocess(SubprocessError {
      command: rendered,
      code: output.status.code(),
      stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }));
  }

  Ok(output)
}

/// Run a command and return its trimmed stdout
pub fn run_stdout(cmd: &mut Command) -> ReleaseResult<String> {
  let output = run(cmd)?;
  Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
