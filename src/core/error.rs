//! Error types for feis-release with contextual messages and exit codes
//!
//! Every failure is fatal: there are no retries. Errors fall into a small
//! taxonomy (malformed input, missing path, subprocess failure) plus config and
//! I/O errors, and each knows the exit code it should produce.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for feis-release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (I/O, subprocess without an exit code)
  System = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for feis-release
#[derive(Debug)]
pub enum ReleaseError {
  /// Configuration errors
  Config(ConfigError),

  /// Unparseable version string or dump
  Malformed(MalformedInput),

  /// Expected file or directory is absent
  MissingPath { path: PathBuf, what: String },

  /// External tool returned non-zero or could not be started
  Subprocess(SubprocessError),

  /// I/O errors, with what was being attempted
  Io {
    source: io::Error,
    context: Option<String>,
  },

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ReleaseError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Create a missing path error
  pub fn missing(path: impl Into<PathBuf>, what: impl Into<String>) -> Self {
    ReleaseError::MissingPath {
      path: path.into(),
      what: what.into(),
    }
  }

  /// Add context to an existing error
  ///
  /// Context stacks outermost first; the variant (and so the exit code) is kept.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ReleaseError::Message { message, context, help } => ReleaseError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ReleaseError::Io { source, context } => ReleaseError::Io {
        source,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
      },
      _ => self,
    }
  }

  /// Get the exit code for this error
  ///
  /// Subprocess failures propagate the tool's own exit code when there is one.
  pub fn exit_code(&self) -> i32 {
    match self {
      ReleaseError::Config(_) => ExitCode::User.as_i32(),
      ReleaseError::Malformed(_) => ExitCode::User.as_i32(),
      ReleaseError::MissingPath { .. } => ExitCode::User.as_i32(),
      ReleaseError::Subprocess(e) => match e.code {
        Some(code) if code != 0 => code,
        _ => ExitCode::System.as_i32(),
      },
      ReleaseError::Io { .. } => ExitCode::System.as_i32(),
      ReleaseError::Message { .. } => ExitCode::User.as_i32(),
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::Config(e) => e.help_message(),
      ReleaseError::Malformed(e) => e.help_message(),
      ReleaseError::Subprocess(e) => e.help_message(),
      ReleaseError::MissingPath { .. } => {
        Some("Check the path, or pass --root to run from the project directory.".to_string())
      }
      ReleaseError::Message { help, .. } => help.clone(),
      ReleaseError::Io { .. } => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::Config(e) => write!(f, "{}", e),
      ReleaseError::Malformed(e) => write!(f, "{}", e),
      ReleaseError::MissingPath { path, what } => write!(f, "{} not found: {}", what, path.display()),
      ReleaseError::Subprocess(e) => write!(f, "{}", e),
      ReleaseError::Io { source, context } => match context {
        Some(ctx) => write!(f, "{}\nI/O error: {}", ctx, source),
        None => write!(f, "I/O error: {}", source),
      },
      ReleaseError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ReleaseError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReleaseError::Io { source, .. } => Some(source),
      _ => None,
    }
  }
}

impl From<io::Error> for ReleaseError {
  fn from(err: io::Error) -> Self {
    ReleaseError::Io {
      source: err,
      context: None,
    }
  }
}

impl From<String> for ReleaseError {
  fn from(msg: String) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<&str> for ReleaseError {
  fn from(msg: &str) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<toml_edit::TomlError> for ReleaseError {
  fn from(err: toml_edit::TomlError) -> Self {
    ReleaseError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for ReleaseError {
  fn from(err: toml_edit::de::Error) -> Self {
    ReleaseError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ReleaseError {
  fn from(err: serde_json::Error) -> Self {
    ReleaseError::message(format!("JSON error: {}", err))
  }
}

impl From<std::path::StripPrefixError> for ReleaseError {
  fn from(err: std::path::StripPrefixError) -> Self {
    ReleaseError::message(format!("Path strip prefix error: {}", err))
  }
}

impl From<tempfile::PersistError> for ReleaseError {
  fn from(err: tempfile::PersistError) -> Self {
    ReleaseError::from(err.error)
  }
}

impl From<walkdir::Error> for ReleaseError {
  fn from(err: walkdir::Error) -> Self {
    ReleaseError::from(io::Error::from(err))
  }
}

impl From<zip::result::ZipError> for ReleaseError {
  fn from(err: zip::result::ZipError) -> Self {
    match err {
      zip::result::ZipError::Io(e) => ReleaseError::from(e),
      other => ReleaseError::message(format!("Zip archive error: {}", other)),
    }
  }
}

impl From<glob::PatternError> for ReleaseError {
  fn from(err: glob::PatternError) -> Self {
    ReleaseError::with_help(
      format!("Invalid glob pattern: {}", err),
      "Patterns use shell glob syntax, e.g. `*meson*`.",
    )
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Explicitly requested config file does not exist
  NotFound { path: PathBuf },

  /// A field holds a value we cannot use
  InvalidField { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Omit --config to use release.toml from the project root, or the built-in defaults.".to_string())
      }
      ConfigError::InvalidField { field, .. } => Some(format!("Fix `{}` in release.toml.", field)),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => write!(f, "Configuration file not found: {}", path.display()),
      ConfigError::InvalidField { field, reason } => write!(f, "Invalid config value for {}: {}", field, reason),
    }
  }
}

/// What kind of input failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
  Version,
  Dump,
}

impl fmt::Display for InputKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      InputKind::Version => write!(f, "version"),
      InputKind::Dump => write!(f, "sample dump"),
    }
  }
}

/// Unparseable user input
#[derive(Debug)]
pub struct MalformedInput {
  pub kind: InputKind,
  pub input: String,
  pub reason: String,
}

impl MalformedInput {
  fn help_message(&self) -> Option<String> {
    match self.kind {
      InputKind::Version => Some("Versions look like MAJOR.MINOR.PATCH plus an optional suffix, e.g. 1.4.0-beta".to_string()),
      InputKind::Dump => Some("Pass 5 or 6 comma-separated integers, e.g. `0, 512, 480, 600, 560`".to_string()),
    }
  }
}

impl fmt::Display for MalformedInput {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Couldn't parse '{}' as a {}: {}", self.input, self.kind, self.reason)
  }
}

/// External tool failure
#[derive(Debug)]
pub struct SubprocessError {
  /// Rendered command line
  pub command: String,
  /// Exit code, None when the tool could not be started or was killed by a signal
  pub code: Option<i32>,
  pub stderr: String,
}

impl SubprocessError {
  fn help_message(&self) -> Option<String> {
    if self.code.is_none() && self.stderr.contains("not found") {
      Some("Make sure the tool is installed, or set its path under [tools] in release.toml.".to_string())
    } else if self.command.contains("describe") {
      Some("No tag to describe the release with. Create one, or pass --release-version.".to_string())
    } else {
      None
    }
  }
}

impl fmt::Display for SubprocessError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.code {
      Some(code) => write!(f, "Command failed with exit code {}: {}", code, self.command)?,
      None => write!(f, "Command failed: {}", self.command)?,
    }
    let stderr = self.stderr.trim();
    if !stderr.is_empty() {
      write!(f, "\n{}", stderr)?;
    }
    Ok(())
  }
}

/// Result type alias for feis-release
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReleaseError>,
{
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ReleaseError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

impl From<anyhow::Error> for ReleaseError {
  fn from(err: anyhow::Error) -> Self {
    ReleaseError::message(err.to_string())
  }
}
