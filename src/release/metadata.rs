//! Metadata updater: rewrite the project version in build and packaging files
//!
//! Targets are updated all-or-nothing:
//! 1. every target must exist before anything is touched
//! 2. in-process rewrites (control files, Cargo manifests) are computed and
//!    staged into temporary files next to their targets
//! 3. targets are mutated in order (meson through its rewriter, the rest by
//!    atomic rename); if one fails, the original bytes of every target mutated
//!    so far are written back

use crate::core::config::{MetadataTarget, ToolsConfig};
use crate::core::error::{InputKind, MalformedInput, ReleaseError, ReleaseResult, ResultExt};
use crate::core::process;
use crate::release::version::Version;
use crate::utils;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use toml_edit::{DocumentMut, Item, TableLike, Value};
use tracing::{debug, error, info};

/// A rewritten metadata file
#[derive(Debug, Clone, Serialize)]
pub struct UpdatedFile {
  /// Path relative to the project root
  pub path: PathBuf,
  pub kind: &'static str,
  /// Number of lines rewritten (control files only)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub lines: Option<usize>,
}

/// Rewrites version fields of the configured metadata targets
pub struct MetadataUpdater<'a> {
  root: &'a Path,
  tools: &'a ToolsConfig,
}

/// How a target gets its new contents
enum Pending {
  /// Run the build tool's rewriter
  Meson { source_dir: PathBuf },
  /// Persist a staged temporary file over the target
  Staged(NamedTempFile),
}

impl<'a> MetadataUpdater<'a> {
  pub fn new(root: &'a Path, tools: &'a ToolsConfig) -> Self {
    Self { root, tools }
  }

  /// Rewrite the version field of every target
  pub fn apply(&self, version: &Version, targets: &[MetadataTarget]) -> ReleaseResult<Vec<UpdatedFile>> {
    // Preflight: nothing is written unless every target exists, and each file is rewritten once
    let mut seen = HashSet::with_capacity(targets.len());
    for target in targets {
      let path = self.root.join(target.path());
      if !path.is_file() {
        return Err(ReleaseError::missing(path, format!("Metadata file ({})", target.kind())));
      }
      let canonical = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", path.display()))?;
      if !seen.insert(canonical) {
        return Err(ReleaseError::with_help(
          format!("Metadata file targeted more than once: {}", target.path().display()),
          "List each file once under [[bump.targets]].",
        ));
      }
      if let MetadataTarget::Meson { .. } = target
        && path.file_name().is_none_or(|name| name != "meson.build")
      {
        return Err(ReleaseError::with_help(
          format!("Meson target must point at a meson.build file: {}", target.path().display()),
          "Set `path` of the meson target to `<dir>/meson.build`.",
        ));
      }
    }

    // Snapshot originals and stage in-process rewrites
    let mut snapshots = Vec::with_capacity(targets.len());
    let mut pending = Vec::with_capacity(targets.len());
    let mut reports = Vec::with_capacity(targets.len());

    for target in targets {
      let path = self.root.join(target.path());
      let original = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;

      let (work, lines) = match target {
        MetadataTarget::Meson { path: rel } => {
          let source_dir = match rel.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
          };
          (Pending::Meson { source_dir }, None)
        }
        MetadataTarget::Control { key, .. } => {
          let content = String::from_utf8(original.clone())
            .map_err(|_| ReleaseError::message(format!("{} is not valid UTF-8", path.display())))?;
          let (rewritten, count) = rewrite_key_lines(&content, key, &version.to_string());
          if count == 0 {
            return Err(ReleaseError::with_help(
              format!("No line starting with '{}' in {}", key, target.path().display()),
              "Add the version field to the file, or fix `key` of the control target.",
            ));
          }
          (Pending::Staged(utils::stage_file(&path, rewritten.as_bytes())?), Some(count))
        }
        MetadataTarget::Cargo { .. } => {
          let content = String::from_utf8(original.clone())
            .map_err(|_| ReleaseError::message(format!("{} is not valid UTF-8", path.display())))?;
          let rewritten =
            set_manifest_version(&content, version).with_context(|| format!("Failed to update {}", path.display()))?;
          (Pending::Staged(utils::stage_file(&path, rewritten.as_bytes())?), None)
        }
      };

      snapshots.push((path, original));
      pending.push(work);
      reports.push(UpdatedFile {
        path: target.path().to_path_buf(),
        kind: target.kind(),
        lines,
      });
    }

    // Mutate; roll back everything already written on the first failure
    for (index, work) in pending.into_iter().enumerate() {
      let path = &snapshots[index].0;
      let result = match work {
        Pending::Meson { source_dir } => self.meson_rewrite(&source_dir, version),
        Pending::Staged(temp) => temp
          .persist(path)
          .map(|_| ())
          .with_context(|| format!("Failed to replace {}", path.display())),
      };

      match result {
        Ok(()) => debug!(path = %path.display(), "version rewritten"),
        Err(err) => {
          // the failing meson call may have written partially, so restore it too
          rollback(&snapshots[..=index]);
          return Err(err);
        }
      }
    }

    info!(version = %version, files = reports.len(), "metadata updated");
    Ok(reports)
  }

  /// `meson rewrite --sourcedir <dir> kwargs set project / version <version>`
  fn meson_rewrite(&self, source_dir: &Path, version: &Version) -> ReleaseResult<()> {
    let mut cmd = process::tool_command(&self.tools.meson, self.root);
    cmd
      .arg("rewrite")
      .arg("--sourcedir")
      .arg(source_dir)
      .args(["kwargs", "set", "project", "/", "version"])
      .arg(version.to_string());
    process::run(&mut cmd)?;
    Ok(())
  }
}

/// Restore original file contents after a failed update
fn rollback(snapshots: &[(PathBuf, Vec<u8>)]) {
  for (path, original) in snapshots {
    if let Err(err) = utils::write_atomic(path, original) {
      error!(path = %path.display(), error = %err, "failed to restore original contents");
    }
  }
}

/// Rewrite the value of every line starting with `key`
///
/// The key, the whitespace following it and the line ending are kept; all other
/// lines are returned byte-for-byte. Returns the new text and the number of
/// rewritten lines.
pub fn rewrite_key_lines(content: &str, key: &str, value: &str) -> (String, usize) {
  let mut out = String::with_capacity(content.len() + value.len());
  let mut count = 0;

  for line in content.split_inclusive('\n') {
    let Some(rest) = line.strip_prefix(key) else {
      out.push_str(line);
      continue;
    };

    let ending = if line.ends_with("\r\n") {
      "\r\n"
    } else if line.ends_with('\n') {
      "\n"
    } else {
      ""
    };
    let body = &rest[..rest.len() - ending.len()];
    let spacing_len = body.len() - body.trim_start_matches([' ', '\t']).len();

    out.push_str(key);
    out.push_str(&body[..spacing_len]);
    out.push_str(value);
    out.push_str(ending);
    count += 1;
  }

  (out, count)
}

/// Set `[package].version` (or `[workspace.package].version`) in a Cargo manifest
///
/// Comments and formatting are preserved. Cargo only accepts semver versions,
/// so anything else is rejected before the file is touched.
pub fn set_manifest_version(content: &str, version: &Version) -> ReleaseResult<String> {
  let rendered = version.to_string();
  if let Err(e) = semver::Version::parse(&rendered) {
    return Err(ReleaseError::Malformed(MalformedInput {
      kind: InputKind::Version,
      input: rendered,
      reason: format!("Cargo manifests need a semver version ({})", e),
    }));
  }

  let mut doc: DocumentMut = content.parse()?;

  let mut updated = doc
    .get_mut("package")
    .and_then(Item::as_table_like_mut)
    .is_some_and(|package| set_version_field(package, &rendered));

  if !updated {
    updated = doc
      .get_mut("workspace")
      .and_then(Item::as_table_like_mut)
      .and_then(|workspace| workspace.get_mut("package"))
      .and_then(Item::as_table_like_mut)
      .is_some_and(|package| set_version_field(package, &rendered));
  }

  if !updated {
    return Err(ReleaseError::with_help(
      "No version field in [package] or [workspace.package]",
      "Add `version = \"...\"` to the manifest.",
    ));
  }

  Ok(doc.to_string())
}

/// Replace a plain string `version` value, keeping its decoration
///
/// Returns false for missing or inherited (`version.workspace = true`) fields.
fn set_version_field(table: &mut dyn TableLike, version: &str) -> bool {
  let Some(value) = table.get_mut("version").and_then(Item::as_value_mut) else {
    return false;
  };
  if !value.is_str() {
    return false;
  }

  let decor = value.decor().clone();
  *value = Value::from(version);
  *value.decor_mut() = decor;
  true
}
