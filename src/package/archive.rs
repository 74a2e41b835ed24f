//! Zip archive and checksum of a release bundle

use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use crate::utils;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Format of the optional archive timestamp suffix
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Archive file stem: `FEIS-1.4.0` or `FEIS-1.4.0+20240131T235959`
pub fn archive_stem(bundle_name: &str, timestamp: Option<DateTime<Utc>>) -> String {
  match timestamp {
    Some(ts) => format!("{}+{}", bundle_name, ts.format(TIMESTAMP_FORMAT)),
    None => bundle_name.to_string(),
  }
}

/// Zip `bundle_dir` into `dest`
///
/// Entries are prefixed with the bundle directory name, so extracting the
/// archive recreates the bundle directory. The archive is built in a temporary
/// file next to `dest` and renamed into place. Returns the number of files.
pub fn write_zip(bundle_dir: &Path, dest: &Path) -> ReleaseResult<usize> {
  let prefix = bundle_dir
    .file_name()
    .map(PathBuf::from)
    .ok_or_else(|| ReleaseError::message(format!("Invalid bundle directory: {}", bundle_dir.display())))?;
  let dest_dir = match dest.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };

  let temp = NamedTempFile::new_in(dest_dir)
    .with_context(|| format!("Failed to create temporary archive in {}", dest_dir.display()))?;
  let mut zip = ZipWriter::new(temp.as_file());
  let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

  zip.add_directory(utils::to_slash(&prefix), options)?;

  let mut files = 0;
  for entry in WalkDir::new(bundle_dir).min_depth(1).follow_links(true).sort_by_file_name() {
    let entry = entry?;
    let name = utils::to_slash(&prefix.join(entry.path().strip_prefix(bundle_dir)?));

    if entry.file_type().is_dir() {
      zip.add_directory(name, options)?;
    } else if entry.file_type().is_file() {
      zip.start_file(name, entry_options(options, entry.path()))?;
      let mut source = File::open(entry.path()).with_context(|| format!("Failed to read {}", entry.path().display()))?;
      io::copy(&mut source, &mut zip)?;
      files += 1;
    }
  }

  zip.finish()?;
  utils::set_published_mode(temp.as_file())?;
  temp
    .persist(dest)
    .with_context(|| format!("Failed to write archive {}", dest.display()))?;

  Ok(files)
}

#[cfg(unix)]
fn entry_options(options: SimpleFileOptions, path: &Path) -> SimpleFileOptions {
  use std::os::unix::fs::PermissionsExt;

  match std::fs::metadata(path) {
    Ok(metadata) => options.unix_permissions(metadata.permissions().mode()),
    Err(_) => options,
  }
}

#[cfg(not(unix))]
fn entry_options(options: SimpleFileOptions, _path: &Path) -> SimpleFileOptions {
  options
}

/// SHA-256 of a file as lowercase hex
pub fn sha256_file(path: &Path) -> ReleaseResult<String> {
  let mut file = File::open(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let mut hasher = Sha256::new();
  io::copy(&mut file, &mut hasher)?;
  Ok(format!("{:x}", hasher.finalize()))
}

/// Write `<archive>.sha256` in `sha256sum` format; returns its path and the digest
pub fn write_checksum(archive: &Path) -> ReleaseResult<(PathBuf, String)> {
  let digest = sha256_file(archive)?;
  let file_name = archive
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .ok_or_else(|| ReleaseError::message(format!("Invalid archive path: {}", archive.display())))?;

  let checksum_path = archive.with_file_name(format!("{}.sha256", file_name));
  utils::write_atomic(&checksum_path, format!("{}  {}\n", digest, file_name).as_bytes())?;

  Ok((checksum_path, digest))
}
