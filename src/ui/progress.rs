//! Progress indicators for long-running copies
//!
//! Uses `linya`, which draws to stderr and stays out of the way of stdout
//! reports.

use linya::{Bar, Progress};

/// Progress bar for copying a known number of files
pub struct FileProgress {
  progress: Progress,
  bar: Bar,
}

impl FileProgress {
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }
}
