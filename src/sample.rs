//! Bad-sample dump visualiser
//!
//! The audio engine dumps a sample that straddles a buffer boundary as
//! `buffer_start, buffer_end, sample_start, sample_end, deoverlapped_end[, next_sample]`.
//! This module parses that dump and draws the ranges as a terminal chart.

use crate::core::error::{InputKind, MalformedInput, ReleaseError, ReleaseResult};
use serde::Serialize;
use std::fmt::Write as _;

/// Width of the marker drawn for single-position values, in samples
pub const MARKER_WIDTH: i64 = 100;

/// Columns of the chart area
pub const CHART_WIDTH: usize = 64;

const LABEL_WIDTH: usize = 18;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadSample {
  pub buffer: (i64, i64),
  pub sample: (i64, i64),
  pub deoverlapped_end: i64,
  pub next_sample: Option<i64>,
}

impl BadSample {
  /// Parse 5 or 6 comma-separated integers
  pub fn from_dump(dump: &str) -> ReleaseResult<Self> {
    let malformed = |reason: String| {
      ReleaseError::Malformed(MalformedInput {
        kind: InputKind::Dump,
        input: dump.to_string(),
        reason,
      })
    };

    let nums = dump
      .split(',')
      .map(|s| {
        let s = s.trim();
        s.parse::<i64>().map_err(|_| malformed(format!("'{}' is not an integer", s)))
      })
      .collect::<ReleaseResult<Vec<_>>>()?;

    match nums[..] {
      [b0, b1, s0, s1, end] => Ok(Self {
        buffer: (b0, b1),
        sample: (s0, s1),
        deoverlapped_end: end,
        next_sample: None,
      }),
      [b0, b1, s0, s1, end, next] => Ok(Self {
        buffer: (b0, b1),
        sample: (s0, s1),
        deoverlapped_end: end,
        next_sample: Some(next),
      }),
      _ => Err(malformed(format!("expected 5 or 6 values, got {}", nums.len()))),
    }
  }

  /// Labelled ranges in drawing order; markers are clamped at `i64::MAX`
  pub fn rows(&self) -> Vec<(&'static str, (i64, i64))> {
    let mut rows = vec![
      ("buffer", self.buffer),
      ("sample", self.sample),
      ("deoverlapped end", (self.deoverlapped_end, self.deoverlapped_end.saturating_add(MARKER_WIDTH))),
    ];
    if let Some(next) = self.next_sample {
      rows.push(("next sample", (next, next.saturating_add(MARKER_WIDTH))));
    }
    rows
  }

  /// Fixed-width text chart, one row per range plus an axis line
  pub fn render_chart(&self) -> String {
    let rows = self.rows();
    let lo = rows.iter().map(|(_, (a, b))| *a.min(b)).min().unwrap_or(0);
    let hi = rows.iter().map(|(_, (a, b))| *a.max(b)).max().unwrap_or(0);
    let scale = Scale { lo, hi };

    let mut out = String::new();
    for (label, (start, end)) in rows {
      let (from, to) = scale.columns(start.min(end), start.max(end));
      let bar: String = (0..CHART_WIDTH)
        .map(|col| if (from..=to).contains(&col) { '█' } else { '·' })
        .collect();
      let _ = writeln!(out, "{:>LABEL_WIDTH$} │{}│ {}..{}", label, bar, start, end);
    }

    let _ = writeln!(out, "{:>LABEL_WIDTH$} └{}┘", "", "─".repeat(CHART_WIDTH));
    let lo_text = lo.to_string();
    let _ = writeln!(
      out,
      "{:>LABEL_WIDTH$}  {}{:>width$}",
      "samples",
      lo_text,
      hi,
      width = CHART_WIDTH.saturating_sub(lo_text.len())
    );
    out
  }
}

struct Scale {
  lo: i64,
  hi: i64,
}

impl Scale {
  /// Map a sample range onto chart columns; every range covers at least one column
  ///
  /// Offsets are taken in i128 so the full i64 range cannot overflow.
  fn columns(&self, start: i64, end: i64) -> (usize, usize) {
    let span = (i128::from(self.hi) - i128::from(self.lo)).max(1) as f64;
    let last = (CHART_WIDTH - 1) as f64;
    let col = |x: i64| (((i128::from(x) - i128::from(self.lo)) as f64 / span) * last).round() as usize;
    let from = col(start);
    let to = col(end).max(from);
    (from, to.min(CHART_WIDTH - 1))
  }
}
