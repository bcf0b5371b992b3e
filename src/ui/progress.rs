//! Progress indicators for long-running operations
//!
//! Uses `linya`, which draws to stderr and leaves stdout for command output

use linya::{Bar, Progress};

/// Progress bar for removing release directories
pub struct RemovalProgress {
  progress: Progress,
  bar: Bar,
}

impl RemovalProgress {
  /// Create a new progress bar for `total` removals
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
