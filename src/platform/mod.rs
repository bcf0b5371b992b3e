//! Platform execution layer
//!
//! The only place that spawns external processes. Everything else in cutover is
//! plain filesystem logic and talks to the operating system through the
//! [`Platform`] capability, which is selected once at startup by [`detect`] and
//! passed by reference to the locker and the command handlers.

mod linux;


pub use linux::LinuxPlatform;

use crate::core::error::{CutoverError, CutoverResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Extra environment variables handed to a hook script
pub type HookEnv = BTreeMap<String, String>;

/// OS-specific process execution
///
/// All operations are synchronous and run to completion; there is no
/// cancellation once a process has been spawned.
pub trait Platform {
  /// Short platform identifier for diagnostics
  fn name(&self) -> &'static str;

  /// Whether an executable can be located. Never fails.
  fn exists(&self, executable: &str) -> bool;

  /// Write `<directory>/<name>.sh` with a commented header and mode 0744
  ///
  /// Overwrites an existing file; check first if that matters.
  fn create_executable_file(&self, name: &str, directory: &Path, header: &str) -> CutoverResult<()>;

  /// Run `<directory>/<name>.sh` with `env` merged over the inherited environment
  ///
  /// A missing script is a successful no-op.
  fn run_executable_file(&self, name: &str, directory: &Path, env: &HookEnv) -> CutoverResult<()>;

  /// Extract a gzip-compressed tarball into an existing directory
  ///
  /// Archive contents are trusted as-is.
  fn extract_archive(&self, archive: &Path, target: &Path) -> CutoverResult<()>;

  /// Create or replace `link` as a symlink to `source` without dereferencing
  /// an existing link at `link`
  fn symlink(&self, source: &Path, link: &Path) -> CutoverResult<()>;
}

/// Select the platform implementation for the running OS
pub fn detect() -> CutoverResult<Box<dyn Platform>> {
  detect_for(std::env::consts::OS)
}

fn detect_for(os: &str) -> CutoverResult<Box<dyn Platform>> {
  if os.to_ascii_lowercase().starts_with("linux") {
    return Ok(Box::new(LinuxPlatform::new()));
  }

  Err(CutoverError::PlatformUnsupported { os: os.to_string() })
}

/// Location of a named script inside a directory
pub fn script_path(directory: &Path, name: &str) -> PathBuf {
  directory.join(format!("{}.sh", name))
}

/// Render a skeleton bash script with every header line commented out
pub fn render_script(header: &str) -> String {
  let body = if header.is_empty() {
    String::new()
  } else {
    header
      .split('\n')
      .map(|line| format!("# {}", line).trim().to_string())
      .collect::<Vec<_>>()
      .join("\n")
  };

  format!("#!/usr/bin/env bash\n{}", body)
}
