//! On-disk layout of a release target
//!
//! ```text
//! <target>/.lock               lock handle + current release pointer
//! <target>/releases/<n>/       numbered release directories
//! <target>/shared/             persistent cross-release storage
//! <target>/current -> <dir>    cutover symlink
//! <target>/post_install.sh     optional hook
//! ```

use crate::core::error::{CutoverError, CutoverResult};
use crate::utils;
use std::fs;
use std::path::{Path, PathBuf};

pub const LOCK_FILE: &str = ".lock";
pub const RELEASES_DIR: &str = "releases";
pub const SHARED_DIR: &str = "shared";
pub const CURRENT_LINK: &str = "current";
pub const HOOK_NAME: &str = "post_install";

/// Absolute paths of one release target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLayout {
  root: PathBuf,
}

impl TargetLayout {
  /// Resolve a target directory to its canonical absolute path
  ///
  /// A target that does not exist cannot hold a lock file, so it is reported
  /// as uninitialized.
  pub fn resolve(target: &Path) -> CutoverResult<Self> {
    let root = fs::canonicalize(target).map_err(|_| CutoverError::ProjectUninitialized {
      target: target.to_path_buf(),
    })?;
    Ok(Self { root })
  }

  /// Layout rooted at an already-absolute path (no canonicalization)
  #[cfg(test)]
  pub fn at(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn lock_file(&self) -> PathBuf {
    self.root.join(LOCK_FILE)
  }

  pub fn releases_dir(&self) -> PathBuf {
    self.root.join(RELEASES_DIR)
  }

  pub fn shared_dir(&self) -> PathBuf {
    self.root.join(SHARED_DIR)
  }

  pub fn current_link(&self) -> PathBuf {
    self.root.join(CURRENT_LINK)
  }

  /// Path of the numbered release directory
  ///
  /// Accepts any integer; a rollback computed from release 1 yields
  /// `releases/0` and it is up to the caller to check existence.
  pub fn release_dir(&self, number: i64) -> PathBuf {
    self.releases_dir().join(number.to_string())
  }

  /// The lock file is the only marker of an initialized target
  pub fn is_initialized(&self) -> bool {
    self.lock_file().exists()
  }

  pub fn ensure_initialized(&self) -> CutoverResult<()> {
    if !self.is_initialized() {
      return Err(CutoverError::ProjectUninitialized {
        target: self.root.clone(),
      });
    }
    Ok(())
  }

  /// Existing numbered release directories in ascending numeric order
  pub fn list_releases(&self) -> CutoverResult<Vec<(i64, PathBuf)>> {
    let dir = self.releases_dir();
    if !dir.is_dir() {
      return Ok(Vec::new());
    }

    let mut releases = Vec::new();
    for entry in fs::read_dir(&dir)? {
      let entry = entry?;
      if !entry.file_type()?.is_dir() {
        continue;
      }
      let name = entry.file_name();
      let Some(name) = name.to_str() else {
        continue;
      };
      if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        continue;
      }
      releases.push((utils::leading_integer(name), entry.path()));
    }

    releases.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(releases)
  }
}
