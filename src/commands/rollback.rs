use std::path::{Path, PathBuf};

use crate::core::error::{CutoverError, CutoverResult};
use crate::core::layout::TargetLayout;
use crate::core::lock::ReleaseLocker;
use crate::platform::Platform;

/// Run the rollback command
///
/// With `release`, cut over to that release number directly. Otherwise cut
/// over to the release preceding the current one. The previous release is
/// computed arithmetically, so it may already have been cleaned up.
pub fn run_rollback(platform: &dyn Platform, target: &Path, release: Option<i64>) -> CutoverResult<()> {
  let locker = ReleaseLocker::new(platform);

  let directory = match release {
    Some(number) => requested_release(target, number)?,
    None => locker.previous_release_dir(target)?,
  };

  if !directory.exists() {
    return Err(CutoverError::with_help(
      "Previous release could not be found, cannot rollback.",
      "Pick an existing release with `--release <n>` (see `cutover status`).",
    ));
  }

  println!("⏪ Rolling back to {}", directory.display());
  locker.finalize_release(target, &directory)?;
  println!("\n✅ Current release is now {}", directory.display());

  Ok(())
}

fn requested_release(target: &Path, number: i64) -> CutoverResult<PathBuf> {
  let layout = TargetLayout::resolve(target)?;
  layout.ensure_initialized()?;

  let directory = layout.release_dir(number);
  if !directory.exists() {
    return Err(CutoverError::with_help(
      "Target release could not be found.",
      format!("{} does not exist", directory.display()),
    ));
  }

  Ok(directory)
}
