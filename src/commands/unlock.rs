use std::path::Path;

use tracing::info;

use crate::core::error::{CutoverResult, ResultExt};
use crate::core::lock::ReleaseLocker;
use crate::platform::Platform;
use crate::utils;

/// Run the unlock command
///
/// A failed release leaves its directory at the next release number, which
/// blocks the next attempt. Unlock removes exactly that directory.
pub fn run_unlock(platform: &dyn Platform, target: &Path) -> CutoverResult<()> {
  let locker = ReleaseLocker::new(platform);
  let directory = locker.next_release_dir(target)?;

  if !directory.exists() {
    println!("Cleanup not needed.");
    return Ok(());
  }

  println!("🧹 Removing failed release {}", directory.display());
  utils::remove_release_dir(&directory).with_context(|| format!("Failed to remove {}", directory.display()))?;
  info!(release = %directory.display(), "failed release removed");

  println!("\n✅ Deployment folder successfully unlocked");
  Ok(())
}
