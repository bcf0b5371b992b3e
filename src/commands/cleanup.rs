use std::path::Path;

use tracing::info;

use crate::core::context::TargetContext;
use crate::core::error::{ConfigError, CutoverError, CutoverResult, ResultExt};
use crate::core::lock::PointerFile;
use crate::ui::progress::RemovalProgress;
use crate::utils;

/// Run the cleanup command
///
/// Keeps the current release and the `keep - 1` releases before it. Releases
/// newer than the current one (e.g. after a rollback) are never removed.
pub fn run_cleanup(target: &Path, keep: Option<usize>) -> CutoverResult<()> {
  let ctx = TargetContext::build(target)?;
  let keep = keep.unwrap_or(ctx.config.cleanup.keep);
  if keep == 0 {
    return Err(CutoverError::Config(ConfigError::OutOfRange {
      field: "cleanup.keep".to_string(),
      value: keep.to_string(),
    }));
  }

  let current = PointerFile::open(&ctx.layout)?.read()?;
  let current_path = ctx.root().join(&current);
  let releases = ctx.layout.list_releases()?;

  let current_index = releases
    .iter()
    .position(|(_, path)| !current.is_empty() && *path == current_path)
    .ok_or_else(|| {
      CutoverError::with_help(
        "Cannot determine the current release.",
        "The pointer in .lock does not name an existing release. Run `cutover status` to inspect the target.",
      )
    })?;

  let stale = &releases[..removal_count(current_index, keep)];
  if stale.is_empty() {
    println!("Nothing to clean up, {} release(s) present", releases.len());
    return Ok(());
  }

  let mut progress = RemovalProgress::new(stale.len(), "Removing old releases");
  for (number, dir) in stale {
    utils::remove_release_dir(dir).with_context(|| format!("Failed to remove {}", dir.display()))?;
    info!(release = number, dir = %dir.display(), "release removed");
    progress.inc();
  }

  println!(
    "\n✅ Removed {} release(s), kept {} up to {}",
    stale.len(),
    keep,
    current_path.display()
  );
  Ok(())
}

/// Number of releases, counted from the oldest, that fall outside the window
/// of `keep` releases ending at `current_index`
fn removal_count(current_index: usize, keep: usize) -> usize {
  (current_index + 1).saturating_sub(keep)
}
