//! `cutover release` - deploy an archive into the next release slot
//!
//! Sequence: allocate the next release directory (under lock), create it,
//! extract the archive, run the post-install hook, then finalize the cutover.
//! Any failure stops before finalize, so `current` and the pointer keep naming
//! the previous release. A half-populated release directory is left behind
//! for `cutover unlock` to remove.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::core::context::TargetContext;
use crate::core::error::{CutoverError, CutoverResult, ResultExt};
use crate::core::layout::HOOK_NAME;
use crate::core::lock::ReleaseLocker;
use crate::platform::{HookEnv, Platform};

/// Run the release command
pub fn run_release(platform: &dyn Platform, target: &Path, archive: &Path, version: Option<String>) -> CutoverResult<()> {
  let ctx = TargetContext::build(target)?;
  let locker = ReleaseLocker::new(platform);
  let directory = locker.next_release_dir(target)?;

  // A dangling symlink still occupies the slot
  if fs::symlink_metadata(&directory).is_ok() {
    return Err(CutoverError::with_help(
      "Target directory already exists, did previous release fail? Use unlock to clean up failed releases",
      format!("Run `cutover unlock {}` to remove {}", target.display(), directory.display()),
    ));
  }

  println!("📦 Preparing release {}", directory.display());
  fs::create_dir_all(&directory).with_context(|| format!("Failed to create {}", directory.display()))?;

  println!("📂 Extracting {}", archive.display());
  platform.extract_archive(archive, &directory)?;

  let env = hook_env(&ctx, &directory, version);
  println!("🔧 Running {} hook", HOOK_NAME);
  platform.run_executable_file(HOOK_NAME, ctx.root(), &env)?;

  locker.finalize_release(target, &directory)?;

  info!(release = %directory.display(), "deployment complete");
  println!("\n✅ Deployment successful to {}", directory.display());

  Ok(())
}

/// Environment for the post-install hook
///
/// Configured variables first, then the reserved ones so they always win.
fn hook_env(ctx: &TargetContext, directory: &Path, version: Option<String>) -> HookEnv {
  let release = release_id(directory);
  let version = version.unwrap_or_else(|| release.clone());

  let mut env = ctx.config.hook_env();
  env.insert("RELEASE".to_string(), release);
  env.insert("VERSION".to_string(), version);
  env.insert("RELEASE_DIR".to_string(), directory.display().to_string());
  env.insert("SHARED_DIR".to_string(), ctx.layout.shared_dir().display().to_string());
  env
}

fn release_id(directory: &Path) -> String {
  directory
    .file_name()
    .map(|n| n.to_string_lossy().to_string())
    .unwrap_or_default()
}
