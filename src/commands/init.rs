use std::fs;
use std::path::Path;

use crate::core::error::{CutoverError, CutoverResult, ResultExt};
use crate::core::layout::{HOOK_NAME, TargetLayout};
use crate::platform::Platform;

/// Tools the Linux platform shells out to
const REQUIRED_TOOLS: [&str; 3] = ["ln", "tar", "bash"];

const HOOK_HEADER: &str = "Put post release scripts here, these will be ran after the release has been\n\
setup but before switching the symlink. This is great to warm any caches etc.\n\
\n\
The following extra ENV vars are defined:\n  \
- RELEASE = Release number, this will always be sequential\n  \
- VERSION = Can be user specified version number, if not specified, same as RELEASE\n  \
- RELEASE_DIR = Directory in which the release is done\n  \
- SHARED_DIR = Directory for any shared resources\n";

/// Run the init command to prepare a target directory for releases
pub fn run_init(platform: &dyn Platform, target: &Path) -> CutoverResult<()> {
  check_env(platform)?;

  fs::create_dir_all(target).with_context(|| format!("Failed to create {}", target.display()))?;
  let layout = TargetLayout::resolve(target)?;

  if layout.is_initialized() {
    return Err(CutoverError::with_help(
      "Target folder already contains a lock file",
      "The target is already initialized. Use `cutover release` to deploy.",
    ));
  }

  println!("📦 Initializing release target at: {}", layout.root().display());

  fs::create_dir_all(layout.releases_dir())?;
  fs::create_dir_all(layout.shared_dir())?;
  fs::write(layout.lock_file(), "")?;

  platform.create_executable_file(HOOK_NAME, layout.root(), HOOK_HEADER)?;

  println!("\n✅ Target initialized");
  println!("   Hook script: {}/{}.sh", layout.root().display(), HOOK_NAME);
  println!("\n🚀 Next steps:");
  println!("   1. Edit {}.sh to warm caches or link shared resources", HOOK_NAME);
  println!("   2. Run: cutover release {} <archive.tar.gz>", layout.root().display());

  Ok(())
}

/// First missing tool, if any
fn check_env(platform: &dyn Platform) -> CutoverResult<()> {
  for tool in REQUIRED_TOOLS {
    if !platform.exists(tool) {
      return Err(CutoverError::with_help(
        format!("{} not found", tool),
        format!("Install `{}` and make sure it is on PATH.", tool),
      ));
    }
  }
  Ok(())
}
