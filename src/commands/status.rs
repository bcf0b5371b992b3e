use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::core::context::TargetContext;
use crate::core::error::{CutoverError, CutoverResult};
use crate::core::lock::PointerFile;

/// A release directory present on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseEntry {
  /// Release number
  pub number: i64,

  /// Absolute release directory
  pub path: PathBuf,

  /// Whether the pointer file names this release
  pub current: bool,
}

/// Status information for a release target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetStatus {
  /// Canonical target directory
  pub target: PathBuf,

  /// Release recorded in the pointer file (None before the first release)
  pub pointer: Option<PathBuf>,

  /// Where the `current` symlink points (None if missing)
  pub symlink: Option<PathBuf>,

  /// Pointer and symlink name the same release
  pub consistent: bool,

  /// Another process is allocating a release right now
  ///
  /// Only probed with `--check-lock`: the probe briefly takes the exclusive
  /// lock, so a release starting at that instant fails with lock contention.
  pub locked: Option<bool>,

  /// Releases on disk, oldest first
  pub releases: Vec<ReleaseEntry>,
}

/// Run the status command
pub fn run_status(target: &Path, json: bool, check_lock: bool) -> CutoverResult<()> {
  let status = collect_status(target, check_lock)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&status)?);
    return Ok(());
  }

  println!("📦 Target: {}", status.target.display());
  match &status.pointer {
    Some(pointer) => println!("   Current release: {}", pointer.display()),
    None => println!("   Current release: (none yet)"),
  }
  match &status.symlink {
    Some(link) => println!("   current -> {}", link.display()),
    None => println!("   current -> (missing)"),
  }
  if status.locked == Some(true) {
    println!("   🔒 Lock held by another process");
  }
  if !status.consistent {
    println!("   ⚠️  Pointer and `current` symlink disagree");
  }

  println!("\n📋 Releases ({}):", status.releases.len());
  for release in &status.releases {
    let marker = if release.current { " ← current" } else { "" };
    println!("  {}{}", release.number, marker);
  }

  Ok(())
}

/// Gather the state of a target without modifying it
///
/// The lock is left alone unless `check_lock` is set.
pub fn collect_status(target: &Path, check_lock: bool) -> CutoverResult<TargetStatus> {
  let ctx = TargetContext::build(target)?;
  let pointer_file = PointerFile::open(&ctx.layout)?;

  let locked = if check_lock {
    match pointer_file.try_lock() {
      Ok(_guard) => Some(false),
      Err(CutoverError::LockContention { .. }) => Some(true),
      Err(e) => return Err(e),
    }
  } else {
    None
  };

  let raw = pointer_file.read()?;
  let pointer = if raw.is_empty() {
    None
  } else {
    Some(ctx.root().join(raw))
  };

  let symlink = fs::read_link(ctx.layout.current_link())
    .ok()
    .map(|link| ctx.root().join(link));

  let consistent = pointer == symlink;
  if !consistent {
    warn!(
      pointer = ?pointer,
      symlink = ?symlink,
      "pointer file and current symlink diverge"
    );
  }

  let releases = ctx
    .layout
    .list_releases()?
    .into_iter()
    .map(|(number, path)| ReleaseEntry {
      current: pointer.as_deref() == Some(path.as_path()),
      number,
      path,
    })
    .collect();

  Ok(TargetStatus {
    target: ctx.root().to_path_buf(),
    pointer,
    symlink,
    consistent,
    locked,
    releases,
  })
}
