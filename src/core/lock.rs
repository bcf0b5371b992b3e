//! Release number allocation and atomic cutover
//!
//! The `.lock` file under a target plays two roles that are kept apart here:
//!
//! - [`PointerFile::try_lock`] takes a non-blocking, advisory, whole-file
//!   `flock(LOCK_EX | LOCK_NB)`. The returned [`PointerLock`] guard releases it
//!   on drop, so the lock scope is exactly the scope of the guard.
//! - [`PointerFile::read`] / [`PointerFile::write`] access the payload: the
//!   absolute path of the current release directory, or an empty string
//!   before the first release.
//!
//! The lock only protects reading the pointer and computing the candidate
//! release path. Extraction, hook execution and finalize all run outside it;
//! two processes can still race on finalize and the last one wins.

use crate::core::error::{CutoverError, CutoverResult};
use crate::core::layout::TargetLayout;
use crate::platform::Platform;
use crate::utils;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Handle on a target's `.lock` file
pub struct PointerFile {
  path: PathBuf,
  file: File,
}

/// Exclusive lock held on a [`PointerFile`]; released on drop
pub struct PointerLock<'a> {
  pointer: &'a PointerFile,
}

impl PointerFile {
  /// Open the pointer file of an initialized target
  pub fn open(layout: &TargetLayout) -> CutoverResult<Self> {
    let path = layout.lock_file();
    let file = match OpenOptions::new().read(true).write(true).open(&path) {
      Ok(file) => file,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(CutoverError::ProjectUninitialized {
          target: layout.root().to_path_buf(),
        });
      }
      Err(e) => return Err(e.into()),
    };

    Ok(Self { path, file })
  }

  /// Try to take the exclusive lock without waiting
  pub fn try_lock(&self) -> CutoverResult<PointerLock<'_>> {
    if try_flock_exclusive(&self.file)? {
      debug!(lock_file = %self.path.display(), "lock acquired");
      return Ok(PointerLock { pointer: self });
    }

    debug!(lock_file = %self.path.display(), "lock held by another process");
    Err(CutoverError::LockContention {
      lock_file: self.path.clone(),
    })
  }

  /// Current pointer payload, trimmed; empty before the first release
  pub fn read(&self) -> CutoverResult<String> {
    let mut file = &self.file;
    file.seek(SeekFrom::Start(0))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents.trim().to_string())
  }

  /// Replace the pointer payload in place
  ///
  /// Truncate-and-write keeps the inode: other processes lock the inode, so
  /// the file must never be replaced through a rename.
  pub fn write(&self, release_dir: &Path) -> CutoverResult<()> {
    let mut file = &self.file;
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(release_dir.as_os_str().as_bytes())?;
    file.flush()?;
    debug!(lock_file = %self.path.display(), release_dir = %release_dir.display(), "pointer updated");
    Ok(())
  }
}

impl PointerLock<'_> {
  /// Read the payload while holding the lock
  pub fn read(&self) -> CutoverResult<String> {
    self.pointer.read()
  }
}

impl Drop for PointerLock<'_> {
  fn drop(&mut self) {
    unlock(&self.pointer.file);
    debug!(lock_file = %self.pointer.path.display(), "lock released");
  }
}

/// Serializes release number allocation and owns the cutover
pub struct ReleaseLocker<'p> {
  platform: &'p dyn Platform,
}

impl<'p> ReleaseLocker<'p> {
  pub fn new(platform: &'p dyn Platform) -> Self {
    Self { platform }
  }

  /// Path of the release directory the next release should use
  ///
  /// `releases/1` for a fresh target, otherwise `releases/<current + 1>`.
  /// Neither creates the directory nor touches the pointer.
  pub fn next_release_dir(&self, target: &Path) -> CutoverResult<PathBuf> {
    let layout = TargetLayout::resolve(target)?;
    let current = read_locked(&layout)?;

    let next = if current.is_empty() {
      1
    } else {
      utils::release_number(&current).checked_add(1).ok_or_else(|| {
        CutoverError::with_help(
          "Release number overflow, the pointer names the largest possible release.",
          format!("Point {} at a lower release with `cutover rollback --release <n>`.", layout.lock_file().display()),
        )
      })?
    };

    Ok(layout.release_dir(next))
  }

  /// Path of the release directory preceding the current one
  ///
  /// The result is not validated: it may name a removed release or
  /// `releases/0`. Callers check existence before finalizing.
  pub fn previous_release_dir(&self, target: &Path) -> CutoverResult<PathBuf> {
    let layout = TargetLayout::resolve(target)?;
    let current = read_locked(&layout)?;

    if current.is_empty() {
      return Err(CutoverError::ProjectUninitialized {
        target: layout.root().to_path_buf(),
      });
    }

    Ok(layout.release_dir(utils::release_number(&current) - 1))
  }

  /// Point `current` at `release_dir`, then record it in the pointer file
  ///
  /// The pointer is written only after the symlink swap succeeded. If the
  /// swap fails the pointer keeps naming the previous release.
  pub fn finalize_release(&self, target: &Path, release_dir: &Path) -> CutoverResult<()> {
    let layout = TargetLayout::resolve(target)?;
    let link = layout.current_link();

    self
      .platform
      .symlink(release_dir, &link)
      .map_err(|e| CutoverError::FinalizeFailed {
        release_dir: release_dir.to_path_buf(),
        failure: Box::new(e),
      })?;

    let pointer = PointerFile::open(&layout)?;
    pointer.write(release_dir)?;

    info!(release_dir = %release_dir.display(), "release finalized");
    Ok(())
  }
}

/// Read the pointer payload inside the lock window
fn read_locked(layout: &TargetLayout) -> CutoverResult<String> {
  let pointer = PointerFile::open(layout)?;
  let lock = pointer.try_lock()?;
  lock.read()
}

/// Try to acquire an exclusive flock on a file (non-blocking).
///
/// Returns `Ok(true)` if the lock was acquired, `Ok(false)` if it is held by
/// another open file description.
fn try_flock_exclusive(file: &File) -> io::Result<bool> {
  let fd = file.as_raw_fd();
  // SAFETY: fd is a valid descriptor owned by `file` for the whole call.
  let result = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
  if result == 0 {
    return Ok(true);
  }
  let err = io::Error::last_os_error();
  if err.kind() == io::ErrorKind::WouldBlock || err.raw_os_error() == Some(libc::EWOULDBLOCK) {
    return Ok(false);
  }
  Err(err)
}

fn unlock(file: &File) {
  // SAFETY: see try_flock_exclusive. Closing the fd would release it anyway.
  unsafe {
    libc::flock(file.as_raw_fd(), libc::LOCK_UN);
  }
}
