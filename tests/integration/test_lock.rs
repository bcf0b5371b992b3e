//! Tests for lock contention and `unlock`

use crate::helpers::*;
use anyhow::Result;
use std::fs::OpenOptions;
use std::os::unix::io::AsRawFd;

#[test]
fn test_release_while_locked() -> Result<()> {
  let target = TestTarget::initialized()?;
  let archive = target.archive("app", &[("index.html", "v1")])?;

  let held = OpenOptions::new().read(true).write(true).open(target.path.join(".lock"))?;
  let rc = unsafe { libc::flock(held.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
  assert_eq!(rc, 0);

  let output = run_cutover(&target.base, &["release", target.path_str(), archive.to_str().unwrap()])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("Could not lock target directory"));
  assert!(!target.release_dir(1).exists());

  let status = run_cutover_ok(&target.base, &["status", target.path_str(), "--json", "--check-lock"])?;
  let json: serde_json::Value = serde_json::from_slice(&status.stdout)?;
  assert_eq!(json["locked"], true);

  let status = run_cutover_ok(&target.base, &["status", target.path_str(), "--json"])?;
  let json: serde_json::Value = serde_json::from_slice(&status.stdout)?;
  assert!(json["locked"].is_null());

  drop(held);
  run_cutover_ok(&target.base, &["release", target.path_str(), archive.to_str().unwrap()])?;

  Ok(())
}

#[test]
fn test_unlock_removes_failed_release() -> Result<()> {
  let target = TestTarget::initialized()?;
  target.write_hook("exit 1")?;
  let archive = target.archive("app", &[("index.html", "v1")])?;
  run_cutover(&target.base, &["release", target.path_str(), archive.to_str().unwrap()])?;
  assert!(target.release_dir(1).exists());

  let output = run_cutover_ok(&target.base, &["unlock", target.path_str()])?;
  assert!(stdout(&output).contains("Deployment folder successfully unlocked"));
  assert!(!target.release_dir(1).exists());

  let output = run_cutover_ok(&target.base, &["unlock", target.path_str()])?;
  assert!(stdout(&output).contains("Cleanup not needed."));

  target.write_hook("true")?;
  run_cutover_ok(&target.base, &["release", target.path_str(), archive.to_str().unwrap()])?;
  assert_eq!(target.current()?, target.release_dir(1));

  Ok(())
}
