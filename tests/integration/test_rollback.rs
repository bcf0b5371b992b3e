//! Tests for the `rollback` command

use crate::helpers::*;
use anyhow::Result;

fn release_versions(target: &TestTarget, count: usize) -> Result<()> {
  for v in 1..=count {
    let archive = target.archive(&format!("v{}", v), &[("version.txt", v.to_string().as_str())])?;
    run_cutover_ok(&target.base, &["release", target.path_str(), archive.to_str().unwrap()])?;
  }
  Ok(())
}

#[test]
fn test_rollback_to_previous() -> Result<()> {
  let target = TestTarget::initialized()?;
  release_versions(&target, 2)?;

  run_cutover_ok(&target.base, &["rollback", target.path_str()])?;

  assert_eq!(target.pointer()?, target.release_dir(1).to_str().unwrap());
  assert_eq!(target.read_file("current/version.txt")?, "1");

  Ok(())
}

#[test]
fn test_rollback_to_release_number() -> Result<()> {
  let target = TestTarget::initialized()?;
  release_versions(&target, 3)?;

  run_cutover_ok(&target.base, &["rollback", target.path_str(), "--release", "1"])?;
  assert_eq!(target.read_file("current/version.txt")?, "1");

  let output = run_cutover(&target.base, &["rollback", target.path_str(), "--release", "9"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Target release could not be found."));
  assert_eq!(target.read_file("current/version.txt")?, "1");

  Ok(())
}

#[test]
fn test_rollback_without_previous() -> Result<()> {
  let target = TestTarget::initialized()?;
  release_versions(&target, 1)?;

  let output = run_cutover(&target.base, &["rollback", target.path_str()])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Previous release could not be found, cannot rollback."));

  Ok(())
}

#[test]
fn test_rollback_before_first_release() -> Result<()> {
  let target = TestTarget::initialized()?;

  let output = run_cutover(&target.base, &["rollback", target.path_str()])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("did you run init?"));

  Ok(())
}

#[test]
fn test_release_after_rollback_continues_numbering() -> Result<()> {
  let target = TestTarget::initialized()?;
  release_versions(&target, 2)?;
  run_cutover_ok(&target.base, &["rollback", target.path_str()])?;

  // Pointer names release 1 and release 2 is still on disk
  let archive = target.archive("v3", &[("version.txt", "3")])?;
  let output = run_cutover(&target.base, &["release", target.path_str(), archive.to_str().unwrap()])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("did previous release fail?"));

  Ok(())
}
