//! End-to-end lifecycle across every command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_full_lifecycle() -> Result<()> {
  let target = TestTarget::initialized()?;
  std::fs::write(target.path.join("cutover.toml"), "[cleanup]\nkeep = 2\n")?;

  for v in 1..=4 {
    let archive = target.archive(&format!("v{}", v), &[("version.txt", v.to_string().as_str())])?;
    run_cutover_ok(&target.base, &["release", target.path_str(), archive.to_str().unwrap()])?;
  }
  assert_eq!(target.releases()?, vec![1, 2, 3, 4]);
  assert_eq!(target.read_file("current/version.txt")?, "4");

  // Status reflects the pointer and the symlink
  let status = run_cutover_ok(&target.base, &["status", target.path_str(), "--json"])?;
  let json: serde_json::Value = serde_json::from_slice(&status.stdout)?;
  assert_eq!(json["consistent"], true);
  assert_eq!(json["releases"].as_array().map(|r| r.len()), Some(4));
  assert_eq!(json["releases"][3]["current"], true);

  // Cleanup keeps the configured window
  run_cutover_ok(&target.base, &["cleanup", target.path_str()])?;
  assert_eq!(target.releases()?, vec![3, 4]);

  // CLI flag overrides the config
  run_cutover_ok(&target.base, &["cleanup", target.path_str(), "--keep", "1"])?;
  assert_eq!(target.releases()?, vec![4]);

  let output = run_cutover_ok(&target.base, &["status", target.path_str()])?;
  assert!(stdout(&output).contains("4 ← current"));

  Ok(())
}

#[test]
fn test_cleanup_rejects_zero_keep() -> Result<()> {
  let target = TestTarget::initialized()?;

  let output = run_cutover(&target.base, &["cleanup", target.path_str(), "--keep", "0"])?;
  assert_eq!(output.status.code(), Some(2));

  Ok(())
}

#[test]
fn test_uninitialized_exit_code() -> Result<()> {
  let target = TestTarget::new()?;
  std::fs::create_dir_all(&target.path)?;

  for command in ["status", "cleanup", "unlock", "rollback"] {
    let output = run_cutover(&target.base, &[command, target.path_str()])?;
    assert_eq!(output.status.code(), Some(1), "{} should fail as a user error", command);
  }

  Ok(())
}
