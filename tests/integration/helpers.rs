//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A scratch area holding a release target and the archives released into it
pub struct TestTarget {
  _root: TempDir,
  /// Canonical scratch root
  pub base: PathBuf,
  /// Release target (not created until `init`)
  pub path: PathBuf,
}

impl TestTarget {
  /// Create a scratch area with an uninitialized target
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let base = fs::canonicalize(root.path())?;
    let path = base.join("target");
    Ok(Self { _root: root, base, path })
  }

  /// Create a scratch area and run `cutover init` on it
  pub fn initialized() -> Result<Self> {
    let target = Self::new()?;
    run_cutover_ok(&target.base, &["init", target.path_str()])?;
    Ok(target)
  }

  pub fn path_str(&self) -> &str {
    self.path.to_str().unwrap_or_default()
  }

  /// Build a `.tar.gz` archive with the given files
  pub fn archive(&self, name: &str, files: &[(&str, &str)]) -> Result<PathBuf> {
    let staging = self.base.join(format!("{}-staging", name));
    fs::create_dir_all(&staging)?;
    for (file, content) in files {
      let file_path = staging.join(file);
      if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
      }
      fs::write(file_path, content)?;
    }

    let archive = self.base.join(format!("{}.tar.gz", name));
    let output = Command::new("tar")
      .arg("-czf")
      .arg(&archive)
      .arg("-C")
      .arg(&staging)
      .arg(".")
      .output()
      .context("Failed to run tar")?;
    if !output.status.success() {
      anyhow::bail!("tar failed: {}", String::from_utf8_lossy(&output.stderr));
    }

    Ok(archive)
  }

  /// Overwrite the post_install hook
  pub fn write_hook(&self, body: &str) -> Result<()> {
    fs::write(self.path.join("post_install.sh"), format!("#!/usr/bin/env bash\n{}\n", body))?;
    Ok(())
  }

  /// Contents of the pointer file
  pub fn pointer(&self) -> Result<String> {
    Ok(fs::read_to_string(self.path.join(".lock"))?)
  }

  /// Where the `current` symlink points
  pub fn current(&self) -> Result<PathBuf> {
    Ok(fs::read_link(self.path.join("current"))?)
  }

  pub fn release_dir(&self, number: i64) -> PathBuf {
    self.path.join("releases").join(number.to_string())
  }

  /// Release numbers present on disk, sorted
  pub fn releases(&self) -> Result<Vec<i64>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(self.path.join("releases"))? {
      let name = entry?.file_name();
      found.push(name.to_string_lossy().parse()?);
    }
    found.sort();
    Ok(found)
  }

  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(fs::read_to_string(self.path.join(path))?)
  }
}

/// Run the cutover CLI, returning its output whatever the exit status
pub fn run_cutover(cwd: &Path, args: &[&str]) -> Result<Output> {
  let cutover_bin = env!("CARGO_BIN_EXE_cutover");

  Command::new(cutover_bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("CUTOVER_LOG")
    .output()
    .context("Failed to run cutover")
}

/// Run the cutover CLI and fail unless it exits successfully
pub fn run_cutover_ok(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_cutover(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "cutover command failed: cutover {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}
