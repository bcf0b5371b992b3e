//! Linux platform backed by system tools
//!
//! - `sh -c 'command -v'` to locate executables
//! - `tar -xzf` to extract release archives
//! - `/bin/bash` to run hook scripts
//! - `ln --symbolic --force --no-dereference` for the cutover symlink

use super::{HookEnv, Platform, render_script, script_path};
use crate::core::error::{CutoverError, CutoverResult, ExecutionFailure, ResultExt};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Owner rwx, group/other r (the hook only needs to be runnable by the deploy user)
const SCRIPT_MODE: u32 = 0o744;

/// Platform implementation for Linux hosts
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxPlatform;

impl LinuxPlatform {
  pub fn new() -> Self {
    Self
  }

  /// Run a command to completion, capturing stdout/stderr
  ///
  /// Stdin is closed. `env` is layered on top of the inherited environment.
  /// Returns stdout on a zero exit status.
  fn run(&self, mut cmd: Command, env: &HookEnv) -> Result<String, ExecutionFailure> {
    let rendered = render_command(&cmd);
    cmd.envs(env).stdin(Stdio::null());

    debug!(command = %rendered, "spawning");
    let output = cmd.output().map_err(|e| ExecutionFailure::spawn(&rendered, &e))?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
      debug!(command = %rendered, status = ?output.status.code(), "command failed");
      return Err(ExecutionFailure {
        command: rendered,
        exit_code: output.status.code(),
        stdout,
        stderr,
      });
    }

    Ok(stdout)
  }
}

impl Platform for LinuxPlatform {
  fn name(&self) -> &'static str {
    "linux"
  }

  fn exists(&self, executable: &str) -> bool {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", "command -v \"$1\"", "sh", executable]);
    self.run(cmd, &HookEnv::new()).is_ok()
  }

  fn create_executable_file(&self, name: &str, directory: &Path, header: &str) -> CutoverResult<()> {
    let file = script_path(directory, name);

    fs::write(&file, render_script(header)).with_context(|| format!("Failed to write {}", file.display()))?;
    fs::set_permissions(&file, fs::Permissions::from_mode(SCRIPT_MODE))
      .with_context(|| format!("Failed to set permissions on {}", file.display()))?;

    Ok(())
  }

  fn run_executable_file(&self, name: &str, directory: &Path, env: &HookEnv) -> CutoverResult<()> {
    let file = script_path(directory, name);

    if !file.exists() {
      debug!(script = %file.display(), "no hook script, skipping");
      return Ok(());
    }

    let mut cmd = Command::new("/bin/bash");
    cmd.arg(&file);
    self.run(cmd, env)?;

    Ok(())
  }

  fn extract_archive(&self, archive: &Path, target: &Path) -> CutoverResult<()> {
    let mut cmd = Command::new("tar");
    cmd.arg("-xzf").arg(archive).arg("-C").arg(target);

    self
      .run(cmd, &HookEnv::new())
      .map_err(|failure| CutoverError::ExtractionFailed {
        archive: archive.to_path_buf(),
        destination: target.to_path_buf(),
        failure,
      })?;

    Ok(())
  }

  fn symlink(&self, source: &Path, link: &Path) -> CutoverResult<()> {
    let mut cmd = Command::new("ln");
    cmd
      .args(["--symbolic", "--force", "--no-dereference"])
      .arg(source)
      .arg(link);
    self.run(cmd, &HookEnv::new())?;

    Ok(())
  }
}

/// Human-readable rendering of a command line for diagnostics
fn render_command(cmd: &Command) -> String {
  let mut parts = vec![cmd.get_program().to_string_lossy().to_string()];
  parts.extend(cmd.get_args().map(|a| a.to_string_lossy().to_string()));
  parts.join(" ")
}
