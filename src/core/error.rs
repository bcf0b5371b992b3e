//! Error types for cutover with contextual messages and exit codes
//!
//! Every failure of the release lifecycle is a value of [`CutoverError`].
//! Nothing in the engine retries: each variant is terminal for the current
//! invocation and the exit code tells the caller whether a retry makes sense.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for cutover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (uninitialized target, missing release, bad config)
  User = 1,
  /// System error (I/O, extraction, hook, symlink)
  System = 2,
  /// Another process holds the target lock, safe to retry later
  Locked = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Captured outcome of an external process that exited unsuccessfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionFailure {
  /// Rendered command line, for diagnostics only
  pub command: String,
  /// Exit status, `None` when killed by a signal or never spawned
  pub exit_code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl ExecutionFailure {
  /// Failure for a process that could not be started at all
  pub fn spawn(command: impl Into<String>, err: &io::Error) -> Self {
    Self {
      command: command.into(),
      exit_code: None,
      stdout: String::new(),
      stderr: err.to_string(),
    }
  }
}

impl fmt::Display for ExecutionFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.exit_code {
      Some(code) => write!(f, "Failed to execute command [{}]: {}", code, self.command)?,
      None => write!(f, "Failed to execute command: {}", self.command)?,
    }
    let stderr = self.stderr.trim();
    if !stderr.is_empty() {
      write!(f, "\n{}", stderr)?;
    }
    Ok(())
  }
}

/// Main error type for cutover
#[derive(Debug)]
pub enum CutoverError {
  /// Target has no `.lock` file (or does not exist)
  ProjectUninitialized { target: PathBuf },

  /// Non-blocking lock attempt on the pointer file failed
  LockContention { lock_file: PathBuf },

  /// The archive tool exited non-zero
  ExtractionFailed {
    archive: PathBuf,
    destination: PathBuf,
    failure: ExecutionFailure,
  },

  /// A wrapped process (hook, symlink, locate) exited non-zero
  Execution(ExecutionFailure),

  /// The symlink swap failed; the pointer file was left untouched
  FinalizeFailed {
    release_dir: PathBuf,
    failure: Box<CutoverError>,
  },

  /// No platform implementation for the running OS
  PlatformUnsupported { os: String },

  /// Configuration errors
  Config(ConfigError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl CutoverError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    CutoverError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    CutoverError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      CutoverError::Message { message, context, help } => CutoverError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      CutoverError::Io(err) => CutoverError::Message {
        message: ctx_str,
        context: Some(err.to_string()),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      CutoverError::ProjectUninitialized { .. } => ExitCode::User,
      CutoverError::LockContention { .. } => ExitCode::Locked,
      CutoverError::ExtractionFailed { .. } => ExitCode::System,
      CutoverError::Execution(_) => ExitCode::System,
      CutoverError::FinalizeFailed { .. } => ExitCode::System,
      CutoverError::PlatformUnsupported { .. } => ExitCode::System,
      CutoverError::Config(_) => ExitCode::User,
      CutoverError::Io(_) => ExitCode::System,
      CutoverError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      CutoverError::ProjectUninitialized { target } => {
        Some(format!("Run `cutover init {}` to prepare the target.", target.display()))
      }
      CutoverError::LockContention { lock_file } => Some(format!(
        "Retry once the other release finishes. The lock is held on {}",
        lock_file.display()
      )),
      CutoverError::ExtractionFailed { destination, .. } => Some(format!(
        "The partially extracted release is left in {}. Run `cutover unlock` to remove it.",
        destination.display()
      )),
      CutoverError::FinalizeFailed { .. } => {
        Some("The previous release is still recorded as current. Fix the symlink error and release again.".to_string())
      }
      CutoverError::Execution(failure) if !failure.stdout.trim().is_empty() => {
        Some(format!("Command output:\n{}", failure.stdout.trim()))
      }
      CutoverError::PlatformUnsupported { .. } => Some("cutover currently runs on Linux only.".to_string()),
      CutoverError::Config(e) => e.help_message(),
      CutoverError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for CutoverError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CutoverError::ProjectUninitialized { .. } => {
        write!(f, "Target folder doesn't appear a release target, did you run init?")
      }
      CutoverError::LockContention { .. } => write!(
        f,
        "Could not lock target directory, some other process might be attempting to release?"
      ),
      CutoverError::ExtractionFailed { archive, failure, .. } => {
        write!(f, "Failed to extract archive {}\n{}", archive.display(), failure)
      }
      CutoverError::Execution(failure) => write!(f, "{}", failure),
      CutoverError::FinalizeFailed { failure, .. } => {
        write!(f, "Failed to finalize the release\n{}", failure)
      }
      CutoverError::PlatformUnsupported { os } => write!(f, "Unsupported platform {}", os),
      CutoverError::Config(e) => write!(f, "{}", e),
      CutoverError::Io(e) => write!(f, "I/O error: {}", e),
      CutoverError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for CutoverError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      CutoverError::Io(e) => Some(e),
      CutoverError::FinalizeFailed { failure, .. } => Some(failure.as_ref()),
      _ => None,
    }
  }
}

impl From<io::Error> for CutoverError {
  fn from(err: io::Error) -> Self {
    CutoverError::Io(err)
  }
}

impl From<String> for CutoverError {
  fn from(msg: String) -> Self {
    CutoverError::message(msg)
  }
}

impl From<&str> for CutoverError {
  fn from(msg: &str) -> Self {
    CutoverError::message(msg)
  }
}

impl From<ExecutionFailure> for CutoverError {
  fn from(failure: ExecutionFailure) -> Self {
    CutoverError::Execution(failure)
  }
}

impl From<serde_json::Error> for CutoverError {
  fn from(err: serde_json::Error) -> Self {
    CutoverError::message(format!("JSON error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Config file exists but could not be parsed
  Invalid { path: PathBuf, reason: String },

  /// A value is out of its allowed range
  OutOfRange { field: String, value: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Invalid { path, .. } => Some(format!("Fix or remove {}", path.display())),
      ConfigError::OutOfRange { field, .. } if field == "cleanup.keep" => {
        Some("Keep at least one release (the current one).".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Invalid { path, reason } => {
        write!(f, "Invalid configuration in {}: {}", path.display(), reason)
      }
      ConfigError::OutOfRange { field, value } => {
        write!(f, "Configuration value out of range: {} = {}", field, value)
      }
    }
  }
}

/// Result type alias for cutover
pub type CutoverResult<T> = Result<T, CutoverError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> CutoverResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> CutoverResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<CutoverError>,
{
  fn context(self, ctx: impl Into<String>) -> CutoverResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> CutoverResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Print an error to stderr with its help text
pub fn print_error(error: &CutoverError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
