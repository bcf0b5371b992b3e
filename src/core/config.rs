use crate::core::error::{ConfigError, CutoverError, CutoverResult, ResultExt};
use crate::platform::HookEnv;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Hook variables set by cutover itself; configuration cannot override them
pub const RESERVED_HOOK_VARS: [&str; 4] = ["RELEASE", "VERSION", "RELEASE_DIR", "SHARED_DIR"];

/// Per-target configuration
/// Searched in order: cutover.toml, .cutover.toml (inside the target directory)
///
/// # Example
///
/// ```toml
/// [cleanup]
/// keep = 5
///
/// [hook.env]
/// APP_ENV = "production"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
  #[serde(default)]
  pub cleanup: CleanupConfig,
  #[serde(default)]
  pub hook: HookConfig,
}

/// Retention settings for `cutover cleanup`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
  /// Number of releases to keep, counting the current one (default: 3)
  #[serde(default = "default_keep")]
  pub keep: usize,
}

fn default_keep() -> usize {
  3
}

impl Default for CleanupConfig {
  fn default() -> Self {
    Self { keep: default_keep() }
  }
}

/// Settings for the post-install hook
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookConfig {
  /// Extra environment variables for the hook
  #[serde(default)]
  pub env: HookEnv,
}

impl TargetConfig {
  /// Find config file in search order: cutover.toml, .cutover.toml
  pub fn find_config_path(target: &Path) -> Option<PathBuf> {
    let candidates = [target.join("cutover.toml"), target.join(".cutover.toml")];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load the target's config, falling back to defaults when there is none
  pub fn load(target: &Path) -> CutoverResult<Self> {
    let Some(config_path) = Self::find_config_path(target) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: TargetConfig = toml_edit::de::from_str(&content).map_err(|e| {
      CutoverError::Config(ConfigError::Invalid {
        path: config_path.clone(),
        reason: e.to_string(),
      })
    })?;

    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> CutoverResult<()> {
    if self.cleanup.keep == 0 {
      return Err(CutoverError::Config(ConfigError::OutOfRange {
        field: "cleanup.keep".to_string(),
        value: "0".to_string(),
      }));
    }
    Ok(())
  }

  /// Configured hook variables with the reserved names filtered out
  pub fn hook_env(&self) -> HookEnv {
    self
      .hook
      .env
      .iter()
      .filter(|(k, _)| !RESERVED_HOOK_VARS.contains(&k.as_str()))
      .map(|(k, v)| (k.clone(), v.clone()))
      .collect()
  }
}
