//! Resolved target context - build once per command, pass by reference
//!
//! Commands that work on an initialized target need the canonical layout and
//! the optional `cutover.toml` together. [`TargetContext::build`] resolves both
//! in one place so every handler applies the same checks.

use crate::core::config::TargetConfig;
use crate::core::error::CutoverResult;
use crate::core::layout::TargetLayout;
use std::path::Path;

/// Layout and configuration of an initialized release target
#[derive(Debug, Clone)]
pub struct TargetContext {
  /// Canonical target paths
  pub layout: TargetLayout,

  /// Target configuration, defaults when no config file exists
  pub config: TargetConfig,
}

impl TargetContext {
  /// Resolve `target`, require its lock file and load its configuration
  pub fn build(target: &Path) -> CutoverResult<Self> {
    let layout = TargetLayout::resolve(target)?;
    layout.ensure_initialized()?;
    let config = TargetConfig::load(layout.root())?;

    Ok(Self { layout, config })
  }

  /// Get target root as Path reference (convenience)
  pub fn root(&self) -> &Path {
    self.layout.root()
  }
}
