//! Core engine for cutover
//!
//! - **config**: Optional per-target configuration (cutover.toml)
//! - **context**: Resolved target layout + config shared by command handlers
//! - **error**: Failure taxonomy with contextual help and exit codes
//! - **layout**: Paths of the lock file, releases, shared dir and `current` link
//! - **lock**: Release number allocation under `flock` and the atomic cutover

pub mod config;
pub mod context;
pub mod error;
pub mod layout;
pub mod lock;
