//! Diagnostics via `tracing` and `tracing-subscriber`.
//!
//! User-facing output goes to stdout with `println!`. Diagnostic events go to
//! stderr, filtered by `CUTOVER_LOG` (same syntax as `RUST_LOG`).

use tracing_subscriber::{EnvFilter, fmt, util::SubscriberInitExt};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "CUTOVER_LOG";

/// Initialize the global subscriber. Later calls are no-ops.
///
/// Without `CUTOVER_LOG`, only warnings are shown, or debug events when
/// `verbose` is set.
pub fn init_logging(verbose: bool) {
  if tracing::dispatcher::has_been_set() {
    return;
  }

  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

  let _ = fmt::Subscriber::builder()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .finish()
    .try_init();
}
