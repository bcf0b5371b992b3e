//! CLI commands for cutover
//!
//! One handler per subcommand. Handlers sequence calls to the core
//! ([`ReleaseLocker`](crate::core::lock::ReleaseLocker)) and the
//! [`Platform`](crate::platform::Platform), print progress to stdout and
//! return typed errors that `main` turns into exit codes.
//!
//! ## Lifecycle
//! - **init**: Prepare a target directory (lock file, releases/, shared/, hook)
//! - **release**: Extract an archive into the next release and cut over
//! - **rollback**: Cut over to the previous (or a chosen) release
//!
//! ## Maintenance
//! - **unlock**: Remove the leftover directory of a failed release
//! - **cleanup**: Delete releases older than the retention window
//! - **status**: Show pointer, symlink and releases of a target

pub mod cleanup;
pub mod init;
pub mod release;
pub mod rollback;
pub mod status;
pub mod unlock;

pub use cleanup::run_cleanup;
pub use init::run_init;
pub use release::run_release;
pub use rollback::run_rollback;
pub use status::run_status;
pub use unlock::run_unlock;
