mod commands;
mod core;
mod logging;
mod platform;
mod ui;
mod utils;

use clap::{Parser, Subcommand};
use crate::core::error::{CutoverError, print_error};
use std::path::PathBuf;

/// Atomic, numbered releases with symlink cutover and rollback
#[derive(Parser)]
#[command(name = "cutover")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Show debug diagnostics on stderr (overridden by CUTOVER_LOG)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Lifecycle
  // ============================================================================
  /// Setup the target folder for releases
  Init {
    /// Target directory
    target: PathBuf,
  },

  /// Create a release from an archive
  Release {
    /// Target directory
    target: PathBuf,
    /// Archive file to release (.tar.gz)
    archive: PathBuf,
    /// Human identifiable version, this will be passed to the post install script. Defaults to release number
    #[arg(short, long)]
    release: Option<String>,
  },

  /// Rollback a release
  Rollback {
    /// Target directory
    target: PathBuf,
    /// Release to rollback to
    #[arg(short, long, value_parser = clap::value_parser!(i64).range(1..))]
    release: Option<i64>,
  },

  // ============================================================================
  // Maintenance
  // ============================================================================
  /// Clean up failed release
  Unlock {
    /// Target directory
    target: PathBuf,
  },

  /// Cleanup old releases
  Cleanup {
    /// Target directory
    target: PathBuf,
    /// Number of releases to keep (default: cleanup.keep from cutover.toml, or 3)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    keep: Option<u64>,
  },

  /// Show the current release and all releases of a target
  Status {
    /// Target directory
    target: PathBuf,
    /// Output status in JSON format
    #[arg(long)]
    json: bool,
    /// Also report whether another process holds the lock (briefly takes it)
    #[arg(long)]
    check_lock: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  logging::init_logging(cli.verbose);

  // Platform is chosen once and handed to every collaborator
  let detected = match platform::detect() {
    Ok(detected) => detected,
    Err(e) => handle_error(e),
  };
  let platform = &*detected;
  tracing::debug!(platform = platform.name(), "platform selected");

  let result = match cli.command {
    // Lifecycle
    Commands::Init { target } => commands::run_init(platform, &target),
    Commands::Release {
      target,
      archive,
      release,
    } => commands::run_release(platform, &target, &archive, release),
    Commands::Rollback { target, release } => commands::run_rollback(platform, &target, release),

    // Maintenance
    Commands::Unlock { target } => commands::run_unlock(platform, &target),
    Commands::Cleanup { target, keep } => commands::run_cleanup(&target, keep.map(|k| k as usize)),
    Commands::Status {
      target,
      json,
      check_lock,
    } => commands::run_status(&target, json, check_lock),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: CutoverError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
