//! Utility functions for release paths and directory removal

use std::fs;
use std::io;
use std::path::Path;

/// Parse the leading integer of a path segment
///
/// Mirrors C `atol`-style parsing: leading whitespace is skipped, an optional
/// sign is honored, then decimal digits are consumed until the first
/// non-digit. A segment without any leading digits yields 0.
pub fn leading_integer(segment: &str) -> i64 {
  let s = segment.trim_start();
  let (negative, digits) = match s.as_bytes().first() {
    Some(b'-') => (true, &s[1..]),
    Some(b'+') => (false, &s[1..]),
    _ => (false, s),
  };

  let mut value: i64 = 0;
  for b in digits.bytes() {
    if !b.is_ascii_digit() {
      break;
    }
    value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
  }

  if negative { -value } else { value }
}

/// Release number stored in the trailing segment of a release path
///
/// `"/srv/app/releases/12"` → 12. A trailing slash is ignored the same way
/// `basename` ignores it.
pub fn release_number(path: &str) -> i64 {
  let trimmed = path.trim().trim_end_matches('/');
  let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
  leading_integer(segment)
}

/// Remove a release directory and everything below it
///
/// Symlinks inside the tree are unlinked, never followed, so shared resources
/// linked into a release survive.
pub fn remove_release_dir(dir: &Path) -> io::Result<()> {
  let meta = fs::symlink_metadata(dir)?;
  if meta.file_type().is_symlink() || !meta.is_dir() {
    return fs::remove_file(dir);
  }
  fs::remove_dir_all(dir)
}
