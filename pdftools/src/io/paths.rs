//! Path identity checks.

use std::fs;
use std::path::Path;

/// True when both paths exist and resolve to the same filesystem entry.
///
/// Relative paths, `..` segments, and symlinks are resolved before comparing.
/// A path that does not exist never aliases anything.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
