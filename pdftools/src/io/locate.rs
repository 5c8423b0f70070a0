//! Converter lookup.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ExtractError;

/// Resolve the converter executable.
///
/// An explicit path is used as-is and never falls back to the candidates.
/// Otherwise each candidate is joined onto `base_dir` and the first existing
/// path wins.
pub fn resolve_tool(
    explicit: Option<&Path>,
    base_dir: &Path,
    candidates: &[PathBuf],
    name: &str,
) -> Result<PathBuf, ExtractError> {
    if let Some(path) = explicit {
        if path.exists() {
            debug!(tool = %path.display(), "using explicit tool path");
            return Ok(path.to_path_buf());
        }
        return Err(ExtractError::ToolNotFound {
            name: name.to_string(),
            checked: vec![path.to_path_buf()],
        });
    }

    let mut checked = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let path = base_dir.join(candidate);
        if path.exists() {
            debug!(tool = %path.display(), "found tool candidate");
            return Ok(path);
        }
        checked.push(path);
    }
    Err(ExtractError::ToolNotFound {
        name: name.to_string(),
        checked,
    })
}
