//! Single-PDF extraction: resolve the converter, run it, optionally clean.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::error::ExtractError;
use crate::io::config::ToolsConfig;
use crate::io::locate::resolve_tool;
use crate::io::paths::same_file;
use crate::io::tool::{ConvertRequest, ToolRunner};
use crate::text::clean_text;

/// Inputs for one extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRequest {
    pub pdf_path: PathBuf,
    pub output_path: PathBuf,
    /// Explicit converter path. Disables the candidate search.
    pub tool: Option<PathBuf>,
    /// Rewrite the output as cleaned printable ASCII.
    pub clean: bool,
}

/// What a successful extraction did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    pub tool: PathBuf,
    pub pdf_path: PathBuf,
    pub output_path: PathBuf,
    /// Size of the cleaned output file, when cleaning was requested.
    pub cleaned_bytes: Option<u64>,
}

/// Run the converter on `request.pdf_path`, writing `request.output_path`.
///
/// Candidate locations in `config` are resolved against `base_dir`. An output
/// path that names the input PDF is rejected before anything is touched.
/// Otherwise any existing output file is removed first so a failed run never
/// leaves stale text behind.
#[instrument(skip_all, fields(pdf = %request.pdf_path.display()))]
pub fn extract<R: ToolRunner>(
    request: &ExtractRequest,
    config: &ToolsConfig,
    base_dir: &Path,
    runner: &R,
) -> Result<ExtractReport, ExtractError> {
    if same_file(&request.pdf_path, &request.output_path) {
        return Err(ExtractError::OutputIsInput {
            path: request.output_path.clone(),
        });
    }

    let tool = resolve_tool(
        request.tool.as_deref(),
        base_dir,
        &config.candidates,
        &config.executable_name,
    )?;
    info!(tool = %tool.display(), "converter resolved");

    remove_stale_output(&request.output_path);

    let convert = ConvertRequest {
        tool: tool.clone(),
        pdf_path: request.pdf_path.clone(),
        output_path: request.output_path.clone(),
        timeout: config.timeout(),
        output_limit_bytes: config.output_limit_bytes,
    };
    let outcome = runner.run(&convert).map_err(|source| ExtractError::Run {
        tool: tool.clone(),
        source,
    })?;

    if outcome.timed_out {
        return Err(ExtractError::TimedOut {
            tool,
            secs: config.timeout_secs.unwrap_or_default(),
        });
    }
    if !outcome.success {
        return Err(ExtractError::ToolFailed {
            tool,
            code: outcome.exit_code,
            stderr: outcome.stderr,
        });
    }

    let cleaned_bytes = if request.clean {
        Some(clean_output(&request.output_path)?)
    } else {
        None
    };

    Ok(ExtractReport {
        tool,
        pdf_path: request.pdf_path.clone(),
        output_path: request.output_path.clone(),
        cleaned_bytes,
    })
}

fn remove_stale_output(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(output = %path.display(), "removed existing output file"),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            warn!(output = %path.display(), err = %err, "could not remove existing output file");
        }
    }
}

/// Clean the converter's output in place and return the new size in bytes.
fn clean_output(path: &Path) -> Result<u64, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::OutputMissing {
            path: path.to_path_buf(),
        });
    }
    let raw = fs::read(path).map_err(|source| io_error("read", path, source))?;
    let cleaned = clean_text(&String::from_utf8_lossy(&raw));
    fs::write(path, &cleaned).map_err(|source| io_error("write", path, source))?;
    let size = fs::metadata(path).map_err(|source| io_error("stat", path, source))?.len();
    debug!(output = %path.display(), size, "cleaned output");
    Ok(size)
}

fn io_error(context: &'static str, path: &Path, source: std::io::Error) -> ExtractError {
    ExtractError::Io {
        context,
        path: path.to_path_buf(),
        source,
    }
}
