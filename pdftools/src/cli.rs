//! CLI command implementations.
//!
//! Each command runs one operation and prints plain-text status lines to the
//! given writer (stdout in the binary), returning the process exit code.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use tracing::debug;

use crate::exit_codes;
use crate::extract::{ExtractRequest, extract};
use crate::io::config::ToolsConfig;
use crate::io::tool::ToolRunner;
use crate::setup::{SetupRequest, setup};

pub const EXTRACT_USAGE: &str =
    "Usage: pdftools <pdf_file> <output_text_file> [tool_path] [--clean]";
pub const SETUP_USAGE: &str = "Usage: pdftools setup <source_dir> [target_dir]";

/// Print both usage lines.
pub fn print_usage<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "{EXTRACT_USAGE}")?;
    writeln!(out, "  or")?;
    writeln!(out, "{SETUP_USAGE}")?;
    Ok(())
}

/// Print the setup-specific complaint about a missing source directory.
pub fn print_missing_source<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "Error: Missing source directory")?;
    writeln!(out, "{SETUP_USAGE}")?;
    Ok(())
}

/// Extract one PDF and report the result.
pub fn extract_command<R: ToolRunner, W: Write>(
    request: &ExtractRequest,
    config: &ToolsConfig,
    base_dir: &Path,
    runner: &R,
    out: &mut W,
) -> Result<i32> {
    match extract(request, config, base_dir, runner) {
        Ok(report) => {
            writeln!(
                out,
                "Successfully extracted text from {} to {}",
                report.pdf_path.display(),
                report.output_path.display()
            )?;
            if let Some(size) = report.cleaned_bytes {
                writeln!(out, "Cleaned extracted text: final file size {size} bytes")?;
            }
            writeln!(out, "Text extraction completed successfully")?;
            Ok(exit_codes::OK)
        }
        Err(err) => {
            debug!(err = ?err, "extraction failed");
            writeln!(out, "Error: {err}")?;
            writeln!(out, "Failed to extract text")?;
            Ok(exit_codes::FAILURE)
        }
    }
}

/// Install the converter into the target directory and report each copy.
pub fn setup_command<W: Write>(
    request: &SetupRequest,
    config: &ToolsConfig,
    out: &mut W,
) -> Result<i32> {
    let target = request
        .target_dir
        .as_deref()
        .unwrap_or(config.default_target_dir.as_path())
        .to_path_buf();

    let mut write_err = None;
    let result = setup(request, config, |name| {
        if let Err(err) = writeln!(out, "Copied {} to {}", name, target.display()) {
            write_err.get_or_insert(err);
        }
    });
    if let Some(err) = write_err {
        return Err(err.into());
    }

    match result {
        Ok(report) => {
            writeln!(
                out,
                "Successfully set up pdftools directory at {}",
                report.target_dir.display()
            )?;
            Ok(exit_codes::OK)
        }
        Err(err) => {
            debug!(err = ?err, "setup failed");
            writeln!(out, "Error: {err}")?;
            writeln!(out, "Failed to set up pdftools directory")?;
            Ok(exit_codes::FAILURE)
        }
    }
}
