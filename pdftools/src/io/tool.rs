//! Converter invocation abstraction.
//!
//! [`ToolRunner`] decouples extraction from actually spawning `pdftotext`.
//! Tests use scripted runners that return canned outcomes.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, instrument};

use crate::io::process::run_command;

/// Parameters for one converter invocation.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    /// Converter executable.
    pub tool: PathBuf,
    /// Input PDF, passed as the first positional argument.
    pub pdf_path: PathBuf,
    /// Output text file, passed as the second positional argument.
    pub output_path: PathBuf,
    /// Kill the converter after this long. `None` waits until it exits.
    pub timeout: Option<Duration>,
    /// Keep at most this many bytes of stdout/stderr.
    pub output_limit_bytes: usize,
}

/// What the converter did, as far as extraction cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
    /// Captured error stream, lossily decoded.
    pub stderr: String,
    pub timed_out: bool,
}

impl ToolOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            stderr: String::new(),
            timed_out: false,
        }
    }

    pub fn failed(exit_code: i32, stderr: &str) -> Self {
        Self {
            success: false,
            exit_code: Some(exit_code),
            stderr: stderr.to_string(),
            timed_out: false,
        }
    }
}

pub trait ToolRunner {
    /// Run the converter. Errors mean it could not be run at all; a non-zero
    /// exit is reported through [`ToolOutcome`].
    fn run(&self, request: &ConvertRequest) -> Result<ToolOutcome>;
}

/// Runs the converter as a child process: `<tool> <pdf> <output>`.
pub struct ProcessToolRunner;

impl ToolRunner for ProcessToolRunner {
    #[instrument(skip_all, fields(tool = %request.tool.display()))]
    fn run(&self, request: &ConvertRequest) -> Result<ToolOutcome> {
        info!(
            pdf = %request.pdf_path.display(),
            output = %request.output_path.display(),
            "running converter"
        );
        let mut cmd = Command::new(&request.tool);
        cmd.arg(&request.pdf_path).arg(&request.output_path);
        let output = run_command(cmd, request.timeout, request.output_limit_bytes)?;
        Ok(ToolOutcome {
            success: output.status.success() && !output.timed_out,
            exit_code: output.status.code(),
            stderr: output.stderr_lossy(),
            timed_out: output.timed_out,
        })
    }
}
