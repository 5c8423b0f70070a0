//! Error types for extraction and setup.

use std::path::PathBuf;

use thiserror::Error;

/// Why an extraction did not produce a text file.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No converter at the explicit path, or at any configured candidate.
    #[error("{name} not found (checked: {})", display_paths(.checked))]
    ToolNotFound { name: String, checked: Vec<PathBuf> },

    /// The converter could not be started or waited on.
    #[error("failed to run {}: {source:#}", .tool.display())]
    Run {
        tool: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// The converter exited with a non-zero status.
    #[error("error running {}: {}", .tool.display(), failure_detail(.code, .stderr))]
    ToolFailed {
        tool: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    /// The converter exceeded the configured timeout and was killed.
    #[error("{} timed out after {secs}s", .tool.display())]
    TimedOut { tool: PathBuf, secs: u64 },

    /// The output path names the input PDF itself.
    #[error("output file {} is the input PDF", .path.display())]
    OutputIsInput { path: PathBuf },

    /// The converter reported success but left no output file behind.
    #[error("output file was not created: {}", .path.display())]
    OutputMissing { path: PathBuf },

    /// Reading or rewriting the output file failed.
    #[error("{context} {}: {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why the pdftools directory could not be set up.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The converter executable is not in the source directory.
    #[error("{name} not found in {}", .source_dir.display())]
    MissingExecutable { name: String, source_dir: PathBuf },

    /// A file would be copied onto itself (source and target are the same directory).
    #[error(
        "installer error: {} and {} are the same file",
        .source_path.display(),
        .dest.display()
    )]
    SameFile { source_path: PathBuf, dest: PathBuf },

    /// Any filesystem failure while creating the target or copying files.
    #[error("installer error: {context} {}: {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn failure_detail(code: &Option<i32>, stderr: &str) -> String {
    let stderr = stderr.trim_end();
    if !stderr.trim().is_empty() {
        return stderr.to_string();
    }
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "no candidates".to_string();
    }
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
