//! Test-only helpers: scripted converters and fake tool directories.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::io::tool::{ConvertRequest, ToolOutcome, ToolRunner};

/// Converter that never spawns a process.
///
/// Records every request, optionally writes `output_text` to the requested
/// output path, and returns `outcome`.
pub struct ScriptedToolRunner {
    pub outcome: ToolOutcome,
    pub output_text: Option<String>,
    pub fail_to_run: bool,
    requests: RefCell<Vec<ConvertRequest>>,
}

impl ScriptedToolRunner {
    /// Exits 0 and writes `text` to the output path.
    pub fn writing(text: &str) -> Self {
        Self {
            outcome: ToolOutcome::succeeded(),
            output_text: Some(text.to_string()),
            fail_to_run: false,
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Exits 0 without writing anything.
    pub fn silent() -> Self {
        Self {
            output_text: None,
            ..Self::writing("")
        }
    }

    /// Exits with `code` and `stderr`, writing nothing.
    pub fn failing(code: i32, stderr: &str) -> Self {
        Self {
            outcome: ToolOutcome::failed(code, stderr),
            output_text: None,
            ..Self::writing("")
        }
    }

    /// Cannot be started at all.
    pub fn unrunnable() -> Self {
        Self {
            fail_to_run: true,
            output_text: None,
            ..Self::writing("")
        }
    }

    pub fn requests(&self) -> Vec<ConvertRequest> {
        self.requests.borrow().clone()
    }
}

impl ToolRunner for ScriptedToolRunner {
    fn run(&self, request: &ConvertRequest) -> Result<ToolOutcome> {
        self.requests.borrow_mut().push(request.clone());
        if self.fail_to_run {
            return Err(anyhow!("permission denied")).context("spawn command");
        }
        if let Some(text) = &self.output_text {
            fs::write(&request.output_path, text)
                .with_context(|| format!("write {}", request.output_path.display()))?;
        }
        Ok(self.outcome.clone())
    }
}

/// Write an executable shell script standing in for `pdftotext`.
///
/// The script receives `<pdf> <output>` like the real converter.
#[cfg(unix)]
pub fn write_fake_converter(path: &Path, body: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, format!("#!/bin/sh\n{body}\n"))
        .with_context(|| format!("write {}", path.display()))?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("chmod {}", path.display()))?;
    Ok(path.to_path_buf())
}

/// A converter script that copies a fixed line of text into its output.
#[cfg(unix)]
pub fn write_working_converter(path: &Path) -> Result<PathBuf> {
    write_fake_converter(path, "printf 'Extracted from %s\\n' \"$1\" > \"$2\"")
}

/// Populate `dir` with a converter binary and the given library file names.
pub fn write_tool_dir(dir: &Path, executable: Option<&str>, libraries: &[&str]) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    if let Some(name) = executable {
        fs::write(dir.join(name), b"converter")
            .with_context(|| format!("write {}", dir.join(name).display()))?;
    }
    for name in libraries {
        fs::write(dir.join(name), name.as_bytes())
            .with_context(|| format!("write {}", dir.join(name).display()))?;
    }
    Ok(())
}
