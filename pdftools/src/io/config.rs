//! Tool configuration stored in `pdftools.toml`.

use std::env::consts::{DLL_SUFFIX, EXE_SUFFIX};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PDFTOOLS_CONFIG";
/// Config file name looked up next to the running executable.
pub const CONFIG_FILE_NAME: &str = "pdftools.toml";

/// Converter lookup and installation settings (TOML).
///
/// Missing fields default to a Poppler layout for the current platform, so
/// the file only needs the values a deployment actually changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolsConfig {
    /// File name of the converter executable (`pdftotext.exe` on Windows).
    pub executable_name: String,

    /// File name suffix identifying dynamic libraries to install.
    pub library_suffix: String,

    /// Fallback converter locations, relative to the executable's directory,
    /// checked in order when no explicit tool path is given.
    pub candidates: Vec<PathBuf>,

    /// Target directory for `setup` when none is given.
    pub default_target_dir: PathBuf,

    /// Kill the converter after this many seconds. Unset waits forever.
    pub timeout_secs: Option<u64>,

    /// Keep at most this many bytes of converter stdout/stderr in memory.
    pub output_limit_bytes: usize,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        let exe = default_executable_name();
        Self {
            candidates: vec![
                PathBuf::from(&exe),
                Path::new("public").join("pdftools").join(&exe),
                Path::new("bin").join(&exe),
                Path::new("Release-24.08.0-0")
                    .join("poppler-24.08.0")
                    .join("Library")
                    .join("bin")
                    .join(&exe),
            ],
            executable_name: exe,
            library_suffix: DLL_SUFFIX.to_string(),
            default_target_dir: Path::new("public").join("pdftools"),
            timeout_secs: None,
            output_limit_bytes: 1_000_000,
        }
    }
}

impl ToolsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.executable_name.trim().is_empty() {
            return Err(anyhow!("executable_name must be non-empty"));
        }
        if self.library_suffix.trim().is_empty() {
            return Err(anyhow!("library_suffix must be non-empty"));
        }
        if self.candidates.is_empty() {
            return Err(anyhow!("candidates must be a non-empty array"));
        }
        if self.timeout_secs == Some(0) {
            return Err(anyhow!("timeout_secs must be > 0 when set"));
        }
        if self.output_limit_bytes == 0 {
            return Err(anyhow!("output_limit_bytes must be > 0"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

pub fn default_executable_name() -> String {
    format!("pdftotext{EXE_SUFFIX}")
}

/// Directory that candidate paths are relative to: the running executable's.
pub fn base_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("locate current executable")?;
    let dir = exe
        .parent()
        .with_context(|| format!("executable has no parent {}", exe.display()))?;
    Ok(dir.to_path_buf())
}

/// Config path: `$PDFTOOLS_CONFIG` if set, else `pdftools.toml` in `base_dir`.
pub fn config_path(base_dir: &Path) -> PathBuf {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => base_dir.join(CONFIG_FILE_NAME),
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ToolsConfig::default()`.
pub fn load_config(path: &Path) -> Result<ToolsConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        let cfg = ToolsConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ToolsConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    debug!(path = %path.display(), "config loaded");
    Ok(cfg)
}
