//! Installer: copy the converter and its dynamic libraries into a deployment directory.

use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::error::SetupError;
use crate::io::config::ToolsConfig;
use crate::io::paths::same_file;

/// Inputs for one installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupRequest {
    /// Directory holding the converter and its libraries.
    pub source_dir: PathBuf,
    /// Destination. Defaults to `config.default_target_dir`.
    pub target_dir: Option<PathBuf>,
}

/// Files copied by a successful installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    pub target_dir: PathBuf,
    /// File names in copy order: the converter first, then libraries sorted by name.
    pub copied: Vec<String>,
}

/// Copy the converter executable and every `*{library_suffix}` file from the
/// source directory into the target directory.
///
/// The target directory is created before anything else and is left in place
/// on failure. A source directory that is the target directory is rejected
/// before any copy, since copying a file onto itself truncates it. Copies
/// keep permissions and access/modification times.
/// `on_copied` is called with each file name as soon as its copy lands, so
/// callers can report progress even if a later copy fails. Nothing is rolled
/// back.
#[instrument(skip_all, fields(source_dir = %request.source_dir.display()))]
pub fn setup<F: FnMut(&str)>(
    request: &SetupRequest,
    config: &ToolsConfig,
    mut on_copied: F,
) -> Result<SetupReport, SetupError> {
    let target_dir = request
        .target_dir
        .clone()
        .unwrap_or_else(|| config.default_target_dir.clone());

    fs::create_dir_all(&target_dir).map_err(io_err("create", &target_dir))?;

    if same_file(&request.source_dir, &target_dir) {
        return Err(SetupError::SameFile {
            source_path: request.source_dir.clone(),
            dest: target_dir,
        });
    }

    let executable = request.source_dir.join(&config.executable_name);
    if !executable.exists() {
        return Err(SetupError::MissingExecutable {
            name: config.executable_name.clone(),
            source_dir: request.source_dir.clone(),
        });
    }

    let mut copied = Vec::new();
    copy_preserving(&executable, &target_dir)?;
    info!(file = %config.executable_name, target = %target_dir.display(), "copied converter");
    on_copied(&config.executable_name);
    copied.push(config.executable_name.clone());

    for name in library_names(&request.source_dir, config)? {
        copy_preserving(&request.source_dir.join(&name), &target_dir)?;
        info!(file = %name, target = %target_dir.display(), "copied library");
        on_copied(&name);
        copied.push(name);
    }

    Ok(SetupReport { target_dir, copied })
}

/// Names of regular files in `dir` ending in the library suffix, sorted.
fn library_names(dir: &Path, config: &ToolsConfig) -> Result<Vec<String>, SetupError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err("read", dir))? {
        let entry = entry.map_err(io_err("read entry in", dir))?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if name == config.executable_name || !name.ends_with(&config.library_suffix) {
            continue;
        }
        if entry.path().is_file() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Copy `source` into `target_dir`, keeping its permissions and timestamps.
fn copy_preserving(source: &Path, target_dir: &Path) -> Result<(), SetupError> {
    let file_name = source
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| source.to_path_buf());
    let dest = target_dir.join(file_name);
    if same_file(source, &dest) {
        return Err(SetupError::SameFile {
            source_path: source.to_path_buf(),
            dest,
        });
    }

    fs::copy(source, &dest).map_err(io_err("copy", source))?;

    let meta = fs::metadata(source).map_err(io_err("stat", source))?;
    let mut times = FileTimes::new();
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    // Copied read-only files can still take new times through a read handle on unix.
    let file = File::options()
        .write(true)
        .open(&dest)
        .or_else(|_| File::open(&dest))
        .map_err(io_err("open", &dest))?;
    file.set_times(times).map_err(io_err("set times on", &dest))?;
    Ok(())
}

fn io_err<'a>(
    context: &'static str,
    path: &'a Path,
) -> impl FnOnce(std::io::Error) -> SetupError + 'a {
    move |source| SetupError::Io {
        context,
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use crate::test_support::write_tool_dir;

    fn config() -> ToolsConfig {
        ToolsConfig {
            executable_name: "pdftotext.exe".to_string(),
            library_suffix: ".dll".to_string(),
            ..ToolsConfig::default()
        }
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn copies_executable_and_libraries_into_new_target() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("poppler/bin");
        write_tool_dir(
            &source,
            Some("pdftotext.exe"),
            &["zlib.dll", "poppler.dll", "README.txt"],
        )
        .expect("source");
        let target = temp.path().join("public/pdftools");
        let mut seen = Vec::new();

        let report = setup(
            &SetupRequest {
                source_dir: source,
                target_dir: Some(target.clone()),
            },
            &config(),
            |name| seen.push(name.to_string()),
        )
        .expect("setup");

        assert_eq!(report.target_dir, target);
        assert_eq!(report.copied, vec!["pdftotext.exe", "poppler.dll", "zlib.dll"]);
        assert_eq!(seen, report.copied);
        assert_eq!(
            file_names(&target),
            vec!["pdftotext.exe", "poppler.dll", "zlib.dll"]
        );
        assert_eq!(fs::read(target.join("zlib.dll")).expect("read"), b"zlib.dll");
    }

    #[test]
    fn missing_executable_copies_nothing_but_creates_target() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("src");
        write_tool_dir(&source, None, &["poppler.dll"]).expect("source");
        let target = temp.path().join("deep/nested/target");

        let err = setup(
            &SetupRequest {
                source_dir: source,
                target_dir: Some(target.clone()),
            },
            &config(),
            |_| {},
        )
        .expect_err("missing executable");

        assert!(matches!(err, SetupError::MissingExecutable { .. }));
        assert!(target.is_dir());
        assert!(file_names(&target).is_empty());
    }

    #[test]
    fn missing_source_dir_is_reported() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = setup(
            &SetupRequest {
                source_dir: temp.path().join("nope"),
                target_dir: Some(temp.path().join("target")),
            },
            &config(),
            |_| {},
        )
        .expect_err("missing source");

        assert!(matches!(err, SetupError::MissingExecutable { .. }));
    }

    #[test]
    fn source_equal_to_target_is_rejected_without_truncating() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("public/pdftools");
        write_tool_dir(&dir, Some("pdftotext.exe"), &["poppler.dll"]).expect("source");
        let mut seen = Vec::new();

        let err = setup(
            &SetupRequest {
                source_dir: dir.clone(),
                target_dir: Some(temp.path().join("public/./pdftools")),
            },
            &config(),
            |name| seen.push(name.to_string()),
        )
        .expect_err("same directory");

        assert!(matches!(err, SetupError::SameFile { .. }));
        assert!(err.to_string().starts_with("installer error"));
        assert!(seen.is_empty());
        assert_eq!(
            fs::read(dir.join("pdftotext.exe")).expect("read"),
            b"converter"
        );
        assert_eq!(fs::read(dir.join("poppler.dll")).expect("read"), b"poppler.dll");
    }

    #[cfg(unix)]
    #[test]
    fn file_symlinked_into_target_is_not_copied_onto_itself() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("src");
        write_tool_dir(&source, Some("pdftotext.exe"), &[]).expect("source");
        let target = temp.path().join("target");
        fs::create_dir_all(&target).expect("target");
        std::os::unix::fs::symlink(source.join("pdftotext.exe"), target.join("pdftotext.exe"))
            .expect("symlink");

        let err = setup(
            &SetupRequest {
                source_dir: source.clone(),
                target_dir: Some(target),
            },
            &config(),
            |_| {},
        )
        .expect_err("aliased file");

        assert!(matches!(err, SetupError::SameFile { .. }));
        assert_eq!(
            fs::read(source.join("pdftotext.exe")).expect("read"),
            b"converter"
        );
    }

    #[test]
    fn skips_directories_with_library_suffix() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("src");
        write_tool_dir(&source, Some("pdftotext.exe"), &["a.dll"]).expect("source");
        fs::create_dir_all(source.join("plugins.dll")).expect("dir");
        let target = temp.path().join("target");

        let report = setup(
            &SetupRequest {
                source_dir: source,
                target_dir: Some(target),
            },
            &config(),
            |_| {},
        )
        .expect("setup");

        assert_eq!(report.copied, vec!["pdftotext.exe", "a.dll"]);
    }

    #[test]
    fn preserves_modification_time() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("src");
        write_tool_dir(&source, Some("pdftotext.exe"), &[]).expect("source");
        let past = SystemTime::now() - Duration::from_secs(7 * 24 * 60 * 60);
        File::options()
            .write(true)
            .open(source.join("pdftotext.exe"))
            .expect("open")
            .set_modified(past)
            .expect("set mtime");
        let target = temp.path().join("target");

        setup(
            &SetupRequest {
                source_dir: source.clone(),
                target_dir: Some(target.clone()),
            },
            &config(),
            |_| {},
        )
        .expect("setup");

        let copied = fs::metadata(target.join("pdftotext.exe"))
            .expect("stat")
            .modified()
            .expect("mtime");
        let original = fs::metadata(source.join("pdftotext.exe"))
            .expect("stat")
            .modified()
            .expect("mtime");
        assert_eq!(copied, original);
    }
}
