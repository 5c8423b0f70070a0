//! CLI tests for `pdftools setup`.

use std::env::consts::{DLL_SUFFIX, EXE_SUFFIX};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use pdftools::exit_codes;
use pdftools::test_support::write_tool_dir;

fn pdftools(workdir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pdftools"))
        .current_dir(workdir)
        .env("PDFTOOLS_CONFIG", workdir.join("missing-config.toml"))
        .args(args)
        .output()
        .expect("run pdftools")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn exe() -> String {
    format!("pdftotext{EXE_SUFFIX}")
}

fn lib(stem: &str) -> String {
    format!("{stem}{DLL_SUFFIX}")
}

#[test]
fn copies_exactly_executable_and_libraries_to_default_target() {
    let temp = tempfile::tempdir().expect("tempdir");
    let source = temp.path().join("poppler");
    let (exe, zlib, poppler) = (exe(), lib("zlib"), lib("poppler"));
    write_tool_dir(
        &source,
        Some(exe.as_str()),
        &[zlib.as_str(), poppler.as_str(), "NOTICE.txt"],
    )
    .expect("source");

    let output = pdftools(temp.path(), &["setup", "poppler"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let target = temp.path().join("public").join("pdftools");
    let mut names: Vec<String> = fs::read_dir(&target)
        .expect("target exists")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    let mut expected = vec![exe.clone(), zlib.clone(), poppler.clone()];
    expected.sort();
    assert_eq!(names, expected);

    let text = stdout(&output);
    assert!(text.contains(&format!("Copied {exe} to")));
    assert!(text.contains(&format!("Copied {zlib} to")));
    assert!(text.contains("Successfully set up pdftools directory at"));
}

#[test]
fn explicit_target_is_created_with_parents() {
    let temp = tempfile::tempdir().expect("tempdir");
    let source = temp.path().join("poppler");
    write_tool_dir(&source, Some(exe().as_str()), &[]).expect("source");

    let output = pdftools(temp.path(), &["Setup", "poppler", "site/static/tools"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(temp.path().join("site/static/tools").join(exe()).is_file());
}

#[test]
fn missing_executable_fails_without_copying() {
    let temp = tempfile::tempdir().expect("tempdir");
    let source = temp.path().join("poppler");
    let (zlib, poppler) = (lib("zlib"), lib("poppler"));
    write_tool_dir(&source, None, &[zlib.as_str(), poppler.as_str()]).expect("source");

    let output = pdftools(temp.path(), &["setup", "poppler", "out"]);

    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    let target = temp.path().join("out");
    assert!(target.is_dir());
    assert_eq!(fs::read_dir(&target).expect("target").count(), 0);
    let text = stdout(&output);
    assert!(text.contains("not found in"));
    assert!(text.contains("Failed to set up pdftools directory"));
}

#[test]
fn default_target_as_source_fails_and_keeps_files() {
    let temp = tempfile::tempdir().expect("tempdir");
    let deployed = temp.path().join("public").join("pdftools");
    let zlib = lib("zlib");
    write_tool_dir(&deployed, Some(exe().as_str()), &[zlib.as_str()]).expect("deployed");

    let output = pdftools(temp.path(), &["setup", "public/pdftools"]);

    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    let text = stdout(&output);
    assert!(text.contains("installer error"));
    assert!(text.contains("Failed to set up pdftools directory"));
    assert_eq!(fs::read(deployed.join(exe())).expect("exe"), b"converter");
    assert_eq!(fs::read(deployed.join(&zlib)).expect("lib"), zlib.as_bytes());
}

#[test]
fn missing_source_argument_fails() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = pdftools(temp.path(), &["setup"]);

    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    let text = stdout(&output);
    assert!(text.contains("Error: Missing source directory"));
    assert!(text.contains("Usage: pdftools setup <source_dir> [target_dir]"));
}
