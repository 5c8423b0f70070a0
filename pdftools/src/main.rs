//! `pdftools`: run Poppler's `pdftotext` on one PDF, or install it for a web app.
//!
//! ```text
//! pdftools <pdf_file> <output_text_file> [tool_path] [--clean]
//! pdftools setup <source_dir> [target_dir]
//! ```

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use pdftools::cli::{extract_command, print_missing_source, print_usage, setup_command};
use pdftools::exit_codes;
use pdftools::extract::ExtractRequest;
use pdftools::io::config::{base_dir, config_path, load_config};
use pdftools::io::tool::ProcessToolRunner;
use pdftools::logging;
use pdftools::setup::SetupRequest;

#[derive(Parser, Debug)]
#[command(
    name = "pdftools",
    version,
    about = "Extract text from a PDF with pdftotext"
)]
struct ExtractCli {
    /// PDF to convert.
    pdf_file: PathBuf,
    /// Where the converter writes the text.
    output_text_file: PathBuf,
    /// Converter executable. Skips the configured candidate locations.
    tool_path: Option<PathBuf>,
    /// Strip non-ASCII characters, extra spaces, and blank lines from the output.
    #[arg(long)]
    clean: bool,
}

#[derive(Parser, Debug)]
#[command(
    name = "pdftools setup",
    about = "Copy pdftotext and its libraries into a deployment directory"
)]
struct SetupCli {
    /// Directory containing the converter and its dynamic libraries.
    source_dir: Option<PathBuf>,
    /// Destination directory (default from config: public/pdftools).
    target_dir: Option<PathBuf>,
}

/// Parsed command line, selected by whether the first argument is `setup`.
#[derive(Debug)]
enum Invocation {
    Extract(ExtractCli),
    Setup(SetupCli),
}

fn main() {
    logging::init();
    let args: Vec<OsString> = std::env::args_os().collect();
    let code = match run(args) {
        Ok(code) => code,
        Err(err) => {
            println!("Error: {err:#}");
            exit_codes::FAILURE
        }
    };
    std::process::exit(code);
}

fn run(args: Vec<OsString>) -> Result<i32> {
    let mut stdout = std::io::stdout().lock();

    let invocation = match parse_invocation(args) {
        Ok(invocation) => invocation,
        Err(err) => return report_parse_error(&err, &mut stdout),
    };

    let base_dir = base_dir()?;
    let config = load_config(&config_path(&base_dir)).context("load config")?;

    match invocation {
        Invocation::Extract(cli) => {
            let request = ExtractRequest {
                pdf_path: cli.pdf_file,
                output_path: cli.output_text_file,
                tool: cli.tool_path,
                clean: cli.clean,
            };
            extract_command(
                &request,
                &config,
                &base_dir,
                &ProcessToolRunner,
                &mut stdout,
            )
        }
        Invocation::Setup(SetupCli {
            source_dir: None, ..
        }) => {
            print_missing_source(&mut stdout)?;
            Ok(exit_codes::FAILURE)
        }
        Invocation::Setup(SetupCli {
            source_dir: Some(source_dir),
            target_dir,
        }) => {
            let request = SetupRequest {
                source_dir,
                target_dir,
            };
            setup_command(&request, &config, &mut stdout)
        }
    }
}

/// Dispatch on the first argument: `setup` (any case) selects the installer.
fn parse_invocation(args: Vec<OsString>) -> Result<Invocation, clap::Error> {
    let is_setup = args
        .get(1)
        .and_then(|arg| arg.to_str())
        .is_some_and(|arg| arg.eq_ignore_ascii_case("setup"));

    if is_setup {
        let rest = args.iter().take(1).chain(args.iter().skip(2)).cloned();
        SetupCli::try_parse_from(rest).map(Invocation::Setup)
    } else {
        ExtractCli::try_parse_from(args).map(Invocation::Extract)
    }
}

fn report_parse_error<W: Write>(err: &clap::Error, out: &mut W) -> Result<i32> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            write!(out, "{}", err.render())?;
            Ok(exit_codes::OK)
        }
        _ => {
            writeln!(out, "{}", err.render().to_string().trim_end())?;
            print_usage(out)?;
            Ok(exit_codes::FAILURE)
        }
    }
}
