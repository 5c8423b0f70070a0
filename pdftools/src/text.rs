//! Post-processing for converter output.

use std::sync::LazyLock;

use regex::Regex;

static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").expect("valid regex"));

/// Normalize extracted text to plain printable ASCII.
///
/// Drops characters outside `0x20..=0x7E` (keeping `\n`, `\r`, `\t`),
/// collapses runs of spaces, removes blank lines, and trims every line and
/// the text as a whole.
pub fn clean_text(raw: &str) -> String {
    let printable: String = raw
        .chars()
        .filter(|ch| matches!(ch, ' '..='~' | '\n' | '\r' | '\t'))
        .collect();
    let collapsed = SPACE_RUNS.replace_all(&printable, " ");
    collapsed
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
