//! Stable exit codes for the `pdftools` binary.

/// Extraction or setup succeeded.
pub const OK: i32 = 0;
/// Missing arguments, tool not found, converter failure, or installer error.
pub const FAILURE: i32 = 1;
