//! Command-line wrapper around Poppler's `pdftotext`.
//!
//! Two independent operations share no state:
//!
//! - **[`extract`]**: locate the converter executable and run it on one PDF,
//!   optionally cleaning the text it writes.
//! - **[`setup`]**: copy the converter and its dynamic libraries into a
//!   deployment directory (e.g. `public/pdftools` for a web app).
//!
//! Side-effecting helpers (config files, tool lookup, child processes) live
//! under [`io`]. [`cli`] turns results into the plain-text status lines the
//! binary prints.

pub mod cli;
pub mod error;
pub mod exit_codes;
pub mod extract;
pub mod io;
pub mod logging;
pub mod setup;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod text;
