//! I/O helpers: configuration, tool lookup, path identity, and child processes.

pub mod config;
pub mod locate;
pub mod paths;
pub mod process;
pub mod tool;
