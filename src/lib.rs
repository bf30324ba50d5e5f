//! Symlink farm manager.
//!
//! Mirrors "packages" (directories below a source root) into a target root:
//! every directory in a package becomes a real directory in the target and
//! every other entry becomes a symlink pointing back into the package.
//! Links can be created, removed again, or recreated, and every mode can be
//! simulated without touching the filesystem.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: run configuration and the optional settings file
//! - **[`operations`]**: the filesystem seam ([`FileSystemOps`](operations::FileSystemOps))
//! - **[`walk`]**: ordered, lazy traversal of a package tree
//! - **[`linker`]**: per-entry decisions and per-package link/unlink/relink
//! - **[`commands`]**: run orchestration over all requested packages
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod linker;
pub mod logging;
pub mod operations;
pub mod walk;

/// Build version: `SYM_VERSION` when set at build time, else the crate
/// version.
pub const VERSION: &str = match option_env!("SYM_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
