//! Run orchestration: settings resolution and per-package processing.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::Cli;
use crate::config::settings::{self, Settings};
use crate::config::{Config, Flags, absolutize};
use crate::linker::Linker;
use crate::logging::{Log, Logger, PackageStatus};
use crate::operations::FileSystemOps;

/// Source root used when neither the command line nor the settings file
/// names one.
pub const DEFAULT_DIR: &str = ".";

/// Target root used when neither the command line nor the settings file
/// names one.
pub const DEFAULT_TARGET: &str = "..";

/// Load the settings file named by `--config`, or the default one.
///
/// The default file is optional; a file named explicitly must exist.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let home = settings::home_dir();
    let loaded = match &cli.config {
        Some(path) => Settings::load(path, true)?,
        None => match settings::default_path(home.as_deref()) {
            Some(path) => Settings::load(&path, false)?,
            None => Settings::default(),
        },
    };
    Ok(loaded.expand_home(home.as_deref()))
}

/// Merge command-line values over settings over defaults and build the
/// run configuration, resolving relative roots against `cwd`.
///
/// # Errors
///
/// Returns an error if the resulting configuration is invalid.
pub fn resolve_config(cli: &Cli, settings: &Settings, cwd: &Path) -> Result<Config> {
    let dir = cli
        .dir
        .clone()
        .or_else(|| settings.dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR));
    let target = cli
        .target
        .clone()
        .or_else(|| settings.target.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET));

    let flags = Flags {
        verbose: cli.verbose || settings.verbose.unwrap_or(false),
        simulate: cli.simulate || settings.simulate.unwrap_or(false),
        delete: cli.delete,
        relink: cli.relink,
    };

    Config::new(
        absolutize(&dir, cwd),
        absolutize(&target, cwd),
        flags,
        cli.packages.clone(),
    )
    .context("invalid configuration")
}

/// Process every configured package in order, then print the summary.
///
/// # Errors
///
/// Returns the first package failure, prefixed with the package name.
/// Packages after the failing one are not processed.
pub fn run(config: &Config, fs: &dyn FileSystemOps, log: &Logger) -> Result<()> {
    log.debug(&format!("sym {}", crate::VERSION));
    log.debug(&format!("source: {}", config.source_root().display()));
    log.debug(&format!("target: {}", config.target_root().display()));
    if config.flags().delete && config.flags().relink {
        log.warn("both delete and relink requested; relinking");
    }
    if config.simulate() {
        log.info("simulate mode: no changes will be made");
    }

    let result = process_all(config, fs, log);
    log.print_summary();
    result
}

fn process_all(config: &Config, fs: &dyn FileSystemOps, log: &dyn Log) -> Result<()> {
    let linker = Linker::new(config, fs, log);
    let status = if config.simulate() {
        PackageStatus::Simulated
    } else {
        PackageStatus::Ok
    };

    for package in config.packages() {
        match linker.process(package) {
            Ok(report) => {
                let line = report.describe(config.simulate());
                log.info(&line);
                log.record_package(package, status, Some(&line));
            }
            Err(e) => {
                log.record_package(package, PackageStatus::Failed, Some(&e.to_string()));
                return Err(e).with_context(|| format!("error processing package '{package}'"));
            }
        }
    }
    Ok(())
}
